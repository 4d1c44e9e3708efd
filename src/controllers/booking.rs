use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{Datelike, Utc};

use crate::cache::Cache;
use crate::compatibility::check_compatibility;
use crate::error::CreateBookingError;
use crate::models::{
	BookingFilter,
	BookingStatus,
	NewBooking,
	PrimitiveAvailabilitySchedule,
	PrimitiveBooking,
	PrimitiveGarage,
	PrimitiveVehicle,
	check_booking_window,
	windows_overlap,
};
use crate::pricing::{PricingOptions, compute_price};
use crate::schemas::booking::{
	AvailabilityQuery,
	AvailabilityResponse,
	BookingResponse,
	CreateBookingRequest,
	QuoteRequest,
	QuoteResponse,
	RescheduleBookingRequest,
};
use crate::session::Session;
use crate::{DbConn, DbPool, Error};

/// Fetch an active garage or report it as missing
async fn get_active_garage(
	g_id: i32,
	conn: &DbConn,
) -> Result<PrimitiveGarage, Error> {
	let garage = PrimitiveGarage::get_by_id(g_id, conn).await?;

	if !garage.is_active {
		return Err(Error::NotFound(format!("garage {g_id} is not active")));
	}

	Ok(garage)
}

/// Admission control: every advisory gate, then the atomic claim
#[instrument(skip(pool, cache))]
pub async fn create_booking(
	State(pool): State<DbPool>,
	State(cache): State<Cache>,
	session: Session,
	Path(g_id): Path<i32>,
	Json(request): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, Error> {
	check_booking_window(
		Utc::now().naive_utc(),
		request.start_time,
		request.end_time,
	)?;

	let conn = pool.get().await?;

	let garage = get_active_garage(g_id, &conn).await?;

	let vehicle =
		PrimitiveVehicle::get_by_id(request.vehicle_id, &conn).await?;

	if vehicle.owner_id != session.profile_id {
		return Err(Error::Forbidden);
	}

	let report = check_compatibility(&vehicle, &garage);

	if !report.compatible {
		return Err(CreateBookingError::Incompatible(report.issues).into());
	}

	let schedule = PrimitiveAvailabilitySchedule::check_window(
		g_id,
		request.start_time,
		request.end_time,
		&conn,
	)
	.await?;

	if !schedule.available {
		return Err(
			CreateBookingError::OutsideSchedule(schedule.reasons).into()
		);
	}

	let quote = compute_price(
		&garage.pricing(),
		request.start_time,
		request.end_time,
		&PricingOptions::default(),
	)?;

	let new_booking = NewBooking {
		profile_id:  session.profile_id,
		garage_id:   g_id,
		vehicle_id:  vehicle.id,
		start_time:  request.start_time,
		end_time:    request.end_time,
		total_price: quote.total,
	};

	let booking = new_booking.insert_atomic(&conn).await?;

	cache
		.invalidate_booking(
			g_id,
			session.profile_id,
			booking.start_time,
			booking.end_time,
		)
		.await;

	Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

#[instrument(skip(pool, cache))]
pub async fn get_own_bookings(
	State(pool): State<DbPool>,
	State(cache): State<Cache>,
	session: Session,
	Query(filter): Query<BookingFilter>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	// Only the unfiltered list is worth caching
	let bookings = if filter.is_empty() {
		PrimitiveBooking::for_profile_cached(
			session.profile_id,
			&cache,
			&conn,
		)
		.await?
	} else {
		PrimitiveBooking::for_profile(session.profile_id, filter, &conn)
			.await?
	};

	let response: Vec<BookingResponse> =
		bookings.into_iter().map(Into::into).collect();

	Ok((StatusCode::OK, Json(response)))
}

#[instrument(skip(pool))]
pub async fn get_bookings_for_garage(
	State(pool): State<DbPool>,
	session: Session,
	Path(g_id): Path<i32>,
	Query(filter): Query<BookingFilter>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let garage = PrimitiveGarage::get_by_id(g_id, &conn).await?;

	if garage.owner_id != session.profile_id {
		return Err(Error::Forbidden);
	}

	let bookings = PrimitiveBooking::for_garage(g_id, filter, &conn).await?;
	let response: Vec<BookingResponse> =
		bookings.into_iter().map(Into::into).collect();

	Ok((StatusCode::OK, Json(response)))
}

#[instrument(skip(pool))]
pub async fn get_booking(
	State(pool): State<DbPool>,
	session: Session,
	Path(b_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let booking = PrimitiveBooking::get_by_id(b_id, &conn).await?;
	let garage = PrimitiveGarage::get_by_id(booking.garage_id, &conn).await?;

	if booking.profile_id != session.profile_id
		&& garage.owner_id != session.profile_id
	{
		return Err(Error::Forbidden);
	}

	Ok((StatusCode::OK, Json(BookingResponse::from(booking))))
}

/// Apply a lifecycle transition after the ownership check picked for it
async fn transition_booking(
	b_id: i32,
	next: BookingStatus,
	session: Session,
	owner_may: bool,
	requester_may: bool,
	cache: &Cache,
	conn: &DbConn,
) -> Result<PrimitiveBooking, Error> {
	let booking = PrimitiveBooking::get_by_id(b_id, conn).await?;
	let garage = PrimitiveGarage::get_by_id(booking.garage_id, conn).await?;

	let is_owner = garage.owner_id == session.profile_id;
	let is_requester = booking.profile_id == session.profile_id;

	if !((owner_may && is_owner) || (requester_may && is_requester)) {
		return Err(Error::Forbidden);
	}

	let booking = PrimitiveBooking::transition(b_id, next, conn).await?;

	cache
		.invalidate_booking(
			booking.garage_id,
			booking.profile_id,
			booking.start_time,
			booking.end_time,
		)
		.await;

	Ok(booking)
}

#[instrument(skip(pool, cache))]
pub async fn confirm_booking(
	State(pool): State<DbPool>,
	State(cache): State<Cache>,
	session: Session,
	Path(b_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let booking = transition_booking(
		b_id,
		BookingStatus::Confirmed,
		session,
		true,
		false,
		&cache,
		&conn,
	)
	.await?;

	Ok((StatusCode::OK, Json(BookingResponse::from(booking))))
}

#[instrument(skip(pool, cache))]
pub async fn cancel_booking(
	State(pool): State<DbPool>,
	State(cache): State<Cache>,
	session: Session,
	Path(b_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let booking = transition_booking(
		b_id,
		BookingStatus::Cancelled,
		session,
		true,
		true,
		&cache,
		&conn,
	)
	.await?;

	Ok((StatusCode::OK, Json(BookingResponse::from(booking))))
}

#[instrument(skip(pool, cache))]
pub async fn check_in_booking(
	State(pool): State<DbPool>,
	State(cache): State<Cache>,
	session: Session,
	Path(b_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let booking = transition_booking(
		b_id,
		BookingStatus::Active,
		session,
		true,
		true,
		&cache,
		&conn,
	)
	.await?;

	Ok((StatusCode::OK, Json(BookingResponse::from(booking))))
}

#[instrument(skip(pool, cache))]
pub async fn check_out_booking(
	State(pool): State<DbPool>,
	State(cache): State<Cache>,
	session: Session,
	Path(b_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let booking = transition_booking(
		b_id,
		BookingStatus::Completed,
		session,
		true,
		true,
		&cache,
		&conn,
	)
	.await?;

	Ok((StatusCode::OK, Json(BookingResponse::from(booking))))
}

/// Move a booking to a new window, re-running the advisory gates and the
/// atomic conflict check
#[instrument(skip(pool, cache))]
pub async fn reschedule_booking(
	State(pool): State<DbPool>,
	State(cache): State<Cache>,
	session: Session,
	Path(b_id): Path<i32>,
	Json(request): Json<RescheduleBookingRequest>,
) -> Result<impl IntoResponse, Error> {
	check_booking_window(
		Utc::now().naive_utc(),
		request.start_time,
		request.end_time,
	)?;

	let conn = pool.get().await?;

	let booking = PrimitiveBooking::get_by_id(b_id, &conn).await?;

	if booking.profile_id != session.profile_id {
		return Err(Error::Forbidden);
	}

	let garage = get_active_garage(booking.garage_id, &conn).await?;

	let schedule = PrimitiveAvailabilitySchedule::check_window(
		garage.id,
		request.start_time,
		request.end_time,
		&conn,
	)
	.await?;

	if !schedule.available {
		return Err(
			CreateBookingError::OutsideSchedule(schedule.reasons).into()
		);
	}

	let quote = compute_price(
		&garage.pricing(),
		request.start_time,
		request.end_time,
		&PricingOptions::default(),
	)?;

	// Invalidate the window the booking is leaving as well as the one it
	// moves into
	let (old_start, old_end) = (booking.start_time, booking.end_time);

	let booking = PrimitiveBooking::reschedule(
		b_id,
		request.start_time,
		request.end_time,
		quote.total,
		&conn,
	)
	.await?;

	cache
		.invalidate_booking(booking.garage_id, booking.profile_id, old_start, old_end)
		.await;
	cache
		.invalidate_booking(
			booking.garage_id,
			booking.profile_id,
			booking.start_time,
			booking.end_time,
		)
		.await;

	Ok((StatusCode::OK, Json(BookingResponse::from(booking))))
}

/// Advisory availability for one day, accelerated by the cache
///
/// Best-effort only: admission control re-checks inside its transaction
#[instrument(skip(pool, cache))]
pub async fn get_garage_availability(
	State(pool): State<DbPool>,
	State(cache): State<Cache>,
	Path(g_id): Path<i32>,
	Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	get_active_garage(g_id, &conn).await?;

	let bookings =
		PrimitiveBooking::on_day_cached(g_id, query.date, &cache, &conn)
			.await?;

	let response = match (query.start_time, query.end_time) {
		(Some(start), Some(end)) => {
			let start_time = query.date.and_time(start);
			let end_time = query.date.and_time(end);

			let schedule = PrimitiveAvailabilitySchedule::check_window(
				g_id, start_time, end_time, &conn,
			)
			.await?;

			let mut reasons = schedule.reasons;

			let taken = bookings.iter().any(|b| {
				windows_overlap(start_time, end_time, b.start_time, b.end_time)
			});

			if taken {
				reasons.push("already booked in that window".to_string());
			}

			AvailabilityResponse {
				available: schedule.available && !taken,
				reasons,
			}
		},
		_ => {
			// Without a window only report whether the day has any
			// schedule at all
			let rows = PrimitiveAvailabilitySchedule::get_active_for_garage(
				g_id, &conn,
			)
			.await?;

			#[allow(
				clippy::cast_possible_truncation,
				clippy::cast_possible_wrap
			)]
			let day = query.date.weekday().num_days_from_sunday() as i16;

			let windows: Vec<String> = rows
				.iter()
				.filter(|row| row.day_of_week == day)
				.map(|row| {
					format!(
						"{}-{}",
						row.start_time.format("%H:%M"),
						row.end_time.format("%H:%M"),
					)
				})
				.collect();

			if windows.is_empty() {
				AvailabilityResponse {
					available: false,
					reasons:   vec!["not available on this day".to_string()],
				}
			} else {
				AvailabilityResponse {
					available: true,
					reasons:   vec![format!(
						"available windows: {}",
						windows.join(", "),
					)],
				}
			}
		},
	};

	Ok((StatusCode::OK, Json(response)))
}

/// Price a window without creating anything
#[instrument(skip(pool))]
pub async fn quote_booking(
	State(pool): State<DbPool>,
	Path(g_id): Path<i32>,
	Json(request): Json<QuoteRequest>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let garage = get_active_garage(g_id, &conn).await?;

	let quote = compute_price(
		&garage.pricing(),
		request.start_time,
		request.end_time,
		&PricingOptions::default(),
	)?;

	Ok((StatusCode::OK, Json(QuoteResponse::from(quote))))
}
