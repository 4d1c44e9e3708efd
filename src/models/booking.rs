use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::sql_types::Bool;
use serde::{Deserialize, Serialize};

use crate::cache::{AVAILABILITY_TTL, Cache};
use crate::error::CreateBookingError;
use crate::models::{BookingStatus, BoxedCondition, ToFilter};
use crate::schema::{booking, garage};
use crate::{DbConn, Error};

/// Shortest admissible booking
pub const MIN_BOOKING_MINUTES: i64 = 30;
/// Longest admissible booking
pub const MAX_BOOKING_HOURS: i64 = 24;
/// How far ahead a booking may start
pub const MAX_ADVANCE_DAYS: i64 = 30;

/// Whether two half-open windows `[s1, e1)` and `[s2, e2)` share any instant
#[must_use]
pub fn windows_overlap(
	s1: NaiveDateTime,
	e1: NaiveDateTime,
	s2: NaiveDateTime,
	e2: NaiveDateTime,
) -> bool {
	s1 < e2 && s2 < e1
}

/// Check the time constraints a new booking window must satisfy
///
/// These are caller errors, not conflicts: no transaction is opened for a
/// window that fails here
pub fn check_booking_window(
	now: NaiveDateTime,
	start_time: NaiveDateTime,
	end_time: NaiveDateTime,
) -> Result<(), Error> {
	if start_time < now {
		return Err(CreateBookingError::StartInPast.into());
	}

	if end_time <= start_time {
		return Err(CreateBookingError::EndNotAfterStart.into());
	}

	let duration = end_time - start_time;

	if duration < TimeDelta::minutes(MIN_BOOKING_MINUTES) {
		return Err(CreateBookingError::TooShort(MIN_BOOKING_MINUTES).into());
	}

	if duration > TimeDelta::hours(MAX_BOOKING_HOURS) {
		return Err(CreateBookingError::TooLong(MAX_BOOKING_HOURS).into());
	}

	if start_time - now > TimeDelta::days(MAX_ADVANCE_DAYS) {
		return Err(CreateBookingError::TooFarAhead(MAX_ADVANCE_DAYS).into());
	}

	Ok(())
}

/// Count the bookings holding a claim on `[start_time, end_time)` for a
/// garage
///
/// Runs on a borrowed connection so it can share the admission transaction;
/// `exclude` skips the booking being rescheduled
fn count_conflicts(
	conn: &mut PgConnection,
	g_id: i32,
	start: NaiveDateTime,
	end: NaiveDateTime,
	exclude: Option<i32>,
) -> QueryResult<i64> {
	use self::booking::dsl::*;

	let mut query = booking
		.filter(garage_id.eq(g_id))
		.filter(status.eq_any(BookingStatus::BLOCKING))
		.filter(start_time.lt(end))
		.filter(end_time.gt(start))
		.into_boxed();

	if let Some(b_id) = exclude {
		query = query.filter(id.ne(b_id));
	}

	query.count().get_result(conn)
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingFilter {
	pub status: Option<BookingStatus>,
	pub from:   Option<NaiveDate>,
	pub until:  Option<NaiveDate>,
}

impl BookingFilter {
	/// Whether this filter restricts anything at all
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.status.is_none() && self.from.is_none() && self.until.is_none()
	}
}

impl<S> ToFilter<S> for BookingFilter
where
	S: 'static,
	booking::status: SelectableExpression<S>,
	booking::start_time: SelectableExpression<S>,
{
	type SqlType = Bool;

	fn to_filter(&self) -> BoxedCondition<S, Self::SqlType> {
		let mut filter: BoxedCondition<S, Self::SqlType> =
			Box::new(true.into_sql::<Bool>());

		if let Some(status) = self.status {
			filter = Box::new(filter.and(booking::status.eq(status)));
		}

		if let Some(from) = self.from {
			filter = Box::new(
				filter.and(
					booking::start_time.ge(from.and_time(NaiveTime::MIN)),
				),
			);
		}

		if let Some(until) = self.until {
			let cutoff = until.and_time(NaiveTime::MIN) + TimeDelta::days(1);

			filter = Box::new(filter.and(booking::start_time.lt(cutoff)));
		}

		filter
	}
}

#[derive(
	Clone, Debug, Deserialize, Identifiable, Queryable, Selectable, Serialize,
)]
#[diesel(table_name = booking)]
#[diesel(check_for_backend(Pg))]
pub struct PrimitiveBooking {
	pub id:          i32,
	pub profile_id:  i32,
	pub garage_id:   i32,
	pub vehicle_id:  i32,
	pub start_time:  NaiveDateTime,
	pub end_time:    NaiveDateTime,
	pub total_price: f64,
	pub status:      BookingStatus,
	pub created_at:  NaiveDateTime,
	pub updated_at:  NaiveDateTime,
}

impl PrimitiveBooking {
	/// Get a [`PrimitiveBooking`] by its id
	#[instrument(skip(conn))]
	pub async fn get_by_id(b_id: i32, conn: &DbConn) -> Result<Self, Error> {
		let booking = conn
			.interact(move |conn| {
				use self::booking::dsl::*;

				booking.find(b_id).select(Self::as_select()).get_result(conn)
			})
			.await??;

		Ok(booking)
	}

	/// Get all the bookings made by a profile
	#[instrument(skip(conn))]
	pub async fn for_profile(
		p_id: i32,
		filter: BookingFilter,
		conn: &DbConn,
	) -> Result<Vec<Self>, Error> {
		let filter = filter.to_filter();

		let bookings = conn
			.interact(move |conn| {
				booking::table
					.filter(booking::profile_id.eq(p_id))
					.filter(filter)
					.order(booking::start_time.asc())
					.select(Self::as_select())
					.get_results(conn)
			})
			.await??;

		Ok(bookings)
	}

	/// Get an unfiltered profile booking list through the cache
	#[instrument(skip(cache, conn))]
	pub async fn for_profile_cached(
		p_id: i32,
		cache: &Cache,
		conn: &DbConn,
	) -> Result<Vec<Self>, Error> {
		let key = Cache::profile_bookings_key(p_id);

		if let Some(raw) = cache.get(&key).await
			&& let Ok(bookings) = serde_json::from_str::<Vec<Self>>(&raw)
		{
			return Ok(bookings);
		}

		let bookings =
			Self::for_profile(p_id, BookingFilter::default(), conn).await?;

		if let Ok(raw) = serde_json::to_string(&bookings) {
			cache.set(&key, raw, AVAILABILITY_TTL).await;
		}

		Ok(bookings)
	}

	/// Get all the bookings on a garage
	#[instrument(skip(conn))]
	pub async fn for_garage(
		g_id: i32,
		filter: BookingFilter,
		conn: &DbConn,
	) -> Result<Vec<Self>, Error> {
		let filter = filter.to_filter();

		let bookings = conn
			.interact(move |conn| {
				booking::table
					.filter(booking::garage_id.eq(g_id))
					.filter(filter)
					.order(booking::start_time.asc())
					.select(Self::as_select())
					.get_results(conn)
			})
			.await??;

		Ok(bookings)
	}

	/// Get the claim-holding bookings touching a garage on one day
	#[instrument(skip(conn))]
	pub async fn on_day(
		g_id: i32,
		date: NaiveDate,
		conn: &DbConn,
	) -> Result<Vec<Self>, Error> {
		let day_start = date.and_time(NaiveTime::MIN);
		let day_end = day_start + TimeDelta::days(1);

		let bookings = conn
			.interact(move |conn| {
				use self::booking::dsl::*;

				booking
					.filter(garage_id.eq(g_id))
					.filter(status.eq_any(BookingStatus::BLOCKING))
					.filter(start_time.lt(day_end))
					.filter(end_time.gt(day_start))
					.order(start_time.asc())
					.select(Self::as_select())
					.get_results(conn)
			})
			.await??;

		Ok(bookings)
	}

	/// Get one day of claim-holding bookings through the cache
	///
	/// Best-effort acceleration for the advisory availability check; the
	/// admission transaction never reads from here
	#[instrument(skip(cache, conn))]
	pub async fn on_day_cached(
		g_id: i32,
		date: NaiveDate,
		cache: &Cache,
		conn: &DbConn,
	) -> Result<Vec<Self>, Error> {
		let key = Cache::garage_day_key(g_id, date);

		if let Some(raw) = cache.get(&key).await
			&& let Ok(bookings) = serde_json::from_str::<Vec<Self>>(&raw)
		{
			return Ok(bookings);
		}

		let bookings = Self::on_day(g_id, date, conn).await?;

		if let Ok(raw) = serde_json::to_string(&bookings) {
			cache.set(&key, raw, AVAILABILITY_TTL).await;
		}

		Ok(bookings)
	}

	/// Move a booking to the next lifecycle status
	///
	/// The row is locked first so two racing transitions cannot both read
	/// the same current status
	#[instrument(skip(conn))]
	pub async fn transition(
		b_id: i32,
		next: BookingStatus,
		conn: &DbConn,
	) -> Result<Self, Error> {
		let updated = conn
			.interact(move |conn| {
				conn.transaction::<_, Error, _>(|conn| {
					let current: PrimitiveBooking = booking::table
						.find(b_id)
						.for_update()
						.select(PrimitiveBooking::as_select())
						.get_result(conn)?;

					if !current.status.can_transition_to(next) {
						return Err(Error::InvalidTransition {
							from: current.status,
							to:   next,
						});
					}

					diesel::update(booking::table.find(b_id))
						.set(booking::status.eq(next))
						.returning(PrimitiveBooking::as_returning())
						.get_result(conn)
						.map_err(Into::into)
				})
			})
			.await??;

		info!("booking {} moved to {:?}", updated.id, updated.status);

		Ok(updated)
	}

	/// Move a booking to a new time window, re-running admission control
	/// against every other claim on the garage
	#[instrument(skip(conn))]
	pub async fn reschedule(
		b_id: i32,
		new_start: NaiveDateTime,
		new_end: NaiveDateTime,
		new_total: f64,
		conn: &DbConn,
	) -> Result<Self, Error> {
		let updated = conn
			.interact(move |conn| {
				conn.transaction::<_, Error, _>(|conn| {
					let current: PrimitiveBooking = booking::table
						.find(b_id)
						.for_update()
						.select(PrimitiveBooking::as_select())
						.get_result(conn)?;

					if !matches!(
						current.status,
						BookingStatus::Pending | BookingStatus::Confirmed
					) {
						return Err(Error::ValidationError(
							"only pending or confirmed bookings can be \
							 rescheduled"
								.to_string(),
						));
					}

					let _lock: i32 = garage::table
						.find(current.garage_id)
						.select(garage::id)
						.for_update()
						.get_result(conn)?;

					let conflicts = count_conflicts(
						conn,
						current.garage_id,
						new_start,
						new_end,
						Some(b_id),
					)?;

					if conflicts > 0 {
						return Err(CreateBookingError::SlotTaken.into());
					}

					diesel::update(booking::table.find(b_id))
						.set((
							booking::start_time.eq(new_start),
							booking::end_time.eq(new_end),
							booking::total_price.eq(new_total),
						))
						.returning(PrimitiveBooking::as_returning())
						.get_result(conn)
						.map_err(Into::into)
				})
			})
			.await??;

		info!("rescheduled booking {}", updated.id);

		Ok(updated)
	}
}

#[derive(Clone, Debug, Deserialize, Insertable, Serialize)]
#[diesel(table_name = booking)]
#[diesel(check_for_backend(Pg))]
pub struct NewBooking {
	pub profile_id:  i32,
	pub garage_id:   i32,
	pub vehicle_id:  i32,
	pub start_time:  NaiveDateTime,
	pub end_time:    NaiveDateTime,
	pub total_price: f64,
}

impl NewBooking {
	/// Atomically verify that no claim overlaps this window and create the
	/// booking in `PENDING`
	///
	/// The garage row is locked `FOR UPDATE` before the conflict query:
	/// locking only the conflicting booking rows cannot stop two inserts
	/// that both observe zero conflicts, so the garage row itself is the
	/// admission lock. Under N concurrent calls for overlapping windows
	/// exactly one commits; the rest surface
	/// [`CreateBookingError::SlotTaken`]
	#[instrument(skip(conn))]
	pub async fn insert_atomic(
		self,
		conn: &DbConn,
	) -> Result<PrimitiveBooking, Error> {
		let booking = conn
			.interact(move |conn| {
				conn.transaction::<_, Error, _>(|conn| {
					let _lock: i32 = garage::table
						.find(self.garage_id)
						.select(garage::id)
						.for_update()
						.get_result(conn)?;

					let conflicts = count_conflicts(
						conn,
						self.garage_id,
						self.start_time,
						self.end_time,
						None,
					)?;

					if conflicts > 0 {
						return Err(CreateBookingError::SlotTaken.into());
					}

					diesel::insert_into(booking::table)
						.values(self)
						.returning(PrimitiveBooking::as_returning())
						.get_result(conn)
						.map_err(Into::into)
				})
			})
			.await??;

		info!("created booking {booking:?}");

		Ok(booking)
	}
}
