//! Database-backed admission control tests
//!
//! These need a reachable postgres server (`DATABASE_URL` with permission
//! to create databases) and are ignored by default.

mod common;

use axum::http::StatusCode;
use chrono::{Days, NaiveDateTime, TimeDelta, Utc};
use common::TestEnv;
use parqueo::error::{CreateBookingError, Error};
use parqueo::models::{
	AccessKind,
	BookingStatus,
	GarageKind,
	NewBooking,
	NewGarage,
	NewVehicle,
	PrimitiveBooking,
	PrimitiveGarage,
	PrimitiveVehicle,
	windows_overlap,
};
use parqueo::schemas::booking::{AvailabilityResponse, BookingResponse};
use parqueo::schemas::garage::GarageResponse;
use parqueo::schemas::vehicle::VehicleResponse;

fn at(raw: &str) -> NaiveDateTime { raw.parse().unwrap() }

/// A booking window starting tomorrow, safely inside the admission bounds
fn tomorrow_window(
	start_hour: u32,
	end_hour: u32,
) -> (NaiveDateTime, NaiveDateTime) {
	let tomorrow = Utc::now().date_naive().checked_add_days(Days::new(1)).unwrap();

	(
		tomorrow.and_hms_opt(start_hour, 0, 0).unwrap(),
		tomorrow.and_hms_opt(end_hour, 0, 0).unwrap(),
	)
}

/// Seed a garage with an all-week schedule and a vehicle through the API
async fn seed_garage_and_vehicle(env: &TestEnv) -> (i32, i32) {
	let response = env
		.app
		.post("/garages")
		.json(&serde_json::json!({
			"name": "Garage Centro",
			"height": 2.5,
			"width": 2.5,
			"length": 5.5,
			"kind": "Covered",
			"pricePerHour": 10.0,
		}))
		.await;
	assert_eq!(response.status_code(), StatusCode::CREATED);
	let garage = response.json::<GarageResponse>();

	let schedule: Vec<serde_json::Value> = (0..7)
		.map(|day| {
			serde_json::json!({
				"dayOfWeek": day,
				"startTime": "00:00",
				"endTime": "23:59",
			})
		})
		.collect();

	let response = env
		.app
		.post(&format!("/garages/{}/schedule", garage.id))
		.json(&schedule)
		.await;
	assert_eq!(response.status_code(), StatusCode::CREATED);

	let response = env
		.app
		.post("/vehicles")
		.json(&serde_json::json!({
			"plate": "ABC123",
			"height": 1.8,
		}))
		.await;
	assert_eq!(response.status_code(), StatusCode::CREATED);
	let vehicle = response.json::<VehicleResponse>();

	(garage.id, vehicle.id)
}

/// Seed a garage and vehicle directly through the models, for tests that
/// drive `insert_atomic` without the handler pipeline
async fn seed_rows(env: &TestEnv) -> (PrimitiveGarage, PrimitiveVehicle) {
	let conn = env.pool.get().await.unwrap();

	let garage = NewGarage {
		owner_id:        env.profile_id,
		name:            "Garage Norte".to_string(),
		height:          2.5,
		width:           2.5,
		length:          5.5,
		kind:            GarageKind::Covered,
		access:          AccessKind::Remote,
		price_per_hour:  Some(10.0),
		price_per_day:   None,
		price_per_month: None,
	}
	.insert(&conn)
	.await
	.unwrap();

	let vehicle = NewVehicle {
		owner_id:      env.profile_id,
		plate:         "XYZ789".to_string(),
		height:        Some(1.8),
		width:         None,
		length:        None,
		min_clearance: None,
		covered_only:  false,
	}
	.insert(&conn)
	.await
	.unwrap();

	(garage, vehicle)
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a running postgres database"]
async fn create_booking_through_the_full_pipeline() {
	let env = TestEnv::new().await;
	let (garage_id, vehicle_id) = seed_garage_and_vehicle(&env).await;

	let (start_time, end_time) = tomorrow_window(10, 12);

	let response = env
		.app
		.post(&format!("/garages/{garage_id}/bookings"))
		.json(&serde_json::json!({
			"vehicleId": vehicle_id,
			"startTime": start_time,
			"endTime": end_time,
		}))
		.await;

	assert_eq!(response.status_code(), StatusCode::CREATED);

	let body = response.json::<BookingResponse>();

	assert_eq!(body.status, BookingStatus::Pending);
	// Two hours at $10, plus a possible weekend surcharge on the start day
	assert!(body.total_price >= 20.0);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a running postgres database"]
async fn overlapping_booking_is_a_conflict() {
	let env = TestEnv::new().await;
	let (garage_id, vehicle_id) = seed_garage_and_vehicle(&env).await;

	let (start_time, end_time) = tomorrow_window(10, 12);

	let request = serde_json::json!({
		"vehicleId": vehicle_id,
		"startTime": start_time,
		"endTime": end_time,
	});

	let response = env
		.app
		.post(&format!("/garages/{garage_id}/bookings"))
		.json(&request)
		.await;
	assert_eq!(response.status_code(), StatusCode::CREATED);

	let response = env
		.app
		.post(&format!("/garages/{garage_id}/bookings"))
		.json(&request)
		.await;
	assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a running postgres database"]
async fn adjacent_bookings_are_not_conflicts() {
	let env = TestEnv::new().await;
	let (garage_id, vehicle_id) = seed_garage_and_vehicle(&env).await;

	let (first_start, first_end) = tomorrow_window(10, 12);
	let (second_start, second_end) = tomorrow_window(12, 14);

	let response = env
		.app
		.post(&format!("/garages/{garage_id}/bookings"))
		.json(&serde_json::json!({
			"vehicleId": vehicle_id,
			"startTime": first_start,
			"endTime": first_end,
		}))
		.await;
	assert_eq!(response.status_code(), StatusCode::CREATED);

	let response = env
		.app
		.post(&format!("/garages/{garage_id}/bookings"))
		.json(&serde_json::json!({
			"vehicleId": vehicle_id,
			"startTime": second_start,
			"endTime": second_end,
		}))
		.await;
	assert_eq!(response.status_code(), StatusCode::CREATED);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a running postgres database"]
async fn concurrent_identical_windows_admit_exactly_one_winner() {
	let env = TestEnv::new().await;
	let (garage, vehicle) = seed_rows(&env).await;

	let mut conns = vec![];
	for _ in 0..8 {
		conns.push(env.pool.get().await.unwrap());
	}

	let results = futures::future::join_all(conns.iter().map(|conn| {
		NewBooking {
			profile_id:  env.profile_id,
			garage_id:   garage.id,
			vehicle_id:  vehicle.id,
			start_time:  at("2030-01-15T10:00:00"),
			end_time:    at("2030-01-15T11:00:00"),
			total_price: 10.0,
		}
		.insert_atomic(conn)
	}))
	.await;

	let winners = results.iter().filter(|result| result.is_ok()).count();

	assert_eq!(winners, 1);

	for result in results.iter().filter(|result| result.is_err()) {
		assert!(matches!(
			result.as_ref().unwrap_err(),
			Error::CreateBookingError(CreateBookingError::SlotTaken),
		));
	}
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a running postgres database"]
async fn concurrent_disjoint_windows_all_succeed() {
	let env = TestEnv::new().await;
	let (garage, vehicle) = seed_rows(&env).await;

	let mut conns = vec![];
	for _ in 0..4 {
		conns.push(env.pool.get().await.unwrap());
	}

	let base = at("2030-01-15T08:00:00");

	let results =
		futures::future::join_all(conns.iter().enumerate().map(
			|(i, conn)| {
				let offset = TimeDelta::hours(2 * i as i64);

				NewBooking {
					profile_id:  env.profile_id,
					garage_id:   garage.id,
					vehicle_id:  vehicle.id,
					start_time:  base + offset,
					end_time:    base + offset + TimeDelta::hours(2),
					total_price: 20.0,
				}
				.insert_atomic(conn)
			},
		))
		.await;

	assert!(results.iter().all(Result::is_ok));
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a running postgres database"]
async fn cancelled_bookings_release_their_window() {
	let env = TestEnv::new().await;
	let (garage, vehicle) = seed_rows(&env).await;

	let conn = env.pool.get().await.unwrap();

	let booking = NewBooking {
		profile_id:  env.profile_id,
		garage_id:   garage.id,
		vehicle_id:  vehicle.id,
		start_time:  at("2030-01-15T10:00:00"),
		end_time:    at("2030-01-15T12:00:00"),
		total_price: 20.0,
	}
	.insert_atomic(&conn)
	.await
	.unwrap();

	PrimitiveBooking::transition(booking.id, BookingStatus::Cancelled, &conn)
		.await
		.unwrap();

	// The same window is admissible again
	let second = NewBooking {
		profile_id:  env.profile_id,
		garage_id:   garage.id,
		vehicle_id:  vehicle.id,
		start_time:  at("2030-01-15T10:00:00"),
		end_time:    at("2030-01-15T12:00:00"),
		total_price: 20.0,
	}
	.insert_atomic(&conn)
	.await;

	assert!(second.is_ok());

	// The claim-holding bookings on the garage stay pairwise disjoint
	let bookings = PrimitiveBooking::for_garage(
		garage.id,
		parqueo::models::BookingFilter::default(),
		&conn,
	)
	.await
	.unwrap();

	let blocking: Vec<_> =
		bookings.iter().filter(|b| b.status.is_blocking()).collect();

	for (i, a) in blocking.iter().enumerate() {
		for b in blocking.iter().skip(i + 1) {
			assert!(!windows_overlap(
				a.start_time,
				a.end_time,
				b.start_time,
				b.end_time,
			));
		}
	}
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a running postgres database"]
async fn lifecycle_transitions_run_to_completion_and_stay_terminal() {
	let env = TestEnv::new().await;
	let (garage_id, vehicle_id) = seed_garage_and_vehicle(&env).await;

	let (start_time, end_time) = tomorrow_window(10, 12);

	let response = env
		.app
		.post(&format!("/garages/{garage_id}/bookings"))
		.json(&serde_json::json!({
			"vehicleId": vehicle_id,
			"startTime": start_time,
			"endTime": end_time,
		}))
		.await;
	assert_eq!(response.status_code(), StatusCode::CREATED);
	let booking = response.json::<BookingResponse>();

	for (path, expected) in [
		("confirm", BookingStatus::Confirmed),
		("check-in", BookingStatus::Active),
		("check-out", BookingStatus::Completed),
	] {
		let response =
			env.app.post(&format!("/bookings/{}/{path}", booking.id)).await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(response.json::<BookingResponse>().status, expected);
	}

	// Completed is terminal
	let response =
		env.app.post(&format!("/bookings/{}/cancel", booking.id)).await;

	assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a running postgres database"]
async fn garage_without_schedule_rejects_all_bookings() {
	let env = TestEnv::new().await;

	let response = env
		.app
		.post("/garages")
		.json(&serde_json::json!({
			"name": "Garage Sur",
			"height": 2.5,
			"width": 2.5,
			"length": 5.5,
			"pricePerHour": 10.0,
		}))
		.await;
	assert_eq!(response.status_code(), StatusCode::CREATED);
	let garage = response.json::<GarageResponse>();

	let response = env
		.app
		.post("/vehicles")
		.json(&serde_json::json!({ "plate": "DEF456" }))
		.await;
	let vehicle = response.json::<VehicleResponse>();

	let (start_time, end_time) = tomorrow_window(10, 12);

	let response = env
		.app
		.post(&format!("/garages/{}/bookings", garage.id))
		.json(&serde_json::json!({
			"vehicleId": vehicle.id,
			"startTime": start_time,
			"endTime": end_time,
		}))
		.await;

	assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a running postgres database"]
async fn advisory_availability_reflects_fresh_bookings() {
	let env = TestEnv::new().await;
	let (garage_id, vehicle_id) = seed_garage_and_vehicle(&env).await;

	let (start_time, end_time) = tomorrow_window(10, 12);
	let date = start_time.date();

	let response = env
		.app
		.get(&format!("/garages/{garage_id}/availability"))
		.add_query_param("date", date)
		.add_query_param("startTime", "10:00")
		.add_query_param("endTime", "11:00")
		.await;
	assert_eq!(response.status_code(), StatusCode::OK);
	assert!(response.json::<AvailabilityResponse>().available);

	let response = env
		.app
		.post(&format!("/garages/{garage_id}/bookings"))
		.json(&serde_json::json!({
			"vehicleId": vehicle_id,
			"startTime": start_time,
			"endTime": end_time,
		}))
		.await;
	assert_eq!(response.status_code(), StatusCode::CREATED);

	// The booking invalidated the cached day, so the advisory check sees it
	let response = env
		.app
		.get(&format!("/garages/{garage_id}/availability"))
		.add_query_param("date", date)
		.add_query_param("startTime", "10:00")
		.add_query_param("endTime", "11:00")
		.await;
	assert_eq!(response.status_code(), StatusCode::OK);

	let body = response.json::<AvailabilityResponse>();

	assert!(!body.available);
	assert!(
		body.reasons
			.iter()
			.any(|reason| reason.contains("already booked"))
	);
}
