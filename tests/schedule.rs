use chrono::{NaiveDateTime, NaiveTime};
use parqueo::models::{PrimitiveAvailabilitySchedule, fit_in_windows};

fn at(raw: &str) -> NaiveDateTime { raw.parse().unwrap() }

fn window(day_of_week: i16, start: &str, end: &str) -> PrimitiveAvailabilitySchedule {
	PrimitiveAvailabilitySchedule {
		id: 1,
		garage_id: 1,
		day_of_week,
		start_time: start.parse::<NaiveTime>().unwrap(),
		end_time: end.parse::<NaiveTime>().unwrap(),
		is_active: true,
		created_at: at("2025-06-01T00:00:00"),
	}
}

#[test]
fn no_schedule_rows_means_no_bookable_windows() {
	let result = fit_in_windows(
		&[],
		at("2025-06-11T10:00:00"),
		at("2025-06-11T11:00:00"),
	);

	assert!(!result.available);
	assert_eq!(result.reasons, vec![
		"no availability configured".to_string()
	]);
}

#[test]
fn requests_crossing_midnight_are_always_rejected() {
	// Wall-to-wall windows on every day would still not admit this
	let rows: Vec<_> =
		(0..7).map(|day| window(day, "00:00:00", "23:59:59")).collect();

	let result = fit_in_windows(
		&rows,
		at("2025-06-11T22:00:00"),
		at("2025-06-12T02:00:00"),
	);

	assert!(!result.available);
	assert_eq!(result.reasons, vec![
		"requested window crosses midnight".to_string()
	]);
}

#[test]
fn a_day_without_windows_is_unavailable() {
	// 2025-06-11 is a Wednesday (day 3); only Monday is configured
	let rows = vec![window(1, "08:00:00", "18:00:00")];

	let result = fit_in_windows(
		&rows,
		at("2025-06-11T10:00:00"),
		at("2025-06-11T11:00:00"),
	);

	assert!(!result.available);
	assert_eq!(result.reasons, vec!["not available on this day".to_string()]);
}

#[test]
fn a_request_matching_the_window_exactly_is_available() {
	let rows = vec![window(3, "08:00:00", "18:00:00")];

	let result = fit_in_windows(
		&rows,
		at("2025-06-11T08:00:00"),
		at("2025-06-11T18:00:00"),
	);

	assert!(result.available);
	assert!(result.reasons.is_empty());
}

#[test]
fn starting_one_minute_before_the_window_is_unavailable() {
	let rows = vec![window(3, "08:00:00", "18:00:00")];

	let result = fit_in_windows(
		&rows,
		at("2025-06-11T07:59:00"),
		at("2025-06-11T09:00:00"),
	);

	assert!(!result.available);
	assert_eq!(result.reasons, vec![
		"available windows on Wednesday: 08:00-18:00".to_string()
	]);
}

#[test]
fn split_shifts_admit_a_request_inside_either_window() {
	let rows = vec![
		window(3, "08:00:00", "12:00:00"),
		window(3, "14:00:00", "18:00:00"),
	];

	let morning = fit_in_windows(
		&rows,
		at("2025-06-11T09:00:00"),
		at("2025-06-11T11:00:00"),
	);
	let afternoon = fit_in_windows(
		&rows,
		at("2025-06-11T15:00:00"),
		at("2025-06-11T17:00:00"),
	);
	let straddling = fit_in_windows(
		&rows,
		at("2025-06-11T11:00:00"),
		at("2025-06-11T15:00:00"),
	);

	assert!(morning.available);
	assert!(afternoon.available);
	assert!(!straddling.available);
	assert_eq!(straddling.reasons, vec![
		"available windows on Wednesday: 08:00-12:00, 14:00-18:00"
			.to_string()
	]);
}
