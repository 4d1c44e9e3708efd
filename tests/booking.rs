use chrono::{NaiveDateTime, TimeDelta};
use parqueo::error::{CreateBookingError, Error};
use parqueo::models::{
	BookingStatus,
	check_booking_window,
	windows_overlap,
};

fn at(raw: &str) -> NaiveDateTime { raw.parse().unwrap() }

#[test]
fn overlapping_windows_are_detected() {
	assert!(windows_overlap(
		at("2025-06-11T10:00:00"),
		at("2025-06-11T12:00:00"),
		at("2025-06-11T11:00:00"),
		at("2025-06-11T13:00:00"),
	));

	// Full containment counts as overlap in both directions
	assert!(windows_overlap(
		at("2025-06-11T10:00:00"),
		at("2025-06-11T14:00:00"),
		at("2025-06-11T11:00:00"),
		at("2025-06-11T12:00:00"),
	));
	assert!(windows_overlap(
		at("2025-06-11T11:00:00"),
		at("2025-06-11T12:00:00"),
		at("2025-06-11T10:00:00"),
		at("2025-06-11T14:00:00"),
	));
}

#[test]
fn half_open_windows_may_touch() {
	// A booking ending at 12:00 does not conflict with one starting at 12:00
	assert!(!windows_overlap(
		at("2025-06-11T10:00:00"),
		at("2025-06-11T12:00:00"),
		at("2025-06-11T12:00:00"),
		at("2025-06-11T14:00:00"),
	));
	assert!(!windows_overlap(
		at("2025-06-11T12:00:00"),
		at("2025-06-11T14:00:00"),
		at("2025-06-11T10:00:00"),
		at("2025-06-11T12:00:00"),
	));
}

#[test]
fn disjoint_windows_do_not_overlap() {
	assert!(!windows_overlap(
		at("2025-06-11T08:00:00"),
		at("2025-06-11T09:00:00"),
		at("2025-06-11T10:00:00"),
		at("2025-06-11T11:00:00"),
	));
}

#[test]
fn window_checks_reject_each_time_constraint() {
	let now = at("2025-06-11T12:00:00");

	let err = check_booking_window(
		now,
		at("2025-06-11T10:00:00"),
		at("2025-06-11T11:00:00"),
	)
	.unwrap_err();
	assert!(matches!(
		err,
		Error::CreateBookingError(CreateBookingError::StartInPast),
	));

	let err = check_booking_window(
		now,
		at("2025-06-11T14:00:00"),
		at("2025-06-11T14:00:00"),
	)
	.unwrap_err();
	assert!(matches!(
		err,
		Error::CreateBookingError(CreateBookingError::EndNotAfterStart),
	));

	let err = check_booking_window(
		now,
		at("2025-06-11T14:00:00"),
		at("2025-06-11T14:20:00"),
	)
	.unwrap_err();
	assert!(matches!(
		err,
		Error::CreateBookingError(CreateBookingError::TooShort(_)),
	));

	let err = check_booking_window(
		now,
		at("2025-06-11T14:00:00"),
		at("2025-06-12T15:00:00"),
	)
	.unwrap_err();
	assert!(matches!(
		err,
		Error::CreateBookingError(CreateBookingError::TooLong(_)),
	));

	let err = check_booking_window(
		now,
		now + TimeDelta::days(31),
		now + TimeDelta::days(31) + TimeDelta::hours(1),
	)
	.unwrap_err();
	assert!(matches!(
		err,
		Error::CreateBookingError(CreateBookingError::TooFarAhead(_)),
	));
}

#[test]
fn a_valid_window_passes_every_time_constraint() {
	let now = at("2025-06-11T12:00:00");

	assert!(
		check_booking_window(
			now,
			at("2025-06-12T10:00:00"),
			at("2025-06-12T12:00:00"),
		)
		.is_ok()
	);
}

#[test]
fn lifecycle_allows_exactly_the_documented_transitions() {
	use BookingStatus::{Active, Cancelled, Completed, Confirmed, Pending};

	assert!(Pending.can_transition_to(Confirmed));
	assert!(Pending.can_transition_to(Cancelled));
	assert!(Confirmed.can_transition_to(Active));
	assert!(Confirmed.can_transition_to(Cancelled));
	assert!(Active.can_transition_to(Completed));

	// No skips
	assert!(!Pending.can_transition_to(Active));
	assert!(!Pending.can_transition_to(Completed));
	assert!(!Confirmed.can_transition_to(Completed));

	// No leaving a terminal state, no self-loops
	for status in [Pending, Confirmed, Active, Completed, Cancelled] {
		assert!(!Completed.can_transition_to(status));
		assert!(!Cancelled.can_transition_to(status));
		assert!(!status.can_transition_to(status));
	}

	// Cancelled and completed bookings release their claim
	assert!(Pending.is_blocking());
	assert!(Confirmed.is_blocking());
	assert!(Active.is_blocking());
	assert!(!Completed.is_blocking());
	assert!(!Cancelled.is_blocking());
}
