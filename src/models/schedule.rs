use chrono::{Datelike, NaiveDateTime, NaiveTime};
use diesel::pg::Pg;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::availability_schedule;
use crate::{DbConn, Error};

/// The outcome of checking a requested window against a garage's weekly
/// schedule
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleAvailability {
	pub available: bool,
	pub reasons:   Vec<String>,
}

impl ScheduleAvailability {
	fn ok() -> Self { Self { available: true, reasons: vec![] } }

	fn unavailable(reason: String) -> Self {
		Self { available: false, reasons: vec![reason] }
	}
}

#[derive(
	Clone, Debug, Deserialize, Identifiable, Queryable, Selectable, Serialize,
)]
#[diesel(table_name = availability_schedule)]
#[diesel(check_for_backend(Pg))]
pub struct PrimitiveAvailabilitySchedule {
	pub id:          i32,
	pub garage_id:   i32,
	pub day_of_week: i16,
	pub start_time:  NaiveTime,
	pub end_time:    NaiveTime,
	pub is_active:   bool,
	pub created_at:  NaiveDateTime,
}

impl PrimitiveAvailabilitySchedule {
	/// Get all the schedule rows for a garage, inactive ones included
	#[instrument(skip(conn))]
	pub async fn get_for_garage(
		g_id: i32,
		conn: &DbConn,
	) -> Result<Vec<Self>, Error> {
		let rows = conn
			.interact(move |conn| {
				use self::availability_schedule::dsl::*;

				availability_schedule
					.filter(garage_id.eq(g_id))
					.order((day_of_week.asc(), start_time.asc()))
					.select(Self::as_select())
					.get_results(conn)
			})
			.await??;

		Ok(rows)
	}

	/// Get the active schedule rows for a garage
	#[instrument(skip(conn))]
	pub async fn get_active_for_garage(
		g_id: i32,
		conn: &DbConn,
	) -> Result<Vec<Self>, Error> {
		let rows = conn
			.interact(move |conn| {
				use self::availability_schedule::dsl::*;

				availability_schedule
					.filter(garage_id.eq(g_id))
					.filter(is_active.eq(true))
					.order((day_of_week.asc(), start_time.asc()))
					.select(Self::as_select())
					.get_results(conn)
			})
			.await??;

		Ok(rows)
	}

	/// Check a requested window against the garage's active weekly schedule
	///
	/// Advisory only: the booking transaction does its own authoritative
	/// conflict check
	#[instrument(skip(conn))]
	pub async fn check_window(
		g_id: i32,
		start_time: NaiveDateTime,
		end_time: NaiveDateTime,
		conn: &DbConn,
	) -> Result<ScheduleAvailability, Error> {
		let rows = Self::get_active_for_garage(g_id, conn).await?;

		Ok(fit_in_windows(&rows, start_time, end_time))
	}

	/// Delete a schedule row given its id
	#[instrument(skip(conn))]
	pub async fn delete_by_id(s_id: i32, conn: &DbConn) -> Result<(), Error> {
		conn.interact(move |conn| {
			use self::availability_schedule::dsl::*;

			diesel::delete(availability_schedule.find(s_id)).execute(conn)
		})
		.await??;

		info!("deleted availability_schedule with id {s_id}");

		Ok(())
	}

	/// Delete all the schedule rows for a garage
	#[instrument(skip(conn))]
	pub async fn delete_by_garage_id(
		g_id: i32,
		conn: &DbConn,
	) -> Result<(), Error> {
		conn.interact(move |conn| {
			use self::availability_schedule::dsl::*;

			diesel::delete(availability_schedule.filter(garage_id.eq(g_id)))
				.execute(conn)
		})
		.await??;

		info!("deleted availability_schedules for garage with id {g_id}");

		Ok(())
	}
}

/// Decide whether `[start_time, end_time]` fits entirely inside one of the
/// garage's active weekly windows
///
/// A garage with no active rows has no bookable windows at all, and a
/// request spanning midnight is always rejected: each calendar day carries
/// its own independent windows
#[must_use]
pub fn fit_in_windows(
	rows: &[PrimitiveAvailabilitySchedule],
	start_time: NaiveDateTime,
	end_time: NaiveDateTime,
) -> ScheduleAvailability {
	if rows.is_empty() {
		return ScheduleAvailability::unavailable(
			"no availability configured".to_string(),
		);
	}

	if start_time.date() != end_time.date() {
		return ScheduleAvailability::unavailable(
			"requested window crosses midnight".to_string(),
		);
	}

	#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
	let day = start_time.weekday().num_days_from_sunday() as i16;

	let day_rows: Vec<&PrimitiveAvailabilitySchedule> =
		rows.iter().filter(|row| row.day_of_week == day).collect();

	if day_rows.is_empty() {
		return ScheduleAvailability::unavailable(
			"not available on this day".to_string(),
		);
	}

	let (start, end) = (start_time.time(), end_time.time());

	let contained = day_rows
		.iter()
		.any(|row| row.start_time <= start && end <= row.end_time);

	if contained {
		return ScheduleAvailability::ok();
	}

	let windows = day_rows
		.iter()
		.map(|row| {
			format!(
				"{}-{}",
				row.start_time.format("%H:%M"),
				row.end_time.format("%H:%M"),
			)
		})
		.collect::<Vec<String>>()
		.join(", ");

	ScheduleAvailability::unavailable(format!(
		"available windows on {}: {windows}",
		start_time.format("%A"),
	))
}

#[derive(Clone, Debug, Deserialize, Insertable, Serialize)]
#[diesel(table_name = availability_schedule)]
#[diesel(check_for_backend(Pg))]
pub struct NewAvailabilitySchedule {
	pub garage_id:   i32,
	pub day_of_week: i16,
	pub start_time:  NaiveTime,
	pub end_time:    NaiveTime,
	pub is_active:   bool,
}

impl NewAvailabilitySchedule {
	/// Insert a list of [`NewAvailabilitySchedule`] rows
	#[instrument(skip(conn))]
	pub async fn bulk_insert(
		rows: Vec<Self>,
		conn: &DbConn,
	) -> Result<Vec<PrimitiveAvailabilitySchedule>, Error> {
		let rows = conn
			.interact(|conn| {
				use self::availability_schedule::dsl::*;

				diesel::insert_into(availability_schedule)
					.values(rows)
					.returning(PrimitiveAvailabilitySchedule::as_returning())
					.get_results(conn)
			})
			.await??;

		Ok(rows)
	}
}
