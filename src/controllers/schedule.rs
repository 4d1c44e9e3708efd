use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use validator::Validate;

use crate::models::{
	NewAvailabilitySchedule,
	PrimitiveAvailabilitySchedule,
	PrimitiveGarage,
};
use crate::schemas::schedule::{ScheduleEntryRequest, ScheduleEntryResponse};
use crate::session::Session;
use crate::{DbPool, Error};

#[instrument(skip(pool))]
pub async fn get_schedule(
	State(pool): State<DbPool>,
	Path(g_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	// 404 for unknown garages instead of an empty schedule
	PrimitiveGarage::get_by_id(g_id, &conn).await?;

	let rows =
		PrimitiveAvailabilitySchedule::get_for_garage(g_id, &conn).await?;
	let response: Vec<ScheduleEntryResponse> =
		rows.into_iter().map(Into::into).collect();

	Ok((StatusCode::OK, Json(response)))
}

#[instrument(skip(pool))]
pub async fn create_schedule_entries(
	State(pool): State<DbPool>,
	session: Session,
	Path(g_id): Path<i32>,
	Json(request): Json<Vec<ScheduleEntryRequest>>,
) -> Result<impl IntoResponse, Error> {
	for entry in &request {
		entry.validate()?;

		if entry.end_time <= entry.start_time {
			return Err(Error::ValidationError(
				"schedule windows must end after they start".to_string(),
			));
		}
	}

	let conn = pool.get().await?;

	let garage = PrimitiveGarage::get_by_id(g_id, &conn).await?;

	if garage.owner_id != session.profile_id {
		return Err(Error::Forbidden);
	}

	let rows = request
		.into_iter()
		.map(|entry| {
			NewAvailabilitySchedule {
				garage_id:   g_id,
				day_of_week: entry.day_of_week,
				start_time:  entry.start_time,
				end_time:    entry.end_time,
				is_active:   entry.is_active,
			}
		})
		.collect();

	let rows = NewAvailabilitySchedule::bulk_insert(rows, &conn).await?;
	let response: Vec<ScheduleEntryResponse> =
		rows.into_iter().map(Into::into).collect();

	Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(pool))]
pub async fn delete_schedule_entry(
	State(pool): State<DbPool>,
	session: Session,
	Path((g_id, s_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let garage = PrimitiveGarage::get_by_id(g_id, &conn).await?;

	if garage.owner_id != session.profile_id {
		return Err(Error::Forbidden);
	}

	PrimitiveAvailabilitySchedule::delete_by_id(s_id, &conn).await?;

	Ok(StatusCode::NO_CONTENT)
}
