use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use validator::Validate;

use crate::models::{GarageFilter, NewGarage, PrimitiveGarage};
use crate::schemas::garage::{
	CreateGarageRequest,
	GarageResponse,
	UpdateGarageRequest,
};
use crate::session::Session;
use crate::{DbPool, Error};

#[instrument(skip(pool))]
pub async fn create_garage(
	State(pool): State<DbPool>,
	session: Session,
	Json(request): Json<CreateGarageRequest>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	let conn = pool.get().await?;

	let new_garage = NewGarage {
		owner_id:        session.profile_id,
		name:            request.name,
		height:          request.height,
		width:           request.width,
		length:          request.length,
		kind:            request.kind,
		access:          request.access,
		price_per_hour:  request.price_per_hour,
		price_per_day:   request.price_per_day,
		price_per_month: request.price_per_month,
	};

	let garage = new_garage.insert(&conn).await?;

	Ok((StatusCode::CREATED, Json(GarageResponse::from(garage))))
}

#[instrument(skip(pool))]
pub async fn get_garages(
	State(pool): State<DbPool>,
	Query(filter): Query<GarageFilter>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let garages = PrimitiveGarage::search(filter, &conn).await?;
	let response: Vec<GarageResponse> =
		garages.into_iter().map(Into::into).collect();

	Ok((StatusCode::OK, Json(response)))
}

#[instrument(skip(pool))]
pub async fn get_garage(
	State(pool): State<DbPool>,
	Path(g_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let garage = PrimitiveGarage::get_by_id(g_id, &conn).await?;

	Ok((StatusCode::OK, Json(GarageResponse::from(garage))))
}

#[instrument(skip(pool))]
pub async fn update_garage(
	State(pool): State<DbPool>,
	session: Session,
	Path(g_id): Path<i32>,
	Json(request): Json<UpdateGarageRequest>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	let conn = pool.get().await?;

	let garage = PrimitiveGarage::get_by_id(g_id, &conn).await?;

	if garage.owner_id != session.profile_id {
		return Err(Error::Forbidden);
	}

	let garage = request.into_update().apply_to(g_id, &conn).await?;

	Ok((StatusCode::OK, Json(GarageResponse::from(garage))))
}

#[instrument(skip(pool))]
pub async fn delete_garage(
	State(pool): State<DbPool>,
	session: Session,
	Path(g_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let garage = PrimitiveGarage::get_by_id(g_id, &conn).await?;

	if garage.owner_id != session.profile_id {
		return Err(Error::Forbidden);
	}

	PrimitiveGarage::deactivate(g_id, &conn).await?;

	Ok(StatusCode::NO_CONTENT)
}
