use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use validator::Validate;

use crate::models::{NewVehicle, PrimitiveVehicle};
use crate::schemas::vehicle::{
	CreateVehicleRequest,
	UpdateVehicleRequest,
	VehicleResponse,
};
use crate::session::Session;
use crate::{DbPool, Error};

#[instrument(skip(pool))]
pub async fn create_vehicle(
	State(pool): State<DbPool>,
	session: Session,
	Json(request): Json<CreateVehicleRequest>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	let conn = pool.get().await?;

	let new_vehicle = NewVehicle {
		owner_id:      session.profile_id,
		plate:         request.plate,
		height:        request.height,
		width:         request.width,
		length:        request.length,
		min_clearance: request.min_clearance,
		covered_only:  request.covered_only,
	};

	let vehicle = new_vehicle.insert(&conn).await?;

	Ok((StatusCode::CREATED, Json(VehicleResponse::from(vehicle))))
}

#[instrument(skip(pool))]
pub async fn get_own_vehicles(
	State(pool): State<DbPool>,
	session: Session,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let vehicles =
		PrimitiveVehicle::for_owner(session.profile_id, &conn).await?;
	let response: Vec<VehicleResponse> =
		vehicles.into_iter().map(Into::into).collect();

	Ok((StatusCode::OK, Json(response)))
}

#[instrument(skip(pool))]
pub async fn update_vehicle(
	State(pool): State<DbPool>,
	session: Session,
	Path(v_id): Path<i32>,
	Json(request): Json<UpdateVehicleRequest>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	let conn = pool.get().await?;

	let vehicle = PrimitiveVehicle::get_by_id(v_id, &conn).await?;

	if vehicle.owner_id != session.profile_id {
		return Err(Error::Forbidden);
	}

	let vehicle = request.into_update().apply_to(v_id, &conn).await?;

	Ok((StatusCode::OK, Json(VehicleResponse::from(vehicle))))
}

#[instrument(skip(pool))]
pub async fn delete_vehicle(
	State(pool): State<DbPool>,
	session: Session,
	Path(v_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let vehicle = PrimitiveVehicle::get_by_id(v_id, &conn).await?;

	if vehicle.owner_id != session.profile_id {
		return Err(Error::Forbidden);
	}

	PrimitiveVehicle::delete_by_id(v_id, &conn).await?;

	Ok(StatusCode::NO_CONTENT)
}
