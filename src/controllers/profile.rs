use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::models::PrimitiveProfile;
use crate::schemas::profile::ProfileResponse;
use crate::session::Session;
use crate::{DbPool, Error};

#[instrument(skip(pool))]
pub async fn get_current_profile(
	State(pool): State<DbPool>,
	session: Session,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let profile =
		PrimitiveProfile::get_by_id(session.profile_id, &conn).await?;

	Ok((StatusCode::OK, Json(ProfileResponse::from(profile))))
}
