use axum::http::StatusCode;
use axum::response::IntoResponse;

pub mod booking;
pub mod garage;
pub mod profile;
pub mod schedule;
pub mod vehicle;

/// Confirm the service is alive
pub async fn healthcheck() -> impl IntoResponse { StatusCode::OK }
