//! Library-wide error types and [`From`] impls

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use diesel::result::DatabaseErrorKind;
use thiserror::Error;

use crate::models::BookingStatus;

/// Top level application error, can be converted into a [`Response`]
#[derive(Debug, Error)]
pub enum Error {
	/// Any error related to admitting a new booking
	#[error(transparent)]
	CreateBookingError(#[from] CreateBookingError),
	/// Request/operation forbidden
	#[error("forbidden")]
	Forbidden,
	/// Opaque internal server error
	#[error("internal server error")]
	InternalServerError,
	/// A booking lifecycle transition that the state machine does not allow
	#[error("cannot move a booking from {from:?} to {to:?}")]
	InvalidTransition { from: BookingStatus, to: BookingStatus },
	/// Resource not found
	#[error("not found - {0}")]
	NotFound(String),
	/// Invalid or missing token
	#[error(transparent)]
	TokenError(#[from] TokenError),
	/// Resource could not be validated
	#[error("{0}")]
	ValidationError(String),
}

impl Error {
	/// Return a unique identifying code for this error
	///
	/// When modifying this function the error code should only ever increase,
	/// an error code should never be reused once its assigned to avoid
	/// unexpectedly breaking the frontend
	fn code(&self) -> i32 {
		match self {
			Self::Forbidden => 1,
			Self::InternalServerError => 2,
			Self::NotFound(_) => 3,
			Self::TokenError(e) => {
				match e {
					TokenError::MissingAccessToken => 4,
					TokenError::MissingSession => 5,
				}
			},
			Self::CreateBookingError(e) => {
				match e {
					CreateBookingError::StartInPast => 6,
					CreateBookingError::EndNotAfterStart => 7,
					CreateBookingError::TooShort(_) => 8,
					CreateBookingError::TooLong(_) => 9,
					CreateBookingError::TooFarAhead(_) => 10,
					CreateBookingError::Incompatible(_) => 11,
					CreateBookingError::OutsideSchedule(_) => 12,
					CreateBookingError::SlotTaken => 13,
					CreateBookingError::NoPricing => 14,
				}
			},
			Self::ValidationError(_) => 15,
			Self::InvalidTransition { .. } => 16,
		}
	}

	/// Return additional information about the error
	fn info(&self) -> Option<String> {
		match self {
			Self::NotFound(m) | Self::ValidationError(m) => Some(m.to_owned()),
			Self::CreateBookingError(e) => {
				match e {
					CreateBookingError::TooShort(min) => {
						Some(serde_json::json!({"minMinutes": min}).to_string())
					},
					CreateBookingError::TooLong(max) => {
						Some(serde_json::json!({"maxHours": max}).to_string())
					},
					CreateBookingError::TooFarAhead(days) => {
						Some(serde_json::json!({"maxDays": days}).to_string())
					},
					CreateBookingError::Incompatible(issues) => {
						Some(serde_json::json!({"issues": issues}).to_string())
					},
					CreateBookingError::OutsideSchedule(reasons) => {
						Some(
							serde_json::json!({"reasons": reasons}).to_string(),
						)
					},
					_ => None,
				}
			},
			Self::InvalidTransition { from, to } => Some(
				serde_json::json!({
					"from": format!("{from:?}"),
					"to": format!("{to:?}"),
				})
				.to_string(),
			),
			_ => None,
		}
	}
}

/// Convert an error into a [`Response`]
impl IntoResponse for Error {
	fn into_response(self) -> Response {
		error!("{self:?}");

		let message = self.to_string();

		let data = serde_json::json!({
			"message": message,
			"code": self.code(),
			"info": self.info(),
		});

		let status = match self {
			Self::CreateBookingError(CreateBookingError::SlotTaken)
			| Self::InvalidTransition { .. } => StatusCode::CONFLICT,
			Self::CreateBookingError(_) => StatusCode::BAD_REQUEST,
			Self::Forbidden => StatusCode::FORBIDDEN,
			Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
			Self::NotFound(_) => StatusCode::NOT_FOUND,
			Self::TokenError(_) => StatusCode::UNAUTHORIZED,
			Self::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
		};

		(status, axum::Json(data)).into_response()
	}
}

/// Any error related to a token
#[derive(Debug, Error)]
pub enum TokenError {
	#[error("missing or invalid access token")]
	MissingAccessToken,
	#[error("missing session")]
	MissingSession,
}

/// Any error related to admitting a new booking
#[derive(Debug, Error)]
pub enum CreateBookingError {
	/// The requested window starts before the current time
	#[error("booking cannot start in the past")]
	StartInPast,
	/// The requested window ends at or before its start
	#[error("booking must end after it starts")]
	EndNotAfterStart,
	/// The requested window is shorter than the minimum duration (minutes)
	#[error("booking is shorter than the minimum duration")]
	TooShort(i64),
	/// The requested window is longer than the maximum duration (hours)
	#[error("booking is longer than the maximum duration")]
	TooLong(i64),
	/// The requested window starts more than the allowed days ahead
	#[error("booking starts too far in the future")]
	TooFarAhead(i64),
	/// The vehicle does not fit the garage
	#[error("vehicle is not compatible with this garage")]
	Incompatible(Vec<String>),
	/// The requested window falls outside the garage's weekly schedule
	#[error("garage is not available in the requested window")]
	OutsideSchedule(Vec<String>),
	/// Another booking holds (or just claimed) an overlapping window
	#[error("time slot is no longer available")]
	SlotTaken,
	/// The garage has no price configured for any tier
	#[error("no pricing available for this garage")]
	NoPricing,
}

/// A list of possible internal errors
///
/// API end users should never see these details
#[derive(Debug, Error)]
pub enum InternalServerError {
	/// Error executing some database operation
	#[error("database error -- {0:?}")]
	DatabaseError(diesel::result::Error),
	/// Error interacting with a database connection
	#[error("database interaction error -- {0:?}")]
	DatabaseInteractionError(deadpool_diesel::InteractError),
	/// Error acquiring database pool connection
	#[error("database pool error -- {0:?}")]
	PoolError(deadpool_diesel::PoolError),
	/// Error executing some redis operation
	#[error("redis error -- {0:?}")]
	RedisError(redis::RedisError),
	/// Error related to `serde_json`
	#[error("serde_json error -- {0:?}")]
	SerdeJsonError(serde_json::Error),
}

// Map internal server errors to application errors
impl From<InternalServerError> for Error {
	fn from(value: InternalServerError) -> Self {
		error!("internal server error -- {value}");

		Self::InternalServerError
	}
}

/// Map validation errors to application errors
impl From<validator::ValidationErrors> for Error {
	fn from(err: validator::ValidationErrors) -> Self {
		let errs = err.field_errors();
		let repr = errs
			.values()
			.map(|v| {
				v.iter()
					.map(ToString::to_string)
					.collect::<Vec<String>>()
					.join("\n")
			})
			.collect::<Vec<String>>()
			.join("\n");

		Self::ValidationError(repr)
	}
}

/// Map database interaction errors to application errors
impl From<deadpool_diesel::InteractError> for Error {
	fn from(value: deadpool_diesel::InteractError) -> Self {
		InternalServerError::DatabaseInteractionError(value).into()
	}
}

/// Map database result errors to application errors.
impl From<diesel::result::Error> for Error {
	fn from(err: diesel::result::Error) -> Self {
		match &err {
			// No rows returned by query that expected at least one
			diesel::result::Error::NotFound => {
				Self::NotFound("no context provided".to_string())
			},
			// A concurrent admission won the race; the caller lost
			diesel::result::Error::DatabaseError(
				DatabaseErrorKind::SerializationFailure,
				_,
			) => CreateBookingError::SlotTaken.into(),
			// A lock-wait timeout counts as losing the race as well
			diesel::result::Error::DatabaseError(
				DatabaseErrorKind::Unknown,
				info,
			) if info.message().contains("lock timeout") => {
				CreateBookingError::SlotTaken.into()
			},
			// Foreign key constraint violation
			diesel::result::Error::DatabaseError(
				DatabaseErrorKind::ForeignKeyViolation,
				info,
			) => Error::ValidationError(info.message().to_string()),
			_ => InternalServerError::DatabaseError(err).into(),
		}
	}
}

impl From<deadpool_diesel::PoolError> for Error {
	fn from(value: deadpool_diesel::PoolError) -> Self {
		InternalServerError::PoolError(value).into()
	}
}

impl From<redis::RedisError> for Error {
	fn from(err: redis::RedisError) -> Self {
		InternalServerError::RedisError(err).into()
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		InternalServerError::SerdeJsonError(err).into()
	}
}
