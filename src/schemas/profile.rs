use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::PrimitiveProfile;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
	pub id:         i32,
	pub username:   String,
	pub email:      String,
	pub created_at: NaiveDateTime,
}

impl From<PrimitiveProfile> for ProfileResponse {
	fn from(value: PrimitiveProfile) -> Self {
		Self {
			id:         value.id,
			username:   value.username,
			email:      value.email,
			created_at: value.created_at,
		}
	}
}
