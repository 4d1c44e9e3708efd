use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator_derive::Validate;

use crate::models::{PrimitiveVehicle, VehicleUpdate};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleResponse {
	pub id:            i32,
	pub owner_id:      i32,
	pub plate:         String,
	pub height:        Option<f64>,
	pub width:         Option<f64>,
	pub length:        Option<f64>,
	pub min_clearance: Option<f64>,
	pub covered_only:  bool,
	pub created_at:    NaiveDateTime,
	pub updated_at:    NaiveDateTime,
}

impl From<PrimitiveVehicle> for VehicleResponse {
	fn from(value: PrimitiveVehicle) -> Self {
		Self {
			id:            value.id,
			owner_id:      value.owner_id,
			plate:         value.plate,
			height:        value.height,
			width:         value.width,
			length:        value.length,
			min_clearance: value.min_clearance,
			covered_only:  value.covered_only,
			created_at:    value.created_at,
			updated_at:    value.updated_at,
		}
	}
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
	#[validate(length(min = 1, max = 20))]
	pub plate:         String,
	#[validate(range(min = 0.5, max = 6.0))]
	pub height:        Option<f64>,
	#[validate(range(min = 0.5, max = 4.0))]
	pub width:         Option<f64>,
	#[validate(range(min = 0.5, max = 15.0))]
	pub length:        Option<f64>,
	#[validate(range(min = 0.5, max = 6.0))]
	pub min_clearance: Option<f64>,
	#[serde(default)]
	pub covered_only:  bool,
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleRequest {
	#[validate(length(min = 1, max = 20))]
	pub plate:         Option<String>,
	#[validate(range(min = 0.5, max = 6.0))]
	pub height:        Option<f64>,
	#[validate(range(min = 0.5, max = 4.0))]
	pub width:         Option<f64>,
	#[validate(range(min = 0.5, max = 15.0))]
	pub length:        Option<f64>,
	#[validate(range(min = 0.5, max = 6.0))]
	pub min_clearance: Option<f64>,
	pub covered_only:  Option<bool>,
}

impl UpdateVehicleRequest {
	/// Convert this request into a database changeset
	#[must_use]
	pub fn into_update(self) -> VehicleUpdate {
		VehicleUpdate {
			plate:         self.plate,
			height:        self.height,
			width:         self.width,
			length:        self.length,
			min_clearance: self.min_clearance,
			covered_only:  self.covered_only,
		}
	}
}
