use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator_derive::Validate;

use crate::models::{AccessKind, GarageKind, GarageUpdate, PrimitiveGarage};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GarageResponse {
	pub id:              i32,
	pub owner_id:        i32,
	pub name:            String,
	pub height:          f64,
	pub width:           f64,
	pub length:          f64,
	pub kind:            GarageKind,
	pub access:          AccessKind,
	pub price_per_hour:  Option<f64>,
	pub price_per_day:   Option<f64>,
	pub price_per_month: Option<f64>,
	pub is_active:       bool,
	pub created_at:      NaiveDateTime,
	pub updated_at:      NaiveDateTime,
}

impl From<PrimitiveGarage> for GarageResponse {
	fn from(value: PrimitiveGarage) -> Self {
		Self {
			id:              value.id,
			owner_id:        value.owner_id,
			name:            value.name,
			height:          value.height,
			width:           value.width,
			length:          value.length,
			kind:            value.kind,
			access:          value.access,
			price_per_hour:  value.price_per_hour,
			price_per_day:   value.price_per_day,
			price_per_month: value.price_per_month,
			is_active:       value.is_active,
			created_at:      value.created_at,
			updated_at:      value.updated_at,
		}
	}
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGarageRequest {
	#[validate(length(min = 1, max = 100))]
	pub name:            String,
	/// Plausible clearance for a parking structure
	#[validate(range(min = 1.5, max = 5.0))]
	pub height:          f64,
	#[validate(range(min = 1.0, max = 10.0))]
	pub width:           f64,
	#[validate(range(min = 1.0, max = 20.0))]
	pub length:          f64,
	#[serde(default)]
	pub kind:            GarageKind,
	#[serde(default)]
	pub access:          AccessKind,
	#[validate(range(min = 0.0))]
	pub price_per_hour:  Option<f64>,
	#[validate(range(min = 0.0))]
	pub price_per_day:   Option<f64>,
	#[validate(range(min = 0.0))]
	pub price_per_month: Option<f64>,
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGarageRequest {
	#[validate(length(min = 1, max = 100))]
	pub name:            Option<String>,
	#[validate(range(min = 1.5, max = 5.0))]
	pub height:          Option<f64>,
	#[validate(range(min = 1.0, max = 10.0))]
	pub width:           Option<f64>,
	#[validate(range(min = 1.0, max = 20.0))]
	pub length:          Option<f64>,
	pub kind:            Option<GarageKind>,
	pub access:          Option<AccessKind>,
	#[validate(range(min = 0.0))]
	pub price_per_hour:  Option<f64>,
	#[validate(range(min = 0.0))]
	pub price_per_day:   Option<f64>,
	#[validate(range(min = 0.0))]
	pub price_per_month: Option<f64>,
	pub is_active:       Option<bool>,
}

impl UpdateGarageRequest {
	/// Convert this request into a database changeset
	#[must_use]
	pub fn into_update(self) -> GarageUpdate {
		GarageUpdate {
			name:            self.name,
			height:          self.height,
			width:           self.width,
			length:          self.length,
			kind:            self.kind,
			access:          self.access,
			price_per_hour:  self.price_per_hour,
			price_per_day:   self.price_per_day,
			price_per_month: self.price_per_month,
			is_active:       self.is_active,
		}
	}
}
