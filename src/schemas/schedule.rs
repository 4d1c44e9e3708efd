use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use validator_derive::Validate;

use crate::models::PrimitiveAvailabilitySchedule;
use crate::schemas::{default_true, hhmm};

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntryRequest {
	/// 0 = Sunday .. 6 = Saturday
	#[validate(range(min = 0, max = 6))]
	pub day_of_week: i16,
	#[serde(with = "hhmm")]
	pub start_time:  NaiveTime,
	#[serde(with = "hhmm")]
	pub end_time:    NaiveTime,
	#[serde(default = "default_true")]
	pub is_active:   bool,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntryResponse {
	pub id:          i32,
	pub garage_id:   i32,
	pub day_of_week: i16,
	#[serde(with = "hhmm")]
	pub start_time:  NaiveTime,
	#[serde(with = "hhmm")]
	pub end_time:    NaiveTime,
	pub is_active:   bool,
}

impl From<PrimitiveAvailabilitySchedule> for ScheduleEntryResponse {
	fn from(value: PrimitiveAvailabilitySchedule) -> Self {
		Self {
			id:          value.id,
			garage_id:   value.garage_id,
			day_of_week: value.day_of_week,
			start_time:  value.start_time,
			end_time:    value.end_time,
			is_active:   value.is_active,
		}
	}
}
