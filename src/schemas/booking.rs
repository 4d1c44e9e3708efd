use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::{BookingStatus, PrimitiveBooking};
use crate::pricing::{PriceQuote, PriceTier};
use crate::schemas::hhmm;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
	pub id:          i32,
	pub profile_id:  i32,
	pub garage_id:   i32,
	pub vehicle_id:  i32,
	pub start_time:  NaiveDateTime,
	pub end_time:    NaiveDateTime,
	pub total_price: f64,
	pub status:      BookingStatus,
	pub created_at:  NaiveDateTime,
	pub updated_at:  NaiveDateTime,
}

impl From<PrimitiveBooking> for BookingResponse {
	fn from(value: PrimitiveBooking) -> Self {
		Self {
			id:          value.id,
			profile_id:  value.profile_id,
			garage_id:   value.garage_id,
			vehicle_id:  value.vehicle_id,
			start_time:  value.start_time,
			end_time:    value.end_time,
			total_price: value.total_price,
			status:      value.status,
			created_at:  value.created_at,
			updated_at:  value.updated_at,
		}
	}
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
	pub vehicle_id: i32,
	pub start_time: NaiveDateTime,
	pub end_time:   NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleBookingRequest {
	pub start_time: NaiveDateTime,
	pub end_time:   NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
	pub start_time: NaiveDateTime,
	pub end_time:   NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
	pub total:     f64,
	pub tier:      PriceTier,
	pub breakdown: String,
}

impl From<PriceQuote> for QuoteResponse {
	fn from(value: PriceQuote) -> Self {
		Self {
			total:     value.total,
			tier:      value.tier,
			breakdown: value.breakdown,
		}
	}
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
	pub date:       NaiveDate,
	#[serde(default, with = "hhmm::option")]
	pub start_time: Option<NaiveTime>,
	#[serde(default, with = "hhmm::option")]
	pub end_time:   Option<NaiveTime>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
	pub available: bool,
	pub reasons:   Vec<String>,
}
