//! Tiered price computation
//!
//! Pure: the engine works from a [`GaragePricing`] snapshot and a requested
//! window, never from the database. Quoting is deliberately wider than
//! admission: windows the creation flow would reject (multi-day stays) can
//! still be priced.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{CreateBookingError, Error};
use crate::models::GaragePricing;

/// The pricing unit selected for a quote
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PriceTier {
	Hourly,
	Daily,
	Monthly,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingOptions {
	pub peak_hour_multiplier: f64,
	pub weekend_multiplier:   f64,
	pub minimum_hours:        f64,
}

impl Default for PricingOptions {
	fn default() -> Self {
		Self {
			peak_hour_multiplier: 1.2,
			weekend_multiplier:   1.1,
			minimum_hours:        1.0,
		}
	}
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
	pub total:     f64,
	pub tier:      PriceTier,
	pub breakdown: String,
}

fn round_to_cents(value: f64) -> f64 { (value * 100.0).round() / 100.0 }

/// Whether a weekday start falls in the morning or evening rush window
fn is_peak_start(start_time: NaiveDateTime) -> bool {
	let weekday = start_time.weekday();

	if matches!(weekday, Weekday::Sat | Weekday::Sun) {
		return false;
	}

	let hour = start_time.hour();

	(7..9).contains(&hour) || (17..19).contains(&hour)
}

/// Compute the total price for a window against a garage's price tiers
///
/// Tier priority: hourly below 24 hours, daily below 7 days, monthly from
/// 7 days, then whatever tier the garage actually offers as a fallback.
/// Peak and weekend surcharges look at the start instant only and compose
/// multiplicatively
pub fn compute_price(
	pricing: &GaragePricing,
	start_time: NaiveDateTime,
	end_time: NaiveDateTime,
	options: &PricingOptions,
) -> Result<PriceQuote, Error> {
	if end_time <= start_time {
		return Err(CreateBookingError::EndNotAfterStart.into());
	}

	let minutes = (end_time - start_time).num_minutes();

	#[allow(clippy::cast_precision_loss)]
	let hours = (minutes as f64 / 60.0).max(options.minimum_hours);
	let days = hours / 24.0;

	let (tier, base, description) = match (
		pricing.price_per_hour,
		pricing.price_per_day,
		pricing.price_per_month,
	) {
		(Some(hourly), _, _) if hours < 24.0 => {
			let base = hourly * hours;

			(
				PriceTier::Hourly,
				base,
				format!("hourly ${hourly:.2} x {hours}h"),
			)
		},
		(_, Some(daily), _) if days < 7.0 => {
			let billed = days.ceil();
			let base = daily * billed;

			(
				PriceTier::Daily,
				base,
				format!("daily ${daily:.2} x {billed} day(s)"),
			)
		},
		(_, _, Some(monthly)) if days >= 7.0 => {
			let billed = (days / 30.0).ceil();
			let base = monthly * billed;

			(
				PriceTier::Monthly,
				base,
				format!("monthly ${monthly:.2} x {billed} month(s)"),
			)
		},
		(_, Some(daily), _) => {
			let billed = days.ceil();
			let base = daily * billed;

			(
				PriceTier::Daily,
				base,
				format!("daily ${daily:.2} x {billed} day(s)"),
			)
		},
		(Some(hourly), _, _) => {
			let base = hourly * hours;

			(
				PriceTier::Hourly,
				base,
				format!("hourly ${hourly:.2} x {hours}h"),
			)
		},
		// Only a monthly price below the monthly threshold is as unusable
		// as no price at all
		_ => return Err(CreateBookingError::NoPricing.into()),
	};

	let mut parts = vec![description];
	let mut total = base;

	if is_peak_start(start_time) {
		total *= options.peak_hour_multiplier;

		parts.push(format!(
			"peak-hour surcharge x{}",
			options.peak_hour_multiplier,
		));
	}

	if matches!(start_time.weekday(), Weekday::Sat | Weekday::Sun) {
		total *= options.weekend_multiplier;

		parts.push(format!(
			"weekend surcharge x{}",
			options.weekend_multiplier,
		));
	}

	let total = round_to_cents(total);

	parts.push(format!("total ${total:.2}"));

	Ok(PriceQuote { total, tier, breakdown: parts.join("; ") })
}
