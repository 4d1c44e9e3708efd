pub mod booking;
pub mod garage;
pub mod profile;
pub mod schedule;
pub mod vehicle;

pub(crate) fn default_true() -> bool { true }

/// Serde helpers for the `HH:MM` wire format schedule windows use
pub mod hhmm {
	use chrono::NaiveTime;
	use serde::{Deserialize, Deserializer, Serializer};

	const FORMAT: &str = "%H:%M";

	pub(crate) fn parse(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
		NaiveTime::parse_from_str(raw, FORMAT)
			.or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
	}

	pub fn serialize<S>(
		time: &NaiveTime,
		serializer: S,
	) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&time.format(FORMAT).to_string())
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;

		parse(&raw).map_err(serde::de::Error::custom)
	}

	/// The same format for optional fields
	pub mod option {
		use chrono::NaiveTime;
		use serde::{Deserialize, Deserializer, Serializer};

		pub fn serialize<S>(
			time: &Option<NaiveTime>,
			serializer: S,
		) -> Result<S::Ok, S::Error>
		where
			S: Serializer,
		{
			match time {
				Some(time) => super::serialize(time, serializer),
				None => serializer.serialize_none(),
			}
		}

		pub fn deserialize<'de, D>(
			deserializer: D,
		) -> Result<Option<NaiveTime>, D::Error>
		where
			D: Deserializer<'de>,
		{
			let raw = Option::<String>::deserialize(deserializer)?;

			raw.map(|raw| {
				super::parse(&raw).map_err(serde::de::Error::custom)
			})
			.transpose()
		}
	}
}
