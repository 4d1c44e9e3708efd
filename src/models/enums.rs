use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};

#[derive(
	Clone, Copy, DbEnum, Debug, Default, Deserialize, PartialEq, Eq, Serialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::GarageKind"]
pub enum GarageKind {
	Covered,
	#[default]
	Uncovered,
}

#[derive(
	Clone, Copy, DbEnum, Debug, Default, Deserialize, PartialEq, Eq, Serialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::AccessKind"]
pub enum AccessKind {
	#[default]
	None,
	Key,
	Code,
	Remote,
}

#[derive(
	Clone, Copy, DbEnum, Debug, Default, Deserialize, PartialEq, Eq, Serialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::BookingStatus"]
pub enum BookingStatus {
	#[default]
	Pending,
	Confirmed,
	Active,
	Completed,
	Cancelled,
}

impl BookingStatus {
	/// The statuses that hold a claim on a garage's time window
	pub const BLOCKING: [Self; 3] = [Self::Pending, Self::Confirmed, Self::Active];

	/// Whether this status holds a claim on its time window
	#[must_use]
	pub fn is_blocking(self) -> bool { Self::BLOCKING.contains(&self) }

	/// Whether the lifecycle allows moving from this status to `next`
	///
	/// No transition skips a state forward and nothing leaves a terminal
	/// state
	#[must_use]
	pub fn can_transition_to(self, next: Self) -> bool {
		matches!(
			(self, next),
			(Self::Pending, Self::Confirmed | Self::Cancelled)
				| (Self::Confirmed, Self::Active | Self::Cancelled)
				| (Self::Active, Self::Completed)
		)
	}
}
