use diesel::BoxableExpression;
use diesel::pg::Pg;
use diesel::sql_types::{Bool, Nullable};

mod booking;
mod enums;
mod garage;
mod profile;
mod schedule;
mod vehicle;

pub use booking::*;
pub use enums::*;
pub use garage::*;
pub use profile::*;
pub use schedule::*;
pub use vehicle::*;

pub type BoxedCondition<S, T = Nullable<Bool>> =
	Box<dyn BoxableExpression<S, Pg, SqlType = T>>;

/// Convert a set of optional request parameters into a single typed query
/// condition
pub trait ToFilter<S> {
	type SqlType;

	fn to_filter(&self) -> BoxedCondition<S, Self::SqlType>;
}
