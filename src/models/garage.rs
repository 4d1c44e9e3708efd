use chrono::NaiveDateTime;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use serde::{Deserialize, Serialize};

use crate::models::{AccessKind, BoxedCondition, GarageKind, ToFilter};
use crate::schema::garage;
use crate::{DbConn, Error};

/// The price tiers a garage offers, decoupled from the rest of the row so
/// the pricing engine can stay free of persistence concerns
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GaragePricing {
	pub price_per_hour:  Option<f64>,
	pub price_per_day:   Option<f64>,
	pub price_per_month: Option<f64>,
}

#[derive(
	Clone, Debug, Deserialize, Identifiable, Queryable, Selectable, Serialize,
)]
#[diesel(table_name = garage)]
#[diesel(check_for_backend(Pg))]
pub struct PrimitiveGarage {
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

impl PrimitiveGarage {
	/// The price tiers this garage offers
	#[must_use]
	pub fn pricing(&self) -> GaragePricing {
		GaragePricing {
			price_per_hour:  self.price_per_hour,
			price_per_day:   self.price_per_day,
			price_per_month: self.price_per_month,
		}
	}

	/// Get a [`PrimitiveGarage`] by its id
	#[instrument(skip(conn))]
	pub async fn get_by_id(g_id: i32, conn: &DbConn) -> Result<Self, Error> {
		let garage = conn
			.interact(move |conn| {
				use self::garage::dsl::*;

				garage.find(g_id).select(Self::as_select()).get_result(conn)
			})
			.await??;

		Ok(garage)
	}

	/// Search through all [`PrimitiveGarage`]s with a typed filter
	#[instrument(skip(conn))]
	pub async fn search(
		filter: GarageFilter,
		conn: &DbConn,
	) -> Result<Vec<Self>, Error> {
		let filter = filter.to_filter();

		let garages = conn
			.interact(move |conn| {
				garage::table
					.filter(filter)
					.select(Self::as_select())
					.get_results(conn)
			})
			.await??;

		Ok(garages)
	}

	/// Get all the [`PrimitiveGarage`]s owned by a profile
	#[instrument(skip(conn))]
	pub async fn for_owner(
		p_id: i32,
		conn: &DbConn,
	) -> Result<Vec<Self>, Error> {
		let garages = conn
			.interact(move |conn| {
				use self::garage::dsl::*;

				garage
					.filter(owner_id.eq(p_id))
					.select(Self::as_select())
					.get_results(conn)
			})
			.await??;

		Ok(garages)
	}

	/// Soft-delete a garage by clearing its active flag
	#[instrument(skip(conn))]
	pub async fn deactivate(g_id: i32, conn: &DbConn) -> Result<(), Error> {
		conn.interact(move |conn| {
			use self::garage::dsl::*;

			diesel::update(garage.find(g_id))
				.set(is_active.eq(false))
				.execute(conn)
		})
		.await??;

		info!("deactivated garage with id {g_id}");

		Ok(())
	}
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GarageFilter {
	pub owner_id:   Option<i32>,
	pub is_active:  Option<bool>,
	pub kind:       Option<GarageKind>,
	pub min_height: Option<f64>,
}

impl<S> ToFilter<S> for GarageFilter
where
	S: 'static,
	garage::owner_id: SelectableExpression<S>,
	garage::is_active: SelectableExpression<S>,
	garage::kind: SelectableExpression<S>,
	garage::height: SelectableExpression<S>,
{
	type SqlType = Bool;

	fn to_filter(&self) -> BoxedCondition<S, Self::SqlType> {
		let mut filter: BoxedCondition<S, Self::SqlType> =
			Box::new(true.into_sql::<Bool>());

		if let Some(owner_id) = self.owner_id {
			filter = Box::new(filter.and(garage::owner_id.eq(owner_id)));
		}

		if let Some(is_active) = self.is_active {
			filter = Box::new(filter.and(garage::is_active.eq(is_active)));
		}

		if let Some(kind) = self.kind {
			filter = Box::new(filter.and(garage::kind.eq(kind)));
		}

		if let Some(min_height) = self.min_height {
			filter = Box::new(filter.and(garage::height.ge(min_height)));
		}

		filter
	}
}

#[derive(Clone, Debug, Deserialize, Insertable, Serialize)]
#[diesel(table_name = garage)]
#[diesel(check_for_backend(Pg))]
pub struct NewGarage {
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
}

impl NewGarage {
	/// Insert this [`NewGarage`]
	#[instrument(skip(conn))]
	pub async fn insert(self, conn: &DbConn) -> Result<PrimitiveGarage, Error> {
		let garage = conn
			.interact(|conn| {
				use self::garage::dsl::*;

				diesel::insert_into(garage)
					.values(self)
					.returning(PrimitiveGarage::as_returning())
					.get_result(conn)
			})
			.await??;

		info!("created garage {garage:?}");

		Ok(garage)
	}
}

#[derive(AsChangeset, Clone, Debug, Deserialize, Serialize)]
#[diesel(table_name = garage)]
#[diesel(check_for_backend(Pg))]
pub struct GarageUpdate {
	pub name:            Option<String>,
	pub height:          Option<f64>,
	pub width:           Option<f64>,
	pub length:          Option<f64>,
	pub kind:            Option<GarageKind>,
	pub access:          Option<AccessKind>,
	pub price_per_hour:  Option<f64>,
	pub price_per_day:   Option<f64>,
	pub price_per_month: Option<f64>,
	pub is_active:       Option<bool>,
}

impl GarageUpdate {
	/// Apply this update to the garage with the given id
	#[instrument(skip(conn))]
	pub async fn apply_to(
		self,
		g_id: i32,
		conn: &DbConn,
	) -> Result<PrimitiveGarage, Error> {
		let garage = conn
			.interact(move |conn| {
				use self::garage::dsl::*;

				diesel::update(garage.find(g_id))
					.set(self)
					.returning(PrimitiveGarage::as_returning())
					.get_result(conn)
			})
			.await??;

		info!("updated garage {garage:?}");

		Ok(garage)
	}
}
