use chrono::NaiveDateTime;
use diesel::pg::Pg;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::vehicle;
use crate::{DbConn, Error};

#[derive(
	Clone, Debug, Deserialize, Identifiable, Queryable, Selectable, Serialize,
)]
#[diesel(table_name = vehicle)]
#[diesel(check_for_backend(Pg))]
pub struct PrimitiveVehicle {
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

impl PrimitiveVehicle {
	/// Get a [`PrimitiveVehicle`] by its id
	#[instrument(skip(conn))]
	pub async fn get_by_id(v_id: i32, conn: &DbConn) -> Result<Self, Error> {
		let vehicle = conn
			.interact(move |conn| {
				use self::vehicle::dsl::*;

				vehicle.find(v_id).select(Self::as_select()).get_result(conn)
			})
			.await??;

		Ok(vehicle)
	}

	/// Get all the [`PrimitiveVehicle`]s owned by a profile
	#[instrument(skip(conn))]
	pub async fn for_owner(
		p_id: i32,
		conn: &DbConn,
	) -> Result<Vec<Self>, Error> {
		let vehicles = conn
			.interact(move |conn| {
				use self::vehicle::dsl::*;

				vehicle
					.filter(owner_id.eq(p_id))
					.select(Self::as_select())
					.get_results(conn)
			})
			.await??;

		Ok(vehicles)
	}

	/// Delete a [`PrimitiveVehicle`] given its id
	#[instrument(skip(conn))]
	pub async fn delete_by_id(v_id: i32, conn: &DbConn) -> Result<(), Error> {
		conn.interact(move |conn| {
			use self::vehicle::dsl::*;

			diesel::delete(vehicle.find(v_id)).execute(conn)
		})
		.await??;

		info!("deleted vehicle with id {v_id}");

		Ok(())
	}
}

#[derive(Clone, Debug, Deserialize, Insertable, Serialize)]
#[diesel(table_name = vehicle)]
#[diesel(check_for_backend(Pg))]
pub struct NewVehicle {
	pub owner_id:      i32,
	pub plate:         String,
	pub height:        Option<f64>,
	pub width:         Option<f64>,
	pub length:        Option<f64>,
	pub min_clearance: Option<f64>,
	pub covered_only:  bool,
}

impl NewVehicle {
	/// Insert this [`NewVehicle`]
	#[instrument(skip(conn))]
	pub async fn insert(
		self,
		conn: &DbConn,
	) -> Result<PrimitiveVehicle, Error> {
		let vehicle = conn
			.interact(|conn| {
				use self::vehicle::dsl::*;

				diesel::insert_into(vehicle)
					.values(self)
					.returning(PrimitiveVehicle::as_returning())
					.get_result(conn)
			})
			.await??;

		info!("created vehicle {vehicle:?}");

		Ok(vehicle)
	}
}

#[derive(AsChangeset, Clone, Debug, Deserialize, Serialize)]
#[diesel(table_name = vehicle)]
#[diesel(check_for_backend(Pg))]
pub struct VehicleUpdate {
	pub plate:         Option<String>,
	pub height:        Option<f64>,
	pub width:         Option<f64>,
	pub length:        Option<f64>,
	pub min_clearance: Option<f64>,
	pub covered_only:  Option<bool>,
}

impl VehicleUpdate {
	/// Apply this update to the vehicle with the given id
	#[instrument(skip(conn))]
	pub async fn apply_to(
		self,
		v_id: i32,
		conn: &DbConn,
	) -> Result<PrimitiveVehicle, Error> {
		let vehicle = conn
			.interact(move |conn| {
				use self::vehicle::dsl::*;

				diesel::update(vehicle.find(v_id))
					.set(self)
					.returning(PrimitiveVehicle::as_returning())
					.get_result(conn)
			})
			.await??;

		info!("updated vehicle {vehicle:?}");

		Ok(vehicle)
	}
}
