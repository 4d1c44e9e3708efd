#[macro_use]
extern crate tracing;

use axum::extract::FromRef;
use deadpool_diesel::postgres::{Object, Pool};

pub mod cache;
pub mod compatibility;
pub mod config;
pub mod controllers;
pub mod error;
pub mod models;
pub mod pricing;
pub mod routes;
pub mod schema;
pub mod schemas;
pub mod session;

pub use config::Config;
pub use error::Error;

use crate::cache::Cache;

/// An entire database pool
pub type DbPool = Pool;

/// A single database connection
pub type DbConn = Object;

#[derive(Clone, FromRef)]
pub struct AppState {
	pub config:        Config,
	pub database_pool: DbPool,
	pub cache:         Cache,
}
