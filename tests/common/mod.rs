use axum_extra::extract::cookie::Cookie;
use axum_test::TestServer;
use chrono::TimeDelta;
use parqueo::cache::Cache;
use parqueo::models::NewProfile;
use parqueo::session::Session;
use parqueo::{AppState, Config, DbPool, routes};

mod mock_db;

use mock_db::{DATABASE_PROVIDER, DatabaseGuard};

pub const ACCESS_TOKEN_NAME: &str = "parqueo_access_token";

#[allow(dead_code)]
pub struct TestEnv {
	pub app:        TestServer,
	pub pool:       DbPool,
	pub cache:      Cache,
	pub profile_id: i32,
	pub db_guard:   DatabaseGuard,
}

impl TestEnv {
	/// Get a test environment with a oneshot database, an in-memory cache
	/// and a logged-in profile
	///
	/// # Panics
	/// Panics if building the test server fails
	pub async fn new() -> Self {
		let db_guard = (*DATABASE_PROVIDER).acquire().await;
		let pool = db_guard.create_pool();

		let cache = Cache::in_memory();

		let config = Config {
			database_url: String::new(),
			redis_url: String::new(),
			access_token_name: ACCESS_TOKEN_NAME.to_string(),
			access_token_lifetime: TimeDelta::minutes(60),
		};

		let conn = pool.get().await.unwrap();

		let profile = NewProfile {
			username: "bob".to_string(),
			email:    "bob@example.com".to_string(),
		}
		.insert(&conn)
		.await
		.unwrap();

		let session =
			Session::create(config.access_token_lifetime, profile.id, &cache)
				.await;

		let state = AppState {
			config,
			database_pool: pool.clone(),
			cache: cache.clone(),
		};

		let mut app = TestServer::new(routes::get_app_router(state)).unwrap();
		app.add_cookie(Cookie::new(
			ACCESS_TOKEN_NAME,
			session.id.to_string(),
		));

		Self { app, pool, cache, profile_id: profile.id, db_guard }
	}
}
