//! User sessions backed by the cache layer

use std::time::Duration;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::TimeDelta;
use uuid::Uuid;

use crate::AppState;
use crate::cache::Cache;
use crate::error::{Error, TokenError};

fn session_key(id: &Uuid) -> String { format!("session:{id}") }

#[derive(Clone, Copy, Debug)]
pub struct Session {
	pub id:         Uuid,
	pub profile_id: i32,
}

impl Session {
	/// Create and store a new [`Session`] for a given profile
	#[instrument(skip(cache))]
	pub async fn create(
		lifetime: TimeDelta,
		profile_id: i32,
		cache: &Cache,
	) -> Self {
		let id = Uuid::new_v4();

		// Add a buffer of 10 seconds to ensure the cached session doesn't
		// expire before the session cookie does
		let ttl =
			Duration::from_secs(lifetime.num_seconds().unsigned_abs() + 10);

		cache.set(&session_key(&id), profile_id.to_string(), ttl).await;

		debug!("stored session {id} for profile {profile_id}");

		Self { id, profile_id }
	}

	/// Look a session up in the cache
	pub async fn get(id: &Uuid, cache: &Cache) -> Option<Self> {
		let profile_id =
			cache.get(&session_key(id)).await?.parse::<i32>().ok()?;

		Some(Self { id: *id, profile_id })
	}

	/// Drop a session from the cache
	pub async fn delete(id: &Uuid, cache: &Cache) {
		cache.delete(&session_key(id)).await;
	}

	/// Convert this [`Session`] into an access token cookie
	#[must_use]
	pub fn to_access_token_cookie(
		self,
		name: String,
		lifetime: time::Duration,
		secure: bool,
	) -> Cookie<'static> {
		Cookie::build((name, self.id.to_string()))
			.http_only(true)
			.max_age(lifetime)
			.path("/")
			.same_site(SameSite::Lax)
			.secure(secure)
			.into()
	}
}

impl FromRequestParts<AppState> for Session {
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut Parts,
		state: &AppState,
	) -> Result<Self, Self::Rejection> {
		let jar = CookieJar::from_request_parts(parts, state)
			.await
			.map_err(|_| TokenError::MissingAccessToken)?;

		let cookie = jar
			.get(&state.config.access_token_name)
			.ok_or(TokenError::MissingAccessToken)?;

		let id = Uuid::parse_str(cookie.value())
			.map_err(|_| TokenError::MissingAccessToken)?;

		Self::get(&id, &state.cache)
			.await
			.ok_or_else(|| TokenError::MissingSession.into())
	}
}
