//! Read-through cache for availability lookups
//!
//! The cache only ever accelerates advisory reads; the booking transaction
//! always re-reads from the primary store. Backends therefore swallow their
//! own failures: a broken cache degrades to a direct database read.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::Mutex;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;

/// A redis cache connection
pub type RedisConn = MultiplexedConnection;

/// How long availability entries stay fresh
pub const AVAILABILITY_TTL: Duration = Duration::from_secs(300);

#[async_trait]
pub trait CacheBackend: Send + Sync {
	async fn get(&self, key: &str) -> Option<String>;
	async fn set(&self, key: &str, value: String, ttl: Duration);
	async fn delete(&self, key: &str);
}

/// Shared handle to a [`CacheBackend`]
#[derive(Clone)]
pub struct Cache {
	backend: Arc<dyn CacheBackend>,
}

impl fmt::Debug for Cache {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { f.write_str("Cache") }
}

impl Cache {
	/// Create a redis-backed cache
	#[must_use]
	pub fn redis(conn: RedisConn) -> Self {
		Self { backend: Arc::new(RedisBackend { conn }) }
	}

	/// Create a process-local cache with TTL eviction
	#[must_use]
	pub fn in_memory() -> Self {
		Self { backend: Arc::new(MemoryBackend::default()) }
	}

	pub async fn get(&self, key: &str) -> Option<String> {
		self.backend.get(key).await
	}

	pub async fn set(&self, key: &str, value: String, ttl: Duration) {
		self.backend.set(key, value, ttl).await;
	}

	pub async fn delete(&self, key: &str) { self.backend.delete(key).await }

	/// Cache key for a single day of bookings on a garage
	#[must_use]
	pub fn garage_day_key(garage_id: i32, date: NaiveDate) -> String {
		format!("garage:{garage_id}:bookings:{date}")
	}

	/// Cache key for a profile's own booking list
	#[must_use]
	pub fn profile_bookings_key(profile_id: i32) -> String {
		format!("profile:{profile_id}:bookings")
	}

	/// Drop every availability entry a booking write may have staled: the
	/// garage's day entries across the booked window and the requester's own
	/// booking list
	pub async fn invalidate_booking(
		&self,
		garage_id: i32,
		profile_id: i32,
		start_time: NaiveDateTime,
		end_time: NaiveDateTime,
	) {
		let mut day = start_time.date();
		let last = end_time.date();

		while day <= last {
			self.delete(&Self::garage_day_key(garage_id, day)).await;

			let Some(next) = day.succ_opt() else { break };
			day = next;
		}

		self.delete(&Self::profile_bookings_key(profile_id)).await;

		debug!(
			"invalidated availability cache for garage {garage_id} and \
			 profile {profile_id}"
		);
	}
}

struct RedisBackend {
	conn: RedisConn,
}

#[async_trait]
impl CacheBackend for RedisBackend {
	async fn get(&self, key: &str) -> Option<String> {
		let mut conn = self.conn.clone();

		match conn.get::<_, Option<String>>(key).await {
			Ok(value) => value,
			Err(e) => {
				warn!("cache read for {key} failed -- {e}");

				None
			},
		}
	}

	async fn set(&self, key: &str, value: String, ttl: Duration) {
		let mut conn = self.conn.clone();

		if let Err(e) =
			conn.set_ex::<_, _, ()>(key, value, ttl.as_secs()).await
		{
			warn!("cache write for {key} failed -- {e}");
		}
	}

	async fn delete(&self, key: &str) {
		let mut conn = self.conn.clone();

		if let Err(e) = conn.del::<_, ()>(key).await {
			warn!("cache invalidation for {key} failed -- {e}");
		}
	}
}

#[derive(Default)]
struct MemoryBackend {
	entries: Mutex<HashMap<String, (Instant, String)>>,
}

#[async_trait]
impl CacheBackend for MemoryBackend {
	async fn get(&self, key: &str) -> Option<String> {
		let mut entries = self.entries.lock();

		match entries.get(key) {
			Some((deadline, value)) if *deadline > Instant::now() => {
				Some(value.clone())
			},
			Some(_) => {
				entries.remove(key);

				None
			},
			None => None,
		}
	}

	async fn set(&self, key: &str, value: String, ttl: Duration) {
		let now = Instant::now();
		let mut entries = self.entries.lock();

		// Evict whatever already expired so the map cannot grow unbounded
		entries.retain(|_, (deadline, _)| *deadline > now);

		entries.insert(key.to_string(), (now + ttl, value));
	}

	async fn delete(&self, key: &str) { self.entries.lock().remove(key); }
}
