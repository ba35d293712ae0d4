//! Process-lifetime result cache keyed by the request fingerprint.
//!
//! Entries expire lazily on lookup and eagerly through [`ResultCache::purge_expired`]. Concurrent
//! misses on the same key are serialized through [`ResultCache::lock_key`] so only one of them
//! runs the pipeline.

use std::{
	collections::HashMap,
	sync::{Arc, Mutex, PoisonError},
	time::Duration,
};

use tokio::{
	sync::{Mutex as AsyncMutex, OwnedMutexGuard},
	time::Instant,
};

use jobhunt_domain::{RankedJobs, SearchProfile};

use crate::{Error, Result};

#[derive(Clone, Debug)]
pub struct CacheEntry {
	pub value: RankedJobs,
	pub created_at: Instant,
	pub expires_at: Instant,
}
impl CacheEntry {
	fn is_live(&self, now: Instant) -> bool {
		now < self.expires_at
	}
}

pub struct ResultCache {
	ttl: Duration,
	entries: Mutex<HashMap<String, CacheEntry>>,
	inflight: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}
impl ResultCache {
	pub fn new(ttl: Duration) -> Self {
		Self { ttl, entries: Mutex::default(), inflight: Mutex::default() }
	}

	pub fn get(&self, key: &str) -> Option<RankedJobs> {
		self.get_at(key, Instant::now())
	}

	pub fn get_at(&self, key: &str, now: Instant) -> Option<RankedJobs> {
		let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

		match entries.get(key) {
			Some(entry) if entry.is_live(now) => Some(entry.value.clone()),
			Some(_) => {
				entries.remove(key);

				None
			},
			None => None,
		}
	}

	pub fn insert(&self, key: String, value: RankedJobs) {
		let created_at = Instant::now();
		let entry = CacheEntry { value, created_at, expires_at: created_at + self.ttl };

		self.entries.lock().unwrap_or_else(PoisonError::into_inner).insert(key, entry);
	}

	/// Removes every expired entry and returns how many were dropped.
	pub fn purge_expired(&self) -> usize {
		let now = Instant::now();
		let removed = {
			let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
			let before = entries.len();

			entries.retain(|_, entry| entry.is_live(now));

			before - entries.len()
		};

		// A waiter cancelled after the holder released leaves its lock behind with no owner.
		self.inflight
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.retain(|_, lock| Arc::strong_count(lock) > 1);

		removed
	}

	/// Number of entries that have not expired yet.
	pub fn live_len(&self) -> usize {
		let now = Instant::now();

		self.entries
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.values()
			.filter(|entry| entry.is_live(now))
			.count()
	}

	/// Waits until no other caller holds `key`, then holds it until the guard is dropped.
	pub async fn lock_key(&self, key: &str) -> KeyGuard<'_> {
		let lock = {
			let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);

			Arc::clone(inflight.entry(key.to_string()).or_default())
		};
		let guard = Arc::clone(&lock).lock_owned().await;

		KeyGuard { cache: self, key: key.to_string(), lock, guard: Some(guard) }
	}

	#[cfg(test)]
	fn inflight_len(&self) -> usize {
		self.inflight.lock().unwrap_or_else(PoisonError::into_inner).len()
	}
}

pub struct KeyGuard<'a> {
	cache: &'a ResultCache,
	key: String,
	lock: Arc<AsyncMutex<()>>,
	guard: Option<OwnedMutexGuard<()>>,
}
impl Drop for KeyGuard<'_> {
	fn drop(&mut self) {
		let mut inflight = self.cache.inflight.lock().unwrap_or_else(PoisonError::into_inner);

		drop(self.guard.take());

		// Only the map and this guard still reference the lock: nobody is waiting.
		if Arc::strong_count(&self.lock) == 2 {
			inflight.remove(&self.key);
		}
	}
}

/// Deterministic cache key for a profile: blake3 over a canonical JSON rendering.
pub fn fingerprint(profile: &SearchProfile) -> Result<String> {
	let mut skills: Vec<String> = profile.skills.iter().map(|skill| skill.to_lowercase()).collect();

	skills.sort();
	skills.dedup();

	let payload = serde_json::json!({
		"position": normalize(&profile.position),
		"experience": normalize(&profile.experience),
		"salary": normalize(&profile.salary),
		"job_nature": normalize(&profile.job_nature),
		"location": normalize(&profile.location),
		"skills": skills,
	});
	let raw = serde_json::to_vec(&payload).map_err(|err| Error::Internal {
		stage: "fingerprint",
		message: format!("Failed to encode cache key payload: {err}"),
	})?;

	Ok(blake3::hash(&raw).to_hex().to_string())
}

pub fn cache_key_prefix(key: &str) -> &str {
	let len = key.len().min(12);

	&key[..len]
}

fn normalize(value: &str) -> String {
	value.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn profile(position: &str, skills: &str) -> SearchProfile {
		SearchProfile::new(position, "2 years", "", "Full Time", "Lahore, Pakistan", skills)
			.expect("Profile must be valid.")
	}

	fn ranked(total_found: usize) -> RankedJobs {
		RankedJobs { jobs: Vec::new(), total_found }
	}

	#[test]
	fn fingerprint_ignores_case_spacing_and_skill_order() {
		let a = fingerprint(&profile("Rust  Developer", "Tokio, Serde")).expect("fingerprint");
		let b = fingerprint(&profile("rust developer", "serde,TOKIO")).expect("fingerprint");
		let c = fingerprint(&profile("Go Developer", "Tokio, Serde")).expect("fingerprint");

		assert_eq!(a, b);
		assert_ne!(a, c);
		assert_eq!(a.len(), 64);
	}

	#[test]
	fn cache_key_prefix_is_stable() {
		assert_eq!(cache_key_prefix("abcd1234efgh5678"), "abcd1234efgh");
		assert_eq!(cache_key_prefix("short"), "short");
	}

	#[tokio::test(start_paused = true)]
	async fn entries_expire_after_ttl() {
		let cache = ResultCache::new(Duration::from_secs(10));

		cache.insert("k".to_string(), ranked(3));

		assert_eq!(cache.get("k").map(|value| value.total_found), Some(3));

		tokio::time::advance(Duration::from_secs(10)).await;

		assert!(cache.get("k").is_none());
		assert_eq!(cache.live_len(), 0);
	}

	#[tokio::test(start_paused = true)]
	async fn purge_drops_only_expired_entries() {
		let cache = ResultCache::new(Duration::from_secs(10));

		cache.insert("old".to_string(), ranked(1));
		tokio::time::advance(Duration::from_secs(6)).await;
		cache.insert("new".to_string(), ranked(2));
		tokio::time::advance(Duration::from_secs(6)).await;

		assert_eq!(cache.live_len(), 1);
		assert_eq!(cache.purge_expired(), 1);
		assert!(cache.get("new").is_some());
	}

	#[tokio::test]
	async fn key_guard_releases_lock_entry() {
		let cache = ResultCache::new(Duration::from_secs(10));

		{
			let _guard = cache.lock_key("k").await;

			assert_eq!(cache.inflight_len(), 1);
		}

		assert_eq!(cache.inflight_len(), 0);
	}

	#[tokio::test]
	async fn purge_drops_locks_left_by_cancelled_waiters() {
		let cache = ResultCache::new(Duration::from_secs(10));
		let holder = cache.lock_key("k").await;
		let mut waiter = Box::pin(cache.lock_key("k"));

		assert!(tokio::time::timeout(Duration::from_millis(5), &mut waiter).await.is_err());

		drop(holder);
		drop(waiter);

		assert_eq!(cache.inflight_len(), 1);

		cache.purge_expired();

		assert_eq!(cache.inflight_len(), 0);
	}
}
