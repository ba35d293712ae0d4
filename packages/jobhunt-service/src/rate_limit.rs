//! Sliding-window limiter guarding outbound AI calls.

use std::{
	collections::VecDeque,
	sync::{Mutex, PoisonError},
	time::Duration,
};

use tokio::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Acquire {
	Granted,
	/// The window is full. Returned by [`RateLimiter::try_acquire`].
	Denied,
	/// No slot opened before the deadline. Returned by [`RateLimiter::acquire_blocking`].
	TimedOut,
}
impl Acquire {
	pub fn is_granted(self) -> bool {
		matches!(self, Self::Granted)
	}
}

/// At most `limit` grants start within any trailing `window`.
pub struct RateLimiter {
	limit: usize,
	window: Duration,
	grants: Mutex<VecDeque<Instant>>,
}
impl RateLimiter {
	pub fn new(limit: u32, window: Duration) -> Self {
		let limit = limit as usize;

		Self { limit, window, grants: Mutex::new(VecDeque::with_capacity(limit)) }
	}

	pub fn try_acquire(&self) -> Acquire {
		match self.try_acquire_at(Instant::now()) {
			Ok(()) => Acquire::Granted,
			Err(_) => Acquire::Denied,
		}
	}

	/// Waits for a free slot, giving up once the next slot would open after `deadline`.
	pub async fn acquire_blocking(&self, deadline: Instant) -> Acquire {
		loop {
			match self.try_acquire_at(Instant::now()) {
				Ok(()) => return Acquire::Granted,
				Err(Some(next)) if next <= deadline => tokio::time::sleep_until(next).await,
				Err(_) => return Acquire::TimedOut,
			}
		}
	}

	/// Grants currently counted against the window.
	pub fn in_window(&self) -> usize {
		let now = Instant::now();
		let mut grants = self.grants.lock().unwrap_or_else(PoisonError::into_inner);

		self.evict(&mut grants, now);

		grants.len()
	}

	/// Check-then-record under one lock. On denial returns when the oldest grant leaves the window.
	fn try_acquire_at(&self, now: Instant) -> Result<(), Option<Instant>> {
		let mut grants = self.grants.lock().unwrap_or_else(PoisonError::into_inner);

		self.evict(&mut grants, now);

		if grants.len() < self.limit {
			grants.push_back(now);

			return Ok(());
		}

		Err(grants.front().map(|oldest| *oldest + self.window))
	}

	fn evict(&self, grants: &mut VecDeque<Instant>, now: Instant) {
		while grants.front().is_some_and(|oldest| *oldest + self.window <= now) {
			grants.pop_front();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test(start_paused = true)]
	async fn denies_call_past_limit() {
		let limiter = RateLimiter::new(3, Duration::from_secs(60));

		for _ in 0..3 {
			assert_eq!(limiter.try_acquire(), Acquire::Granted);
		}

		assert_eq!(limiter.try_acquire(), Acquire::Denied);
		assert_eq!(limiter.in_window(), 3);
	}

	#[tokio::test(start_paused = true)]
	async fn window_slides_instead_of_resetting() {
		let limiter = RateLimiter::new(2, Duration::from_secs(60));

		assert!(limiter.try_acquire().is_granted());
		tokio::time::advance(Duration::from_secs(40)).await;
		assert!(limiter.try_acquire().is_granted());
		tokio::time::advance(Duration::from_secs(30)).await;

		// The first grant left the window, the second has not.
		assert!(limiter.try_acquire().is_granted());
		assert_eq!(limiter.try_acquire(), Acquire::Denied);
	}

	#[tokio::test(start_paused = true)]
	async fn spaced_calls_are_never_denied() {
		let limiter = RateLimiter::new(2, Duration::from_secs(60));

		for _ in 0..10 {
			assert!(limiter.try_acquire().is_granted());
			tokio::time::advance(Duration::from_secs(31)).await;
		}
	}

	#[tokio::test(start_paused = true)]
	async fn blocking_acquire_waits_for_slot() {
		let limiter = RateLimiter::new(1, Duration::from_secs(10));
		let start = Instant::now();

		assert!(limiter.try_acquire().is_granted());

		let outcome = limiter.acquire_blocking(start + Duration::from_secs(15)).await;

		assert_eq!(outcome, Acquire::Granted);
		assert!(Instant::now() >= start + Duration::from_secs(10));
	}

	#[tokio::test(start_paused = true)]
	async fn blocking_acquire_respects_deadline() {
		let limiter = RateLimiter::new(1, Duration::from_secs(10));
		let start = Instant::now();

		assert!(limiter.try_acquire().is_granted());
		assert_eq!(
			limiter.acquire_blocking(start + Duration::from_secs(5)).await,
			Acquire::TimedOut
		);
	}

	#[tokio::test(start_paused = true)]
	async fn zero_limit_never_grants() {
		let limiter = RateLimiter::new(0, Duration::from_secs(10));

		assert_eq!(limiter.try_acquire(), Acquire::Denied);
		assert_eq!(limiter.acquire_blocking(Instant::now()).await, Acquire::TimedOut);
	}
}
