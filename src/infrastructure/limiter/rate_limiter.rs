use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::{task::JoinHandle, time::sleep};

const EVICTION_INTERVAL: Duration = Duration::from_secs(30);

/// A token bucket which allows fractional tokens for precise refill
#[derive(Debug)]
struct TokenBucket {
    capacity: f64,
    tokens: f64,
    refill_per_sec: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn new(capacity: f64, refill_per_sec: f64) -> Self {
        Self {
            capacity,
            tokens: capacity,
            refill_per_sec,
            last_refill: Instant::now(),
        }
    }

    fn refill(&mut self, now: Instant) {
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        if elapsed > 0.0 {
            self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity);
            self.last_refill = now;
        }
    }

    /// Small epsilon to avoid fp surprises
    fn has_token(&self) -> bool {
        self.tokens + 1e-12 >= 1.0
    }

    fn secs_until_token(&self) -> u64 {
        let missing = (1.0 - self.tokens).max(0.0);
        ((missing / self.refill_per_sec).ceil() as u64).max(1)
    }
}

/// Weighted two-window counter.
#[derive(Debug)]
struct SlidingWindow {
    window_size: Duration,
    limit: u64,
    current_window_start: Instant,
    current_count: u64,
    prev_count: u64,
}

impl SlidingWindow {
    fn new(window_size: Duration, limit: u64) -> Self {
        Self {
            window_size,
            limit,
            current_window_start: Instant::now(),
            current_count: 0,
            prev_count: 0,
        }
    }

    fn roll(&mut self, now: Instant) {
        let elapsed = now.duration_since(self.current_window_start);
        if elapsed >= self.window_size * 2 {
            self.prev_count = 0;
            self.current_count = 0;
            self.current_window_start = now;
        } else if elapsed >= self.window_size {
            self.prev_count = self.current_count;
            self.current_count = 0;
            self.current_window_start += self.window_size;
        }
    }

    fn effective_count(&self, now: Instant) -> f64 {
        let elapsed = now.duration_since(self.current_window_start).as_secs_f64();
        let weight = (elapsed / self.window_size.as_secs_f64()).min(1.0);
        (self.prev_count as f64) * (1.0 - weight) + (self.current_count as f64)
    }

    fn secs_until_window_moves(&self, now: Instant) -> u64 {
        let left = self.window_size.saturating_sub(now.duration_since(self.current_window_start));
        left.as_secs().max(1)
    }
}

#[derive(Debug)]
struct HybridLimiter {
    bucket: TokenBucket,
    window: SlidingWindow,
    last_seen: Instant,
}

/// Outcome of one rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateDecision {
    pub allowed: bool,
    pub remaining: u64,
    pub retry_after_secs: Option<u64>,
}

impl HybridLimiter {
    fn new(capacity: f64, refill_per_sec: f64, window_size: Duration, limit: u64) -> Self {
        Self {
            bucket: TokenBucket::new(capacity, refill_per_sec),
            window: SlidingWindow::new(window_size, limit),
            last_seen: Instant::now(),
        }
    }

    /// A request needs a token AND room in the window; nothing is consumed on rejection.
    fn check(&mut self) -> RateDecision {
        let now = Instant::now();
        self.last_seen = now;
        self.bucket.refill(now);
        self.window.roll(now);

        if !self.bucket.has_token() {
            return RateDecision {
                allowed: false,
                remaining: 0,
                retry_after_secs: Some(self.bucket.secs_until_token()),
            };
        }

        let effective = self.window.effective_count(now);
        if effective + 1.0 > self.window.limit as f64 {
            return RateDecision {
                allowed: false,
                remaining: 0,
                retry_after_secs: Some(self.window.secs_until_window_moves(now)),
            };
        }

        self.bucket.tokens -= 1.0;
        self.window.current_count += 1;

        let window_left = self.window.limit as f64 - (effective + 1.0);
        RateDecision {
            allowed: true,
            remaining: self.bucket.tokens.min(window_left).max(0.0).floor() as u64,
            retry_after_secs: None,
        }
    }
}

type Key = String;

/// Per-key limiter store, keyed by client IP for admin logins.
#[derive(Clone)]
pub struct RateLimiterStore {
    map: Arc<DashMap<Key, Arc<Mutex<HybridLimiter>>>>,
    capacity: f64,
    refill_per_sec: f64,
    window_size: Duration,
    limit: u64,
    idle_ttl: Duration,
}

impl RateLimiterStore {
    pub fn new(
        capacity: f64,
        refill_per_sec: f64,
        window_size: Duration,
        limit: u64,
        idle_ttl: Duration,
    ) -> Self {
        Self {
            map: Arc::new(DashMap::new()),
            capacity,
            refill_per_sec,
            window_size,
            limit,
            idle_ttl,
        }
    }

    /// `limit` attempts per minute, with a burst of the same size.
    pub fn per_minute(limit: u64) -> Self {
        let limit = limit.max(1);
        Self::new(
            limit as f64,
            limit as f64 / 60.0,
            Duration::from_secs(60),
            limit,
            Duration::from_secs(600),
        )
    }

    fn get_limiter(&self, key: &str) -> Arc<Mutex<HybridLimiter>> {
        if let Some(existing) = self.map.get(key) {
            return existing.clone();
        }
        self.map
            .entry(key.to_string())
            .or_insert_with(|| {
                Arc::new(Mutex::new(HybridLimiter::new(
                    self.capacity,
                    self.refill_per_sec,
                    self.window_size,
                    self.limit,
                )))
            })
            .clone()
    }

    pub fn check(&self, key: &str) -> RateDecision {
        let limiter = self.get_limiter(key);
        let mut guard = limiter.lock();
        guard.check()
    }

    /// Drops limiters idle for longer than the TTL and returns how many went.
    pub fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let before = self.map.len();
        self.map
            .retain(|_, limiter| now.duration_since(limiter.lock().last_seen) <= self.idle_ttl);
        before - self.map.len()
    }

    pub fn tracked_keys(&self) -> usize {
        self.map.len()
    }

    /// Periodically evicts idle keys. Must be called from within a Tokio runtime.
    pub fn start_eviction_task(&self) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            loop {
                sleep(EVICTION_INTERVAL).await;
                let evicted = store.evict_idle();
                if evicted > 0 {
                    tracing::debug!(evicted, "Evicted idle rate limiter entries");
                }
            }
        })
    }
}
