//! Sliding-window request quota
//!
//! Keeps the timestamps of recent outbound requests. A caller that would
//! exceed the window is delayed until the oldest request leaves it; nothing
//! is ever dropped.

use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::Config;

/// How concurrent callers are admitted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuotaMode {
    /// The lock is released during the backoff sleep. Callers that wake
    /// together all record a request, so concurrent bursts can overshoot.
    #[default]
    Soft,
    /// Check and reserve happen under one lock held across the backoff.
    /// Waiting callers queue behind each other and the quota is never exceeded.
    Strict,
}

#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    mode: QuotaMode,
    requests: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration, mode: QuotaMode) -> Self {
        Self {
            max_requests: max_requests.max(1),
            window,
            mode,
            requests: Mutex::new(VecDeque::new()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mode = if config.strict_quota {
            QuotaMode::Strict
        } else {
            QuotaMode::Soft
        };
        Self::new(config.max_requests_per_window, config.quota_window(), mode)
    }

    pub fn mode(&self) -> QuotaMode {
        self.mode
    }

    /// Drop timestamps at least one window old
    fn prune_locked(&self, requests: &mut VecDeque<Instant>, now: Instant) {
        while let Some(oldest) = requests.front() {
            if now.duration_since(*oldest) >= self.window {
                requests.pop_front();
            } else {
                break;
            }
        }
    }

    /// Time until the oldest request leaves the window, if the window is full
    fn backoff_locked(&self, requests: &mut VecDeque<Instant>) -> Option<Duration> {
        let now = Instant::now();
        self.prune_locked(requests, now);
        if requests.len() < self.max_requests {
            return None;
        }
        let oldest = *requests.front()?;
        Some(self.window.saturating_sub(now.duration_since(oldest)))
    }

    /// Wait for quota, then record a request at the current instant
    pub async fn acquire(&self) {
        match self.mode {
            QuotaMode::Soft => {
                let wait = {
                    let mut requests = self.requests.lock().await;
                    self.backoff_locked(&mut requests)
                };
                if let Some(wait) = wait {
                    info!(wait_ms = wait.as_millis() as u64, "Rate limit reached, waiting");
                    tokio::time::sleep(wait).await;
                }
                self.requests.lock().await.push_back(Instant::now());
            }
            QuotaMode::Strict => {
                let mut requests = self.requests.lock().await;
                while let Some(wait) = self.backoff_locked(&mut requests) {
                    info!(wait_ms = wait.as_millis() as u64, "Rate limit reached, waiting");
                    tokio::time::sleep(wait).await;
                }
                requests.push_back(Instant::now());
            }
        }
    }

    pub async fn prune(&self) {
        let mut requests = self.requests.lock().await;
        self.prune_locked(&mut requests, Instant::now());
    }

    /// Requests recorded inside the current window
    pub async fn in_window(&self) -> usize {
        let mut requests = self.requests.lock().await;
        self.prune_locked(&mut requests, Instant::now());
        requests.len()
    }

    /// Prune on a timer for as long as the limiter is alive
    pub fn spawn_pruner(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let limiter: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(limiter) = limiter.upgrade() else {
                    break;
                };
                limiter.prune().await;
                debug!("Pruned request window");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(60);

    /// Largest number of instants falling inside any window-long slice
    fn max_in_any_window(times: &[Instant]) -> usize {
        let mut sorted = times.to_vec();
        sorted.sort();
        (0..sorted.len())
            .map(|i| {
                sorted[i..]
                    .iter()
                    .take_while(|t| t.duration_since(sorted[i]) < WINDOW)
                    .count()
            })
            .max()
            .unwrap_or(0)
    }

    #[tokio::test(start_paused = true)]
    async fn test_41st_request_waits_for_oldest_to_expire() {
        let limiter = RateLimiter::new(40, WINDOW, QuotaMode::Soft);
        let start = Instant::now();
        for _ in 0..40 {
            limiter.acquire().await;
        }
        assert_eq!(Instant::now(), start);

        limiter.acquire().await;
        assert_eq!(Instant::now() - start, WINDOW);
        assert_eq!(limiter.in_window().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_callers_never_exceed_quota() {
        let limiter = RateLimiter::new(40, WINDOW, QuotaMode::Soft);
        let mut times = Vec::new();
        for i in 0..130 {
            if i % 7 == 0 {
                tokio::time::sleep(Duration::from_secs(3)).await;
            }
            limiter.acquire().await;
            times.push(Instant::now());
        }
        assert_eq!(max_in_any_window(&times), 40);
    }

    async fn burst(mode: QuotaMode) -> (Arc<RateLimiter>, Vec<Instant>) {
        let limiter = Arc::new(RateLimiter::new(40, WINDOW, mode));
        for _ in 0..40 {
            limiter.acquire().await;
        }
        let handles: Vec<_> = (0..41)
            .map(|_| {
                let limiter = limiter.clone();
                tokio::spawn(async move {
                    limiter.acquire().await;
                    Instant::now()
                })
            })
            .collect();
        let mut times = Vec::new();
        for handle in handles {
            times.push(handle.await.unwrap());
        }
        (limiter, times)
    }

    #[tokio::test(start_paused = true)]
    async fn test_soft_mode_lets_concurrent_waiters_overshoot() {
        let (limiter, times) = burst(QuotaMode::Soft).await;
        assert_eq!(max_in_any_window(&times), 41);
        assert_eq!(limiter.in_window().await, 41);
    }

    #[tokio::test(start_paused = true)]
    async fn test_strict_mode_holds_quota_under_fan_out() {
        let start = Instant::now();
        let (_, times) = burst(QuotaMode::Strict).await;
        assert_eq!(max_in_any_window(&times), 40);
        let latest = times.iter().max().copied().unwrap();
        assert_eq!(latest - start, WINDOW * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pruner_stops_with_limiter() {
        let limiter = Arc::new(RateLimiter::new(40, WINDOW, QuotaMode::Soft));
        limiter.acquire().await;
        let handle = limiter.spawn_pruner(Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(limiter.requests.lock().await.len(), 0);

        drop(limiter);
        tokio::time::sleep(Duration::from_secs(31)).await;
        assert!(handle.is_finished());
    }
}
