//! Circuit breaker guarding database access.
//!
//! ```text
//!   Closed --(failures >= threshold)--> Open --(cooldown elapsed)--> HalfOpen
//!     ^                                  ^                              |
//!     |                                  +----------(probe fails)-------+
//!     +------------------------------(probe succeeds)-------------------+
//! ```
//!
//! A probe that never reports back (dropped request, panicking handler) does
//! not wedge the breaker: a [`Permit`] dropped unsettled counts as a failure,
//! and half-open admits a fresh probe once the previous one is a cool-down old.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::time::Instant;
use utoipa::ToSchema;

use crate::config::BreakerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug)]
enum Inner {
    Closed { failures: u32 },
    Open { until: Instant },
    /// `retry_at` is when another probe may go out if this one is lost.
    HalfOpen { retry_at: Instant },
}

/// Whether an admitted request is ordinary traffic or the half-open probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Normal,
    Probe,
}

#[derive(Debug)]
pub struct CircuitBreaker {
    config: BreakerConfig,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner::Closed { failures: 0 }),
        }
    }

    /// Whether a request may touch the database right now. Moving from open
    /// to half-open lets exactly one probe through per cool-down.
    pub fn admit(&self) -> Option<Admission> {
        let mut inner = self.lock();
        let now = Instant::now();
        match *inner {
            Inner::Closed { .. } => Some(Admission::Normal),
            Inner::Open { until } if now >= until => {
                tracing::info!("circuit breaker half-open, probing database");
                *inner = Inner::HalfOpen {
                    retry_at: now + self.config.cooldown,
                };
                Some(Admission::Probe)
            }
            Inner::HalfOpen { retry_at } if now >= retry_at => {
                tracing::warn!("half-open probe never reported, sending another");
                *inner = Inner::HalfOpen {
                    retry_at: now + self.config.cooldown,
                };
                Some(Admission::Probe)
            }
            Inner::Open { .. } | Inner::HalfOpen { .. } => None,
        }
    }

    pub fn allow(&self) -> bool {
        self.admit().is_some()
    }

    /// Like [`CircuitBreaker::admit`], but the outcome is reported through
    /// the returned permit.
    pub fn enter(self: &Arc<Self>) -> Option<Permit> {
        self.admit().map(|admission| Permit {
            breaker: Arc::clone(self),
            admission,
            settled: false,
        })
    }

    /// Closes a half-open breaker and resets the failure count when closed.
    /// An open breaker ignores late successes from requests admitted before
    /// it tripped.
    pub fn record_success(&self) {
        let mut inner = self.lock();
        match *inner {
            Inner::HalfOpen { .. } => {
                tracing::info!("circuit breaker closed");
                *inner = Inner::Closed { failures: 0 };
            }
            Inner::Closed { failures } if failures > 0 => {
                *inner = Inner::Closed { failures: 0 };
            }
            Inner::Closed { .. } | Inner::Open { .. } => {}
        }
    }

    pub fn record_failure(&self) {
        let mut inner = self.lock();
        let next = match *inner {
            Inner::Closed { failures } if failures + 1 < self.config.failure_threshold => {
                Inner::Closed {
                    failures: failures + 1,
                }
            }
            Inner::Closed { .. } | Inner::HalfOpen { .. } => {
                tracing::warn!(
                    cooldown_secs = self.config.cooldown.as_secs(),
                    "circuit breaker opened"
                );
                Inner::Open {
                    until: Instant::now() + self.config.cooldown,
                }
            }
            Inner::Open { until } => Inner::Open { until },
        };
        *inner = next;
    }

    pub fn state(&self) -> BreakerState {
        match *self.lock() {
            Inner::Closed { .. } => BreakerState::Closed,
            Inner::Open { .. } => BreakerState::Open,
            Inner::HalfOpen { .. } => BreakerState::HalfOpen,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Admission to the database for one request. Settle it with
/// [`Permit::success`] or [`Permit::failure`]; an unsettled probe permit
/// counts as a failure when dropped.
#[derive(Debug)]
pub struct Permit {
    breaker: Arc<CircuitBreaker>,
    admission: Admission,
    settled: bool,
}

impl Permit {
    pub fn admission(&self) -> Admission {
        self.admission
    }

    pub fn success(mut self) {
        self.settled = true;
        self.breaker.record_success();
    }

    pub fn failure(mut self) {
        self.settled = true;
        self.breaker.record_failure();
    }
}

impl Drop for Permit {
    fn drop(&mut self) {
        if !self.settled && self.admission == Admission::Probe {
            tracing::warn!("half-open probe abandoned before completing");
            self.breaker.record_failure();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn breaker(threshold: u32) -> CircuitBreaker {
        CircuitBreaker::new(BreakerConfig {
            failure_threshold: threshold,
            cooldown: Duration::from_secs(30),
        })
    }

    #[test]
    fn opens_after_threshold_consecutive_failures() {
        let b = breaker(3);
        b.record_failure();
        b.record_failure();
        assert_eq!(b.state(), BreakerState::Closed);
        b.record_failure();
        assert_eq!(b.state(), BreakerState::Open);
        assert!(!b.allow());
    }

    #[test]
    fn success_resets_failure_count() {
        let b = breaker(2);
        b.record_failure();
        b.record_success();
        b.record_failure();
        assert_eq!(b.state(), BreakerState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn half_open_admits_single_probe_after_cooldown() {
        let b = breaker(1);
        b.record_failure();
        assert!(!b.allow());

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(b.allow());
        assert_eq!(b.state(), BreakerState::HalfOpen);
        assert!(!b.allow());

        b.record_success();
        assert_eq!(b.state(), BreakerState::Closed);
        assert!(b.allow());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_probe_reopens() {
        let b = breaker(1);
        b.record_failure();
        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(b.allow());
        b.record_failure();
        assert_eq!(b.state(), BreakerState::Open);
        assert!(!b.allow());
    }

    #[tokio::test(start_paused = true)]
    async fn lost_probe_is_replaced_after_another_cooldown() {
        let b = breaker(1);
        b.record_failure();
        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(b.allow());

        // the probe never reports back
        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(!b.allow());
        tokio::time::advance(Duration::from_secs(25)).await;
        assert!(b.allow());
        assert_eq!(b.state(), BreakerState::HalfOpen);

        b.record_success();
        assert_eq!(b.state(), BreakerState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_probe_permit_reopens_the_breaker() {
        let b = Arc::new(breaker(1));
        b.record_failure();
        tokio::time::advance(Duration::from_secs(31)).await;

        let permit = b.enter().expect("probe admitted");
        assert_eq!(permit.admission(), Admission::Probe);
        drop(permit);
        assert_eq!(b.state(), BreakerState::Open);
        assert!(b.enter().is_none());
    }

    #[test]
    fn dropped_normal_permit_is_not_a_failure() {
        let b = Arc::new(breaker(1));
        let permit = b.enter().expect("closed admits");
        assert_eq!(permit.admission(), Admission::Normal);
        drop(permit);
        assert_eq!(b.state(), BreakerState::Closed);
    }

    #[test]
    fn late_success_does_not_close_an_open_breaker() {
        let b = breaker(1);
        b.record_failure();
        b.record_success();
        assert_eq!(b.state(), BreakerState::Open);
        assert!(!b.allow());
    }
}
