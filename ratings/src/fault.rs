//! Simulated outages for resilience testing.
//!
//! One [`FaultMode`] is active per process. The periodic modes flip shared
//! [`HealthFlags`] from a timer task that owns the only [`HealthWriter`]; the
//! probabilistic modes keep no state and draw a fresh number per request.

use crate::metrics_defs::{FAULT_DECISIONS, HEALTH_TRANSITIONS};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, interval_at};

pub const UNHEALTHY_PERIOD: Duration = Duration::from_secs(900);
pub const UNAVAILABLE_PERIOD: Duration = Duration::from_secs(60);
pub const FAULT_PROBABILITY: f64 = 0.5;
pub const INJECTED_DELAY: Duration = Duration::from_secs(7);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaultMode {
    /// Always serve normally.
    None,
    /// Both flags flip every 15 minutes, starting healthy.
    PeriodicUnhealthy,
    /// `unavailable` flips every 60 seconds, starting available.
    PeriodicUnavailable,
    /// Reject a request when the draw is <= 0.5.
    ProbabilisticFault,
    /// Delay a request by 7 seconds when the draw is <= 0.5.
    ProbabilisticDelay,
}

impl FaultMode {
    fn period(self) -> Option<Duration> {
        match self {
            FaultMode::PeriodicUnhealthy => Some(UNHEALTHY_PERIOD),
            FaultMode::PeriodicUnavailable => Some(UNAVAILABLE_PERIOD),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            FaultMode::None => "none",
            FaultMode::PeriodicUnhealthy => "periodic_unhealthy",
            FaultMode::PeriodicUnavailable => "periodic_unavailable",
            FaultMode::ProbabilisticFault => "probabilistic_fault",
            FaultMode::ProbabilisticDelay => "probabilistic_delay",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HealthFlags {
    pub healthy: bool,
    pub unavailable: bool,
}

impl Default for HealthFlags {
    fn default() -> Self {
        HealthFlags {
            healthy: true,
            unavailable: false,
        }
    }
}

/// Read side of the process-wide health flags.
#[derive(Clone, Debug, Default)]
pub struct HealthState {
    flags: Arc<RwLock<HealthFlags>>,
}

impl HealthState {
    /// Creates the shared flags and the single handle allowed to change them.
    pub fn new() -> (HealthState, HealthWriter) {
        let state = HealthState::default();
        let writer = HealthWriter {
            flags: state.flags.clone(),
        };
        (state, writer)
    }

    pub fn snapshot(&self) -> HealthFlags {
        *self.flags.read()
    }

    pub fn is_healthy(&self) -> bool {
        self.flags.read().healthy
    }

    pub fn is_unavailable(&self) -> bool {
        self.flags.read().unavailable
    }
}

/// Write side of the health flags. Not `Clone`: exactly one writer exists.
#[derive(Debug)]
pub struct HealthWriter {
    flags: Arc<RwLock<HealthFlags>>,
}

impl HealthWriter {
    fn flip(&self, mode: FaultMode) -> HealthFlags {
        let mut flags = self.flags.write();
        match mode {
            FaultMode::PeriodicUnhealthy => {
                flags.healthy = !flags.healthy;
                flags.unavailable = !flags.unavailable;
            }
            FaultMode::PeriodicUnavailable => {
                flags.unavailable = !flags.unavailable;
            }
            _ => {}
        }
        *flags
    }
}

/// What to do with an incoming ratings request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    Serve,
    /// Answer 503 instead of serving.
    Reject,
    /// Stall for the given duration, then serve normally.
    Delay(Duration),
}

impl Admission {
    fn as_str(self) -> &'static str {
        match self {
            Admission::Serve => "serve",
            Admission::Reject => "reject",
            Admission::Delay(_) => "delay",
        }
    }
}

pub struct FaultSimulator {
    mode: FaultMode,
    state: HealthState,
    timer: Option<JoinHandle<()>>,
}

impl FaultSimulator {
    /// Starts the simulator. Periodic modes spawn their timer task, so this must be
    /// called from within a tokio runtime.
    pub fn start(mode: FaultMode) -> Self {
        let (state, writer) = HealthState::new();

        let timer = mode.period().map(|period| {
            // The first flip happens one full period after startup
            let ticker = interval_at(Instant::now() + period, period);
            tokio::spawn(run_timer(mode, ticker, writer))
        });

        tracing::info!(mode = mode.as_str(), "Fault simulator started");

        FaultSimulator { mode, state, timer }
    }

    pub fn mode(&self) -> FaultMode {
        self.mode
    }

    pub fn health(&self) -> &HealthState {
        &self.state
    }

    /// Decides how to handle one request, drawing a random number when the mode needs one.
    pub fn admit(&self) -> Admission {
        let draw = match self.mode {
            FaultMode::ProbabilisticFault | FaultMode::ProbabilisticDelay => rand::random::<f64>(),
            _ => 1.0,
        };
        let admission = self.admission_for(draw);

        shared::counter!(FAULT_DECISIONS, "decision" => admission.as_str()).increment(1);
        if admission != Admission::Serve {
            tracing::debug!(mode = self.mode.as_str(), draw, decision = admission.as_str(), "Injecting fault");
        }

        admission
    }

    /// Decision for a given uniform draw in `[0, 1)`.
    pub fn admission_for(&self, draw: f64) -> Admission {
        match self.mode {
            FaultMode::None => Admission::Serve,
            FaultMode::PeriodicUnhealthy | FaultMode::PeriodicUnavailable => {
                if self.state.is_unavailable() {
                    Admission::Reject
                } else {
                    Admission::Serve
                }
            }
            FaultMode::ProbabilisticFault => {
                if draw <= FAULT_PROBABILITY {
                    Admission::Reject
                } else {
                    Admission::Serve
                }
            }
            FaultMode::ProbabilisticDelay => {
                if draw <= FAULT_PROBABILITY {
                    Admission::Delay(INJECTED_DELAY)
                } else {
                    Admission::Serve
                }
            }
        }
    }
}

impl Drop for FaultSimulator {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

async fn run_timer(mode: FaultMode, mut ticker: Interval, writer: HealthWriter) {
    loop {
        ticker.tick().await;
        let flags = writer.flip(mode);
        shared::counter!(HEALTH_TRANSITIONS, "mode" => mode.as_str()).increment(1);
        tracing::info!(
            mode = mode.as_str(),
            healthy = flags.healthy,
            unavailable = flags.unavailable,
            "Simulated health state changed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    const JUST_BEFORE: Duration = Duration::from_millis(100);

    #[tokio::test(start_paused = true)]
    async fn test_periodic_unhealthy_alternates() {
        let simulator = FaultSimulator::start(FaultMode::PeriodicUnhealthy);
        let health = simulator.health().clone();

        assert_eq!(health.snapshot(), HealthFlags::default());
        assert_eq!(simulator.admit(), Admission::Serve);

        sleep(UNHEALTHY_PERIOD - JUST_BEFORE).await;
        assert!(health.is_healthy());

        let mut expected_healthy = true;
        for _ in 0..4 {
            sleep(JUST_BEFORE * 2).await;
            expected_healthy = !expected_healthy;
            assert_eq!(health.is_healthy(), expected_healthy);
            assert_eq!(health.is_unavailable(), !expected_healthy);
            sleep(UNHEALTHY_PERIOD - JUST_BEFORE * 2).await;
            assert_eq!(health.is_healthy(), expected_healthy);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_unhealthy_rejects_while_unavailable() {
        let simulator = FaultSimulator::start(FaultMode::PeriodicUnhealthy);

        sleep(UNHEALTHY_PERIOD + JUST_BEFORE).await;
        assert_eq!(simulator.admit(), Admission::Reject);

        sleep(UNHEALTHY_PERIOD).await;
        assert_eq!(simulator.admit(), Admission::Serve);
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_unavailable_keeps_healthy() {
        let simulator = FaultSimulator::start(FaultMode::PeriodicUnavailable);
        let health = simulator.health().clone();

        sleep(UNAVAILABLE_PERIOD - JUST_BEFORE).await;
        assert!(!health.is_unavailable());

        sleep(JUST_BEFORE * 2).await;
        assert!(health.is_unavailable());
        assert!(health.is_healthy());
        assert_eq!(simulator.admit(), Admission::Reject);

        sleep(UNAVAILABLE_PERIOD).await;
        assert!(!health.is_unavailable());
        assert_eq!(simulator.admit(), Admission::Serve);
    }

    #[tokio::test]
    async fn test_probabilistic_fault() {
        let simulator = FaultSimulator::start(FaultMode::ProbabilisticFault);

        assert_eq!(simulator.admission_for(0.0), Admission::Reject);
        assert_eq!(simulator.admission_for(0.5), Admission::Reject);
        assert_eq!(simulator.admission_for(0.51), Admission::Serve);
        assert_eq!(simulator.admission_for(0.99), Admission::Serve);
        // No state is kept between requests
        assert!(simulator.health().is_healthy());
        assert!(!simulator.health().is_unavailable());
    }

    #[tokio::test]
    async fn test_probabilistic_delay() {
        let simulator = FaultSimulator::start(FaultMode::ProbabilisticDelay);

        assert_eq!(
            simulator.admission_for(0.25),
            Admission::Delay(Duration::from_secs(7))
        );
        assert_eq!(simulator.admission_for(0.75), Admission::Serve);
    }

    #[tokio::test]
    async fn test_probabilistic_draws_cover_both_outcomes() {
        let simulator = FaultSimulator::start(FaultMode::ProbabilisticFault);

        let rejected = (0..1000)
            .filter(|_| simulator.admit() == Admission::Reject)
            .count();

        assert!(rejected > 0 && rejected < 1000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_mode_always_serves() {
        let simulator = FaultSimulator::start(FaultMode::None);

        sleep(UNHEALTHY_PERIOD * 3).await;
        assert_eq!(simulator.admission_for(0.0), Admission::Serve);
        assert!(simulator.health().is_healthy());
    }
}
