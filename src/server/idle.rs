//! Idle-lifecycle supervisor: shuts the server down once no client has
//! signalled liveness for longer than the configured threshold.

use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SupervisorState {
    Active,
    ShuttingDown,
}

struct Inner {
    last_activity: Instant,
    state: SupervisorState,
}

/// Shared between the request path (heartbeats call [`touch`]) and the
/// periodic checker task ([`run`]). ShuttingDown is terminal: once the
/// shutdown signal has fired, later signals and checks are ignored.
///
/// [`touch`]: IdleSupervisor::touch
/// [`run`]: IdleSupervisor::run
pub struct IdleSupervisor {
    inner: Mutex<Inner>,
    shutdown_tx: watch::Sender<bool>,
    idle_timeout: Duration,
    check_interval: Duration,
}

impl IdleSupervisor {
    pub fn new(idle_timeout: Duration, check_interval: Duration) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            inner: Mutex::new(Inner {
                last_activity: Instant::now(),
                state: SupervisorState::Active,
            }),
            shutdown_tx,
            idle_timeout,
            check_interval,
        }
    }

    /// Liveness signal: resets the idle clock while the supervisor is
    /// still active.
    pub fn touch(&self) {
        let mut inner = self.inner.lock().expect("idle supervisor lock poisoned");
        if inner.state == SupervisorState::Active {
            inner.last_activity = Instant::now();
        }
    }

    /// A receiver that flips to `true` exactly once, when the supervisor
    /// decides to shut down.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// One idle check against the given clock reading. Returns `true` when
    /// this call performed the Active -> ShuttingDown transition.
    fn check_at(&self, now: Instant) -> bool {
        let mut inner = self.inner.lock().expect("idle supervisor lock poisoned");
        if inner.state != SupervisorState::Active {
            return false;
        }
        let idle_for = now.duration_since(inner.last_activity);
        if idle_for < self.idle_timeout {
            return false;
        }

        inner.state = SupervisorState::ShuttingDown;
        tracing::warn!(
            "No heartbeat for {:?} (threshold {:?}), shutting down",
            idle_for,
            self.idle_timeout
        );
        // send_replace stores the value even while nobody is subscribed yet.
        self.shutdown_tx.send_replace(true);
        true
    }

    pub fn check(&self) -> bool {
        self.check_at(Instant::now())
    }

    /// The periodic checker. Runs on its own schedule, independent of
    /// request handling, and exits after the shutdown transition fires.
    pub async fn run(&self) {
        let mut ticker = tokio::time::interval(self.check_interval);
        ticker.tick().await; // the first tick completes immediately
        loop {
            ticker.tick().await;
            if self.check() {
                break;
            }
        }
    }
}
