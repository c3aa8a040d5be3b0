use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::http_probe::Prober;
use crate::http_probe::result::ProbeResult;
use crate::notify::{CompositeNotifier, StatusEvent};
use crate::store::ResultSlot;

/// Probes one URL forever at a fixed interval and publishes each result.
///
/// The loop is sequential: a slow probe delays the next one, it never
/// overlaps with it. Sleeping goes through tokio's clock, so tests can pause
/// and advance time.
pub struct Scheduler<P> {
    prober: P,
    slot: ResultSlot,
    interval: Duration,
    notifier: CompositeNotifier,
    last_alerts: Vec<String>,
}

impl<P: Prober + 'static> Scheduler<P> {
    pub fn new(prober: P, slot: ResultSlot, interval: Duration, notifier: CompositeNotifier) -> Self {
        Self {
            prober,
            slot,
            interval,
            notifier,
            last_alerts: Vec::new(),
        }
    }

    /// Spawns the loop on the current runtime.
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub async fn run(mut self) {
        info!(
            url = self.slot.url(),
            interval_secs = self.interval.as_secs(),
            "site monitor started"
        );
        self.notifier
            .broadcast(&StatusEvent::MonitoringStarted {
                url: self.slot.url().to_string(),
            })
            .await;

        loop {
            self.cycle().await;
            sleep(self.interval).await;
        }
    }

    /// One probe, publish and notify pass.
    pub async fn cycle(&mut self) {
        let result = self.prober.probe(self.slot.url()).await;

        if result.is_healthy() {
            info!(
                url = %result.url,
                status = ?result.status_code,
                load_time = ?result.load_time_seconds,
                "probe ok"
            );
        } else {
            warn!(
                url = %result.url,
                status = ?result.status_code,
                alerts = ?result.alerts,
                "probe reported alerts"
            );
        }

        let event = transition(&self.last_alerts, &result);
        self.last_alerts = result.alerts.clone();
        self.slot.publish(result);

        if let Some(event) = event {
            self.notifier.broadcast(&event).await;
        }
    }
}

/// Event to emit when moving from `previous` alerts to `current`, if any.
fn transition(previous: &[String], current: &ProbeResult) -> Option<StatusEvent> {
    if current.is_healthy() {
        if previous.is_empty() {
            None
        } else {
            Some(StatusEvent::Recovered {
                url: current.url.clone(),
            })
        }
    } else if current.alerts.as_slice() != previous {
        Some(StatusEvent::alerts_raised(current))
    } else {
        None
    }
}
