//! # Shared Monitor
//!
//! `Arc<Mutex<Monitor>>` for hosts that deliver overlap events from more
//! than one thread. Each call holds the lock for a whole cycle, so an agent
//! can never be evicted between the solve that names it and the dispatch
//! that resolves its handle.

use std::sync::Arc;

use parking_lot::Mutex;

use junction_core::VehicleId;

use crate::actuation::VehicleHandle;
use crate::event::OverlapEvent;
use crate::monitor::{CycleReport, Monitor};

/// Cloneable, thread-safe handle to one [`Monitor`].
#[derive(Debug, Clone)]
pub struct SharedMonitor {
    inner: Arc<Mutex<Monitor>>,
}

impl SharedMonitor {
    /// Share `monitor`.
    pub fn new(monitor: Monitor) -> Self {
        Self {
            inner: Arc::new(Mutex::new(monitor)),
        }
    }

    /// Run one event through a full cycle under the lock.
    pub fn handle_event(&self, event: OverlapEvent) -> Option<CycleReport> {
        self.inner.lock().handle_event(event)
    }

    /// Register a vehicle's actuation handle.
    pub fn attach(&self, vehicle: VehicleId, handle: Box<dyn VehicleHandle>) {
        self.inner.lock().attach(vehicle, handle);
    }

    /// Run `f` with exclusive access to the monitor.
    pub fn with<R>(&self, f: impl FnOnce(&mut Monitor) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuation::{CommandLog, RecordingHandle};
    use junction_core::{ForkId, MonitorConfig, Vec3};
    use junction_geometry::{DeclaredOverlaps, Intersection};
    use junction_reasoner::StratifiedOracle;

    const RULES: &str = "hasRightOfWay(V) :- arrivesAtForkAtTime(V, _, _).\n";

    fn shared() -> SharedMonitor {
        let mut ix = Intersection::new();
        ix.add_fork(
            ForkId::new("a").unwrap(),
            Vec3::planar(0.0, 0.0),
            Vec3::planar(1.0, 0.0),
        )
        .unwrap();
        let monitor = Monitor::with_rules(
            MonitorConfig::default(),
            ix,
            Box::new(DeclaredOverlaps::new()),
            RULES,
            Box::new(StratifiedOracle::new()),
        )
        .unwrap();
        SharedMonitor::new(monitor)
    }

    #[test]
    fn events_from_many_threads_are_serialized() {
        let monitor = shared();
        let log = CommandLog::new();
        let workers: Vec<_> = (0..4)
            .map(|i| {
                let monitor = monitor.clone();
                let log = log.clone();
                std::thread::spawn(move || {
                    let vehicle = VehicleId::new(format!("car{i}")).unwrap();
                    monitor.attach(
                        vehicle.clone(),
                        Box::new(RecordingHandle::new(vehicle.clone(), log)),
                    );
                    monitor.handle_event(OverlapEvent::Arrival {
                        vehicle: vehicle.clone(),
                        fork: ForkId::new("a").unwrap(),
                        sim_time: i as f64,
                        signal: None,
                    });
                    monitor.handle_event(OverlapEvent::ExitIntersection { vehicle });
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
        monitor.with(|m| {
            assert!(m.ledger().is_empty());
            assert!(m.handles().is_empty());
        });
        // Every vehicle was told to go at least once while it was present.
        for i in 0..4 {
            let vehicle = VehicleId::new(format!("car{i}")).unwrap();
            assert_eq!(
                log.last_for(&vehicle),
                Some(crate::actuation::ActuationCommand::Go)
            );
        }
    }
}
