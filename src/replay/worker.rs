//! Background worker and host message protocol
//!
//! The reconstruction pipeline runs on one dedicated thread with no internal
//! parallelism; host and worker exchange owned messages over ordered
//! channels and share no mutable state. Every payload is serializable, so a
//! host that needs a process or wire boundary can re-encode messages
//! losslessly.

use std::thread::{self, JoinHandle};

use ahash::AHashMap;
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use crate::core::config::ReplaySettings;
use crate::core::types::Cycle;
use crate::entity::classify::IconKind;
use crate::geometry::bounds::MapBounds;
use crate::history::historian::Historian;
use crate::replay::log::{Info, ReplayLog};
use crate::replay::reconstructor::CycleReconstructor;

/// Host-supplied mapping from icon kinds to texture slots.
/// Icons without a registered slot are simply not baked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IconAtlas {
    slots: AHashMap<IconKind, u32>,
}

impl IconAtlas {
    /// Atlas with every icon mapped to consecutive slots, in the order the
    /// host's texture list is conventionally built
    pub fn sequential() -> Self {
        let mut atlas = Self::default();
        for (slot, kind) in IconKind::ALL.iter().enumerate() {
            atlas.register(*kind, slot as u32);
        }
        atlas
    }

    pub fn register(&mut self, kind: IconKind, slot: u32) {
        self.slots.insert(kind, slot);
    }

    pub fn slot(&self, kind: IconKind) -> Option<u32> {
        self.slots.get(&kind).copied()
    }
}

/// Everything the host sends to start one replay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadRequest {
    /// Raw newline-delimited JSON log text
    pub log: String,
    pub atlas: IconAtlas,
}

/// Messages streamed from the worker back to the host.
///
/// Delivery order is preserved; `CycleData` arrives in cycle-number order,
/// after the one-shot `Info` and `MapBounds` messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum WorkerEvent {
    /// Parsed run metadata, sent once after the baseline scan
    Info(Info),
    /// Human-readable status, percent optional
    Progress { text: String, percent: Option<f32> },
    /// Map extent for camera fitting, sent once after the baseline scan
    MapBounds(MapBounds),
    /// One baked historian, tagged with its cycle number
    CycleData { cycle: Cycle, historian: Historian },
    /// Fatal pipeline failure; no further events follow
    Failed { message: String },
}

/// Run the pipeline synchronously, streaming events into `events`.
///
/// This is the worker thread's body; tests and embedded hosts may drive it
/// directly on the current thread.
pub fn run_pipeline(request: &LoadRequest, settings: ReplaySettings, events: &Sender<WorkerEvent>) {
    let log = match ReplayLog::parse(&request.log) {
        Ok(log) => log,
        Err(error) => {
            tracing::error!(%error, "replay log rejected");
            let _ = events.send(WorkerEvent::Failed {
                message: error.to_string(),
            });
            return;
        }
    };

    let mut reconstructor =
        CycleReconstructor::new(settings, request.atlas.clone(), events.clone());
    if let Err(error) = reconstructor.run(&log) {
        tracing::error!(%error, "replay pipeline failed");
        let _ = events.send(WorkerEvent::Failed {
            message: error.to_string(),
        });
    }
}

/// Handle to a running replay worker
pub struct ReplayWorker {
    handle: JoinHandle<()>,
    events: Receiver<WorkerEvent>,
}

impl ReplayWorker {
    /// Spawn the dedicated worker thread for one replay. There is no
    /// cancellation: to abort, drop the whole handle and its receiver.
    pub fn spawn(request: LoadRequest, settings: ReplaySettings) -> Self {
        let (sender, receiver) = unbounded();
        let handle = thread::spawn(move || run_pipeline(&request, settings, &sender));
        Self {
            handle,
            events: receiver,
        }
    }

    /// Event stream from the worker; iterate until disconnection
    pub fn events(&self) -> &Receiver<WorkerEvent> {
        &self.events
    }

    /// Block until the worker finishes processing
    pub fn join(self) {
        let _ = self.handle.join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_atlas_covers_every_icon() {
        let atlas = IconAtlas::sequential();
        for kind in IconKind::ALL {
            assert!(atlas.slot(kind).is_some());
        }
        assert_eq!(atlas.slot(IconKind::PoliceOffice), Some(0));
        assert_eq!(atlas.slot(IconKind::Hydrant), Some(5));
    }

    #[test]
    fn test_atlas_round_trips_through_json() {
        let atlas = IconAtlas::sequential();
        let encoded = serde_json::to_string(&atlas).unwrap();
        let decoded: IconAtlas = serde_json::from_str(&encoded).unwrap();
        for kind in IconKind::ALL {
            assert_eq!(decoded.slot(kind), atlas.slot(kind));
        }
    }

    #[test]
    fn test_malformed_log_reports_failure() {
        let request = LoadRequest {
            log: "this is not json".to_string(),
            atlas: IconAtlas::sequential(),
        };
        let worker = ReplayWorker::spawn(request, ReplaySettings::default());
        let events: Vec<WorkerEvent> = worker.events().iter().collect();
        worker.join();

        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], WorkerEvent::Failed { .. }));
    }
}
