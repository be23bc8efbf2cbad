pub mod log;
pub mod reconstructor;
pub mod snapshot;
pub mod worker;

pub use log::{Info, LogRecord, ReplayLog};
pub use reconstructor::CycleReconstructor;
pub use snapshot::CycleSnapshot;
pub use worker::{IconAtlas, LoadRequest, ReplayWorker, WorkerEvent};
