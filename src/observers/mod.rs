// src/observers/mod.rs

//! Observers shipped with the crate. Anything implementing
//! [`GitObserver`](crate::observer::GitObserver) can be registered alongside them.

pub mod export;
pub mod logging;
pub mod memory;
pub mod progress;
pub mod rollup;

pub use export::{DatasetExporter, FileCommitRow};
pub use logging::LoggingObserver;
pub use memory::{BeginArgs, Event, InMemoryCollector};
pub use progress::ProgressObserver;
pub use rollup::{AuthorPeriodRollup, Period, PeriodRollup};
