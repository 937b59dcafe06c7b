//! Core state and persistence for StudyFlow.
//!
//! Everything here is UI-agnostic: the countdown engine, the task list,
//! cumulative statistics and the key-value persistence layer they are
//! flushed to. Both the TUI and studyflowctl build on this crate.

pub mod stats;
pub mod store;
pub mod tasks;
pub mod timer;

pub use stats::Stats;
pub use store::{FileBackend, MemoryBackend, PersistenceStore, StorageBackend, StoreError};
pub use tasks::{Subject, Task, TaskStore};
pub use timer::{format_time, SessionCompleted, SessionKind, Ticker, TimerEngine};
