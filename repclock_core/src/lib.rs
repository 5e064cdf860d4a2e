#![forbid(unsafe_code)]

//! Core domain model and session engine for repclock.
//!
//! This crate provides:
//! - Domain types (exercises, unit records, session reports)
//! - Unit progression policy
//! - Clock, recorder and exercise sequencer
//! - The session state machine
//! - Routine loading and the report journal

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod clock;
pub mod policy;
pub mod recorder;
pub mod sequencer;
pub mod observer;
pub mod machine;
pub mod routine;
pub mod journal;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::{Config, SessionConfig, SessionTotalScope};
pub use clock::Clock;
pub use policy::classify;
pub use recorder::SessionRecorder;
pub use sequencer::ExerciseSequencer;
pub use observer::{NullObserver, ReportCollector, SessionObserver};
pub use machine::SessionStateMachine;
pub use routine::{load_routine, Routine};
pub use journal::{read_journal, JournalEntry, JsonlJournal, ReportSink};
