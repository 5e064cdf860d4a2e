//! Core domain types for the repclock session engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercise configuration as supplied by a routine, and the validated spec
//! - Unit records and per-exercise session reports
//! - Session phases and intents

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Exercise Types
// ============================================================================

/// How the units of an exercise are counted and labelled
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Series,
    Dropset,
    Round,
}

impl UnitKind {
    /// Human-readable unit label ("Series", "Dropset", "Round")
    pub fn label(&self) -> &'static str {
        match self {
            UnitKind::Series => "Series",
            UnitKind::Dropset => "Dropset",
            UnitKind::Round => "Round",
        }
    }

    /// Whether units of this kind carry a load
    pub fn tracks_weight(&self) -> bool {
        !matches!(self, UnitKind::Round)
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One member of a grouped round
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubExerciseSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
}

impl SubExerciseSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reps: None,
        }
    }
}

/// Raw exercise entry as the routine store supplies it.
///
/// The unit kind is not trusted as declared; `ExerciseSpec::from_config`
/// resolves it through the progression policy.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct ExerciseConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kind: Option<UnitKind>,
    #[serde(default)]
    pub series: Option<u32>,
    #[serde(default)]
    pub dropsets: Option<u32>,
    #[serde(default)]
    pub rounds: Option<u32>,
    #[serde(default, rename = "sub_exercise")]
    pub sub_exercises: Vec<SubExerciseSpec>,
    #[serde(default)]
    pub rest_seconds: Option<u32>,
}

/// A validated exercise ready to be timed
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseSpec {
    pub id: String,
    pub name: String,
    pub unit_kind: UnitKind,
    pub total_units: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_exercises: Vec<SubExerciseSpec>,
    /// Suggested rest between units; informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_seconds: Option<u32>,
}

// ============================================================================
// Records and Reports
// ============================================================================

/// One completed unit of work
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnitRecord {
    /// 1-based position within the exercise
    pub unit_index: u32,
    pub elapsed_seconds: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
}

/// Finalized record of every unit completed for one exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionReport {
    pub exercise_id: String,
    pub unit_kind: UnitKind,
    pub total_elapsed_seconds: u64,
    pub units: Vec<UnitRecord>,
}

// ============================================================================
// Session State Types
// ============================================================================

/// Phase of the session state machine
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    Running,
    Paused,
    Resting,
    AwaitingNextExercise,
    Completed,
}

/// A discrete user action or host event delivered to the state machine
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    Start,
    Pause,
    Resume,
    SetWeight(String),
    CompleteUnit,
    ContinueRest,
    AdvanceExercise,
    FinishSession,
    Close,
    /// One second of host time has passed
    Tick,
}

impl Intent {
    /// Short verb used in logs and transition errors
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Start => "start",
            Intent::Pause => "pause",
            Intent::Resume => "resume",
            Intent::SetWeight(_) => "set weight",
            Intent::CompleteUnit => "complete unit",
            Intent::ContinueRest => "continue after rest",
            Intent::AdvanceExercise => "advance exercise",
            Intent::FinishSession => "finish session",
            Intent::Close => "close",
            Intent::Tick => "tick",
        }
    }
}

/// Outcome of a successfully applied intent
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub phase: SessionPhase,
    /// Report finalized by this intent, if any
    pub report: Option<SessionReport>,
    /// Session-level total, set only by the intent that finished the session
    pub session_total: Option<u64>,
}

impl Transition {
    pub(crate) fn to(phase: SessionPhase) -> Self {
        Self {
            phase,
            report: None,
            session_total: None,
        }
    }
}

/// Read-only view of the engine for presentation layers
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub exercise_id: String,
    pub exercise_name: String,
    /// 1-based position of the current exercise in the queue
    pub exercise_position: usize,
    pub exercise_count: usize,
    pub unit_kind: UnitKind,
    pub unit_index: u32,
    pub total_units: u32,
    pub unit_label: String,
    pub elapsed_seconds: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_weight: Option<String>,
    pub day_complete: bool,
    pub reports_emitted: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_remaining_seconds: Option<u64>,
}
