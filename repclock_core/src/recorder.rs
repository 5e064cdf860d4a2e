//! Per-exercise accumulation of completed units.

use crate::{Error, ExerciseSpec, Result, SessionReport, UnitKind, UnitRecord};

/// Collects unit records for one exercise and produces its report.
///
/// A recorder belongs to exactly one exercise instance; the session state
/// machine creates a fresh one when it advances.
#[derive(Debug, Clone)]
pub struct SessionRecorder {
    exercise_id: String,
    unit_kind: UnitKind,
    units: Vec<UnitRecord>,
    finalized: bool,
}

impl SessionRecorder {
    pub fn new(exercise: &ExerciseSpec) -> Self {
        Self {
            exercise_id: exercise.id.clone(),
            unit_kind: exercise.unit_kind,
            units: Vec::new(),
            finalized: false,
        }
    }

    pub fn units(&self) -> &[UnitRecord] {
        &self.units
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Sum of recorded unit times for this exercise
    pub fn total_elapsed_seconds(&self) -> u64 {
        self.units.iter().map(|u| u.elapsed_seconds).sum()
    }

    /// Append a completed unit with the next sequential index
    ///
    /// Weight is dropped for round exercises and blank weights are treated
    /// as absent.
    pub fn record_unit(&mut self, elapsed_seconds: i64, weight: Option<String>) -> Result<&UnitRecord> {
        if self.finalized {
            return Err(Error::AlreadyFinalized {
                exercise_id: self.exercise_id.clone(),
            });
        }
        if elapsed_seconds < 0 {
            return Err(Error::InvalidUnit(format!(
                "elapsed time must not be negative (got {}s)",
                elapsed_seconds
            )));
        }

        let weight = if self.unit_kind.tracks_weight() {
            weight.filter(|w| !w.trim().is_empty())
        } else {
            None
        };

        let record = UnitRecord {
            unit_index: self.units.len() as u32 + 1,
            elapsed_seconds: elapsed_seconds as u64,
            weight,
        };
        tracing::debug!(
            "Recorded {} {} of '{}': {}s",
            self.unit_kind,
            record.unit_index,
            self.exercise_id,
            record.elapsed_seconds
        );
        self.units.push(record);

        Ok(&self.units[self.units.len() - 1])
    }

    /// Produce the report. Only the first call succeeds.
    pub fn finalize(&mut self) -> Result<SessionReport> {
        if self.finalized {
            return Err(Error::AlreadyFinalized {
                exercise_id: self.exercise_id.clone(),
            });
        }
        self.finalized = true;

        Ok(SessionReport {
            exercise_id: self.exercise_id.clone(),
            unit_kind: self.unit_kind,
            total_elapsed_seconds: self.total_elapsed_seconds(),
            units: self.units.clone(),
        })
    }
}
