//! Session state machine.
//!
//! Drives one training session through the day's exercises. The machine owns
//! a single [`Clock`], the [`ExerciseSequencer`] and one [`SessionRecorder`]
//! per exercise. It has no thread and performs no I/O: the host forwards user
//! intents and a 1 Hz `tick()`, renders the returned [`Transition`] or
//! [`SessionSnapshot`], and receives finished reports through a
//! [`SessionObserver`].
//!
//! ## Phases
//!
//! ```text
//! Idle -> Running <-> Paused
//!         Running/Paused -(unit done)-> Resting -(continue)-> Running
//!         Running/Paused -(last unit)-> AwaitingNextExercise -(advance)-> Running
//!         any -(finish)-> Completed        any -(close)-> Idle
//! ```
//!
//! After the last unit of the last exercise the machine stays `Running` with
//! the day flagged complete; only `finish_session` moves it on.
//!
//! The clock is only ever stopped by `finish_session` and `close`. Between
//! units, rests and exercises it is re-zeroed and keeps counting.

use crate::clock::Clock;
use crate::config::{SessionConfig, SessionTotalScope};
use crate::observer::{NullObserver, SessionObserver};
use crate::recorder::SessionRecorder;
use crate::sequencer::ExerciseSequencer;
use crate::{
    Error, ExerciseSpec, Intent, Result, SessionPhase, SessionReport, SessionSnapshot, Transition,
};

#[derive(Debug, Clone)]
pub struct SessionStateMachine<O: SessionObserver = NullObserver> {
    sequencer: ExerciseSequencer,
    clock: Clock,
    recorder: SessionRecorder,
    phase: SessionPhase,
    /// 1-based index of the unit in progress (or just finished, while resting)
    unit_index: u32,
    pending_weight: Option<String>,
    day_complete: bool,
    /// Totals of every report emitted this session, in order
    reported_totals: Vec<u64>,
    session_total: Option<u64>,
    total_scope: SessionTotalScope,
    observer: O,
}

impl SessionStateMachine<NullObserver> {
    /// Build a machine with default settings and no observer
    pub fn new(exercises: Vec<ExerciseSpec>) -> Result<Self> {
        Self::with_observer(exercises, &SessionConfig::default(), NullObserver)
    }
}

impl<O: SessionObserver> SessionStateMachine<O> {
    pub fn with_observer(
        exercises: Vec<ExerciseSpec>,
        config: &SessionConfig,
        observer: O,
    ) -> Result<Self> {
        let sequencer = ExerciseSequencer::new(exercises)?;
        let recorder = SessionRecorder::new(sequencer.current());
        Ok(Self {
            sequencer,
            clock: Clock::new(),
            recorder,
            phase: SessionPhase::Idle,
            unit_index: 1,
            pending_weight: None,
            day_complete: false,
            reported_totals: Vec::new(),
            session_total: None,
            total_scope: config.total_scope,
            observer,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn unit_index(&self) -> u32 {
        self.unit_index
    }

    pub fn current_exercise(&self) -> &ExerciseSpec {
        self.sequencer.current()
    }

    pub fn sequencer(&self) -> &ExerciseSequencer {
        &self.sequencer
    }

    pub fn recorder(&self) -> &SessionRecorder {
        &self.recorder
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.clock.elapsed_seconds()
    }

    pub fn pending_weight(&self) -> Option<&str> {
        self.pending_weight.as_deref()
    }

    /// Last unit of the last exercise is done; only finishing remains
    pub fn is_day_complete(&self) -> bool {
        self.day_complete
    }

    /// Total reported when the session finished
    pub fn session_total(&self) -> Option<u64> {
        self.session_total
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Everything a presentation layer needs to render the current state
    pub fn snapshot(&self) -> SessionSnapshot {
        let exercise = self.sequencer.current();
        let elapsed = self.clock.elapsed_seconds();
        let rest_remaining_seconds = match self.phase {
            SessionPhase::Resting | SessionPhase::AwaitingNextExercise => exercise
                .rest_seconds
                .map(|rest| u64::from(rest).saturating_sub(elapsed)),
            _ => None,
        };

        SessionSnapshot {
            phase: self.phase,
            exercise_id: exercise.id.clone(),
            exercise_name: exercise.name.clone(),
            exercise_position: self.sequencer.position() + 1,
            exercise_count: self.sequencer.len(),
            unit_kind: exercise.unit_kind,
            unit_index: self.unit_index,
            total_units: exercise.total_units,
            unit_label: format!(
                "{} {}/{}",
                exercise.unit_kind.label(),
                self.unit_index,
                exercise.total_units
            ),
            elapsed_seconds: elapsed,
            pending_weight: self.pending_weight.clone(),
            day_complete: self.day_complete,
            reports_emitted: self.reported_totals.len(),
            rest_remaining_seconds,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Apply any intent. Equivalent to calling the matching method.
    pub fn dispatch(&mut self, intent: Intent) -> Result<Transition> {
        match intent {
            Intent::Start => self.start(),
            Intent::Pause => self.pause(),
            Intent::Resume => self.resume(),
            Intent::SetWeight(value) => self.set_weight(value),
            Intent::CompleteUnit => self.complete_unit(),
            Intent::ContinueRest => self.continue_after_rest(),
            Intent::AdvanceExercise => self.advance_to_next_exercise(),
            Intent::FinishSession => self.finish_session(),
            Intent::Close => self.close(),
            Intent::Tick => {
                self.tick();
                Ok(Transition::to(self.phase))
            }
        }
    }

    /// One second of host time has passed
    pub fn tick(&mut self) {
        self.clock.tick();
    }

    pub fn start(&mut self) -> Result<Transition> {
        if self.phase != SessionPhase::Idle {
            return Err(self.reject(&Intent::Start));
        }

        // Closed while waiting for the next exercise: pick up from there
        if self.recorder.is_finalized() && !self.day_complete {
            self.enter_next_exercise()?;
        }

        self.clock.start();
        self.phase = SessionPhase::Running;
        tracing::debug!(
            "Session started on '{}' unit {}",
            self.sequencer.current().id,
            self.unit_index
        );
        Ok(Transition::to(self.phase))
    }

    pub fn pause(&mut self) -> Result<Transition> {
        match self.phase {
            SessionPhase::Running => {
                self.clock.pause();
                self.phase = SessionPhase::Paused;
                tracing::debug!("Paused at {}s", self.clock.elapsed_seconds());
            }
            SessionPhase::Paused => {}
            _ => return Err(self.reject(&Intent::Pause)),
        }
        Ok(Transition::to(self.phase))
    }

    pub fn resume(&mut self) -> Result<Transition> {
        match self.phase {
            SessionPhase::Paused => {
                self.clock.resume();
                self.phase = SessionPhase::Running;
                tracing::debug!("Resumed at {}s", self.clock.elapsed_seconds());
            }
            SessionPhase::Running => {}
            _ => return Err(self.reject(&Intent::Resume)),
        }
        Ok(Transition::to(self.phase))
    }

    /// Set the load for the next unit recorded. A blank value clears it.
    pub fn set_weight(&mut self, value: impl Into<String>) -> Result<Transition> {
        let intent = Intent::SetWeight(String::new());
        if self.phase == SessionPhase::Completed || self.day_complete {
            return Err(self.reject(&intent));
        }

        let value: String = value.into();
        let value = value.trim();
        if value.chars().any(char::is_control) {
            return Err(Error::InvalidUnit(
                "weight must not contain control characters".into(),
            ));
        }

        self.pending_weight = if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        };
        Ok(Transition::to(self.phase))
    }

    /// Complete the unit in progress using the clock's elapsed time
    pub fn complete_unit(&mut self) -> Result<Transition> {
        let elapsed = self.clock.elapsed_seconds();
        self.complete_unit_with(elapsed as i64)
    }

    /// Complete the unit in progress with an externally measured time
    ///
    /// Fractional seconds are truncated. Negative or non-finite values fail
    /// with `InvalidUnit` and leave the session untouched.
    pub fn complete_unit_timed(&mut self, elapsed_seconds: f64) -> Result<Transition> {
        self.ensure_unit_in_progress()?;
        if !elapsed_seconds.is_finite() || elapsed_seconds < 0.0 {
            return Err(Error::InvalidUnit(format!(
                "elapsed time must be a finite, non-negative number (got {})",
                elapsed_seconds
            )));
        }
        self.complete_unit_with(elapsed_seconds.trunc() as i64)
    }

    pub fn continue_after_rest(&mut self) -> Result<Transition> {
        if self.phase != SessionPhase::Resting {
            return Err(self.reject(&Intent::ContinueRest));
        }

        self.clock.reset();
        self.unit_index += 1;
        self.phase = SessionPhase::Running;
        tracing::debug!(
            "Rest over, starting unit {}/{}",
            self.unit_index,
            self.sequencer.current().total_units
        );
        Ok(Transition::to(self.phase))
    }

    pub fn advance_to_next_exercise(&mut self) -> Result<Transition> {
        match self.phase {
            SessionPhase::AwaitingNextExercise => {}
            SessionPhase::Completed => return Err(self.reject(&Intent::AdvanceExercise)),
            _ if self.day_complete => return Err(Error::NoMoreExercises),
            _ => return Err(self.reject(&Intent::AdvanceExercise)),
        }

        self.enter_next_exercise()?;
        self.restart_clock();
        self.phase = SessionPhase::Running;
        Ok(Transition::to(self.phase))
    }

    /// Finish the session, finalizing whatever the current exercise holds
    pub fn finish_session(&mut self) -> Result<Transition> {
        if self.phase == SessionPhase::Completed {
            return Err(self.reject(&Intent::FinishSession));
        }

        let unit_in_progress = matches!(self.phase, SessionPhase::Running | SessionPhase::Paused)
            && !self.day_complete
            && !self.recorder.is_finalized()
            && self.clock.elapsed_seconds() > 0;

        if unit_in_progress {
            let elapsed = self.clock.elapsed_seconds() as i64;
            let weight = self.pending_weight.take();
            self.recorder.record_unit(elapsed, weight)?;
        }
        self.clock.stop();

        let mut report = None;
        if !self.recorder.is_finalized() && !self.recorder.units().is_empty() {
            let finished = self.recorder.finalize()?;
            self.emit_report(&finished);
            report = Some(finished);
        }

        let total = match self.total_scope {
            SessionTotalScope::AllExercises => self.reported_totals.iter().sum(),
            SessionTotalScope::LastExercise => self.recorder.total_elapsed_seconds(),
        };

        self.pending_weight = None;
        self.phase = SessionPhase::Completed;
        self.session_total = Some(total);
        tracing::info!(
            "Session finished: {}s over {} exercise report(s)",
            total,
            self.reported_totals.len()
        );
        self.observer.on_session_finished(total);

        Ok(Transition {
            phase: self.phase,
            report,
            session_total: Some(total),
        })
    }

    /// Abandon the unit in flight and return to `Idle`
    ///
    /// Closing a completed session rewinds to the first exercise.
    pub fn close(&mut self) -> Result<Transition> {
        self.clock.stop();
        self.pending_weight = None;

        match self.phase {
            SessionPhase::Completed => {
                self.sequencer.rewind();
                self.recorder = SessionRecorder::new(self.sequencer.current());
                self.unit_index = 1;
                self.day_complete = false;
                self.reported_totals.clear();
                self.session_total = None;
            }
            // The recorded unit stands; the next one is what gets resumed
            SessionPhase::Resting => self.unit_index += 1,
            _ => {}
        }

        if self.phase != SessionPhase::Idle {
            tracing::debug!("Session closed from {:?}", self.phase);
        }
        self.phase = SessionPhase::Idle;
        Ok(Transition::to(self.phase))
    }

    // ── Internals ────────────────────────────────────────────────────

    fn complete_unit_with(&mut self, elapsed_seconds: i64) -> Result<Transition> {
        self.ensure_unit_in_progress()?;

        self.recorder
            .record_unit(elapsed_seconds, self.pending_weight.clone())?;
        self.pending_weight = None;

        let total_units = self.sequencer.current().total_units;
        if self.unit_index < total_units {
            self.restart_clock();
            self.phase = SessionPhase::Resting;
            return Ok(Transition::to(self.phase));
        }

        let report = self.recorder.finalize()?;
        self.emit_report(&report);
        self.restart_clock();

        if self.sequencer.has_next() {
            self.phase = SessionPhase::AwaitingNextExercise;
        } else {
            self.day_complete = true;
            self.phase = SessionPhase::Running;
            tracing::info!("Last exercise done; day complete");
        }

        Ok(Transition {
            phase: self.phase,
            report: Some(report),
            session_total: None,
        })
    }

    fn ensure_unit_in_progress(&self) -> Result<()> {
        let active = matches!(self.phase, SessionPhase::Running | SessionPhase::Paused);
        if active && !self.day_complete {
            Ok(())
        } else {
            Err(self.reject(&Intent::CompleteUnit))
        }
    }

    fn enter_next_exercise(&mut self) -> Result<()> {
        let next = self.sequencer.advance()?;
        self.recorder = SessionRecorder::new(next);
        self.unit_index = 1;
        Ok(())
    }

    /// Re-zero the clock and make sure it is counting
    fn restart_clock(&mut self) {
        self.clock.reset();
        self.clock.start();
    }

    fn emit_report(&mut self, report: &SessionReport) {
        tracing::info!(
            "Exercise '{}' finalized: {} {}(s), {}s",
            report.exercise_id,
            report.units.len(),
            report.unit_kind,
            report.total_elapsed_seconds
        );
        self.reported_totals.push(report.total_elapsed_seconds);
        self.observer.on_exercise_report_ready(report);
    }

    fn reject(&self, intent: &Intent) -> Error {
        tracing::warn!("Rejected '{}' while {:?}", intent.name(), self.phase);
        Error::InvalidTransition {
            phase: self.phase,
            intent: intent.name(),
        }
    }
}
