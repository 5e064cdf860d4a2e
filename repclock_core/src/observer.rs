//! Outbound notifications from the session engine.
//!
//! The engine never talks to storage. Hosts register an observer and decide
//! what to do with finished reports.

use crate::SessionReport;

/// Receiver for finalized exercise reports and session completion
pub trait SessionObserver {
    /// Fired once per exercise, when its units are exhausted or the session
    /// is finished mid-exercise.
    fn on_exercise_report_ready(&mut self, report: &SessionReport);

    /// Fired once, when the session finishes.
    fn on_session_finished(&mut self, total_seconds: u64);
}

/// Observer that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl SessionObserver for NullObserver {
    fn on_exercise_report_ready(&mut self, _report: &SessionReport) {}

    fn on_session_finished(&mut self, _total_seconds: u64) {}
}

/// Observer that keeps everything it is told, in order
#[derive(Debug, Default, Clone)]
pub struct ReportCollector {
    pub reports: Vec<SessionReport>,
    pub finished_totals: Vec<u64>,
}

impl SessionObserver for ReportCollector {
    fn on_exercise_report_ready(&mut self, report: &SessionReport) {
        self.reports.push(report.clone());
    }

    fn on_session_finished(&mut self, total_seconds: u64) {
        self.finished_totals.push(total_seconds);
    }
}
