mod input;

use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use input::{parse_command, Command, HELP};
use repclock_core::*;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "repclock")]
#[command(about = "Workout session timer and progression tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Time a session, reading one command per line from stdin
    Run {
        /// Routine file (defaults to the configured routine)
        #[arg(long)]
        routine: Option<PathBuf>,

        /// Advance the clock from real elapsed time between commands
        #[arg(long)]
        wall_clock: bool,

        /// Do not write reports to the journal
        #[arg(long)]
        no_journal: bool,
    },

    /// Show how a routine's exercises will be counted
    Show {
        /// Routine file (defaults to the configured routine)
        #[arg(long)]
        routine: Option<PathBuf>,
    },

    /// Summarise the report journal
    History,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        repclock_core::logging::init_with_level("debug");
    } else {
        repclock_core::logging::init();
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let journal_path = data_dir.join("journal.jsonl");

    match cli.command {
        Commands::Run {
            routine,
            wall_clock,
            no_journal,
        } => {
            let routine = load_configured_routine(routine, &config)?;
            let journal = if no_journal {
                None
            } else {
                Some(JsonlJournal::new(&journal_path))
            };
            cmd_run(routine, &config.session, journal, wall_clock)
        }
        Commands::Show { routine } => {
            let routine = load_configured_routine(routine, &config)?;
            cmd_show(&routine);
            Ok(())
        }
        Commands::History => cmd_history(&journal_path),
    }
}

fn load_configured_routine(path: Option<PathBuf>, config: &Config) -> Result<Routine> {
    let path = path.or_else(|| config.routine.path.clone()).ok_or_else(|| {
        Error::Routine("no routine given; pass --routine or set [routine] path".into())
    })?;
    load_routine(&path)
}

/// Buffers observer notifications as journal entries until the host flushes them
struct PendingEntries {
    session_id: Uuid,
    entries: Vec<JournalEntry>,
}

impl SessionObserver for PendingEntries {
    fn on_exercise_report_ready(&mut self, report: &SessionReport) {
        self.entries
            .push(JournalEntry::exercise_report(self.session_id, report.clone()));
    }

    fn on_session_finished(&mut self, total_seconds: u64) {
        self.entries
            .push(JournalEntry::session_finished(self.session_id, total_seconds));
    }
}

fn cmd_run(
    routine: Routine,
    session_config: &SessionConfig,
    mut journal: Option<JsonlJournal>,
    wall_clock: bool,
) -> Result<()> {
    let observer = PendingEntries {
        session_id: Uuid::new_v4(),
        entries: Vec::new(),
    };
    let mut machine =
        SessionStateMachine::with_observer(routine.exercises, session_config, observer)?;

    println!("Routine: {} ({} exercises)", routine.name, machine.sequencer().len());
    render_exercise(machine.current_exercise());
    println!("Type 'help' for commands.");

    let stdin = io::stdin();
    let mut mark = Instant::now();

    for line in stdin.lock().lines() {
        let line = line?;

        if wall_clock {
            let secs = mark.elapsed().as_secs();
            for _ in 0..secs {
                machine.tick();
            }
            mark += Duration::from_secs(secs);
        }

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(msg) => {
                println!("? {}", msg);
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => println!("{}", HELP),
            Command::Status => render_snapshot(&machine.snapshot()),
            Command::Tick(n) => {
                for _ in 0..n {
                    machine.tick();
                }
            }
            Command::Intent(intent) => match machine.dispatch(intent.clone()) {
                Ok(transition) => render_transition(&intent, &transition, &machine),
                Err(e) if e.is_recoverable() => println!("✗ {}", e),
                Err(e) => {
                    tracing::error!("Session aborted: {}", e);
                    flush_pending(machine.observer_mut(), journal.as_mut());
                    return Err(e);
                }
            },
        }

        flush_pending(machine.observer_mut(), journal.as_mut());
    }

    if !matches!(machine.phase(), SessionPhase::Idle | SessionPhase::Completed) {
        println!("Session left unfinished; the unit in progress was not saved.");
    }
    let unsaved = machine.observer().entries.len();
    if journal.is_some() && unsaved > 0 {
        println!("! {} journal entries could not be saved.", unsaved);
    }
    io::stdout().flush()?;
    Ok(())
}

/// Append buffered entries to the journal in order
///
/// An entry that fails to append stays buffered, along with everything after
/// it, and is retried on the next flush.
fn flush_pending(pending: &mut PendingEntries, journal: Option<&mut JsonlJournal>) {
    let journal = match journal {
        Some(journal) => journal,
        None => {
            pending.entries.clear();
            return;
        }
    };

    let mut written = 0;
    for entry in &pending.entries {
        if let Err(e) = journal.append(entry) {
            tracing::error!("Failed to journal entry to {:?}: {}", journal.path(), e);
            println!("! Journal write failed: {}", e);
            break;
        }
        written += 1;
    }
    pending.entries.drain(..written);

    if written > 0 {
        tracing::debug!("Journaled {} entries to {:?}", written, journal.path());
    }
}

fn render_transition<O: SessionObserver>(
    intent: &Intent,
    transition: &Transition,
    machine: &SessionStateMachine<O>,
) {
    let snapshot = machine.snapshot();

    if let Intent::SetWeight(_) = intent {
        match machine.pending_weight() {
            Some(weight) => println!("  Weight set: {}", weight),
            None => println!("  Weight cleared"),
        }
        return;
    }

    if let Some(report) = &transition.report {
        if let Some(last) = report.units.last() {
            render_unit(report.unit_kind, last);
        }
        println!(
            "✓ {} finished: {} unit(s), {}s",
            report.exercise_id,
            report.units.len(),
            report.total_elapsed_seconds
        );
    }

    match transition.phase {
        SessionPhase::Running if snapshot.day_complete => {
            if transition.report.is_some() {
                println!("★ Day complete. Type 'finish' to save the session.");
            }
        }
        SessionPhase::Running => match intent {
            Intent::AdvanceExercise | Intent::Start => {
                render_exercise(machine.current_exercise());
                println!("▶ {}", snapshot.unit_label);
            }
            Intent::Resume => println!("▶ Resumed at {}s", snapshot.elapsed_seconds),
            _ => println!("▶ {}", snapshot.unit_label),
        },
        SessionPhase::Paused => println!("⏸ Paused at {}s", snapshot.elapsed_seconds),
        SessionPhase::Resting => {
            if let Some(last) = machine.recorder().units().last() {
                render_unit(snapshot.unit_kind, last);
            }
            match snapshot.rest_remaining_seconds {
                Some(rest) => println!("  Resting ({}s suggested)", rest),
                None => println!("  Resting"),
            }
        }
        SessionPhase::AwaitingNextExercise => {
            if let Some(next) = machine.sequencer().exercises().get(snapshot.exercise_position) {
                println!("  Next up: {}. Type 'next' when ready.", next.name);
            }
        }
        SessionPhase::Completed => {
            if let Some(total) = transition.session_total {
                println!("✓ Session finished: {}s total", total);
            }
        }
        SessionPhase::Idle => println!("■ Closed; unsaved unit discarded"),
    }
}

fn render_unit(kind: UnitKind, unit: &UnitRecord) {
    match &unit.weight {
        Some(weight) => println!(
            "  {} {} done in {}s @ {}",
            kind, unit.unit_index, unit.elapsed_seconds, weight
        ),
        None => println!("  {} {} done in {}s", kind, unit.unit_index, unit.elapsed_seconds),
    }
}

fn render_exercise(exercise: &ExerciseSpec) {
    println!(
        "  {}: {} x {}",
        exercise.name,
        exercise.total_units,
        exercise.unit_kind.label().to_lowercase()
    );
    for sub in &exercise.sub_exercises {
        match sub.reps {
            Some(reps) => println!("    - {} x{}", sub.name, reps),
            None => println!("    - {}", sub.name),
        }
    }
}

fn render_snapshot(snapshot: &SessionSnapshot) {
    println!(
        "[{:?}] {} ({}/{}) {} {}s",
        snapshot.phase,
        snapshot.exercise_name,
        snapshot.exercise_position,
        snapshot.exercise_count,
        snapshot.unit_label,
        snapshot.elapsed_seconds
    );
    if let Some(weight) = &snapshot.pending_weight {
        println!("  Pending weight: {}", weight);
    }
}

fn cmd_show(routine: &Routine) {
    println!("Routine: {}", routine.name);
    for (i, exercise) in routine.exercises.iter().enumerate() {
        print!("{}. [{}]", i + 1, exercise.id);
        render_exercise(exercise);
        if let Some(rest) = exercise.rest_seconds {
            println!("    rest {}s", rest);
        }
    }
}

fn local_time(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn cmd_history(journal_path: &Path) -> Result<()> {
    let entries = read_journal(journal_path)?;
    if entries.is_empty() {
        println!("No sessions recorded yet.");
        return Ok(());
    }

    for entry in &entries {
        match entry {
            JournalEntry::ExerciseReport {
                recorded_at,
                report,
                ..
            } => println!(
                "{}  {:<16} {:<8} {} unit(s) {}s",
                local_time(recorded_at),
                report.exercise_id,
                report.unit_kind.label(),
                report.units.len(),
                report.total_elapsed_seconds
            ),
            JournalEntry::SessionFinished {
                recorded_at,
                total_seconds,
                ..
            } => println!(
                "{}  session finished: {}s",
                local_time(recorded_at),
                total_seconds
            ),
        }
    }
    Ok(())
}
