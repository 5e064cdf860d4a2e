//! Routine file loader.
//!
//! A routine lists today's exercises in order. Each entry is run through the
//! unit progression policy before the session sees it.
//!
//! ```toml
//! name = "Push day"
//!
//! [[exercise]]
//! id = "bench"
//! name = "Bench Press"
//! series = 3
//! rest_seconds = 90
//!
//! [[exercise]]
//! id = "finisher"
//! name = "Finisher"
//! kind = "round"
//! rounds = 2
//! sub_exercise = [{ name = "Push-up", reps = 15 }, { name = "Dip" }]
//! ```

use crate::{Error, ExerciseConfig, ExerciseSpec, Result};
use serde::Deserialize;
use std::path::Path;

/// Routine file format
#[derive(Debug, Deserialize)]
struct RoutineFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "exercise")]
    exercises: Vec<ExerciseConfig>,
}

/// Today's validated exercise queue
#[derive(Clone, Debug)]
pub struct Routine {
    pub name: String,
    pub exercises: Vec<ExerciseSpec>,
}

/// Load and classify a routine from a TOML file
pub fn load_routine(path: &Path) -> Result<Routine> {
    if !path.exists() {
        return Err(Error::Routine(format!(
            "routine file not found: {}",
            path.display()
        )));
    }

    let contents = std::fs::read_to_string(path)?;
    let routine = parse_routine(&contents)?;
    tracing::info!(
        "Loaded routine '{}' with {} exercise(s) from {:?}",
        routine.name,
        routine.exercises.len(),
        path
    );
    Ok(routine)
}

/// Parse routine TOML already in memory
pub fn parse_routine(contents: &str) -> Result<Routine> {
    let file: RoutineFile = toml::from_str(contents)?;
    if file.exercises.is_empty() {
        return Err(Error::EmptyRoutine);
    }

    let exercises = file
        .exercises
        .into_iter()
        .map(ExerciseSpec::from_config)
        .collect::<Result<Vec<_>>>()?;

    Ok(Routine {
        name: file.name.unwrap_or_else(|| "Today".to_string()),
        exercises,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UnitKind;

    const ROUTINE: &str = r#"
name = "Push day"

[[exercise]]
id = "bench"
name = "Bench Press"
series = 3
rest_seconds = 90

[[exercise]]
id = "fly"
name = "Cable Fly"
series = 0
dropsets = 2

[[exercise]]
id = "finisher"
name = "Finisher"
kind = "round"
rounds = 2
sub_exercise = [{ name = "Push-up", reps = 15 }, { name = "Dip" }]
"#;

    #[test]
    fn test_parse_classifies_each_entry() {
        let routine = parse_routine(ROUTINE).unwrap();
        assert_eq!(routine.name, "Push day");

        let kinds: Vec<(UnitKind, u32)> = routine
            .exercises
            .iter()
            .map(|e| (e.unit_kind, e.total_units))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (UnitKind::Series, 3),
                (UnitKind::Dropset, 2),
                (UnitKind::Round, 2),
            ]
        );
        assert_eq!(routine.exercises[0].rest_seconds, Some(90));
        assert_eq!(routine.exercises[2].sub_exercises[0].reps, Some(15));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("push.toml");
        std::fs::write(&path, ROUTINE).unwrap();

        let routine = load_routine(&path).unwrap();
        assert_eq!(routine.exercises.len(), 3);
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = load_routine(&temp_dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, Error::Routine(_)));
    }

    #[test]
    fn test_empty_routine() {
        assert!(matches!(
            parse_routine("name = \"Rest day\""),
            Err(Error::EmptyRoutine)
        ));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(parse_routine("[[exercise]"), Err(Error::Toml(_))));
    }

    #[test]
    fn test_round_without_subs_rejected() {
        let toml_str = r#"
[[exercise]]
id = "circuit"
name = "Circuit"
kind = "round"
rounds = 3
"#;
        assert!(matches!(
            parse_routine(toml_str),
            Err(Error::InvalidExercise(_))
        ));
    }
}
