//! Unit progression policy.
//!
//! Decides how many units an exercise has and what kind they are. Routines
//! often carry both a series and a dropset field, so the kind is resolved
//! through an ordered decision table rather than trusted as declared:
//!
//! | # | Rule             | Applies when                                      | Result                   |
//! |---|------------------|---------------------------------------------------|--------------------------|
//! | 1 | `DropsetOverride`| series absent or zero, dropset count present (>0) | `(Dropset, dropsets)`    |
//! | 2 | `DeclaredRound`  | declared kind is `Round`                          | `(Round, rounds or 1)`   |
//! | 3 | `DefaultSeries`  | always                                            | `(Series, series or 1)`  |
//!
//! The first rule that applies wins.

use crate::{Error, ExerciseConfig, ExerciseSpec, Result, UnitKind};

/// One row of the decision table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    DropsetOverride,
    DeclaredRound,
    DefaultSeries,
}

/// Rules in evaluation order
pub const DECISION_TABLE: [Rule; 3] = [
    Rule::DropsetOverride,
    Rule::DeclaredRound,
    Rule::DefaultSeries,
];

impl Rule {
    pub fn applies(&self, config: &ExerciseConfig) -> bool {
        match self {
            Rule::DropsetOverride => {
                let no_series = config.series.unwrap_or(0) == 0;
                let has_dropsets = config.dropsets.unwrap_or(0) > 0;
                no_series && has_dropsets
            }
            Rule::DeclaredRound => config.kind == Some(UnitKind::Round),
            Rule::DefaultSeries => true,
        }
    }

    pub fn resolve(&self, config: &ExerciseConfig) -> (UnitKind, u32) {
        match self {
            Rule::DropsetOverride => (UnitKind::Dropset, config.dropsets.unwrap_or(1).max(1)),
            Rule::DeclaredRound => (UnitKind::Round, config.rounds.unwrap_or(1).max(1)),
            Rule::DefaultSeries => (UnitKind::Series, config.series.unwrap_or(1).max(1)),
        }
    }
}

/// The rule that decides this configuration
pub fn matching_rule(config: &ExerciseConfig) -> Rule {
    DECISION_TABLE
        .iter()
        .copied()
        .find(|rule| rule.applies(config))
        .unwrap_or(Rule::DefaultSeries)
}

/// Classify an exercise configuration into `(unit kind, total units)`
pub fn classify(config: &ExerciseConfig) -> (UnitKind, u32) {
    let rule = matching_rule(config);
    let (kind, total) = rule.resolve(config);
    tracing::debug!(
        "Classified exercise '{}' via {:?}: {} x{}",
        config.id,
        rule,
        kind,
        total
    );
    (kind, total)
}

impl ExerciseSpec {
    /// Build a validated spec from a routine entry
    ///
    /// Fails with `InvalidExercise` when the entry has no id, or resolves to
    /// a round without sub-exercises.
    pub fn from_config(config: ExerciseConfig) -> Result<Self> {
        let (unit_kind, total_units) = classify(&config);

        // Sub-exercises only make sense for rounds
        let sub_exercises = match unit_kind {
            UnitKind::Round => config.sub_exercises,
            _ => Vec::new(),
        };

        let spec = Self {
            id: config.id,
            name: config.name,
            unit_kind,
            total_units,
            sub_exercises,
            rest_seconds: config.rest_seconds,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Check the unit invariants: a non-blank id, at least one unit, and
    /// sub-exercises for every round.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidExercise(format!(
                "exercise '{}' has no id",
                self.name
            )));
        }
        if self.total_units == 0 {
            return Err(Error::InvalidExercise(format!(
                "exercise '{}' needs at least one {}",
                self.id,
                self.unit_kind.label().to_lowercase()
            )));
        }
        if self.unit_kind == UnitKind::Round && self.sub_exercises.is_empty() {
            return Err(Error::InvalidExercise(format!(
                "round exercise '{}' lists no sub-exercises",
                self.id
            )));
        }
        Ok(())
    }

    /// Convenience constructor for a plain series exercise
    pub fn series(id: impl Into<String>, name: impl Into<String>, total_units: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_kind: UnitKind::Series,
            total_units: total_units.max(1),
            sub_exercises: Vec::new(),
            rest_seconds: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SubExerciseSpec;

    fn config(series: Option<u32>, dropsets: Option<u32>) -> ExerciseConfig {
        ExerciseConfig {
            id: "bench".into(),
            name: "Bench Press".into(),
            series,
            dropsets,
            ..Default::default()
        }
    }

    #[test]
    fn test_dropset_when_series_absent() {
        assert_eq!(classify(&config(None, Some(3))), (UnitKind::Dropset, 3));
    }

    #[test]
    fn test_dropset_when_series_zero() {
        assert_eq!(classify(&config(Some(0), Some(2))), (UnitKind::Dropset, 2));
        assert_eq!(matching_rule(&config(Some(0), Some(2))), Rule::DropsetOverride);
    }

    #[test]
    fn test_series_wins_over_dropsets() {
        assert_eq!(classify(&config(Some(4), Some(2))), (UnitKind::Series, 4));
    }

    #[test]
    fn test_zero_dropsets_fall_through_to_series() {
        assert_eq!(classify(&config(None, Some(0))), (UnitKind::Series, 1));
    }

    #[test]
    fn test_default_series_minimum_one() {
        assert_eq!(classify(&config(None, None)), (UnitKind::Series, 1));
        assert_eq!(classify(&config(Some(0), None)), (UnitKind::Series, 1));
    }

    #[test]
    fn test_declared_round_uses_round_count() {
        let mut cfg = config(Some(5), None);
        cfg.kind = Some(UnitKind::Round);
        cfg.rounds = Some(3);
        assert_eq!(classify(&cfg), (UnitKind::Round, 3));

        cfg.rounds = None;
        assert_eq!(classify(&cfg), (UnitKind::Round, 1));
    }

    #[test]
    fn test_dropset_rule_precedes_declared_round() {
        let mut cfg = config(None, Some(2));
        cfg.kind = Some(UnitKind::Round);
        cfg.rounds = Some(4);
        assert_eq!(classify(&cfg), (UnitKind::Dropset, 2));
    }

    #[test]
    fn test_from_config_rejects_round_without_subs() {
        let mut cfg = config(None, None);
        cfg.kind = Some(UnitKind::Round);
        cfg.rounds = Some(2);

        let err = ExerciseSpec::from_config(cfg).unwrap_err();
        assert!(matches!(err, Error::InvalidExercise(_)));
    }

    #[test]
    fn test_from_config_keeps_subs_only_for_rounds() {
        let mut cfg = config(Some(3), None);
        cfg.sub_exercises = vec![SubExerciseSpec::new("A")];
        let spec = ExerciseSpec::from_config(cfg).unwrap();
        assert_eq!(spec.unit_kind, UnitKind::Series);
        assert!(spec.sub_exercises.is_empty());

        let mut cfg = config(None, None);
        cfg.kind = Some(UnitKind::Round);
        cfg.rounds = Some(2);
        cfg.sub_exercises = vec![SubExerciseSpec::new("A"), SubExerciseSpec::new("B")];
        let spec = ExerciseSpec::from_config(cfg).unwrap();
        assert_eq!(spec.unit_kind, UnitKind::Round);
        assert_eq!(spec.total_units, 2);
        assert_eq!(spec.sub_exercises.len(), 2);
    }

    #[test]
    fn test_validate_rejects_zero_units() {
        let mut spec = ExerciseSpec::series("bench", "Bench", 3);
        spec.total_units = 0;
        assert!(matches!(spec.validate(), Err(Error::InvalidExercise(_))));
    }

    #[test]
    fn test_validate_rejects_round_without_subs() {
        let mut spec = ExerciseSpec::series("circuit", "Circuit", 2);
        spec.unit_kind = UnitKind::Round;
        assert!(matches!(spec.validate(), Err(Error::InvalidExercise(_))));

        spec.sub_exercises = vec![SubExerciseSpec::new("A")];
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_from_config_rejects_blank_id() {
        let mut cfg = config(Some(3), None);
        cfg.id = "  ".into();
        assert!(ExerciseSpec::from_config(cfg).is_err());
    }
}
