//! Ordered queue of the day's exercises.

use crate::{Error, ExerciseSpec, Result};

#[derive(Debug, Clone)]
pub struct ExerciseSequencer {
    queue: Vec<ExerciseSpec>,
    current_index: usize,
}

impl ExerciseSequencer {
    /// Build a sequencer positioned on the first exercise
    ///
    /// Every exercise must satisfy `ExerciseSpec::validate`.
    pub fn new(queue: Vec<ExerciseSpec>) -> Result<Self> {
        if queue.is_empty() {
            return Err(Error::EmptyRoutine);
        }
        for exercise in &queue {
            exercise.validate()?;
        }
        Ok(Self {
            queue,
            current_index: 0,
        })
    }

    pub fn current(&self) -> &ExerciseSpec {
        &self.queue[self.current_index]
    }

    pub fn has_next(&self) -> bool {
        self.current_index + 1 < self.queue.len()
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    /// Move to the next exercise and return it
    pub fn advance(&mut self) -> Result<&ExerciseSpec> {
        if !self.has_next() {
            return Err(Error::NoMoreExercises);
        }
        self.current_index += 1;
        tracing::debug!(
            "Advanced to exercise {}/{}: {}",
            self.current_index + 1,
            self.queue.len(),
            self.queue[self.current_index].id
        );
        Ok(&self.queue[self.current_index])
    }

    /// 0-based index of the current exercise
    pub fn position(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn exercises(&self) -> &[ExerciseSpec] {
        &self.queue
    }

    pub fn rewind(&mut self) {
        self.current_index = 0;
    }
}
