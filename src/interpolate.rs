use serde::{Deserialize, Serialize};
use std::fs::File;
use thiserror::Error;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub input: f64,
    pub output: f64,
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("range table needs at least one sample")]
    Empty,
    #[error("range table has two samples at input {0}")]
    DuplicateInput(f64),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Piecewise linear distance-to-speed map. Samples are sorted on
/// construction; duplicate inputs are rejected.
#[derive(Clone, Debug)]
pub struct InterpolationTable {
    samples: Vec<Sample>,
}

impl InterpolationTable {
    pub fn new(entries: impl IntoIterator<Item = (f64, f64)>) -> Result<Self, TableError> {
        let mut samples: Vec<Sample> = entries
            .into_iter()
            .map(|(input, output)| Sample { input, output })
            .collect();

        if samples.is_empty() {
            return Err(TableError::Empty);
        }

        samples.sort_by(|a, b| a.input.total_cmp(&b.input));

        for pair in samples.windows(2) {
            if pair[0].input == pair[1].input {
                return Err(TableError::DuplicateInput(pair[0].input));
            }
        }

        Ok(Self { samples })
    }

    /// Reads a JSON array of samples, e.g. `[{"input": 1.5, "output": 13500.0}]`
    pub fn load(path: &str) -> Result<Self, TableError> {
        let file = File::open(path)?;
        let samples: Vec<Sample> = serde_json::from_reader(file)?;
        Self::new(samples.into_iter().map(|s| (s.input, s.output)))
    }

    /// Interpolates between the two samples bracketing `x`. Outside the
    /// sampled range the nearest boundary segment's line is extended, not
    /// clamped, so speeds keep scaling past the last measured distance.
    pub fn lookup(&self, x: f64) -> f64 {
        if self.samples.len() == 1 {
            return self.samples[0].output;
        }

        let upper = self
            .samples
            .partition_point(|s| s.input <= x)
            .clamp(1, self.samples.len() - 1);
        let a = self.samples[upper - 1];
        let b = self.samples[upper];

        a.output + (b.output - a.output) * (x - a.input) / (b.input - a.input)
    }
}
