//! Line-oriented progress log.
//!
//! Each solver records one CSV row per iteration (or generation) and
//! returns the log in its result. Persisting it is left to the caller.

use std::fmt;

/// Tabu search columns. `nextCost` is `-1` when no move was accepted.
pub const TABU_HEADER: &str = "it,currCost,nextCost,tabu,bestCost,timestamp";
/// Simulated annealing columns. `d` is `-1` when the move does not worsen.
pub const SA_HEADER: &str = "it,temp,d,currCost,nextCost,bestCost,timestamp";
/// Genetic algorithm columns.
pub const GA_HEADER: &str = "gen,bestCost,avgCost,infeasible,population,time";
/// GRASP columns, one row per restart.
pub const GRASP_HEADER: &str = "restart,constructedCost,refinedCost,bestCost,timestamp";

/// CSV header plus rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressLog {
    header: &'static str,
    rows: Vec<String>,
}

impl ProgressLog {
    pub fn new(header: &'static str) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    /// Appends a row. Callers format floats with six decimals.
    pub fn push(&mut self, row: fmt::Arguments<'_>) {
        self.rows.push(row.to_string());
    }

    pub fn header(&self) -> &str {
        self.header
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for ProgressLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}
