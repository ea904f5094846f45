//! Puzzle catalog loading and solution reports.
//!
//! The catalog is a JSON file of the form
//!
//! ```json
//! { "puzzles": [ { "shapes": ["xxxxxx/xx..xx/x..xxx/x...xx", ...],
//!                  "assemblies": { "A1a B2c ...": ["UP 1 [A1a]", ...] } } ] }
//! ```
//!
//! `assemblies` maps every accepted assembly string to the move strings
//! expected when taking it apart.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::puzzle::Puzzle;
use crate::solver::Solution;

/// Default catalog location, relative to the working directory.
pub const DEFAULT_CATALOG: &str = "puzzles.json";

/// A collection of burr puzzles with their known solutions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub puzzles: Vec<CatalogEntry>,
}

/// One puzzle: its shape patterns and the expected disassemblies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub shapes: Vec<String>,
    #[serde(default)]
    pub assemblies: BTreeMap<String, Vec<String>>,
}

impl Catalog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn entry(&self, index: usize) -> Result<&CatalogEntry> {
        self.puzzles.get(index).ok_or(Error::UnknownPuzzle {
            index,
            count: self.puzzles.len(),
        })
    }
}

impl CatalogEntry {
    /// Builds the (empty) puzzle for this entry's shapes.
    pub fn puzzle(&self) -> Result<Puzzle> {
        Puzzle::from_text(self.shapes.as_slice())
    }

    /// Checks `solution` against the expected assemblies.
    ///
    /// The assembly must be a listed key, and the solution's moves must agree
    /// with the listed moves as far as both go.
    pub fn check(&self, solution: &Solution) -> Result<()> {
        let assembly = solution.assembly.to_string();
        let expected = self
            .assemblies
            .get(&assembly)
            .ok_or_else(|| Error::Mismatch(format!("unexpected assembly {assembly}")))?;

        for (i, (actual, expected)) in solution.move_list().zip(expected).enumerate() {
            let actual = actual.to_string();
            if &actual != expected {
                return Err(Error::Mismatch(format!(
                    "move {i} of {assembly}: expected {expected}, got {actual}"
                )));
            }
        }
        Ok(())
    }
}

/// Formats a solution as a human-readable report.
pub fn format_solution(solution: &Solution) -> String {
    let mut output = String::new();
    let assemblies = if solution.num_checked == 1 {
        "assembly"
    } else {
        "assemblies"
    };
    let _ = writeln!(
        output,
        "Valid assembly {} found after checking {} {} over {} iterations",
        solution.assembly, solution.num_checked, assemblies, solution.num_iterations
    );
    let _ = writeln!(output, "Disassembly takes {} steps:", solution.num_moves());
    for (i, mv) in solution.move_list().enumerate() {
        let _ = writeln!(output, "{i}: {mv}");
    }
    output
}

/// Writes the solution report to `path`.
pub fn save_report(path: impl AsRef<Path>, solution: &Solution) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(format_solution(solution).as_bytes())?;
    Ok(())
}
