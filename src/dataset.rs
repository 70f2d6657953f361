use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Algorithms appearing in the result files.
///
/// The set is closed: a result line naming anything else is a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub enum Algorithm {
    Poranen,
    My,
    Schmid,
    Calinescu,
    FacialWalks,
}

impl Algorithm {
    /// Approximation algorithms in fixed chart display order.
    pub fn compared() -> &'static [Algorithm] {
        &[
            Algorithm::Poranen,
            Algorithm::My,
            Algorithm::Schmid,
            Algorithm::Calinescu,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Poranen => "Poranen",
            Algorithm::My => "My",
            Algorithm::Schmid => "Schmid",
            Algorithm::Calinescu => "Calinescu",
            Algorithm::FacialWalks => "FacialWalks",
        }
    }
}

/// Benchmark graph generator families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Complete,
    ThreeRegular,
    Pareto,
}

impl Family {
    pub fn all() -> &'static [Family] {
        &[Family::Complete, Family::ThreeRegular, Family::Pareto]
    }

    /// Label used in chart titles and output file names.
    pub fn label(&self) -> &'static str {
        match self {
            Family::Complete => "complete",
            Family::ThreeRegular => "3regular",
            Family::Pareto => "Pareto",
        }
    }

    /// Result file name for this family.
    pub fn input_file(&self) -> String {
        format!("{}_output.txt", self.label().to_lowercase())
    }
}

/// Metric columns that can be aggregated and charted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Edges,
    Time,
}

impl Metric {
    pub fn all() -> &'static [Metric] {
        &[Metric::Edges, Metric::Time]
    }

    pub fn column(&self) -> &'static str {
        match self {
            Metric::Edges => "edges",
            Metric::Time => "time",
        }
    }

    pub fn value(&self, row: &Measurement) -> f64 {
        match self {
            Metric::Edges => row.edges as f64,
            Metric::Time => row.time,
        }
    }
}

/// One benchmark run: a single line of a result file.
///
/// Result files are headerless CSV with these six columns in order.
#[derive(Debug, Clone, Deserialize)]
pub struct Measurement {
    /// Test instance name.
    pub test_name: String,
    /// Number of vertices.
    pub n: u64,
    /// Generator parameter (edge probability, shape parameter, ...).
    pub k: f64,
    /// Running time in milliseconds.
    pub time: f64,
    /// Edge count of the computed subgraph.
    pub edges: u64,
    /// Algorithm that produced the run.
    pub alg_name: Algorithm,
}

/// Result file read by the ratio pipeline.
pub const RATIO_INPUT_FILE: &str = "new_exact_regular_output2.txt";

/// Parse a result file into measurement rows.
///
/// Any schema violation (wrong column count, non-numeric field, unknown
/// algorithm name) is an error; there is no row-level recovery.
pub fn load_measurements(path: &Path) -> Result<Vec<Measurement>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to open result file: {}", path.display()))?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: Measurement =
            record.with_context(|| format!("Malformed result row in {}", path.display()))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Load the pipeline-1 result file for an input family.
pub fn load_family(input_dir: &Path, family: Family) -> Result<Vec<Measurement>> {
    load_measurements(&input_dir.join(family.input_file()))
}

/// Load the pipeline-2 result file.
pub fn load_ratio_input(input_dir: &Path) -> Result<Vec<Measurement>> {
    load_measurements(&input_dir.join(RATIO_INPUT_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn parses_six_column_rows() {
        let file = write_file(
            "complete_10_0,10,0.5,12.25,24,Poranen\n\
             complete_10_0,10,0.5,900.0,24,FacialWalks\n",
        );

        let rows = load_measurements(file.path()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].test_name, "complete_10_0");
        assert_eq!(rows[0].n, 10);
        assert_eq!(rows[0].k, 0.5);
        assert_eq!(rows[0].time, 12.25);
        assert_eq!(rows[0].edges, 24);
        assert_eq!(rows[0].alg_name, Algorithm::Poranen);
        assert_eq!(rows[1].alg_name, Algorithm::FacialWalks);
    }

    #[test]
    fn rejects_wrong_column_count() {
        let file = write_file("complete_10_0,10,0.5,12.25,Poranen\n");
        assert!(load_measurements(file.path()).is_err());
    }

    #[test]
    fn rejects_non_numeric_fields() {
        let file = write_file("complete_10_0,ten,0.5,12.25,24,Poranen\n");
        assert!(load_measurements(file.path()).is_err());
    }

    #[test]
    fn rejects_unknown_algorithm() {
        let file = write_file("complete_10_0,10,0.5,12.25,24,Dijkstra\n");
        assert!(load_measurements(file.path()).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_family(dir.path(), Family::Pareto).unwrap_err();
        assert!(err.to_string().contains("pareto_output.txt"));
    }

    #[test]
    fn family_file_names_are_lowercased() {
        assert_eq!(Family::Complete.input_file(), "complete_output.txt");
        assert_eq!(Family::ThreeRegular.input_file(), "3regular_output.txt");
        assert_eq!(Family::Pareto.input_file(), "pareto_output.txt");
    }
}
