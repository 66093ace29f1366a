//! Output formatting and persistence.
//!
//! Supports pretty-printing and JSON logging of the dataset profile, and
//! writing a frame to CSV.

use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

use crate::error::Result;
use crate::pipeline::utility::nan_to_null;
use crate::stats::DatasetProfile;

/// Logs the profile using Rust's debug pretty-print format.
pub fn print_pretty(profile: &DatasetProfile) {
    debug!("{:#?}", profile);
}

/// Logs the profile as pretty-printed JSON.
pub fn print_json(profile: &DatasetProfile) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(profile)?);
    Ok(())
}

/// Writes `frame` to `path` as CSV with a header row, replacing any existing
/// file.
///
/// Float columns keep a fraction (`11385339.0`), integer columns do not.
/// NaN and null are written as empty cells, infinity as `inf`, dates as
/// `YYYY-MM-DD`.
pub fn write_table(path: impl AsRef<Path>, frame: &DataFrame) -> Result<()> {
    let path = path.as_ref();
    let mut out = nan_to_null(frame.clone())?;

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).finish(&mut out)?;

    info!(path = %path.display(), rows = out.height(), "Table written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{NamedTempFile, tempdir};

    fn grouped() -> DataFrame {
        df!(
            "continent" => ["Africa", "Europe", "Oceania"],
            "total_cases" => [11385339.0, 0.0, 0.0],
            "month" => [3i32, 1, 12],
            "ratio" => [0.05, f64::NAN, f64::INFINITY]
        )
        .unwrap()
    }

    fn profile() -> DatasetProfile {
        DatasetProfile::from_table(&crate::parser::parse_table(
            b"continent,location,date,total_cases,total_deaths,gdp_per_capita,human_development_index\n\
              Asia,India,2021-03-15,10,1,1900,0.6\n",
            &crate::schema::Schema::covid(),
        )
        .unwrap())
        .unwrap()
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&profile());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&profile()).unwrap();
    }

    #[test]
    fn test_write_table_header_and_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("covid_data_grouped.csv");

        write_table(&path, &grouped()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "continent,total_cases,month,ratio");
        assert_eq!(lines[1], "Africa,11385339.0,3,0.05");
        assert_eq!(lines[2], "Europe,0.0,1,");
        assert!(lines[3].starts_with("Oceania,0.0,12,"));
        assert!(lines[3].to_lowercase().ends_with("inf"));
    }

    #[test]
    fn test_write_table_overwrites() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "stale\ncontent\nfrom\nan\nold\nrun\nrows\n").unwrap();

        write_table(file.path(), &grouped()).unwrap();

        let content = fs::read_to_string(file.path()).unwrap();
        assert_eq!(content.lines().count(), 4);
        assert!(!content.contains("stale"));
    }
}
