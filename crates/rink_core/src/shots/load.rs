//! Shot log loading (MoneyPuck CSV layout, header row required).
//!
//! Columns are matched by header name; anything the record does not use is
//! ignored, so full season exports (100+ columns) load as-is.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use super::record::ShotRecord;
use crate::error::DataError;

/// Columns a row cannot be deserialized without.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "xCordAdjusted",
    "yCordAdjusted",
    "xGoal",
    "homeSkatersOnIce",
    "awaySkatersOnIce",
    "shotOnEmptyNet",
    "shotDistance",
];

/// Row counts of one CSV read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseStats {
    pub total_rows: usize,
    pub parsed: usize,
    pub failed: usize,
}

/// Parse a shot CSV, skipping rows that do not deserialize (blank numeric
/// cells, ragged rows). A missing required column fails the whole read.
pub fn read_shots_with_stats<R: Read>(reader: R) -> Result<(Vec<ShotRecord>, ParseStats), DataError> {
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).trim(csv::Trim::All).from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !headers.iter().any(|h| h == **c)) {
        return Err(DataError::MissingColumn(missing.to_string()));
    }

    let mut shots = Vec::new();
    let mut stats = ParseStats::default();
    for result in csv_reader.deserialize::<ShotRecord>() {
        stats.total_rows += 1;
        match result {
            Ok(shot) => {
                stats.parsed += 1;
                shots.push(shot);
            }
            Err(e) if matches!(e.kind(), csv::ErrorKind::Deserialize { .. } | csv::ErrorKind::UnequalLengths { .. }) => {
                stats.failed += 1;
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                warn!(line, error = %e, "skipping unparseable shot row");
            }
            Err(e) => return Err(e.into()),
        }
    }
    if stats.failed > 0 {
        warn!(total = stats.total_rows, failed = stats.failed, "shot log had unparseable rows");
    }
    Ok((shots, stats))
}

/// Parse a shot CSV, see [`read_shots_with_stats`].
pub fn read_shots<R: Read>(reader: R) -> Result<Vec<ShotRecord>, DataError> {
    read_shots_with_stats(reader).map(|(shots, _)| shots)
}

pub fn load_shots_csv(path: &Path) -> Result<Vec<ShotRecord>, DataError> {
    let file = File::open(path)?;
    let (shots, stats) = read_shots_with_stats(file)?;
    info!(path = %path.display(), rows = stats.parsed, skipped = stats.failed, "loaded shot log");
    Ok(shots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE_CSV: &str = "\
shotID,xCordAdjusted,yCordAdjusted,xGoal,homeSkatersOnIce,awaySkatersOnIce,shotOnEmptyNet,shooterName,shotDistance,event,teamCode,season
0,80,-3,0.121,5,5,0,Connor McDavid,9.5,GOAL,EDM,2023
1,55,20,0.018,5,4,0,Leon Draisaitl,40.3,SHOT,EDM,2023
2,40,0,0.9,5,5,1.0,Brady Tkachuk,49,GOAL,OTT,2023
";

    #[test]
    fn test_read_moneypuck_columns() {
        let shots = read_shots(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(shots.len(), 3);

        let first = &shots[0];
        assert_eq!(first.x, 80.0);
        assert_eq!(first.y, -3.0);
        assert_eq!(first.expected_goal, 0.121);
        assert_eq!(first.shooter_name, "Connor McDavid");
        assert!(first.is_goal());
        assert!(!first.shot_on_empty_net);

        assert_eq!(shots[1].away_skaters_on_ice, 4);
        assert!(shots[2].shot_on_empty_net);
        assert_eq!(shots[2].team_code, "OTT");
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "xCordAdjusted,yCordAdjusted\n1,2\n";
        assert!(matches!(read_shots(csv.as_bytes()), Err(DataError::MissingColumn(c)) if c == "xGoal"));
    }

    #[test]
    fn test_bad_rows_are_skipped_and_counted() {
        let csv = "\
xCordAdjusted,yCordAdjusted,xGoal,homeSkatersOnIce,awaySkatersOnIce,shotOnEmptyNet,shooterName,shotDistance
80,-3,0.121,5,5,0,Connor McDavid,9.5
55,20,,5,5,0,Leon Draisaitl,40.3
60,1,0.05,5,5,0,Zach Hyman
70,4,0.08,5,5,0,Zach Hyman,19.4
";
        let (shots, stats) = read_shots_with_stats(csv.as_bytes()).unwrap();
        assert_eq!(stats, ParseStats { total_rows: 4, parsed: 2, failed: 2 });
        assert_eq!(shots.len(), 2);
        assert_eq!(shots[1].shooter_name, "Zach Hyman");
        assert_eq!(shots[1].shot_distance, 19.4);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_CSV.as_bytes()).unwrap();
        let shots = load_shots_csv(file.path()).unwrap();
        assert_eq!(shots.len(), 3);
    }

    #[test]
    fn test_missing_file() {
        let err = load_shots_csv(Path::new("/nonexistent/shots_2023.csv")).unwrap_err();
        assert!(matches!(err, DataError::Io(_)));
    }
}
