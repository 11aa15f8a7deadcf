//! Field and report export.
//!
//! - JSON: the serde form of `SpatialField` (grid spec + row-major values)
//! - CSV: one row per node (`x,y,value`), row-major

use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use rink_core::{FieldSummary, HighDangerStats, LeagueSummary, ShooterStats, SpatialField};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown format '{}' (expected json or csv)", other)),
        }
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    Ok(())
}

pub fn write_field_json(field: &SpatialField, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string(field).context("Failed to serialize field to JSON")?;
    fs::write(path, json).with_context(|| format!("Failed to write field JSON: {}", path.display()))
}

#[derive(Serialize)]
struct NodeRow {
    x: f64,
    y: f64,
    value: f64,
}

pub fn write_field_csv(field: &SpatialField, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create field CSV: {}", path.display()))?;

    let spec = field.spec();
    let xs = spec.x_coords();
    for row in 0..spec.rows() {
        let y = spec.node_y(row);
        for (&x, &value) in xs.iter().zip(field.row(row)) {
            writer.serialize(NodeRow { x, y, value })?;
        }
    }
    writer.flush().with_context(|| format!("Failed to flush field CSV: {}", path.display()))?;
    Ok(())
}

pub fn write_field(field: &SpatialField, path: &Path, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => write_field_json(field, path)?,
        OutputFormat::Csv => write_field_csv(field, path)?,
    }
    let (rows, cols) = field.shape();
    info!(path = %path.display(), ?format, rows, cols, "wrote field");
    Ok(())
}

/// Everything the `compare` command learns about one shooter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerReport {
    pub player: String,
    pub generated_at: String,
    pub stats: ShooterStats,
    pub high_danger: HighDangerStats,
    pub league: Option<LeagueSummary>,
    /// Summary of the player - league difference field.
    pub difference: FieldSummary,
}

impl PlayerReport {
    pub fn new(
        player: &str,
        stats: ShooterStats,
        high_danger: HighDangerStats,
        league: Option<LeagueSummary>,
        difference: FieldSummary,
    ) -> Self {
        Self {
            player: player.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            stats,
            high_danger,
            league,
            difference,
        }
    }
}

pub fn write_report(report: &PlayerReport, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json).with_context(|| format!("Failed to write report: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rink_core::{Domain, GridSpec, Resolution};
    use tempfile::TempDir;

    fn small_field() -> SpatialField {
        let spec = GridSpec::new(
            Domain::new(0.0, 2.0, -1.0, 1.0).unwrap(),
            Resolution::new(3, 2).unwrap(),
        )
        .unwrap();
        SpatialField::from_fn(spec, |x, y| x + 10.0 * y)
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("CSV".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert!("pack".parse::<OutputFormat>().is_err());
        assert!("png".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_json_export_reads_back() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("out").join("field.json");
        let field = small_field();
        write_field(&field, &path, OutputFormat::Json)?;

        let loaded: SpatialField = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(loaded, field);
        Ok(())
    }

    #[test]
    fn test_truncated_json_field_is_rejected() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("field.json");
        write_field_json(&small_field(), &path)?;

        let text = fs::read_to_string(&path)?.replace(",12.0]", "]");
        assert!(serde_json::from_str::<SpatialField>(&text).is_err());
        Ok(())
    }

    #[test]
    fn test_csv_export_is_row_major() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("field.csv");
        write_field_csv(&small_field(), &path)?;

        let text = fs::read_to_string(&path)?;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "x,y,value");
        assert_eq!(lines.len(), 1 + 6);
        assert_eq!(lines[1], "0.0,-1.0,-10.0");
        assert_eq!(lines[3], "2.0,-1.0,-8.0");
        assert_eq!(lines[4], "0.0,1.0,10.0");
        Ok(())
    }

    #[test]
    fn test_report_round_trip() -> Result<()> {
        let field = small_field();
        let report = PlayerReport::new(
            "Connor McDavid",
            ShooterStats { total_shots: 4, goals: 1, shooting_pct: 25.0, expected_goals: 0.45 },
            HighDangerStats { distance_threshold: 20.0, high_danger_shots: 2, high_danger_pct: 50.0 },
            None,
            FieldSummary::from_field(&field),
        );
        let dir = TempDir::new()?;
        let path = dir.path().join("report.json");
        write_report(&report, &path)?;

        let loaded: PlayerReport = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(loaded.player, "Connor McDavid");
        assert_eq!(loaded.stats, report.stats);
        assert_eq!(loaded.difference.max.value, 12.0);
        Ok(())
    }
}
