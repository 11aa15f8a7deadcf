//! rinkfield CLI
//!
//! Shot CSV → league / player-vs-league xGoal fields (JSON or CSV)
//! and a JSON player report.

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
use rink_cli::{OutputFormat, PlayerReport};
#[cfg(feature = "cli")]
use rink_core::{
    AnalysisConfig, FieldSummary, HighDangerStats, LeagueSummary, ShooterStats, ShotSet, SpatialFieldPipeline,
    HIGH_DANGER_DISTANCE_FT,
};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "rinkfield")]
#[command(about = "Spatial xGoal fields from NHL shot logs", long_about = None)]
struct Cli {
    /// Analysis config YAML (defaults: 5v5, 100x85 grid, sigma 3)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Summarize the filtered league shot set
    Summary {
        /// Shot log CSV (MoneyPuck layout)
        #[arg(long)]
        csv: PathBuf,
    },

    /// Build the smoothed league xGoal field
    League {
        /// Shot log CSV (MoneyPuck layout)
        #[arg(long)]
        csv: PathBuf,

        /// Output field path
        #[arg(long)]
        out: PathBuf,

        /// Output format: json or csv
        #[arg(long, default_value = "json")]
        format: OutputFormat,
    },

    /// Compare one shooter's field against the league
    Compare {
        /// Shot log CSV (MoneyPuck layout)
        #[arg(long)]
        csv: PathBuf,

        /// Shooter name, exact match (e.g. "Connor McDavid")
        #[arg(long)]
        player: String,

        /// Output difference field path
        #[arg(long)]
        out: PathBuf,

        /// Output format: json or csv
        #[arg(long, default_value = "json")]
        format: OutputFormat,

        /// Drop node columns beyond this x (89 = goal line)
        #[arg(long)]
        crop_x: Option<f64>,

        /// Output player report JSON file
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AnalysisConfig::from_path(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => AnalysisConfig::moneypuck_offensive_zone(),
    };

    match cli.command {
        Commands::Summary { csv } => {
            let league = load_league(&csv, &config)?;
            match LeagueSummary::from_shots(&league) {
                Some(summary) => print_league_summary(&summary),
                None => println!("\n⚠️  No shots left after filtering"),
            }
        }

        Commands::League { csv, out, format } => {
            let league = load_league(&csv, &config)?;
            let pipeline = SpatialFieldPipeline::new(config.pipeline)?;

            println!("🔨 Building league field...");
            let field = pipeline.shot_field(&league).context("Failed to build league field")?;
            print_field_summary("League field", &FieldSummary::from_field(&field));

            rink_cli::write_field(&field, &out, format)?;
            println!("\n💾 Field written to: {}", out.display());
        }

        Commands::Compare { csv, player, out, format, crop_x, report } => {
            let league = load_league(&csv, &config)?;
            let shots = league.for_shooter(&player);
            println!("   Player: {} ({} shots)", player, shots.len());

            let pipeline = SpatialFieldPipeline::new(config.pipeline)?;
            println!("🔨 Computing player vs league field...");
            let mut diff = pipeline
                .player_vs_league(&shots, &league)
                .with_context(|| format!("Failed to compare {} against the league", player))?;
            if let Some(x_max) = crop_x {
                diff = diff.crop_x(x_max)?;
            }

            let stats = ShooterStats::from_shots(&shots);
            let high_danger = HighDangerStats::from_shots(&shots, HIGH_DANGER_DISTANCE_FT);
            let summary = FieldSummary::from_field(&diff);
            print_player_stats(&stats, &high_danger);
            print_field_summary("Player - league", &summary);

            rink_cli::write_field(&diff, &out, format)?;
            println!("\n💾 Field written to: {}", out.display());

            if let Some(report_path) = report {
                let report =
                    PlayerReport::new(&player, stats, high_danger, LeagueSummary::from_shots(&league), summary);
                rink_cli::write_report(&report, &report_path)?;
                println!("\n📄 Report saved to: {}", report_path.display());
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn load_league(csv: &Path, config: &AnalysisConfig) -> Result<ShotSet> {
    println!("📥 Loading shots from {}", csv.display());
    let records = rink_core::load_shots_csv(csv)
        .with_context(|| format!("Failed to load shot log: {}", csv.display()))?;
    let total = records.len();
    let league = ShotSet::from_records(records, config.filter.clone());
    println!("   Rows: {} ({} after game-state filter)", total, league.len());
    Ok(league)
}

#[cfg(feature = "cli")]
fn print_league_summary(summary: &LeagueSummary) {
    println!("\n📊 League summary");
    println!("   Shots:     {}", summary.shots);
    println!("   xGoal max: {:.4}", summary.xg_max);
    println!("   xGoal avg: {:.4}", summary.xg_mean);
    println!("   x range:   {:.1} .. {:.1}", summary.x_range.0, summary.x_range.1);
    println!("   y range:   {:.1} .. {:.1}", summary.y_range.0, summary.y_range.1);
}

#[cfg(feature = "cli")]
fn print_player_stats(stats: &ShooterStats, high_danger: &HighDangerStats) {
    println!("\n🏒 Shooter stats");
    println!("   Shots:        {}", stats.total_shots);
    println!("   Goals:        {}", stats.goals);
    println!("   Shooting:     {:.1}%", stats.shooting_pct);
    println!("   xGoals:       {:.2}", stats.expected_goals);
    println!(
        "   High danger:  {} ({:.1}%, within {} ft)",
        high_danger.high_danger_shots, high_danger.high_danger_pct, high_danger.distance_threshold
    );
}

#[cfg(feature = "cli")]
fn print_field_summary(label: &str, summary: &FieldSummary) {
    println!("\n✅ {} ({} x {})", label, summary.rows, summary.cols);
    println!(
        "   Max:  {:+.4} at ({:.1}, {:.1})",
        summary.max.value, summary.max.x, summary.max.y
    );
    println!(
        "   Min:  {:+.4} at ({:.1}, {:.1})",
        summary.min.value, summary.min.x, summary.min.y
    );
    println!("   Mean: {:+.4}", summary.mean);
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("rinkfield CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
