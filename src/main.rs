use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nation_points::calculate::{distinct_buckets, nation_series, BucketFilter, SeriesMeasure};
use nation_points::config::AppConfig;
use nation_points::fetch::{ClientConfig, PointsClient, RecordSource};
use nation_points::models::{GroupSpec, NationId, ScopeId, TimeBucketKey, ViewMode};
use nation_points::pipeline::{
    load_records, load_standings, nation_leaderboard, Standings, StandingsQuery,
};

#[derive(Parser)]
#[command(name = "nation-points")]
#[command(about = "Nation points aggregation and rankings")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./nation-points.toml")]
    config: PathBuf,

    /// Backend root URL (overrides config)
    #[arg(long)]
    base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank groups of point records
    Standings {
        /// Address (branch) id
        #[arg(long)]
        scope: Option<u64>,

        /// Fields to group by, comma-separated (nation, week, month, year, event, date)
        #[arg(long, default_value = "nation")]
        by: String,

        #[arg(long)]
        week: Option<u32>,

        #[arg(long)]
        month: Option<u32>,

        #[arg(long)]
        year: Option<u32>,

        /// Only records of this nation id
        #[arg(long)]
        nation: Option<u64>,

        /// View mode: weekly, monthly or yearly
        #[arg(long)]
        view: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List the distinct weeks, months or years present
    Buckets {
        #[arg(long)]
        scope: Option<u64>,

        /// week, month or year
        #[arg(long, default_value = "week")]
        key: String,
    },

    /// Points or people per nation per time bucket
    Series {
        #[arg(long)]
        scope: Option<u64>,

        /// week, month or year
        #[arg(long, default_value = "week")]
        key: String,

        /// points or people
        #[arg(long, default_value = "points")]
        measure: String,

        #[arg(long)]
        json: bool,
    },

    /// Week, month and year leaders reported by the backend
    Top {
        #[arg(long)]
        scope: Option<u64>,
    },

    /// Leaderboard of backend nation totals
    Nations {
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
        config.validate()?;
    }

    // Initialize tracing
    let level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            cli.json_logs
                .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
        .with(
            (!cli.json_logs).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        )
        .init();

    tracing::info!("Starting nation-points v{}", env!("CARGO_PKG_VERSION"));

    let client = PointsClient::new(ClientConfig::try_from(&config.api)?)?;
    let scope_or_default = |scope: Option<u64>| -> Result<ScopeId> {
        scope
            .or(config.api.default_scope)
            .map(ScopeId::new)
            .ok_or_else(|| anyhow!("No address given: pass --scope or set api.default_scope"))
    };

    match cli.command {
        Commands::Standings {
            scope,
            by,
            week,
            month,
            year,
            nation,
            view,
            json,
        } => {
            let scope = scope_or_default(scope)?;
            let group_by = GroupSpec::parse_list(&by).map_err(|e| anyhow!(e))?;
            let mut query = StandingsQuery {
                group_by,
                filter: BucketFilter {
                    week,
                    month,
                    year,
                    nation: nation.map(NationId::new),
                },
                view: None,
            };
            if let Some(view) = view {
                query = query.with_view(view.parse::<ViewMode>().map_err(|e| anyhow!(e))?);
            }

            let standings = load_standings(&client, scope, &query).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&standings)?);
            } else {
                print_standings(&standings);
            }
        }

        Commands::Buckets { scope, key } => {
            let scope = scope_or_default(scope)?;
            let key = key.parse::<TimeBucketKey>().map_err(|e| anyhow!(e))?;
            let outcome = load_records(&client, scope).await?;

            let buckets = distinct_buckets(&outcome.records, key);
            if buckets.is_empty() {
                println!("No {} buckets found.", key);
            }
            for bucket in buckets {
                println!("{}", key.label(bucket));
            }
        }

        Commands::Series {
            scope,
            key,
            measure,
            json,
        } => {
            let scope = scope_or_default(scope)?;
            let key = key.parse::<TimeBucketKey>().map_err(|e| anyhow!(e))?;
            let measure = measure.parse::<SeriesMeasure>().map_err(|e| anyhow!(e))?;
            let outcome = load_records(&client, scope).await?;

            let series = nation_series(&outcome.records, key, measure);
            if json {
                println!("{}", serde_json::to_string_pretty(&series)?);
            } else {
                println!("{:<20} {}", "Nation", series.labels().join("  "));
                for row in &series.rows {
                    let name = row
                        .nation_name
                        .clone()
                        .unwrap_or_else(|| format!("Nation {}", row.nation_id));
                    let values: Vec<String> = row.values.iter().map(|v| v.to_string()).collect();
                    println!("{:<20} {}", name, values.join("  "));
                }
            }
        }

        Commands::Top { scope } => {
            let scope = scope_or_default(scope)?;
            let top = client.fetch_top_performers(scope).await?;
            if top.is_empty() {
                println!("No leaders reported for address {}.", scope);
            } else {
                let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
                println!("Week leader:  {}", show(&top.top_week));
                println!("Month leader: {}", show(&top.top_month));
                println!("Year leader:  {}", show(&top.top_year));
            }
        }

        Commands::Nations { json } => {
            let ranked = nation_leaderboard(&client).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&ranked)?);
            } else if ranked.is_empty() {
                println!("No nations registered.");
            } else {
                println!(
                    "{:>4}  {:<20} {:>8} {:>8} {:>12} {:>10}",
                    "#", "Nation", "Members", "Mentors", "Secretaries", "Points"
                );
                for r in &ranked {
                    println!(
                        "{:>4}  {:<20} {:>8} {:>8} {:>12} {:>10}",
                        r.rank,
                        r.item.name,
                        r.item.total_members,
                        r.item.total_mentors,
                        r.item.total_secretaries,
                        r.item.total_points
                    );
                }
            }
        }
    }

    Ok(())
}

fn print_standings(standings: &Standings) {
    println!("\n=== Standings ===");
    let f = &standings.filter;
    let show = |v: Option<u32>| v.map_or("any".to_string(), |v| v.to_string());
    println!(
        "Filter:   week {}, month {}, year {}, nation {}",
        show(f.week),
        show(f.month),
        show(f.year),
        f.nation.map_or("any".to_string(), |n| n.to_string())
    );
    println!("Records:  {} ({} skipped)", standings.record_count, standings.skipped);
    println!();

    if standings.entries.is_empty() {
        println!("No points recorded for this selection.");
        return;
    }

    println!("{:>4}  {:<40} {:>10} {:>8}", "#", "Group", "Points", "People");
    for entry in &standings.entries {
        println!(
            "{:>4}  {:<40} {:>10} {:>8}",
            entry.rank,
            entry.item.label(),
            entry.item.total_points,
            entry.item.total_people
        );
    }
}
