//! `pinlens` command-line interface

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use pinlens_analytics::{AggregateSnapshot, Average, Insight, IntelligenceReport, QueueStats};
use pinlens_core::{Dashboard, DashboardConfig, MemoryStore, PagedStore};
use pinlens_schema::TableKind;
use pinlens_view::format::{compact_number, relative_age};
use pinlens_view::RenderedPage;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const TOP_N: usize = 5;

fn cli() -> Command {
    Command::new("pinlens")
        .version(pinlens_core::VERSION)
        .about("Tabular views and aggregate insights over mirrored record tables")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("analytics")
                .about("Print dashboard metrics for a snapshot file")
                .arg(snapshot_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output the aggregate snapshot as JSON"),
                ),
        )
        .subcommand(
            Command::new("table")
                .about("Render one page of a table from a snapshot file")
                .arg(
                    Arg::new("kind")
                        .required(true)
                        .value_parser(value_parser!(String))
                        .help("competitor-pins, pin-analysis, competitor-intelligence or content-queue"),
                )
                .arg(snapshot_arg())
                .arg(
                    Arg::new("search")
                        .long("search")
                        .value_parser(value_parser!(String))
                        .help("Case-insensitive text search over every column"),
                )
                .arg(
                    Arg::new("sort")
                        .long("sort")
                        .action(ArgAction::Append)
                        .value_parser(value_parser!(String))
                        .help("Sort column; repeat to flip direction"),
                )
                .arg(
                    Arg::new("facet")
                        .long("facet")
                        .action(ArgAction::Append)
                        .value_parser(value_parser!(String))
                        .help("Exact column filter as COLUMN=VALUE"),
                )
                .arg(
                    Arg::new("page")
                        .long("page")
                        .default_value("1")
                        .value_parser(value_parser!(usize))
                        .help("Page number (clamped to the last page)"),
                )
                .arg(
                    Arg::new("page-size")
                        .long("page-size")
                        .value_parser(value_parser!(usize))
                        .help("Rows per page"),
                ),
        )
        .subcommand(
            Command::new("check-config")
                .about("Validate configuration and report the resolved settings"),
        )
}

fn snapshot_arg() -> Arg {
    Arg::new("snapshot")
        .long("snapshot")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("JSON file mapping table names to record arrays")
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pinlens=info"));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    if let Err(err) = run(&matches).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(matches: &ArgMatches) -> Result<()> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };

    match matches.subcommand() {
        Some(("analytics", args)) => {
            let dashboard = load_dashboard(config, snapshot_path(args)?).await?;
            let analytics = dashboard
                .analytics()
                .context("no snapshot loaded")?;
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(analytics)?);
            } else {
                print_metrics(analytics, Utc::now());
            }
        }
        Some(("table", args)) => {
            let kind: TableKind = args
                .get_one::<String>("kind")
                .context("missing table kind")?
                .parse()?;
            let mut dashboard = load_dashboard(config, snapshot_path(args)?).await?;

            if let Some(size) = args.get_one::<usize>("page-size") {
                dashboard.set_page_size(kind, *size)?;
            }
            for facet in args.get_many::<String>("facet").into_iter().flatten() {
                let (column, value) = facet
                    .split_once('=')
                    .with_context(|| format!("facet '{facet}' is not COLUMN=VALUE"))?;
                dashboard.set_facet(kind, column.trim(), value.trim())?;
            }
            if let Some(search) = args.get_one::<String>("search") {
                dashboard.set_search(kind, search);
            }
            for column in args.get_many::<String>("sort").into_iter().flatten() {
                dashboard.set_sort(kind, column)?;
            }
            if let Some(page) = args.get_one::<usize>("page") {
                dashboard.set_page(kind, *page);
            }

            print_page(&dashboard.render(kind));
        }
        Some(("check-config", _)) => {
            config.validate()?;
            println!("Base:        {}", config.normalized_base_id());
            println!("Page size:   {}", config.page_size);
            println!(
                "Retry:       {} retries, {}ms back-off",
                config.retry.max_retries, config.retry.backoff_ms
            );
            for kind in TableKind::ALL {
                println!("{:<12} {}", format!("{kind}:"), config.table_name(kind));
            }
            match config.credential() {
                Ok(token) => println!("Credential:  {token}"),
                Err(err) => println!("Credential:  {err}"),
            }
        }
        _ => cli().print_help()?,
    }

    Ok(())
}

fn snapshot_path(args: &ArgMatches) -> Result<&Path> {
    args.get_one::<PathBuf>("snapshot")
        .map(PathBuf::as_path)
        .context("missing --snapshot")
}

async fn load_dashboard(config: DashboardConfig, path: &Path) -> Result<Dashboard> {
    config.validate()?;
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let source = MemoryStore::from_json_str(&raw)
        .with_context(|| format!("failed to parse snapshot {}", path.display()))?;

    let present = source.table_names();
    for kind in TableKind::ALL {
        let name = config.table_name(kind);
        if !present.iter().any(|n| n == name) {
            tracing::warn!("Snapshot has no '{}' table, treating it as empty", name);
            source.insert_table(name, Vec::new());
        }
    }

    let store = PagedStore::new(source, config.retry);
    let mut dashboard = Dashboard::new(config);
    dashboard.refresh(&store).await?;
    Ok(dashboard)
}

fn print_metrics(analytics: &AggregateSnapshot, now: DateTime<Utc>) {
    println!("Total pins:          {}", analytics.total_pins);
    println!("Analyzed pins:       {}", analytics.analyzed_pins);
    println!("Competitors:         {}", analytics.unique_competitors());
    println!(
        "Top hook:            {} ({})",
        analytics.top_hook.as_deref().unwrap_or("—"),
        analytics.hook_share_label()
    );
    println!("Avg CTA strength:    {}", analytics.avg_cta_strength);

    let pillars = analytics.pillar_percentages();
    if !pillars.is_empty() {
        println!();
        println!("Content pillars:");
        for (pillar, share) in pillars {
            println!("  {:<20} {share}%", pillar.label());
        }
    }

    let keywords = analytics.top_keywords(TOP_N);
    if !keywords.is_empty() {
        println!();
        println!("Top keywords:");
        for entry in keywords {
            println!("  {:<20} {}", entry.key, entry.count);
        }
    }

    let underused = analytics.underutilized_hooks();
    if !underused.is_empty() {
        println!();
        println!("Underutilized hooks:");
        for entry in underused {
            println!("  {:<20} {}%", entry.key, entry.share);
        }
    }

    let gaps = analytics.top_gaps(TOP_N);
    if !gaps.is_empty() {
        println!();
        println!("Gap opportunities:");
        for entry in gaps {
            println!("  {} ({})", entry.key, entry.count);
        }
    }

    if let Some(report) = &analytics.latest_report {
        println!();
        println!("{}", report_line(report, now));
    }

    println!();
    println!("{}", queue_line(&analytics.queue));
    for (status, count) in &analytics.queue.by_status {
        println!("  {status:<20} {count}");
    }

    if let Some(insight) = analytics.insight() {
        println!();
        match insight {
            Insight::CuriosityUnderused { share } => {
                println!("Insight: curiosity hooks are only {share}% of hooks");
            }
            Insight::WeakCtas { average } => {
                println!("Insight: average CTA strength is {average}");
            }
            Insight::HookDominates { hook, share } => {
                println!("Insight: {hook} leads with {share}% of hooks");
            }
        }
    }
}

fn report_line(report: &IntelligenceReport, now: DateTime<Utc>) -> String {
    match &report.report_date {
        Some(date) => format!(
            "Latest report:       {} ({})",
            report.summary,
            relative_age(date, now)
        ),
        None => format!("Latest report:       {}", report.summary),
    }
}

fn queue_line(queue: &QueueStats) -> String {
    let engagement = match queue.avg_engagement {
        Average::Value(v) => compact_number(v),
        Average::NoData => Average::NoData.to_string(),
    };
    format!(
        "Content queue:       {} items, avg engagement {engagement}",
        queue.total
    )
}

fn print_page(page: &RenderedPage) {
    println!("{}", page.count_label);

    let headers: Vec<String> = page
        .headers
        .iter()
        .map(|header| match header.sort {
            Some(direction) => format!("{} {}", header.label, direction.glyph()),
            None => header.label.to_string(),
        })
        .collect();
    println!("{}", headers.join(" | "));

    if let Some(empty) = &page.empty_state {
        println!();
        println!("{}", empty.title());
        println!("{}", empty.subtitle());
        return;
    }

    for row in &page.rows {
        let cells: Vec<String> = row.cells.iter().map(|cell| cell.content.to_text()).collect();
        println!("{}", cells.join(" | "));
    }

    println!();
    println!(
        "{} (page {} of {})",
        page.range_label(),
        page.pagination.page,
        page.pagination.total_pages
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pinlens_schema::Record;
    use serde_json::json;

    #[test]
    fn queue_line_is_compact() {
        let records = vec![
            Record::from_json("rec1", json!({"Status": "Queued"})),
            Record::from_json("rec2", json!({"Status": "Posted", "Metrics_Engagement": 24_000})),
            Record::from_json("rec3", json!({"Status": "Posted", "Metrics_Engagement": 26_000})),
        ];
        let line = queue_line(&QueueStats::compute(&records));
        assert_eq!(line, "Content queue:       3 items, avg engagement 25K");

        assert_eq!(
            queue_line(&QueueStats::default()),
            "Content queue:       0 items, avg engagement N/A"
        );
    }

    #[test]
    fn report_line_shows_age() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let mut report = IntelligenceReport {
            record_id: "rec1".into(),
            report_date: Some(now - chrono::Duration::hours(30)),
            summary: "Curiosity hooks trending".into(),
            top_hooks: None,
            top_keywords: None,
            recommendations: None,
        };
        assert_eq!(
            report_line(&report, now),
            "Latest report:       Curiosity hooks trending (Yesterday)"
        );

        report.report_date = None;
        assert_eq!(report_line(&report, now), "Latest report:       Curiosity hooks trending");
    }
}
