mod error;
mod fetch;
mod settings;
mod store;
mod timetable;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use tracing::info;

use settings::Settings;
use timetable::{DayPattern, ExtractOptions, TimetableEntry};

#[derive(Parser)]
#[command(name = "tutu_timetable", about = "Commuter-train timetable extractor for tutu.ru station pages")]
struct Cli {
    /// Cached station page (default: schedule.html)
    #[arg(long, global = true)]
    html: Option<PathBuf>,
    /// JSON output file (default: schedule.json)
    #[arg(long, global = true)]
    json: Option<PathBuf>,
    /// tutu.ru station id (default: 45807)
    #[arg(long, global = true)]
    station: Option<u32>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the station page into the cache file
    Fetch,
    /// Extract the timetable from the cached page and save it as JSON
    Parse {
        /// Keep only trains running on these days
        #[arg(short, long, value_enum)]
        filter: Option<DayPattern>,
    },
    /// Fetch + parse in one go
    Run {
        /// Keep only trains running on these days
        #[arg(short, long, value_enum)]
        filter: Option<DayPattern>,
    },
    /// Print the saved JSON timetable
    Show {
        /// Keep only trains running on these days
        #[arg(short, long, value_enum)]
        filter: Option<DayPattern>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let mut settings = Settings::load()?;
    settings.override_with(cli.html, cli.json, cli.station);
    info!(settings = ?settings, "settings loaded");

    let result = match cli.command {
        Commands::Fetch => {
            let page = fetch::fetch_station_page(&settings)?;
            println!(
                "Saved {} bytes to {} (HTTP {}, {} ms).",
                page.body.len(),
                page.path.display(),
                page.status,
                page.latency_ms
            );
            println!("Next: run 'parse' to extract the timetable.");
            Ok(())
        }
        Commands::Parse { filter } => {
            let raw = store::load_document(&settings.html_path)?;
            parse_and_report(&settings, &raw, filter)
        }
        Commands::Run { filter } => {
            let t_fetch = Instant::now();
            let page = fetch::fetch_station_page(&settings)?;
            println!(
                "Fetched {} bytes in {:.1}s",
                page.body.len(),
                t_fetch.elapsed().as_secs_f64()
            );
            parse_and_report(&settings, &page.body, filter)
        }
        Commands::Show { filter } => {
            let saved = store::load_entries(&settings.json_path)?;
            let entries = timetable::dedup::finalize(saved, filter);
            if entries.is_empty() {
                println!("No trains in {}.", settings.json_path.display());
                return Ok(());
            }
            print_table(&entries);
            print_summary(entries.len(), filter);
            Ok(())
        }
    };

    info!(elapsed = %format_elapsed(t0.elapsed()), "done");

    result
}

fn parse_and_report(
    settings: &Settings,
    raw: &str,
    filter: Option<DayPattern>,
) -> anyhow::Result<()> {
    let options = ExtractOptions {
        row_signature: settings.row_signature.clone(),
        day_filter: filter,
    };
    let extraction = timetable::extract_timetable(raw, &options)?;

    for r in &extraction.reports {
        println!(
            "{:<18} {:>4} candidates -> {:>3} trains",
            r.strategy.name(),
            r.candidates,
            r.entries
        );
    }
    println!();

    let entries = &extraction.entries;
    if entries.is_empty() {
        if extraction.unique_before_filter > 0 {
            println!(
                "No trains match the filter ({} found before filtering).",
                extraction.unique_before_filter
            );
        } else {
            println!("No trains found. Possible causes:");
            println!("  - the page layout changed (try a new row_signature in timetable.toml)");
            println!("  - the page is a captcha or error page (inspect {})", settings.html_path.display());
            println!("  - the station has no departures today");
        }
    } else {
        print_table(entries);
    }

    print_summary(entries.len(), filter);
    store::save_entries(&settings.json_path, entries)?;
    println!("Saved to {}", settings.json_path.display());
    Ok(())
}

fn print_table(entries: &[TimetableEntry]) {
    println!("{:>3} | {:<5} | {:<40} | {:<8}", "#", "Time", "Route", "Days");
    println!("{}", "-".repeat(66));
    for (i, e) in entries.iter().enumerate() {
        println!(
            "{:>3} | {:<5} | {:<40} | {:<8}",
            i + 1,
            e.departure_time,
            fit(&e.route, 40),
            e.days
        );
    }
}

fn print_summary(count: usize, filter: Option<DayPattern>) {
    println!("\n{} trains", count);
    if let Some(f) = filter {
        println!("Filter: {}", f);
    }
}

/// Clip to `width` chars, marking the cut with a trailing `…`.
fn fit(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut clipped: String = s.chars().take(width.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

/// Milliseconds under a second, then seconds, then minutes.
fn format_elapsed(d: Duration) -> String {
    match d.as_millis() {
        ms if ms < 1_000 => format!("{ms} ms"),
        ms if ms < 60_000 => format!("{:.1}s", d.as_secs_f64()),
        _ => format!("{}m {}s", d.as_secs() / 60, d.as_secs() % 60),
    }
}
