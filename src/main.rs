mod config;
mod error;
mod feed;
mod markdown;
mod parser;
mod record;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::{Overrides, Settings};
use crate::parser::date::DateStyle;
use crate::parser::rating::RatingFallback;
use crate::parser::BuildOptions;
use crate::record::{MovieRecord, Rewatch};

#[derive(Parser)]
#[command(name = "letterboxd_diary", about = "Render a Letterboxd diary RSS feed as a Markdown table")]
struct Cli {
    /// Diary RSS feed URL [env: DIARY_FEED_URL]
    #[arg(long, global = true)]
    feed_url: Option<String>,
    /// Markdown file to write [env: DIARY_OUTPUT]
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,
    /// Document heading [env: DIARY_TITLE]
    #[arg(short, long, global = true)]
    title: Option<String>,
    /// Watched date style [env: DIARY_DATE_STYLE]
    #[arg(long, value_enum, global = true)]
    date_style: Option<DateStyle>,
    /// Rating cell text for unrated films [env: DIARY_RATING_FALLBACK]
    #[arg(long, value_enum, global = true)]
    rating_fallback: Option<RatingFallback>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            feed_url: self.feed_url.clone(),
            output: self.output.clone(),
            title: self.title.clone(),
            date_style: self.date_style,
            rating_fallback: self.rating_fallback,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the feed and write the Markdown table (default)
    Render,
    /// Fetch the feed and print the diary to the console
    List {
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(&cli.overrides()).context("invalid configuration")?;
    let opts = BuildOptions {
        date_style: settings.date_style,
        rating_fallback: settings.rating_fallback,
    };

    let result = match cli.command.unwrap_or(Commands::Render) {
        Commands::Render => {
            let entries = feed::fetch_diary(&settings.feed_url)
                .await
                .context("fetch stage failed")?;
            println!("Number of movies: {}", entries.len());

            let records = parser::build_records(&entries, &opts);
            markdown::write_markdown(&settings.output, &settings.title, &records)
                .context("render stage failed")?;
            println!("Wrote {}", settings.output.display());
            Ok(())
        }
        Commands::List { limit } => {
            let entries = feed::fetch_diary(&settings.feed_url)
                .await
                .context("fetch stage failed")?;
            let records = parser::build_records(&entries, &opts);
            if records.is_empty() {
                println!("{}", markdown::NO_DATA);
                return Ok(());
            }
            print_records(&records, limit);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn print_records(records: &[MovieRecord], limit: usize) {
    println!(
        "{:>3} | {:<32} | {:<4} | {:<5} | {:<10} | {}",
        "#", "Title", "Year", "Stars", "Watched", "Rewatch"
    );
    println!("{}", "-".repeat(74));

    for (i, r) in records.iter().take(limit).enumerate() {
        let rewatch = if r.rewatch == Rewatch::Yes { "🔁" } else { "" };
        println!(
            "{:>3} | {:<32} | {:<4} | {:<5} | {:<10} | {}",
            i + 1,
            truncate(&r.title, 32),
            r.year,
            r.rating,
            r.watched_date,
            rewatch
        );
    }

    let rewatches = records.iter().filter(|r| r.rewatch == Rewatch::Yes).count();
    println!("\n{} films | {} rewatches", records.len(), rewatches);
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
