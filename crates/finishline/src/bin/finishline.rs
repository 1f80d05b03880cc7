// ABOUTME: CLI binary for finishline: batch-process result URLs into CSV/JSON tables.
// ABOUTME: Accepts URLs, a URL list file, or a local HTML file for offline processing.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use finishline::{export, Accumulator, Client, DEFAULT_THRESHOLD};

#[derive(Parser, Debug)]
#[command(name = "finishline")]
#[command(about = "Classify race-results pages and extract normalized result tables")]
struct Args {
    /// URLs of result pages to process
    #[arg()]
    urls: Vec<String>,

    /// File with one result URL per line ('#' lines are comments)
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// Local HTML file to process offline (requires --url)
    #[arg(long = "html")]
    html: Option<PathBuf>,

    /// URL context for --html
    #[arg(long = "url")]
    url: Option<String>,

    /// Directory to write the CSV tables into
    #[arg(short = 'o', long = "out-dir")]
    out_dir: Option<PathBuf>,

    /// Print the accumulated results as JSON to stdout
    #[arg(long = "json")]
    json: bool,

    /// Acceptance threshold for the winning detector confidence
    #[arg(long = "threshold", default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,

    /// Maximum pages fetched and processed concurrently
    #[arg(long = "concurrency", default_value_t = 4)]
    concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long = "timeout-secs", default_value_t = 10)]
    timeout_secs: u64,
}

fn read_url_file(path: &Path) -> io::Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}

fn write_tables(dir: &Path, results: &Accumulator) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(
        dir.join("individual_results.csv"),
        export::individual_csv(&results.individual),
    )?;
    fs::write(dir.join("team_results.csv"), export::team_csv(&results.team))?;
    fs::write(
        dir.join("metadata_results.csv"),
        export::records_csv(&results.records),
    )?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut urls = args.urls.clone();
    if let Some(path) = &args.input {
        match read_url_file(path) {
            Ok(from_file) => urls.extend(from_file),
            Err(e) => {
                eprintln!("error reading {:?}: {}", path, e);
                return ExitCode::from(1);
            }
        }
    }

    if args.html.is_some() && !urls.is_empty() {
        eprintln!("error: cannot use both --html and URLs");
        return ExitCode::from(1);
    }

    let client = Client::builder()
        .threshold(args.threshold)
        .concurrency(args.concurrency)
        .timeout(Duration::from_secs(args.timeout_secs))
        .build();

    let mut results = Accumulator::default();
    if let Some(html_path) = &args.html {
        let Some(url) = args.url.as_deref() else {
            eprintln!("error: --url is required when using --html");
            return ExitCode::from(1);
        };
        match fs::read_to_string(html_path) {
            Ok(html) => results.merge(client.process_html(&html, url)),
            Err(e) => {
                eprintln!("error reading {:?}: {}", html_path, e);
                return ExitCode::from(1);
            }
        }
    } else {
        if urls.is_empty() {
            eprintln!("error: no URLs given; pass URLs, --input, or --html with --url");
            return ExitCode::from(1);
        }
        results = client.run(&urls).await;
    }

    if args.json {
        match serde_json::to_string_pretty(&results) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error serializing results: {}", e);
                return ExitCode::from(1);
            }
        }
    }

    if let Some(dir) = &args.out_dir {
        if let Err(e) = write_tables(dir, &results) {
            eprintln!("error writing output to {:?}: {}", dir, e);
            return ExitCode::from(1);
        }
    }

    if !args.json && args.out_dir.is_none() {
        // Summary mode: one line per page.
        for record in &results.records {
            println!(
                "{}\t{}\trows={}\tconfidence={:.2}",
                record.source_id, record.outcome, record.row_count, record.confidence
            );
        }
    }

    if results.failure_count() > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
