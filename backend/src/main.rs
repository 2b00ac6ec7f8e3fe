//! School report CLI - assessment exports to per-school report cards
//!
//! # Main Commands
//!
//! ```bash
//! schoolreport import scores.csv --out-dir data     # Normalize + aggregate an export
//! schoolreport report --school 101 --lang hi        # Render one school report
//! schoolreport batch --lang en --out-dir reports    # Render every school
//! schoolreport serve                                # Start HTTP server (port 3000)
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! schoolreport parse scores.csv                     # Just parse the export to JSON rows
//! schoolreport document --school 101                # Print the document description
//! schoolreport validate request.json                # Validate a report request
//! ```

use clap::{Parser, Subcommand};
use schoolreport::{
    import_file, parse_file_auto, report_request, run_batch, AnyRenderer, AppConfig, BatchOptions,
    DatasetStore, GradeLevel, ImportOptions, Lang, Pacing, Renderer, ReportRequest, ReportScope,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "schoolreport")]
#[command(about = "Turn school assessment exports into per-school report cards", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an export and output JSON rows
    Parse {
        /// Input CSV, JSON or XLSX file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Normalize and aggregate an export into a dataset directory
    Import {
        /// Input CSV, JSON or XLSX file
        input: PathBuf,

        /// Dataset directory (default: SCHOOLREPORT_DATA_DIR or ./data)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Print the document description of one school report
    Document {
        #[command(flatten)]
        target: ReportTarget,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render one school report
    Report {
        #[command(flatten)]
        target: ReportTarget,

        /// Output directory
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// External renderer URL (default: SCHOOLREPORT_RENDERER_URL, else text)
        #[arg(long)]
        renderer_url: Option<String>,
    },

    /// Render one report per school
    Batch {
        /// Dataset directory (default: SCHOOLREPORT_DATA_DIR or ./data)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Report language (en or hi)
        #[arg(short, long, default_value = "en")]
        lang: Lang,

        /// Restrict reports to one grade (6, 7 or 8)
        #[arg(short, long)]
        grade: Option<u8>,

        /// Output directory
        #[arg(long, default_value = "reports")]
        out_dir: PathBuf,

        /// Delay between schools in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Render timeout per school in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// External renderer URL (default: SCHOOLREPORT_RENDERER_URL, else text)
        #[arg(long)]
        renderer_url: Option<String>,
    },

    /// Validate a report request JSON file
    Validate {
        /// Request JSON file
        input: PathBuf,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on (default: SCHOOLREPORT_PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(clap::Args)]
struct ReportTarget {
    /// Dataset directory (default: SCHOOLREPORT_DATA_DIR or ./data)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// School code
    #[arg(short, long)]
    school: String,

    /// Report language (en or hi)
    #[arg(short, long, default_value = "en")]
    lang: Lang,

    /// Restrict the report to one grade (6, 7 or 8)
    #[arg(short, long)]
    grade: Option<u8>,
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match AppConfig::from_env() {
        Ok(config) => run(cli.command, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: AppConfig) -> CliResult {
    match command {
        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),
        Commands::Import { input, out_dir } => cmd_import(&input, out_dir.unwrap_or(config.data_dir)),
        Commands::Document { target, output } => cmd_document(&target, &config, output.as_deref()),
        Commands::Report { target, out_dir, renderer_url } => {
            let renderer = AnyRenderer::from_url(renderer_url.as_deref().or(config.renderer_url.as_deref()));
            cmd_report(&target, &config, &out_dir, &renderer).await
        }
        Commands::Batch { data_dir, lang, grade, out_dir, delay_ms, timeout_secs, renderer_url } => {
            let renderer = AnyRenderer::from_url(renderer_url.as_deref().or(config.renderer_url.as_deref()));
            let options = BatchOptions {
                lang,
                scope: scope_for(grade)?,
                timeout: timeout_secs.map(Duration::from_secs).unwrap_or(config.render_timeout),
                pacing: Pacing::from_delay(delay_ms.map(Duration::from_millis).unwrap_or(config.pacing)),
                output_dir: Some(out_dir.clone()),
            };
            cmd_batch(&data_dir.unwrap_or(config.data_dir), &out_dir, &renderer, &options).await
        }
        Commands::Validate { input } => cmd_validate(&input),
        Commands::Serve { port } => cmd_serve(AppConfig { port: port.unwrap_or(config.port), ..config }).await,
    }
}

fn scope_for(grade: Option<u8>) -> Result<ReportScope, Box<dyn std::error::Error>> {
    match grade {
        None => Ok(ReportScope::Full),
        Some(g) => GradeLevel::new(i64::from(g))
            .map(ReportScope::Grade)
            .ok_or_else(|| format!("grade {} is not one of 6, 7, 8", g).into()),
    }
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> CliResult {
    eprintln!("📄 Parsing: {}", input.display());
    let result = parse_file_auto(input)?;

    eprintln!("   Encoding: {}", result.encoding);
    match result.delimiter {
        Some(d) => eprintln!("   Delimiter: '{}'", if d == '\t' { "TAB".to_string() } else { d.to_string() }),
        None if result.encoding == schoolreport::parser::WORKBOOK_ENCODING => eprintln!("   Format: XLSX workbook"),
        None => eprintln!("   Format: JSON rows"),
    }
    eprintln!("   Columns: {}", result.headers.join(", "));
    eprintln!("✅ Parsed {} records", result.records.len());

    let json = serde_json::to_string_pretty(&result.records)?;
    write_output(&json, output)
}

fn cmd_import(input: &Path, out_dir: PathBuf) -> CliResult {
    eprintln!("📄 Importing: {}", input.display());
    let result = import_file(input, ImportOptions { output_dir: Some(out_dir.clone()) })?;
    let summary = &result.summary;

    eprintln!("\n📊 Summary:");
    eprintln!("   Rows:       {}", summary.total);
    eprintln!("   Accepted:   {}", summary.accepted);
    eprintln!("   Discarded:  {}", summary.discarded);
    for (reason, count) in &summary.discarded_by_reason {
        eprintln!("     - {}: {}", reason.describe(), count);
    }
    if summary.defaulted_scores > 0 {
        eprintln!("   Defaulted scores: {}", summary.defaulted_scores);
    }
    eprintln!("   Schools:    {}", result.dataset.schools.len());
    eprintln!("   💾 Dataset written to: {}", out_dir.display());
    eprintln!("\n✨ Done!");
    Ok(())
}

fn target_request(target: &ReportTarget, config: &AppConfig) -> Result<ReportRequest, Box<dyn std::error::Error>> {
    let dir = target.data_dir.clone().unwrap_or_else(|| config.data_dir.clone());
    let dataset = DatasetStore::with_dir(&dir).load()?;
    Ok(report_request(&dataset, &target.school, target.lang, scope_for(target.grade)?)?)
}

fn cmd_document(target: &ReportTarget, config: &AppConfig, output: Option<&Path>) -> CliResult {
    let request = target_request(target, config)?;
    let document = request.build()?;
    eprintln!("📄 {} pages for {} ({})", document.pages.len(), request.school.school_name, request.school.school_code);
    write_output(&serde_json::to_string_pretty(&document)?, output)
}

async fn cmd_report(target: &ReportTarget, config: &AppConfig, out_dir: &Path, renderer: &AnyRenderer) -> CliResult {
    let request = target_request(target, config)?;
    let document = request.build()?;
    let filename = request.filename(renderer.extension());

    eprintln!("🖨️  Rendering {} with {}", filename, renderer.describe());
    let bytes = tokio::time::timeout(config.render_timeout, renderer.render(&request, &document))
        .await
        .map_err(|_| schoolreport::RenderError::Timeout(config.render_timeout))??;

    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(&filename);
    fs::write(&path, &bytes)?;
    eprintln!("💾 Written to: {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

async fn cmd_batch(data_dir: &Path, out_dir: &Path, renderer: &AnyRenderer, options: &BatchOptions) -> CliResult {
    let dataset = DatasetStore::with_dir(data_dir).load()?;
    eprintln!("📦 {} schools, renderer: {}", dataset.schools.len(), renderer.describe());

    let report = tokio::select! {
        report = run_batch(&dataset, renderer, options) => report,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\n⛔ Batch cancelled, no manifest written");
            std::process::exit(130);
        }
    };

    fs::create_dir_all(out_dir)?;
    let manifest = out_dir.join("batch_report.json");
    fs::write(&manifest, serde_json::to_string_pretty(&report)?)?;

    eprintln!("\n📊 Results: {} succeeded, {} failed (of {})", report.succeeded, report.failed, report.total);
    for failure in &report.failures {
        eprintln!("   ❌ {} ({}): {}", failure.school_name, failure.school_code, failure.reason);
    }
    eprintln!("💾 Reports written to: {}", out_dir.display());
    eprintln!("💾 Manifest: {}", manifest.display());
    Ok(())
}

fn cmd_validate(input: &Path) -> CliResult {
    eprintln!("✔️  Validating: {}", input.display());
    let content = fs::read_to_string(input)?;

    match ReportRequest::from_json(&content) {
        Ok(request) => {
            eprintln!(
                "✅ Valid request for {} ({}), {} competencies",
                request.school.school_name,
                request.school.school_code,
                request.competencies.len()
            );
            Ok(())
        }
        Err(schoolreport::RequestError::Schema { errors }) => {
            eprintln!("\n❌ Request invalid:");
            for err in &errors {
                eprintln!("   - {}", err);
            }
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

async fn cmd_serve(config: AppConfig) -> CliResult {
    schoolreport::server::start_server(config).await?;
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> CliResult {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
