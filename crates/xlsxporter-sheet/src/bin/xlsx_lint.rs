use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use walkdir::WalkDir;
use xlsxporter_sheet::source::is_supported;
use xlsxporter_sheet::{
    DumpFormat, ExportConfig, SheetOutcome, SheetReport, open_path, parse_workbook,
};

/// Parse spreadsheet tables and report what an export would contain.
#[derive(Parser, Debug)]
#[command(name = "xlsx-lint", version, about)]
struct Cli {
    /// YAML config file; command-line flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Export tag. Fields tagged differently are left out; empty keeps all.
    #[arg(long)]
    tag: Option<String>,

    /// Output format.
    #[arg(long, value_enum)]
    format: Option<DumpFormat>,

    /// Workbook files or directories to scan.
    paths: Vec<PathBuf>,
}

fn main() -> ExitCode {
    #[cfg(feature = "tracing")]
    init_tracing();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(feature = "tracing")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Returns whether every sheet parsed.
fn run(cli: Cli) -> Result<bool> {
    let mut config = match &cli.config {
        Some(path) => ExportConfig::from_path(path)?,
        None => ExportConfig::default(),
    };
    if let Some(tag) = cli.tag {
        config.tag = tag;
    }
    if let Some(format) = cli.format {
        config.dump = Some(format);
    }
    if !cli.paths.is_empty() {
        config.sources = cli.paths;
    }
    if config.sources.is_empty() {
        anyhow::bail!("no input paths given");
    }

    let options = config.parse_options();
    let format = config.dump.unwrap_or_default();
    let mut ok = true;
    let mut dumped = Vec::new();
    for file in collect_files(&config.sources)? {
        let source = open_path(&file).with_context(|| format!("opening {}", file.display()))?;
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let reports = parse_workbook(source.as_ref(), &file_name, &options)
            .with_context(|| format!("reading {}", file.display()))?;
        ok &= !reports.iter().any(SheetReport::is_failed);
        match format {
            DumpFormat::Summary => print_summary(&file_name, &reports),
            DumpFormat::Tree => print_trees(&reports),
            DumpFormat::Json => dumped.push(serde_json::json!({
                "file": file_name,
                "sheets": reports,
            })),
        }
    }
    if format == DumpFormat::Json {
        println!("{}", serde_json::to_string_pretty(&dumped)?);
    }
    Ok(ok)
}

fn collect_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
            continue;
        }
        for entry in WalkDir::new(input).sort_by_file_name() {
            let entry = entry.with_context(|| format!("walking {}", input.display()))?;
            let path = entry.path();
            if entry.file_type().is_file() && is_supported(path) && !is_lock_file(path) {
                files.push(entry.into_path());
            }
        }
    }
    Ok(files)
}

/// Office keeps `~$name.xlsx` lock files next to open workbooks.
fn is_lock_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("~$"))
}

fn print_summary(file_name: &str, reports: &[SheetReport]) {
    for report in reports {
        match &report.outcome {
            SheetOutcome::Parsed(table) => {
                println!("ok      {file_name}[{}] {table}", table.sheet_name)
            }
            SheetOutcome::Ignored => println!("ignored {file_name}[{}]", report.raw_name),
            SheetOutcome::Failed { error } => {
                println!("FAILED  {file_name}[{}] {error}", report.raw_name)
            }
        }
    }
}

fn print_trees(reports: &[SheetReport]) {
    for table in reports.iter().filter_map(SheetReport::table) {
        println!("# {} ({})", table.class_name, table.sheet_name);
        print!("{}", table.schema.tree());
    }
}
