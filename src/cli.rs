use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use sweeper::exporter::ExportFormat;
use sweeper::loader::UploadedFile;
use sweeper::orchestrator::{self, ChartOutcome, SweepOptions};
use sweeper::session::SessionState;

#[derive(Parser)]
#[command(name = "sweeper", about = "Tabular data cleaning and conversion tool")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean and convert files between CSV and Excel
    Convert {
        /// Input files (.csv or .xlsx); unsupported files are skipped
        files: Vec<PathBuf>,

        /// Output format
        #[arg(long, value_enum)]
        to: FormatArg,

        /// Remove duplicate rows
        #[arg(long)]
        remove_duplicates: bool,

        /// Fill missing numeric values with the column mean
        #[arg(long)]
        fill_missing: bool,

        /// Shorthand for --remove-duplicates --fill-missing
        #[arg(long)]
        clean: bool,

        /// Columns to keep (comma-separated); defaults to all columns
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<String>>,

        /// Report bar-chart data for the numeric columns
        #[arg(long)]
        chart: bool,

        /// Path to a JSON options file; explicit flags override its values
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory (defaults to the current directory)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
    /// Preview a file: size, shape and leading rows
    Inspect {
        /// File to inspect
        file: PathBuf,

        /// Number of rows to preview
        #[arg(long, default_value_t = 5)]
        rows: usize,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Csv,
    Xlsx,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => Self::Csv,
            FormatArg::Xlsx => Self::Excel,
        }
    }
}

pub fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Convert {
            files,
            to,
            remove_duplicates,
            fill_missing,
            clean,
            columns,
            chart,
            config,
            out_dir,
        } => {
            let mut options = match &config {
                Some(path) => SweepOptions::from_file(path)
                    .with_context(|| format!("Failed to load options from {}", path.display()))?,
                None => SweepOptions::default(),
            };
            if clean || remove_duplicates {
                options.remove_duplicates = true;
            }
            if clean || fill_missing {
                options.fill_missing = true;
            }
            if columns.is_some() {
                options.columns = columns;
            }
            if chart {
                options.chart = true;
            }
            options.format = Some(to.into());

            handle_convert(&files, &options, out_dir.as_deref())
        }
        Commands::Inspect { file, rows } => handle_inspect(&file, rows),
    }
}

fn handle_convert(files: &[PathBuf], options: &SweepOptions, out_dir: Option<&Path>) -> Result<()> {
    if files.is_empty() {
        anyhow::bail!("No input files provided.");
    }

    let out_dir = out_dir.unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let mut state = SessionState::new();
    let mut converted = 0usize;

    for path in files {
        // Unsupported extensions and parse failures only stop this file;
        // the rest of the batch continues.
        let file = match UploadedFile::from_path(path) {
            Ok(file) => file,
            Err(e) => {
                eprintln!("Skipping {}: {e}", path.display());
                continue;
            }
        };

        match orchestrator::sweep_file(&mut state, file, options) {
            Ok(outcome) => {
                println!("{}", outcome.summary());

                match &outcome.chart {
                    Some(ChartOutcome::Ready(data)) => println!(
                        "  chart: {} numeric column(s) over {} row(s)",
                        data.columns.len(),
                        data.rows
                    ),
                    Some(ChartOutcome::NoNumericColumns) => {
                        println!("  No numeric columns available for visualization.");
                    }
                    None => {}
                }

                if let Some(payload) = &outcome.export {
                    let target = out_dir.join(&payload.file_name);
                    std::fs::write(&target, &payload.bytes)
                        .with_context(|| format!("Failed to write {}", target.display()))?;
                    println!("  -> {} ({})", target.display(), payload.mime_type);
                    converted += 1;
                }
            }
            Err(e) => eprintln!("Failed to process {}: {e}", path.display()),
        }
    }

    state.clear();

    if converted == 0 {
        anyhow::bail!("No files were converted.");
    }
    println!("Processed {converted} of {} file(s).", files.len());
    Ok(())
}

fn handle_inspect(path: &Path, rows: usize) -> Result<()> {
    let file = UploadedFile::from_path(path)?;
    let mut state = SessionState::new();
    let entry = state.open(file)?;

    println!("File: {}", entry.file.name());
    println!("Size: {:.2} KB", entry.file.size() as f64 / 1024.0);
    println!(
        "Shape: {} row(s) x {} column(s)",
        entry.table.height(),
        entry.table.width()
    );
    println!("{}", entry.table.head(Some(rows)));
    Ok(())
}
