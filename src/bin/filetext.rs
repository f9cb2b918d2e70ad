use anyhow::{bail, Context, Result};
use clap::Parser;
use filetext::{
    config::Config, ExtractOptions, ExtractResult, ExtractorFactory, TextExtractor,
};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "filetext")]
#[command(about = "Extract plain text and metadata from documents")]
#[command(version)]
struct Cli {
    /// File to extract, or a directory with --recursive
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Skip detection and use this extractor (csv, markdown, image, plaintext, docx, pptx, xlsx, pdf)
    #[arg(long)]
    format: Option<String>,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// Keep original line endings and Markdown syntax
    #[arg(long)]
    preserve_formatting: bool,

    /// Maximum content size in bytes, 0 for unlimited (overrides config)
    #[arg(long)]
    max_file_size: Option<u64>,

    /// Per-file timeout in seconds, 0 to disable (overrides config)
    #[arg(long)]
    timeout: Option<u64>,

    /// Settings file (defaults to config/settings.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Walk a directory and extract every file
    #[arg(short, long)]
    recursive: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Resolves the extractor for each file
struct Selector {
    factory: ExtractorFactory,
    forced: Option<Arc<dyn TextExtractor>>,
}

impl Selector {
    fn new(format: Option<&str>, config: &Config) -> Result<Self> {
        let forced = match format {
            Some(name) if name.eq_ignore_ascii_case("image") => {
                Some(Arc::new(config.image_extractor()) as Arc<dyn TextExtractor>)
            }
            Some(name) => Some(
                ExtractorFactory::for_format(name)
                    .with_context(|| format!("Unknown format: {}", name))?,
            ),
            None => None,
        };
        Ok(Self {
            factory: ExtractorFactory::new(),
            forced,
        })
    }

    fn extract(&self, path: &Path, options: &ExtractOptions) -> Result<ExtractResult> {
        let extractor = match &self.forced {
            Some(extractor) => extractor.clone(),
            None => self.factory.create_extractor_from_path(path)?,
        };
        Ok(extractor.extract_from_file(path, options)?)
    }
}

fn options_from(cli: &Cli, config: &Config) -> ExtractOptions {
    let mut options = config.extract_options();
    if cli.preserve_formatting {
        options.preserve_formatting = true;
    }
    if let Some(max) = cli.max_file_size {
        options.max_file_size = max;
    }
    if let Some(secs) = cli.timeout {
        options.timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }
    options
}

fn print_result(result: &ExtractResult, json: bool) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, result).context("Failed to serialize result")?;
        writeln!(stdout)?;
    } else {
        write!(stdout, "{}", result.text)?;
    }
    stdout.flush()?;
    Ok(())
}

fn run_single(cli: &Cli, selector: &Selector, options: &ExtractOptions) -> Result<()> {
    let result = selector
        .extract(&cli.path, options)
        .with_context(|| format!("Failed to extract {}", cli.path.display()))?;
    log::debug!(
        "extracted {} chars as {} in {:?}",
        result.text.chars().count(),
        result.file_type,
        result.processing_time
    );
    print_result(&result, cli.json)
}

fn run_recursive(cli: &Cli, selector: &Selector, options: &ExtractOptions) -> Result<()> {
    let files: Vec<PathBuf> = WalkDir::new(&cli.path)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                log::warn!("error accessing entry: {}", e);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} files ({msg})")
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );

    let outcomes: Vec<(PathBuf, Result<ExtractResult>)> = files
        .into_par_iter()
        .map(|path| {
            let outcome = selector.extract(&path, options);
            if let Some(name) = path.file_name() {
                pb.set_message(name.to_string_lossy().to_string());
            }
            pb.inc(1);
            (path, outcome)
        })
        .collect();
    pb.finish_and_clear();

    let mut failures = 0;
    for (path, outcome) in &outcomes {
        match outcome {
            Ok(result) => {
                println!("== {} ==", path.display());
                print_result(result, cli.json)?;
                println!();
            }
            Err(e) => {
                failures += 1;
                eprintln!("Failed to extract {}: {:#}", path.display(), e);
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} files failed", failures, outcomes.len());
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    let options = options_from(&cli, &config);
    let selector = Selector::new(cli.format.as_deref(), &config)?;

    if cli.recursive {
        run_recursive(&cli, &selector, &options)
    } else {
        run_single(&cli, &selector, &options)
    }
}
