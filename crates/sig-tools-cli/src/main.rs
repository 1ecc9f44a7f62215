mod logger;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use logger::StderrLogger;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sigbook",
    about = "Rearrange document pages into signatures for booklet printing",
    version
)]
struct Cli {
    /// Pages per signature (positive, divisible by 4).
    /// Without it the whole document is folded as one signature
    #[arg(short, long, value_parser = parse_signature)]
    signature: Option<usize>,

    /// Don't print page progress
    #[arg(short, long)]
    quiet: bool,

    /// Print scanning details
    #[arg(long, conflicts_with = "quiet")]
    verbose: bool,

    /// Input document format
    #[arg(long, default_value = "auto", value_enum)]
    format: FormatArg,

    /// Load options from a JSON file (flags override it)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show statistics only, don't write the document
    #[arg(long)]
    stats_only: bool,

    /// Input document (default: stdin)
    infile: Option<PathBuf>,

    /// Output document (default: stdout)
    outfile: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Auto,
    Ps,
    Pdf,
}

impl From<FormatArg> for Option<sig_impose::DocumentFormat> {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Auto => None,
            FormatArg::Ps => Some(sig_impose::DocumentFormat::PostScript),
            FormatArg::Pdf => Some(sig_impose::DocumentFormat::Pdf),
        }
    }
}

fn parse_signature(value: &str) -> std::result::Result<usize, String> {
    let pages: i64 = value
        .trim()
        .parse()
        .map_err(|_| format!("`{}` is not a number", value))?;
    sig_impose::SignatureSize::new(pages)
        .map(|signature| signature.pages())
        .map_err(|e| e.to_string())
}

/// Merge flags over options loaded from `--config`
async fn build_options(cli: &Cli) -> Result<sig_impose::ImpositionOptions> {
    let mut options = match &cli.config {
        Some(path) => sig_impose::ImpositionOptions::load(path)
            .await
            .with_context(|| format!("can't load config {}", path.display()))?,
        None => Default::default(),
    };

    if cli.signature.is_some() {
        options.signature = cli.signature;
    }
    let format: Option<sig_impose::DocumentFormat> = cli.format.into();
    if format.is_some() {
        options.format = format;
    }
    options.quiet |= cli.quiet;

    options.validate()?;
    Ok(options)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let options = build_options(&cli).await?;

    StderrLogger::new(options.quiet, cli.verbose).init()?;

    let input = sig_impose::read_input(cli.infile.as_deref())
        .await
        .with_context(|| match &cli.infile {
            Some(path) => format!("can't open input file {}", path.display()),
            None => "can't read standard input".to_string(),
        })?;

    if cli.stats_only {
        let stats = sig_impose::scan_statistics(input, &options)?;
        println!("Imposition Statistics:");
        println!("  Source pages: {}", stats.source_pages);
        println!("  Signature size: {}", stats.signature_size);
        println!("  Signatures: {}", stats.signatures);
        println!("  Sheets per signature: {}", stats.sheets_per_signature);
        println!("  Output sheets: {}", stats.output_sheets);
        println!("  Output pages: {}", stats.output_pages);
        println!("  Blank pages added: {}", stats.blank_pages_added);
        return Ok(());
    }

    // Nothing is written unless imposition succeeds
    let imposed = sig_impose::impose(input, &options).await?;

    sig_impose::write_output(cli.outfile.as_deref(), &imposed.bytes)
        .await
        .with_context(|| match &cli.outfile {
            Some(path) => format!("can't open output file {}", path.display()),
            None => "can't write standard output".to_string(),
        })?;

    log::debug!(
        "{} {} pages → {} pages in {} signature(s)",
        imposed.format.name(),
        imposed.statistics.source_pages,
        imposed.statistics.output_pages,
        imposed.statistics.signatures
    );

    Ok(())
}
