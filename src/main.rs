use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use chatcontacts::core::model::BatchResult;
use chatcontacts::export::ExportFormat;
use chatcontacts::ocr::{BridgeEngine, OcrBridge, OcrEngine, SidecarEngine};
use chatcontacts::pipeline::{self, PipelineConfig};
use chatcontacts::{ExtractionConfig, RecordAssembler};

#[derive(Parser, Debug)]
#[command(name = "chatcontacts")]
#[command(version, about = "Extract phone numbers, names and messages from chat screenshots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract contacts from a single screenshot
    Extract {
        /// Input image path
        input: PathBuf,

        /// Also write results to this directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        ocr: OcrArgs,

        /// Only print the phone numbers
        #[arg(short, long)]
        quiet: bool,
    },

    /// Extract contacts from many screenshots
    Batch {
        /// Image files and/or directories of images
        inputs: Vec<PathBuf>,

        /// Output directory for all results
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format(s) to generate
        #[arg(short, long, value_enum, default_values_t = vec![Format::Json, Format::Text, Format::Html])]
        format: Vec<Format>,

        #[command(flatten)]
        ocr: OcrArgs,
    },

    /// Show every OCR detection with its confidence and resolved role
    Inspect {
        /// Input image path
        input: PathBuf,

        #[command(flatten)]
        ocr: OcrArgs,
    },

    /// Print the default extraction config as TOML
    Config,
}

#[derive(Args, Debug)]
struct OcrArgs {
    /// Extraction config (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read precomputed detections (<stem>.json) from this directory instead of running OCR
    #[arg(long)]
    detections: Option<PathBuf>,

    /// OCR bridge script
    #[arg(long)]
    ocr_script: Option<PathBuf>,

    /// Comma-separated OCR languages
    #[arg(long, default_value = "en,ar")]
    lang: String,
}

impl OcrArgs {
    fn engine(&self) -> Box<dyn OcrEngine> {
        match &self.detections {
            Some(dir) => Box::new(SidecarEngine::new(dir.clone())),
            None => {
                let mut bridge = OcrBridge::new().with_lang(self.lang.clone());
                if let Some(script) = &self.ocr_script {
                    bridge = bridge.with_script(script.clone());
                }
                Box::new(BridgeEngine::new(bridge))
            }
        }
    }

    fn extraction(&self) -> Result<ExtractionConfig> {
        ExtractionConfig::load_or_default(self.config.as_deref())
    }
}

#[derive(ValueEnum, Clone, Debug, PartialEq)]
enum Format {
    Json,
    Text,
    Html,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => ExportFormat::Json,
            Format::Text => ExportFormat::Text,
            Format::Html => ExportFormat::Html,
        }
    }
}

fn init_logging(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let quiet = matches!(cli.command, Commands::Extract { quiet: true, .. } | Commands::Config);
    init_logging(quiet);

    match cli.command {
        Commands::Extract {
            input,
            output,
            ocr,
            quiet,
        } => extract_single(input, output, ocr, quiet),
        Commands::Batch {
            inputs,
            output,
            format,
            ocr,
        } => extract_batch(inputs, output, format, ocr),
        Commands::Inspect { input, ocr } => inspect(input, ocr),
        Commands::Config => {
            print!("{}", ExtractionConfig::default().to_toml_string()?);
            Ok(())
        }
    }
}

fn check_input(input: &Path) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }
    if !input.is_file() {
        anyhow::bail!("Input is not a file: {}", input.display());
    }
    Ok(())
}

fn extract_single(
    input: PathBuf,
    output: Option<PathBuf>,
    ocr: OcrArgs,
    quiet: bool,
) -> Result<()> {
    check_input(&input)?;
    let assembler = RecordAssembler::new(&ocr.extraction()?)?;
    let engine = ocr.engine();

    let record = pipeline::extract_image(&input, engine.as_ref(), &assembler)?;

    if quiet {
        for number in &record.phone_numbers {
            println!("{number}");
        }
    } else {
        println!("[*] Image: {}", record.image);
        println!("[*] Blocks: {}", record.block_count);
        println!("[*] Name: {}", record.name().unwrap_or("-"));
        println!("[*] Timestamp: {}", record.timestamp.as_deref().unwrap_or("-"));
        println!("\nFound {} unique phone numbers:", record.phone_numbers.len());
        for number in &record.phone_numbers {
            println!("  {number}");
        }
        if !record.messages.is_empty() {
            println!("\nMessages:");
            for message in &record.messages {
                println!("  {message}");
            }
        }
    }

    if let Some(output) = output {
        let batch = BatchResult {
            records: vec![record],
            failures: vec![],
        };
        pipeline::export_batch(
            &batch,
            &output,
            &[ExportFormat::Json, ExportFormat::Text, ExportFormat::Html],
        )
        .with_context(|| format!("Failed to export to: {}", output.display()))?;
        if !quiet {
            println!("\n[✓] Results saved to: {}", output.display());
        }
    }

    Ok(())
}

fn extract_batch(
    inputs: Vec<PathBuf>,
    output: Option<PathBuf>,
    formats: Vec<Format>,
    ocr: OcrArgs,
) -> Result<()> {
    if inputs.is_empty() {
        anyhow::bail!("No input files specified");
    }

    let output = output.unwrap_or_else(|| PathBuf::from("contacts_output"));
    let config = PipelineConfig::new(inputs, output.clone())
        .with_extraction(ocr.extraction()?)
        .with_formats(formats.into_iter().map(ExportFormat::from).collect());
    let engine = ocr.engine();

    let batch = pipeline::run(&config, engine.as_ref())?;

    println!(
        "\n[*] Summary: {} succeeded, {} failed, {} unique numbers",
        batch.records.len(),
        batch.failures.len(),
        batch.unique_numbers().len()
    );
    println!("[*] Output: {}", output.display());

    if !batch.failures.is_empty() {
        for failure in &batch.failures {
            eprintln!("  [✗] {}: {}", failure.image, failure.error);
        }
        anyhow::bail!("{} image(s) failed to process", batch.failures.len());
    }

    Ok(())
}

fn inspect(input: PathBuf, ocr: OcrArgs) -> Result<()> {
    check_input(&input)?;
    let assembler = RecordAssembler::new(&ocr.extraction()?)?;
    let engine = ocr.engine();

    let detections = engine
        .detect(&input)
        .with_context(|| format!("OCR failed for {}", input.display()))?;

    println!("OCR Results:");
    println!("{}", "-".repeat(70));
    for (idx, tagged) in assembler.tag(&detections).iter().enumerate() {
        println!(
            "{:>3}. {:<32} | conf {:.3} | y {:>7.1} | {}",
            idx + 1,
            tagged.detection.text,
            tagged.detection.confidence,
            tagged.detection.position,
            tagged.role.label()
        );
    }
    println!("{}", "-".repeat(70));

    let record = assembler.assemble(&pipeline::image_id(&input), &detections);
    let numbers: Vec<&str> = record.phone_numbers.iter().map(|n| n.as_str()).collect();
    println!("Extracted phone numbers: {numbers:?}");

    Ok(())
}
