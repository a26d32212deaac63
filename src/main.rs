//! W-2 analyzer command line tool
//!
//! Usage: w2-analyzer <FILE> [--test-mode] [--output results.json] [--api-key KEY]
//!
//! Extracts text from a W-2 (PDF, image or text file), structures it with
//! Gemini, normalizes and masks the fields, and prints the result as JSON.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use w2_analyzer::{
    config::Config,
    pipeline::{sample_result, W2Processor},
    utils::ocr::check_exists_non_empty,
    ProcessingResult,
};

#[derive(Parser, Debug)]
#[command(name = "w2-analyzer")]
#[command(version)]
#[command(about = "Process W-2 forms and extract structured data with AI insights")]
#[command(after_help = "Examples:
  w2-analyzer w2_form.pdf                    # Process with Gemini AI
  w2-analyzer w2_form.pdf --test-mode        # Test mode (no API calls)
  w2-analyzer w2_image.jpg -o result.json    # Process image file, save JSON")]
struct Args {
    /// Path to W-2 file (PDF, image, or text)
    file_path: PathBuf,

    /// Run in test mode (no API calls, uses sample data)
    #[arg(long)]
    test_mode: bool,

    /// Output file path for JSON results (default: print to console)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Gemini API key (default: uses GEMINI_API_KEY environment variable)
    #[arg(long)]
    api_key: Option<String>,
}

fn print_summary(result: &ProcessingResult) {
    eprintln!("\n📊 Summary:");
    eprintln!("  Confidence: {}", result.quality.confidence);
    eprintln!("  Fields extracted: {} sections", result.section_count());
    eprintln!("  Insights generated: {}", result.insights.len());
    if !result.quality.warnings.is_empty() {
        eprintln!("  Warnings: {}", result.quality.warnings.len());
    }
}

async fn run(args: Args) -> Result<()> {
    // Existence and size are checked in every mode, test mode included
    let file_size = check_exists_non_empty(&args.file_path)?;

    eprintln!("🔍 Processing W-2 file: {}", args.file_path.display());
    eprintln!("📁 File size: {} bytes", file_size);
    eprintln!("🧪 Test mode: {}", if args.test_mode { "Yes" } else { "No" });

    let result = if args.test_mode {
        sample_result()
    } else {
        let mut config = Config::from_env()?;
        if let Some(api_key) = args.api_key {
            config.gemini_api_key = Some(api_key);
        }
        let processor = W2Processor::from_config(&config)?;

        eprintln!("⏳ Processing...");
        processor.process_file(&args.file_path).await?
    };

    let json = serde_json::to_string_pretty(&result)?;
    match &args.output {
        Some(output) => {
            tokio::fs::write(output, &json).await?;
            info!("Results written to {}", output.display());
            eprintln!("✅ Results saved to: {}", output.display());
        }
        None => {
            eprintln!("\n{}", "=".repeat(60));
            eprintln!("W-2 PROCESSING RESULTS");
            eprintln!("{}", "=".repeat(60));
            println!("{}", json);
        }
    }

    print_summary(&result);
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout carries only the JSON result
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("w2_analyzer=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!("W-2 processing aborted: {:#}", e);
        eprintln!("❌ Error: {:#}", e);
        std::process::exit(1);
    }
}
