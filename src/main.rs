use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use webp_converter::app::{App, ConversionReport};
use webp_converter::models::{CompressionType, Preset};
use webp_converter::utils::{extract_file_name, format_bytes};

#[derive(Debug, Parser)]
#[command(name = "webp-converter")]
#[command(about = "Convert images to WebP")]
struct CliArgs {
    /// Print reports as JSON instead of a table.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert a single image.
    Convert {
        input: String,
        /// Defaults to INPUT with a .webp extension.
        output: Option<String>,
        #[arg(short, long)]
        quality: Option<f64>,
        #[arg(short = 't', long = "type", value_parser = parse_type_arg)]
        compression: Option<CompressionType>,
        #[arg(short, long, value_parser = parse_preset_arg)]
        preset: Option<Preset>,
    },
    /// Convert an image at every quality from 100 down to 5.
    Samples {
        input: String,
        #[arg(short, long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
        #[arg(short = 't', long = "type", value_parser = parse_type_arg)]
        compression: Option<CompressionType>,
        #[arg(short, long, value_parser = parse_preset_arg)]
        preset: Option<Preset>,
    },
}

fn parse_type_arg(input: &str) -> std::result::Result<CompressionType, String> {
    input.parse()
}

fn parse_preset_arg(input: &str) -> std::result::Result<Preset, String> {
    input.parse()
}

fn print_reports(reports: &[ConversionReport], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(reports)?);
        return Ok(());
    }

    for report in reports {
        println!(
            "{:<32} q{:<5} {:>10} -> {:>10} ({:.1}%)",
            extract_file_name(&report.output_path).unwrap_or(&report.output_path),
            report.quality,
            format_bytes(report.input_bytes),
            format_bytes(report.output_bytes),
            report.ratio()
        );
    }
    Ok(())
}

async fn run(app: &App, args: CliArgs) -> Result<()> {
    match args.command {
        Command::Convert {
            input,
            output,
            quality,
            compression,
            preset,
        } => {
            let config = app.webp_config(quality, compression, preset);
            let report = app.convert(&input, output.as_deref(), &config).await?;
            print_reports(std::slice::from_ref(&report), args.json)?;
        }
        Command::Samples {
            input,
            out_dir,
            compression,
            preset,
        } => {
            let reports = app
                .samples(
                    &input,
                    out_dir.as_deref(),
                    compression.unwrap_or(app.config().default_type),
                    preset.unwrap_or(app.config().default_preset),
                )
                .await?;
            print_reports(&reports, args.json)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "webp_converter=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    match App::new() {
        Ok(app) => match run(&app, args).await {
            Ok(()) => {
                info!("Done");
                Ok(())
            }
            Err(e) => {
                error!("Conversion failed: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    }
}
