use std::path::PathBuf;
use std::process::ExitCode;

use pdf_darkmode::config;
use pdf_darkmode::error::{PdfDarkError, Result};
use pdf_darkmode::pipeline::orchestrator::{ConversionConfig, run_conversion};
use pdf_darkmode::progress::ProgressCallback;

/// Prints per-page progress lines to stderr as the pipeline advances.
struct StderrProgress;

impl ProgressCallback for StderrProgress {
    fn on_conversion_start(&self, total_pages: usize) {
        eprintln!("Converting {total_pages} page(s)...");
    }

    fn on_page_rasterized(&self, page_num: usize, total_pages: usize) {
        eprintln!("Rasterized page {page_num}/{total_pages}");
    }

    fn on_page_inverted(&self, page_num: usize, total_pages: usize) {
        eprintln!("Inverted page {page_num}/{total_pages}");
    }
}

struct CliArgs {
    input_path: PathBuf,
    output_path: Option<PathBuf>,
    dpi: Option<u32>,
}

fn print_usage() {
    eprintln!("Usage: pdf_darkmode <input.pdf> [--output|-o <output.pdf>] [--dpi <n>]");
    eprintln!("  Convert a PDF to a dark mode variant by inverting page colors.");
    eprintln!("  Default output: <input_stem>_darkmode.<ext> next to the input.");
}

/// Parse the CLI surface: positional input, --output/-o, --dpi.
fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut input_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut dpi: Option<u32> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--output" | "-o" => {
                let value = iter.next().ok_or_else(|| {
                    PdfDarkError::config("--output requires a path")
                })?;
                output_path = Some(PathBuf::from(value));
            }
            "--dpi" => {
                let value = iter.next().ok_or_else(|| {
                    PdfDarkError::config("--dpi requires a value")
                })?;
                let parsed: u32 = value.parse().map_err(|_| {
                    PdfDarkError::config(format!(
                        "Invalid dpi value: '{value}'"
                    ))
                })?;
                if parsed == 0 {
                    return Err(PdfDarkError::config(
                        "dpi must be greater than 0",
                    ));
                }
                dpi = Some(parsed);
            }
            flag if flag.starts_with('-') => {
                return Err(PdfDarkError::config(format!(
                    "Unknown option: '{flag}'"
                )));
            }
            positional => {
                if input_path.is_some() {
                    return Err(PdfDarkError::config(format!(
                        "Unexpected extra argument: '{positional}'"
                    )));
                }
                input_path = Some(PathBuf::from(positional));
            }
        }
    }

    let input_path = input_path
        .ok_or_else(|| PdfDarkError::config("Missing input PDF path"))?;

    Ok(CliArgs {
        input_path,
        output_path,
        dpi,
    })
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return if args.is_empty() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        eprintln!("pdf_darkmode {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = match parse_args(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: {e}");
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    // Load settings from the same directory as the input PDF; --dpi wins.
    let settings = match config::load_settings_for_input(&cli.input_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!(
                "ERROR: Failed to load settings for {}: {e}",
                cli.input_path.display()
            );
            return ExitCode::FAILURE;
        }
    };
    let dpi = cli.dpi.unwrap_or(settings.dpi);

    let output_path = cli
        .output_path
        .unwrap_or_else(|| config::derive_output_path(&cli.input_path));

    let conversion = ConversionConfig {
        input_path: cli.input_path,
        output_path,
        dpi,
    };

    match run_conversion(&conversion, &StderrProgress) {
        Ok(result) => {
            eprintln!(
                "OK: {} -> {} ({} pages)",
                result.input_path.display(),
                result.output_path.display(),
                result.pages_converted
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!(
                "ERROR: {} -> {}: {e}",
                conversion.input_path.display(),
                conversion.output_path.display()
            );
            ExitCode::FAILURE
        }
    }
}
