use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use sprite_bleed::{run_batch, BatchReport, BatchSettings, BleedSettings};

#[derive(Parser)]
#[command(name = "sprite-bleed")]
#[command(about = "Rewrite transparent sprite pixels to their nearest opaque color to prevent grey edge halos")]
struct Args {
    /// Directory containing PNG sprites
    directory: PathBuf,

    /// Show what would be changed without modifying files
    #[arg(long)]
    preview: bool,

    /// Search subdirectories for PNG files
    #[arg(long)]
    recursive: bool,

    /// Maximum search radius for an opaque neighbor, in pixels
    #[arg(long, default_value_t = 10)]
    radius: u32,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(report) => {
            if report.files_failed > 0 {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}

fn run(args: &Args) -> anyhow::Result<BatchReport> {
    if !args.directory.is_dir() {
        bail!("directory not found: {}", args.directory.display());
    }

    let settings = BatchSettings {
        bleed: BleedSettings {
            max_radius: args.radius,
        },
        preview: args.preview,
        recursive: args.recursive,
    };

    let report = run_batch(&args.directory, &settings)
        .with_context(|| format!("failed to scan {}", args.directory.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(args, &report);
    }
    Ok(report)
}

fn print_report(args: &Args, report: &BatchReport) {
    println!("{}", "=".repeat(50));
    println!("Transparent pixel fixer for sprites");
    println!("{}", "=".repeat(50));
    println!("Directory: {}", args.directory.display());
    println!("Mode: {}", if report.preview { "Preview" } else { "Fix" });
    println!("Recursive: {}", if args.recursive { "Yes" } else { "No" });
    println!();

    for file in &report.files {
        let rel = file.path.strip_prefix(&args.directory).unwrap_or(&file.path);
        if let Some(outcome) = &file.outcome {
            if outcome.pixels > 0 {
                println!("  {}: {} pixels {}", rel.display(), outcome.pixels, outcome.status);
            } else {
                println!("  {}: {}", rel.display(), outcome.status);
            }
        } else if let Some(error) = &file.error {
            println!("  {}: error: {}", rel.display(), error);
        }
    }

    println!();
    println!("{}", "-".repeat(50));
    println!("Files processed: {}", report.files_processed);
    if report.files_failed > 0 {
        println!("Files failed: {}", report.files_failed);
    }
    println!(
        "Total pixels {}: {}",
        if report.preview { "to fix" } else { "fixed" },
        report.total_pixels
    );

    if report.preview && report.total_pixels > 0 {
        println!();
        println!("Run without --preview to apply fixes.");
    }
}
