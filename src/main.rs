use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use prettytable::{format, Cell, Row, Table};
use std::time::Instant;

use webpng::cli::Args;
use webpng::conversion::batch::{BatchOutcome, BatchReport, LogOutcome};
use webpng::conversion::naming;
use webpng::utils::{
    create_progress_bar, create_spinner, format_duration, format_size, validate_directory,
};
use webpng::{ConversionDirection, ConversionEngine, JsonMessage, SessionState, PNG_MIME, WEBP_MIME};

fn main() -> Result<()> {
    let start_time = Instant::now();
    let mut args = Args::parse();
    args.load_and_merge_config()?;
    let json_mode = args.json;

    // Print banner
    if !json_mode {
        println!(
            "{}",
            style("webpng - PNG / WebP directory converter").bold().blue()
        );
        println!("{}", style("Converts images in place, entirely offline").dim());
        println!();
    }

    let directory = args
        .directory
        .clone()
        .context("No directory given. Pass one as the first argument or via --config-file")?;
    validate_directory(&directory)?;

    if args.verbose && !json_mode {
        println!("{}", style("Configuration:").bold());
        println!("  Directory: {}", directory.display());
        match args.direction {
            Some(direction) => {
                println!("  Direction: {}", ConversionDirection::from(direction).label())
            }
            None => println!("  Direction: none (list only)"),
        }
        println!("  Assume access granted: {}", args.yes);
        println!();
    }

    let mut engine = ConversionEngine::with_probed_strategies(directory.clone(), args.yes);

    // Initial scan
    let spinner = (!json_mode).then(|| create_spinner("Scanning directory..."));
    let scan_result = engine.rescan();
    if let Some(spinner) = &spinner {
        match &scan_result {
            Ok(()) => spinner.finish_with_message(format!(
                "Found {} image(s)",
                engine.state().inventory.len()
            )),
            Err(_) => spinner.finish_and_clear(),
        }
    }
    scan_result.with_context(|| format!("Failed to scan {}", directory.display()))?;

    let png_count = engine.state().count_of(PNG_MIME);
    let webp_count = engine.state().count_of(WEBP_MIME);
    if json_mode {
        JsonMessage::Scan {
            total: engine.state().inventory.len(),
            png_count,
            webp_count,
        }
        .emit();
    } else {
        print_inventory(engine.state(), png_count, webp_count);
    }

    // Without a direction this was a list-only run
    let Some(direction) = args.direction else {
        return Ok(());
    };
    let direction = ConversionDirection::from(direction);

    let candidates = engine
        .state()
        .inventory
        .iter()
        .filter(|entry| naming::has_suffix(&entry.name, direction.source_suffix()))
        .count();

    let progress = (!json_mode && candidates > 0).then(|| {
        let pb = create_progress_bar(candidates as u64);
        pb.set_message(format!("Converting {}", direction.label()));
        pb
    });

    let report = engine
        .convert(direction, |_done, _total, entry| {
            if let Some(pb) = &progress {
                pb.set_message(entry.source_name.clone());
                pb.inc(1);
            }
            if json_mode {
                JsonMessage::from_log_entry(entry).emit();
            }
        })
        .with_context(|| format!("Conversion batch failed in {}", directory.display()))?;

    if let Some(pb) = &progress {
        pb.finish_with_message("Batch complete");
    }

    match report.outcome {
        BatchOutcome::NoTargets => {
            if json_mode {
                emit_summary(&report);
            } else {
                println!();
                println!(
                    "{}",
                    style(format!(
                        "No {} files to convert in {}",
                        direction.source_suffix(),
                        directory.display()
                    ))
                    .yellow()
                );
            }
            Ok(())
        }
        BatchOutcome::Denied => {
            if json_mode {
                emit_summary(&report);
            }
            Err(anyhow::anyhow!(
                "Write access to {} was denied; no files were touched",
                directory.display()
            ))
        }
        BatchOutcome::Completed => {
            if json_mode {
                emit_summary(&report);
            } else {
                print_report(engine.state(), &report, start_time.elapsed());
            }
            Ok(())
        }
    }
}

fn emit_summary(report: &BatchReport) {
    JsonMessage::Summary {
        attempted: report.attempted,
        converted: report.converted,
        failed: report.failed,
        duration_secs: report.elapsed.as_secs_f64(),
    }
    .emit();
}

fn print_inventory(state: &SessionState, png_count: usize, webp_count: usize) {
    if state.inventory.is_empty() {
        println!("{}", style("No PNG or WebP images found").yellow());
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.add_row(Row::new(vec![
        Cell::new("Name"),
        Cell::new("Type"),
        Cell::new("Size"),
    ]));
    for entry in &state.inventory {
        table.add_row(Row::new(vec![
            Cell::new(&entry.name),
            Cell::new(entry.mime_type),
            Cell::new(&format_size(entry.size)),
        ]));
    }
    table.printstd();

    println!(
        "  {} PNG, {} WebP",
        style(png_count).bold().cyan(),
        style(webp_count).bold().magenta()
    );
}

fn print_report(state: &SessionState, report: &BatchReport, total_time: std::time::Duration) {
    println!();
    println!("{}", style("Conversion log (newest first):").bold().blue());
    for (i, entry) in state.log.entries().take(report.attempted).enumerate() {
        match entry.outcome {
            LogOutcome::Success => println!(
                "  {}: {} -> {} ({})",
                style(format!("#{}", i + 1)).dim(),
                style(&entry.source_name).bold(),
                style(entry.derived_name.as_deref().unwrap_or("?")).bold().green(),
                entry.detail
            ),
            LogOutcome::Failure => println!(
                "  {}: {} - {}",
                style(format!("#{}", i + 1)).dim(),
                style(&entry.source_name).bold().red(),
                entry.detail
            ),
        }
    }

    println!();
    println!("{}", style("Results Summary:").bold().green());
    println!(
        "  Successfully converted: {}",
        style(report.converted).bold().green()
    );
    if report.failed > 0 {
        println!("  Failed: {}", style(report.failed).bold().red());
        println!("  Check the log above; failed files were skipped, not retried");
    }
    println!(
        "  Directory now holds: {} PNG, {} WebP",
        style(state.count_of(PNG_MIME)).bold().cyan(),
        style(state.count_of(WEBP_MIME)).bold().magenta()
    );
    println!(
        "  Total processing time: {}",
        style(format_duration(total_time)).bold()
    );
}
