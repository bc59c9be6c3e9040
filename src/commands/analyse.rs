//! Analyse command implementation.
//!
//! The analyse command:
//! 1. Reads and categorizes the heap profile
//! 2. Builds the data tree and applies visibility filters
//! 3. Ranks allocations and computes heat colors
//! 4. Generates a flamegraph of the visible frames
//! 5. Writes output files

use super::models::AnalyseArgs;
use crate::aggregator::{
    build_collapsed_stacks, calculate_allocation_distribution, calculate_hot_frames,
};
use crate::analysis::analyse;
use crate::flamegraph::{generate_flamegraph, generate_text_summary};
use crate::model::DataTree;
use crate::output::{write_report, write_svg, AnalysisReport};
use crate::utils::config::{load_filter_preset, FilterPreset};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Instant;

/// Execute the analyse command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Unreadable or malformed profile
/// * Invalid filter preset
/// * File write errors
pub fn execute_analyse(args: AnalyseArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Starting analysis of: {}", args.input.display());

    // Step 1: Categorize the profile
    info!("Step 1/5: Categorizing frames...");
    let envelope = analyse(&args.input)
        .with_context(|| format!("Failed to analyse {}", args.input.display()))?;

    // Step 2: Build the data tree and apply filters
    info!("Step 2/5: Applying visibility filters...");
    let mut model = DataTree::new(envelope);
    let preset = match &args.filter_config {
        Some(path) => load_filter_preset(path)
            .with_context(|| format!("Failed to load filter preset {}", path.display()))?,
        None => FilterPreset::default(),
    }
    .with_overrides(&args.show, &args.hide);

    let changed = model.apply_preset(&preset);
    debug!(
        "{} visibility changes applied, hidden: {:?}",
        changed,
        model.exclusions().keys()
    );

    // Step 3: Rank allocations
    info!("Step 3/5: Ranking allocations...");
    model.update();
    let distribution = calculate_allocation_distribution(&model)?;
    info!("Allocation distribution: {}", distribution.summary());

    let hot_frames = calculate_hot_frames(&model, args.top_frames)?;
    for frame in hot_frames.iter().take(3) {
        debug!(
            "  {}. {} B ({:.1}%): {}",
            frame.rank, frame.self_value, frame.percentage, frame.name
        );
    }

    // Step 4: Generate flamegraph (if requested)
    let svg_content = if args.output_svg.is_some() {
        info!("Step 4/5: Generating flamegraph...");
        let stacks = build_collapsed_stacks(&model);
        if stacks.is_empty() {
            warn!("No visible allocations; skipping flamegraph");
            None
        } else {
            Some(
                generate_flamegraph(&stacks, args.flamegraph_config.as_ref())
                    .context("Failed to generate flamegraph")?,
            )
        }
    } else {
        info!("Step 4/5: Skipping flamegraph generation (not requested)");
        None
    };

    // Step 5: Write output files
    info!("Step 5/5: Writing output files...");
    let report = AnalysisReport::new(
        &model,
        chrono::Utc::now().to_rfc3339(),
        distribution,
        hot_frames,
    );
    write_report(&report, &args.output_json).context("Failed to write JSON report")?;

    if let (Some(svg), Some(svg_path)) = (svg_content, &args.output_svg) {
        write_svg(&svg, svg_path).context("Failed to write SVG flamegraph")?;
    }

    if args.print_summary {
        println!("\n{}\n", generate_text_summary(&report.hot_frames, args.top_frames));
    }

    info!(
        "Analysis complete in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Validate analyse arguments before execution
///
/// **Public** - can be called before execute_analyse for early validation
pub fn validate_args(args: &AnalyseArgs) -> Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input profile does not exist: {}", args.input.display());
    }

    if args.top_frames == 0 {
        anyhow::bail!("top_frames must be greater than 0");
    }

    if let Some(config) = &args.flamegraph_config {
        if config.width < 100 {
            anyhow::bail!("Flamegraph width must be at least 100 pixels");
        }
    }

    Ok(())
}
