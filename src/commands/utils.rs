use crate::output::read_report;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::Result;
use std::path::PathBuf;

/// Validate a report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)?;

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Generated: {}", report.generated_at);
    println!("  Application: {}", report.app_name);
    println!("  Total Bytes: {}", report.distribution.total_bytes);
    println!(
        "  Frames: {} ({} visible)",
        report.distribution.frame_count, report.distribution.visible_frame_count
    );
    println!("  Dependencies: {}", report.dependencies().len());
    println!("  Hidden: {}", report.hidden_keys.join(", "));

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Heap Flame Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string          - Schema version (e.g., '1.0.0')");
        println!("  generatedAt: string      - ISO 8601 timestamp");
        println!("  hiddenKeys: array        - Exclusion keys applied to the statistics");
        println!("  distribution: object     - Allocation distribution statistics");
        println!("  hotFrames: array         - Top allocating frames");
        println!("    rank: number           - Position in the ranking");
        println!("    typeKey: string        - category:type of the frame");
        println!("    selfValue: number      - Bytes allocated by the frame itself");
        println!("    heatColor: string      - rgb() heat color");
        println!("  appName: string          - Application display name");
        println!("  pathSeparator: string    - Separator of file paths");
        println!("  codeAreas: array         - Filter menu (app, deps, wasm, core, all-v8)");
        println!("  data: object             - Nested categorized frame tree");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Heap Flame v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Categorized flamegraph analysis for heap-sampling allocation profiles.");
}
