use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

use firmap::config::{
    FileConfig, default_output_path, defaults, image_size_in_range, polygon_name,
};
use firmap::export::export_json;
use firmap::geometry::Aspect;
use firmap::parser::{MapScan, format_coordinate, scan_map_file};
use firmap::render::{PlotStyle, render_polygon};

/// Render the boundary polygon of a MAP file to a PNG image
///
/// Examples:
///   # Plot a FIR boundary with default settings
///   firmap figuras/CBAS.map
///
///   # Smaller image, shape-preserving aspect, custom title
///   firmap CBAS.map --width 1800 --height 1500 --aspect local --title "CBAS FIR"
///
///   # Also dump the parsed vertices as JSON
///   firmap CBAS.map -o cbas.png --json cbas.json
///
///   # Use a config file
///   firmap --config my-settings.toml
#[derive(Parser, Debug)]
#[command(name = "firmap")]
#[command(version, about, long_about = None)]
struct Args {
    /// MAP file to read (optional if set in the config file)
    input: Option<PathBuf>,

    /// Path to config file (optional, auto-searches firmap.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output PNG path (defaults to {stem}_polygon_visualization.png)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Figure title (defaults to "{STEM} FIR Boundary Polygon ({n} points)")
    #[arg(long)]
    title: Option<String>,

    /// Image width in pixels
    #[arg(long, default_value_t = defaults::WIDTH, value_parser = clap::value_parser!(u32).range(defaults::MIN_SIZE as i64..=defaults::MAX_SIZE as i64))]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = defaults::HEIGHT, value_parser = clap::value_parser!(u32).range(defaults::MIN_SIZE as i64..=defaults::MAX_SIZE as i64))]
    height: u32,

    /// Axis aspect: equal (1 deg lon = 1 deg lat) or local (cos-latitude corrected)
    #[arg(long, value_enum, default_value_t = Aspect::Equal)]
    aspect: Aspect,

    /// Approximate number of labelled vertices (0 disables labels)
    #[arg(long, default_value_t = defaults::LABELS)]
    labels: usize,

    /// Outline simplification level: 0=off (default), 1=light, 2=medium, 3=aggressive
    #[arg(long, default_value_t = defaults::SIMPLIFY, value_parser = clap::value_parser!(u8).range(0..=3))]
    simplify: u8,

    /// Path to TTF font file for labels (falls back to DejaVuSans, then a built-in stroke font)
    #[arg(long)]
    font: Option<PathBuf>,

    /// Also write the parsed vertices to this JSON file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Do not draw the north arrow
    #[arg(long)]
    no_north_arrow: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config = if let Some(ref config_path) = args.config {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .context(format!("Failed to read config file: {:?}", config_path))?;
            FileConfig::from_toml(&contents).context("Failed to parse config file")?
        } else {
            bail!("Config file not found: {:?}", config_path);
        }
    } else {
        FileConfig::load().unwrap_or_default()
    };

    let input = args.input.clone().or_else(|| file_config.input.clone());
    let output = args.output.clone().or_else(|| file_config.output.clone());
    let title = args.title.clone().or_else(|| file_config.title.clone());
    let font = args.font.clone().or_else(|| file_config.font.clone());
    let json = args.json.clone().or_else(|| file_config.json.clone());
    let width = if args.width != defaults::WIDTH {
        args.width
    } else {
        file_config.width
    };
    let height = if args.height != defaults::HEIGHT {
        args.height
    } else {
        file_config.height
    };
    let aspect = if args.aspect != Aspect::Equal {
        args.aspect
    } else {
        file_config.aspect
    };
    let labels = if args.labels != defaults::LABELS {
        args.labels
    } else {
        file_config.labels
    };
    let simplify = if args.simplify != defaults::SIMPLIFY {
        args.simplify
    } else {
        file_config.simplify.min(3)
    };
    let north_arrow = !args.no_north_arrow && file_config.north_arrow;
    let verbose = args.verbose || file_config.verbose;

    if !image_size_in_range(width, height) {
        bail!(
            "Image size must be between {} and {} px per side, got {}x{}",
            defaults::MIN_SIZE,
            defaults::MAX_SIZE,
            width,
            height
        );
    }

    let Some(input) = input else {
        bail!("No MAP file given: pass it as an argument or set `input` in the config file");
    };

    println!("firmap - FIR Boundary Polygon Renderer");
    println!("======================================");
    println!();

    let output_path = output.unwrap_or_else(|| default_output_path(&input));

    if verbose {
        println!("Configuration:");
        println!("  Input: {}", input.display());
        println!("  Output: {}", output_path.display());
        println!("  Size: {}x{} px", width, height);
        println!("  Aspect: {:?}", aspect);
        println!("  Labels: {}", labels);
        println!("  Simplify level: {}", simplify);
        println!(
            "  North arrow: {}",
            if north_arrow { "enabled" } else { "disabled" }
        );
        if let Some(ref f) = font {
            println!("  Font: {}", f.display());
        }
        if let Some(ref j) = json {
            println!("  JSON export: {}", j.display());
        }
        println!();
    }

    let spinner = create_spinner(&format!("Reading coordinates from {}...", input.display()));
    let start = Instant::now();
    let scan = match scan_map_file(&input) {
        Ok(scan) => scan,
        Err(e) => {
            spinner.abandon_with_message(format!("Could not read {}", input.display()));
            return Err(e.into());
        }
    };
    spinner.finish_with_message(format!(
        "Scanned {} lines, found {} valid coordinates [{:.1}s]",
        scan.stats.lines,
        scan.coordinates.len(),
        start.elapsed().as_secs_f32()
    ));

    report_scan(&scan, verbose);

    let polygon = scan.into_polygon(polygon_name(&input), &input)?;

    let out_of_range = polygon.out_of_range_count();
    if out_of_range > 0 {
        eprintln!(
            "Warning: {} coordinates fall outside [-180, 180] x [-90, 90]",
            out_of_range
        );
    }

    if let Some(ref json_path) = json {
        export_json(&polygon, json_path)?;
        println!("Coordinates exported to '{}'", json_path.display());
    }

    let style = PlotStyle {
        width,
        height,
        aspect,
        labels,
        simplify,
        title,
        font,
        north_arrow,
    };

    let spinner = create_spinner("Rendering polygon...");
    let start = Instant::now();
    let summary = render_polygon(&polygon, &style, &output_path)
        .with_context(|| format!("Failed to render {}", output_path.display()))?;
    spinner.finish_with_message(format!(
        "Rendered {} vertices, {} labels on {}x{} px [{:.1}s]",
        summary.outline_vertices,
        summary.labels,
        summary.width,
        summary.height,
        start.elapsed().as_secs_f32()
    ));

    if verbose {
        println!(
            "  Text: {}",
            if summary.ttf_text {
                "TrueType"
            } else {
                "built-in stroke font"
            }
        );
        println!(
            "  Grid: {} meridians, {} parallels",
            summary.grid_lines.0, summary.grid_lines.1
        );
    }

    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );
    println!("Visualization saved as '{}'", output_path.display());

    Ok(())
}

fn report_scan(scan: &MapScan, verbose: bool) {
    let stats = &scan.stats;

    if stats.malformed > 0 {
        eprintln!(
            "Warning: skipped {} coordinate-like lines that could not be parsed",
            stats.malformed
        );
    }
    if stats.merged_blocks() {
        eprintln!(
            "Warning: {} Polygon blocks found; their vertices are merged into one outline",
            stats.polygon_headers
        );
    }
    if let Some(line) = stats.unterminated_comment {
        eprintln!(
            "Warning: block comment opened on line {} is never closed; every line after it was skipped",
            line
        );
    }
    if stats.polygon_headers == 0 {
        eprintln!("Warning: no Polygon block found");
    }

    if verbose {
        println!("  Lines: {}", stats.lines);
        println!("    blank:       {}", stats.blank);
        println!("    comments:    {}", stats.comments);
        println!("    polygons:    {}", stats.polygon_headers);
        println!("    coordinates: {}", stats.coordinates);
        println!("    properties:  {}", stats.properties);
        println!("    malformed:   {}", stats.malformed);
        println!("    other:       {}", stats.ignored);
        if let (Some(first), Some(last)) = (scan.coordinates.first(), scan.coordinates.last()) {
            println!("  First vertex: {}", format_coordinate(*first));
            println!("  Last vertex:  {}", format_coordinate(*last));
        }
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
