//! Billboard Baker CLI
//!
//! Bake billboard impostors from JSON asset descriptions.

use billboard_baker::{
    select_geometry, write_bundle, AtlasLayout, Baker, BillboardAsset, Direction, MeshFormat,
    SoftwareRasterizer,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "billboard-baker")]
#[command(author, version, about = "Bake 3D objects into billboard impostors", long_about = None)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bake an asset and write its atlases, mesh and material descriptor
    Bake {
        /// Input JSON asset file
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Mesh format
        #[arg(short, long, value_enum, default_value = "glb")]
        format: OutputFormat,

        /// Base name of the written files (defaults to the input file stem)
        #[arg(short, long)]
        name: Option<String>,

        /// Override the asset's texture size
        #[arg(long)]
        texture_size: Option<u32>,
    },

    /// Print the atlas layout an asset would bake to
    Layout {
        /// Input JSON asset file
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Binary glTF format
    Glb,
    /// Wavefront OBJ format
    Obj,
}

impl From<OutputFormat> for MeshFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Glb => MeshFormat::Glb,
            OutputFormat::Obj => MeshFormat::Obj,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Bake {
            input,
            output,
            format,
            name,
            texture_size,
        } => {
            bake(&input, &output, format, name, texture_size)?;
        }
        Commands::Layout { input } => {
            show_layout(&input)?;
        }
    }

    Ok(())
}

fn bake(
    input_path: &Path,
    output_dir: &Path,
    format: OutputFormat,
    name: Option<String>,
    texture_size: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading asset from {:?}...", input_path);
    let mut asset = BillboardAsset::from_json_file(input_path)?;
    if let Some(size) = texture_size {
        asset.texture_size = size;
    }
    println!(
        "  {} texture slot(s), {} pass(es), texture size {}",
        asset.settings.textures.len(),
        asset.settings.pass_count(),
        asset.texture_size
    );

    let mut baker = Baker::new(SoftwareRasterizer::new());
    let report = baker.generate(&mut asset)?;

    println!(
        "  Atlas: {}x{} (views {} and {} wide, {} tall)",
        report.atlas_size.0,
        report.atlas_size.1,
        report.layout.front_width,
        report.layout.side_width,
        report.layout.view_height
    );
    for warning in &report.warnings {
        println!("  Warning: {}", warning);
    }

    let name = name.unwrap_or_else(|| file_stem(input_path));
    let written = write_bundle(&asset.output, output_dir, &name, format.into())?;
    println!("Exported {} file(s) to {:?}", written.len(), output_dir);
    for path in &written {
        println!("  {:?}", path);
    }

    Ok(())
}

fn show_layout(input_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let asset = BillboardAsset::from_json_file(input_path)?;
    let selected = select_geometry(&asset.source, asset.lod_selection())?;
    let layout = AtlasLayout::for_bounds(&selected.bounds, asset.view_height())?;
    let (width, height) = layout.atlas_size();

    println!("Source: {} (renderer '{}')", asset.source.name, selected.renderer);
    println!(
        "  Bounds size: {:?}, width comparison {:.4}",
        selected.bounds.size().to_array(),
        selected.bounds.width_comparison()
    );
    println!("  Atlas: {}x{}", width, height);
    for direction in Direction::ALL {
        let (w, h) = layout.view_size(direction);
        let (x, y) = layout.origin(direction);
        let region = layout.region(direction);
        println!(
            "  {:?}: {}x{} at ({}, {}), uv [{:.4}, {:.4}]..[{:.4}, {:.4}]",
            direction, w, h, x, y, region.u_min, region.v_min, region.u_max, region.v_max
        );
    }

    for slot in &asset.settings.textures {
        let claims = slot.claims();
        println!(
            "  Slot {}: {}, {} pass(es)",
            slot.texture_id,
            slot.format(),
            slot.passes.len()
        );
        if !claims.collisions().is_empty() {
            println!("    Channels written by several passes: {}", claims.collisions());
        }
    }

    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "billboard".to_string())
}
