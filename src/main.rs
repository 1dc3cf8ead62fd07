use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::PathBuf;
use tilemapgen::config::ConfigManager;
use tilemapgen::data::AssetCatalog;
use tilemapgen::engines::generation::{ConsoleProgressCallback, ProgressCallback};
use tilemapgen::export::read_map;
use tilemapgen::services::{generate_map, MapRequest};

/// Evolve layered tile maps from a set of tile images and export them as TMX.
#[derive(Parser)]
#[command(name = "tilemapgen")]
#[command(about = "Generate tile maps using genetic algorithms", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evolve a map and write it as a TMX file
    Generate(GenerateArgs),
    /// Print a summary of an exported map
    Inspect {
        /// TMX file to read
        map: PathBuf,
    },
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Tile images, in asset id order
    #[arg(short, long, num_args = 1.., required = true)]
    assets: Vec<PathBuf>,

    /// Output TMX path
    #[arg(short, long, default_value = "map.tmx")]
    output: PathBuf,

    /// Config file (TOML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long)]
    height: Option<usize>,

    #[arg(long)]
    tile_size: Option<u32>,

    #[arg(short, long)]
    generations: Option<usize>,

    #[arg(short, long)]
    population: Option<usize>,

    #[arg(short, long)]
    layers: Option<usize>,

    #[arg(short, long)]
    seed: Option<u64>,

    /// Also save each layer and the composite as PNG into this directory
    #[arg(long)]
    layers_dir: Option<PathBuf>,

    /// Worker threads for fitness evaluation (default: all cores)
    #[arg(short = 't', long)]
    threads: Option<usize>,

    /// Log progress lines instead of drawing a progress bar
    #[arg(long)]
    no_progress: bool,
}

struct BarProgress {
    bar: ProgressBar,
}

impl ProgressCallback for BarProgress {
    fn on_generation_complete(&mut self, _step: usize, best_fitness: f64) {
        self.bar.set_message(format!("Best: {:.3}", best_fitness));
        self.bar.inc(1);
    }

    fn on_layer_complete(&mut self, layer: usize, best_fitness: f64) {
        self.bar
            .println(format!("Layer {} done, fitness {:.3}", layer + 1, best_fitness));
    }

    fn on_complete(&mut self) {
        self.bar.finish_with_message("Map exported");
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate(args) => generate(args),
        Command::Inspect { map } => inspect(map),
    }
}

fn generate(args: GenerateArgs) -> anyhow::Result<()> {
    if let Some(num_threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let manager = ConfigManager::new();
    match &args.config {
        Some(path) => manager
            .load_from_file(path)
            .with_context(|| format!("Loading {}", path.display()))?,
        None => manager
            .load_from_env()
            .context("Loading environment overrides")?,
    }
    manager.update(|c| {
        if let Some(width) = args.width {
            c.map.width = width;
        }
        if let Some(height) = args.height {
            c.map.height = height;
        }
        if let Some(tile_size) = args.tile_size {
            c.map.tile_size = tile_size;
        }
        if let Some(generations) = args.generations {
            c.evolution.generations = generations;
        }
        if let Some(population) = args.population {
            c.evolution.population_size = population;
        }
        if let Some(layers) = args.layers {
            c.evolution.layers = layers;
        }
        if args.seed.is_some() {
            c.evolution.seed = args.seed;
        }
    })?;
    let config = manager.get();

    let catalog = AssetCatalog::load(&args.assets, config.map.tile_size)?;

    let request = MapRequest {
        grid: config.map.grid(),
        evolution: config.evolution.clone(),
        rules: config.compatibility.rules.clone(),
        output_path: Some(args.output.clone()),
    };

    let total_steps = config.evolution.total_steps();
    let mut progress: Box<dyn ProgressCallback> = if args.no_progress {
        Box::new(ConsoleProgressCallback::new(total_steps))
    } else {
        let bar = ProgressBar::new(total_steps as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} (ETA: {eta}) | {msg}",
                )?
                .progress_chars("=>-"),
        );
        Box::new(BarProgress { bar })
    };

    let map = generate_map(&catalog, &request, progress.as_mut())?;

    if let Some(dir) = &args.layers_dir {
        fs::create_dir_all(dir)?;
        for (i, layer) in map.layers.iter().enumerate() {
            layer.raster.save(dir.join(format!("layer_{}.png", i + 1)))?;
        }
        map.composite.save(dir.join("composite.png"))?;
        log::info!("Saved layer images to {}", dir.display());
    }

    println!("Wrote {}", args.output.display());
    for layer in &map.layers {
        println!("  {}: fitness {:.3}", layer.name, layer.fitness);
    }
    Ok(())
}

fn inspect(path: PathBuf) -> anyhow::Result<()> {
    let doc = read_map(&path).with_context(|| format!("Reading {}", path.display()))?;

    println!(
        "{} map {}x{} tiles of {}x{} px (TMX {})",
        doc.orientation, doc.width, doc.height, doc.tile_width, doc.tile_height, doc.version
    );
    for tileset in &doc.tilesets {
        println!(
            "  tileset '{}' from gid {} ({} images)",
            tileset.name,
            tileset.first_gid,
            tileset.image_sources.len()
        );
    }
    for layer in &doc.layers {
        let mut distinct = layer.data.clone();
        distinct.sort_unstable();
        distinct.dedup();
        println!(
            "  {} {}x{}: {} cells, {} distinct tiles",
            layer.name,
            layer.width,
            layer.height,
            layer.data.len(),
            distinct.len()
        );
    }
    Ok(())
}
