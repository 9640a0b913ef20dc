//! kdtrace - render a JSON scene with the kd-tree ray tracer.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use kdtrace_core::{load_scene, AxisPolicy, Scene};
use kdtrace_renderer::{render, Camera, ImageBuffer, World};

/// Which image files to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Plain-text dump of the three color channels
    Text,
    Png,
    Both,
}

#[derive(Debug, Parser)]
#[command(name = "kdtrace", version, about = "Whitted ray tracer accelerated by a kd-tree")]
struct Args {
    /// Scene description (JSON)
    scene: PathBuf,

    /// Output file name without extension
    #[arg(short = 'o', long = "output", default_value = "output")]
    output: PathBuf,

    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Worker threads (defaults to one per core)
    #[arg(short = 't', long = "threads")]
    threads: Option<usize>,

    /// Maximum primitives per kd-tree leaf
    #[arg(long = "leaf-size")]
    leaf_size: Option<usize>,

    /// Maximum kd-tree depth
    #[arg(long = "tree-depth")]
    tree_depth: Option<usize>,

    /// Seed for the random split axis choice
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// Log the built kd-tree at debug level
    #[arg(long = "dump-tree")]
    dump_tree: bool,
}

impl Args {
    /// Command-line settings take precedence over the scene file.
    fn apply_overrides(&self, scene: &mut Scene) {
        if let Some(leaf_size) = self.leaf_size {
            scene.tree.leaf_size = leaf_size;
        }
        if let Some(depth) = self.tree_depth {
            scene.tree.max_depth = depth;
        }
        if let Some(seed) = self.seed {
            scene.tree.axis = AxisPolicy::Random { seed: Some(seed) };
        }
    }

    fn writes_text(&self) -> bool {
        matches!(self.format, OutputFormat::Text | OutputFormat::Both)
    }

    fn writes_png(&self) -> bool {
        matches!(self.format, OutputFormat::Png | OutputFormat::Both)
    }
}

fn render_image(args: &Args, camera: &Camera, world: &World, scene: &Scene) -> Result<ImageBuffer> {
    match args.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .context("Failed to create render thread pool")?;
            Ok(pool.install(|| render(camera, world, &scene.render)))
        }
        None => Ok(render(camera, world, &scene.render)),
    }
}

/// Write the requested files; `save_text` and `save_png` log each path.
fn write_outputs(args: &Args, image: &ImageBuffer) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if args.writes_text() {
        let path = args.output.with_extension("txt");
        image
            .save_text(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }

    if args.writes_png() {
        let path = args.output.with_extension("png");
        image
            .save_png(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }

    Ok(written)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let mut scene = load_scene(&args.scene)
        .with_context(|| format!("Failed to load scene {}", args.scene.display()))?;
    args.apply_overrides(&mut scene);
    scene.camera.validate().context("Invalid camera settings")?;

    let start = Instant::now();
    let world = World::from_scene(&scene).context("Failed to build kd-tree")?;
    let tree = world.tree();
    let stats = tree.stats();
    log::info!(
        "Built kd-tree in {:.2?} (leaf size {}, depth limit {}): {} nodes, {} leaves ({} empty), depth {}",
        start.elapsed(),
        tree.settings().leaf_size,
        tree.settings().max_depth,
        stats.nodes,
        stats.leaves,
        stats.empty_leaves,
        stats.max_depth
    );
    log::info!(
        "{:.2} primitives per leaf, largest leaf {}",
        stats.average_leaf_size(),
        stats.largest_leaf
    );
    if args.dump_tree {
        log::debug!("{}", tree);
    }

    let camera = Camera::new(&scene.camera);
    let image = render_image(&args, &camera, &world, &scene)?;
    let written = write_outputs(&args, &image)?;
    log::debug!("{} output files", written.len());

    Ok(())
}
