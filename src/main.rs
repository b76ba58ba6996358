//! Level inspector: generates a dungeon, prints it, and optionally shows the
//! flow field toward a target and exports the layout as JSON.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use tracing::{info, warn};

use dungeon_nav::constants::{
    DUNGEON_DEFAULT_HEIGHT, DUNGEON_DEFAULT_MAX_DEPTH, DUNGEON_DEFAULT_MIN_ROOM_SIZE,
    DUNGEON_DEFAULT_WIDTH,
};
use dungeon_nav::{validate_room_connectivity, Level, LevelParams, NavConfig};

/// Generate a dungeon and inspect its navigation data
#[derive(Parser, Debug)]
#[command(name = "dungeon-nav")]
#[command(about = "Generate a BSP dungeon and inspect its flow field", long_about = None)]
#[command(version)]
struct Cli {
    /// World width in world units
    #[arg(long, default_value_t = DUNGEON_DEFAULT_WIDTH)]
    width: f32,

    /// World height in world units
    #[arg(long, default_value_t = DUNGEON_DEFAULT_HEIGHT)]
    height: f32,

    /// Smallest partition a BSP node may be split into
    #[arg(long, default_value_t = DUNGEON_DEFAULT_MIN_ROOM_SIZE)]
    min_room: f32,

    /// Maximum BSP recursion depth
    #[arg(long, default_value_t = DUNGEON_DEFAULT_MAX_DEPTH)]
    depth: u32,

    /// RNG seed, random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// JSON config overriding the built-in tunables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Build a flow field toward this world point, written as `x,y`
    #[arg(long, value_parser = parse_point)]
    target: Option<Vec2>,

    /// Write the generated layout to this JSON file
    #[arg(long)]
    export: Option<PathBuf>,

    /// Record puffin profiling scopes
    #[arg(long)]
    profile: bool,
}

fn parse_point(s: &str) -> std::result::Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x `{x}`: {e}"))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad y `{y}`: {e}"))?;
    Ok(Vec2::new(x, y))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    puffin::set_scopes_on(cli.profile);

    let config = match &cli.config {
        Some(path) => NavConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => NavConfig::default(),
    };
    let params = LevelParams {
        width: cli.width,
        height: cli.height,
        min_room_size: cli.min_room,
        max_depth: cli.depth,
    };
    let seed = cli.seed.unwrap_or_else(rand::random);

    let mut level = Level::generate(config, params, seed).context("generating level")?;
    let layout = level.layout();
    let connectivity = validate_room_connectivity(&layout.rooms, &layout.corridors);
    info!(
        seed,
        rooms = layout.rooms.len(),
        corridors = layout.corridors.len(),
        components = connectivity.component_count,
        walkable_cells = layout.grid.walkable_count(),
        "Level ready"
    );
    println!("{layout}");

    if let Some(target) = cli.target {
        if level.update_flow_field(target)? {
            print_flow(&level);
        } else {
            warn!(x = target.x, y = target.y, "Target has no walkable cell nearby");
        }
    }

    if let Some(path) = &cli.export {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), level.layout())
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "Exported layout");
    }

    if cli.profile {
        puffin::GlobalProfiler::lock().new_frame();
        info!("Profiling scopes recorded for this run");
    }

    Ok(())
}

/// One glyph per cell: `#` wall, `*` target, `?` unreachable floor, `o` no
/// steering, otherwise an arrow along the dominant axis of the flow direction.
fn print_flow(level: &Level) {
    let layout = level.layout();
    let Some(field) = level.flow_field() else {
        return;
    };

    let mut out = String::with_capacity((layout.grid_width() + 1) * layout.grid_height());
    for y in 0..layout.grid_height() as i32 {
        for x in 0..layout.grid_width() as i32 {
            let glyph = if !layout.grid.is_walkable(x, y) {
                '#'
            } else if (x, y) == field.target_cell {
                '*'
            } else if !field.is_reachable(x, y) {
                '?'
            } else {
                let dir = level.flow_direction(layout.cell_center(x, y));
                if dir == Vec2::ZERO {
                    'o'
                } else if dir.x.abs() >= dir.y.abs() {
                    if dir.x > 0.0 { '>' } else { '<' }
                } else if dir.y > 0.0 {
                    'v'
                } else {
                    '^'
                }
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    println!("{out}");
}
