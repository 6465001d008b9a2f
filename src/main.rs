//! # Warren Main Entry Point
//!
//! Generates a dungeon floor and prints it as ASCII or JSON for inspection.

use clap::Parser;
use log::info;
use std::path::PathBuf;
use warren::{
    FloorCatalog, FloorGenerator, FloorLayout, GenerationOptions, TileKind, TilePos,
    WarrenResult,
};

/// Command line arguments for the warren floor generator.
#[derive(Parser, Debug)]
#[command(name = "warren")]
#[command(about = "Seeded dungeon-floor generation with layout validation")]
#[command(version)]
struct Args {
    /// Seed for reproducible generation; omitted seeds from the clock
    #[arg(short, long)]
    seed: Option<i64>,

    /// Floor number, scaling the room count
    #[arg(short, long, default_value_t = 1)]
    floor: u32,

    /// Path to a JSON room catalog; omitted uses the built-in demo catalog
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Dump the full layout as JSON instead of ASCII
    #[arg(long)]
    json: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> WarrenResult<()> {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    info!("warren v{}", warren::VERSION);

    let catalog = match &args.catalog {
        Some(path) => FloorCatalog::load_json(path)?,
        None => FloorCatalog::demo()?,
    };

    let mut opts = GenerationOptions::new(args.floor);
    opts.seed = args.seed;
    let mut generator = FloorGenerator::new(catalog, opts)?;
    let layout = generator.generate()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&layout)?);
    } else {
        print_summary(&layout);
        print_ascii(&layout);
    }
    Ok(())
}

fn initialize_logging(log_level: &str) {
    let level = log_level
        .parse::<log::LevelFilter>()
        .unwrap_or(log::LevelFilter::Info);
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn print_summary(layout: &FloorLayout) {
    println!(
        "floor {} | seed state {} | {} rooms ({}..={} allowed) | {} doors | {} dead ends",
        layout.floor_num,
        layout.initial_rng_state,
        layout.live_room_count(),
        layout.min_rooms,
        layout.max_rooms,
        layout.doors.len(),
        layout.dead_ends.len()
    );
}

/// Renders the tile buffers top to bottom. Walls win over floors the way a
/// renderer would stack the tilemaps.
fn print_ascii(layout: &FloorLayout) {
    let Some((min, max)) = layout.tiles.bounds() else {
        println!("(no tiles)");
        return;
    };

    let mut out = String::new();
    for y in (min.y..=max.y).rev() {
        for x in min.x..=max.x {
            let pos = TilePos::new(x, y);
            let glyph = match layout.tiles.walls.get(&pos) {
                Some(TileKind::Bound { .. }) => '#',
                Some(TileKind::Wall { .. }) => '=',
                Some(TileKind::Floor { .. }) => ',',
                None => match layout.tiles.floors.get(&pos) {
                    Some(_) => '.',
                    None => ' ',
                },
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    print!("{out}");
}
