use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use delve_gen::ascii::{self, AsciiMode};
use delve_gen::{Coordinate, WorldConfig, WorldManager};

#[derive(Parser, Debug)]
#[command(name = "delve_gen")]
#[command(about = "Generate chunks of a layered dungeon world and print them as ASCII")]
struct Args {
    /// Random seed (uses random seed if not specified, overrides the config file)
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON world configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Chunk X coordinate
    #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
    x: i32,

    /// Chunk Y coordinate
    #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
    y: i32,

    /// Level (0 is the surface, deeper levels are dungeons)
    #[arg(short, long, default_value = "0")]
    z: u32,

    /// Also load chunks this many steps around the center and print them
    /// side by side
    #[arg(short, long, default_value = "0")]
    radius: i32,

    /// Draw items and monsters over the terrain
    #[arg(long)]
    overlay: bool,

    /// Colorize output with ANSI true color
    #[arg(long)]
    color: bool,

    /// Write the loaded chunks to a text file instead of printing them
    #[arg(long)]
    export: Option<String>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => WorldConfig::load(path)?,
        None => WorldConfig::default(),
    };
    if args.config.is_none() || args.seed.is_some() {
        config.seed = args.seed.unwrap_or_else(rand::random);
    }

    if args.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let seed = config.seed;
    let mut manager = WorldManager::new(config)?;
    let mode = if args.overlay { AsciiMode::Overlay } else { AsciiMode::Terrain };
    let center = Coordinate::new(args.x, args.y, args.z as i32);

    println!("Generating world with seed: {}", seed);
    let loaded = manager.load_area(center, args.radius.max(0))?;
    println!("Loaded {} chunk(s) around {}", loaded.len(), center);

    let chunks: Vec<_> = loaded.iter().filter_map(|c| manager.get_chunk(*c)).collect();

    if let Some(ref path) = args.export {
        ascii::export_chunks(&chunks, seed, path, mode)?;
        println!("Exported to: {}", path);
        return Ok(());
    }

    for chunk in &chunks {
        println!("{}", ascii::summary(chunk));
    }
    println!();

    if args.radius > 0 {
        let rows: Vec<Vec<_>> = (center.y.saturating_sub(args.radius)..=center.y.saturating_add(args.radius))
            .map(|y| {
                (center.x.saturating_sub(args.radius)..=center.x.saturating_add(args.radius))
                    .map(|x| manager.get_chunk(Coordinate::new(x, y, center.z)))
                    .collect()
            })
            .collect();
        print!("{}", ascii::render_area(&rows, mode, args.color));
    } else if let Some(chunk) = manager.get_chunk(center) {
        if args.color {
            print!("{}", ascii::render_colored_chunk(chunk, mode));
        } else {
            println!("{}", ascii::render_chunk(chunk, mode));
        }
    }

    println!();
    print!("{}", ascii::legend());
    Ok(())
}
