//! Headless demo entry point.
//!
//! Builds the transit core with `MinimalPlugins`, generates (or reloads) a
//! street map, runs a short scripted editing session, prints a JSON summary
//! of the resulting network on stdout, and persists the network to disk.
//! Progress logs go to stderr so stdout stays machine-readable.
//!
//! Usage: `headway [--seed N] [--save FILE]`

mod atomic_write;
mod demo;
mod save_file;

use std::path::PathBuf;

use bevy::prelude::*;
use serde::Serialize;

use transit::config::DEFAULT_MAP_SEED;
use transit::grid::{CellType, WorldGrid};
use transit::modes::TransitMode;
use transit::streets::StreetMap;
use transit::transit_map::TransitMap;
use transit::world_init::MapSeed;
use transit::{SaveableRegistry, TransitPlugin};

use crate::save_file::SaveFile;

const DEFAULT_SAVE_PATH: &str = "headway.save";

fn main() {
    let args = match CliArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("usage: headway [--seed N] [--save FILE]");
            std::process::exit(2);
        }
    };

    let loaded = match save_file::load(&args.save_path) {
        Ok(loaded) => loaded,
        Err(message) => {
            eprintln!("cannot load {}: {message}", args.save_path.display());
            std::process::exit(1);
        }
    };

    // An existing save wins over --seed: its stored seed regenerates the
    // terrain the saved network was built on.
    let seed = match &loaded {
        Some(file) => {
            if let Some(requested) = args.seed {
                if requested != file.seed {
                    eprintln!(
                        "--seed {requested} ignored, {} was generated from seed {}",
                        args.save_path.display(),
                        file.seed
                    );
                }
            }
            file.seed
        }
        None => args.seed.unwrap_or(DEFAULT_MAP_SEED),
    };

    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(MapSeed(seed));
    app.add_plugins(TransitPlugin);
    app.update();

    if let Some(file) = &loaded {
        restore_network(&mut app, file);
        let transit = app.world().resource::<TransitMap>();
        eprintln!(
            "loaded {}: {} lines, {} stops",
            args.save_path.display(),
            transit.lines.len(),
            transit.stops.len()
        );
    } else {
        let streets = app.world().resource::<StreetMap>();
        eprintln!(
            "generated map from seed {seed}: {} streets",
            streets.segments.len()
        );
    }

    let picks = {
        let streets = app.world().resource::<StreetMap>();
        demo::pick_demo_segments(streets, 2)
    };
    match picks.as_slice() {
        [] => eprintln!("map from seed {seed} has no street long enough for a demo line"),
        [bus_segment, rest @ ..] => {
            demo::build_demo_line(&mut app, TransitMode::Bus, *bus_segment);
            let tram_segment = rest.first().unwrap_or(bus_segment);
            demo::build_demo_line(&mut app, TransitMode::Tram, *tram_segment);
        }
    }

    let summary = NetworkSummary::collect(app.world(), seed);
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("summary serialization failed: {e}"),
    }

    let world = app.world();
    let extensions = world.resource::<SaveableRegistry>().save_all(world);
    let file = SaveFile::new(seed, extensions);
    match save_file::store(&args.save_path, &file) {
        Ok(()) => eprintln!("network saved to {}", args.save_path.display()),
        Err(e) => {
            eprintln!("cannot save {}: {e}", args.save_path.display());
            std::process::exit(1);
        }
    }
}

/// Replaces the generated network with the saved one and re-marks its street
/// cells on the grid, so the restored map does not depend on generation
/// having produced identical streets.
fn restore_network(app: &mut App, file: &SaveFile) {
    let world = app.world_mut();
    world.resource_scope(|world, registry: Mut<SaveableRegistry>| {
        registry.load_all(world, &file.extensions);
    });
    world.resource_scope(|world, streets: Mut<StreetMap>| {
        let mut grid = world.resource_mut::<WorldGrid>();
        streets.apply_to_grid(&mut grid);
    });
}

// ---------------------------------------------------------------------------
// CLI arguments
// ---------------------------------------------------------------------------

struct CliArgs {
    seed: Option<u64>,
    save_path: PathBuf,
}

impl CliArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut seed = None;
        let mut save_path = PathBuf::from(DEFAULT_SAVE_PATH);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = args.next().ok_or("--seed needs a value")?;
                    seed = Some(
                        value
                            .parse()
                            .map_err(|_| format!("--seed: '{value}' is not a number"))?,
                    );
                }
                "--save" => {
                    save_path = PathBuf::from(args.next().ok_or("--save needs a path")?);
                }
                other => return Err(format!("unknown argument '{other}'")),
            }
        }
        Ok(Self { seed, save_path })
    }
}

// ---------------------------------------------------------------------------
// Network summary (stdout JSON)
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct NetworkSummary {
    seed: u64,
    streets: usize,
    street_length: f32,
    water_cells: usize,
    stops: usize,
    lines: Vec<LineSummary>,
}

#[derive(Serialize)]
struct LineSummary {
    name: String,
    mode: &'static str,
    stops: usize,
    length: f32,
    average_speed: f32,
}

impl NetworkSummary {
    fn collect(world: &World, seed: u64) -> Self {
        let grid = world.resource::<WorldGrid>();
        let streets = world.resource::<StreetMap>();
        let transit = world.resource::<TransitMap>();
        let lines = transit
            .lines
            .iter()
            .map(|line| LineSummary {
                name: line.name.clone(),
                mode: line.mode.display_name(),
                stops: line.stop_ids.len(),
                length: transit.line_length(line.id),
                average_speed: line.mode.average_speed(),
            })
            .collect();
        Self {
            seed,
            streets: streets.segments.len(),
            street_length: streets.segments.iter().map(|s| s.length()).sum(),
            water_cells: grid
                .cells
                .iter()
                .filter(|c| c.cell_type == CellType::Water)
                .count(),
            stops: transit.stops.len(),
            lines,
        }
    }
}
