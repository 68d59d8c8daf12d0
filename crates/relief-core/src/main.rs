//! Relief Ranking CLI
//!
//! Ranks a saved page of relief search hits against a user location.
//!
//! Usage:
//!   rank-relief --resources data/relief_hits.json \
//!               --lat 30.1575 --lon 71.5249 --filter medical \
//!               --output data/ranked.json --geojson

use anyhow::Result;
use clap::Parser;
use relief_core::{export, loader, rank_with_order, CapabilityFilter, GeoPoint, RankOrder};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "rank-relief",
    about = "Filter relief resources and annotate them with distance from a location"
)]
struct Args {
    /// Path to relief hits JSON (array or search response with `hits`)
    #[arg(short, long, default_value = "data/relief_hits.json")]
    resources: PathBuf,

    /// User latitude in degrees
    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    lat: Option<f64>,

    /// User longitude in degrees
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    lon: Option<f64>,

    /// Capability filter: all, shelter, food, medical, water
    #[arg(short, long, default_value = "all")]
    filter: CapabilityFilter,

    /// Sort nearest first instead of keeping search order
    #[arg(long)]
    nearest_first: bool,

    /// Output JSON file
    #[arg(short, long, default_value = "data/ranked_relief.json")]
    output: PathBuf,

    /// Also output GeoJSON
    #[arg(long)]
    geojson: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let origin = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)?),
        _ => {
            warn!("No location given, distances will be reported as unknown");
            None
        }
    };

    let loaded = loader::load_resources(&args.resources)?;

    let order = if args.nearest_first {
        RankOrder::NearestFirst
    } else {
        RankOrder::Upstream
    };
    let ranked = rank_with_order(&loaded.records, origin, args.filter, order);

    info!("Found {} relief options (filter={})", ranked.len(), args.filter);
    for r in ranked.iter().take(10) {
        info!(
            "  {:>10} | {:8} | {:6} | {:40}",
            r.distance.to_string(),
            r.classification.display_type.as_str().to_uppercase(),
            r.resource.status_label(),
            r.resource.name.chars().take(40).collect::<String>()
        );
    }

    info!("Writing output to {:?}", args.output);
    let file = File::create(&args.output)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &ranked)?;

    if args.geojson {
        let geojson_path = args.output.with_extension("geojson");
        info!("Writing GeoJSON to {:?}", geojson_path);
        let collection = export::resources_geojson(&ranked);
        let file = File::create(&geojson_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &collection)?;
    }

    Ok(())
}
