use std::{fs::File, io::BufReader, path::PathBuf, time::Duration};

use clap::Args;
use serde::Deserialize;
use tracing::info;
use trajet_matrix_providers::{
    osrm_api::OsrmTableClientParams,
    travel_matrix_client::{TravelMatrixClient, TravelMatrixClientParams},
};
use trajet_optimizer::{
    problem::location::Location,
    solver::{solver::Solver, solver_params::SolverParams},
};

#[derive(Args)]
pub struct OptimizeArgs {
    /// JSON file holding the stops: [{"address": "...", "lat": .., "lng": ..}, ...]
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Index of the stop to depart from
    #[arg(short, long, default_value_t = 0)]
    start: usize,

    /// Base URL of the OSRM instance
    #[arg(long)]
    osrm_url: Option<String>,

    /// Timeout in seconds for the table request
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Write the ordered stop list to this file
    #[arg(long, short = 'o')]
    out: Option<PathBuf>,
}

#[derive(Deserialize)]
struct JsonStop {
    address: Option<String>,
    lat: f64,
    lng: f64,
}

pub async fn run(args: OptimizeArgs) -> anyhow::Result<()> {
    let f = File::open(&args.input)?;
    let stops: Vec<JsonStop> = serde_json::from_reader(BufReader::new(f))?;

    let locations: Vec<Location> = stops
        .iter()
        .map(|stop| Location::from_lat_lng(stop.lat, stop.lng))
        .collect();

    let mut osrm = OsrmTableClientParams {
        request_timeout: Duration::from_secs(args.timeout),
        ..OsrmTableClientParams::default()
    };
    if let Some(osrm_url) = args.osrm_url {
        osrm.osrm_url = osrm_url;
    }

    let client = TravelMatrixClient::new(TravelMatrixClientParams {
        osrm,
        ..TravelMatrixClientParams::default()
    });
    let solver = Solver::new(client, SolverParams::default());

    let route = solver.optimize(&locations, args.start).await?;

    let kilometers = route.total_distance / 1000.0;
    info!(
        "Optimized route over {} stops: {:.2} km{}",
        route.tour.len(),
        kilometers,
        if route.approximate_distances {
            " (approximate distances)"
        } else {
            ""
        }
    );

    for (position, &index) in route.tour.iter().enumerate() {
        info!("{:>3}. {}", position + 1, describe(&stops[index]));
    }

    if let Some(out) = args.out {
        std::fs::write(&out, export_text(&stops, &route.tour, kilometers))?;
        info!("Route written to {}", out.display());
    }

    Ok(())
}

fn describe(stop: &JsonStop) -> String {
    match &stop.address {
        Some(address) => address.clone(),
        None => format!("{},{}", stop.lat, stop.lng),
    }
}

fn export_text(stops: &[JsonStop], tour: &[usize], kilometers: f64) -> String {
    let mut text = String::from("OPTIMIZED ROUTE\n================\n\n");
    text.push_str(&format!("Stops: {}\n", tour.len()));
    text.push_str(&format!("Distance: {kilometers:.2} km\n\n"));

    for (position, &index) in tour.iter().enumerate() {
        text.push_str(&format!("{:02}. {}", position + 1, describe(&stops[index])));
        if position == 0 {
            text.push_str(" [START]");
        } else if position == tour.len() - 1 {
            text.push_str(" [END]");
        }
        text.push('\n');
    }

    text
}
