use thiserror::Error;
use tracing::debug;
use trajet_matrix_providers::travel_matrix_client::TravelMatrixClient;

use crate::{
    problem::location::Location,
    solver::{
        nearest_neighbor::nearest_neighbor, solver_params::SolverParams, two_opt::two_opt,
    },
};

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("at least 2 locations are required to build a route, got {0}")]
    TooFewLocations(usize),

    #[error("start index {start} is out of bounds for {len} locations")]
    InvalidStart { start: usize, len: usize },

    #[error("location {0} has a non-finite coordinate")]
    MalformedLocation(usize),
}

/// The visiting order over the input locations, as indices into the slice
/// handed to [`Solver::optimize`].
#[derive(Debug, Clone)]
pub struct OptimizedRoute {
    /// Permutation of `0..locations.len()`; the first entry is the requested
    /// start, and there is no return leg to it.
    pub tour: Vec<usize>,

    /// Sum of the matrix distances over the tour's legs, in meters.
    pub total_distance: f64,

    /// True when the distances came from the great-circle fallback rather
    /// than the road network, so callers can label the result.
    pub approximate_distances: bool,
}

pub struct Solver {
    matrix_client: TravelMatrixClient,
    params: SolverParams,
}

impl Solver {
    pub fn new(matrix_client: TravelMatrixClient, params: SolverParams) -> Self {
        Self {
            matrix_client,
            params,
        }
    }

    /// Computes a near-optimal visiting order over `locations`, anchored at
    /// `start`.
    ///
    /// One distance matrix is fetched per call, then a nearest-neighbor tour
    /// is built and, for small enough inputs, refined with 2-opt. Provider
    /// failures never surface here; they are already converted to the
    /// approximate matrix and reported through `approximate_distances`.
    pub async fn optimize(
        &self,
        locations: &[Location],
        start: usize,
    ) -> Result<OptimizedRoute, OptimizeError> {
        if locations.len() < 2 {
            return Err(OptimizeError::TooFewLocations(locations.len()));
        }

        if start >= locations.len() {
            return Err(OptimizeError::InvalidStart {
                start,
                len: locations.len(),
            });
        }

        if let Some(malformed) = locations.iter().position(|location| !location.is_finite()) {
            return Err(OptimizeError::MalformedLocation(malformed));
        }

        let matrix = self.matrix_client.fetch_matrix(locations).await;

        let mut tour = nearest_neighbor(&matrix, start);

        if locations.len() <= self.params.two_opt_max_locations {
            tour = two_opt(&tour, &matrix);
        } else {
            debug!(
                "skipping 2-opt refinement for {} locations (limit {})",
                locations.len(),
                self.params.two_opt_max_locations
            );
        }

        let total_distance = matrix.path_distance(&tour);

        Ok(OptimizedRoute {
            tour,
            total_distance,
            approximate_distances: matrix.is_approximate(),
        })
    }
}
