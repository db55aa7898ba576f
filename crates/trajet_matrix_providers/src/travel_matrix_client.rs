use tracing::warn;

use crate::{
    as_the_crow_flies::as_the_crow_flies_matrix,
    osrm_api::{OsrmTableClient, OsrmTableClientParams},
    travel_matrix::{MatrixSource, TravelMatrix},
};

pub struct TravelMatrixClientParams {
    pub osrm: OsrmTableClientParams,

    /// Largest location count sent to the table service in one request.
    /// Above this the approximate matrix is computed directly.
    pub max_table_locations: usize,

    /// Roads are typically ~30% longer than the great circle.
    pub road_factor: f64,
}

impl Default for TravelMatrixClientParams {
    fn default() -> Self {
        Self {
            osrm: OsrmTableClientParams::default(),
            max_table_locations: 100,
            road_factor: 1.3,
        }
    }
}

pub struct TravelMatrixClient {
    osrm_client: OsrmTableClient,
    max_table_locations: usize,
    road_factor: f64,
}

impl Default for TravelMatrixClient {
    fn default() -> Self {
        Self::new(TravelMatrixClientParams::default())
    }
}

impl TravelMatrixClient {
    pub fn new(params: TravelMatrixClientParams) -> Self {
        Self {
            osrm_client: OsrmTableClient::new(params.osrm),
            max_table_locations: params.max_table_locations,
            road_factor: params.road_factor,
        }
    }

    /// Computes the all-pairs distance matrix for `points`.
    ///
    /// Road distances come from a single OSRM table request. If the service
    /// is unavailable, or there are more points than one request can carry,
    /// every entry falls back to scaled great-circle distances instead; real
    /// and approximate values are never mixed within one matrix. The matrix
    /// records which strategy produced it.
    pub async fn fetch_matrix<P>(&self, points: &[P]) -> TravelMatrix
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        if points.len() <= 1 {
            // A single location has no travel edges.
            return TravelMatrix::from_rows(vec![vec![0.0]; points.len()], MatrixSource::Osrm);
        }

        if points.len() > self.max_table_locations {
            warn!(
                "{} locations exceed the table service ceiling of {}, using approximate distances",
                points.len(),
                self.max_table_locations
            );
            return as_the_crow_flies_matrix(points, self.road_factor);
        }

        match self.osrm_client.fetch_table(points).await {
            Ok(rows) => TravelMatrix::from_rows(rows, MatrixSource::Osrm),
            Err(err) => {
                warn!("OSRM unavailable, using approximate distances: {err}");
                as_the_crow_flies_matrix(points, self.road_factor)
            }
        }
    }
}
