use serde::{Deserialize, Serialize};

/// Where the entries of a [`TravelMatrix`] came from.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixSource {
    /// Directed road distances from the OSRM table service.
    Osrm,
    /// Great-circle distances scaled by a road inflation factor.
    AsTheCrowFlies,
}

/// All-pairs travel distances between locations, in meters.
///
/// Stored as a flat row-major vector. To find the entry for a pair of
/// locations, use the formula `index = from * len + to`, where `len` is the
/// total number of locations.
#[derive(Debug, Clone)]
pub struct TravelMatrix {
    distances: Vec<f64>,
    len: usize,
    source: MatrixSource,
}

impl TravelMatrix {
    /// Builds a matrix from nested rows. Rows must form a square table.
    pub fn from_rows(rows: Vec<Vec<f64>>, source: MatrixSource) -> Self {
        let len = rows.len();
        debug_assert!(rows.iter().all(|row| row.len() == len));

        TravelMatrix {
            distances: rows.into_iter().flatten().collect(),
            len,
            source,
        }
    }

    #[inline(always)]
    fn index(&self, from: usize, to: usize) -> usize {
        from * self.len + to
    }

    #[inline(always)]
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        if from == to {
            return 0.0;
        }

        self.distances[self.index(from, to)]
    }

    /// Total distance of an open path: the sum over consecutive pairs, with
    /// no closing edge back to the first stop.
    pub fn path_distance(&self, tour: &[usize]) -> f64 {
        tour.windows(2).map(|leg| self.distance(leg[0], leg[1])).sum()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn source(&self) -> MatrixSource {
        self.source
    }

    pub fn is_approximate(&self) -> bool {
        self.source == MatrixSource::AsTheCrowFlies
    }
}
