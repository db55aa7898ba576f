use crate::travel_matrix::{MatrixSource, TravelMatrix};

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance in meters between two points (x = longitude,
/// y = latitude, decimal degrees).
pub fn haversine(a: geo_types::Point, b: geo_types::Point) -> f64 {
    let lat_a = a.y().to_radians();
    let lat_b = b.y().to_radians();
    let delta_lat = (b.y() - a.y()).to_radians();
    let delta_lon = (b.x() - a.x()).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// All-pairs straight-line matrix, scaled by `road_factor` to approximate the
/// fact that real routes are longer than great circles.
pub fn as_the_crow_flies_matrix<P>(points: &[P], road_factor: f64) -> TravelMatrix
where
    for<'a> &'a P: Into<geo_types::Point>,
{
    let points: Vec<geo_types::Point> = points.iter().map(|p| p.into()).collect();

    let rows = points
        .iter()
        .map(|from| {
            points
                .iter()
                .map(|to| {
                    if from == to {
                        0.0
                    } else {
                        haversine(*from, *to) * road_factor
                    }
                })
                .collect()
        })
        .collect();

    TravelMatrix::from_rows(rows, MatrixSource::AsTheCrowFlies)
}
