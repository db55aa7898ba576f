use trajet_matrix_providers::travel_matrix::TravelMatrix;

/// **Open-path 2-opt**
///
/// Reverses the segment of stops between positions `i` and `j` (inclusive)
/// whenever doing so lowers the total path distance. This removes crossing
/// edges left behind by the greedy construction.
///
/// ```text
/// BEFORE:
///    [start] -> ... (prev) --x--> [i] -> ... -> [j] --x--> (next) ...
///
/// AFTER (segment reversed):
///    [start] -> ... (prev) -----> [j] -> ... -> [i] -----> (next) ...
/// ```
///
/// The tour is an open path: there is no edge from the last stop back to the
/// start, so when `j` is the last position the `(next)` edge does not exist
/// and is excluded from the comparison. Position 0 (the fixed start) is never
/// part of a reversal.
///
/// Full passes repeat until none of the reversals improves; every accepted
/// move strictly decreases the total distance, so the search terminates at a
/// local optimum.
pub fn two_opt(tour: &[usize], matrix: &TravelMatrix) -> Vec<usize> {
    let n = tour.len();
    let mut best = tour.to_vec();

    if n < 3 {
        return best;
    }

    let mut improved = true;

    while improved {
        improved = false;

        for i in 1..n - 1 {
            for j in i + 1..n {
                if reversal_delta(&best, matrix, i, j) < 0.0 {
                    best[i..=j].reverse();
                    improved = true;
                }
            }
        }
    }

    best
}

/// Change in total path distance if `tour[i..=j]` were reversed. For a
/// symmetric matrix only the two boundary edges differ; directed road
/// distances also change along the reversed segment, so the inner legs are
/// summed in both directions rather than assumed equal.
fn reversal_delta(tour: &[usize], matrix: &TravelMatrix, i: usize, j: usize) -> f64 {
    let n = tour.len();

    let mut current = matrix.distance(tour[i - 1], tour[i]);
    let mut reversed = matrix.distance(tour[i - 1], tour[j]);

    for k in i..j {
        current += matrix.distance(tour[k], tour[k + 1]);
        reversed += matrix.distance(tour[k + 1], tour[k]);
    }

    // The edge following the last position does not exist on an open path.
    if j + 1 < n {
        current += matrix.distance(tour[j], tour[j + 1]);
        reversed += matrix.distance(tour[i], tour[j + 1]);
    }

    reversed - current
}

#[cfg(test)]
mod tests {
    use trajet_matrix_providers::travel_matrix::{MatrixSource, TravelMatrix};

    use super::*;

    /// Unit square: 0=(0,0), 1=(0,1), 2=(1,1), 3=(1,0), Euclidean distances.
    fn square_matrix() -> TravelMatrix {
        let corners: [(f64, f64); 4] = [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)];
        let rows = corners
            .iter()
            .map(|a| {
                corners
                    .iter()
                    .map(|b| ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt())
                    .collect()
            })
            .collect();

        TravelMatrix::from_rows(rows, MatrixSource::Osrm)
    }

    #[test]
    fn uncrosses_the_square() {
        let matrix = square_matrix();
        let crossing = vec![0, 2, 1, 3];

        let improved = two_opt(&crossing, &matrix);

        assert_eq!(improved, vec![0, 1, 2, 3]);
        assert!(matrix.path_distance(&improved) < matrix.path_distance(&crossing));
        // Perimeter without the closing edge.
        assert!((matrix.path_distance(&improved) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn never_increases_path_distance() {
        let matrix = square_matrix();

        for tour in [vec![0, 1, 2, 3], vec![0, 3, 1, 2], vec![0, 2, 3, 1]] {
            let improved = two_opt(&tour, &matrix);
            assert!(matrix.path_distance(&improved) <= matrix.path_distance(&tour));
            assert_eq!(improved[0], tour[0]);
        }
    }

    #[test]
    fn is_idempotent_on_its_own_output() {
        let matrix = square_matrix();

        let once = two_opt(&[0, 2, 1, 3], &matrix);
        let twice = two_opt(&once, &matrix);

        assert_eq!(once, twice);
    }

    #[test]
    fn does_not_close_the_path_back_to_the_start() {
        // The last leg 2 -> 0 is prohibitively expensive in one direction.
        // Reading it through a wraparound edge would force a reversal; an
        // open path must leave this tour alone.
        let matrix = TravelMatrix::from_rows(
            vec![
                vec![0.0, 1.0, 50.0],
                vec![1.0, 0.0, 1.0],
                vec![1000.0, 1.0, 0.0],
            ],
            MatrixSource::Osrm,
        );

        assert_eq!(two_opt(&[0, 1, 2], &matrix), vec![0, 1, 2]);
    }

    #[test]
    fn keeps_tours_of_fewer_than_three_stops_unchanged() {
        let matrix = square_matrix();
        assert_eq!(two_opt(&[0, 1], &matrix), vec![0, 1]);
        assert_eq!(two_opt(&[0], &matrix), vec![0]);
    }
}
