use trajet_matrix_providers::travel_matrix::TravelMatrix;

/// Greedy construction: starting from `start`, always step to the closest
/// unvisited location per the current matrix row. The strict `<` comparison
/// over ascending candidate indices breaks distance ties toward the lowest
/// index, so the result is deterministic. O(N²), no backtracking.
pub fn nearest_neighbor(matrix: &TravelMatrix, start: usize) -> Vec<usize> {
    let n = matrix.len();
    let mut visited = vec![false; n];
    let mut tour = Vec::with_capacity(n);

    tour.push(start);
    visited[start] = true;

    let mut current = start;

    for _ in 1..n {
        let mut nearest = None;
        let mut nearest_distance = f64::INFINITY;

        for candidate in 0..n {
            if !visited[candidate] && matrix.distance(current, candidate) < nearest_distance {
                nearest_distance = matrix.distance(current, candidate);
                nearest = Some(candidate);
            }
        }

        if let Some(next) = nearest {
            tour.push(next);
            visited[next] = true;
            current = next;
        }
    }

    tour
}
