pub struct SolverParams {
    /// 2-opt refinement is skipped above this many locations; each pass is
    /// O(N²) reversals and the construction heuristic alone is kept for
    /// larger inputs.
    pub two_opt_max_locations: usize,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            two_opt_max_locations: 20,
        }
    }
}
