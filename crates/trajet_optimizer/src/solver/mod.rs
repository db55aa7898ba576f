pub mod nearest_neighbor;
pub mod solver;
pub mod solver_params;
pub mod two_opt;
