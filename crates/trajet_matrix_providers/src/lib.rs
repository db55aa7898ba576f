pub mod as_the_crow_flies;
pub mod osrm_api;
pub mod travel_matrix;
pub mod travel_matrix_client;
