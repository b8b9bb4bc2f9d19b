pub mod compact;
pub mod grid_data;
