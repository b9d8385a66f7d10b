pub mod engine;
pub mod grid;
pub mod occupancy;
pub mod planner;
pub mod stats;
pub mod view;
