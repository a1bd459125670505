pub mod heuristic;
pub mod scripted;
