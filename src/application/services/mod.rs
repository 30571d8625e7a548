pub mod aggregator;
pub mod classifier;
pub mod controller;
pub mod session;
