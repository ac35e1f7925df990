pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod deviation;
pub mod distribution;
pub mod grid;
pub mod market;
pub mod predict;
pub mod rating;
pub mod records;
pub mod synthetic;
pub mod window;
