pub mod chart;
pub mod comparison;
pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod metrics;
pub mod model;
pub mod preprocess;
pub mod regressor;
pub mod split;
pub mod web;
