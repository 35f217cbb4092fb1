pub mod datamodel;
pub mod xml;
pub mod loader;
pub mod config;
pub mod renderer;
pub mod exporter;
pub mod output;
pub mod errors;
