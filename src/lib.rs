pub mod commands;
pub mod core;
pub mod logging;
