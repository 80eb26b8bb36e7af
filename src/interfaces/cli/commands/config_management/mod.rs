//! Configuration commands

mod config_gen;

pub use config_gen::{DEFAULT_SAMPLE_PATH, config_generate};
