//! pcloudfs command-line front end

pub mod commands;

pub use commands::{run, Command, USAGE};
