//! CLI argument definitions for the `tent-layout` binary (C9). The
//! calculation request itself travels as JSON on stdin (or a file), so
//! this only covers how that JSON is read and rendered.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "tent-layout",
    about = "Compute optimized floor-plan layouts for rectangular event tents"
)]
pub struct Cli {
    /// Pretty-print the JSON response.
    #[arg(long, default_value_t = false)]
    pub pretty: bool,
    /// Enable debug logging to stderr.
    #[arg(short = 'v', long, default_value_t = false)]
    pub verbose: bool,
    /// Read the calculation request from this file instead of stdin.
    pub filename: Option<String>,
}
