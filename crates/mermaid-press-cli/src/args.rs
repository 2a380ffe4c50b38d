//! Command-line argument definitions for the mermaid-press CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Two positional paths select the input and output
//! documents; the options override settings from the configuration file.

use clap::Parser;

/// Command-line arguments for the mermaid-press preprocessor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input Markdown file
    #[arg(help = "Path to the input Markdown file")]
    pub input: String,

    /// Path to the processed Markdown file
    #[arg(help = "Path to write the processed Markdown file")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory for generated images
    #[arg(long)]
    pub images_dir: Option<String>,

    /// Renderer command (mermaid-cli compatible)
    #[arg(long)]
    pub renderer: Option<String>,

    /// Image width in pixels passed to the renderer
    #[arg(long)]
    pub width: Option<u32>,

    /// Seconds before a render is abandoned
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Keep images that already exist instead of rendering them again
    #[arg(long)]
    pub reuse_existing: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}
