//! Configuration types for the mermaid-press pipeline.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources. Every field has a default, so a partial configuration
//! file only needs to name the settings it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`ExtractConfig`] - Which fenced blocks are treated as diagrams.
//! - [`RendererConfig`] - How the external renderer is invoked.
//! - [`OutputConfig`] - Where images go and how they are referenced.
//!
//! # Example
//!
//! ```
//! # use mermaid_press::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.renderer().command(), "mmdc");
//! assert_eq!(config.output().display_width(), "80%");
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Block extraction section.
    #[serde(default)]
    extract: ExtractConfig,

    /// Renderer invocation section.
    #[serde(default)]
    renderer: RendererConfig,

    /// Output layout section.
    #[serde(default)]
    output: OutputConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(extract: ExtractConfig, renderer: RendererConfig, output: OutputConfig) -> Self {
        Self {
            extract,
            renderer,
            output,
        }
    }

    /// Returns the extraction configuration.
    pub fn extract(&self) -> &ExtractConfig {
        &self.extract
    }

    /// Returns the renderer configuration.
    pub fn renderer(&self) -> &RendererConfig {
        &self.renderer
    }

    /// Returns a mutable reference to the renderer configuration.
    pub fn renderer_mut(&mut self) -> &mut RendererConfig {
        &mut self.renderer
    }

    /// Returns the output configuration.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    /// Returns a mutable reference to the output configuration.
    pub fn output_mut(&mut self) -> &mut OutputConfig {
        &mut self.output
    }
}

/// Selects the fenced blocks that hold diagram source.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Language tag on the opening fence.
    language: String,
}

impl ExtractConfig {
    /// Creates an [`ExtractConfig`] matching the given language tag.
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    /// Returns the language tag.
    pub fn language(&self) -> &str {
        &self.language
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self::new("mermaid")
    }
}

/// Settings for the external rendering command.
///
/// The command is invoked as
/// `<command> [args...] -i <input> -o <output> -b <background> -w <width>`.
/// Leading `args` allow wrappers such as
/// `npx -p @mermaid-js/mermaid-cli mmdc`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Program name or path, resolved through `PATH`.
    command: String,

    /// Arguments placed before the standard renderer options.
    args: Vec<String>,

    /// Background passed with `-b`.
    background: String,

    /// Target width in pixels passed with `-w`.
    width: u32,

    /// Seconds before a running render is killed and counted as failed.
    /// Only the renderer process itself is killed, not processes it spawned.
    timeout_secs: Option<u64>,
}

impl RendererConfig {
    /// Creates a configuration for `command` with default options.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    /// Sets the leading arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the render timeout in seconds.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Returns the renderer program.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Returns the leading arguments.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns the background option.
    pub fn background(&self) -> &str {
        &self.background
    }

    /// Returns the target width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the render timeout in seconds, if one is set.
    pub fn timeout_secs(&self) -> Option<u64> {
        self.timeout_secs
    }

    /// Sets the renderer program.
    pub fn set_command(&mut self, command: impl Into<String>) {
        self.command = command.into();
    }

    /// Sets the target width in pixels.
    pub fn set_width(&mut self, width: u32) {
        self.width = width;
    }

    /// Sets the render timeout in seconds.
    pub fn set_timeout_secs(&mut self, timeout_secs: Option<u64>) {
        self.timeout_secs = timeout_secs;
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            command: "mmdc".to_string(),
            args: Vec::new(),
            background: "transparent".to_string(),
            width: 800,
            timeout_secs: None,
        }
    }
}

/// Where generated images are written and how the document refers to them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for generated images, relative to the working directory.
    images_dir: PathBuf,

    /// Leading part of every generated file name.
    file_prefix: String,

    /// Alt text of the image reference.
    alt_text: String,

    /// Display width annotation, e.g. `80%`.
    display_width: String,

    /// Skip rendering when the content-named image already exists.
    reuse_existing: bool,
}

impl OutputConfig {
    /// Creates an output configuration writing images to `images_dir`.
    pub fn new(images_dir: impl Into<PathBuf>) -> Self {
        Self {
            images_dir: images_dir.into(),
            ..Self::default()
        }
    }

    /// Returns the images directory.
    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Returns the file name prefix.
    pub fn file_prefix(&self) -> &str {
        &self.file_prefix
    }

    /// Returns the image alt text.
    pub fn alt_text(&self) -> &str {
        &self.alt_text
    }

    /// Returns the display width annotation.
    pub fn display_width(&self) -> &str {
        &self.display_width
    }

    /// Returns whether existing images are reused without rendering.
    pub fn reuse_existing(&self) -> bool {
        self.reuse_existing
    }

    /// Sets the images directory.
    pub fn set_images_dir(&mut self, images_dir: impl Into<PathBuf>) {
        self.images_dir = images_dir.into();
    }

    /// Sets whether existing images are reused without rendering.
    pub fn set_reuse_existing(&mut self, reuse_existing: bool) {
        self.reuse_existing = reuse_existing;
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from("images"),
            file_prefix: "mermaid".to_string(),
            alt_text: "Diagram".to_string(),
            display_width: "80%".to_string(),
            reuse_existing: false,
        }
    }
}
