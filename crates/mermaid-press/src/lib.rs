//! mermaid-press - pre-render Mermaid diagrams in Markdown documents.
//!
//! Fenced ` ```mermaid ` blocks are rendered to PNG images by an external
//! renderer (mermaid-cli's `mmdc` by default) and replaced with image
//! references, so that toolchains which cannot run Mermaid themselves, such
//! as pandoc's PDF output, still show the diagrams.
//!
//! The pipeline has four steps:
//!
//! 1. [`extract`] finds the diagram blocks.
//! 2. [`naming`] derives a content-addressed image name for each block.
//! 3. [`render`] runs the renderer for each distinct block source.
//! 4. [`rewrite`] splices image references over the rendered blocks.
//!
//! A block whose render fails stays in the document as it was.

pub mod config;
pub mod extract;
pub mod naming;
pub mod render;
pub mod rewrite;

mod error;

pub use error::{PressError, RenderError};

use std::{collections::HashMap, fs, path::Path};

use log::{debug, info, warn};

use config::AppConfig;
use extract::{Extraction, Extractor};
use naming::RenderedAsset;
use render::{CommandRenderer, Renderer};
use rewrite::ImageReference;

/// What happened to one diagram block during a run.
#[derive(Debug)]
pub enum BlockOutcome {
    /// The renderer produced the image.
    Rendered(RenderedAsset),
    /// The image already existed on disk and was reused without rendering.
    Cached(RenderedAsset),
    /// An earlier block in the same document has the same source.
    Duplicate {
        asset: RenderedAsset,
        /// Index of the earlier block.
        first: usize,
        /// Whether the earlier block has an image.
        available: bool,
    },
    /// The renderer failed; the block is kept verbatim.
    Failed {
        asset: RenderedAsset,
        error: RenderError,
    },
}

impl BlockOutcome {
    /// Returns the asset the block maps to.
    pub fn asset(&self) -> &RenderedAsset {
        match self {
            BlockOutcome::Rendered(asset) | BlockOutcome::Cached(asset) => asset,
            BlockOutcome::Duplicate { asset, .. } | BlockOutcome::Failed { asset, .. } => asset,
        }
    }

    /// Returns `true` if the block is replaced by an image reference.
    pub fn has_image(&self) -> bool {
        match self {
            BlockOutcome::Rendered(_) | BlockOutcome::Cached(_) => true,
            BlockOutcome::Duplicate { available, .. } => *available,
            BlockOutcome::Failed { .. } => false,
        }
    }
}

/// Result of preprocessing one document.
#[derive(Debug)]
pub struct Processed {
    text: String,
    outcomes: Vec<BlockOutcome>,
}

impl Processed {
    /// Returns the rewritten document.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consumes the result, returning the rewritten document.
    pub fn into_text(self) -> String {
        self.text
    }

    /// Returns one outcome per diagram block, in document order.
    pub fn outcomes(&self) -> &[BlockOutcome] {
        &self.outcomes
    }

    /// Number of blocks replaced by an image reference.
    pub fn replaced_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.has_image()).count()
    }

    /// Number of blocks left in place because rendering failed.
    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.replaced_count()
    }
}

/// Runs the extract, render and rewrite pipeline over documents.
///
/// # Examples
///
/// ```rust,no_run
/// use mermaid_press::{Preprocessor, config::AppConfig};
///
/// let preprocessor = Preprocessor::new(AppConfig::default())
///     .expect("Failed to build preprocessor");
///
/// let processed = preprocessor
///     .process("# Flow\n```mermaid\ngraph TD\n  A --> B\n```\n")
///     .expect("Failed to process document");
///
/// println!("{}", processed.text());
///
/// // Or use default config
/// let preprocessor = Preprocessor::default();
/// ```
pub struct Preprocessor {
    config: AppConfig,
    extractor: Extractor,
    renderer: Box<dyn Renderer>,
}

impl Preprocessor {
    /// Creates a preprocessor that renders with the configured command.
    ///
    /// # Errors
    ///
    /// Returns [`PressError::Pattern`] if the configured language tag does
    /// not yield a usable block pattern.
    pub fn new(config: AppConfig) -> Result<Self, PressError> {
        let extractor = Extractor::new(config.extract().language())?;
        let renderer = Box::new(CommandRenderer::new(config.renderer().clone()));
        Ok(Self {
            config,
            extractor,
            renderer,
        })
    }

    /// Replaces the renderer.
    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Preprocesses a document held in memory.
    ///
    /// Images are written to the configured images directory, which is
    /// created when the document has at least one diagram block. Render
    /// failures are recorded in the returned [`Processed`] and leave the
    /// block untouched.
    ///
    /// # Errors
    ///
    /// Returns [`PressError::Io`] if the images directory cannot be created
    /// or a diagram source cannot be staged for the renderer.
    pub fn process(&self, source: &str) -> Result<Processed, PressError> {
        self.process_with(source, |_, _, _| {})
    }

    /// Like [`process`](Self::process), calling `on_outcome` as soon as
    /// each block is resolved with its index, the block count and its
    /// outcome.
    ///
    /// # Errors
    ///
    /// See [`process`](Self::process).
    pub fn process_with<F>(&self, source: &str, mut on_outcome: F) -> Result<Processed, PressError>
    where
        F: FnMut(usize, usize, &BlockOutcome),
    {
        let blocks = match self.extractor.extract(source) {
            Extraction::Empty => {
                info!("No diagram blocks found");
                return Ok(Processed {
                    text: source.to_string(),
                    outcomes: Vec::new(),
                });
            }
            Extraction::Blocks(blocks) => blocks,
        };
        info!(blocks_count = blocks.len(); "Found diagram blocks");

        let output = self.config.output();
        fs::create_dir_all(output.images_dir())?;

        let mut first_seen: HashMap<String, usize> = HashMap::new();
        let mut outcomes: Vec<BlockOutcome> = Vec::with_capacity(blocks.len());

        for (index, block) in blocks.iter().enumerate() {
            let asset =
                RenderedAsset::new(output.images_dir(), output.file_prefix(), block.source());

            let outcome = if let Some(&first) = first_seen.get(asset.name()) {
                debug!(index, first, name = asset.name(); "Reusing image of identical block");
                BlockOutcome::Duplicate {
                    available: outcomes[first].has_image(),
                    asset,
                    first,
                }
            } else {
                first_seen.insert(asset.name().to_string(), index);
                self.resolve(asset, block.source())?
            };
            on_outcome(index, blocks.len(), &outcome);
            outcomes.push(outcome);
        }

        let (alt, width) = (output.alt_text(), output.display_width());
        let text = rewrite::rewrite(
            source,
            blocks.iter().zip(&outcomes).map(|(block, outcome)| {
                let fragment = outcome.has_image().then(|| {
                    ImageReference::new(alt, outcome.asset().reference(), width).to_string()
                });
                (block, fragment)
            }),
        );

        Ok(Processed { text, outcomes })
    }

    /// Preprocesses the document at `input` and writes the result to `output`.
    ///
    /// The destination is written once, after the whole document has been
    /// rewritten in memory, and replaces any previous content.
    ///
    /// # Errors
    ///
    /// Returns [`PressError::MissingInput`] before doing any work if `input`
    /// does not exist, and [`PressError::Io`] if reading or writing fails.
    pub fn process_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<Processed, PressError> {
        self.process_file_with(input, output, |_, _, _| {})
    }

    /// Like [`process_file`](Self::process_file), reporting each block as
    /// it is resolved. See [`process_with`](Self::process_with).
    ///
    /// # Errors
    ///
    /// See [`process_file`](Self::process_file).
    pub fn process_file_with<F>(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        on_outcome: F,
    ) -> Result<Processed, PressError>
    where
        F: FnMut(usize, usize, &BlockOutcome),
    {
        let (input, output) = (input.as_ref(), output.as_ref());
        if !input.exists() {
            return Err(PressError::MissingInput(input.to_path_buf()));
        }

        let source = fs::read_to_string(input)?;
        let processed = self.process_with(&source, on_outcome)?;
        fs::write(output, processed.text())?;

        info!(
            output = output.display().to_string(),
            replaced = processed.replaced_count(),
            failed = processed.failed_count();
            "Processed document written"
        );
        Ok(processed)
    }

    /// Renders one distinct block. Failures of the renderer itself become a
    /// [`BlockOutcome::Failed`]; staging I/O errors end the run.
    fn resolve(&self, asset: RenderedAsset, source: &str) -> Result<BlockOutcome, PressError> {
        if self.config.output().reuse_existing() && asset.exists() {
            debug!(path = asset.path().display().to_string(); "Image exists, skipping render");
            return Ok(BlockOutcome::Cached(asset));
        }

        match self.renderer.render(source, asset.path()) {
            Ok(()) => Ok(BlockOutcome::Rendered(asset)),
            Err(RenderError::Io(err)) => Err(PressError::Io(err)),
            Err(error) => {
                warn!(name = asset.name(), error:%; "Diagram render failed");
                Ok(BlockOutcome::Failed { asset, error })
            }
        }
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(AppConfig::default()).expect("default block pattern is valid")
    }
}
