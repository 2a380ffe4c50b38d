//! mermaid-press CLI library
//!
//! This module contains the core CLI logic for the mermaid-press tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;
pub use error_adapter::ErrorAdapter;

use log::info;

use mermaid_press::{BlockOutcome, PressError, Preprocessor, Processed, config::AppConfig};

/// Run the mermaid-press CLI application
///
/// Loads the configuration, applies command-line overrides, preprocesses
/// the input document and writes the result to the output path. A status
/// line is printed to stdout as soon as each diagram block is resolved. Failed renders do not make
/// the run fail.
///
/// # Errors
///
/// Returns `PressError` for:
/// - Missing input file
/// - Configuration loading errors
/// - File I/O errors
pub fn run(args: &Args) -> Result<Processed, PressError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing document"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    apply_overrides(&mut app_config, args);

    let preprocessor = Preprocessor::new(app_config)?;
    let processed =
        preprocessor.process_file_with(&args.input, &args.output, |index, total, outcome| {
            if index == 0 {
                println!("Found {total} mermaid diagram(s)");
            }
            println!("{}", block_status(outcome));
        })?;

    println!("{}", summary(&processed, &args.output));

    Ok(processed)
}

/// Command-line options take precedence over the configuration file.
fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(images_dir) = &args.images_dir {
        config.output_mut().set_images_dir(images_dir);
    }
    if args.reuse_existing {
        config.output_mut().set_reuse_existing(true);
    }
    if let Some(renderer) = &args.renderer {
        config.renderer_mut().set_command(renderer);
    }
    if let Some(width) = args.width {
        config.renderer_mut().set_width(width);
    }
    if let Some(timeout) = args.timeout {
        config.renderer_mut().set_timeout_secs(Some(timeout));
    }
}

/// Status line for one diagram block.
fn block_status(outcome: &BlockOutcome) -> String {
    let path = outcome.asset().path().display();
    match outcome {
        BlockOutcome::Rendered(_) => format!("✅ Generated: {path}"),
        BlockOutcome::Cached(_) => format!("✅ Reused existing: {path}"),
        BlockOutcome::Duplicate { first, available: true, .. } => {
            format!("✅ Same as diagram {}: {path}", first + 1)
        }
        BlockOutcome::Duplicate { first, .. } => {
            format!("❌ Same as failed diagram {}, left in place", first + 1)
        }
        BlockOutcome::Failed { error, .. } => {
            format!("❌ Failed to render {path}: {error}")
        }
    }
}

/// Closing line of a run.
fn summary(processed: &Processed, output: &str) -> String {
    if processed.outcomes().is_empty() {
        format!("No mermaid blocks found\nCopied unchanged to: {output}")
    } else {
        format!(
            "Processed markdown saved to: {output} ({} replaced, {} left in place)",
            processed.replaced_count(),
            processed.failed_count()
        )
    }
}
