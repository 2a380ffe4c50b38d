//! Content-addressed names for rendered diagrams.
//!
//! An image name depends only on the diagram source, never on where the
//! block sits in the document. Identical sources therefore share one image,
//! both within a run and across runs.

use std::{
    borrow::Cow,
    path::{Component, Path, PathBuf},
};

use sha2::{Digest, Sha256};

/// Number of digest bytes kept in a name (twelve hex characters).
const TOKEN_BYTES: usize = 6;

/// Image file extension.
const EXTENSION: &str = "png";

/// Returns the image file name for a diagram source.
///
/// The name has the form `<prefix>_<token>.png`, where `token` is a fixed
/// width hex string derived from the source bytes.
///
/// # Examples
///
/// ```
/// # use mermaid_press::naming::asset_name;
/// let name = asset_name("mermaid", "graph TD\n  A --> B");
/// assert!(name.starts_with("mermaid_"));
/// assert!(name.ends_with(".png"));
/// assert_eq!(name, asset_name("mermaid", "graph TD\n  A --> B"));
/// ```
pub fn asset_name(prefix: &str, source: &str) -> String {
    let digest = Sha256::digest(source.as_bytes());
    format!("{prefix}_{}.{EXTENSION}", hex::encode(&digest[..TOKEN_BYTES]))
}

/// An image generated (or to be generated) for a diagram source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderedAsset {
    name: String,
    path: PathBuf,
    reference: String,
}

impl RenderedAsset {
    /// Names the asset for `source` inside `images_dir`.
    pub fn new(images_dir: &Path, prefix: &str, source: &str) -> Self {
        let name = asset_name(prefix, source);
        let path = images_dir.join(&name);
        let reference = markdown_path(images_dir, &name);
        Self {
            name,
            path,
            reference,
        }
    }

    /// Returns the file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the file system path the renderer writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the path used in the rewritten document.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Returns `true` if the image is already on disk.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

/// Joins the directory and file name with `/`, as Markdown links expect.
fn markdown_path(images_dir: &Path, name: &str) -> String {
    let segments: Vec<_> = images_dir
        .components()
        .map(|component| match component {
            // The join below supplies the separator after the root
            Component::RootDir => Cow::Borrowed(""),
            other => other.as_os_str().to_string_lossy(),
        })
        .collect();

    if segments.is_empty() {
        name.to_string()
    } else {
        format!("{}/{name}", segments.join("/"))
    }
}
