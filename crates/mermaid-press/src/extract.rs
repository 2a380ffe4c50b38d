//! Fenced diagram block extraction.
//!
//! Blocks are found with a text pattern rather than a Markdown parser. A
//! block opens with a fence line carrying the language tag, holds any number
//! of lines (possibly none), and closes with a bare fence on its own line.
//! Anything that does not fit, such as an unterminated fence, is left alone
//! as ordinary text.

use std::ops::Range;

use log::{debug, trace};
use regex::Regex;

use crate::error::PressError;

/// One fenced diagram occurrence in a document.
///
/// The span indexes the original, unmodified text and covers the opening
/// fence, the body, the closing fence and its line terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramBlock {
    source: String,
    span: Range<usize>,
}

impl DiagramBlock {
    /// Creates a block from its body text and span.
    pub fn new(source: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            source: source.into(),
            span,
        }
    }

    /// Returns the diagram source between the fences.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the byte span of the whole fenced block.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns the start offset of the span.
    pub fn start(&self) -> usize {
        self.span.start
    }

    /// Returns the end offset of the span (exclusive).
    pub fn end(&self) -> usize {
        self.span.end
    }
}

/// Result of scanning a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The document has no diagram blocks; it passes through unchanged.
    Empty,
    /// Blocks in ascending span order.
    Blocks(Vec<DiagramBlock>),
}

impl Extraction {
    /// Returns the extracted blocks, empty for [`Extraction::Empty`].
    pub fn blocks(&self) -> &[DiagramBlock] {
        match self {
            Extraction::Empty => &[],
            Extraction::Blocks(blocks) => blocks,
        }
    }

    /// Returns `true` when no blocks were found.
    pub fn is_empty(&self) -> bool {
        matches!(self, Extraction::Empty)
    }
}

/// Scans documents for fenced blocks with a given language tag.
#[derive(Debug, Clone)]
pub struct Extractor {
    pattern: Regex,
}

impl Extractor {
    /// Builds an extractor for blocks tagged `language`.
    ///
    /// # Errors
    ///
    /// Returns [`PressError::Pattern`] if the block pattern cannot be compiled.
    pub fn new(language: &str) -> Result<Self, PressError> {
        // The body group is optional and lazy so that an empty block closes
        // on the very next line instead of running into a later fence.
        let pattern = format!(
            r"(?m)^```{}[ \t]*\r?\n(?s:(?:(.*?)\r?\n)??)```[ \t]*(?:\r?\n|\z)",
            regex::escape(language)
        );
        trace!(pattern; "Compiling block pattern");

        Ok(Self {
            pattern: Regex::new(&pattern)?,
        })
    }

    /// Returns every diagram block in `text`, in document order.
    pub fn extract(&self, text: &str) -> Extraction {
        let blocks: Vec<DiagramBlock> = self
            .pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let body = caps.get(1).map_or("", |m| m.as_str());
                Some(DiagramBlock::new(body, whole.range()))
            })
            .collect();

        debug!(blocks_count = blocks.len(); "Scanned document for diagram blocks");

        if blocks.is_empty() {
            Extraction::Empty
        } else {
            Extraction::Blocks(blocks)
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new("mermaid").expect("default block pattern is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Extraction {
        Extractor::default().extract(text)
    }

    #[test]
    fn test_no_blocks() {
        let extraction = extract("# Title\n\nJust prose.\n```rust\nfn main() {}\n```\n");
        assert!(extraction.is_empty());
        assert!(extraction.blocks().is_empty());
    }

    #[test]
    fn test_single_block_span_and_body() {
        let text = "A\n```mermaid\nB\n```\nC\n";
        let extraction = extract(text);
        let blocks = extraction.blocks();

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].source(), "B");
        assert_eq!(&text[blocks[0].span()], "```mermaid\nB\n```\n");
        assert_eq!(&text[blocks[0].end()..], "C\n");
    }

    #[test]
    fn test_multiline_body_with_blank_lines() {
        let text = "```mermaid\nflowchart LR\n\n  A --> B\n\n```\n";
        let extraction = extract(text);
        let blocks = extraction.blocks();

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].source(), "flowchart LR\n\n  A --> B\n");
    }

    #[test]
    fn test_blocks_in_document_order() {
        let text = "```mermaid\nfirst\n```\ntext\n```mermaid\nsecond\n```";
        let extraction = extract(text);
        let blocks = extraction.blocks();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].source(), "first");
        assert_eq!(blocks[1].source(), "second");
        assert!(blocks[0].end() <= blocks[1].start());
        // Closing fence at end of input without a newline
        assert_eq!(blocks[1].end(), text.len());
    }

    #[test]
    fn test_empty_body_does_not_swallow_next_block() {
        let text = "```mermaid\n```\nbetween\n```mermaid\nX\n```\n";
        let extraction = extract(text);
        let blocks = extraction.blocks();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].source(), "");
        assert_eq!(&text[blocks[0].span()], "```mermaid\n```\n");
        assert_eq!(blocks[1].source(), "X");
    }

    #[test]
    fn test_unterminated_block_is_ignored() {
        let text = "intro\n```mermaid\ngraph TD\n  A --> B\n";
        assert!(extract(text).is_empty());
    }

    #[test]
    fn test_other_languages_are_ignored() {
        let text = "```mermaidx\nA\n```\n```python\nprint(1)\n```\n";
        assert!(extract(text).is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = "A\r\n```mermaid\r\ngraph TD\r\n```\r\nC\r\n";
        let extraction = extract(text);
        let blocks = extraction.blocks();

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].source(), "graph TD");
        assert_eq!(&text[blocks[0].end()..], "C\r\n");
    }

    #[test]
    fn test_custom_language_tag() {
        let extractor = Extractor::new("plantuml").expect("valid pattern");
        let text = "```plantuml\n@startuml\n```\n```mermaid\nA\n```\n";
        let extraction = extractor.extract(text);

        assert_eq!(extraction.blocks().len(), 1);
        assert_eq!(extraction.blocks()[0].source(), "@startuml");
    }
}
