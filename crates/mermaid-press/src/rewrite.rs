//! Splicing image references into the document.
//!
//! The output is assembled front to back in a fresh buffer: text between
//! blocks is copied verbatim and each resolved block is replaced by an
//! image reference. Spans always index the original text, so no offset
//! bookkeeping is needed as replacements change the length.

use std::fmt;

use crate::extract::DiagramBlock;

/// Image reference fragment written in place of a rendered block.
///
/// Renders as `\n![alt](path){ width=... }\n`, the attribute syntax that
/// pandoc understands when producing PDF output. Paths with spaces or
/// parentheses are written as `<path>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference<'a> {
    alt: &'a str,
    path: &'a str,
    width: &'a str,
}

impl<'a> ImageReference<'a> {
    /// Creates a reference to the image at `path`.
    pub fn new(alt: &'a str, path: &'a str, width: &'a str) -> Self {
        Self { alt, path, width }
    }
}

impl fmt::Display for ImageReference<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Spaces and parentheses end a bare link destination early
        let bracketed = self
            .path
            .contains(|c: char| c.is_whitespace() || c == '(' || c == ')');
        if bracketed {
            write!(f, "\n![{}](<{}>)", self.alt, self.path)?;
        } else {
            write!(f, "\n![{}]({})", self.alt, self.path)?;
        }
        writeln!(f, "{{ width={} }}", self.width)
    }
}

/// Rewrites `original`, replacing each block paired with `Some(fragment)`.
///
/// Blocks paired with `None` keep their original fenced text. `resolutions`
/// must be in ascending span order with non-overlapping spans, as produced
/// by [`Extractor::extract`](crate::extract::Extractor::extract).
pub fn rewrite<'b, I>(original: &str, resolutions: I) -> String
where
    I: IntoIterator<Item = (&'b DiagramBlock, Option<String>)>,
{
    let mut output = String::with_capacity(original.len());
    let mut cursor = 0;

    for (block, fragment) in resolutions {
        let Some(fragment) = fragment else {
            continue;
        };
        debug_assert!(cursor <= block.start(), "blocks must be sorted");
        output.push_str(&original[cursor..block.start()]);
        output.push_str(&fragment);
        cursor = block.end();
    }

    output.push_str(&original[cursor..]);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_at(text: &str, fenced: &str, source: &str) -> DiagramBlock {
        let start = text.find(fenced).expect("fenced text present");
        DiagramBlock::new(source, start..start + fenced.len())
    }

    #[test]
    fn test_reference_format() {
        let fragment = ImageReference::new("Diagram", "images/mermaid_abc.png", "80%");
        assert_eq!(
            fragment.to_string(),
            "\n![Diagram](images/mermaid_abc.png){ width=80% }\n"
        );
    }

    #[test]
    fn test_reference_with_spaces_and_parens() {
        let spaced = ImageReference::new("Diagram", "my docs/images/m.png", "80%");
        assert_eq!(
            spaced.to_string(),
            "\n![Diagram](<my docs/images/m.png>){ width=80% }\n"
        );

        let parens = ImageReference::new("Diagram", "out(1)/m.png", "50%");
        assert_eq!(
            parens.to_string(),
            "\n![Diagram](<out(1)/m.png>){ width=50% }\n"
        );
    }

    #[test]
    fn test_replaces_resolved_block() {
        let text = "A\n```mermaid\nB\n```\nC\n";
        let block = block_at(text, "```mermaid\nB\n```\n", "B");

        let output = rewrite(text, [(&block, Some("\n![D](x.png)\n".to_string()))]);

        assert_eq!(output, "A\n\n![D](x.png)\nC\n");
    }

    #[test]
    fn test_failed_block_is_left_verbatim() {
        let text = "before\n```mermaid\nfirst\n```\nmiddle\n```mermaid\nsecond\n```\nafter";
        let first = block_at(text, "```mermaid\nfirst\n```\n", "first");
        let second = block_at(text, "```mermaid\nsecond\n```\n", "second");

        let output = rewrite(text, [(&first, None), (&second, Some("[2]".to_string()))]);

        assert_eq!(output, "before\n```mermaid\nfirst\n```\nmiddle\n[2]after");
    }

    #[test]
    fn test_no_resolutions_is_identity() {
        let text = "  leading spaces\n\n\ttabs\r\ntrailing  ";
        let none: Vec<(&DiagramBlock, Option<String>)> = Vec::new();
        assert_eq!(rewrite(text, none), text);
    }

    #[test]
    fn test_adjacent_blocks() {
        let text = "```mermaid\nA\n```\n```mermaid\nB\n```\n";
        let a = block_at(text, "```mermaid\nA\n```\n", "A");
        let b = block_at(text, "```mermaid\nB\n```\n", "B");

        let output = rewrite(
            text,
            [(&a, Some("<a>".to_string())), (&b, Some("<b>".to_string()))],
        );

        assert_eq!(output, "<a><b>");
    }
}
