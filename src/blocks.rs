//! Markdown block discovery
//!
//! Finds fenced `progress-bar` code blocks in a document and yields their
//! raw source text for the directive parser.

/// One fenced block found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// 1-based line number of the opening fence
    pub line: usize,
    /// Raw text between the fences
    pub source: String,
}

/// Extract every fenced `progress-bar` block from `document`.
/// Fences inside other code blocks are not matched; an unterminated fence
/// yields nothing.
pub fn extract(document: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut bar: Option<(usize, Vec<&str>)> = None;
    let mut in_other_fence = false;

    for (idx, line) in document.lines().enumerate() {
        let trimmed = line.trim_start();

        if let Some((start, mut lines)) = bar.take() {
            if trimmed.starts_with("```") {
                blocks.push(Block {
                    line: start,
                    source: lines.join("\n"),
                });
            } else {
                lines.push(line);
                bar = Some((start, lines));
            }
            continue;
        }

        if in_other_fence {
            if trimmed.starts_with("```") {
                in_other_fence = false;
            }
            continue;
        }

        if let Some(info) = trimmed.strip_prefix("```") {
            if info.trim() == "progress-bar" {
                bar = Some((idx + 1, Vec::new()));
            } else {
                in_other_fence = true;
            }
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_single_block() {
        let doc = "# Notes\n\n```progress-bar\ntotal: 100\nname: reading\n```\n";
        let blocks = extract(doc);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].line, 3);
        assert_eq!(blocks[0].source, "total: 100\nname: reading");
    }

    #[test]
    fn test_extract_multiple_blocks() {
        let doc = "```progress-bar\nname: one\n```\n\ntext\n\n```progress-bar\nname: two\n```\n";
        let blocks = extract(doc);

        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].source.contains("one"));
        assert!(blocks[1].source.contains("two"));
    }

    #[test]
    fn test_other_languages_ignored() {
        let doc = "```rust\nfn main() {}\n```\n\n```progress-bar\nname: a\n```\n";
        let blocks = extract(doc);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].source, "name: a");
    }

    #[test]
    fn test_fence_inside_other_block_not_matched() {
        let doc = "````\n```progress-bar\nname: trap\n```\n````\n";
        let blocks = extract(doc);

        // The inner fence lives inside another code block
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_unterminated_block_dropped() {
        let doc = "```progress-bar\nname: a\ntotal: 10\n";
        assert!(extract(doc).is_empty());
    }

    #[test]
    fn test_empty_block() {
        let doc = "```progress-bar\n```\n";
        let blocks = extract(doc);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].source, "");
    }

    #[test]
    fn test_indented_fence() {
        let doc = "  ```progress-bar\n  total: 10\n  name: a\n  ```\n";
        let blocks = extract(doc);

        assert_eq!(blocks.len(), 1);
        // Inner indentation is preserved; the parser trims per directive
        assert!(blocks[0].source.contains("total: 10"));
    }

    #[test]
    fn test_no_blocks() {
        assert!(extract("just prose\n").is_empty());
    }
}
