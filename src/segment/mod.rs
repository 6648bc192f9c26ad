//! Math segment detection.
//!
//! Splits a raw document string into an ordered sequence of prose and math
//! segments. Four delimiter conventions are recognized independently and
//! merged by source position:
//!
//! - `\begin{align*} ... \end{align*}` (display)
//! - `\[ ... \]` (display)
//! - `\( ... \)` (inline)
//! - `$ ... $` (inline)
//!
//! Document scaffolding (`\documentclass`, `\usepackage`, the
//! `\begin{document}`/`\end{document}` wrapper) has no visual representation
//! and is stripped before delimiter matching.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// The kind of one document segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SegmentKind {
    /// Plain prose
    Text,
    /// Math that flows within a line
    InlineMath,
    /// Math rendered on its own block
    DisplayMath,
}

impl SegmentKind {
    /// Whether this segment holds typesetting-engine source.
    pub fn is_math(&self) -> bool {
        !matches!(self, SegmentKind::Text)
    }
}

/// One atomic unit of document content.
///
/// Segments appear in the original left-to-right reading order; the content
/// is the delimiter-stripped inner text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment kind
    pub kind: SegmentKind,
    /// Prose for `Text`, typesetting source for the math kinds
    pub content: String,
}

impl Segment {
    /// Create a text segment.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Text,
            content: content.into(),
        }
    }

    /// Create an inline math segment.
    pub fn inline_math(content: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::InlineMath,
            content: content.into(),
        }
    }

    /// Create a display math segment.
    pub fn display_math(content: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::DisplayMath,
            content: content.into(),
        }
    }
}

/// A delimiter match before merging: span in the preprocessed document plus
/// the captured inner content.
#[derive(Debug)]
struct MathMatch {
    start: usize,
    end: usize,
    kind: SegmentKind,
    content: String,
}

/// Detects and orders math segments within a document string.
pub struct SegmentDetector {
    align_env: Regex,
    display_bracket: Regex,
    inline_paren: Regex,
    inline_dollar: Regex,
    documentclass: Regex,
    usepackage: Regex,
    document_env: Regex,
}

impl SegmentDetector {
    /// Create a detector with the four delimiter rules compiled.
    pub fn new() -> Self {
        Self {
            align_env: Regex::new(r"(?s)\\begin\{align\*\}(.+?)\\end\{align\*\}").unwrap(),
            display_bracket: Regex::new(r"(?s)\\\[([^\]]+)\\\]").unwrap(),
            inline_paren: Regex::new(r"(?s)\\\(([^)]+)\\\)").unwrap(),
            inline_dollar: Regex::new(r"\$([^$]+)\$").unwrap(),
            documentclass: Regex::new(r"\\documentclass\{[^}]+\}").unwrap(),
            usepackage: Regex::new(r"\\usepackage(?:\[[^\]]*\])?\{[^}]+\}").unwrap(),
            document_env: Regex::new(r"\\(?:begin|end)\{document\}").unwrap(),
        }
    }

    /// Remove whole-document scaffolding markup that has no visual output.
    ///
    /// Runs before delimiter matching; it is plain pattern removal, not part
    /// of segmentation proper.
    pub fn strip_scaffolding(&self, document: &str) -> String {
        let text = self.documentclass.replace_all(document, "");
        let text = self.usepackage.replace_all(&text, "");
        let text = self.document_env.replace_all(&text, "");
        text.into_owned()
    }

    /// Segment a document into ordered prose and math parts.
    ///
    /// Every input character belongs to exactly one segment after the
    /// delimiter markup is stripped; gap text is whitespace-trimmed and empty
    /// gaps are dropped.
    ///
    /// # Example
    /// ```
    /// use mathpress::segment::{SegmentDetector, SegmentKind};
    ///
    /// let detector = SegmentDetector::new();
    /// let segments = detector.segment("Solve: $x^2 + 1 = 0$ for real x.");
    /// assert_eq!(segments.len(), 3);
    /// assert_eq!(segments[1].kind, SegmentKind::InlineMath);
    /// ```
    pub fn segment(&self, document: &str) -> Vec<Segment> {
        let text = self.strip_scaffolding(document);

        let mut matches = Vec::new();
        self.collect(&self.align_env, &text, SegmentKind::DisplayMath, &mut matches);
        self.collect(&self.display_bracket, &text, SegmentKind::DisplayMath, &mut matches);
        self.collect(&self.inline_paren, &text, SegmentKind::InlineMath, &mut matches);
        self.collect(&self.inline_dollar, &text, SegmentKind::InlineMath, &mut matches);

        // Ties on start keep the longer match so the outermost rule wins.
        matches.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

        let mut segments = Vec::new();
        let mut cursor = 0usize;

        for m in matches {
            if m.start < cursor {
                // Overlaps an already-accepted span, e.g. $...$ inside \[...\].
                log::debug!(
                    "dropping overlapping {:?} match at {}..{} (cursor at {})",
                    m.kind,
                    m.start,
                    m.end,
                    cursor
                );
                continue;
            }
            push_text_gap(&mut segments, &text[cursor..m.start]);
            segments.push(Segment {
                kind: m.kind,
                content: m.content,
            });
            cursor = m.end;
        }
        push_text_gap(&mut segments, &text[cursor..]);

        segments
    }

    fn collect(&self, rule: &Regex, text: &str, kind: SegmentKind, out: &mut Vec<MathMatch>) {
        for caps in rule.captures_iter(text) {
            let whole = caps.get(0).unwrap();
            let inner = caps.get(1).unwrap();
            out.push(MathMatch {
                start: whole.start(),
                end: whole.end(),
                kind,
                content: inner.as_str().trim().to_string(),
            });
        }
    }
}

impl Default for SegmentDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn push_text_gap(segments: &mut Vec<Segment>, gap: &str) {
    let trimmed = gap.trim();
    if !trimmed.is_empty() {
        segments.push(Segment::text(trimmed));
    }
}
