//! Synchronous lazy line iteration over owned text.
//!
//! `Lines` splits a body of text once and hands out a `LineCursor`, an iterator
//! that returns one line per pull and signals exhaustion with `None`. The split
//! is performed up front; laziness here is about consumption, which is the
//! contract the async layer in [`crate::stream`] mirrors: incremental pulls must
//! observe exactly the sequence that eager materialization produces.
//!
//! Split semantics, shared with [`read_all_lines`] and the async pipeline:
//! lines are separated by `'\n'`, a `'\r'` immediately before the separator is
//! stripped, and a single empty segment produced by a terminal newline is
//! dropped. Interior empty lines are preserved.

/// A line-splittable view of an owned body of text.
pub struct Lines {
    text: String,
}

impl Lines {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self { text: text.into() }
    }
}

impl IntoIterator for Lines {
    type Item = String;
    type IntoIter = LineCursor;

    fn into_iter(self) -> LineCursor {
        LineCursor::new(split_lines(&self.text))
    }
}

/// Iterator over pre-split lines: a vector and a cursor, one line per pull.
pub struct LineCursor {
    lines: Vec<String>,
    pos: usize,
}

impl LineCursor {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines, pos: 0 }
    }

    /// Number of lines not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lines.len() - self.pos
    }
}

impl Iterator for LineCursor {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.pos >= self.lines.len() {
            return None;
        }
        let line = std::mem::take(&mut self.lines[self.pos]);
        self.pos += 1;
        Some(line)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rem = self.remaining();
        (rem, Some(rem))
    }
}

/// Eagerly materialize every line of `text`.
///
/// This is the contrast point for the incremental path: the full body must be
/// in hand before the first element is available.
pub fn read_all_lines(text: &str) -> Vec<String> {
    split_lines(text)
}

fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = text;
    while let Some(idx) = rest.find('\n') {
        let segment = &rest[..idx];
        // '\r' is part of the separator only when a '\n' follows it; an
        // unterminated tail keeps its bytes verbatim.
        lines.push(segment.strip_suffix('\r').unwrap_or(segment).to_string());
        rest = &rest[idx + 1..];
    }
    if !rest.is_empty() {
        lines.push(rest.to_string());
    }
    lines
}
