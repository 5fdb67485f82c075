use std::ops::Range;

use codespan_reporting::diagnostic::Label;

/// A slice of text in one of the files handed to the compiler.
///
/// Spans are built for `codespan-reporting`: the [`Span::primary_label`]
/// and [`Span::secondary_label`] methods produce the labels diagnostics
/// are assembled from.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    start: usize,
    end: usize,
    file_id: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, file_id: usize) -> Self {
        debug_assert!(start <= end, "Span start must be before span end");
        Self {
            start,
            end,
            file_id,
        }
    }

    pub fn from_range(range: Range<usize>, file_id: usize) -> Self {
        Self::new(range.start, range.end, file_id)
    }

    /// A span covering `s1` through `s2`. Both must be in the same file.
    pub fn merge(s1: Self, s2: Self) -> Self {
        debug_assert_eq!(s1.file_id, s2.file_id);
        Self::new(s1.start, s2.end, s1.file_id)
    }

    pub fn primary_label(&self, message: impl Into<String>) -> Label<usize> {
        Label::primary(self.file_id, self.range()).with_message(message)
    }

    pub fn secondary_label(&self, message: impl Into<String>) -> Label<usize> {
        Label::secondary(self.file_id, self.range()).with_message(message)
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn file_id(&self) -> usize {
        self.file_id
    }
}
