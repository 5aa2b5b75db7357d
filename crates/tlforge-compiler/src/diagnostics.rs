//! Builder-pattern printer for rendering compile errors against their source.

use std::fmt::Write;
use std::ops::Range;

use annotate_snippets::{AnnotationKind, Level, Renderer, Snippet};

use crate::Error;

/// Builder for rendering one compile error with various options.
pub struct ErrorPrinter<'e, 's> {
    error: &'e Error,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'e, 's> ErrorPrinter<'e, 's> {
    pub fn new(error: &'e Error) -> Self {
        Self {
            error,
            source: None,
            path: None,
            colored: false,
        }
    }

    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a `String` cannot fail.
        let _ = self.format(&mut out);
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let Some(source) = self.source else {
            return write!(w, "{}", self.error);
        };

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        let message = self.error.message();
        let mut snippet = Snippet::source(source).line_start(1).annotation(
            AnnotationKind::Primary
                .span(adjust_range(self.error.span(), source.len()))
                .label(&message),
        );
        if let Some(p) = self.path {
            snippet = snippet.path(p);
        }

        let report = [Level::ERROR.primary_title(&message).element(snippet)];
        write!(w, "{}", renderer.render(&report))
    }
}

/// Widens an empty span to one character and clamps it to the source.
fn adjust_range(range: Range<usize>, limit: usize) -> Range<usize> {
    let start = range.start.min(limit);
    let end = range.end.min(limit);

    if start == end {
        return start..(start + 1).min(limit);
    }

    start..end
}

impl Error {
    pub fn printer(&self) -> ErrorPrinter<'_, '_> {
        ErrorPrinter::new(self)
    }
}

/// Renders `error` against the schema text it came from, without color.
pub fn render(error: &Error, source: &str) -> String {
    error.printer().source(source).render()
}
