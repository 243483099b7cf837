use std::fmt;

use thiserror::Error;

use crate::span::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub span: Option<Span>,
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.push_error_with_span(message, None);
    }

    pub fn push_error_with_span<S: Into<String>>(&mut self, message: S, span: Option<Span>) {
        self.entries.push(Diagnostic {
            message: message.into(),
            span,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|diagnostic| diagnostic.message.clone())
            .collect()
    }
}

/// Every error from a strict parse, reported together once the pass is over.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ParseError {
    pub errors: Vec<String>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "parser has {} errors", self.errors.len())?;
        writeln!(f)?;
        for error in &self.errors {
            writeln!(f, "ERROR: {error}")?;
        }
        Ok(())
    }
}
