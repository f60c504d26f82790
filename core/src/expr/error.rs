use super::{context::Context, eval, lex, parse, position::Span};
use crate::utils;
use std::rc::Rc;

/// Diagnostic produced by any stage of the pipeline.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{}: {}", .kind.name(), .kind)]
pub struct Error {
    pub kind: Kind,
    pub span: Span,

    /// Evaluation context the error occurred in.
    /// Only set for runtime errors.
    pub context: Option<Rc<Context>>,
}

impl Error {
    pub fn new(kind: impl Into<Kind>, span: Span) -> Self {
        Self {
            kind: kind.into(),
            span,
            context: None,
        }
    }

    pub fn runtime(kind: eval::error::Kind, span: Span, context: Rc<Context>) -> Self {
        Self {
            kind: kind.into(),
            span,
            context: Some(context),
        }
    }

    /// Human readable report of the error, pointing at the offending source.
    pub fn render(&self) -> String {
        let start = &self.span.start;
        let source = start.source();

        let mut report = String::new();
        if let Some(context) = &self.context {
            report.push_str(&self.traceback(context));
        }
        report.push_str(&format!("{self}\n"));
        report.push_str(&format!("File {}, Line {}\n", source.name, start.line + 1));
        report.push_str(&utils::underline(&source.text, start, &self.span.end));
        report
    }

    /// Innermost frame last.
    fn traceback(&self, context: &Rc<Context>) -> String {
        let mut frames = vec![];
        let mut pos = Some(self.span.start.clone());
        let mut ctx = Some(context.clone());
        while let Some(frame) = ctx {
            let Some(entry) = pos else {
                break;
            };

            frames.push(format!(
                "  File {}, Line {}, in {}\n",
                entry.source().name,
                entry.line + 1,
                frame.display_name
            ));
            pos = frame.entry.clone();
            ctx = frame.parent.clone();
        }

        let mut traceback = String::from("Traceback (most recent call last):\n");
        for frame in frames.into_iter().rev() {
            traceback.push_str(&frame);
        }
        traceback
    }
}

#[derive(Debug, Clone, derive_more::From, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Kind {
    #[error("{0}")]
    Tokenize(lex::error::Kind),
    #[error("{0}")]
    Parse(parse::error::Kind),
    #[error("{0}")]
    Runtime(eval::error::Kind),
}

impl Kind {
    /// Name of the stage category the error belongs to.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tokenize(_) => "Illegal Character",
            Self::Parse(_) => "Invalid Syntax",
            Self::Runtime(_) => "Runtime Error",
        }
    }
}
