use std::rc::Rc;

/// Named source text that positions point into.
#[derive(Debug, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub text: String,
}

impl Source {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Cursor into a [`Source`].
///
/// + `idx` is a byte offset into the source text.
/// + `line` and `col` are zero based, `col` counts characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub idx: usize,
    pub line: usize,
    pub col: usize,
    source: Rc<Source>,
}

impl Position {
    /// Position at the beginning of the source.
    pub fn start(source: Rc<Source>) -> Self {
        Self {
            idx: 0,
            line: 0,
            col: 0,
            source,
        }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Position after passing over `current`.
    /// `None` steps one past the end of input.
    pub fn advance(&self, current: Option<char>) -> Self {
        let mut next = self.clone();
        next.idx += current.map_or(1, char::len_utf8);
        next.col += 1;
        if current == Some('\n') {
            next.line += 1;
            next.col = 0;
        }

        next
    }
}

/// Half open range between two positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Span from the start of `self` to the end of `other`.
    pub fn to(&self, other: &Span) -> Self {
        Self {
            start: self.start.clone(),
            end: other.end.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WithSpan<T> {
    pub value: T,
    pub span: Span,
}

impl<T> WithSpan<T> {
    pub fn new(value: T, start: Position, end: Position) -> Self {
        Self {
            value,
            span: Span::new(start, end),
        }
    }
}
