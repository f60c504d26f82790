use crate::expr::position::Position;

/// Render the lines of `text` between `start` and `end`,
/// each followed by a line of carets under the covered columns.
/// At least one caret is drawn per line.
///
/// # Examples
/// ```
/// # use abacus_core::expr::position::{Position, Source};
/// # use abacus_core::utils::underline;
/// # use std::rc::Rc;
/// let source = Rc::new(Source::new("<doc>", "1 + x"));
/// let start = (0..4).fold(Position::start(source.clone()), |pos, _| pos.advance(Some(' ')));
/// let end = start.advance(Some('x'));
/// assert_eq!(underline(&source.text, &start, &end), "1 + x\n    ^");
/// ```
pub fn underline(text: &str, start: &Position, end: &Position) -> String {
    // a span ending at the start of a line does not cover it
    let last = if end.line > start.line && end.col == 0 {
        end.line - 1
    } else {
        end.line
    };

    let mut lines = vec![];
    for (idx, line) in text
        .split('\n')
        .enumerate()
        .skip(start.line)
        .take(last.saturating_sub(start.line) + 1)
    {
        let col_start = if idx == start.line { start.col } else { 0 };
        let col_end = if idx == end.line {
            end.col
        } else {
            line.chars().count()
        };
        let width = col_end.saturating_sub(col_start).max(1);

        lines.push(line.to_string());
        lines.push(format!("{}{}", " ".repeat(col_start), "^".repeat(width)));
    }

    lines.join("\n")
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::expr::position::Source;
    use std::rc::Rc;

    /// Position after consuming `count` characters of `source`.
    fn position(source: &Rc<Source>, count: usize) -> Position {
        let mut chars = source.text.chars();
        (0..count).fold(Position::start(source.clone()), |pos, _| {
            pos.advance(chars.next())
        })
    }

    #[test]
    fn underline_single_line() {
        let source = Rc::new(Source::new("<test>", "12 + abc"));
        let start = position(&source, 5);
        let end = position(&source, 8);
        assert_eq!(underline(&source.text, &start, &end), "12 + abc\n     ^^^");

        let start = position(&source, 0);
        assert_eq!(underline(&source.text, &start, &end), "12 + abc\n^^^^^^^^");
    }

    #[test]
    fn underline_empty_span() {
        let source = Rc::new(Source::new("<test>", "1 +"));
        let start = position(&source, 3);
        assert_eq!(underline(&source.text, &start, &start), "1 +\n   ^");
    }

    #[test]
    fn underline_multi_line() {
        let source = Rc::new(Source::new("<test>", "ab\ncd\nef"));
        let start = position(&source, 1);
        let end = position(&source, 7);
        assert_eq!(end.line, 2);
        assert_eq!(
            underline(&source.text, &start, &end),
            "ab\n ^\ncd\n^^\nef\n^"
        );
    }

    #[test]
    fn underline_ends_at_line_start() {
        let source = Rc::new(Source::new("<test>", "a\nb"));
        let start = position(&source, 1);
        let end = position(&source, 2);
        assert_eq!(underline(&source.text, &start, &end), "a\n ^");
    }
}
