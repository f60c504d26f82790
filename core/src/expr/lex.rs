use super::{
    error::Error,
    position::{Position, Source, Span, WithSpan},
    token::{self, Token},
};
use std::{iter, rc::Rc};

#[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip_all, fields(name = %name.as_ref())))]
pub fn tokenize(name: impl AsRef<str>, src: impl AsRef<str>) -> Result<Lex, Error> {
    let source = Rc::new(Source::new(name.as_ref(), src.as_ref()));
    let mut lexer = Lexer::new(&source);
    lexer.tokenize()?;
    Ok(lexer.into())
}

/// Tokens of a source.
/// Always terminated by a single [`Token::Eof`].
#[derive(Debug)]
pub struct Lex {
    tokens: Vec<WithSpan<Token>>,
}

impl Lex {
    pub fn tokens(&self) -> &[WithSpan<Token>] {
        &self.tokens
    }

    /// Number of tokens, including the `Eof` token.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// If the source contained no tokens other than `Eof`.
    pub fn is_empty(&self) -> bool {
        self.tokens.len() == 1
    }
}

struct Scanner<'a> {
    /// Iterator over src characters.
    iter: std::str::Chars<'a>,

    /// Position of the next character.
    pos: Position,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a Rc<Source>) -> Self {
        Self {
            iter: source.text.chars(),
            pos: Position::start(source.clone()),
        }
    }

    pub fn pos(&self) -> &Position {
        &self.pos
    }

    /// Peek at the next character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.iter.clone().next()
    }

    /// Consume the next character if it is equal to the expected one.
    pub fn next_if_eq(&mut self, expected: char) -> Option<char> {
        if self.peek() == Some(expected) {
            self.next()
        } else {
            None
        }
    }
}

impl<'a> iter::Iterator for Scanner<'a> {
    type Item = char;
    fn next(&mut self) -> Option<Self::Item> {
        let char = self.iter.next()?;
        #[cfg(feature = "tracing")]
        tracing::trace!(?char);

        self.pos = self.pos.advance(Some(char));
        Some(char)
    }
}

struct Lexer<'a> {
    /// Source code input.
    it: Scanner<'a>,
    tokens: Vec<WithSpan<Token>>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a Rc<Source>) -> Self {
        Self {
            it: Scanner::new(source),
            tokens: vec![],
        }
    }

    /// Stops at the first error.
    pub fn tokenize(&mut self) -> Result<(), Error> {
        while let Some(token) = self.match_next_token() {
            self.tokens.push(token?);
        }

        let end = self.it.pos().clone();
        let eof_end = end.advance(None);
        self.tokens.push(WithSpan::new(Token::Eof, end, eof_end));
        Ok(())
    }

    /// Validates if the character can start an identifier.
    /// Valid characters are alphabetic (`a-z`, `A-Z`).
    fn is_valid_ident_start(ch: &char) -> bool {
        ch.is_ascii_alphabetic()
    }

    /// Validates if the character is valid within an identifier.
    /// Valid characters are alphanumeric (`a-z`, `A-Z`, `0-9`) and underscore (`_`).
    fn is_valid_ident_char(ch: &char) -> bool {
        ch.is_ascii_alphanumeric() || *ch == '_'
    }
}

impl<'a> Lexer<'a> {
    fn next_if_else(&mut self, to_match: char, matched: Token, unmatched: Token) -> Token {
        if self.it.next_if_eq(to_match).is_some() {
            matched
        } else {
            unmatched
        }
    }

    fn next_while<F>(&mut self, predicate: F) -> Vec<char>
    where
        F: Fn(char) -> bool,
    {
        let mut chars = vec![];
        while let Some(ch) = self.it.peek() {
            if !predicate(ch) {
                break;
            }
            self.it.next();
            chars.push(ch);
        }
        chars
    }

    fn match_next_token(&mut self) -> Option<Result<WithSpan<Token>, Error>> {
        self.next_while(|ch| ch == ' ' || ch == '\t');
        let pos_start = self.it.pos().clone();
        let char = self.it.next()?;

        let token = match char {
            '+' => Ok(Token::Plus),
            '-' => Ok(Token::Minus),
            '*' => Ok(Token::Star),
            '/' => Ok(Token::SlashForward),
            '^' => Ok(Token::Caret),
            '(' => Ok(Token::ParenLeft),
            ')' => Ok(Token::ParenRight),
            '<' => Ok(self.next_if_else('=', Token::LessEqual, Token::Less)),
            '>' => Ok(self.next_if_else('=', Token::GreaterEqual, Token::Greater)),
            '=' => Ok(self.next_if_else('=', Token::EqualEqual, Token::Equal)),

            '!' => {
                if self.it.next_if_eq('=').is_some() {
                    Ok(Token::BangEqual)
                } else {
                    Err(error::Kind::ExpectedCharacter {
                        expected: '=',
                        after: '!',
                    })
                }
            }

            char if char.is_ascii_digit() => self.number(char),
            '.' if self.it.peek().is_some_and(|ch| ch.is_ascii_digit()) => self.number(char),

            char if Self::is_valid_ident_start(&char) => {
                let rest = self.next_while(|ch| Self::is_valid_ident_char(&ch));
                let value = iter::once(char).chain(rest).collect::<String>();
                match token::Keyword::from_str(&value) {
                    Some(word) => Ok(Token::Keyword(word)),
                    None => Ok(Token::Identifier(value)),
                }
            }

            char => Err(error::Kind::IllegalCharacter(char)),
        };

        let span = Span::new(pos_start, self.it.pos().clone());
        #[cfg(feature = "tracing")]
        tracing::debug!(?token, idx = span.start.idx);

        Some(match token {
            Ok(token) => Ok(WithSpan {
                value: token,
                span,
            }),
            Err(kind) => Err(Error::new(kind, span)),
        })
    }

    /// Scan the rest of a number whose first character has been consumed.
    /// At most one radix point is consumed; a second one ends the number.
    fn number(&mut self, first: char) -> Result<Token, error::Kind> {
        let mut radix = first == '.';
        let mut value = String::from(first);
        while let Some(ch) = self.it.peek() {
            if ch.is_ascii_digit() {
                value.push(ch);
            } else if ch == '.' && !radix {
                radix = true;
                value.push(ch);
            } else {
                break;
            }
            self.it.next();
        }

        if !radix && let Ok(value) = value.parse::<i64>() {
            return Ok(Token::Int(value));
        }

        value
            .parse::<f64>()
            .map(Token::Float)
            .map_err(|_| error::Kind::InvalidNumber(value))
    }
}

impl<'a> Into<Lex> for Lexer<'a> {
    fn into(self) -> Lex {
        Lex {
            tokens: self.tokens,
        }
    }
}

pub mod error {
    #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub enum Kind {
        /// A character outside of the language was encountered.
        #[error("'{0}'")]
        IllegalCharacter(char),

        /// A character may only be followed by a specific character.
        /// e.g. `!` must be followed by `=`.
        #[error("expected '{expected}' after '{after}'")]
        ExpectedCharacter { expected: char, after: char },

        /// Could not parse the digits as a number.
        /// Digits with at most one radix point always parse as a float,
        /// so scanned numbers do not produce this.
        #[error("invalid number '{0}'")]
        InvalidNumber(String),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::expr::error::Kind as ErrorKind;
    use error::Kind;

    fn kinds(lex: &Lex) -> Vec<token::Kind> {
        lex.tokens()
            .iter()
            .map(|token| token::Kind::from_token(&token.value))
            .collect()
    }

    fn tokenize_err(src: &str) -> (Kind, Span) {
        let err = tokenize("<test>", src).expect_err("input should be invalid");
        match err.kind {
            ErrorKind::Tokenize(kind) => (kind, err.span),
            kind => panic!("expected tokenize error, found {kind:?}"),
        }
    }

    #[test]
    fn tokenize_empty() {
        let lex = tokenize("<test>", "").expect("input to be valid");
        assert!(lex.is_empty());
        assert_eq!(kinds(&lex), vec![token::Kind::Eof]);

        let lex = tokenize("<test>", " \t ").expect("input to be valid");
        assert!(lex.is_empty());
        let eof = &lex.tokens()[0];
        assert_eq!(eof.span.start.idx, 3);
        assert_eq!(eof.span.end.idx, 4);
    }

    #[test]
    fn tokenize_number() {
        let lex = tokenize("<test>", "3").expect("input to be valid");
        assert_eq!(lex.len(), 2);
        assert_eq!(lex.tokens()[0].value, Token::Int(3));

        let lex = tokenize("<test>", "0").expect("input to be valid");
        assert_eq!(lex.tokens()[0].value, Token::Int(0));

        let lex = tokenize("<test>", "0.0").expect("input to be valid");
        assert_eq!(lex.tokens()[0].value, Token::Float(0.0));

        let lex = tokenize("<test>", "3.25").expect("input to be valid");
        assert_eq!(lex.len(), 2);
        assert_eq!(lex.tokens()[0].value, Token::Float(3.25));
        assert_eq!(lex.tokens()[0].span.start.idx, 0);
        assert_eq!(lex.tokens()[0].span.end.idx, 4);

        let lex = tokenize("<test>", "12.").expect("input to be valid");
        assert_eq!(lex.tokens()[0].value, Token::Float(12.0));

        let lex = tokenize("<test>", ".5").expect("input to be valid");
        assert_eq!(lex.tokens()[0].value, Token::Float(0.5));
    }

    #[test]
    fn tokenize_number_overflow_is_float() {
        let lex = tokenize("<test>", "100000000000000000000").expect("input to be valid");
        assert_eq!(lex.tokens()[0].value, Token::Float(1e20));
    }

    #[test]
    fn tokenize_number_out_of_range_is_infinite() {
        let src = format!("{}.5", "9".repeat(400));
        let lex = tokenize("<test>", &src).expect("input to be valid");
        assert_eq!(lex.len(), 2);
        assert_eq!(lex.tokens()[0].value, Token::Float(f64::INFINITY));
    }

    #[test]
    fn tokenize_number_multiple_radix_points() {
        let lex = tokenize("<test>", "1.2.3").expect("input to be valid");
        assert_eq!(lex.len(), 3);
        assert_eq!(lex.tokens()[0].value, Token::Float(1.2));
        assert_eq!(lex.tokens()[1].value, Token::Float(0.3));
        assert_eq!(lex.tokens()[1].span.start.idx, 3);
        assert_eq!(lex.tokens()[2].value, Token::Eof);

        let lex = tokenize("<test>", "1..2").expect("input to be valid");
        assert_eq!(lex.len(), 3);
        assert_eq!(lex.tokens()[0].value, Token::Float(1.0));
        assert_eq!(lex.tokens()[1].value, Token::Float(0.2));
    }

    #[test]
    fn tokenize_operators() {
        let lex = tokenize("<test>", "+-*/^()= == != < <= > >=").expect("input to be valid");
        assert_eq!(
            kinds(&lex),
            vec![
                token::Kind::Plus,
                token::Kind::Minus,
                token::Kind::Star,
                token::Kind::SlashForward,
                token::Kind::Caret,
                token::Kind::ParenLeft,
                token::Kind::ParenRight,
                token::Kind::Equal,
                token::Kind::EqualEqual,
                token::Kind::BangEqual,
                token::Kind::Less,
                token::Kind::LessEqual,
                token::Kind::Greater,
                token::Kind::GreaterEqual,
                token::Kind::Eof,
            ]
        );

        let lex = tokenize("<test>", "a<=b").expect("input to be valid");
        let le = &lex.tokens()[1];
        assert_eq!(le.value, Token::LessEqual);
        assert_eq!(le.span.start.col, 1);
        assert_eq!(le.span.end.col, 3);
    }

    #[test]
    fn tokenize_ident() {
        let lex = tokenize("<test>", "a").expect("input to be valid");
        assert_eq!(lex.tokens()[0].value, Token::Identifier("a".to_string()));

        let lex = tokenize("<test>", "a_b2").expect("input to be valid");
        assert_eq!(lex.len(), 2);
        assert_eq!(lex.tokens()[0].value, Token::Identifier("a_b2".to_string()));

        let lex = tokenize("<test>", "var").expect("input to be valid");
        assert_eq!(lex.tokens()[0].value, Token::Identifier("var".to_string()));
    }

    #[test]
    fn tokenize_keyword() {
        let reserved = [
            token::Keyword::Var,
            token::Keyword::And,
            token::Keyword::Or,
            token::Keyword::Not,
        ];
        for word in reserved {
            let lex = tokenize("<test>", word.as_str()).expect("input to be valid");
            assert_eq!(lex.len(), 2);
            assert_eq!(lex.tokens()[0].value, Token::Keyword(word));
        }
    }

    #[test]
    fn tokenize_illegal_character() {
        let (kind, span) = tokenize_err("@");
        assert_eq!(kind, Kind::IllegalCharacter('@'));
        assert_eq!(span.start.idx, 0);
        assert_eq!(span.end.idx, 1);

        let (kind, span) = tokenize_err("1 + $");
        assert_eq!(kind, Kind::IllegalCharacter('$'));
        assert_eq!(span.start.col, 4);
        assert_eq!(span.end.col, 5);

        let (kind, _) = tokenize_err("_a");
        assert_eq!(kind, Kind::IllegalCharacter('_'));

        let (kind, _) = tokenize_err("1\n2");
        assert_eq!(kind, Kind::IllegalCharacter('\n'));
    }

    #[test]
    fn tokenize_bang_without_equal() {
        let (kind, span) = tokenize_err("1 ! 2");
        assert_eq!(
            kind,
            Kind::ExpectedCharacter {
                expected: '=',
                after: '!'
            }
        );
        assert_eq!(span.start.idx, 2);
        assert_eq!(span.end.idx, 3);

        let (kind, _) = tokenize_err("!");
        assert!(matches!(kind, Kind::ExpectedCharacter { .. }));
    }
}
