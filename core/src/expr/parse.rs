//! Recursive descent parser.
//!
//! Grammar, lowest to highest precedence:
//! ```text
//! expr       := VAR IDENTIFIER '=' expr
//!             | comparison ( (AND | OR) comparison )*
//! comparison := NOT comparison
//!             | arith ( (== | != | < | <= | > | >=) arith )*
//! arith      := term ( (+ | -) term )*
//! term       := factor ( (* | /) factor )*
//! factor     := (+ | -) factor | power
//! power      := atom ( ^ factor )*
//! atom       := INT | FLOAT | IDENTIFIER | '(' expr ')'
//! ```
//!
//! # Errors
//! A rule that fails without consuming any tokens reports what it expected.
//! Once a rule has consumed tokens, the error from deeper in the grammar is kept.
use super::{
    ast,
    error::Error,
    lex,
    position::WithSpan,
    token::{self, Token},
    value::Number,
};

/// Tokens that may begin an expression.
static EXPR_START: &[token::Kind] = &[
    token::Kind::Keyword(token::Keyword::Var),
    token::Kind::Int,
    token::Kind::Float,
    token::Kind::Identifier,
    token::Kind::Plus,
    token::Kind::Minus,
    token::Kind::ParenLeft,
    token::Kind::Keyword(token::Keyword::Not),
];

/// Tokens that may begin a comparison.
static COMPARISON_START: &[token::Kind] = &[
    token::Kind::Int,
    token::Kind::Float,
    token::Kind::Identifier,
    token::Kind::Plus,
    token::Kind::Minus,
    token::Kind::ParenLeft,
    token::Kind::Keyword(token::Keyword::Not),
];

/// Tokens that may begin a factor.
static ATOM_START: &[token::Kind] = &[
    token::Kind::Int,
    token::Kind::Float,
    token::Kind::Identifier,
    token::Kind::Plus,
    token::Kind::Minus,
    token::Kind::ParenLeft,
];

static OPS_LOGICAL: &[token::Kind] = &[
    token::Kind::Keyword(token::Keyword::And),
    token::Kind::Keyword(token::Keyword::Or),
];

static OPS_COMPARISON: &[token::Kind] = &[
    token::Kind::EqualEqual,
    token::Kind::BangEqual,
    token::Kind::Less,
    token::Kind::LessEqual,
    token::Kind::Greater,
    token::Kind::GreaterEqual,
];

static OPS_SUM: &[token::Kind] = &[token::Kind::Plus, token::Kind::Minus];
static OPS_PRODUCT: &[token::Kind] = &[token::Kind::Star, token::Kind::SlashForward];
static OPS_EXPONENT: &[token::Kind] = &[token::Kind::Caret];

/// Maximum depth of groups and prefix operators.
const MAX_NESTING: usize = 64;

/// Maximum number of binary operations in one expression.
const MAX_OPERATIONS: usize = 256;

type Rule = for<'p, 'a> fn(&'p mut Parser<'a>) -> Result<ast::Expr, Error>;

struct Parser<'a> {
    /// Never empty, ends with `Eof`.
    tokens: &'a [WithSpan<Token>],
    cursor: usize,

    /// Current depth of nested rules.
    nesting: usize,

    /// Binary operations parsed so far.
    operations: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [WithSpan<Token>]) -> Self {
        Self {
            tokens,
            cursor: 0,
            nesting: 0,
            operations: 0,
        }
    }

    pub fn idx(&self) -> usize {
        self.cursor
    }
}

impl<'a> Parser<'a> {
    pub fn current(&self) -> &'a WithSpan<Token> {
        &self.tokens[self.cursor]
    }

    pub fn peek(&self) -> token::Kind {
        token::Kind::from_token(&self.current().value)
    }

    /// Consume the current token.
    /// The cursor never moves past `Eof`.
    pub fn advance(&mut self) -> &'a WithSpan<Token> {
        let token = self.current();
        if self.cursor + 1 < self.tokens.len() {
            self.cursor += 1;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(?token.value, cursor = self.cursor);
        token
    }

    /// Error at the current token.
    pub fn unexpected(&self, expected: &[token::Kind]) -> Error {
        let token = self.current();
        Error::new(
            error::Kind::UnexpectedToken {
                expected: expected.to_vec(),
                found: token::Kind::from_token(&token.value),
            },
            token.span.clone(),
        )
    }

    /// Error at the current token.
    pub fn error(&self, kind: error::Kind) -> Error {
        Error::new(kind, self.current().span.clone())
    }

    /// Keep `err` if any tokens were consumed since `mark`,
    /// otherwise report what was expected at `mark`.
    pub fn deepest(&self, mark: usize, err: Error, expected: &[token::Kind]) -> Error {
        if self.cursor > mark {
            err
        } else {
            self.unexpected(expected)
        }
    }
}

#[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip_all))]
pub fn parse(lex: &lex::Lex) -> Result<ast::Expr, Error> {
    let mut parser = Parser::new(lex.tokens());
    let expr = parse_expr(&mut parser)?;
    if parser.peek() != token::Kind::Eof {
        return Err(parser.error(error::Kind::TrailingInput {
            found: parser.peek(),
        }));
    }

    Ok(expr)
}

#[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip_all))]
fn parse_expr(parser: &mut Parser<'_>) -> Result<ast::Expr, Error> {
    if parser.peek() == token::Kind::Keyword(token::Keyword::Var) {
        return parse_var_assign(parser);
    }

    let mark = parser.idx();
    parse_binary(parser, OPS_LOGICAL, parse_comparison, parse_comparison)
        .map_err(|err| parser.deepest(mark, err, EXPR_START))
}

fn parse_var_assign(parser: &mut Parser<'_>) -> Result<ast::Expr, Error> {
    let keyword = parser.advance();

    let name = parser.current();
    let Token::Identifier(value) = &name.value else {
        return Err(parser.unexpected(&[token::Kind::Identifier]));
    };
    parser.advance();

    if parser.peek() != token::Kind::Equal {
        return Err(parser.unexpected(&[token::Kind::Equal]));
    }
    parser.advance();

    let expr = parse_nested(parser, parse_expr)?;
    Ok(ast::ExprVarAssign {
        keyword: keyword.span.clone(),
        name: WithSpan {
            value: value.clone(),
            span: name.span.clone(),
        },
        value: Box::new(expr),
    }
    .into())
}

fn parse_comparison(parser: &mut Parser<'_>) -> Result<ast::Expr, Error> {
    if parser.peek() == token::Kind::Keyword(token::Keyword::Not) {
        return parse_unary(parser, parse_comparison);
    }

    let mark = parser.idx();
    parse_binary(parser, OPS_COMPARISON, parse_arith, parse_arith)
        .map_err(|err| parser.deepest(mark, err, COMPARISON_START))
}

fn parse_arith(parser: &mut Parser<'_>) -> Result<ast::Expr, Error> {
    parse_binary(parser, OPS_SUM, parse_term, parse_term)
}

fn parse_term(parser: &mut Parser<'_>) -> Result<ast::Expr, Error> {
    parse_binary(parser, OPS_PRODUCT, parse_factor, parse_factor)
}

fn parse_factor(parser: &mut Parser<'_>) -> Result<ast::Expr, Error> {
    match parser.peek() {
        token::Kind::Plus | token::Kind::Minus => parse_unary(parser, parse_factor),
        _ => parse_power(parser),
    }
}

/// Exponent binds right: its rhs is a factor, not a power.
fn parse_power(parser: &mut Parser<'_>) -> Result<ast::Expr, Error> {
    parse_binary(parser, OPS_EXPONENT, parse_atom, parse_exponent)
}

fn parse_exponent(parser: &mut Parser<'_>) -> Result<ast::Expr, Error> {
    parse_nested(parser, parse_factor)
}

#[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip_all))]
fn parse_atom(parser: &mut Parser<'_>) -> Result<ast::Expr, Error> {
    let token = parser.current();
    match &token.value {
        Token::Int(value) => {
            parser.advance();
            Ok(ast::ExprNumber {
                value: Number::Int(*value),
                span: token.span.clone(),
            }
            .into())
        }

        Token::Float(value) => {
            parser.advance();
            Ok(ast::ExprNumber {
                value: Number::Float(*value),
                span: token.span.clone(),
            }
            .into())
        }

        Token::Identifier(name) => {
            parser.advance();
            Ok(ast::ExprVarAccess {
                name: WithSpan {
                    value: name.clone(),
                    span: token.span.clone(),
                },
            }
            .into())
        }

        Token::ParenLeft => parse_group(parser),

        _ => Err(parser.unexpected(ATOM_START)),
    }
}

fn parse_group(parser: &mut Parser<'_>) -> Result<ast::Expr, Error> {
    parser.advance();
    let expr = parse_nested(parser, parse_expr)?;
    if parser.peek() != token::Kind::ParenRight {
        return Err(parser.unexpected(&[token::Kind::ParenRight]));
    }
    parser.advance();
    Ok(expr)
}

/// Parse a prefix operator followed by its operand.
fn parse_unary(parser: &mut Parser<'_>, operand: Rule) -> Result<ast::Expr, Error> {
    let op_token = parser.current();
    let Some(op) = ast::OpUnary::from_token(&token::Kind::from_token(&op_token.value)) else {
        return Err(parser.unexpected(&[
            token::Kind::Plus,
            token::Kind::Minus,
            token::Kind::Keyword(token::Keyword::Not),
        ]));
    };
    parser.advance();

    let expr = parse_nested(parser, operand)?;
    Ok(ast::ExprUnary {
        op: WithSpan {
            value: op,
            span: op_token.span.clone(),
        },
        expr: Box::new(expr),
    }
    .into())
}

/// Fold a sequence of binary operations of the same precedence to the left.
/// + `lhs`: Rule for the first operand.
/// + `rhs`: Rule for every following operand.
#[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip_all))]
fn parse_binary(
    parser: &mut Parser<'_>,
    ops: &[token::Kind],
    lhs: Rule,
    rhs: Rule,
) -> Result<ast::Expr, Error> {
    let mut left = lhs(parser)?;
    loop {
        let kind = parser.peek();
        if !ops.contains(&kind) {
            break;
        }
        let Some(op) = ast::OpBinary::from_token(&kind) else {
            break;
        };

        if parser.operations >= MAX_OPERATIONS {
            return Err(parser.error(error::Kind::TooManyOperations));
        }
        parser.operations += 1;

        let op_token = parser.advance();
        let right = rhs(parser)?;
        left = ast::ExprBinary {
            op: WithSpan {
                value: op,
                span: op_token.span.clone(),
            },
            left: Box::new(left),
            right: Box::new(right),
        }
        .into();
    }

    Ok(left)
}

/// Apply `rule` one level deeper.
/// Fails at the current token once nesting exceeds [`MAX_NESTING`].
fn parse_nested(parser: &mut Parser<'_>, rule: Rule) -> Result<ast::Expr, Error> {
    if parser.nesting >= MAX_NESTING {
        return Err(parser.error(error::Kind::NestedTooDeep));
    }

    parser.nesting += 1;
    let expr = rule(parser);
    parser.nesting -= 1;
    expr
}

pub mod error {
    use super::token;

    #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub enum Kind {
        /// An unexpected kind of token was found.
        #[error("expected {}, found {found}", list(.expected))]
        UnexpectedToken {
            expected: Vec<token::Kind>,
            found: token::Kind,
        },

        /// Tokens remained after a complete expression.
        #[error("unexpected trailing input, found {found}")]
        TrailingInput { found: token::Kind },

        #[error("expression nested too deeply")]
        NestedTooDeep,

        #[error("expression has too many operations")]
        TooManyOperations,
    }

    /// Join kinds into a list.
    /// e.g. `'+', '-' or '('`.
    fn list(kinds: &[token::Kind]) -> String {
        let mut items = kinds.iter().map(|kind| kind.to_string()).collect::<Vec<_>>();
        match items.pop() {
            None => "nothing".to_string(),
            Some(last) if items.is_empty() => last,
            Some(last) => format!("{} or {last}", items.join(", ")),
        }
    }
}
