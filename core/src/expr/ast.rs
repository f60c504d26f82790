use super::{
    position::{Span, WithSpan},
    token,
    value::Number,
};

#[derive(Debug, Clone, derive_more::From, PartialEq)]
pub enum Expr {
    Number(ExprNumber),
    Unary(ExprUnary),
    Binary(ExprBinary),
    VarAccess(ExprVarAccess),
    VarAssign(ExprVarAssign),
}

impl Expr {
    /// Span from the leftmost to the rightmost token of the expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Number(expr) => expr.span.clone(),
            Self::Unary(expr) => expr.op.span.to(&expr.expr.span()),
            Self::Binary(expr) => expr.left.span().to(&expr.right.span()),
            Self::VarAccess(expr) => expr.name.span.clone(),
            Self::VarAssign(expr) => expr.keyword.to(&expr.value.span()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprNumber {
    pub value: Number,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprBinary {
    pub op: WithSpan<OpBinary>,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OpBinary {
    Add,
    And,
    Divide,
    Equal,
    Exp,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Multiply,
    Or,
    Subtract,
}

impl OpBinary {
    pub fn from_token(token: &token::Kind) -> Option<Self> {
        match token {
            token::Kind::BangEqual => Some(Self::NotEqual),
            token::Kind::Caret => Some(Self::Exp),
            token::Kind::EqualEqual => Some(Self::Equal),
            token::Kind::Greater => Some(Self::Greater),
            token::Kind::GreaterEqual => Some(Self::GreaterEqual),
            token::Kind::Keyword(token::Keyword::And) => Some(Self::And),
            token::Kind::Keyword(token::Keyword::Or) => Some(Self::Or),
            token::Kind::Less => Some(Self::Less),
            token::Kind::LessEqual => Some(Self::LessEqual),
            token::Kind::Minus => Some(Self::Subtract),
            token::Kind::Plus => Some(Self::Add),
            token::Kind::SlashForward => Some(Self::Divide),
            token::Kind::Star => Some(Self::Multiply),

            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprUnary {
    pub op: WithSpan<OpUnary>,
    pub expr: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OpUnary {
    Plus,
    Minus,
    Not,
}

impl OpUnary {
    pub fn from_token(token: &token::Kind) -> Option<Self> {
        match token {
            token::Kind::Plus => Some(Self::Plus),
            token::Kind::Minus => Some(Self::Minus),
            token::Kind::Keyword(token::Keyword::Not) => Some(Self::Not),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprVarAccess {
    pub name: WithSpan<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprVarAssign {
    /// Span of the `VAR` keyword.
    pub keyword: Span,
    pub name: WithSpan<String>,
    pub value: Box<Expr>,
}
