use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Keyword {
    Var,
    And,
    Or,
    Not,
}

impl Keyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Var => "VAR",
            Keyword::And => "AND",
            Keyword::Or => "OR",
            Keyword::Not => "NOT",
        }
    }

    /// Keywords are case sensitive.
    pub fn from_str(value: impl AsRef<str>) -> Option<Self> {
        match value.as_ref() {
            "VAR" => Some(Self::Var),
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            "NOT" => Some(Self::Not),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    BangEqual,
    Caret,
    Eof,
    Equal,
    EqualEqual,
    Float(f64),
    Greater,
    GreaterEqual,
    Identifier(String),
    Int(i64),
    Keyword(Keyword),
    Less,
    LessEqual,
    Minus,
    ParenLeft,
    ParenRight,
    Plus,
    SlashForward,
    Star,
}

/// Kind of token without any data.
/// Should match the variants in [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Kind {
    BangEqual,
    Caret,
    Eof,
    Equal,
    EqualEqual,
    Float,
    Greater,
    GreaterEqual,
    Identifier,
    Int,
    Keyword(Keyword),
    Less,
    LessEqual,
    Minus,
    ParenLeft,
    ParenRight,
    Plus,
    SlashForward,
    Star,
}

impl Kind {
    pub fn from_token(token: &Token) -> Self {
        match token {
            Token::BangEqual => Self::BangEqual,
            Token::Caret => Self::Caret,
            Token::Eof => Self::Eof,
            Token::Equal => Self::Equal,
            Token::EqualEqual => Self::EqualEqual,
            Token::Float(_) => Self::Float,
            Token::Greater => Self::Greater,
            Token::GreaterEqual => Self::GreaterEqual,
            Token::Identifier(_) => Self::Identifier,
            Token::Int(_) => Self::Int,
            Token::Keyword(word) => Self::Keyword(*word),
            Token::Less => Self::Less,
            Token::LessEqual => Self::LessEqual,
            Token::Minus => Self::Minus,
            Token::ParenLeft => Self::ParenLeft,
            Token::ParenRight => Self::ParenRight,
            Token::Plus => Self::Plus,
            Token::SlashForward => Self::SlashForward,
            Token::Star => Self::Star,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Eof => return write!(f, "end of input"),
            Self::Float => return write!(f, "float"),
            Self::Identifier => return write!(f, "identifier"),
            Self::Int => return write!(f, "int"),
            Self::Keyword(word) => word.as_str(),
            Self::BangEqual => "!=",
            Self::Caret => "^",
            Self::Equal => "=",
            Self::EqualEqual => "==",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Minus => "-",
            Self::ParenLeft => "(",
            Self::ParenRight => ")",
            Self::Plus => "+",
            Self::SlashForward => "/",
            Self::Star => "*",
        };
        write!(f, "'{symbol}'")
    }
}
