//! Lexical tokens.

use super::error::Span;

/// A token with its source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}

/// Token kinds for the engine's SQL dialect.
///
/// String literals are double-quoted. There are no float literals: the
/// only value types are INT and STR20.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Keywords
    And,
    By,
    Create,
    Delete,
    Distinct,
    Drop,
    From,
    Insert,
    Int,
    Into,
    Null,
    Or,
    Order,
    Select,
    Str20,
    Table,
    Values,
    Where,

    // Literals and names
    Identifier(String),
    IntegerLit(i32),
    StringLit(String),

    // Operators and punctuation
    Plus,
    Minus,
    Asterisk,
    Eq,
    Lt,
    Gt,
    LParen,
    RParen,
    Comma,
    Dot,
    Semicolon,

    /// A lexical error, carried in-stream instead of a side channel.
    Error(String),
    Eof,
}

impl TokenKind {
    /// Maps a word to its keyword token, case-insensitively.
    pub fn from_keyword(word: &str) -> Option<TokenKind> {
        let kind = match word.to_ascii_uppercase().as_str() {
            "AND" => TokenKind::And,
            "BY" => TokenKind::By,
            "CREATE" => TokenKind::Create,
            "DELETE" => TokenKind::Delete,
            "DISTINCT" => TokenKind::Distinct,
            "DROP" => TokenKind::Drop,
            "FROM" => TokenKind::From,
            "INSERT" => TokenKind::Insert,
            "INT" => TokenKind::Int,
            "INTO" => TokenKind::Into,
            "NULL" => TokenKind::Null,
            "OR" => TokenKind::Or,
            "ORDER" => TokenKind::Order,
            "SELECT" => TokenKind::Select,
            "STR20" => TokenKind::Str20,
            "TABLE" => TokenKind::Table,
            "VALUES" => TokenKind::Values,
            "WHERE" => TokenKind::Where,
            _ => return None,
        };
        Some(kind)
    }

    /// Human-readable name for diagnostics.
    pub fn display_name(&self) -> String {
        match self {
            TokenKind::And => "AND".into(),
            TokenKind::By => "BY".into(),
            TokenKind::Create => "CREATE".into(),
            TokenKind::Delete => "DELETE".into(),
            TokenKind::Distinct => "DISTINCT".into(),
            TokenKind::Drop => "DROP".into(),
            TokenKind::From => "FROM".into(),
            TokenKind::Insert => "INSERT".into(),
            TokenKind::Int => "INT".into(),
            TokenKind::Into => "INTO".into(),
            TokenKind::Null => "NULL".into(),
            TokenKind::Or => "OR".into(),
            TokenKind::Order => "ORDER".into(),
            TokenKind::Select => "SELECT".into(),
            TokenKind::Str20 => "STR20".into(),
            TokenKind::Table => "TABLE".into(),
            TokenKind::Values => "VALUES".into(),
            TokenKind::Where => "WHERE".into(),
            TokenKind::Identifier(name) => format!("identifier \"{}\"", name),
            TokenKind::IntegerLit(n) => format!("integer {}", n),
            TokenKind::StringLit(s) => format!("string \"{}\"", s),
            TokenKind::Plus => "'+'".into(),
            TokenKind::Minus => "'-'".into(),
            TokenKind::Asterisk => "'*'".into(),
            TokenKind::Eq => "'='".into(),
            TokenKind::Lt => "'<'".into(),
            TokenKind::Gt => "'>'".into(),
            TokenKind::LParen => "'('".into(),
            TokenKind::RParen => "')'".into(),
            TokenKind::Comma => "','".into(),
            TokenKind::Dot => "'.'".into(),
            TokenKind::Semicolon => "';'".into(),
            TokenKind::Error(msg) => format!("invalid token ({})", msg),
            TokenKind::Eof => "end of input".into(),
        }
    }
}
