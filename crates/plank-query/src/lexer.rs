//! Query tokenizer.
//!
//! Splits a query into a flat token list. Tokenization never fails; any
//! malformed input is reported by the parser instead. The returned list
//! always ends with [`TokenKind::Eof`].
//!
//! # Rules
//!
//! - Whitespace separates words and is otherwise ignored.
//! - `(` and `)` are single-character tokens, even when glued to a word.
//! - A word equal to `AND`, `OR` or `NOT` (any case) is an operator.
//! - A word containing `:` splits at the first colon into `field:value`;
//!   the field name is lower-cased, the value is kept verbatim.
//! - Any other word searches title and description via [`TEXT_FIELD`].

use std::fmt;

use serde::Serialize;

/// Implicit field name for bare words (full-text search).
pub const TEXT_FIELD: &str = "_text";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TokenKind {
    Field { field: String, value: String },
    And,
    Or,
    Not,
    LParen,
    RParen,
    Eof,
}

impl TokenKind {
    /// Human description used in parse error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Field { field, value } if field == TEXT_FIELD => format!("term '{value}'"),
            Self::Field { field, value } => format!("term '{field}:{value}'"),
            Self::And => "operator 'AND'".to_string(),
            Self::Or => "operator 'OR'".to_string(),
            Self::Not => "operator 'NOT'".to_string(),
            Self::LParen => "'('".to_string(),
            Self::RParen => "')'".to_string(),
            Self::Eof => "end of query".to_string(),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field { field, value } => write!(f, "{field}:{value}"),
            Self::And => f.write_str("AND"),
            Self::Or => f.write_str("OR"),
            Self::Not => f.write_str("NOT"),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
            Self::Eof => f.write_str("<eof>"),
        }
    }
}

/// A token and the character offset where it starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

impl Token {
    #[must_use]
    pub const fn new(kind: TokenKind, position: usize) -> Self {
        Self { kind, position }
    }
}

/// Tokenize `input`. Positions count characters, not bytes.
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        match c {
            '(' => {
                tokens.push(Token::new(TokenKind::LParen, i));
                i += 1;
            }
            ')' => {
                tokens.push(Token::new(TokenKind::RParen, i));
                i += 1;
            }
            _ => {
                let start = i;
                while i < chars.len() && !is_word_boundary(chars[i]) {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                tokens.push(Token::new(classify_word(&word), start));
            }
        }
    }

    tokens.push(Token::new(TokenKind::Eof, chars.len()));
    tokens
}

fn is_word_boundary(c: char) -> bool {
    c.is_whitespace() || c == '(' || c == ')'
}

fn classify_word(word: &str) -> TokenKind {
    if word.eq_ignore_ascii_case("AND") {
        return TokenKind::And;
    }
    if word.eq_ignore_ascii_case("OR") {
        return TokenKind::Or;
    }
    if word.eq_ignore_ascii_case("NOT") {
        return TokenKind::Not;
    }

    match word.split_once(':') {
        Some((field, value)) => TokenKind::Field {
            field: field.to_lowercase(),
            value: value.to_string(),
        },
        None => TokenKind::Field {
            field: TEXT_FIELD.to_string(),
            value: word.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    fn field(f: &str, v: &str) -> TokenKind {
        TokenKind::Field {
            field: f.to_string(),
            value: v.to_string(),
        }
    }

    #[test]
    fn empty_input_is_just_eof() {
        assert_eq!(tokenize(""), vec![Token::new(TokenKind::Eof, 0)]);
        assert_eq!(kinds("   \t\n"), vec![TokenKind::Eof]);
    }

    #[test]
    fn operators_are_case_insensitive() {
        assert_eq!(
            kinds("a and b Or NOT c"),
            vec![
                field(TEXT_FIELD, "a"),
                TokenKind::And,
                field(TEXT_FIELD, "b"),
                TokenKind::Or,
                TokenKind::Not,
                field(TEXT_FIELD, "c"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn field_name_is_lowercased_value_is_not() {
        assert_eq!(kinds("Status:In_Progress"), vec![field("status", "In_Progress"), TokenKind::Eof]);
    }

    #[test]
    fn splits_on_first_colon_only() {
        assert_eq!(kinds("branch:feat:x"), vec![field("branch", "feat:x"), TokenKind::Eof]);
    }

    #[test]
    fn parens_split_words() {
        assert_eq!(
            kinds("(status:open)"),
            vec![TokenKind::LParen, field("status", "open"), TokenKind::RParen, TokenKind::Eof]
        );
    }

    #[test]
    fn positions_are_character_offsets() {
        let tokens = tokenize("é  (x:1)");
        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 3, 4, 7, 8]);
    }

    #[test]
    fn operator_word_with_colon_is_a_field() {
        assert_eq!(kinds("and:x"), vec![field("and", "x"), TokenKind::Eof]);
    }

    proptest! {
        #[test]
        fn tokenize_is_total_and_ends_with_eof(input in ".{0,64}") {
            let tokens = tokenize(&input);
            let last = tokens.last().expect("eof always present");
            prop_assert_eq!(&last.kind, &TokenKind::Eof);
            prop_assert_eq!(last.position, input.chars().count());
            prop_assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(), 1);
            prop_assert!(tokens.windows(2).all(|w| w[0].position < w[1].position || w[1].kind == TokenKind::Eof));
        }
    }
}
