use crate::calc::CalcError;
use crate::format::to_half_width;
use std::fmt::{Display, Formatter};

/// A lexical token of a calculator expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Plus => f.write_str("+"),
            Token::Minus => f.write_str("-"),
            Token::Star => f.write_str("*"),
            Token::Slash => f.write_str("/"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
        }
    }
}

/// Splits `input` into tokens, each paired with its character position.
///
/// Full-width characters are converted to half-width first. `×` and `÷` lex as `*` and `/`.
/// Anything outside digits, `.`, operators, parentheses and whitespace is rejected.
pub fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, CalcError> {
    let chars: Vec<char> = to_half_width(input).chars().collect();
    let mut tokens = Vec::new();
    let mut ix = 0;
    while ix < chars.len() {
        let c = chars[ix];
        let token = match c {
            c if c.is_whitespace() => {
                ix += 1;
                continue;
            }
            '0'..='9' | '.' => {
                let start = ix;
                while ix < chars.len() && (chars[ix].is_ascii_digit() || chars[ix] == '.') {
                    ix += 1;
                }
                let text: String = chars[start..ix].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| CalcError::InvalidNumber {
                        text: text.clone(),
                        position: start,
                    })?;
                tokens.push((Token::Number(value), start));
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' | '×' => Token::Star,
            '/' | '÷' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ch => return Err(CalcError::UnexpectedChar { ch, position: ix }),
        };
        tokens.push((token, ix));
        ix += 1;
    }
    Ok(tokens)
}
