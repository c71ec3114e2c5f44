//! Expression Lexer/Tokenizer
//!
//! Converts an expression source string into a stream of tokens.
//! Whitespace is insignificant and may appear anywhere between tokens.

use crate::error::{ParamError, ParamResult};

/// A single expression token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// An identifier: `task`, `clientId`
    Ident(String),
    /// An integer literal
    Int(i64),
    /// A floating-point literal
    Float(f64),
    /// A double-quoted string literal (quotes stripped)
    Str(String),
    /// `$` - introduces an index segment like `$arr(0)`
    Dollar,
    /// `.`
    Dot,
    /// `,`
    Comma,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `+`
    Plus,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
    /// `==`
    EqEq,
    /// `!=`
    Ne,
}

/// The expression lexer that converts source text to tokens.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Lexer {
            chars: input.chars().peekable(),
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn next_char(&mut self) -> Option<char> {
        self.chars.next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.next_char();
            } else {
                break;
            }
        }
    }

    /// Read an identifier: `[A-Za-z_][A-Za-z0-9_]*`.
    fn read_ident(&mut self, first: char) -> String {
        let mut name = String::new();
        name.push(first);
        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphanumeric() || c == '_' {
                name.push(c);
                self.next_char();
            } else {
                break;
            }
        }
        name
    }

    /// Read a numeric literal. Digits with at most one interior dot.
    fn read_number(&mut self, first: char) -> ParamResult<Token> {
        let mut text = String::new();
        text.push(first);
        let mut is_float = false;
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                text.push(c);
                self.next_char();
            } else if c == '.' && !is_float {
                is_float = true;
                text.push(c);
                self.next_char();
            } else {
                break;
            }
        }
        if is_float {
            text.parse::<f64>()
                .map(Token::Float)
                .map_err(|_| ParamError::syntax(format!("invalid number literal `{}`", text)))
        } else {
            text.parse::<i64>()
                .map(Token::Int)
                .map_err(|_| ParamError::syntax(format!("invalid number literal `{}`", text)))
        }
    }

    /// Read a double-quoted string literal. The opening quote has
    /// already been consumed. Supports `\"` and `\\` escapes.
    fn read_string(&mut self) -> ParamResult<Token> {
        let mut text = String::new();
        loop {
            match self.next_char() {
                Some('"') => return Ok(Token::Str(text)),
                Some('\\') => match self.next_char() {
                    Some('"') => text.push('"'),
                    Some('\\') => text.push('\\'),
                    Some(c) => {
                        return Err(ParamError::syntax(format!(
                            "unknown escape `\\{}` in string literal",
                            c
                        )))
                    }
                    None => return Err(ParamError::syntax("unterminated string literal")),
                },
                Some(c) => text.push(c),
                None => return Err(ParamError::syntax("unterminated string literal")),
            }
        }
    }

    /// Read the next token, or None at end of input.
    fn next_token(&mut self) -> ParamResult<Option<Token>> {
        self.skip_whitespace();

        let c = match self.next_char() {
            Some(c) => c,
            None => return Ok(None),
        };

        let token = match c {
            '$' => Token::Dollar,
            '.' => Token::Dot,
            ',' => Token::Comma,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '+' => Token::Plus,
            '"' => self.read_string()?,
            '<' => {
                if self.peek_char() == Some('=') {
                    self.next_char();
                    Token::Le
                } else {
                    Token::Lt
                }
            }
            '>' => {
                if self.peek_char() == Some('=') {
                    self.next_char();
                    Token::Ge
                } else {
                    Token::Gt
                }
            }
            '=' => {
                if self.peek_char() == Some('=') {
                    self.next_char();
                    Token::EqEq
                } else {
                    return Err(ParamError::syntax("expected `==`, found lone `=`"));
                }
            }
            '!' => {
                if self.peek_char() == Some('=') {
                    self.next_char();
                    Token::Ne
                } else {
                    return Err(ParamError::syntax("expected `!=`, found lone `!`"));
                }
            }
            c if c.is_ascii_digit() => self.read_number(c)?,
            '-' => {
                // Negative number literals only; there is no unary minus
                match self.peek_char() {
                    Some(d) if d.is_ascii_digit() => {
                        self.next_char();
                        match self.read_number(d)? {
                            Token::Int(n) => Token::Int(-n),
                            Token::Float(n) => Token::Float(-n),
                            _ => unreachable!(),
                        }
                    }
                    _ => return Err(ParamError::syntax("`-` must introduce a number literal")),
                }
            }
            c if c.is_ascii_alphabetic() || c == '_' => Token::Ident(self.read_ident(c)),
            c => {
                return Err(ParamError::syntax(format!(
                    "unexpected character `{}` in expression",
                    c
                )))
            }
        };

        Ok(Some(token))
    }

    /// Tokenize the entire input.
    pub fn tokenize(mut self) -> ParamResult<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }
}

/// Convenience function to tokenize a string.
pub fn tokenize(input: &str) -> ParamResult<Vec<Token>> {
    Lexer::new(input).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_tokenize() {
        let tokens = tokenize("clientId").unwrap();
        assert_eq!(tokens, vec![Token::Ident("clientId".into())]);
    }

    #[test]
    fn test_path_with_index_sugar() {
        let tokens = tokenize("task.$images(0)").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("task".into()),
                Token::Dot,
                Token::Dollar,
                Token::Ident("images".into()),
                Token::LParen,
                Token::Int(0),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_whitespace_insignificant() {
        assert_eq!(tokenize("  a  +  1  ").unwrap(), tokenize("a+1").unwrap());
    }

    #[test]
    fn test_string_literal() {
        let tokens = tokenize(r#""hello world""#).unwrap();
        assert_eq!(tokens, vec![Token::Str("hello world".into())]);
    }

    #[test]
    fn test_string_escapes() {
        let tokens = tokenize(r#""say \"hi\" \\ done""#).unwrap();
        assert_eq!(tokens, vec![Token::Str(r#"say "hi" \ done"#.into())]);
    }

    #[test]
    fn test_unterminated_string() {
        assert!(tokenize(r#""oops"#).is_err());
    }

    #[test]
    fn test_numbers() {
        assert_eq!(tokenize("12").unwrap(), vec![Token::Int(12)]);
        assert_eq!(tokenize("-2").unwrap(), vec![Token::Int(-2)]);
        assert_eq!(tokenize("1.5").unwrap(), vec![Token::Float(1.5)]);
    }

    #[test]
    fn test_no_exponent_literals() {
        // Number literals are digits with one interior dot; `10e-4`
        // lexes as a number followed by an identifier
        assert_eq!(
            tokenize("10e-4").unwrap(),
            vec![Token::Int(10), Token::Ident("e".into()), Token::Int(-4)]
        );
        assert!(crate::parser::parse("10e-4").is_err());
    }

    #[test]
    fn test_comparison_operators() {
        let tokens = tokenize("a <= b == c != d >= e").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("a".into()),
                Token::Le,
                Token::Ident("b".into()),
                Token::EqEq,
                Token::Ident("c".into()),
                Token::Ne,
                Token::Ident("d".into()),
                Token::Ge,
                Token::Ident("e".into()),
            ]
        );
    }

    #[test]
    fn test_unexpected_character() {
        assert!(tokenize("a & b").is_err());
        assert!(tokenize("a = b").is_err());
    }
}
