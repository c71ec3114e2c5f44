//! Expression parser.
//!
//! Recursive-descent parser producing the expression AST. Precedence,
//! low to high: comparison, addition, primary terms. Primary terms are
//! literals, parenthesized expressions, dotted identifier paths with
//! `$name(index)` segments, and function calls.

use crate::error::{ParamError, ParamResult};
use crate::token::{tokenize, Token};
use crate::value::Value;

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// `+` - numeric addition or string concatenation
    Add,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
    /// `==`
    Eq,
    /// `!=`
    Ne,
}

/// An expression AST node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A number or string literal
    Literal(Value),
    /// An identifier resolved directly in the context
    Ident(String),
    /// Property projection: `base.name`
    Property(Box<Expr>, String),
    /// Index projection from the `$name(idx)` sugar
    Index(Box<Expr>, Box<Expr>),
    /// Function call: `name(arg, ...)`
    Call(String, Vec<Expr>),
    /// Binary operation
    Binary(BinOp, Box<Expr>, Box<Expr>),
}

/// Parse a trimmed expression source string into an AST.
pub fn parse(source: &str) -> ParamResult<Expr> {
    let tokens = tokenize(source)?;
    let mut parser = Parser::new(tokens);
    let expr = parser.expr()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(ParamError::syntax(format!(
            "unexpected trailing token {:?}",
            token
        ))),
    }
}

/// The recursive-descent parser over a token buffer.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Consume the given token or fail.
    fn expect(&mut self, expected: &Token, context: &str) -> ParamResult<()> {
        match self.next() {
            Some(ref token) if token == expected => Ok(()),
            Some(token) => Err(ParamError::syntax(format!(
                "expected {:?} {}, found {:?}",
                expected, context, token
            ))),
            None => Err(ParamError::syntax(format!(
                "expected {:?} {}, found end of expression",
                expected, context
            ))),
        }
    }

    /// expr := additive ((< | > | <= | >= | == | !=) additive)*
    fn expr(&mut self) -> ParamResult<Expr> {
        let mut node = self.additive()?;
        while let Some(op) = self.peek_comparison() {
            self.next();
            let rhs = self.additive()?;
            node = Expr::Binary(op, Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn peek_comparison(&self) -> Option<BinOp> {
        match self.peek() {
            Some(Token::Lt) => Some(BinOp::Lt),
            Some(Token::Gt) => Some(BinOp::Gt),
            Some(Token::Le) => Some(BinOp::Le),
            Some(Token::Ge) => Some(BinOp::Ge),
            Some(Token::EqEq) => Some(BinOp::Eq),
            Some(Token::Ne) => Some(BinOp::Ne),
            _ => None,
        }
    }

    /// additive := primary (+ primary)*
    fn additive(&mut self) -> ParamResult<Expr> {
        let mut node = self.primary()?;
        while self.peek() == Some(&Token::Plus) {
            self.next();
            let rhs = self.primary()?;
            node = Expr::Binary(BinOp::Add, Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    /// primary := NUMBER | STRING | '(' expr ')' | path
    fn primary(&mut self) -> ParamResult<Expr> {
        match self.next() {
            Some(Token::Int(n)) => Ok(Expr::Literal(Value::Int(n))),
            Some(Token::Float(n)) => Ok(Expr::Literal(Value::Float(n))),
            Some(Token::Str(s)) => Ok(Expr::Literal(Value::Str(s))),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.expect(&Token::RParen, "to close parenthesized expression")?;
                Ok(inner)
            }
            Some(Token::Dollar) => {
                let base = self.index_segment(None)?;
                self.path_rest(base)
            }
            Some(Token::Ident(name)) => {
                let base = if self.peek() == Some(&Token::LParen) {
                    self.next();
                    let args = self.call_args()?;
                    Expr::Call(name, args)
                } else {
                    Expr::Ident(name)
                };
                self.path_rest(base)
            }
            Some(token) => Err(ParamError::syntax(format!(
                "unexpected token {:?}",
                token
            ))),
            None => Err(ParamError::syntax("unexpected end of expression")),
        }
    }

    /// Parse the remainder of a dotted path after its first segment.
    ///
    /// path_rest := ('.' (IDENT | '$' IDENT '(' expr ')'))*
    fn path_rest(&mut self, mut base: Expr) -> ParamResult<Expr> {
        while self.peek() == Some(&Token::Dot) {
            self.next();
            match self.next() {
                Some(Token::Ident(name)) => {
                    base = Expr::Property(Box::new(base), name);
                }
                Some(Token::Dollar) => {
                    base = self.index_segment(Some(base))?;
                }
                Some(token) => {
                    return Err(ParamError::syntax(format!(
                        "expected path segment after `.`, found {:?}",
                        token
                    )))
                }
                None => {
                    return Err(ParamError::syntax(
                        "expected path segment after `.`, found end of expression",
                    ))
                }
            }
        }
        Ok(base)
    }

    /// Parse `$name(indexExpr)` after the `$` token. With no base the
    /// name resolves as an identifier; with a base it projects a
    /// property first, so `task.$images(0)` indexes `task.images`.
    fn index_segment(&mut self, base: Option<Expr>) -> ParamResult<Expr> {
        let name = match self.next() {
            Some(Token::Ident(name)) => name,
            Some(token) => {
                return Err(ParamError::syntax(format!(
                    "expected identifier after `$`, found {:?}",
                    token
                )))
            }
            None => {
                return Err(ParamError::syntax(
                    "expected identifier after `$`, found end of expression",
                ))
            }
        };
        self.expect(&Token::LParen, "after indexed path segment")?;
        let index = self.expr()?;
        self.expect(&Token::RParen, "to close index expression")?;
        let resolved = match base {
            Some(base) => Expr::Property(Box::new(base), name),
            None => Expr::Ident(name),
        };
        Ok(Expr::Index(Box::new(resolved), Box::new(index)))
    }

    /// call_args := ')' | expr (',' expr)* ')'
    ///
    /// The opening parenthesis has already been consumed.
    fn call_args(&mut self) -> ParamResult<Vec<Expr>> {
        let mut args = Vec::new();
        if self.peek() == Some(&Token::RParen) {
            self.next();
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            match self.next() {
                Some(Token::Comma) => continue,
                Some(Token::RParen) => return Ok(args),
                Some(token) => {
                    return Err(ParamError::syntax(format!(
                        "expected `,` or `)` in argument list, found {:?}",
                        token
                    )))
                }
                None => return Err(ParamError::syntax("unmatched `(` in function call")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Expr {
        Expr::Ident(name.into())
    }

    #[test]
    fn test_parse_identifier() {
        assert_eq!(parse("clientId").unwrap(), ident("clientId"));
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(parse("12").unwrap(), Expr::Literal(Value::Int(12)));
        assert_eq!(
            parse(r#""hello""#).unwrap(),
            Expr::Literal(Value::Str("hello".into()))
        );
    }

    #[test]
    fn test_parse_addition_left_assoc() {
        assert_eq!(
            parse("a + b + 1").unwrap(),
            Expr::Binary(
                BinOp::Add,
                Box::new(Expr::Binary(
                    BinOp::Add,
                    Box::new(ident("a")),
                    Box::new(ident("b")),
                )),
                Box::new(Expr::Literal(Value::Int(1))),
            )
        );
    }

    #[test]
    fn test_comparison_binds_looser_than_addition() {
        assert_eq!(
            parse("a + 1 < b").unwrap(),
            Expr::Binary(
                BinOp::Lt,
                Box::new(Expr::Binary(
                    BinOp::Add,
                    Box::new(ident("a")),
                    Box::new(Expr::Literal(Value::Int(1))),
                )),
                Box::new(ident("b")),
            )
        );
    }

    #[test]
    fn test_parse_dotted_path() {
        assert_eq!(
            parse("a.b.c").unwrap(),
            Expr::Property(
                Box::new(Expr::Property(Box::new(ident("a")), "b".into())),
                "c".into(),
            )
        );
    }

    #[test]
    fn test_parse_index_sugar_bare() {
        assert_eq!(
            parse("$arr(1)").unwrap(),
            Expr::Index(
                Box::new(ident("arr")),
                Box::new(Expr::Literal(Value::Int(1))),
            )
        );
    }

    #[test]
    fn test_parse_deep_path_with_index_sugar() {
        // task.$images(0).$versions(0)
        let images = Expr::Index(
            Box::new(Expr::Property(Box::new(ident("task")), "images".into())),
            Box::new(Expr::Literal(Value::Int(0))),
        );
        let versions = Expr::Index(
            Box::new(Expr::Property(Box::new(images), "versions".into())),
            Box::new(Expr::Literal(Value::Int(0))),
        );
        assert_eq!(parse("task.$images(0).$versions(0)").unwrap(), versions);
    }

    #[test]
    fn test_parse_call_with_nested_call() {
        assert_eq!(
            parse("toLower(toUpper(text))").unwrap(),
            Expr::Call(
                "toLower".into(),
                vec![Expr::Call("toUpper".into(), vec![ident("text")])],
            )
        );
    }

    #[test]
    fn test_parse_call_with_expression_argument() {
        assert_eq!(
            parse("func(1+1)").unwrap(),
            Expr::Call(
                "func".into(),
                vec![Expr::Binary(
                    BinOp::Add,
                    Box::new(Expr::Literal(Value::Int(1))),
                    Box::new(Expr::Literal(Value::Int(1))),
                )],
            )
        );
    }

    #[test]
    fn test_parse_call_no_args() {
        assert_eq!(parse("one()").unwrap(), Expr::Call("one".into(), vec![]));
    }

    #[test]
    fn test_unmatched_paren_is_syntax_error() {
        assert!(parse("func(1").is_err());
        assert!(parse("(a + 1").is_err());
    }

    #[test]
    fn test_trailing_tokens_are_syntax_error() {
        assert!(parse("a b").is_err());
        assert!(parse("1 2").is_err());
    }

    #[test]
    fn test_dangling_dot_is_syntax_error() {
        assert!(parse("a.").is_err());
        assert!(parse("a.$b").is_err());
    }

    #[test]
    fn test_empty_expression_is_syntax_error() {
        assert!(parse("").is_err());
    }
}
