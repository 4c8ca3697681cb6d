//! Recursive-descent parser producing an `Expr` from formula text.
//!
//! Grammar (loosest to tightest binding):
//! ```text
//! expr        = or_expr
//! or_expr     = and_expr ("or" and_expr)*
//! and_expr    = not_expr ("and" not_expr)*
//! not_expr    = "not" not_expr | comparison
//! comparison  = additive (("==" | "!=" | "<" | "<=" | ">" | ">=") additive)?
//! additive    = multiplicative (("+" | "-") multiplicative)*
//! multiplicative = unary (("*" | "/") unary)*
//! unary       = "-" unary | primary
//! primary     = NUMBER | STRING | "true" | "false" | FIELD_REF
//!             | IDENT ("(" (expr ("," expr)*)? ")")? | "(" expr ")"
//! ```

use crate::ast::{BinaryOp, Expr};
use crate::error::{FormulaError, Span};
use crate::lexer::{tokenize, SpannedToken};
use crate::token::Token;

pub fn parse(source: &str) -> Result<Expr, Vec<FormulaError>> {
    let tokens = tokenize(source)?;
    let mut parser = Parser::new(tokens);
    let expr = parser.parse_expr().map_err(|e| vec![e])?;
    if let Some(tok) = parser.peek() {
        let err = FormulaError::UnexpectedToken {
            expected: "end of input".into(),
            found: tok.token.to_string(),
            span: tok.span,
        };
        return Err(vec![err]);
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

type PResult<T> = Result<T, FormulaError>;

impl Parser {
    fn new(tokens: Vec<SpannedToken>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn current_span(&self) -> Span {
        self.peek()
            .map(|t| t.span)
            .or_else(|| self.tokens.last().map(|t| t.span))
            .unwrap_or(Span::new(0, 0))
    }

    fn expect(&mut self, token: &Token, expected: &str) -> PResult<()> {
        match self.advance() {
            Some(t) if &t.token == token => Ok(()),
            Some(t) => Err(FormulaError::UnexpectedToken {
                expected: expected.into(),
                found: t.token.to_string(),
                span: t.span,
            }),
            None => Err(FormulaError::UnexpectedEndOfInput {
                expected: expected.into(),
            }),
        }
    }

    fn parse_expr(&mut self) -> PResult<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_and()?;
        while matches!(self.peek().map(|t| &t.token), Some(Token::Or)) {
            let span = self.current_span();
            self.advance();
            let rhs = self.parse_and()?;
            lhs = Expr::Binary {
                op: BinaryOp::Or,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_not()?;
        while matches!(self.peek().map(|t| &t.token), Some(Token::And)) {
            let span = self.current_span();
            self.advance();
            let rhs = self.parse_not()?;
            lhs = Expr::Binary {
                op: BinaryOp::And,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }
        Ok(lhs)
    }

    fn parse_not(&mut self) -> PResult<Expr> {
        if matches!(self.peek().map(|t| &t.token), Some(Token::Not)) {
            self.advance();
            let inner = self.parse_not()?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> PResult<Expr> {
        let lhs = self.parse_additive()?;
        let op = match self.peek().map(|t| &t.token) {
            Some(Token::EqEq) => Some(BinaryOp::Eq),
            Some(Token::NotEq) => Some(BinaryOp::NotEq),
            Some(Token::Lt) => Some(BinaryOp::Lt),
            Some(Token::LtEq) => Some(BinaryOp::LtEq),
            Some(Token::Gt) => Some(BinaryOp::Gt),
            Some(Token::GtEq) => Some(BinaryOp::GtEq),
            _ => None,
        };
        let Some(op) = op else { return Ok(lhs) };
        let span = self.current_span();
        self.advance();
        let rhs = self.parse_additive()?;
        Ok(Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            span,
        })
    }

    fn parse_additive(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek().map(|t| &t.token) {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            let span = self.current_span();
            self.advance();
            let rhs = self.parse_multiplicative()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek().map(|t| &t.token) {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => break,
            };
            let span = self.current_span();
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        if matches!(self.peek().map(|t| &t.token), Some(Token::Minus)) {
            self.advance();
            let inner = self.parse_unary()?;
            return Ok(Expr::Negate(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        match self.advance() {
            Some(SpannedToken { token: Token::Number(text), span }) => {
                text.parse::<f64>()
                    .map(Expr::Number)
                    .map_err(|_| FormulaError::InvalidNumberLiteral { text, span })
            }
            Some(SpannedToken { token: Token::StringLiteral(s), .. }) => Ok(Expr::Text(s)),
            Some(SpannedToken { token: Token::True, .. }) => Ok(Expr::Boolean(true)),
            Some(SpannedToken { token: Token::False, .. }) => Ok(Expr::Boolean(false)),
            Some(SpannedToken { token: Token::FieldRef(name), span }) => {
                Ok(Expr::FieldRef { name, span })
            }
            Some(SpannedToken { token: Token::Ident(name), span }) => {
                if matches!(self.peek().map(|t| &t.token), Some(Token::LParen)) {
                    self.advance();
                    let args = self.parse_call_args()?;
                    Ok(Expr::Call { name, args, span })
                } else {
                    Ok(Expr::FieldRef { name, span })
                }
            }
            Some(SpannedToken { token: Token::LParen, .. }) => {
                let inner = self.parse_expr()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(inner)
            }
            Some(t) => Err(FormulaError::UnexpectedToken {
                expected: "expression".into(),
                found: t.token.to_string(),
                span: t.span,
            }),
            None => Err(FormulaError::UnexpectedEndOfInput {
                expected: "expression".into(),
            }),
        }
    }

    fn parse_call_args(&mut self) -> PResult<Vec<Expr>> {
        let mut args = Vec::new();
        if matches!(self.peek().map(|t| &t.token), Some(Token::RParen)) {
            self.advance();
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            match self.peek().map(|t| &t.token) {
                Some(Token::Comma) => {
                    self.advance();
                }
                Some(Token::RParen) => {
                    self.advance();
                    break;
                }
                _ => {
                    self.expect(&Token::RParen, "',' or ')'")?;
                    break;
                }
            }
        }
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_field_ref_comparison() {
        let expr = parse("{{is_admin}} == true").unwrap();
        assert!(matches!(expr, Expr::Binary { op: BinaryOp::Eq, .. }));
    }

    #[test]
    fn parses_arithmetic_with_precedence() {
        let expr = parse("1 + 2 * 3").unwrap();
        match expr {
            Expr::Binary { op: BinaryOp::Add, rhs, .. } => {
                assert!(matches!(*rhs, Expr::Binary { op: BinaryOp::Mul, .. }));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parses_function_call() {
        let expr = parse("sum(a, b, 1)").unwrap();
        match expr {
            Expr::Call { name, args, .. } => {
                assert_eq!(name, "sum");
                assert_eq!(args.len(), 3);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parses_bare_identifier_as_field_ref() {
        let expr = parse("age + 10").unwrap();
        match expr {
            Expr::Binary { lhs, .. } => {
                assert!(matches!(*lhs, Expr::FieldRef { name, .. } if name == "age"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn reports_unexpected_token_at_end() {
        let result = parse("1 +");
        assert!(result.is_err());
    }

    #[test]
    fn reports_trailing_garbage() {
        let result = parse("1 + 1 2");
        assert!(result.is_err());
    }

    #[test]
    fn parses_parenthesized_expression() {
        let expr = parse("(1 + 2) * 3").unwrap();
        assert!(matches!(expr, Expr::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn parses_unary_minus() {
        let expr = parse("-age").unwrap();
        assert!(matches!(expr, Expr::Negate(_)));
    }

    #[test]
    fn parses_logical_not() {
        let expr = parse("not is_admin").unwrap();
        assert!(matches!(expr, Expr::Not(_)));
    }
}
