//! Tokenizes formula source text, collecting every lexical error rather
//! than stopping at the first one (mirrors the teacher's DSL lexer).

use logos::Logos;

use crate::error::{FormulaError, Span};
use crate::token::Token;

#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, Vec<FormulaError>> {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    let mut lexer = Token::lexer(source);
    while let Some(result) = lexer.next() {
        let span = Span::new(lexer.span().start, lexer.span().end);
        match result {
            Ok(Token::FieldRef(ref name)) if name.is_empty() => {
                errors.push(FormulaError::EmptyFieldReference { span });
            }
            Ok(token) => tokens.push(SpannedToken { token, span }),
            Err(()) => errors.push(FormulaError::InvalidToken { span }),
        }
    }

    if errors.is_empty() {
        Ok(tokens)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_simple_arithmetic() {
        let tokens = tokenize("{{a}} + {{b}}").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].token, Token::FieldRef("a".into()));
        assert_eq!(tokens[1].token, Token::Plus);
    }

    #[test]
    fn collects_multiple_invalid_tokens() {
        let result = tokenize("$ @");
        let errors = result.unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
