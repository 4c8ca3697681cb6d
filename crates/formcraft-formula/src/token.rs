//! `Token`: the lexical grammar of formula text (spec §4.1).

use std::fmt;

use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    #[regex(r"\{\{[A-Za-z_][A-Za-z0-9_]*\}\}", |lex| {
        let text = lex.slice();
        text[2..text.len() - 2].to_string()
    })]
    FieldRef(String),

    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().to_string(), priority = 2)]
    Number(String),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| {
        let text = lex.slice();
        text[1..text.len() - 1].to_string()
    })]
    StringLiteral(String),

    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
}

impl Token {
    pub fn description(&self) -> &'static str {
        match self {
            Self::FieldRef(_) => "field reference",
            Self::Number(_) => "number",
            Self::StringLiteral(_) => "string",
            Self::True | Self::False => "boolean",
            Self::And => "'and'",
            Self::Or => "'or'",
            Self::Not => "'not'",
            Self::Ident(_) => "identifier",
            Self::Plus => "'+'",
            Self::Minus => "'-'",
            Self::Star => "'*'",
            Self::Slash => "'/'",
            Self::EqEq => "'=='",
            Self::NotEq => "'!='",
            Self::LtEq => "'<='",
            Self::GtEq => "'>='",
            Self::Lt => "'<'",
            Self::Gt => "'>'",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::Comma => "','",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
