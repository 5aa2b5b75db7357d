//! Schema tokens.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub(crate) enum Token<'src> {
    #[token("---types---")]
    TypesSection,

    #[token("---functions---")]
    FunctionsSection,

    /// `#` immediately followed by the tag digits. Validated by the parser.
    #[regex(r"#[0-9A-Za-z_]+", |lex| &lex.slice()[1..])]
    Tag(&'src str),

    #[token("#")]
    Hash,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice())]
    Ident(&'src str),

    #[regex(r"[0-9]+", |lex| lex.slice())]
    Number(&'src str),

    #[token(":")]
    Colon,

    #[token("?")]
    Question,

    #[token(".")]
    Dot,

    #[token("=")]
    Eq,

    #[token(";")]
    Semi,

    #[token("<")]
    LAngle,

    #[token(">")]
    RAngle,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    // Only appear in core definitions, which are skipped.
    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("*")]
    Star,

    #[token("!")]
    Bang,

    /// Trivia, dropped before parsing.
    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,
}

impl Token<'_> {
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::TypesSection => "`---types---`".to_string(),
            Self::FunctionsSection => "`---functions---`".to_string(),
            Self::Tag(tag) => format!("`#{tag}`"),
            Self::Hash => "`#`".to_string(),
            Self::Ident(name) | Self::Number(name) => format!("`{name}`"),
            Self::Colon => "`:`".to_string(),
            Self::Question => "`?`".to_string(),
            Self::Dot => "`.`".to_string(),
            Self::Eq => "`=`".to_string(),
            Self::Semi => "`;`".to_string(),
            Self::LAngle => "`<`".to_string(),
            Self::RAngle => "`>`".to_string(),
            Self::LBrace => "`{`".to_string(),
            Self::RBrace => "`}`".to_string(),
            Self::LBracket => "`[`".to_string(),
            Self::RBracket => "`]`".to_string(),
            Self::Bang => "`!`".to_string(),
            Self::Star => "`*`".to_string(),
            Self::LineComment => "comment".to_string(),
        }
    }
}
