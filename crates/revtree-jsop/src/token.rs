use std::fmt;

/// Lexical category of a protocol token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// Quoted string; the token text is the unescaped content.
    String,
    /// Number in JSON notation; the token text is the literal as written.
    Number,
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
    /// Any other bare word.
    Identifier,
    /// End of input.
    End,
}

impl TokenKind {
    /// The punctuation kind for a structural character, if any.
    pub fn from_punct(c: char) -> Option<Self> {
        match c {
            '{' => Some(Self::LeftBrace),
            '}' => Some(Self::RightBrace),
            '[' => Some(Self::LeftBracket),
            ']' => Some(Self::RightBracket),
            ',' => Some(Self::Comma),
            ':' => Some(Self::Colon),
            _ => None,
        }
    }

    /// Returns `true` for tokens that form a complete value on their own.
    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            Self::String | Self::Number | Self::True | Self::False | Self::Null | Self::Identifier
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LeftBrace => write!(f, "'{{'"),
            Self::RightBrace => write!(f, "'}}'"),
            Self::LeftBracket => write!(f, "'['"),
            Self::RightBracket => write!(f, "']'"),
            Self::Comma => write!(f, "','"),
            Self::Colon => write!(f, "':'"),
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
            Self::True => write!(f, "'true'"),
            Self::False => write!(f, "'false'"),
            Self::Null => write!(f, "'null'"),
            Self::Identifier => write!(f, "identifier"),
            Self::End => write!(f, "end of input"),
        }
    }
}
