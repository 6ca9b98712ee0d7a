//! Lookahead tokenizer built on `winnow`.
//!
//! Each call to the lexer skips JSON whitespace and recognizes exactly one
//! token. A failed token is reported at its first byte, labelled with the
//! innermost `StrContext` the failing parser attached.

use winnow::ascii::{digit0, digit1};
use winnow::combinator::{alt, cut_err, delimited, not, opt, preceded};
use winnow::error::{ContextError, ErrMode, StrContext};
use winnow::stream::{AsChar, Location};
use winnow::token::{any, one_of, take_while};
use winnow::{LocatingSlice, ModalResult, Parser};

use crate::error::{JsopError, JsopResult};
use crate::reader::JsopReader;
use crate::token::TokenKind;

/// Lexer input: the unread part of the blob, tracking byte offsets.
type Input<'a> = LocatingSlice<&'a str>;

/// A recognized token kind with its text.
type Lexed = (TokenKind, String);

/// A lexed token with its source offset.
#[derive(Clone, Debug)]
struct Lexeme {
    kind: TokenKind,
    text: String,
    start: usize,
}

/// Lookahead tokenizer over a protocol blob.
///
/// Tokens are produced on demand: nothing past the lookahead is scanned, so a
/// decoder that stops early never pays for (or fails on) the rest of the blob.
pub struct JsopTokenizer<'a> {
    source: &'a str,
    rest: Input<'a>,
    lookahead: Option<Lexeme>,
    last: String,
}

impl<'a> JsopTokenizer<'a> {
    /// Create a tokenizer positioned at the start of `input`.
    pub fn new(input: &'a str) -> Self {
        Self {
            source: input,
            rest: LocatingSlice::new(input),
            lookahead: None,
            last: String::new(),
        }
    }

    fn fill(&mut self) -> JsopResult<&Lexeme> {
        let lexeme = match self.lookahead.take() {
            Some(lexeme) => lexeme,
            None => self.lex()?,
        };
        Ok(self.lookahead.insert(lexeme))
    }

    fn consume(&mut self) -> JsopResult<&str> {
        let lexeme = match self.lookahead.take() {
            Some(lexeme) => lexeme,
            None => self.lex()?,
        };
        self.last = lexeme.text;
        Ok(&self.last)
    }

    fn lex(&mut self) -> JsopResult<Lexeme> {
        skip_ws(&mut self.rest);
        let start = self.rest.current_token_start();

        if self.rest.is_empty() {
            return Ok(Lexeme {
                kind: TokenKind::End,
                text: String::new(),
                start,
            });
        }

        match next_token(&mut self.rest) {
            Ok((kind, text)) => Ok(Lexeme { kind, text, start }),
            Err(err) => Err(self.lex_error(start, &err)),
        }
    }

    fn lex_error(&self, start: usize, err: &ErrMode<ContextError>) -> JsopError {
        let label = match err {
            ErrMode::Backtrack(e) | ErrMode::Cut(e) => e.context().find_map(|c| match c {
                StrContext::Label(label) => Some(*label),
                _ => None,
            }),
            ErrMode::Incomplete(_) => None,
        };
        let message = match label {
            Some(label) => label.to_string(),
            None => {
                let bad = self.source[start..].chars().next().unwrap_or('?');
                format!("unexpected character {bad:?}")
            }
        };
        JsopError::parse(start, message)
    }
}

impl JsopReader for JsopTokenizer<'_> {
    fn peek(&mut self) -> JsopResult<TokenKind> {
        Ok(self.fill()?.kind)
    }

    fn read(&mut self, kind: TokenKind) -> JsopResult<&str> {
        let next = self.fill()?;
        if next.kind != kind {
            let found = describe(next);
            return Err(JsopError::parse(
                next.start,
                format!("expected {kind}, found {found}"),
            ));
        }
        self.consume()
    }

    fn read_any(&mut self) -> JsopResult<&str> {
        let next = self.fill()?;
        if next.kind == TokenKind::End {
            return Err(JsopError::parse(next.start, "unexpected end of input"));
        }
        self.consume()
    }

    fn matches(&mut self, kind: TokenKind) -> JsopResult<bool> {
        if self.fill()?.kind != kind {
            return Ok(false);
        }
        self.consume()?;
        Ok(true)
    }

    fn token(&self) -> &str {
        &self.last
    }

    fn position(&self) -> usize {
        match &self.lookahead {
            Some(lexeme) => lexeme.start,
            None => self.rest.current_token_start(),
        }
    }
}

impl std::fmt::Debug for JsopTokenizer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsopTokenizer")
            .field("len", &self.source.len())
            .field("position", &self.position())
            .field("last", &self.last)
            .finish()
    }
}

fn describe(lexeme: &Lexeme) -> String {
    match lexeme.kind {
        TokenKind::String => format!("string {:?}", lexeme.text),
        TokenKind::Number | TokenKind::Identifier => format!("{:?}", lexeme.text),
        kind => kind.to_string(),
    }
}

// =============================================================================
// Token parsers
// =============================================================================

/// JSON whitespace only: space, tab, line feed, carriage return.
fn is_ws(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn skip_ws(input: &mut Input<'_>) {
    let _: ModalResult<&str> = take_while(0.., is_ws).parse_next(input);
}

fn next_token(input: &mut Input<'_>) -> ModalResult<Lexed> {
    alt((parse_punctuation, parse_string, parse_number, parse_word)).parse_next(input)
}

fn parse_punctuation(input: &mut Input<'_>) -> ModalResult<Lexed> {
    any.verify_map(|c: char| TokenKind::from_punct(c).map(|kind| (kind, c.to_string())))
        .parse_next(input)
}

/// `"..."` with JSON escapes; the token text is the unescaped content.
fn parse_string(input: &mut Input<'_>) -> ModalResult<Lexed> {
    delimited(
        '"',
        parse_string_content,
        cut_err('"').context(StrContext::Label("unterminated string")),
    )
    .map(|text| (TokenKind::String, text))
    .parse_next(input)
}

fn parse_string_content(input: &mut Input<'_>) -> ModalResult<String> {
    let mut text = String::new();
    loop {
        let chunk: &str = take_while(0.., |c: char| c != '"' && c != '\\').parse_next(input)?;
        text.push_str(chunk);
        if !input.starts_with('\\') {
            return Ok(text);
        }
        '\\'.parse_next(input)?;
        let escaped = cut_err(parse_escape_char)
            .context(StrContext::Label("invalid escape sequence"))
            .parse_next(input)?;
        text.push(escaped);
    }
}

fn parse_escape_char(input: &mut Input<'_>) -> ModalResult<char> {
    let c: char = any.parse_next(input)?;
    match c {
        '"' => Ok('"'),
        '\\' => Ok('\\'),
        '/' => Ok('/'),
        'b' => Ok('\u{8}'),
        'f' => Ok('\u{c}'),
        'n' => Ok('\n'),
        'r' => Ok('\r'),
        't' => Ok('\t'),
        'u' => parse_unicode_escape(input),
        _ => Err(ErrMode::Backtrack(ContextError::new())),
    }
}

/// The `XXXX` of a `\uXXXX` escape, joining UTF-16 surrogate pairs.
fn parse_unicode_escape(input: &mut Input<'_>) -> ModalResult<char> {
    let high = parse_hex4(input)?;
    let code = if (0xD800..0xDC00).contains(&high) {
        let low = cut_err(preceded("\\u", parse_hex4))
            .context(StrContext::Label("unpaired surrogate in unicode escape"))
            .parse_next(input)?;
        if !(0xDC00..0xE000).contains(&low) {
            return Err(ErrMode::Cut(ContextError::new()));
        }
        0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
    } else {
        high
    };
    char::from_u32(code).ok_or_else(|| ErrMode::Backtrack(ContextError::new()))
}

fn parse_hex4(input: &mut Input<'_>) -> ModalResult<u32> {
    let hex: &str = take_while(4..=4, AsChar::is_hex_digit).parse_next(input)?;
    u32::from_str_radix(hex, 16).map_err(|_| ErrMode::Backtrack(ContextError::new()))
}

/// JSON number grammar; the token text is the literal as written.
fn parse_number(input: &mut Input<'_>) -> ModalResult<Lexed> {
    (
        opt('-'),
        alt((
            ('0', cut_err(not(digit1)).context(StrContext::Label("invalid number: leading zero")))
                .void(),
            (one_of('1'..='9'), digit0).void(),
        )),
        opt(preceded(
            '.',
            cut_err(digit1).context(StrContext::Label(
                "invalid number: expected digits after decimal point",
            )),
        )),
        opt(preceded(
            one_of(['e', 'E']),
            cut_err((opt(one_of(['+', '-'])), digit1))
                .context(StrContext::Label("invalid number: expected digits in exponent")),
        )),
    )
        .take()
        .map(|text: &str| (TokenKind::Number, text.to_string()))
        .parse_next(input)
}

/// A bare word: `true`, `false`, `null`, or any other identifier.
fn parse_word(input: &mut Input<'_>) -> ModalResult<Lexed> {
    take_while(1.., is_word_char)
        .map(|word: &str| {
            let kind = match word {
                "true" => TokenKind::True,
                "false" => TokenKind::False,
                "null" => TokenKind::Null,
                _ => TokenKind::Identifier,
            };
            (kind, word.to_string())
        })
        .parse_next(input)
}
