use crate::error::{JsopError, JsopResult};
use crate::token::TokenKind;

/// Pull-style reader over a protocol token stream.
///
/// Readers keep one token of lookahead. [`matches`](JsopReader::matches)
/// consumes the lookahead only when it has the requested kind, which lets
/// decoders branch on the next token without a separate peek/consume dance.
/// The text of the most recently consumed token stays available through
/// [`token`](JsopReader::token).
pub trait JsopReader {
    /// Kind of the next token, without consuming it.
    fn peek(&mut self) -> JsopResult<TokenKind>;

    /// Consume the next token, which must be of `kind`, and return its text.
    fn read(&mut self, kind: TokenKind) -> JsopResult<&str>;

    /// Consume the next token whatever its kind and return its text.
    ///
    /// Fails at end of input.
    fn read_any(&mut self) -> JsopResult<&str>;

    /// Consume the next token if it is of `kind`.
    fn matches(&mut self, kind: TokenKind) -> JsopResult<bool>;

    /// Text of the most recently consumed token.
    fn token(&self) -> &str;

    /// Byte offset of the next unconsumed token.
    fn position(&self) -> usize;

    /// Consume a quoted string and return its unescaped content.
    fn read_string(&mut self) -> JsopResult<String> {
        self.read(TokenKind::String).map(str::to_string)
    }

    /// Build a parse error at the current position.
    fn error(&self, message: impl Into<String>) -> JsopError
    where
        Self: Sized,
    {
        JsopError::parse(self.position(), message)
    }

    /// Consume one complete value: an atom, or a balanced array or object.
    fn skip_value(&mut self) -> JsopResult<()>
    where
        Self: Sized,
    {
        if self.matches(TokenKind::LeftBrace)? {
            if !self.matches(TokenKind::RightBrace)? {
                loop {
                    self.read(TokenKind::String)?;
                    self.read(TokenKind::Colon)?;
                    self.skip_value()?;
                    if !self.matches(TokenKind::Comma)? {
                        break;
                    }
                }
                self.read(TokenKind::RightBrace)?;
            }
            return Ok(());
        }
        if self.matches(TokenKind::LeftBracket)? {
            if !self.matches(TokenKind::RightBracket)? {
                loop {
                    self.skip_value()?;
                    if !self.matches(TokenKind::Comma)? {
                        break;
                    }
                }
                self.read(TokenKind::RightBracket)?;
            }
            return Ok(());
        }
        let kind = self.peek()?;
        if !kind.is_atom() {
            return Err(self.error(format!("expected a value, found {kind}")));
        }
        self.read_any()?;
        Ok(())
    }
}
