use logos::Logos;

/// Raw, macro-oblivious token classes over a flat buffer slice.
///
/// This deliberately knows nothing about macros or the syntax tree; it only
/// has to distinguish comments from everything else and recognize the
/// statement terminator. Any byte sequence the lexer cannot classify still
/// counts as a significant token.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\x0c]+")]
pub enum RawToken {
    #[regex(r"//[^\n]*")]
    LineComment,

    // Runs to the closing "*/", or to the end of the slice when none is
    // found: the window being lexed may cut a comment off before its
    // terminator.
    #[token("/*", |lex| {
        let rest = lex.remainder();
        match rest.find("*/") {
            Some(i) => lex.bump(i + 2),
            None => lex.bump(rest.len()),
        }
    })]
    BlockComment,

    #[token(";")]
    Terminator,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    // pp-number: digits, identifier characters, dots, exponent signs
    #[regex(r"[0-9](?:[0-9A-Za-z_.]|[eEpP][+-])*")]
    Number,

    #[regex(r#""(?:[^"\\\n]|\\.)*""#)]
    StringLit,

    #[regex(r"'(?:[^'\\\n]|\\.)*'")]
    CharLit,

    // Any single significant character not covered above. The terminator is
    // excluded so it always lexes as its own class.
    #[regex(r"[^ \t\r\n\x0cA-Za-z0-9_;]")]
    Punct,
}

impl RawToken {
    pub fn is_comment(self) -> bool {
        matches!(self, RawToken::LineComment | RawToken::BlockComment)
    }
}

/// A raw token with its byte range relative to the lexed slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLexeme {
    /// `None` when the input could not be classified; still significant.
    pub token: Option<RawToken>,
    pub start: u32,
    pub end: u32,
}

/// Lex a buffer slice into raw tokens, in order.
///
/// An unterminated block comment swallows the rest of the slice, matching
/// the behavior of lexing a bracketed window out of a larger buffer: the
/// comment's terminator may simply lie beyond the window.
pub fn raw_tokens(slice: &str) -> Vec<RawLexeme> {
    let mut out = Vec::new();
    let mut lex = RawToken::lexer(slice);
    while let Some(res) = lex.next() {
        let span = lex.span();
        out.push(RawLexeme {
            token: res.ok(),
            start: span.start as u32,
            end: span.end as u32,
        });
    }
    out
}
