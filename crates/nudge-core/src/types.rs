//! Core types for Nudge

use std::fmt;
use std::sync::Arc;

/// A normalized unit of text: a lower-cased word or one of `. , ! ? ;`
///
/// Tokens are only produced by [`crate::Tokenizer`]. The text is shared, so
/// cloning a token into a continuation list does not copy the string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(Arc<str>);

impl Token {
    pub(crate) fn new(text: &str) -> Self {
        Self(Arc::from(text))
    }

    /// Token text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Token {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.as_str().to_owned()
    }
}

/// Two consecutive tokens, used as a lookup key. Order matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bigram {
    /// Earlier of the two tokens
    pub first: Token,

    /// Later of the two tokens
    pub second: Token,
}

impl Bigram {
    /// Create a bigram from two consecutive tokens
    pub fn new(first: Token, second: Token) -> Self {
        Self { first, second }
    }

    /// Bigram formed by the last two tokens of a sequence, if there are two
    pub fn trailing(tokens: &[Token]) -> Option<Self> {
        match tokens {
            [.., first, second] => Some(Self::new(first.clone(), second.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for Bigram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {})", self.first, self.second)
    }
}
