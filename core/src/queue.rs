//! Cursor over command-line tokens.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// A command-line token and its position in the original argument list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub index: usize,
}

/// Front-consuming queue of tokens that remembers original positions.
///
/// Tokens before the start offset are never visible, but indices always refer
/// to the full argument list so diagnostics point at the right argument.
///
/// # Examples
///
/// ```
/// use optscan_core::TokenQueue;
///
/// let mut queue = TokenQueue::new(&["prog", "-o", "out.txt"], 1);
/// assert_eq!(queue.remaining(), 2);
///
/// let flag = queue.pop_front().unwrap();
/// assert_eq!((flag.text.as_str(), flag.index), ("-o", 1));
///
/// // Not enough tokens: nothing is consumed.
/// assert!(queue.pop_n(2).is_none());
/// assert_eq!(queue.pop_n(1).unwrap()[0].text, "out.txt");
/// assert!(queue.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TokenQueue {
    tokens: VecDeque<Token>,
}

impl TokenQueue {
    /// Builds a queue over `args`, skipping the first `offset` entries.
    pub fn new<S: AsRef<str>>(args: &[S], offset: usize) -> Self {
        let tokens = args
            .iter()
            .enumerate()
            .skip(offset)
            .map(|(index, arg)| Token {
                text: arg.as_ref().to_string(),
                index,
            })
            .collect();
        Self { tokens }
    }

    /// Removes and returns the next token.
    pub fn pop_front(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }

    /// Removes and returns the next `n` tokens in order.
    ///
    /// Returns `None` without consuming anything when fewer than `n` remain.
    pub fn pop_n(&mut self, n: usize) -> Option<Vec<Token>> {
        if n > self.tokens.len() {
            return None;
        }
        Some(self.tokens.drain(..n).collect())
    }

    /// Removes and returns every remaining token.
    pub fn drain(&mut self) -> Vec<Token> {
        self.tokens.drain(..).collect()
    }

    /// Number of unconsumed tokens.
    pub fn remaining(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
