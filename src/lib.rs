// Copyright 2019 The Mini Regex Authors.
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.

/*!
A miniature regular expression engine.

A pattern compiles into a small fixed-capacity token program, which a
backtracking matcher then runs against text. The syntax is deliberately
restricted (no groups, no alternation, no lookaround), but the quantifiers
are richer than usual: every token can be greedy, lazy, or *atomic*
(possessive), and deterministic runs of tokens match iteratively so
backtracking only happens where the pattern leaves a real choice.

# Usage

Compile a pattern, then use it to search text:

```rust
use mini_regex::Regex;

let re = Regex::new(r"\d+").unwrap();
let m = re.find("order 66 confirmed").unwrap();
assert_eq!(m.start(), 6);
assert_eq!(m.as_str(), "66");
```

Iterate over every non-overlapping match:

```rust
use mini_regex::Regex;

let re = Regex::new(r"\w+").unwrap();
let words: Vec<_> = re.find_iter("lazy brown fox").map(|m| m.as_str()).collect();
assert_eq!(words, ["lazy", "brown", "fox"]);
```

Atomic quantifiers commit to their repetition count and never give
characters back, even if that makes the rest of the pattern fail:

```rust
use mini_regex::Regex;

let re = Regex::new("a++a").unwrap();
assert!(!re.is_match("aaa"));
let re = Regex::new("a+a").unwrap();
assert!(re.is_match("aaa"));
```

One-shot conveniences compile and search in a single call:

```rust
assert_eq!(mini_regex::count_all("a", "banana").unwrap(), 3);
```

# Syntax

Escapes:

`\s` `\S`
: whitespace / not whitespace \
`\d` `\D`
: ASCII digit / not digit \
`\w` `\W`
: word character (`[0-9A-Za-z_]`) / not word character \
`\R`
: newline sequence, `\r\n` or `\n` \
`\b` `\B`
: word boundary / not word boundary (these consume nothing) \
`\x`
: any other escaped character is that literal character

Anchors and the wildcard:

`^` `$`
: start / end of text (there is no multiline mode) \
`.`
: any single character, *including* newline

Bracket expressions:

`[abc]` `[a-z]`
: any listed character or range member \
`[^...]`
: any character not listed; fails at end of text \
`[\d\w]`
: predefined classes work inside brackets, but cannot be range endpoints \
`[a-c-]`
: a dash before `]` is an ordinary member

Quantifiers, applicable to any token:

`?` `*` `+`
: zero-or-one, zero-or-more, one-or-more \
`{m}` `{m,}` `{m,n}`
: counted forms; a malformed brace expression is not an error, the `{` is
just an ordinary character \
`?` suffix
: lazy: prefer the fewest repetitions (`a*?`) \
`+` suffix
: atomic: never revisit the chosen count (`a*+`, `a?+`, `a*?+`)

# Limits

A program holds at most [`DEFAULT_MAX_TOKENS`] tokens and
[`DEFAULT_MAX_CLASS_CHARS`] class-pool entries unless raised with
[`RegexBuilder`]; exceeding a limit is a compile error, never a silent
truncation. Repetition bounds saturate at [`MAX_REPEAT`], which also serves
as the "unbounded" sentinel for `*`, `+` and `{m,}`.

# Sharing

A compiled [`Regex`] is immutable: matching takes `&self` and keeps all of
its state on the call stack, so one instance can be shared freely across
threads.
*/

#![doc(html_root_url = "https://docs.rs/mini-regex/0.3.0")]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::redundant_else)]
#![allow(clippy::similar_names)]

use std::fmt;
use std::iter::FusedIterator;
use std::ops::Range;
use std::str::FromStr;

mod compile;
mod error;
mod prefilter;
mod render;
mod vm;

use crate::vm::Prog;

pub use crate::compile::{DEFAULT_MAX_CLASS_CHARS, DEFAULT_MAX_TOKENS};
pub use crate::error::{CompileError, Result};
pub use crate::vm::MAX_REPEAT;

// the public API

/// A compiled regular expression.
#[derive(Debug, Clone)]
pub struct Regex {
    pattern: String,
    prog: Prog,
}

impl Regex {
    /// Parse and compile a regex with default options, see [`RegexBuilder`].
    ///
    /// # Errors
    ///
    /// Returns a [`CompileError`] if the pattern is malformed or exceeds the
    /// default limits.
    #[inline]
    pub fn new(pattern: impl Into<String>) -> Result<Regex> {
        RegexBuilder::new().build(pattern)
    }

    /// Returns the original pattern string used to create this regex.
    #[must_use]
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Check if the regex matches anywhere in the input text.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use mini_regex::Regex;
    /// let re = Regex::new(r"\bfox\b").unwrap();
    /// assert!(re.is_match("the quick brown fox"));
    /// ```
    #[must_use]
    #[inline]
    pub fn is_match(&self, text: &str) -> bool {
        self.find(text).is_some()
    }

    /// Find the first match in the input text.
    ///
    /// The scan is leftmost-first: the earliest position with any match wins,
    /// and at that position greediness alone decides the length. Matching
    /// itself cannot fail, so there is no error to handle, only `None`.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use mini_regex::Regex;
    /// let re = Regex::new("a+").unwrap();
    /// let m = re.find("ba aaa").unwrap();
    /// assert_eq!((m.start(), m.end()), (1, 2));
    /// ```
    #[must_use]
    #[inline]
    pub fn find<'t>(&self, text: &'t str) -> Option<Match<'t>> {
        self.find_from_pos(text, 0)
    }

    /// Returns the first match whose start is at or after byte position
    /// `pos`.
    ///
    /// Positions up to and including `text.len()` are tried, so patterns
    /// matching the empty string match at the very end too.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is greater than `text.len()` or does not lie on a
    /// character boundary.
    #[must_use]
    #[inline]
    pub fn find_from_pos<'t>(&self, text: &'t str, pos: usize) -> Option<Match<'t>> {
        self.prog
            .find_at(text, pos)
            .map(|(start, end)| Match { text, start, end })
    }

    /// Returns an iterator over successive non-overlapping matches in
    /// `text`.
    ///
    /// Zero-length matches are reported like any others; the scan advances
    /// by one character after each of them, so the iterator always
    /// terminates.
    #[must_use]
    #[inline]
    pub fn find_iter<'r, 't>(&'r self, text: &'t str) -> Matches<'r, 't> {
        Matches {
            re: self,
            text,
            next_start: Some(0),
        }
    }

    /// Counts the non-overlapping matches in `text`.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use mini_regex::Regex;
    /// let re = Regex::new("an").unwrap();
    /// assert_eq!(re.count_matches("banana"), 2);
    /// ```
    #[must_use]
    #[inline]
    pub fn count_matches(&self, text: &str) -> usize {
        self.find_iter(text).count()
    }

    /// Reconstructs pattern text from the compiled program, for diagnostics.
    ///
    /// The result is not necessarily the input pattern byte for byte, since
    /// quantifiers normalize to their shortest spelling, but recompiling it
    /// yields a program with identical match behavior.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use mini_regex::Regex;
    /// let re = Regex::new("a{0,1}b{1,}").unwrap();
    /// assert_eq!(re.render(), "a?b+");
    /// ```
    #[must_use]
    pub fn render(&self) -> String {
        render::render(&self.prog)
    }
}

impl FromStr for Regex {
    type Err = CompileError;

    /// Attempts to parse a string into a regular expression
    fn from_str(s: &str) -> Result<Regex> {
        Regex::new(s)
    }
}

/// Compiles `pattern` and returns the first match in `text`.
///
/// Convenience for one-shot searches; compile once with [`Regex::new`] when
/// matching repeatedly.
///
/// # Errors
///
/// Returns a [`CompileError`] if the pattern fails to compile.
#[inline]
pub fn find_first<'t>(pattern: &str, text: &'t str) -> Result<Option<Match<'t>>> {
    Ok(Regex::new(pattern)?.find(text))
}

/// Compiles `pattern` and counts its non-overlapping matches in `text`.
///
/// # Errors
///
/// Returns a [`CompileError`] if the pattern fails to compile.
#[inline]
pub fn count_all(pattern: &str, text: &str) -> Result<usize> {
    Ok(Regex::new(pattern)?.count_matches(text))
}

#[derive(Debug, Copy, Clone)]
pub(crate) struct RegexOptions {
    pub(crate) max_tokens: usize,
    pub(crate) max_class_chars: usize,
    pub(crate) case_insensitive: bool,
}

impl Default for RegexOptions {
    fn default() -> Self {
        RegexOptions {
            max_tokens: DEFAULT_MAX_TOKENS,
            max_class_chars: DEFAULT_MAX_CLASS_CHARS,
            case_insensitive: false,
        }
    }
}

/// A builder for a [`Regex`] to allow configuring options.
#[derive(Debug, Copy, Clone, Default)]
pub struct RegexBuilder(RegexOptions);

impl RegexBuilder {
    /// Create a new regex builder with default options.
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the [`Regex`].
    ///
    /// # Errors
    ///
    /// Returns a [`CompileError`] if the pattern is malformed or exceeds the
    /// configured limits.
    #[inline]
    pub fn build(&self, pattern: impl Into<String>) -> Result<Regex> {
        let pattern = pattern.into();
        let prog = compile::compile(&pattern, &self.0)?;
        Ok(Regex { pattern, prog })
    }

    /// Limit on the number of tokens one program may hold; compilation fails
    /// with [`CompileError::TooManyTokens`] beyond it. This bounds program
    /// memory and backtracking recursion depth.
    ///
    /// Default is [`DEFAULT_MAX_TOKENS`].
    #[inline]
    pub fn max_tokens(&mut self, limit: usize) -> &mut Self {
        self.0.max_tokens = limit;
        self
    }

    /// Limit on the number of class-pool entries one program may hold
    /// (bracket-expression members plus one terminator per expression);
    /// compilation fails with [`CompileError::BufferExhausted`] beyond it.
    ///
    /// Default is [`DEFAULT_MAX_CLASS_CHARS`].
    #[inline]
    pub fn max_class_chars(&mut self, limit: usize) -> &mut Self {
        self.0.max_class_chars = limit;
        self
    }

    /// Match literal characters and class ranges without regard to ASCII
    /// case, so `abcd` matches `aBcD` and `[A-H]+` matches `abcdefgh`.
    ///
    /// Default is false.
    #[inline]
    pub fn case_insensitive(&mut self, yes: bool) -> &mut Self {
        self.0.case_insensitive = yes;
        self
    }
}

/// A single match of a regex in an input text.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Match<'t> {
    text: &'t str,
    start: usize,
    end: usize,
}

impl<'t> Match<'t> {
    /// Returns the starting byte offset of the match in the text.
    #[must_use]
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the ending byte offset of the match in the text.
    #[must_use]
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns the range over the starting and ending byte offsets of the
    /// match in the text.
    #[must_use]
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns the matched text.
    #[must_use]
    #[inline]
    pub fn as_str(&self) -> &'t str {
        &self.text[self.start..self.end]
    }

    /// Returns the length, in bytes, of this match.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if and only if this match has a length of zero.
    ///
    /// Note that an empty match can only occur when the regex itself can
    /// match the empty string.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl<'t> AsRef<str> for Match<'t> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<'t> From<Match<'t>> for Range<usize> {
    fn from(m: Match<'t>) -> Range<usize> {
        m.range()
    }
}

impl<'t> fmt::Display for Match<'t> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An iterator over all non-overlapping matches for a particular string.
///
/// `'r` is the lifetime of the compiled regular expression and `'t` is the
/// lifetime of the matched string.
///
/// After each match the scan resumes at the match end, or one character
/// later if the match was empty, so every zero-length match the scan reaches
/// is reported exactly once and the iterator always terminates.
#[derive(Debug, Clone)]
pub struct Matches<'r, 't> {
    re: &'r Regex,
    text: &'t str,
    next_start: Option<usize>,
}

impl<'r, 't> Matches<'r, 't> {
    /// Return the text being searched.
    #[must_use]
    #[inline]
    pub fn text(&self) -> &'t str {
        self.text
    }

    /// Return the underlying regex.
    #[must_use]
    #[inline]
    pub fn regex(&self) -> &'r Regex {
        self.re
    }
}

impl<'r, 't> Iterator for Matches<'r, 't> {
    type Item = Match<'t>;

    fn next(&mut self) -> Option<Match<'t>> {
        let from = self.next_start?;
        match self.re.find_from_pos(self.text, from) {
            None => {
                self.next_start = None;
                None
            }
            Some(m) => {
                self.next_start = if m.is_empty() {
                    if m.end() >= self.text.len() {
                        None
                    } else {
                        Some(next_codepoint_ix(self.text, m.end()))
                    }
                } else {
                    Some(m.end())
                };
                Some(m)
            }
        }
    }
}

impl<'r, 't> FusedIterator for Matches<'r, 't> {}

#[inline]
fn codepoint_len(b: u8) -> usize {
    match b {
        b if b < 0x80 => 1,
        b if b < 0xe0 => 2,
        b if b < 0xf0 => 3,
        _ => 4,
    }
}

// precondition: ix is a character boundary below s.len()
#[inline]
pub(crate) fn next_codepoint_ix(s: &str, ix: usize) -> usize {
    ix + codepoint_len(s.as_bytes()[ix])
}

#[cfg(test)]
mod tests {
    use super::*;
    use matches::assert_matches;

    #[test]
    fn find_reports_byte_offsets() {
        let re = Regex::new(r"\d+").unwrap();
        let m = re.find("abc 123 def").unwrap();
        assert_eq!(m.range(), 4..7);
        assert_eq!(m.as_str(), "123");
        assert_eq!(m.len(), 3);
        assert!(!m.is_empty());
    }

    #[test]
    fn find_from_pos_skips_earlier_matches() {
        let re = Regex::new("a").unwrap();
        let m = re.find_from_pos("banana", 2).unwrap();
        assert_eq!(m.start(), 3);
        assert!(re.find_from_pos("banana", 6).is_none());
    }

    #[test]
    fn find_iter_collects_all_matches() {
        let re = Regex::new("a").unwrap();
        let starts: Vec<_> = re.find_iter("banana").map(|m| m.start()).collect();
        assert_eq!(starts, [1, 3, 5]);
    }

    #[test]
    fn empty_matches_advance_one_position() {
        let re = Regex::new("x*").unwrap();
        let matches: Vec<_> = re.find_iter("abc").map(|m| m.range()).collect();
        assert_eq!(matches, [0..0, 1..1, 2..2, 3..3]);
        assert_eq!(re.count_matches("abc"), 4);
    }

    #[test]
    fn mixed_empty_and_real_matches() {
        let re = Regex::new("a*").unwrap();
        let matches: Vec<_> = re.find_iter("aaab").map(|m| m.range()).collect();
        assert_eq!(matches, [0..3, 3..3, 4..4]);
    }

    #[test]
    fn count_matches_basics() {
        assert_eq!(count_all("a", "banana").unwrap(), 3);
        assert_eq!(count_all("a", "").unwrap(), 0);
        assert_eq!(count_all("an", "banana").unwrap(), 2);
    }

    #[test]
    fn one_shot_helpers_propagate_compile_errors() {
        assert_matches!(find_first("[abc", "x"), Err(CompileError::UnterminatedClass));
        assert_matches!(count_all("abc\\", "x"), Err(CompileError::TrailingBackslash));
        let m = find_first("an", "banana").unwrap().unwrap();
        assert_eq!(m.start(), 1);
    }

    #[test]
    fn from_str_and_as_str() {
        let re: Regex = r"\w+".parse().unwrap();
        assert_eq!(re.as_str(), r"\w+");
        assert!(r"abc\".parse::<Regex>().is_err());
    }

    #[test]
    fn builder_limits_are_enforced() {
        let err = RegexBuilder::new().max_tokens(3).build("abcd").unwrap_err();
        assert_matches!(err, CompileError::TooManyTokens { limit: 3 });
        let re = RegexBuilder::new().max_tokens(4).build("abcd").unwrap();
        assert!(re.is_match("xabcd"));
    }

    #[test]
    fn builder_case_insensitive() {
        let re = RegexBuilder::new()
            .case_insensitive(true)
            .build("abcd")
            .unwrap();
        assert!(re.is_match("aBcD"));
        let re = Regex::new("abcd").unwrap();
        assert!(!re.is_match("aBcD"));
    }

    #[test]
    fn match_display_shows_matched_text() {
        let re = Regex::new(r"\d+").unwrap();
        let m = re.find("x42").unwrap();
        assert_eq!(m.to_string(), "42");
        assert_eq!(m.as_ref(), "42");
        assert_eq!(Range::from(m), 1..3);
    }

    #[test]
    fn regex_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Regex>();
    }

    #[test]
    fn iterator_is_fused() {
        let re = Regex::new("a").unwrap();
        let mut it = re.find_iter("a");
        assert!(it.next().is_some());
        assert!(it.next().is_none());
        assert!(it.next().is_none());
    }
}
