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

//! The compiled program and the backtracking matcher that runs it.
//!
//! A program is a flat sequence of tokens terminated by a [`TokenKind::End`]
//! sentinel, plus one shared pool of class characters that every bracket
//! expression's token indexes into. Each token carries its own repetition
//! range and greedy/atomic flags, so there are no separate repeat or split
//! instructions.
//!
//! A simple program for the pattern `ab+c`:
//!
//! ```text
//! 0: Literal('a') {1,1}
//! 1: Literal('b') {1,MAX} greedy
//! 2: Literal('c') {1,1}
//! 3: End
//! ```
//!
//! Matching walks the token sequence at a fixed starting offset. Tokens whose
//! repetition count admits no choice (`min == max`, or atomic tokens, which
//! commit to their first choice) are consumed iteratively. Only when a token
//! has a genuine range does the matcher recurse: it picks the count preferred
//! by greediness, tries the rest of the program, and steps the count one
//! repetition toward the other bound after each failed continuation. Failure
//! is an ordinary `None` local to the attempt, so nested attempts in flight
//! during recursion never share state.

use crate::prefilter::Prefilter;

/// The repetition bound used to mean "unbounded".
///
/// `*`, `+` and `{m,}` compile to a maximum of `MAX_REPEAT`, and a `{m,n}`
/// bound too large for the repetition type saturates to it. It is the maximum
/// value of the repetition count type, so no finite count can exceed it.
pub const MAX_REPEAT: u32 = u32::MAX;

/// Predefined character classes reachable with a backslash escape.
///
/// One table shared between top-level tokens and bracket-expression entries.
/// The boundary kinds consume no characters when they hold.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Predef {
    /// `\s`
    Whitespace,
    /// `\S`
    NotWhitespace,
    /// `\d`
    Digit,
    /// `\D`
    NotDigit,
    /// `\w`
    Word,
    /// `\W`
    NotWord,
    /// `\R`: `\r\n` or `\n`
    Newline,
    /// `\b`
    WordBoundary,
    /// `\B`
    NotWordBoundary,
}

impl Predef {
    pub(crate) fn from_escape(c: char) -> Option<Predef> {
        match c {
            's' => Some(Predef::Whitespace),
            'S' => Some(Predef::NotWhitespace),
            'd' => Some(Predef::Digit),
            'D' => Some(Predef::NotDigit),
            'w' => Some(Predef::Word),
            'W' => Some(Predef::NotWord),
            'R' => Some(Predef::Newline),
            'b' => Some(Predef::WordBoundary),
            'B' => Some(Predef::NotWordBoundary),
            _ => None,
        }
    }

    pub(crate) fn escape_letter(self) -> char {
        match self {
            Predef::Whitespace => 's',
            Predef::NotWhitespace => 'S',
            Predef::Digit => 'd',
            Predef::NotDigit => 'D',
            Predef::Word => 'w',
            Predef::NotWord => 'W',
            Predef::Newline => 'R',
            Predef::WordBoundary => 'b',
            Predef::NotWordBoundary => 'B',
        }
    }

    /// Checks the class at byte offset `ix` and returns the number of bytes
    /// consumed, or `None` if it does not hold there.
    pub(crate) fn check(self, text: &str, ix: usize) -> Option<usize> {
        match self {
            Predef::Whitespace => char_at(text, ix).filter(|&c| is_space(c)).map(char::len_utf8),
            Predef::NotWhitespace => char_at(text, ix)
                .filter(|&c| !is_space(c))
                .map(char::len_utf8),
            Predef::Digit => char_at(text, ix)
                .filter(char::is_ascii_digit)
                .map(char::len_utf8),
            Predef::NotDigit => char_at(text, ix)
                .filter(|c| !c.is_ascii_digit())
                .map(char::len_utf8),
            Predef::Word => char_at(text, ix).filter(|&c| is_word(c)).map(char::len_utf8),
            Predef::NotWord => char_at(text, ix)
                .filter(|&c| !is_word(c))
                .map(char::len_utf8),
            Predef::Newline => {
                if text[ix..].starts_with("\r\n") {
                    Some(2)
                } else if text[ix..].starts_with('\n') {
                    Some(1)
                } else {
                    None
                }
            }
            Predef::WordBoundary => {
                if at_word_boundary(text, ix) {
                    Some(0)
                } else {
                    None
                }
            }
            Predef::NotWordBoundary => {
                if at_word_boundary(text, ix) {
                    None
                } else {
                    Some(0)
                }
            }
        }
    }
}

/// Zero-width position assertions.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Assertion {
    /// `^`: start of text.
    StartText,
    /// `$`: end of text.
    EndText,
}

impl Assertion {
    fn check(self, text: &str, ix: usize) -> bool {
        match self {
            Assertion::StartText => ix == 0,
            Assertion::EndText => ix == text.len(),
        }
    }
}

/// One entry of a bracket expression in the shared class pool.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum ClassChar {
    /// An inclusive character range; a single member has `first == last`.
    Range { first: char, last: char },
    /// A predefined class used as a class member (not range-able).
    Predef(Predef),
    /// Terminates one bracket expression's run of entries.
    End,
}

/// What one token matches, without its repetition range.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// Matches exactly this character.
    Literal(char),
    /// Matches via a predefined classifier.
    Predef(Predef),
    /// Constrains the position without consuming anything.
    Assertion(Assertion),
    /// `.`: matches any one character.
    Any,
    /// A bracket expression; `start` indexes the program's class pool, where
    /// its entries run until the first [`ClassChar::End`].
    Class { start: usize, negated: bool },
    /// Terminates the token sequence; always matches, consuming nothing.
    End,
}

/// One compiled pattern element together with its repetition range.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) min: u32,
    pub(crate) max: u32,
    /// Greedy repetitions prefer `max` and step downward; lazy ones prefer
    /// `min` and step upward.
    pub(crate) greedy: bool,
    /// Atomic repetitions never revisit their count once chosen.
    pub(crate) atomic: bool,
}

impl Token {
    pub(crate) fn new(kind: TokenKind) -> Token {
        Token {
            kind,
            min: 1,
            max: 1,
            greedy: true,
            atomic: false,
        }
    }

    pub(crate) fn end() -> Token {
        Token::new(TokenKind::End)
    }
}

/// A compiled, immutable program: token sequence plus class pool.
///
/// Neither vector is touched after compilation, so class tokens' pool indexes
/// stay valid for the program's lifetime and matching can run concurrently
/// from any number of shared references.
#[derive(Debug, Clone)]
pub(crate) struct Prog {
    tokens: Vec<Token>,
    pool: Vec<ClassChar>,
    casei: bool,
    prefilter: Prefilter,
}

impl Prog {
    pub(crate) fn new(tokens: Vec<Token>, pool: Vec<ClassChar>, casei: bool) -> Prog {
        let prefilter = Prefilter::from_tokens(&tokens, casei);
        Prog {
            tokens,
            pool,
            casei,
            prefilter,
        }
    }

    pub(crate) fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub(crate) fn pool(&self) -> &[ClassChar] {
        &self.pool
    }

    /// Finds the leftmost match whose start is at or after byte offset `pos`,
    /// returning its byte range. Every position up to and including the end
    /// of the text is a candidate start.
    pub(crate) fn find_at(&self, text: &str, pos: usize) -> Option<(usize, usize)> {
        for p in self.prefilter.candidates(text, pos) {
            if let Some(len) = self.match_pattern(0, text, p) {
                return Some((p, p + len));
            }
        }
        None
    }

    /// Matches the token sequence starting at token `t` against `text`
    /// anchored exactly at byte offset `ix`. Returns the number of bytes
    /// consumed on success.
    fn match_pattern(&self, mut t: usize, text: &str, mut ix: usize) -> Option<usize> {
        let start = ix;

        // Tokens with a fixed count, and atomic tokens, admit exactly one
        // choice of repetition count; consume them iteratively so recursion
        // depth tracks choice points rather than pattern length.
        let token = loop {
            let token = &self.tokens[t];
            if let TokenKind::End = token.kind {
                return Some(ix - start);
            }
            if token.min != token.max && !token.atomic {
                break token;
            }
            let target = if token.greedy { token.max } else { token.min };
            let (count, used) = self.match_count(token, target, text, ix);
            if count < token.min {
                return None;
            }
            ix += used;
            t += 1;
        };

        let target = if token.greedy { token.max } else { token.min };
        let (mut count, mut used) = self.match_count(token, target, text, ix);
        if count < token.min {
            return None;
        }
        loop {
            if let Some(rest) = self.match_pattern(t + 1, text, ix + used) {
                return Some(ix - start + used + rest);
            }
            if token.greedy {
                if count <= token.min {
                    return None;
                }
                count -= 1;
            } else {
                if count >= token.max {
                    return None;
                }
                count += 1;
            }
            let (stepped, stepped_used) = self.match_count(token, count, text, ix);
            if stepped < count || stepped_used == used {
                // Either the token cannot match another repetition, or the
                // step left the continuation point where it already failed.
                return None;
            }
            count = stepped;
            used = stepped_used;
        }
    }

    /// Matches `token` up to `target` times in a row starting at `ix`,
    /// stopping at the first failure. Returns the achieved count and the
    /// bytes consumed.
    fn match_count(&self, token: &Token, target: u32, text: &str, ix: usize) -> (u32, usize) {
        let start = ix;
        let mut ix = ix;
        let mut count = 0;
        while count < target {
            match self.match_one(token, text, ix) {
                // A zero-width success repeats indefinitely without moving;
                // report the target as reached.
                Some(0) => return (target, ix - start),
                Some(used) => {
                    ix += used;
                    count += 1;
                }
                None => break,
            }
        }
        (count, ix - start)
    }

    /// Matches a single occurrence of `token` at `ix`, ignoring its
    /// repetition range. Returns the bytes consumed (zero for assertions and
    /// boundary classes).
    fn match_one(&self, token: &Token, text: &str, ix: usize) -> Option<usize> {
        match token.kind {
            TokenKind::Literal(want) => {
                let c = char_at(text, ix)?;
                if c == want || self.casei && c.eq_ignore_ascii_case(&want) {
                    Some(c.len_utf8())
                } else {
                    None
                }
            }
            TokenKind::Predef(predef) => predef.check(text, ix),
            TokenKind::Assertion(assertion) => {
                if assertion.check(text, ix) {
                    Some(0)
                } else {
                    None
                }
            }
            TokenKind::Any => char_at(text, ix).map(char::len_utf8),
            TokenKind::Class { start, negated } => self.match_class(start, negated, text, ix),
            TokenKind::End => unreachable!("the sentinel is handled by match_pattern"),
        }
    }

    fn match_class(&self, start: usize, negated: bool, text: &str, ix: usize) -> Option<usize> {
        let c = char_at(text, ix)?;
        let mut hit = false;
        for entry in &self.pool[start..] {
            match *entry {
                ClassChar::End => break,
                ClassChar::Range { first, last } => {
                    if range_contains(first, last, c, self.casei) {
                        hit = true;
                        break;
                    }
                }
                ClassChar::Predef(predef) => {
                    if predef.check(text, ix).is_some() {
                        hit = true;
                        break;
                    }
                }
            }
        }
        if hit != negated {
            Some(c.len_utf8())
        } else {
            None
        }
    }
}

fn range_contains(first: char, last: char, c: char, casei: bool) -> bool {
    if first <= c && c <= last {
        return true;
    }
    if casei && c.is_ascii_alphabetic() {
        let lower = c.to_ascii_lowercase();
        let upper = c.to_ascii_uppercase();
        first <= lower && lower <= last || first <= upper && upper <= last
    } else {
        false
    }
}

#[inline]
fn char_at(text: &str, ix: usize) -> Option<char> {
    text[ix..].chars().next()
}

// the C locale's isspace set
fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// At offset 0 there is a boundary iff the first character is a word
/// character; elsewhere iff exactly one of the surrounding characters is.
/// End of text counts as non-word.
fn at_word_boundary(text: &str, ix: usize) -> bool {
    let before = text[..ix].chars().next_back().map_or(false, is_word);
    let after = text[ix..].chars().next().map_or(false, is_word);
    before != after
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;
    use crate::RegexOptions;

    fn prog(pattern: &str) -> Prog {
        compile(pattern, &RegexOptions::default()).unwrap()
    }

    fn find(pattern: &str, text: &str) -> Option<(usize, usize)> {
        prog(pattern).find_at(text, 0)
    }

    #[test]
    fn literal_run_uses_fast_path() {
        assert_eq!(find("abc", "xxabcx"), Some((2, 5)));
        assert_eq!(find("abc", "xxabx"), None);
    }

    #[test]
    fn empty_program_matches_empty() {
        assert_eq!(find("", ""), Some((0, 0)));
        assert_eq!(find("", "abc"), Some((0, 0)));
    }

    #[test]
    fn greedy_takes_most() {
        assert_eq!(find("a*", "aaab"), Some((0, 3)));
        assert_eq!(find("a*b", "aaab"), Some((0, 4)));
        assert_eq!(find("a{1,2}", "aaa"), Some((0, 2)));
    }

    #[test]
    fn lazy_takes_least() {
        assert_eq!(find("a*?", "aaab"), Some((0, 0)));
        assert_eq!(find("a*?b", "aaab"), Some((0, 4)));
        assert_eq!(find("a{1,3}?", "aaa"), Some((0, 1)));
    }

    #[test]
    fn lazy_stops_when_token_runs_dry() {
        // The continuation can never match; the lazy count must stop growing
        // once the token stops consuming, not creep toward MAX_REPEAT.
        assert_eq!(find("a*?x", "aaa"), None);
    }

    #[test]
    fn atomic_never_gives_back() {
        assert_eq!(find("a++a", "aaa"), None);
        assert_eq!(find("a+a", "aaa"), Some((0, 3)));
        assert_eq!(find("a*+b", "aaab"), Some((0, 4)));
        assert_eq!(find("a*+ab", "aaab"), None);
    }

    #[test]
    fn lazy_atomic_commits_to_minimum() {
        assert_eq!(find("a*?+b", "aaab"), Some((3, 4)));
        assert_eq!(find("a+?+b", "aaab"), Some((2, 4)));
    }

    #[test]
    fn fixed_count_fails_without_backtracking() {
        assert_eq!(find("a{2}", "a"), None);
        assert_eq!(find("a{2}", "aaa"), Some((0, 2)));
        assert_eq!(find("a{2,}b", "aab"), Some((0, 3)));
        assert_eq!(find("a{3,}b", "aab"), None);
    }

    #[test]
    fn assertions_consume_nothing() {
        assert_eq!(find("^abc$", "abc"), Some((0, 3)));
        assert_eq!(find("^abc$", "xabc"), None);
        assert_eq!(find("^", "abc"), Some((0, 0)));
        assert_eq!(find("$", "abc"), Some((3, 3)));
        assert_eq!(find("^$", ""), Some((0, 0)));
        assert_eq!(find("^$", "a"), None);
    }

    #[test]
    fn word_boundaries() {
        assert_eq!(find(r"\bcat\b", "a cat sat"), Some((2, 5)));
        assert_eq!(find(r"\bcat\b", "concatenate"), None);
        assert_eq!(find(r"\B", "ab"), Some((1, 1)));
        assert_eq!(find(r"\b", ""), None);
        assert_eq!(find(r"\B", ""), Some((0, 0)));
    }

    #[test]
    fn zero_width_repetition_terminates() {
        // `\b` can repeat forever without progress; both directions of the
        // backtracking step must notice and give up in bounded time.
        assert_eq!(find(r"\b*x", "y"), None);
        assert_eq!(find(r"\b*?x", "y"), None);
        assert_eq!(find(r"\b{3}a", "a"), Some((0, 1)));
    }

    #[test]
    fn newline_sequence_width() {
        assert_eq!(find(r"a\Rb", "a\r\nb"), Some((0, 4)));
        assert_eq!(find(r"a\Rb", "a\nb"), Some((0, 3)));
        assert_eq!(find(r"a\Rb", "a\rb"), None);
    }

    #[test]
    fn wildcard_matches_newline_but_not_end() {
        assert_eq!(find(".", "\n"), Some((0, 1)));
        assert_eq!(find(".", ""), None);
    }

    #[test]
    fn classes_and_negation() {
        assert_eq!(find("[a-c]", "zb"), Some((1, 2)));
        assert_eq!(find("[^a-c]", "abcz"), Some((3, 4)));
        assert_eq!(find("[^a-c]", "abc"), None);
        assert_eq!(find("[^a-c]", ""), None);
        assert_eq!(find(r"[\d]", "x7"), Some((1, 2)));
        assert_eq!(find(r"[^\d]", "7"), None);
    }

    #[test]
    fn empty_class_matches_nothing() {
        assert_eq!(find("[]", "abc"), None);
        assert_eq!(find("[^]", "abc"), Some((0, 1)));
        assert_eq!(find("[^]", ""), None);
    }

    #[test]
    fn inverted_range_is_unsatisfiable() {
        assert_eq!(find("[z-a]", "abcz"), None);
        assert_eq!(find("[^z-a]", "a"), Some((0, 1)));
    }

    #[test]
    fn multibyte_text_offsets_are_bytes() {
        assert_eq!(find("é", "café"), Some((3, 5)));
        assert_eq!(find(".x", "héx"), Some((1, 4)));
        assert_eq!(find("[à-ë]", "zé"), Some((1, 3)));
    }

    #[test]
    fn case_insensitive_literals_and_ranges() {
        let options = RegexOptions {
            case_insensitive: true,
            ..RegexOptions::default()
        };
        let prog = compile("a[B-D]+z", &options).unwrap();
        assert_eq!(prog.find_at("AbCdZ", 0), Some((0, 5)));
        assert_eq!(prog.find_at("a!z", 0), None);
    }

    #[test]
    fn leftmost_first_not_longest() {
        // An earlier, shorter match wins over a later, longer one.
        assert_eq!(find("a+", "ba aaa"), Some((1, 2)));
    }

    #[test]
    fn backtracking_distributes_repetitions() {
        assert_eq!(find(r"\d+5", "12345"), Some((0, 5)));
        assert_eq!(find("a*aa", "aaa"), Some((0, 3)));
        assert_eq!(find(".*c", "abcabc"), Some((0, 6)));
    }
}
