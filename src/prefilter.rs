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

//! Candidate starting positions for the unanchored search.
//!
//! The search tries a full program match at successive text positions. When
//! the first token forces something recognizable at the very start of any
//! match, most positions can be ruled out without running the matcher:
//!
//! * a start-of-text assertion that must match at least once pins the search
//!   to offset 0;
//! * a literal that must match at least once means a match can only start
//!   where its leading byte occurs, which `memchr` finds in bulk (two needle
//!   bytes under case-insensitive matching).
//!
//! Candidates are starting points only; the matcher re-validates every one,
//! so a leading-byte false positive costs a failed attempt and nothing else.

use memchr::{memchr2_iter, memchr_iter, Memchr, Memchr2};

use crate::next_codepoint_ix;
use crate::vm::{Assertion, Token, TokenKind};

/// How the search narrows down candidate starting positions.
#[derive(Debug, Clone)]
pub(crate) enum Prefilter {
    /// Only offset 0 can start a match.
    Anchored,
    /// A match can only start at an occurrence of one of these bytes.
    Leading(u8, Option<u8>),
    /// No usable information; every position is a candidate.
    Scan,
}

impl Prefilter {
    pub(crate) fn from_tokens(tokens: &[Token], casei: bool) -> Prefilter {
        let first = match tokens.first() {
            Some(first) => first,
            None => return Prefilter::Scan,
        };
        // with a zero minimum the first token may be skipped entirely
        if first.min == 0 {
            return Prefilter::Scan;
        }
        match first.kind {
            TokenKind::Assertion(Assertion::StartText) => Prefilter::Anchored,
            TokenKind::Literal(c) => {
                if casei && c.is_ascii_alphabetic() {
                    Prefilter::Leading(
                        c.to_ascii_lowercase() as u8,
                        Some(c.to_ascii_uppercase() as u8),
                    )
                } else {
                    let mut buf = [0u8; 4];
                    let b = c.encode_utf8(&mut buf).as_bytes()[0];
                    Prefilter::Leading(b, None)
                }
            }
            _ => Prefilter::Scan,
        }
    }

    /// Candidate match starts at or after byte offset `pos`, in increasing
    /// order. For `Scan` this is every character boundary from `pos` up to
    /// and including the end of the text.
    pub(crate) fn candidates<'t>(&self, text: &'t str, pos: usize) -> Candidates<'t> {
        match *self {
            Prefilter::Anchored => Candidates::One(if pos == 0 { Some(0) } else { None }),
            Prefilter::Leading(b, None) => Candidates::Bytes {
                it: memchr_iter(b, &text.as_bytes()[pos..]),
                base: pos,
            },
            Prefilter::Leading(b1, Some(b2)) => Candidates::TwoBytes {
                it: memchr2_iter(b1, b2, &text.as_bytes()[pos..]),
                base: pos,
            },
            Prefilter::Scan => Candidates::Scan {
                text,
                next: Some(pos),
            },
        }
    }
}

/// Iterator over candidate starting positions.
pub(crate) enum Candidates<'t> {
    One(Option<usize>),
    Bytes { it: Memchr<'t>, base: usize },
    TwoBytes { it: Memchr2<'t>, base: usize },
    Scan { text: &'t str, next: Option<usize> },
}

impl<'t> Iterator for Candidates<'t> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        match self {
            Candidates::One(pos) => pos.take(),
            Candidates::Bytes { it, base } => it.next().map(|p| p + *base),
            Candidates::TwoBytes { it, base } => it.next().map(|p| p + *base),
            Candidates::Scan { text, next } => {
                let pos = (*next)?;
                *next = if pos >= text.len() {
                    None
                } else {
                    Some(next_codepoint_ix(text, pos))
                };
                Some(pos)
            }
        }
    }
}
