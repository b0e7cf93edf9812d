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

//! Reconstruction of pattern text from a compiled program, for diagnostics.
//!
//! The output is not the original pattern byte for byte: quantifiers
//! normalize to their shortest spelling and literals that would re-parse as
//! metacharacters come out escaped. What the output guarantees is that
//! recompiling it yields a program with identical match behavior.

use std::fmt::Write;

use crate::vm::{Assertion, ClassChar, Prog, Token, TokenKind, MAX_REPEAT};

/// Renders `prog` back to pattern text.
pub(crate) fn render(prog: &Prog) -> String {
    let mut out = String::new();
    for token in prog.tokens() {
        if let TokenKind::End = token.kind {
            break;
        }
        render_token(&mut out, token, prog.pool());
    }
    out
}

fn render_token(out: &mut String, token: &Token, pool: &[ClassChar]) {
    match token.kind {
        TokenKind::Literal(c) => push_literal(out, c),
        TokenKind::Predef(predef) => {
            out.push('\\');
            out.push(predef.escape_letter());
        }
        TokenKind::Assertion(Assertion::StartText) => out.push('^'),
        TokenKind::Assertion(Assertion::EndText) => out.push('$'),
        TokenKind::Any => out.push('.'),
        TokenKind::Class { start, negated } => {
            out.push('[');
            if negated {
                out.push('^');
            }
            for entry in &pool[start..] {
                match *entry {
                    ClassChar::End => break,
                    ClassChar::Predef(predef) => {
                        out.push('\\');
                        out.push(predef.escape_letter());
                    }
                    ClassChar::Range { first, last } => {
                        push_class_literal(out, first);
                        if last != first {
                            out.push('-');
                            push_class_literal(out, last);
                        }
                    }
                }
            }
            out.push(']');
        }
        // shouldn't happen, the caller stops at the sentinel
        TokenKind::End => return,
    }
    render_quantifier(out, token);
}

fn render_quantifier(out: &mut String, token: &Token) {
    match (token.min, token.max) {
        (0, 1) => out.push('?'),
        (0, MAX_REPEAT) => out.push('*'),
        (1, MAX_REPEAT) => out.push('+'),
        // the implicit exactly-one default is not printed
        (1, 1) => {}
        (min, max) => {
            out.push('{');
            if min != 0 {
                let _ = write!(out, "{}", min);
            }
            if max == MAX_REPEAT {
                out.push(',');
            } else if max != min {
                let _ = write!(out, ",{}", max);
            }
            out.push('}');
        }
    }
    if !token.greedy {
        out.push('?');
    }
    if token.atomic {
        out.push('+');
    }
}

/// Escapes characters that would re-parse as something other than a literal.
fn push_literal(out: &mut String, c: char) {
    if matches!(c, '\\' | '[' | '^' | '$' | '.' | '?' | '*' | '+' | '{') {
        out.push('\\');
    }
    out.push(c);
}

/// Escapes characters with a meaning inside a bracket expression. The dash is
/// always escaped so a single-character member cannot fuse with its neighbors
/// into a range.
fn push_class_literal(out: &mut String, c: char) {
    if matches!(c, ']' | '\\' | '^' | '-') {
        out.push('\\');
    }
    out.push(c);
}
