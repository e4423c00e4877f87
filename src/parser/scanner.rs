//! Quote-aware scanning over a single line of SQL.
//!
//! All helpers share one lexical model: `'` and `"` open a string literal,
//! and a doubled delimiter (`''`, `""`) is an escaped delimiter rather than
//! the end of the literal. Under [`Quoting::MySql`] a backslash inside a
//! literal also consumes the following character verbatim; under
//! [`Quoting::Standard`] backslashes are ordinary characters, as in
//! PostgreSQL with `standard_conforming_strings = on`. Commas and
//! parentheses inside literals are inert.
//!
//! The scan works on bytes. Every byte the scanner reacts to is ASCII, so the
//! offsets it reports are always valid `str` slice boundaries.

/// Quoting convention of the text being scanned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Quoting {
    /// Raw MySQL dump: backslash escapes plus doubled quotes.
    #[default]
    MySql,
    /// Rewritten document: doubled quotes only, backslashes are literal.
    Standard,
}

/// Lexical state carried across a left-to-right scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanState {
    quoting: Quoting,
    in_string: bool,
    delimiter: u8,
}

/// What [`ScanState::step`] decided about the byte it was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Byte outside any literal that the caller may act on.
    Code,
    /// Byte belongs to a literal (including its delimiters).
    Literal,
    /// Byte belongs to a literal and the next byte must be skipped as part of it.
    LiteralSkipNext,
}

impl ScanState {
    pub fn new(quoting: Quoting) -> Self {
        Self {
            quoting,
            ..Self::default()
        }
    }

    pub fn in_string(&self) -> bool {
        self.in_string
    }

    /// Advance over `bytes[i]`, with one byte of lookahead for escapes.
    #[inline]
    pub fn step(&mut self, bytes: &[u8], i: usize) -> Step {
        let b = bytes[i];
        if self.in_string {
            if b == b'\\' && self.quoting == Quoting::MySql {
                return Step::LiteralSkipNext;
            }
            if b == self.delimiter {
                if bytes.get(i + 1) == Some(&self.delimiter) {
                    return Step::LiteralSkipNext;
                }
                self.in_string = false;
            }
            return Step::Literal;
        }

        if b == b'\'' || b == b'"' {
            self.in_string = true;
            self.delimiter = b;
            return Step::Literal;
        }

        Step::Code
    }
}

/// Split the inside of a parenthesized value list on top-level commas.
///
/// Values are returned raw, surrounding whitespace included, so that
/// `values.join(",")` reproduces the input exactly.
pub fn split_values(s: &str, quoting: Quoting) -> Vec<&str> {
    let bytes = s.as_bytes();
    let mut values = Vec::new();
    if bytes.is_empty() {
        return values;
    }

    let mut state = ScanState::new(quoting);
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match state.step(bytes, i) {
            Step::LiteralSkipNext => i += 1,
            Step::Literal => {}
            Step::Code => {
                if bytes[i] == b',' {
                    values.push(&s[start..i]);
                    start = i + 1;
                }
            }
        }
        i += 1;
    }

    values.push(&s[start..]);
    values
}

/// Find the `)` matching the `(` at `open`, ignoring parentheses in literals.
///
/// Returns `None` when `open` is not an opening parenthesis or the line ends
/// before the depth returns to zero.
pub fn find_closing_paren(s: &str, open: usize, quoting: Quoting) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.get(open) != Some(&b'(') {
        return None;
    }

    let mut state = ScanState::new(quoting);
    let mut depth = 0usize;
    let mut i = open;

    while i < bytes.len() {
        match state.step(bytes, i) {
            Step::LiteralSkipNext => i += 1,
            Step::Literal => {}
            Step::Code => match bytes[i] {
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }

    None
}

/// Find the next top-level `(` at or after `from`.
pub fn find_open_paren(s: &str, from: usize, quoting: Quoting) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut state = ScanState::new(quoting);
    let mut i = 0;

    while i < bytes.len() {
        match state.step(bytes, i) {
            Step::LiteralSkipNext => i += 1,
            Step::Literal => {}
            Step::Code => {
                if bytes[i] == b'(' && i >= from {
                    return Some(i);
                }
            }
        }
        i += 1;
    }

    None
}

/// A run of a line that is either plain SQL or a string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Code(&'a str),
    Literal(&'a str),
}

/// Cut a line into alternating code and literal runs.
///
/// A literal left open at the end of the line runs to the end of the line.
pub fn segments(s: &str, quoting: Quoting) -> Vec<Segment<'_>> {
    let bytes = s.as_bytes();
    let mut out = Vec::new();
    let mut state = ScanState::new(quoting);
    let mut start = 0;
    let mut in_literal = false;
    let mut i = 0;

    while i < bytes.len() {
        let was_in_string = state.in_string();
        let step = state.step(bytes, i);
        let now_literal = step != Step::Code;

        if now_literal && !in_literal {
            // Opening delimiter: close the code run before it.
            if i > start {
                out.push(Segment::Code(&s[start..i]));
            }
            start = i;
            in_literal = true;
        }

        if step == Step::LiteralSkipNext {
            i += 1;
        }
        i += 1;

        if was_in_string && !state.in_string() {
            // Closing delimiter consumed: the literal ends here.
            out.push(make_segment(&s[start..i], true));
            start = i;
            in_literal = false;
        }
    }

    if start < bytes.len() {
        out.push(make_segment(&s[start..], in_literal));
    }

    out
}

fn make_segment(text: &str, literal: bool) -> Segment<'_> {
    if literal {
        Segment::Literal(text)
    } else {
        Segment::Code(text)
    }
}

/// Apply `f` to every code run of `s`, copying literals through untouched.
pub fn map_code<F>(s: &str, quoting: Quoting, mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut result = String::with_capacity(s.len());
    for segment in segments(s, quoting) {
        match segment {
            Segment::Code(code) => result.push_str(&f(code)),
            Segment::Literal(lit) => result.push_str(lit),
        }
    }
    result
}
