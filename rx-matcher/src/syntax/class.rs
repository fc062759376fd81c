//! Bracket expressions: `[abc]`, `[^a-z\d]`, `[α-ω]`, ...
//!
//! One element is consumed per loop iteration: a literal character (one to
//! four UTF-8 bytes), an escape, or a named set. A `-` between two
//! character elements turns the pair into a range; a lone or trailing `-`
//! is a literal. A value is only committed once the next element shows it
//! is not the start of a range, so the parser always carries one pending
//! character.

use super::{control_escape, set_kind, BuildError, Compiler, ErrorKind};
use crate::nfa::{CharClass, SetKind};
use crate::unicode;

/// Parse the bracket expression starting at `c.pos` (the `[`). On success
/// the cursor is left on the closing `]`.
pub(super) fn parse(c: &mut Compiler<'_>) -> Result<CharClass, BuildError> {
    let pattern = c.pattern;
    let n = pattern.len();
    let open = c.pos;

    if c.pos + 1 >= n {
        return Err(c.err(ErrorKind::UnterminatedClass));
    }
    c.pos += 1;
    let mut negated = false;
    if pattern[c.pos] == b'^' {
        negated = true;
        if c.pos + 1 >= n {
            return Err(c.err(ErrorKind::UnterminatedNegation));
        }
        c.pos += 1;
    }

    let mut values: Vec<u8> = Vec::new();
    let mut ranges: Vec<u8> = Vec::new();
    let mut sets: Vec<SetKind> = Vec::new();

    // The last character element, not yet committed as a value.
    let mut pending: Option<([u8; 4], usize)> = None;
    let mut seen_dash = false;
    // Set when the previous element was a named set; a `-` completing a
    // range over it is an error.
    let mut seen_set: Option<char> = None;

    while c.pos < n {
        let b = pattern[c.pos];
        if b == b']' {
            break;
        }
        if b == b'-' && !seen_dash {
            seen_dash = true;
            c.pos += 1;
            continue;
        }

        // Decode one character element into `cur`.
        let mut cur = [0u8; 4];
        let cur_len;
        if b == b'\\' {
            if c.pos + 1 >= n {
                return Err(c.err(ErrorKind::TruncatedEscape));
            }
            let esc = pattern[c.pos + 1];
            match esc {
                b'd' | b'D' | b'w' | b'W' | b's' | b'S' | b'N' => {
                    if seen_dash {
                        return Err(c.err(ErrorKind::SetAfterDash(esc as char)));
                    }
                    sets.push(set_kind(esc));
                    seen_set = Some(esc as char);
                    c.pos += 2;
                    continue;
                }
                b'e' | b'r' | b'n' | b't' => {
                    cur[0] = control_escape(esc);
                    cur_len = 1;
                    c.pos += 2;
                }
                b'x' => {
                    if c.pos + 3 >= n {
                        return Err(c.err(ErrorKind::TruncatedHexEscape { esc: 'x', count: 2 }));
                    }
                    let value = match unicode::hex_to_u32(&pattern[c.pos + 2..c.pos + 4]) {
                        Some(value) => value,
                        None => {
                            return Err(c.err(ErrorKind::InvalidHexDigits { esc: 'x', count: 2 }))
                        }
                    };
                    cur[0] = value as u8;
                    cur_len = 1;
                    c.pos += 4;
                }
                b'u' | b'U' => {
                    let count = if esc == b'u' { 4 } else { 8 };
                    let esc = esc as char;
                    if c.pos + 1 + count >= n {
                        return Err(c.err(ErrorKind::TruncatedHexEscape { esc, count }));
                    }
                    let digits = &pattern[c.pos + 2..c.pos + 2 + count];
                    let value = match unicode::hex_to_u32(digits) {
                        Some(value) => value,
                        None => return Err(c.err(ErrorKind::InvalidHexDigits { esc, count })),
                    };
                    cur_len = unicode::encode_utf8(value, &mut cur);
                    if cur_len == 0 {
                        return Err(c.err(ErrorKind::ScalarOutOfRange(esc)));
                    }
                    c.pos += 2 + count;
                }
                _ => {
                    // Unrecognized escapes stand for themselves: \] \- \\ ...
                    c.pos += 1;
                    let width = unicode::utf8_char_width(pattern, c.pos);
                    cur[..width].copy_from_slice(&pattern[c.pos..c.pos + width]);
                    cur_len = width;
                    c.pos += width;
                }
            }
        } else {
            let width = unicode::utf8_char_width(pattern, c.pos);
            cur[..width].copy_from_slice(&pattern[c.pos..c.pos + width]);
            cur_len = width;
            c.pos += width;
        }

        // Fold the element into the payload arrays.
        match pending {
            Some((lo, lo_len)) if seen_dash => {
                if let Some(set) = seen_set {
                    return Err(c.err(ErrorKind::RangeAfterSet(set)));
                }
                if lo_len > cur_len || &lo[..lo_len] >= &cur[..lo_len] {
                    return Err(c.err(ErrorKind::InvertedRange));
                }
                ranges.extend_from_slice(&lo[..lo_len]);
                ranges.extend_from_slice(&cur[..cur_len]);
                seen_dash = false;
                pending = None;
            }
            _ if seen_dash => {
                return Err(c.err(ErrorKind::UnexpectedDash));
            }
            _ => {
                if let Some((lo, lo_len)) = pending {
                    values.extend_from_slice(&lo[..lo_len]);
                }
                pending = Some((cur, cur_len));
            }
        }
        seen_set = None;
    }

    if let Some((lo, lo_len)) = pending {
        values.extend_from_slice(&lo[..lo_len]);
    }
    if seen_dash {
        // Trailing dash is a literal.
        values.push(b'-');
    }
    if c.pos >= n || pattern[c.pos] != b']' {
        return Err(c.err(ErrorKind::UnclosedClass));
    }
    Ok(CharClass {
        negated,
        values: values.into_boxed_slice(),
        ranges: ranges.into_boxed_slice(),
        sets: sets.into_boxed_slice(),
        span: open..c.pos + 1,
    })
}
