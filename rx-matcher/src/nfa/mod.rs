//! The compiled pattern: a graph of typed nodes plus the quantifier and
//! character-class pools it refers to.
//!
//! A [`Regex`] owns everything a search needs and is immutable once built,
//! so it can be shared freely; the mutable search state lives in a
//! [`Matcher`](crate::Matcher).

use std::ops::Range;

use bon::bon;

use crate::{
    syntax::{self, BuildError},
    unicode,
};

mod dump;

/// Index of a node in a [`Regex`]'s node pool. Indices are stable for the
/// lifetime of the compiled pattern, which lets the graph contain cycles
/// (quantifier bodies loop back to their quantifier node).
pub type NodeId = usize;

/// Successor edge that was never assigned. Only terminal nodes and
/// unreachable leftovers from graph splicing keep it.
pub(crate) const NONE: NodeId = usize::MAX;

/// One vertex of the compiled graph: a kind with its payload, and the
/// primary successor edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub next: NodeId,
}

/// What a [`Node`] does when the interpreter reaches it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Consumes nothing, continues along `next`.
    Empty,
    /// Matches exactly this byte.
    Byte(u8),
    /// Matches one byte according to a named set (`.`, `\d`, `\w`, ...).
    Set(SetKind),
    /// Matches one decoded UTF-8 character against a bracket expression.
    Class(usize),
    /// Zero-width condition on the current position.
    Assert(Assert),
    /// Nondeterministic choice: `next` first, the payload edge on
    /// backtrack.
    Branch(NodeId),
    /// Records the entry position of capture group `n`.
    CaptureStart(usize),
    /// Records the exit position of capture group `n`.
    CaptureEnd(usize),
    /// Opens a `(?:` group; behaves like [`NodeKind::Empty`] at runtime.
    GroupStart,
    /// Closes a `(?:` group; behaves like [`NodeKind::Empty`] at runtime.
    GroupEnd,
    /// Entry of a `{m,n}` repetition; the payload indexes the quantifier
    /// pool, `next` leaves the subgraph.
    Quantifier(usize),
    /// End of one repetition; the payload points back at the owning
    /// [`NodeKind::Quantifier`] node.
    SubgraphEnd(NodeId),
    /// Accept state.
    MatchEnd,
}

/// The named single-byte sets reachable as `.` and the `\d`-style escapes.
///
/// These are byte-oriented on purpose: `.` consumes one byte even in the
/// middle of a multi-byte sequence, so the engine stays usable on arbitrary
/// byte streams. Bracket expressions decode whole characters instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetKind {
    /// `.`: any byte at all.
    Any,
    /// `\N`: any byte but `\n`.
    NotNewline,
    /// `\d`
    Digit,
    /// `\D`
    NotDigit,
    /// `\w`
    Word,
    /// `\W`
    NotWord,
    /// `\s`: space, tab, `\n` or `\r`.
    Space,
    /// `\S`
    NotSpace,
}

impl SetKind {
    /// Test a single raw byte.
    pub fn matches_byte(self, b: u8) -> bool {
        match self {
            SetKind::Any => true,
            SetKind::NotNewline => b != b'\n',
            SetKind::Digit => b.is_ascii_digit(),
            SetKind::NotDigit => !b.is_ascii_digit(),
            SetKind::Word => unicode::is_word_byte(b),
            SetKind::NotWord => !unicode::is_word_byte(b),
            SetKind::Space => matches!(b, b' ' | b'\t' | b'\n' | b'\r'),
            SetKind::NotSpace => !matches!(b, b' ' | b'\t' | b'\n' | b'\r'),
        }
    }
}

/// The zero-width assertions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Assert {
    /// `^`: position 0.
    TextStart,
    /// `^^`: position 0 or right after a `\n`.
    LineStart,
    /// `$`: end of the haystack.
    TextEnd,
    /// `$$`: end of the haystack, or a `\n` or lone `\r` ahead.
    LineEnd,
    /// `\G`: the position the current search attempt started at.
    SearchStart,
    /// `\<`: a word byte ahead, none behind.
    WordStart,
    /// `\>`: a word byte behind, none ahead.
    WordEnd,
}

/// Bounds and entry point of one `{m,n}` repetition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quantifier {
    /// Minimum number of iterations.
    pub min: u32,
    /// Maximum number of iterations; `None` means unbounded (`{m,}`).
    pub max: Option<u32>,
    /// Whether the repetition prefers more iterations over fewer.
    pub greedy: bool,
    /// First node of the repeated subgraph. The subgraph ends in a
    /// [`NodeKind::SubgraphEnd`] pointing back at the quantifier node.
    pub body: NodeId,
}

/// A compiled bracket expression.
///
/// The payload keeps the original shape of the source: individual values
/// and range endpoints are stored as concatenated UTF-8 sequences and
/// compared width-first, so a two-byte character always sorts above every
/// one-byte character.
#[derive(Clone, Debug)]
pub struct CharClass {
    pub(crate) negated: bool,
    /// Concatenated UTF-8 sequences of the individual values.
    pub(crate) values: Box<[u8]>,
    /// Alternating low/high UTF-8 sequences, one pair per range.
    pub(crate) ranges: Box<[u8]>,
    /// Named sets mentioned inside the brackets.
    pub(crate) sets: Box<[SetKind]>,
    /// Byte range of the whole `[...]` text in the pattern.
    pub(crate) span: Range<usize>,
}

impl CharClass {
    /// Whether the class was written as `[^...]`.
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Test one decoded character (one to four bytes) against the class.
    pub fn matches(&self, ch: &[u8]) -> bool {
        self.matches_positive(ch) != self.negated
    }

    fn matches_positive(&self, ch: &[u8]) -> bool {
        let mut i = 0;
        while i < self.values.len() {
            let width = unicode::utf8_char_width(&self.values, i);
            if *ch == self.values[i..i + width] {
                return true;
            }
            i += width;
        }
        let mut i = 0;
        while i < self.ranges.len() {
            let lo_width = unicode::utf8_char_width(&self.ranges, i);
            let lo = &self.ranges[i..i + lo_width];
            i += lo_width;
            let hi_width = unicode::utf8_char_width(&self.ranges, i);
            let hi = &self.ranges[i..i + hi_width];
            i += hi_width;
            // Width first, bytes second: shorter sequences sort lower.
            let ge = (ch.len(), ch) >= (lo.len(), lo);
            let le = (ch.len(), ch) <= (hi.len(), hi);
            if ge && le {
                return true;
            }
        }
        let byte = ch[0];
        self.sets.iter().any(|set| set.matches_byte(byte))
    }
}

/// A compiled regular expression.
///
/// Compilation either succeeds or reports a [`BuildError`] with a short
/// message and the offending pattern offset. A `Regex` is immutable after
/// compilation and can be shared; each concurrent search needs its own
/// [`Matcher`](crate::Matcher).
///
/// # Example
///
/// ```
/// use rx_matcher::{Matcher, Regex};
///
/// let re = Regex::new(r"(\w+)@(\w+)")?;
/// let mut m = Matcher::new();
/// let hay = b"mail to: fred@example";
/// assert!(re.match_at(&mut m, hay, 0));
/// assert_eq!(m.capture_bytes(hay, 1), Some(&b"fred"[..]));
/// assert_eq!(m.capture_bytes(hay, 2), Some(&b"example"[..]));
/// # Ok::<(), rx_matcher::BuildError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Regex {
    pub(crate) nodes: Vec<Node>,
    pub(crate) quants: Vec<Quantifier>,
    pub(crate) classes: Vec<CharClass>,
    pub(crate) start: NodeId,
    pub(crate) cap_count: usize,
    pub(crate) ignorecase: bool,
    pub(crate) pattern: Box<str>,
}

#[bon]
impl Regex {
    /// Compile `pattern` with the default configuration.
    ///
    /// ```
    /// use rx_matcher::Regex;
    ///
    /// let re = Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$")?;
    /// let mut m = re.create_matcher();
    /// assert!(re.is_match(&mut m, b"2010-03-14"));
    /// # Ok::<(), rx_matcher::BuildError>(())
    /// ```
    pub fn new(pattern: &str) -> Result<Regex, BuildError> {
        Regex::builder().build(pattern)
    }

    /// Return a builder for configuring compilation.
    ///
    /// ```
    /// use rx_matcher::Regex;
    ///
    /// let re = Regex::builder().case_insensitive(true).build("na[c-m]")?;
    /// let mut m = re.create_matcher();
    /// assert!(re.is_match(&mut m, b"NaCl"));
    /// # Ok::<(), rx_matcher::BuildError>(())
    /// ```
    #[builder(builder_type = Builder, finish_fn(name = build))]
    pub fn builder(
        #[builder(finish_fn)] pattern: &str,
        /// Fold ASCII letter case while matching, as if the pattern
        /// contained `\c`.
        #[builder(default = false)]
        case_insensitive: bool,
    ) -> Result<Regex, BuildError> {
        syntax::compile(pattern, case_insensitive)
    }
}

impl Regex {
    /// The node pool, indexable by [`NodeId`]. Useful for tooling that
    /// wants to walk or render the graph.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The entry node of the graph.
    pub fn start(&self) -> NodeId {
        self.start
    }

    /// The quantifier pool referenced by [`NodeKind::Quantifier`] nodes.
    pub fn quantifiers(&self) -> &[Quantifier] {
        &self.quants
    }

    /// The class pool referenced by [`NodeKind::Class`] nodes.
    pub fn classes(&self) -> &[CharClass] {
        &self.classes
    }

    /// Number of capture groups, not counting slot 0 (the whole match).
    pub fn cap_count(&self) -> usize {
        self.cap_count
    }

    /// Whether matching folds ASCII letter case (`\c` in the pattern, or
    /// the builder's `case_insensitive`).
    pub fn is_case_insensitive(&self) -> bool {
        self.ignorecase
    }

    /// The pattern this regex was compiled from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(pattern: &str) -> CharClass {
        let re = Regex::new(pattern).unwrap();
        re.classes[0].clone()
    }

    #[test]
    fn set_kinds() {
        assert!(SetKind::Any.matches_byte(b'\n'));
        assert!(SetKind::NotNewline.matches_byte(b'x'));
        assert!(!SetKind::NotNewline.matches_byte(b'\n'));
        assert!(SetKind::Digit.matches_byte(b'7'));
        assert!(!SetKind::Digit.matches_byte(b'x'));
        assert!(SetKind::Word.matches_byte(b'_'));
        assert!(!SetKind::Word.matches_byte(b'-'));
        assert!(SetKind::Space.matches_byte(b'\r'));
        // Vertical tab is not part of the engine's space set.
        assert!(!SetKind::Space.matches_byte(0x0b));
        assert!(SetKind::NotSpace.matches_byte(0x0b));
    }

    #[test]
    fn class_values_and_ranges() {
        let c = class("[ad-f]");
        assert!(c.matches(b"a"));
        assert!(!c.matches(b"b"));
        assert!(c.matches(b"d"));
        assert!(c.matches(b"f"));
        assert!(!c.matches(b"g"));
    }

    #[test]
    fn class_negated() {
        let c = class("[^ab]");
        assert!(c.is_negated());
        assert!(!c.matches(b"a"));
        assert!(c.matches(b"z"));
        assert!(c.matches("é".as_bytes()));
    }

    #[test]
    fn class_width_ordering() {
        // A multi-byte character never falls inside an ASCII range.
        let c = class("[a-z]");
        assert!(!c.matches("é".as_bytes()));
        let c = class("[α-ω]");
        assert!(c.matches("λ".as_bytes()));
        assert!(!c.matches(b"z"));
        // U+03AC sits below alpha.
        assert!(!c.matches("ά".as_bytes()));
    }

    #[test]
    fn class_named_sets() {
        let c = class(r"[\d\s]");
        assert!(c.matches(b"3"));
        assert!(c.matches(b" "));
        assert!(!c.matches(b"x"));
    }
}
