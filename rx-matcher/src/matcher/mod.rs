//! The execution engine: a stackless backtracking interpreter over the
//! compiled node graph.
//!
//! A search keeps three pieces of state: the current node, the current
//! byte position, and the trail. The trail is a flat append-only sequence
//! of small records, one per branch point, quantifier visit or capture
//! boundary crossed on the way forward. On a dead end the engine scans the
//! trail from the tail for the nearest record it can resume from, so stack
//! use stays constant no matter how pathological the pattern is.

use crate::{
    nfa::{Assert, NodeId, NodeKind, Regex},
    unicode,
};

mod matches;

pub use matches::Match;

/// Scratch state for running a [`Regex`] search.
///
/// A matcher owns the backtracking trail and the capture slots. It can be
/// reused across any number of searches and any number of compiled
/// patterns; its buffers keep their capacity between calls. A matcher must
/// not be shared by concurrent searches; give each thread its own.
///
/// # Example
///
/// ```
/// use rx_matcher::{Matcher, Regex};
///
/// let re = Regex::new("b((an)+)(an)")?;
/// let mut m = Matcher::new();
/// let hay = b"bananana";
/// assert!(re.match_at(&mut m, hay, 0));
/// assert_eq!(m.capture_bytes(hay, 0), Some(&b"bananan"[..]));
/// assert_eq!(m.capture_bytes(hay, 1), Some(&b"anan"[..]));
/// assert_eq!(m.capture_bytes(hay, 2), Some(&b"an"[..]));
/// assert_eq!(m.capture_bytes(hay, 3), Some(&b"an"[..]));
/// # Ok::<(), rx_matcher::BuildError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Matcher {
    trail: Vec<TrailEntry>,
    caps: Vec<CapSlot>,
    success: bool,
}

/// One backtracking record: the node that pushed it, the position at the
/// time, and the iteration count for quantifier frames.
#[derive(Clone, Copy, Debug)]
struct TrailEntry {
    node: NodeId,
    pos: usize,
    visit: u32,
}

#[derive(Clone, Copy, Debug, Default)]
struct CapSlot {
    start: usize,
    end: usize,
    defined: bool,
}

impl Matcher {
    pub fn new() -> Matcher {
        Matcher::default()
    }

    /// Whether the last search on this matcher found a match.
    pub fn matched(&self) -> bool {
        self.success
    }

    /// Number of capture slots filled in by the last successful search,
    /// including slot 0 for the whole match. Zero after a failed search.
    pub fn cap_count(&self) -> usize {
        if self.success {
            self.caps.len()
        } else {
            0
        }
    }

    /// The bounds of capture slot `i` from the last successful search.
    ///
    /// Slot 0 is the whole match and is always defined on success. A group
    /// slot is undefined when the accepting path never closed that group,
    /// e.g. the unused arm of an alternation.
    pub fn capture(&self, i: usize) -> Option<Match> {
        if !self.success {
            return None;
        }
        let slot = self.caps.get(i)?;
        slot.defined.then(|| Match { start: slot.start, end: slot.end })
    }

    /// The bytes of capture slot `i`, sliced out of `haystack`.
    ///
    /// `haystack` should be the bytes the last search ran on; the matcher
    /// itself only stores offsets.
    pub fn capture_bytes<'h>(&self, haystack: &'h [u8], i: usize) -> Option<&'h [u8]> {
        self.capture(i).map(|m| &haystack[m.range()])
    }

    /// Fill the capture slots from the surviving trail. Later entries win,
    /// which is what makes a repeated group report its last iteration.
    fn finalize(&mut self, rx: &Regex, start: usize, end: usize) {
        self.caps.clear();
        self.caps.resize(rx.cap_count + 1, CapSlot::default());
        self.caps[0] = CapSlot { start, end, defined: true };
        for entry in &self.trail {
            match rx.nodes[entry.node].kind {
                NodeKind::CaptureStart(i) => self.caps[i].start = entry.pos,
                NodeKind::CaptureEnd(i) => {
                    self.caps[i].end = entry.pos;
                    self.caps[i].defined = true;
                }
                _ => {}
            }
        }
        self.success = true;
    }
}

impl Regex {
    /// Create a scratch [`Matcher`] for searching with this pattern.
    pub fn create_matcher(&self) -> Matcher {
        Matcher::new()
    }

    /// Run the pattern against `haystack`, beginning at byte offset
    /// `start`.
    ///
    /// On `true` the matcher's capture slots describe the match: slot 0 is
    /// the whole match, slots `1..=cap_count` the parenthesized groups. On
    /// `false` nothing is claimed about the slots.
    ///
    /// The search slides its starting position forward one byte at a time
    /// until the pattern matches or input runs out, unless the pattern is
    /// anchored at its root by `^` or `\G`. Slot 0 starts where the
    /// accepting attempt began, which can be past `start`.
    pub fn match_at(&self, m: &mut Matcher, haystack: &[u8], start: usize) -> bool {
        m.success = false;
        m.trail.clear();
        if start > haystack.len() {
            return false;
        }
        let mut start_pos = start;
        let mut pos = start;
        let mut node = self.start;
        let mut retry = false;
        loop {
            let raw = haystack.get(pos).copied().unwrap_or(0);
            let c = if retry { unicode::flip_ascii_case(raw) } else { raw };
            let n = self.nodes[node];
            match n.kind {
                NodeKind::MatchEnd => {
                    m.finalize(self, start_pos, pos);
                    return true;
                }
                NodeKind::Byte(value) => {
                    if pos < haystack.len() && c == value {
                        pos += 1;
                        node = n.next;
                        retry = false;
                        continue;
                    }
                }
                NodeKind::Set(set) => {
                    if pos < haystack.len() && set.matches_byte(c) {
                        pos += 1;
                        node = n.next;
                        retry = false;
                        continue;
                    }
                }
                NodeKind::Class(id) => {
                    if pos < haystack.len() {
                        let width = unicode::utf8_char_width(haystack, pos);
                        let mut buf = [0u8; 4];
                        let decoded: &[u8] = if retry {
                            buf[..width].copy_from_slice(&haystack[pos..pos + width]);
                            buf[0] = c;
                            &buf[..width]
                        } else {
                            &haystack[pos..pos + width]
                        };
                        if self.classes[id].matches(decoded) {
                            pos += width;
                            node = n.next;
                            retry = false;
                            continue;
                        }
                    }
                }
                NodeKind::Assert(kind) => {
                    if self.assertion_holds(kind, haystack, pos, start_pos) {
                        node = n.next;
                        retry = false;
                        continue;
                    }
                }
                NodeKind::Branch(_) | NodeKind::CaptureStart(_) | NodeKind::CaptureEnd(_) => {
                    m.trail.push(TrailEntry { node, pos, visit: 0 });
                    node = n.next;
                    retry = false;
                    continue;
                }
                NodeKind::GroupStart | NodeKind::GroupEnd | NodeKind::Empty => {
                    node = n.next;
                    retry = false;
                    continue;
                }
                NodeKind::Quantifier(id) => {
                    let quant = self.quants[id];
                    let mut entry = TrailEntry { node, pos, visit: 0 };
                    if quant.greedy || quant.min > 0 {
                        entry.visit = 1;
                        node = quant.body;
                    } else {
                        node = n.next;
                    }
                    m.trail.push(entry);
                    retry = false;
                    continue;
                }
                NodeKind::SubgraphEnd(owner) => {
                    // The owning quantifier's most recent frame carries the
                    // iteration count for this pass through the body.
                    if let (Some(i), NodeKind::Quantifier(id)) = (
                        m.trail.iter().rposition(|e| e.node == owner),
                        self.nodes[owner].kind,
                    ) {
                        let quant = self.quants[id];
                        let visit = m.trail[i].visit;
                        if quant.greedy {
                            if Some(visit) == quant.max {
                                node = self.nodes[owner].next;
                            } else if visit < quant.min {
                                m.trail[i].visit += 1;
                                node = quant.body;
                            } else {
                                // Leave a resumable frame so a later failure
                                // can come back here and take the exit.
                                m.trail.push(TrailEntry { node: owner, pos, visit: visit + 1 });
                                node = quant.body;
                            }
                        } else if visit < quant.min {
                            m.trail[i].visit += 1;
                            node = quant.body;
                        } else {
                            m.trail.push(TrailEntry { node: owner, pos, visit });
                            node = self.nodes[owner].next;
                        }
                        retry = false;
                        continue;
                    }
                }
            }

            // The step failed. Under `\c`, flip the case of an ASCII letter
            // once and re-run the same node before giving up on it.
            if self.ignorecase && !retry && raw.is_ascii_alphabetic() {
                retry = true;
                continue;
            }
            retry = false;

            if let Some((resume, at)) = self.backtrack(m) {
                node = resume;
                pos = at;
                continue;
            }

            // This attempt is exhausted; slide the start unless the pattern
            // is anchored to it.
            if let NodeKind::Assert(Assert::TextStart | Assert::SearchStart) =
                self.nodes[self.start].kind
            {
                return false;
            }
            if start_pos >= haystack.len() {
                return false;
            }
            start_pos += 1;
            pos = start_pos;
            node = self.start;
            m.trail.clear();
        }
    }

    /// Leftmost match in `haystack`, if any.
    ///
    /// ```
    /// use rx_matcher::{Matcher, Regex};
    ///
    /// let re = Regex::new(r"\d+\.\d+\.\d+\.\d+")?;
    /// let mut m = Matcher::new();
    /// let hay = b"There's no place like 127.0.0.1.";
    /// let found = re.find(&mut m, hay).unwrap();
    /// assert_eq!(&hay[found.range()], b"127.0.0.1");
    /// # Ok::<(), rx_matcher::BuildError>(())
    /// ```
    pub fn find(&self, m: &mut Matcher, haystack: &[u8]) -> Option<Match> {
        if self.match_at(m, haystack, 0) {
            m.capture(0)
        } else {
            None
        }
    }

    /// Whether the pattern matches anywhere in `haystack`.
    pub fn is_match(&self, m: &mut Matcher, haystack: &[u8]) -> bool {
        self.match_at(m, haystack, 0)
    }

    /// Iterator over successive non-overlapping matches.
    ///
    /// Each match resumes where the previous one ended; an empty match
    /// advances by one byte so iteration always terminates.
    ///
    /// ```
    /// use rx_matcher::{Matcher, Regex};
    ///
    /// let re = Regex::new(r"\w+")?;
    /// let mut m = Matcher::new();
    /// let hay = b"Ricochet pinecone riverside elderberry";
    /// let words: Vec<&[u8]> = re.find_iter(&mut m, hay).map(|f| &hay[f.range()]).collect();
    /// assert_eq!(words, vec![
    ///     &b"Ricochet"[..], &b"pinecone"[..], &b"riverside"[..], &b"elderberry"[..],
    /// ]);
    /// # Ok::<(), rx_matcher::BuildError>(())
    /// ```
    pub fn find_iter<'r, 'h>(
        &'r self,
        m: &'r mut Matcher,
        haystack: &'h [u8],
    ) -> FindMatches<'r, 'h> {
        FindMatches { re: self, matcher: m, haystack, at: 0 }
    }

    /// Scan the trail from the tail for the nearest resumable frame.
    /// Capture entries are passed over; whether they survive in the trail
    /// is what decides capture contents on success.
    fn backtrack(&self, m: &mut Matcher) -> Option<(NodeId, usize)> {
        let mut i = m.trail.len();
        while i > 0 {
            i -= 1;
            let entry = m.trail[i];
            match self.nodes[entry.node].kind {
                NodeKind::Branch(alt) => {
                    m.trail.truncate(i);
                    return Some((alt, entry.pos));
                }
                NodeKind::Quantifier(id) => {
                    let quant = self.quants[id];
                    if quant.greedy {
                        if entry.visit > quant.min {
                            m.trail.truncate(i);
                            return Some((self.nodes[entry.node].next, entry.pos));
                        }
                    } else if Some(entry.visit) != quant.max {
                        // Lazy re-entry keeps the deeper trail entries.
                        m.trail[i].visit += 1;
                        return Some((quant.body, entry.pos));
                    }
                }
                _ => {}
            }
        }
        None
    }

    fn assertion_holds(&self, kind: Assert, haystack: &[u8], pos: usize, start: usize) -> bool {
        match kind {
            Assert::TextStart => pos == 0,
            Assert::LineStart => pos == 0 || haystack[pos - 1] == b'\n',
            Assert::TextEnd => pos == haystack.len(),
            Assert::LineEnd => {
                pos == haystack.len() || haystack[pos] == b'\n' || haystack[pos] == b'\r'
            }
            Assert::SearchStart => pos == start,
            Assert::WordStart => !prev_is_word(haystack, pos) && at_word(haystack, pos),
            Assert::WordEnd => prev_is_word(haystack, pos) && !at_word(haystack, pos),
        }
    }
}

fn prev_is_word(haystack: &[u8], pos: usize) -> bool {
    pos > 0 && unicode::is_word_byte(haystack[pos - 1])
}

fn at_word(haystack: &[u8], pos: usize) -> bool {
    pos < haystack.len() && unicode::is_word_byte(haystack[pos])
}

/// Iterator returned by [`Regex::find_iter`].
#[derive(Debug)]
pub struct FindMatches<'r, 'h> {
    re: &'r Regex,
    matcher: &'r mut Matcher,
    haystack: &'h [u8],
    at: usize,
}

impl Iterator for FindMatches<'_, '_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        if self.at > self.haystack.len() {
            return None;
        }
        if !self.re.match_at(self.matcher, self.haystack, self.at) {
            return None;
        }
        let found = self.matcher.capture(0)?;
        self.at = if found.is_empty() { found.end + 1 } else { found.end };
        Some(found)
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    fn find_str(pattern: &str, hay: &str) -> Option<String> {
        let re = Regex::new(pattern).unwrap();
        let mut m = Matcher::new();
        re.find(&mut m, hay.as_bytes())
            .map(|f| hay[f.range()].to_string())
    }

    fn captures(pattern: &str, hay: &str) -> Vec<Option<String>> {
        let re = Regex::new(pattern).unwrap();
        let mut m = Matcher::new();
        assert!(re.match_at(&mut m, hay.as_bytes(), 0), "{pattern:?} vs {hay:?}");
        (0..m.cap_count())
            .map(|i| {
                m.capture_bytes(hay.as_bytes(), i)
                    .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            })
            .collect()
    }

    fn all(pattern: &str, hay: &str) -> Vec<String> {
        let re = Regex::new(pattern).unwrap();
        let mut m = Matcher::new();
        re.find_iter(&mut m, hay.as_bytes())
            .map(|f| hay[f.range()].to_string())
            .collect_vec()
    }

    #[test]
    fn literals_and_sliding() {
        assert_eq!(find_str("abc", "xxabcxx"), Some("abc".into()));
        assert_eq!(find_str("abc", "xxabx"), None);
        assert_eq!(find_str(r"\d", "ab1"), Some("1".into()));
        assert_eq!(find_str("", "abc"), Some("".into()));
    }

    #[test]
    fn ip_address() {
        assert_eq!(
            find_str(r"\d+\.\d+\.\d+\.\d+", "There's no place like 127.0.0.1."),
            Some("127.0.0.1".into()),
        );
    }

    #[test]
    fn global_words() {
        assert_eq!(
            all(r"\w+", "Ricochet pinecone riverside elderberry"),
            vec!["Ricochet", "pinecone", "riverside", "elderberry"],
        );
    }

    #[test]
    fn lazy_star_is_minimal() {
        assert_eq!(find_str("a(a|b)*?a", "abababababa"), Some("aba".into()));
    }

    #[test]
    fn greedy_star_is_maximal() {
        assert_eq!(find_str("a(a|b)*a", "abababababa"), Some("abababababa".into()));
    }

    #[test]
    fn greek_range() {
        assert_eq!(
            find_str("[α-ω]+", "It's all Ελληνικά to me"),
            Some("λληνικ".into()),
        );
    }

    #[test]
    fn ignorecase_class_range() {
        assert_eq!(
            find_str(r"[a-b]+\c", "AaAaBbBbaaAaBbBb"),
            Some("AaAaBbBbaaAaBbBb".into()),
        );
        // The flip retries the same step with the case swapped, nothing
        // more: `B` flips to `b`, which `[a]` still rejects.
        assert_eq!(find_str(r"[a]+\c", "AaAaBbBbaaAaBbBb"), Some("AaAa".into()));
    }

    #[test]
    fn ignorecase_literals() {
        assert_eq!(find_str(r"nacl\c", "make NaCl now"), Some("NaCl".into()));
        assert_eq!(find_str("nacl", "make NaCl now"), None);
        let re = Regex::builder().case_insensitive(true).build("nacl").unwrap();
        let mut m = Matcher::new();
        assert!(re.is_match(&mut m, b"make NaCl now"));
    }

    #[test]
    fn ignorecase_is_ascii_only() {
        assert_eq!(find_str(r"é\c", "É"), None);
        assert_eq!(find_str(r"é\c", "é"), Some("é".into()));
    }

    #[test]
    fn line_start() {
        assert_eq!(find_str("^^def", "abc\ndef"), Some("def".into()));
        assert_eq!(find_str("^^def", "abcdef"), None);
        assert_eq!(find_str("^^abc", "abc\ndef"), Some("abc".into()));
    }

    #[test]
    fn line_end_accepts_lone_cr() {
        assert_eq!(find_str("a$$", "a\rb"), Some("a".into()));
        assert_eq!(find_str("a$$", "a\nb"), Some("a".into()));
        assert_eq!(find_str("a$$", "ab"), None);
        assert_eq!(find_str("b$$", "ab"), Some("b".into()));
    }

    #[test]
    fn text_anchors() {
        assert_eq!(find_str("^a", "ab"), Some("a".into()));
        assert_eq!(find_str("^b", "ab"), None);
        assert_eq!(find_str("b$", "ab"), Some("b".into()));
        assert_eq!(find_str("a$", "ab"), None);
    }

    #[test]
    fn word_boundaries() {
        assert_eq!(find_str(r"\<def\>", "abc def ghi"), Some("def".into()));
        assert_eq!(find_str(r"\<def\>", "abcdef ghi"), None);
        assert_eq!(find_str(r"\<abc", "abc"), Some("abc".into()));
        assert_eq!(find_str(r"ghi\>", "abc ghi"), Some("ghi".into()));
    }

    #[test]
    fn search_start_anchor() {
        let re = Regex::new(r"\Gb").unwrap();
        let mut m = Matcher::new();
        // Anchored to the attempt start: no sliding.
        assert!(!re.match_at(&mut m, b"abc", 0));
        assert!(re.match_at(&mut m, b"abc", 1));
        assert_eq!(m.capture(0), Some(Match { start: 1, end: 2 }));
    }

    #[test]
    fn lazy_bounded_quantifier() {
        assert_eq!(find_str("ra{2,4}?", "jtraaabke"), Some("raa".into()));
    }

    #[test]
    fn greedy_bounded_quantifier() {
        assert_eq!(find_str("ra{2,4}", "jtraaaaaabke"), Some("raaaa".into()));
        assert_eq!(find_str("ra{2,4}", "jtrabke"), None);
        assert_eq!(find_str("a{3}", "aaaa"), Some("aaa".into()));
        assert_eq!(find_str("a{3,}", "aaaaa"), Some("aaaaa".into()));
    }

    #[test]
    fn inverted_bounds_exhaust_at_max() {
        // {3,1} parses as written; the executor hits max after one pass.
        assert_eq!(find_str("a{3,1}", "aaa"), Some("a".into()));
    }

    #[test]
    fn quantifier_over_group() {
        assert_eq!(find_str("(ab){2}", "xababy"), Some("abab".into()));
        assert_eq!(find_str("(ab){2,3}", "abababab"), Some("ababab".into()));
        assert_eq!(find_str("(a|b){3}", "xbaby"), Some("bab".into()));
    }

    #[test]
    fn nested_repeated_captures() {
        assert_eq!(
            captures("b((an)+)(an)", "bananana"),
            vec![
                Some("bananan".into()),
                Some("anan".into()),
                Some("an".into()),
                Some("an".into()),
            ],
        );
    }

    #[test]
    fn repeated_group_reports_last_iteration() {
        assert_eq!(
            captures("(an)+", "ananan"),
            vec![Some("ananan".into()), Some("an".into())],
        );
        let re = Regex::new("(an)+").unwrap();
        let mut m = Matcher::new();
        assert!(re.match_at(&mut m, b"ananan", 0));
        assert_eq!(m.capture(1), Some(Match { start: 4, end: 6 }));
    }

    #[test]
    fn unused_alternation_arm_is_undefined() {
        let re = Regex::new("(a)|(b)").unwrap();
        let mut m = Matcher::new();
        assert!(re.match_at(&mut m, b"b", 0));
        assert_eq!(m.capture(1), None);
        assert_eq!(m.capture_bytes(b"b", 2), Some(&b"b"[..]));
    }

    #[test]
    fn skipped_optional_group_is_undefined() {
        let re = Regex::new("(x)?y").unwrap();
        let mut m = Matcher::new();
        assert!(re.match_at(&mut m, b"y", 0));
        assert_eq!(m.capture(0), Some(Match { start: 0, end: 1 }));
        assert_eq!(m.capture(1), None);
        assert!(re.match_at(&mut m, b"xy", 0));
        assert_eq!(m.capture_bytes(b"xy", 1), Some(&b"x"[..]));
    }

    #[test]
    fn alternation_inside_group() {
        assert_eq!(find_str("a(b|c)d", "acd"), Some("acd".into()));
        assert_eq!(find_str("a(b|c)d", "abd"), Some("abd".into()));
        assert_eq!(find_str("a(b|c)d", "aed"), None);
        assert_eq!(find_str("one|two|three", "its two"), Some("two".into()));
    }

    #[test]
    fn non_capturing_group() {
        assert_eq!(
            captures("(?:ab)+(c)", "ababc"),
            vec![Some("ababc".into()), Some("c".into())],
        );
    }

    #[test]
    fn dot_consumes_one_byte() {
        // `.` is byte-oriented and happily splits a UTF-8 sequence.
        let re = Regex::new(".").unwrap();
        let mut m = Matcher::new();
        assert!(re.match_at(&mut m, "é".as_bytes(), 0));
        assert_eq!(m.capture(0), Some(Match { start: 0, end: 1 }));
        // A class on the same input consumes the whole character.
        let re = Regex::new("[é]").unwrap();
        assert!(re.match_at(&mut m, "é".as_bytes(), 0));
        assert_eq!(m.capture(0), Some(Match { start: 0, end: 2 }));
    }

    #[test]
    fn dot_matches_newline_but_not_eos() {
        assert_eq!(find_str("a.", "a\nb"), Some("a\n".into()));
        assert_eq!(find_str("a.", "a"), None);
        assert_eq!(find_str(r"a\N", "a\nab"), Some("ab".into()));
    }

    #[test]
    fn space_set_is_exact() {
        assert_eq!(find_str(r"\s", "\x0ba b"), Some(" ".into()));
        assert_eq!(find_str(r"\S", " \t\x0b"), Some("\x0b".into()));
    }

    #[test]
    fn escapes_match_themselves() {
        assert_eq!(find_str(r"\e", "\x1b"), Some("\x1b".into()));
        assert_eq!(find_str(r"A+", "BAAB"), Some("AA".into()));
        assert_eq!(find_str(r"a\.b", "a.b axb"), Some("a.b".into()));
        assert_eq!(find_str(r"a\.b", "axb"), None);
    }

    #[test]
    fn empty_matches_advance_iteration() {
        assert_eq!(all("a*", "bb"), vec!["", "", ""]);
        assert_eq!(all("a*", "ab"), vec!["a", "", ""]);
    }

    #[test]
    fn anchored_iteration_stops() {
        assert_eq!(all("^a+", "aaab"), vec!["aaa"]);
    }

    #[test]
    fn match_at_bounds() {
        let re = Regex::new("a").unwrap();
        let mut m = Matcher::new();
        assert!(!re.match_at(&mut m, b"a", 5));
        assert!(!re.match_at(&mut m, b"a", 1));
        let re = Regex::new("").unwrap();
        assert!(re.match_at(&mut m, b"a", 1));
        assert_eq!(m.capture(0), Some(Match { start: 1, end: 1 }));
    }

    #[test]
    fn haystack_with_nul_bytes() {
        assert_eq!(find_str("b", "a\0b"), Some("b".into()));
        let re = Regex::new(r"\x00").unwrap();
        let mut m = Matcher::new();
        assert!(re.match_at(&mut m, b"a\0b", 0));
        assert_eq!(m.capture(0), Some(Match { start: 1, end: 2 }));
    }

    #[test]
    fn matcher_is_reusable_across_patterns() {
        let mut m = Matcher::new();
        let re1 = Regex::new("(a)(b)(c)").unwrap();
        assert!(re1.match_at(&mut m, b"abc", 0));
        assert_eq!(m.cap_count(), 4);
        let re2 = Regex::new("b").unwrap();
        assert!(re2.match_at(&mut m, b"abc", 0));
        assert_eq!(m.cap_count(), 1);
        assert!(!re2.match_at(&mut m, b"xyz", 0));
        assert_eq!(m.cap_count(), 0);
        assert_eq!(m.capture(0), None);
        assert!(!m.matched());
    }

    #[test]
    fn capture_zero_is_the_match() {
        let hay = "one fine day";
        let re = Regex::new(r"f\w+").unwrap();
        let mut m = Matcher::new();
        let found = re.find(&mut m, hay.as_bytes()).unwrap();
        assert_eq!(m.capture(0), Some(found));
        assert_eq!(found.len(), found.end() - found.start());
        assert_eq!(m.capture_bytes(hay.as_bytes(), 0), Some(&b"fine"[..]));
    }

    #[test]
    fn groups_lie_within_the_match() {
        let re = Regex::new(r"(\w+)=(\w+)").unwrap();
        let mut m = Matcher::new();
        let hay = b"  key=value  ";
        assert!(re.match_at(&mut m, hay, 0));
        let whole = m.capture(0).unwrap();
        for i in 1..m.cap_count() {
            let group = m.capture(i).unwrap();
            assert!(group.start() >= whole.start());
            assert!(group.end() <= whole.end());
            assert!(group.start() <= group.end());
        }
    }

    #[test]
    fn literal_pattern_matches_itself() {
        for pattern in ["abc", "hello world", "(abc)(def)"] {
            let re = Regex::new(pattern).unwrap();
            let mut m = Matcher::new();
            let stripped: String = pattern.chars().filter(|&c| c != '(' && c != ')').collect();
            assert!(re.match_at(&mut m, stripped.as_bytes(), 0), "{pattern:?}");
            assert_eq!(
                m.capture_bytes(stripped.as_bytes(), 0),
                Some(stripped.as_bytes()),
            );
        }
    }

    #[test]
    fn recompilation_is_equivalent() {
        let hay = "abracadabra";
        for pattern in ["a(b|c)+a?", "[a-d]+", "a.*?a"] {
            assert_eq!(
                find_str(pattern, hay),
                find_str(pattern, hay),
                "{pattern:?}",
            );
        }
    }
}
