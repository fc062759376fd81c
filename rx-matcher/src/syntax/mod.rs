//! Pattern syntax: a single left-to-right pass over the pattern bytes that
//! builds the node graph in place.
//!
//! The parser keeps a current tail node where the next atom lands, the most
//! recently emitted atom (the target of a postfix operator), and a stack of
//! open groups. Alternation and the postfix operators restructure the graph
//! by cloning the affected node and converting the original into a branch,
//! which is why node handles are plain indices rather than references.

use thiserror::Error;

use crate::nfa::{Assert, CharClass, Node, NodeId, NodeKind, Quantifier, Regex, SetKind, NONE};
use crate::unicode;

mod class;

/// An error produced while compiling a pattern.
///
/// `Display` gives the short diagnostic; [`BuildError::offset`] points at
/// the byte in the pattern that triggered it.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct BuildError {
    kind: ErrorKind,
    at: usize,
}

impl BuildError {
    /// What went wrong.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Byte offset into the pattern where compilation stopped.
    pub fn offset(&self) -> usize {
        self.at
    }
}

/// The ways a pattern can fail to compile.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A `)` with no open group.
    #[error(") was unexpected")]
    UnbalancedClose,
    /// A `(` that never closes.
    #[error("expected closing )")]
    UnclosedGroup,
    /// A postfix operator with no atom in front of it.
    #[error("expected something to apply the {0} to")]
    NothingToRepeat(char),
    /// A `\` as the last byte of the pattern or bracket expression.
    #[error("expected character after \\")]
    TruncatedEscape,
    /// A `\x`, `\u` or `\U` running past the end of the pattern.
    #[error("expected {count} characters after \\{esc}")]
    TruncatedHexEscape { esc: char, count: usize },
    /// A `\x`, `\u` or `\U` whose digits are not hexadecimal.
    #[error("expected {count} hex digits after \\{esc}")]
    InvalidHexDigits { esc: char, count: usize },
    /// A `\u` or `\U` value too large to encode.
    #[error("invalid \\{0} sequence")]
    ScalarOutOfRange(char),
    /// A `[` as the last byte of the pattern.
    #[error("expected a character after [")]
    UnterminatedClass,
    /// A `[^` as the end of the pattern.
    #[error("expected a character in [")]
    UnterminatedNegation,
    /// A bracket expression with no closing `]`.
    #[error("expected ]")]
    UnclosedClass,
    /// A named set as the upper end of a range, e.g. `[a-\d]`.
    #[error("can't have \\{0} after -")]
    SetAfterDash(char),
    /// A named set as the lower end of a range, e.g. `[a\d-z]`.
    #[error("can't have - after \\{0}")]
    RangeAfterSet(char),
    /// A range whose lower end is not strictly below its upper end.
    #[error("end of range must be higher than start")]
    InvertedRange,
    /// A `-` with no value in front of it, e.g. `[-a]` or `[a-b-c]`.
    #[error("unexpected -")]
    UnexpectedDash,
    /// A `{,n}` quantifier.
    #[error("expected a number before ,")]
    NumberBeforeComma,
    /// A `{}` quantifier.
    #[error("expected a number before }}")]
    NumberBeforeBrace,
    /// A non-digit inside a brace quantifier.
    #[error("unexpected character in quantifier")]
    BadQuantifier,
    /// A `{` quantifier that never closes.
    #[error("quantifier not closed")]
    UnclosedQuantifier,
}

pub(crate) fn compile(pattern: &str, case_insensitive: bool) -> Result<Regex, BuildError> {
    Compiler::new(pattern, case_insensitive).compile()
}

/// Saved state of an enclosing group while its body is being parsed.
struct Frame {
    /// The `CaptureStart`/`GroupStart` node that opened the group.
    open: NodeId,
    /// The enclosing level's pending alternation join point.
    or_end: Option<NodeId>,
}

struct Compiler<'p> {
    source: &'p str,
    pattern: &'p [u8],
    pos: usize,
    nodes: Vec<Node>,
    quants: Vec<Quantifier>,
    classes: Vec<CharClass>,
    groups: Vec<Frame>,
    cap_count: usize,
    ignorecase: bool,
    start: NodeId,
    /// Current tail: the node the next atom will be written into.
    node: NodeId,
    /// Most recently emitted atom, the target of a postfix operator.
    atom_start: Option<NodeId>,
    /// Where finished alternation arms of the current level join up.
    or_end: Option<NodeId>,
}

impl<'p> Compiler<'p> {
    fn new(source: &'p str, case_insensitive: bool) -> Compiler<'p> {
        let pattern = source.as_bytes();
        // Each pattern byte adds at most two nodes, so the pool never
        // reallocates mid-parse. The group stack over-counts `(` that turn
        // out to be escaped or bracketed; the spare slots are harmless.
        let mut nodes = Vec::with_capacity(2 * (pattern.len() + 1));
        let groups = Vec::with_capacity(pattern.iter().filter(|&&b| b == b'(').count());
        nodes.push(Node { kind: NodeKind::Empty, next: NONE });
        Compiler {
            source,
            pattern,
            pos: 0,
            nodes,
            quants: Vec::new(),
            classes: Vec::new(),
            groups,
            cap_count: 0,
            ignorecase: case_insensitive,
            start: 0,
            node: 0,
            atom_start: None,
            or_end: None,
        }
    }

    fn compile(mut self) -> Result<Regex, BuildError> {
        while self.pos < self.pattern.len() {
            match self.pattern[self.pos] {
                b'(' => self.open_group(),
                b')' => self.close_group()?,
                b'|' => self.alternate(),
                b'*' => self.star()?,
                b'+' => self.plus()?,
                b'?' => self.question()?,
                b'{' => self.brace()?,
                b'\\' => self.escape()?,
                b'^' => self.caret(),
                b'$' => self.dollar(),
                b'[' => self.class()?,
                b'.' => self.set_atom(SetKind::Any),
                byte => self.byte_atom(byte),
            }
            self.pos += 1;
        }
        if !self.groups.is_empty() {
            return Err(self.err(ErrorKind::UnclosedGroup));
        }
        if let Some(join) = self.or_end.take() {
            self.nodes[self.node].next = join;
            self.node = join;
        }
        self.nodes[self.node].kind = NodeKind::MatchEnd;
        Ok(Regex {
            nodes: self.nodes,
            quants: self.quants,
            classes: self.classes,
            start: self.start,
            cap_count: self.cap_count,
            ignorecase: self.ignorecase,
            pattern: self.source.into(),
        })
    }

    fn err(&self, kind: ErrorKind) -> BuildError {
        BuildError { kind, at: self.pos }
    }

    fn node_create(&mut self) -> NodeId {
        self.nodes.push(Node { kind: NodeKind::Empty, next: NONE });
        self.nodes.len() - 1
    }

    /// Consume the byte after the current one if it equals `want`.
    fn eat(&mut self, want: u8) -> bool {
        if self.pos + 1 < self.pattern.len() && self.pattern[self.pos + 1] == want {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Write a consuming atom into the current tail and advance.
    fn atom(&mut self, kind: NodeKind) {
        let next = self.node_create();
        self.nodes[self.node] = Node { kind, next };
        self.atom_start = Some(self.node);
        self.node = next;
    }

    fn byte_atom(&mut self, byte: u8) {
        self.atom(NodeKind::Byte(byte));
    }

    fn set_atom(&mut self, set: SetKind) {
        self.atom(NodeKind::Set(set));
    }

    /// Write a zero-width assertion; it is not a postfix target.
    fn assertion(&mut self, kind: Assert) {
        let next = self.node_create();
        self.nodes[self.node] = Node { kind: NodeKind::Assert(kind), next };
        self.node = next;
    }

    fn open_group(&mut self) {
        let kind = if self.pos + 2 < self.pattern.len()
            && self.pattern[self.pos + 1] == b'?'
            && self.pattern[self.pos + 2] == b':'
        {
            self.pos += 2;
            NodeKind::GroupStart
        } else {
            self.cap_count += 1;
            NodeKind::CaptureStart(self.cap_count)
        };
        let next = self.node_create();
        self.nodes[self.node] = Node { kind, next };
        self.groups.push(Frame { open: self.node, or_end: self.or_end.take() });
        self.atom_start = None;
        self.node = next;
    }

    fn close_group(&mut self) -> Result<(), BuildError> {
        let frame = match self.groups.pop() {
            Some(frame) => frame,
            None => return Err(self.err(ErrorKind::UnbalancedClose)),
        };
        if let Some(join) = self.or_end.take() {
            self.nodes[self.node].next = join;
            self.node = join;
        }
        self.or_end = frame.or_end;
        self.atom_start = Some(frame.open);
        let kind = match self.nodes[frame.open].kind {
            NodeKind::CaptureStart(n) => NodeKind::CaptureEnd(n),
            _ => NodeKind::GroupEnd,
        };
        let next = self.node_create();
        self.nodes[self.node] = Node { kind, next };
        self.node = next;
        Ok(())
    }

    /// `|`: clone the current arm's head, convert the head in place into a
    /// branch between the clone and a fresh arm, and remember where the
    /// finished arm's tail must join up.
    fn alternate(&mut self) {
        let clone = self.node_create();
        let arm = self.node_create();
        let head = match self.groups.last() {
            Some(frame) => self.nodes[frame.open].next,
            None => self.start,
        };
        self.nodes[clone] = self.nodes[head];
        self.nodes[head] = Node { kind: NodeKind::Branch(arm), next: clone };
        match self.or_end {
            Some(join) => self.nodes[self.node].next = join,
            None => self.or_end = Some(self.node),
        }
        self.node = arm;
    }

    /// `*`: both the atom's head and the current tail become branches
    /// between the (cloned) atom and the exit.
    fn star(&mut self) -> Result<(), BuildError> {
        let atom = match self.atom_start {
            Some(atom) => atom,
            None => return Err(self.err(ErrorKind::NothingToRepeat('*'))),
        };
        let clone = self.node_create();
        let exit = self.node_create();
        self.nodes[clone] = self.nodes[atom];
        if self.eat(b'?') {
            self.nodes[atom] = Node { kind: NodeKind::Branch(clone), next: exit };
            self.nodes[self.node] = Node { kind: NodeKind::Branch(clone), next: exit };
        } else {
            self.nodes[atom] = Node { kind: NodeKind::Branch(exit), next: clone };
            self.nodes[self.node] = Node { kind: NodeKind::Branch(exit), next: clone };
        }
        self.node = exit;
        Ok(())
    }

    /// `+`: only the tail branches, back to the atom or on to the exit.
    fn plus(&mut self) -> Result<(), BuildError> {
        let atom = match self.atom_start {
            Some(atom) => atom,
            None => return Err(self.err(ErrorKind::NothingToRepeat('+'))),
        };
        let exit = self.node_create();
        if self.eat(b'?') {
            self.nodes[self.node] = Node { kind: NodeKind::Branch(atom), next: exit };
        } else {
            self.nodes[self.node] = Node { kind: NodeKind::Branch(exit), next: atom };
        }
        self.node = exit;
        Ok(())
    }

    /// `?`: the atom's head branches between the cloned atom and the tail.
    fn question(&mut self) -> Result<(), BuildError> {
        let atom = match self.atom_start {
            Some(atom) => atom,
            None => return Err(self.err(ErrorKind::NothingToRepeat('?'))),
        };
        let clone = self.node_create();
        self.nodes[clone] = self.nodes[atom];
        if self.eat(b'?') {
            self.nodes[atom] = Node { kind: NodeKind::Branch(clone), next: self.node };
        } else {
            self.nodes[atom] = Node { kind: NodeKind::Branch(self.node), next: clone };
        }
        Ok(())
    }

    /// `{m,n}`: the atom's head becomes the quantifier node whose `next`
    /// leaves the subgraph, and the tail becomes the subgraph end pointing
    /// back at it.
    fn brace(&mut self) -> Result<(), BuildError> {
        let atom = match self.atom_start {
            Some(atom) => atom,
            None => return Err(self.err(ErrorKind::NothingToRepeat('{'))),
        };
        let quant = self.parse_quantifier()?;
        let clone = self.node_create();
        let exit = self.node_create();
        self.nodes[clone] = self.nodes[atom];
        let id = self.quants.len();
        self.quants.push(Quantifier { body: clone, ..quant });
        self.nodes[atom] = Node { kind: NodeKind::Quantifier(id), next: exit };
        self.nodes[self.node] = Node { kind: NodeKind::SubgraphEnd(atom), next: NONE };
        self.node = exit;
        Ok(())
    }

    /// Parse `{m}`, `{m,}` or `{m,n}` with an optional trailing `?`,
    /// leaving the cursor on the last byte consumed. The bounds are taken
    /// literally; `n < m` is not rejected here and simply exhausts after
    /// `n` iterations at run time.
    fn parse_quantifier(&mut self) -> Result<Quantifier, BuildError> {
        let n = self.pattern.len();
        let mut pos = self.pos + 1;
        let mut min: u32 = 0;
        let mut saw_min = false;
        let mut max: u32 = 0;
        let mut saw_max = false;
        let mut comma = false;

        while pos < n {
            let b = self.pattern[pos];
            if b.is_ascii_digit() {
                min = min.saturating_mul(10).saturating_add(u32::from(b - b'0'));
                saw_min = true;
                pos += 1;
            } else if b == b',' {
                if !saw_min {
                    self.pos = pos;
                    return Err(self.err(ErrorKind::NumberBeforeComma));
                }
                comma = true;
                pos += 1;
                break;
            } else if b == b'}' {
                if !saw_min {
                    self.pos = pos;
                    return Err(self.err(ErrorKind::NumberBeforeBrace));
                }
                max = min;
                saw_max = true;
                break;
            } else {
                self.pos = pos;
                return Err(self.err(ErrorKind::BadQuantifier));
            }
        }
        if comma {
            let mut closed = false;
            while pos < n {
                let b = self.pattern[pos];
                if b.is_ascii_digit() {
                    max = max.saturating_mul(10).saturating_add(u32::from(b - b'0'));
                    saw_max = true;
                    pos += 1;
                } else if b == b'}' {
                    closed = true;
                    break;
                } else {
                    self.pos = pos;
                    return Err(self.err(ErrorKind::BadQuantifier));
                }
            }
            if !closed {
                return Err(self.err(ErrorKind::UnclosedQuantifier));
            }
        } else if !saw_max {
            // Ran off the end before `,` or `}`.
            return Err(self.err(ErrorKind::UnclosedQuantifier));
        }
        self.pos = pos;
        let greedy = !self.eat(b'?');
        Ok(Quantifier {
            min,
            max: if saw_max { Some(max) } else { None },
            greedy,
            body: NONE,
        })
    }

    fn caret(&mut self) {
        let kind = if self.eat(b'^') { Assert::LineStart } else { Assert::TextStart };
        self.assertion(kind);
    }

    fn dollar(&mut self) {
        let kind = if self.eat(b'$') { Assert::LineEnd } else { Assert::TextEnd };
        self.assertion(kind);
    }

    fn class(&mut self) -> Result<(), BuildError> {
        let parsed = class::parse(self)?;
        let id = self.classes.len();
        self.classes.push(parsed);
        self.atom(NodeKind::Class(id));
        Ok(())
    }

    fn escape(&mut self) -> Result<(), BuildError> {
        if self.pos + 1 == self.pattern.len() {
            return Err(self.err(ErrorKind::TruncatedEscape));
        }
        self.pos += 1;
        match self.pattern[self.pos] {
            b'G' => self.assertion(Assert::SearchStart),
            b'<' => self.assertion(Assert::WordStart),
            b'>' => self.assertion(Assert::WordEnd),
            b'c' => self.ignorecase = true,
            b @ (b'e' | b'r' | b'n' | b't') => self.byte_atom(control_escape(b)),
            b @ (b'N' | b'd' | b'D' | b'w' | b'W' | b's' | b'S') => self.set_atom(set_kind(b)),
            b'x' => {
                if self.pos + 2 >= self.pattern.len() {
                    return Err(self.err(ErrorKind::TruncatedHexEscape { esc: 'x', count: 2 }));
                }
                let value = match unicode::hex_to_u32(&self.pattern[self.pos + 1..self.pos + 3]) {
                    Some(value) => value,
                    None => {
                        return Err(self.err(ErrorKind::InvalidHexDigits { esc: 'x', count: 2 }))
                    }
                };
                self.pos += 2;
                self.byte_atom(value as u8);
            }
            b @ (b'u' | b'U') => {
                let count = if b == b'u' { 4 } else { 8 };
                let esc = b as char;
                if self.pos + count >= self.pattern.len() {
                    return Err(self.err(ErrorKind::TruncatedHexEscape { esc, count }));
                }
                let digits = &self.pattern[self.pos + 1..self.pos + 1 + count];
                let value = match unicode::hex_to_u32(digits) {
                    Some(value) => value,
                    None => return Err(self.err(ErrorKind::InvalidHexDigits { esc, count })),
                };
                self.pos += count;
                let mut buf = [0u8; 4];
                let size = unicode::encode_utf8(value, &mut buf);
                if size == 0 {
                    return Err(self.err(ErrorKind::ScalarOutOfRange(esc)));
                }
                // The whole sequence is one postfix target, unlike a bare
                // multi-byte literal where each byte retargets it.
                self.atom_start = Some(self.node);
                for &byte in &buf[..size] {
                    let next = self.node_create();
                    self.nodes[self.node] = Node { kind: NodeKind::Byte(byte), next };
                    self.node = next;
                }
            }
            // Any other escaped byte stands for itself: \\ \* \+ \? ...
            byte => self.byte_atom(byte),
        }
        Ok(())
    }
}

fn control_escape(byte: u8) -> u8 {
    match byte {
        b'e' => 0x1b,
        b'r' => b'\r',
        b'n' => b'\n',
        _ => b'\t',
    }
}

fn set_kind(byte: u8) -> SetKind {
    match byte {
        b'N' => SetKind::NotNewline,
        b'd' => SetKind::Digit,
        b'D' => SetKind::NotDigit,
        b'w' => SetKind::Word,
        b'W' => SetKind::NotWord,
        b's' => SetKind::Space,
        _ => SetKind::NotSpace,
    }
}
