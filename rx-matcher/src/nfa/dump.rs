//! Textual dump of the compiled graph, in DOT form.

use std::fmt::Write;

use super::{Assert, NodeKind, Quantifier, Regex, SetKind, NONE};

impl Regex {
    /// Render the node graph as a DOT digraph body, one node or edge per
    /// line. Primary edges are solid, backtrack alternatives dotted, and
    /// consuming edges carry a label describing what they match. The output
    /// is meant for piping into a graph renderer while debugging patterns.
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        out.push_str("graph g {\n");
        for (i, node) in self.nodes.iter().enumerate() {
            match node.kind {
                NodeKind::Byte(value) => {
                    let _ = writeln!(
                        out,
                        "    {i} -> {} [label=\"{}\",style=solid]",
                        node.next,
                        byte_label(value)
                    );
                }
                NodeKind::CaptureStart(n) => {
                    let _ = writeln!(out, "    {i} -> {} [label=\"({n}\",style=solid]", node.next);
                }
                NodeKind::CaptureEnd(n) => {
                    let _ = writeln!(out, "    {i} -> {} [label=\"){n}\",style=solid]", node.next);
                }
                NodeKind::GroupStart => {
                    let _ = writeln!(out, "    {i} -> {} [label=\"(?\",style=solid]", node.next);
                }
                NodeKind::GroupEnd => {
                    let _ = writeln!(out, "    {i} -> {} [label=\")?\",style=solid]", node.next);
                }
                NodeKind::Branch(alt) => {
                    let _ = writeln!(out, "    {i} [label=\"{i}B\"]");
                    let _ = writeln!(out, "    {i} -> {} [style=solid]", node.next);
                    let _ = writeln!(out, "    {i} -> {alt} [style=dotted]");
                }
                NodeKind::Assert(kind) => {
                    let _ = writeln!(out, "    {i} [label=\"{i}A\"]");
                    let _ = writeln!(
                        out,
                        "    {i} -> {} [label=\"{}\"]",
                        node.next,
                        assert_label(kind)
                    );
                }
                NodeKind::Class(id) => {
                    let class = &self.classes[id];
                    let _ = writeln!(out, "    {i} [label=\"{i}C\"]");
                    let _ = writeln!(
                        out,
                        "    {i} -> {} [label=\"{}\"]",
                        node.next,
                        &self.pattern[class.span.clone()]
                    );
                }
                NodeKind::Set(set) => {
                    let _ = writeln!(out, "    {i} [label=\"{i}C\"]");
                    let _ = writeln!(out, "    {i} -> {} [label=\"{}\"]", node.next, set_label(set));
                }
                NodeKind::Quantifier(id) => {
                    let quant = &self.quants[id];
                    let _ = writeln!(out, "    {i} [label=\"{i}Q\"]");
                    if quant.greedy {
                        let _ = writeln!(out, "    {i} -> {} [style=dotted]", node.next);
                        let _ = writeln!(
                            out,
                            "    {i} -> {} [style=solid,label=\"{}\"]",
                            quant.body,
                            bounds_label(quant)
                        );
                    } else {
                        let _ = writeln!(out, "    {i} -> {} [style=solid]", node.next);
                        let _ = writeln!(
                            out,
                            "    {i} -> {} [style=dotted,label=\"{}?\"]",
                            quant.body,
                            bounds_label(quant)
                        );
                    }
                }
                NodeKind::MatchEnd => {
                    let _ = writeln!(out, "    {i} [label=\"{i}E\"]");
                }
                NodeKind::Empty | NodeKind::SubgraphEnd(_) => {
                    if node.next != NONE {
                        let _ = writeln!(out, "    {i} -> {} [style=solid]", node.next);
                    }
                }
            }
        }
        out.push_str("}\n");
        out
    }
}

fn byte_label(value: u8) -> String {
    match value {
        0x1b => "\u{29f9}e".to_string(),
        b'\r' => "\u{29f9}r".to_string(),
        b'\n' => "\u{29f9}n".to_string(),
        b'\t' => "\u{29f9}t".to_string(),
        _ => (value as char).to_string(),
    }
}

fn assert_label(kind: Assert) -> &'static str {
    match kind {
        Assert::TextStart => "^",
        Assert::LineStart => "^^",
        Assert::TextEnd => "$",
        Assert::LineEnd => "$$",
        Assert::SearchStart => "\u{29f9}G",
        Assert::WordStart => "\\<",
        Assert::WordEnd => "\\>",
    }
}

fn set_label(set: SetKind) -> &'static str {
    match set {
        SetKind::Any => ".",
        SetKind::NotNewline => "\u{29f9}N",
        SetKind::Digit => "\u{29f9}d",
        SetKind::NotDigit => "\u{29f9}D",
        SetKind::Word => "\u{29f9}w",
        SetKind::NotWord => "\u{29f9}W",
        SetKind::Space => "\u{29f9}s",
        SetKind::NotSpace => "\u{29f9}S",
    }
}

fn bounds_label(quant: &Quantifier) -> String {
    match quant.max {
        Some(max) if max == quant.min => format!("{{{}}}", quant.min),
        Some(max) => format!("{{{},{}}}", quant.min, max),
        None => format!("{{{},}}", quant.min),
    }
}

#[cfg(test)]
mod tests {
    use crate::Regex;

    #[test]
    fn dot_mentions_every_construct() {
        let re = Regex::new(r"a(b|c)[d-f]{2,3}\d$").unwrap();
        let dot = re.to_dot();
        assert!(dot.starts_with("graph g {\n"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("[label=\"a\",style=solid]"));
        assert!(dot.contains("[label=\"(1\",style=solid]"));
        assert!(dot.contains("B\"]"));
        assert!(dot.contains("[label=\"[d-f]\"]"));
        assert!(dot.contains("[style=solid,label=\"{2,3}\"]"));
        assert!(dot.contains("[label=\"\u{29f9}d\"]"));
        assert!(dot.contains("[label=\"$\"]"));
    }

    #[test]
    fn lazy_quantifier_edge_is_dotted() {
        let re = Regex::new(r"a{2,}?").unwrap();
        let dot = re.to_dot();
        assert!(dot.contains("[style=dotted,label=\"{2,}?\"]"));
    }
}
