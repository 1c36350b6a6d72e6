//! Text form of a [`HuffmanTree`].
//!
//! ```text
//! tree      := leaf | internal
//! leaf      := frequency ":" hex_symbol
//! internal  := frequency "(" tree "," tree ")"
//! frequency := digits [ "." digits ]
//! hex_symbol:= two hex digits
//! ```
//!
//! The root frequency is written without a fractional part, every other node
//! with one. `1(0.75:61,0.25:62)` is the tree for `"aaab"`.

use crate::error::{Error, Result};
use crate::hufftree::{HuffNode, HuffmanTree};

/// Deepest nesting a 256-symbol tree can need, plus one.
const MAX_DEPTH: usize = 256;

/// Serialize with the shortest decimal frequencies that read back exactly.
pub fn serialize(tree: &HuffmanTree) -> String {
    serialize_with_precision(tree, None)
}

/// Serialize with non-root frequencies rounded to `precision` decimal places,
/// or the shortest exact form when `None`.
pub fn serialize_with_precision(tree: &HuffmanTree, precision: Option<usize>) -> String {
    let mut out = String::with_capacity(tree.leaf_count() * 16);
    out.push_str(&format!("{:.0}", tree.root.frequency()));
    write_body(&tree.root, precision, &mut out);
    out
}

fn write_node(node: &HuffNode, precision: Option<usize>, out: &mut String) {
    out.push_str(&format_fraction(node.frequency(), precision));
    write_body(node, precision, out);
}

fn write_body(node: &HuffNode, precision: Option<usize>, out: &mut String) {
    match node {
        HuffNode::Leaf { byte, .. } => {
            out.push_str(&format!(":{:02x}", byte));
        },
        HuffNode::Internal { left, right, .. } => {
            out.push('(');
            write_node(left, precision, out);
            out.push(',');
            write_node(right, precision, out);
            out.push(')');
        }
    }
}

fn format_fraction(frequency: f64, precision: Option<usize>) -> String {
    match precision {
        Some(places) => format!("{:.*}", places.max(1), frequency),
        None => {
            let text = frequency.to_string();
            if text.contains('.') {
                text
            } else {
                text + ".0"
            }
        }
    }
}

/// Parse text produced by [`serialize`]. A single trailing newline is allowed.
pub fn parse(text: &str) -> Result<HuffmanTree> {
    let body = text.strip_suffix('\n').unwrap_or(text);
    let mut parser = Parser::new(body.as_bytes());
    let root = parser.tree()?;
    if parser.pos != parser.input.len() {
        return Err(Error::malformed(parser.pos, "unexpected characters after tree"));
    }
    Ok(HuffmanTree { root })
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    depth: usize,
    seen: [bool; 256],
}

impl<'a> Parser<'a> {
    fn new(input: &'a [u8]) -> Self {
        Parser {
            input,
            pos: 0,
            depth: 0,
            seen: [false; 256],
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn expect(&mut self, delimiter: u8, reason: &'static str) -> Result<()> {
        match self.peek() {
            Some(b) if b == delimiter => {
                self.pos += 1;
                Ok(())
            },
            _ => Err(Error::malformed(self.pos, reason)),
        }
    }

    fn tree(&mut self) -> Result<HuffNode> {
        let frequency = self.frequency()?;
        match self.peek() {
            Some(b':') => {
                self.pos += 1;
                let byte = self.symbol()?;
                Ok(HuffNode::Leaf { frequency, byte })
            },
            Some(b'(') => {
                if self.depth >= MAX_DEPTH {
                    return Err(Error::malformed(self.pos, "tree nested too deeply"));
                }
                self.pos += 1;
                self.depth += 1;
                let left = self.tree()?;
                self.expect(b',', "expected ',' between children")?;
                let right = self.tree()?;
                self.expect(b')', "unbalanced parentheses, expected ')'")?;
                self.depth -= 1;
                Ok(HuffNode::Internal {
                    frequency,
                    left: Box::new(left),
                    right: Box::new(right),
                })
            },
            Some(_) => Err(Error::malformed(self.pos, "expected ':' or '(' after frequency")),
            None => Err(Error::malformed(self.pos, "truncated node")),
        }
    }

    fn digits(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn frequency(&mut self) -> Result<f64> {
        let start = self.pos;
        if self.digits() == 0 {
            return Err(Error::malformed(start, "expected frequency"));
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            if self.digits() == 0 {
                return Err(Error::malformed(self.pos, "expected digits after '.'"));
            }
        }
        std::str::from_utf8(&self.input[start..self.pos])
            .ok()
            .and_then(|digits| digits.parse::<f64>().ok())
            .ok_or(Error::malformed(start, "invalid frequency"))
    }

    fn symbol(&mut self) -> Result<u8> {
        let start = self.pos;
        let field = self.input
            .get(start..start + 2)
            .ok_or(Error::malformed(start, "truncated symbol"))?;
        let hi = hex_value(field[0]).ok_or(Error::malformed(start, "invalid hex digit"))?;
        let lo = hex_value(field[1]).ok_or(Error::malformed(start + 1, "invalid hex digit"))?;
        let byte = (hi << 4) | lo;
        self.pos += 2;

        if std::mem::replace(&mut self.seen[usize::from(byte)], true) {
            return Err(Error::malformed(start, "duplicate symbol"));
        }
        Ok(byte)
    }
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn assert_malformed(text: &str, expected_position: usize) {
        match parse(text) {
            Err(Error::MalformedTree { position, .. }) => {
                assert_eq!(position, expected_position, "input {:?}", text)
            },
            other => panic!("expected malformed tree for {:?}, got {:?}", text, other),
        }
    }

    #[test]
    fn serializes_two_symbol_tree() {
        let tree = HuffmanTree::from_bytes(b"aaab").unwrap();
        assert_eq!(serialize(&tree), "1(0.75:61,0.25:62)");
    }

    #[test]
    fn serializes_lone_leaf_and_small_symbols() {
        let tree = HuffmanTree::from_bytes(b"\x00\x00").unwrap();
        assert_eq!(serialize(&tree), "1:00");

        let tree = HuffmanTree::from_bytes(b"\n\x01\x01\x01").unwrap();
        assert_eq!(serialize(&tree), "1(0.75:01,0.25:0a)");
    }

    #[test]
    fn fixed_precision() {
        let tree = HuffmanTree::from_bytes(b"aab").unwrap();
        assert_eq!(
            serialize_with_precision(&tree, Some(3)),
            "1(0.667:61,0.333:62)"
        );
        // zero places still keeps a fractional part
        assert_eq!(
            serialize_with_precision(&tree, Some(0)),
            "1(0.7:61,0.3:62)"
        );
    }

    #[test]
    fn parses_serialized_tree() {
        let text = b"the rain in spain falls mainly on the plain\n\t\x00\xff";
        let tree = HuffmanTree::from_bytes(text).unwrap();
        let parsed = parse(&serialize(&tree)).unwrap();
        assert!(tree.approx_eq(&parsed, 1e-12));
        assert_eq!(tree.symbols(), parsed.symbols());
    }

    #[test]
    fn accepts_trailing_newline_and_uppercase() {
        let tree = parse("1(0.5:FF,0.5:0a)\n").unwrap();
        assert_eq!(tree.symbols(), vec![0xff, 0x0a]);
        let lone = parse("1:7a").unwrap();
        assert_eq!(lone.root, HuffNode::new(b'z', 1.0));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_malformed("", 0);
        assert_malformed("1", 1);
        assert_malformed("(0.5:61,0.5:62)", 0);
        assert_malformed("1(0.5:61,0.5:62", 15);
        assert_malformed("1(0.5:61;0.5:62)", 8);
        assert_malformed("1(0.5:61,0.5:62))", 16);
        assert_malformed("1(0.5:6,0.5:62)", 7);
        assert_malformed("1(0.5:6g,0.5:62)", 7);
        assert_malformed("1(0.5:612,0.5:62)", 8);
        assert_malformed("1(0.5-61,0.5:62)", 5);
        assert_malformed("1(0.:61,0.5:62)", 4);
        assert_malformed("1(0.5:61,0.5:61)", 13);
        assert_malformed("1(0.5:61,0.5:62)\n\n", 16);
    }

    #[test]
    fn rejects_runaway_nesting() {
        let mut text = String::from("1");
        for _ in 0..=MAX_DEPTH {
            text.push_str("(0.5");
        }
        let result = parse(&text);
        assert!(matches!(result, Err(Error::MalformedTree { reason: "tree nested too deeply", .. })));
    }
}
