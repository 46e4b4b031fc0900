use crate::tree::{Frequencies, Node};
use bitvec::prelude::*;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maps each symbol of a tree to its code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SerializableCodeTable", into = "SerializableCodeTable")]
pub struct CodeTable {
    codes: BTreeMap<u8, BitBox>,
}

impl CodeTable {
    pub fn get(&self, symbol: u8) -> Option<&BitSlice> {
        self.codes.get(&symbol).map(|b| b.as_bitslice())
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Codes in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &BitSlice)> + '_ {
        self.codes.iter().map(|(&s, b)| (s, b.as_bitslice()))
    }

    /// Length of the bit-packed payload for input with these counts.
    pub fn encoded_bits(&self, freq: &Frequencies) -> u64 {
        freq.iter()
            .map(|(s, c)| c * self.get(s).map_or(0, |b| b.len() as u64))
            .sum()
    }
}

/// Walks the tree, 0 for left and 1 for right, recording the path to every leaf.
///
/// A lone leaf gets the empty code.
pub fn derive_codes(root: &Node) -> CodeTable {
    fn traverse(node: &Node, path: &mut BitVec, codes: &mut BTreeMap<u8, BitBox>) {
        match node {
            Node::Leaf { symbol, .. } => {
                codes.insert(*symbol, path.clone().into_boxed_bitslice());
            }
            Node::Internal { left, right, .. } => {
                path.push(false);
                traverse(left, path, codes);
                path.pop();

                path.push(true);
                traverse(right, path, codes);
                path.pop();
            }
        }
    }

    let mut path = BitVec::new();
    let mut codes = BTreeMap::new();
    traverse(root, &mut path, &mut codes);

    debug!(
        "derived {} codes, longest {} bits",
        codes.len(),
        codes.values().map(|b| b.len()).max().unwrap_or(0)
    );
    CodeTable { codes }
}

/// Wire shape of a [`CodeTable`]: each code as its bit length and backing words.
#[derive(Serialize, Deserialize)]
struct SerializableCodeTable {
    codes: BTreeMap<u8, (usize, Box<[usize]>)>,
}

impl From<CodeTable> for SerializableCodeTable {
    fn from(other: CodeTable) -> Self {
        Self {
            codes: other
                .codes
                .into_iter()
                .map(|(k, v)| {
                    let len = v.len();
                    (k, (len, v.into_boxed_slice()))
                })
                .collect(),
        }
    }
}

impl From<SerializableCodeTable> for CodeTable {
    fn from(other: SerializableCodeTable) -> Self {
        Self {
            codes: other
                .codes
                .into_iter()
                .map(|(k, (len, words))| {
                    let mut bv = BitBox::from_boxed_slice(words).into_bitvec();
                    bv.resize(len, false);
                    (k, bv.into_boxed_bitslice())
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build_tree;

    fn codes_for(input: &[u8]) -> CodeTable {
        derive_codes(&build_tree(&Frequencies::from_bytes(input)).unwrap())
    }

    fn is_prefix(a: &BitSlice, b: &BitSlice) -> bool {
        a.len() <= b.len() && &b[..a.len()] == a
    }

    #[test]
    fn single_leaf_has_empty_code() {
        let t = codes_for(b"zzzz");
        assert_eq!(t.len(), 1);
        assert!(t.get(b'z').unwrap().is_empty());
    }

    #[test]
    fn basic_codes() {
        let t = codes_for(&[0, 0, 2]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.get(2).unwrap(), bits![0]);
        assert_eq!(t.get(0).unwrap(), bits![1]);
        assert_eq!(t.get(1), None);
    }

    #[test]
    fn multi_level_codes() {
        let t = codes_for(&[0, 0, 1, 1, 2, 2, 2]);
        assert_eq!(t.get(2).unwrap(), bits![0]);
        assert_eq!(t.get(0).unwrap(), bits![1, 0]);
        assert_eq!(t.get(1).unwrap(), bits![1, 1]);
    }

    #[test]
    fn keys_are_observed_symbols() {
        let input = b"the quick brown fox jumps over the lazy dog";
        let t = codes_for(input);
        let f = Frequencies::from_bytes(input);

        let keys: Vec<u8> = t.iter().map(|(s, _)| s).collect();
        let seen: Vec<u8> = f.iter().map(|(s, _)| s).collect();
        assert_eq!(keys, seen);
    }

    #[test]
    fn prefix_free() {
        let input = b"This is a really long message, I sure do hope it encodes and decodes properly.";
        let t = codes_for(input);

        for (a, ca) in t.iter() {
            for (b, cb) in t.iter() {
                if a != b {
                    assert!(!is_prefix(ca, cb), "{} is a prefix of {}", a, b);
                }
            }
        }
    }

    #[test]
    fn encoded_bits() {
        let input = [0, 0, 1, 1, 2, 2, 2];
        let t = codes_for(&input);
        // 3 * 1 + 2 * 2 + 2 * 2
        assert_eq!(t.encoded_bits(&Frequencies::from_bytes(&input)), 11);
    }

    #[test]
    fn serde_round_trip() {
        let input: Vec<u8> = (0..=255u8).chain(0..64).collect();
        let t = codes_for(&input);

        let data = rmp_serde::to_vec(&t).unwrap();
        let back: CodeTable = rmp_serde::from_slice(&data).unwrap();

        assert_eq!(back, t);
    }
}
