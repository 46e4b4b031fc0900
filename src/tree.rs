use crate::error::{Error, Result};
use crate::queue::{PriorityQueue, Weighted};
use log::debug;

/// Occurrence counts for every byte value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frequencies {
    counts: [u64; 256],
}

impl Frequencies {
    pub fn new() -> Self {
        Self { counts: [0; 256] }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut freq = Self::new();
        for &b in bytes {
            freq.counts[b as usize] += 1;
        }
        freq
    }

    pub fn add(&mut self, symbol: u8, count: u64) {
        self.counts[symbol as usize] += count;
    }

    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Number of byte values seen at least once.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.distinct() == 0
    }

    /// Non-zero entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(s, &c)| (s as u8, c))
    }
}

impl Default for Frequencies {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<(u8, u64)> for Frequencies {
    fn from_iter<I: IntoIterator<Item = (u8, u64)>>(iter: I) -> Self {
        let mut freq = Self::new();
        for (s, c) in iter {
            freq.add(s, c);
        }
        freq
    }
}

/// A node of a Huffman tree. Internal nodes always carry two children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: u8,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn leaf(symbol: u8, weight: u64) -> Self {
        Node::Leaf { symbol, weight }
    }

    pub fn from_children(left: Node, right: Node) -> Self {
        Node::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// The symbol, if this is a leaf.
    pub fn symbol(&self) -> Option<u8> {
        match self {
            Node::Leaf { symbol, .. } => Some(*symbol),
            Node::Internal { .. } => None,
        }
    }

    /// Follows one edge: 0 goes left, 1 goes right. Leaves have no children.
    pub fn child(&self, bit: u8) -> Option<&Node> {
        match self {
            Node::Leaf { .. } => None,
            Node::Internal { left, right, .. } => Some(if bit == 0 { &**left } else { &**right }),
        }
    }

    /// Calls `f` with every leaf and its depth, left to right.
    pub fn for_each_leaf(&self, mut f: impl FnMut(&Node, usize)) {
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            match node {
                Node::Leaf { .. } => f(node, depth),
                Node::Internal { left, right, .. } => {
                    stack.push((&**right, depth + 1));
                    stack.push((&**left, depth + 1));
                }
            }
        }
    }
}

impl Weighted for Node {
    fn weight(&self) -> u64 {
        Node::weight(self)
    }
}

/// Builds the Huffman tree for `freq`.
///
/// The lighter of each popped pair goes on the left. A table with a single
/// symbol yields a lone leaf.
pub fn build_tree(freq: &Frequencies) -> Result<Node> {
    if freq.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut pq: PriorityQueue<Node> = freq.iter().map(|(s, c)| Node::leaf(s, c)).collect();

    while pq.size() > 1 {
        let left = pq.pop_min()?;
        let right = pq.pop_min()?;
        pq.push(Node::from_children(left, right));
    }

    let root = pq.pop_min()?;
    debug!(
        "built tree over {} symbols, root weight {}",
        freq.distinct(),
        root.weight()
    );
    Ok(root)
}
