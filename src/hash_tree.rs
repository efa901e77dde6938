//! Sparse Merkle tree built from a tweakable hash. The tree always has the
//! depth of the full lifetime, but only the contiguous range of leafs the key
//! is active for is actually stored, padded with random siblings where a node
//! on the boundary needs one.

use rand_core::{CryptoRng, RngCore};

#[cfg(feature = "serde_enabled")]
use serde::{Deserialize, Serialize};

use crate::tweak_hash::TweakableHash;

/// One layer of the tree: the stored nodes, together with the position of the
/// first one within the full layer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde_enabled",
    derive(Serialize, Deserialize),
    serde(bound(
        serialize = "TH::Domain: Serialize",
        deserialize = "TH::Domain: Deserialize<'de>"
    ))
)]
pub(crate) struct HashTreeLayer<TH: TweakableHash> {
    pub(crate) start_index: u32,
    pub(crate) nodes: Vec<TH::Domain>,
}

/// Sparse Merkle tree over a contiguous range of leafs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde_enabled",
    derive(Serialize, Deserialize),
    serde(bound(
        serialize = "TH::Domain: Serialize",
        deserialize = "TH::Domain: Deserialize<'de>"
    ))
)]
pub struct HashTree<TH: TweakableHash> {
    depth: usize,
    layers: Vec<HashTreeLayer<TH>>,
}

/// Opening of a leaf of the tree: the co-path of the leaf, i.e. one sibling
/// per level, from bottom to top.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde_enabled",
    derive(Serialize, Deserialize),
    serde(bound(
        serialize = "TH::Domain: Serialize",
        deserialize = "TH::Domain: Deserialize<'de>"
    ))
)]
pub struct HashTreeOpening<TH: TweakableHash> {
    pub(crate) start_index: u32,
    pub(crate) co_path: Vec<TH::Domain>,
}

/// Pad a list of nodes so that it starts at an even index and ends at an odd
/// one, which ensures every stored node has its sibling stored as well.
fn padded_layer<TH: TweakableHash, R: RngCore + CryptoRng>(
    rng: &mut R,
    nodes: Vec<TH::Domain>,
    start_index: u32,
) -> HashTreeLayer<TH> {
    let end_index = start_index + nodes.len() as u32 - 1;
    let mut padded = Vec::with_capacity(nodes.len() + 2);

    // front padding if the layer starts at an odd index
    if start_index % 2 == 1 {
        padded.push(TH::rand_domain(rng));
    }

    padded.extend(nodes);

    // back padding if the layer ends at an even index
    if end_index % 2 == 0 {
        padded.push(TH::rand_domain(rng));
    }

    HashTreeLayer {
        start_index: start_index - (start_index % 2),
        nodes: padded,
    }
}

impl<TH: TweakableHash> HashTree<TH> {
    /// Build a tree of the given depth holding `leaf_hashes` at positions
    /// `start_index..start_index + leaf_hashes.len()`. The leafs must already
    /// be hashed with the leaf-level tweak by the caller.
    ///
    /// # Panics
    /// Panics if the leafs do not fit in a tree of the given depth.
    pub fn new<R: RngCore + CryptoRng>(
        rng: &mut R,
        depth: usize,
        start_index: u32,
        parameter: &TH::Parameter,
        leaf_hashes: Vec<TH::Domain>,
    ) -> Self {
        assert!(
            start_index as u64 + leaf_hashes.len() as u64 <= 1u64 << depth,
            "Hash-Tree new: Not enough space for leafs"
        );
        assert!(!leaf_hashes.is_empty(), "Hash-Tree new: Need at least one leaf");

        let mut layers = Vec::with_capacity(depth + 1);
        layers.push(padded_layer::<TH, R>(rng, leaf_hashes, start_index));

        // hash pairs of siblings up to the root
        for level in 0..depth {
            let current: &HashTreeLayer<TH> = &layers[level];
            let parent_start = current.start_index / 2;

            let parents: Vec<TH::Domain> = current
                .nodes
                .chunks_exact(2)
                .enumerate()
                .map(|(j, pair)| {
                    let parent_index = parent_start + j as u32;
                    let tweak = TH::tree_tweak((level + 1) as u8, parent_index);
                    TH::apply(parameter, &tweak, pair)
                })
                .collect();

            layers.push(padded_layer::<TH, R>(rng, parents, parent_start));
        }

        Self { depth, layers }
    }

    /// Root of the tree
    pub fn root(&self) -> TH::Domain {
        self.layers
            .last()
            .expect("Hash-Tree must have at least one layer")
            .nodes[0]
    }

    /// Opening of the leaf at the given position.
    ///
    /// # Panics
    /// Panics if the position is outside of the stored range of leafs.
    pub fn path(&self, position: u32) -> HashTreeOpening<TH> {
        let leaf_layer = &self.layers[0];
        assert!(
            position >= leaf_layer.start_index,
            "Hash-Tree path: Invalid position, position before start index"
        );
        assert!(
            position < leaf_layer.start_index + leaf_layer.nodes.len() as u32,
            "Hash-Tree path: Invalid position, position too large"
        );

        let mut co_path = Vec::with_capacity(self.depth);
        let mut current_position = position;
        for layer in self.layers.iter().take(self.depth) {
            let sibling_position = current_position ^ 0x01;
            let sibling = layer.nodes[(sibling_position - layer.start_index) as usize];
            co_path.push(sibling);
            current_position >>= 1;
        }

        HashTreeOpening {
            start_index: leaf_layer.start_index,
            co_path,
        }
    }
}

/// Verify an opening: recompute the root from the leaf hash and the co-path,
/// and compare it to the given root. Returns `false` for any out-of-range
/// position rather than panicking, since openings come from untrusted input.
pub fn hash_tree_verify<TH: TweakableHash>(
    parameter: &TH::Parameter,
    root: &TH::Domain,
    position: u32,
    leaf: &TH::Domain,
    opening: &HashTreeOpening<TH>,
) -> bool {
    let depth = opening.co_path.len();
    if depth == 0 || depth > 32 {
        return false;
    }
    let num_leafs = 1u64 << depth;
    if position < opening.start_index
        || (position as u64) >= opening.start_index as u64 + num_leafs
    {
        return false;
    }

    let mut current_node = *leaf;
    let mut current_position = position;
    for (level, sibling) in opening.co_path.iter().enumerate() {
        // the parity of the position determines the order of the children
        let children = if current_position % 2 == 0 {
            [current_node, *sibling]
        } else {
            [*sibling, current_node]
        };

        current_position >>= 1;
        let tweak = TH::tree_tweak((level + 1) as u8, current_position);
        current_node = TH::apply(parameter, &tweak, &children);
    }

    current_node == *root
}
