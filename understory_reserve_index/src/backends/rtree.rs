// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! R-tree backend generic over scalar `T: Scalar` with SAH-like split.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::types::{Aabb2D, Scalar, ScalarAcc, area};

const DEFAULT_MAX_CHILDREN: usize = 8;
const DEFAULT_MIN_CHILDREN: usize = 4;

/// R-tree backend using SAH-like splits and widened accumulator metrics.
///
/// Nodes live in an arena and are addressed by index. Removal prunes empty
/// nodes from their parents; the arena itself is only reset when the tree
/// becomes empty or is cleared.
#[derive(Clone)]
pub struct RTree<T: Scalar> {
    max_children: usize,
    min_children: usize,
    root: Option<NodeIdx>,
    arena: Vec<RNode<T>>,
    slots: Vec<Option<Aabb2D<T>>>,
}

#[derive(Clone)]
struct RNode<T: Scalar> {
    bbox: Aabb2D<T>,
    leaf: bool,
    children: Vec<RChild<T>>,
}

#[derive(Copy, Clone)]
enum RChild<T: Scalar> {
    Node(NodeIdx),
    Item { slot: usize, bbox: Aabb2D<T> },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct NodeIdx(usize);

impl NodeIdx {
    const fn new(i: usize) -> Self {
        Self(i)
    }

    const fn get(self) -> usize {
        self.0
    }
}

impl<T: Scalar> Default for RTree<T> {
    fn default() -> Self {
        Self::with_fanout(DEFAULT_MAX_CHILDREN, DEFAULT_MIN_CHILDREN)
    }
}

type RChildren<TS> = Vec<RChild<TS>>;
type RBestSplit<TS> = Option<(ScalarAcc<TS>, RChildren<TS>, RChildren<TS>)>;

fn by_centroid<T: Scalar>(a: &Aabb2D<T>, b: &Aabb2D<T>, axis: usize) -> Ordering {
    if axis == 0 {
        T::mid(a.min_x, a.max_x).cmp(&T::mid(b.min_x, b.max_x))
    } else {
        T::mid(a.min_y, a.max_y).cmp(&T::mid(b.min_y, b.max_y))
    }
}

impl<T: Scalar> RTree<T> {
    /// Create an empty tree with the given node fanout.
    ///
    /// `max_children` is clamped to at least 2 and `min_children` to `1..=max_children / 2`
    /// so an overflowing node can always be split in two.
    pub fn with_fanout(max_children: usize, min_children: usize) -> Self {
        let max_children = max_children.max(2);
        let min_children = min_children.clamp(1, max_children / 2);
        Self {
            max_children,
            min_children,
            root: None,
            arena: Vec::new(),
            slots: Vec::new(),
        }
    }

    /// Build an `RTree` from a set of (slot, bbox) pairs using a packed layout.
    pub fn bulk_build(pairs: &[(usize, Aabb2D<T>)]) -> Self {
        let mut tree = Self::default();
        let mut items = pairs.to_vec();
        tree.root = Self::bulk_build_nodes(&mut tree.arena, &mut items, tree.max_children);
        for (slot, bbox) in pairs.iter().copied() {
            tree.ensure_slot(slot, bbox);
        }
        tree
    }

    /// Number of live items.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// True if the tree holds no items.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    fn ensure_slot(&mut self, slot: usize, bbox: Aabb2D<T>) {
        if self.slots.len() <= slot {
            self.slots.resize_with(slot + 1, || None);
        }
        self.slots[slot] = Some(bbox);
    }

    /// STR-like bulk builder: creates a packed tree from items in one pass into `arena`.
    fn bulk_build_nodes(
        arena: &mut Vec<RNode<T>>,
        items: &mut [(usize, Aabb2D<T>)],
        max_children: usize,
    ) -> Option<NodeIdx> {
        if items.is_empty() {
            return None;
        }

        // Leaf level: vertical slices by x centroid, then runs by y centroid.
        let n = items.len();
        let gx = slices_for(n.div_ceil(max_children));
        items.sort_by(|a, b| by_centroid(&a.1, &b.1, 0));
        let mut level: Vec<NodeIdx> = Vec::new();
        for slice in items.chunks_mut(n.div_ceil(gx)) {
            slice.sort_by(|a, b| by_centroid(&a.1, &b.1, 1));
            for chunk in slice.chunks(max_children) {
                let children: RChildren<T> = chunk
                    .iter()
                    .map(|&(slot, bbox)| RChild::Item { slot, bbox })
                    .collect();
                level.push(Self::push_node(arena, true, children));
            }
        }

        // Promote until a single root remains.
        while level.len() > max_children {
            let n_nodes = level.len();
            let gx = slices_for(n_nodes.div_ceil(max_children));
            level.sort_by(|a, b| by_centroid(&arena[a.get()].bbox, &arena[b.get()].bbox, 0));
            let mut next = Vec::new();
            for slice in level.chunks_mut(n_nodes.div_ceil(gx)) {
                slice.sort_by(|a, b| by_centroid(&arena[a.get()].bbox, &arena[b.get()].bbox, 1));
                for chunk in slice.chunks(max_children) {
                    let children = chunk.iter().map(|&i| RChild::Node(i)).collect();
                    next.push(Self::push_node(arena, false, children));
                }
            }
            level = next;
        }

        if level.len() == 1 {
            Some(level[0])
        } else {
            let children = level.into_iter().map(RChild::Node).collect();
            Some(Self::push_node(arena, false, children))
        }
    }

    fn push_node(arena: &mut Vec<RNode<T>>, leaf: bool, children: RChildren<T>) -> NodeIdx {
        let bbox = Self::node_bbox(arena, &children);
        arena.push(RNode {
            bbox,
            leaf,
            children,
        });
        NodeIdx::new(arena.len() - 1)
    }

    fn child_bbox(arena: &[RNode<T>], child: &RChild<T>) -> Aabb2D<T> {
        match child {
            RChild::Node(i) => arena[i.get()].bbox,
            RChild::Item { bbox, .. } => *bbox,
        }
    }

    fn node_bbox(arena: &[RNode<T>], children: &[RChild<T>]) -> Aabb2D<T> {
        let mut it = children.iter().map(|c| Self::child_bbox(arena, c));
        let Some(first) = it.next() else {
            return Aabb2D::new(T::zero(), T::zero(), T::zero(), T::zero());
        };
        it.fold(first, |acc, b| acc.union(&b))
    }

    fn enlarge_cost(a: &Aabb2D<T>, b: &Aabb2D<T>) -> T::Acc {
        area(&a.union(b)) - area(a)
    }

    fn choose_child(arena: &[RNode<T>], children: &[RChild<T>], bbox: &Aabb2D<T>) -> usize {
        let mut best_idx = 0_usize;
        let mut best_cost: Option<T::Acc> = None;
        for (i, c) in children.iter().enumerate() {
            let cost = Self::enlarge_cost(&Self::child_bbox(arena, c), bbox);
            if best_cost.is_none_or(|bc| cost < bc) {
                best_cost = Some(cost);
                best_idx = i;
            }
        }
        best_idx
    }

    /// SAH-like split: sort along an axis, precompute prefix/suffix AABBs, and
    /// choose `k` that minimizes `area(LB_k) * k + area(RB_k) * (n - k)`.
    fn split_children(
        arena: &[RNode<T>],
        children: RChildren<T>,
        min_children: usize,
    ) -> (RChildren<T>, RChildren<T>) {
        let n = children.len();
        let mut best: RBestSplit<T> = None;
        for axis in 0..2 {
            let mut v = children.clone();
            v.sort_by(|a, b| {
                by_centroid(
                    &Self::child_bbox(arena, a),
                    &Self::child_bbox(arena, b),
                    axis,
                )
            });
            let boxes: Vec<Aabb2D<T>> = v.iter().map(|c| Self::child_bbox(arena, c)).collect();

            let mut prefix: Vec<Aabb2D<T>> = Vec::with_capacity(n);
            for bb in &boxes {
                let next = prefix.last().map_or(*bb, |prev| prev.union(bb));
                prefix.push(next);
            }
            let mut suffix: Vec<Aabb2D<T>> = Vec::with_capacity(n);
            for bb in boxes.iter().rev() {
                let next = suffix.last().map_or(*bb, |prev| prev.union(bb));
                suffix.push(next);
            }
            suffix.reverse();

            for k in min_children..=(n - min_children) {
                let lb = prefix[k - 1];
                let rb = suffix[k];
                let c = T::acc_add(
                    T::acc_mul(area(&lb), T::acc_from_usize(k)),
                    T::acc_mul(area(&rb), T::acc_from_usize(n - k)),
                );
                if best.as_ref().is_none_or(|(bc, _, _)| c < *bc) {
                    best = Some((c, v[..k].to_vec(), v[k..].to_vec()));
                }
            }
        }
        match best {
            Some((_, l, r)) => (l, r),
            // Only reachable for nodes too small to split; keep a single node.
            None => (children, Vec::new()),
        }
    }

    /// Split an overflowing node in place; returns the new right sibling.
    fn split_node(
        arena: &mut Vec<RNode<T>>,
        node_idx: usize,
        min_children: usize,
    ) -> Option<NodeIdx> {
        let children = core::mem::take(&mut arena[node_idx].children);
        let (left, right) = Self::split_children(arena, children, min_children);
        if right.is_empty() {
            arena[node_idx].children = left;
            return None;
        }
        let leaf = arena[node_idx].leaf;
        arena[node_idx].bbox = Self::node_bbox(arena, &left);
        arena[node_idx].children = left;
        Some(Self::push_node(arena, leaf, right))
    }

    fn insert_node(
        arena: &mut Vec<RNode<T>>,
        node_idx: usize,
        slot: usize,
        bbox: Aabb2D<T>,
        max_children: usize,
        min_children: usize,
    ) -> Option<NodeIdx> {
        if arena[node_idx].leaf {
            let node = &mut arena[node_idx];
            node.bbox = if node.children.is_empty() {
                bbox
            } else {
                node.bbox.union(&bbox)
            };
            node.children.push(RChild::Item { slot, bbox });
            if node.children.len() <= max_children {
                return None;
            }
            return Self::split_node(arena, node_idx, min_children);
        }

        let idx = Self::choose_child(arena, &arena[node_idx].children, &bbox);
        let split = match arena[node_idx].children[idx] {
            RChild::Node(child_idx) => Self::insert_node(
                arena,
                child_idx.get(),
                slot,
                bbox,
                max_children,
                min_children,
            ),
            RChild::Item { .. } => None,
        };
        arena[node_idx].bbox = arena[node_idx].bbox.union(&bbox);
        if let Some(right) = split {
            arena[node_idx].children.insert(idx + 1, RChild::Node(right));
            if arena[node_idx].children.len() > max_children {
                return Self::split_node(arena, node_idx, min_children);
            }
        }
        None
    }

    fn search_remove(arena: &mut Vec<RNode<T>>, node_idx: usize, slot: usize, old: &Aabb2D<T>) -> bool {
        if !arena[node_idx].bbox.touches(old) {
            return false;
        }
        let removed = if arena[node_idx].leaf {
            let before = arena[node_idx].children.len();
            arena[node_idx]
                .children
                .retain(|c| !matches!(c, RChild::Item { slot: s, .. } if *s == slot));
            arena[node_idx].children.len() != before
        } else {
            let child_nodes: Vec<NodeIdx> = arena[node_idx]
                .children
                .iter()
                .filter_map(|c| match c {
                    RChild::Node(i) => Some(*i),
                    RChild::Item { .. } => None,
                })
                .collect();
            let mut removed = false;
            for ci in child_nodes {
                if Self::search_remove(arena, ci.get(), slot, old) {
                    removed = true;
                    break;
                }
            }
            if removed {
                let children = core::mem::take(&mut arena[node_idx].children);
                arena[node_idx].children = children
                    .into_iter()
                    .filter(|c| match c {
                        RChild::Node(i) => !arena[i.get()].children.is_empty(),
                        RChild::Item { .. } => true,
                    })
                    .collect();
            }
            removed
        };
        if removed && !arena[node_idx].children.is_empty() {
            arena[node_idx].bbox = Self::node_bbox(arena, &arena[node_idx].children);
        }
        removed
    }

    /// Walk nodes overlapping `rect`, calling `visit` for each overlapping item slot.
    /// Stops early when `visit` returns `false`.
    fn walk(&self, rect: &Aabb2D<T>, mut visit: impl FnMut(usize) -> bool) {
        let Some(root_idx) = self.root else {
            return;
        };
        let mut stack = vec![root_idx];
        while let Some(i) = stack.pop() {
            let n = &self.arena[i.get()];
            if !n.bbox.overlaps(rect) {
                continue;
            }
            for c in &n.children {
                match c {
                    RChild::Node(ci) => stack.push(*ci),
                    RChild::Item { slot, bbox } => {
                        if bbox.overlaps(rect) && !visit(*slot) {
                            return;
                        }
                    }
                }
            }
        }
    }
}

/// Number of STR slices for `count` groups: the smallest `g` with `g * g >= count`.
fn slices_for(count: usize) -> usize {
    let mut g = 1_usize;
    while g * g < count {
        g += 1;
    }
    g
}

impl<T: Scalar> Backend<T> for RTree<T> {
    fn insert(&mut self, slot: usize, aabb: Aabb2D<T>) {
        self.ensure_slot(slot, aabb);
        let Some(root_idx) = self.root else {
            let root = Self::push_node(&mut self.arena, true, vec![RChild::Item { slot, bbox: aabb }]);
            self.root = Some(root);
            return;
        };
        let split = Self::insert_node(
            &mut self.arena,
            root_idx.get(),
            slot,
            aabb,
            self.max_children,
            self.min_children,
        );
        if let Some(right) = split {
            // Grow a new root over the old root and its new sibling.
            let root = Self::push_node(
                &mut self.arena,
                false,
                vec![RChild::Node(root_idx), RChild::Node(right)],
            );
            self.root = Some(root);
        }
    }

    fn remove(&mut self, slot: usize) {
        let Some(old) = self.slots.get_mut(slot).and_then(Option::take) else {
            return;
        };
        if let Some(root_idx) = self.root {
            let _ = Self::search_remove(&mut self.arena, root_idx.get(), slot, &old);
            if self.arena[root_idx.get()].children.is_empty() {
                self.root = None;
                self.arena.clear();
            }
        }
    }

    fn clear(&mut self) {
        self.root = None;
        self.arena.clear();
        self.slots.clear();
    }

    fn query_rect<'a>(&'a self, rect: Aabb2D<T>) -> Box<dyn Iterator<Item = usize> + 'a> {
        let mut out = Vec::new();
        self.walk(&rect, |slot| {
            out.push(slot);
            true
        });
        Box::new(out.into_iter())
    }

    fn any_overlap(&self, rect: Aabb2D<T>) -> bool {
        let mut hit = false;
        self.walk(&rect, |_| {
            hit = true;
            false
        });
        hit
    }
}

impl<T: Scalar> Debug for RTree<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RTree")
            .field("max_children", &self.max_children)
            .field("min_children", &self.min_children)
            .field("arena_nodes", &self.arena.len())
            .field("total_slots", &self.slots.len())
            .field("alive", &self.len())
            .field("has_root", &self.root.is_some())
            .finish_non_exhaustive()
    }
}

/// R-tree with i32 coordinates and i128 metrics.
pub type RTreeI32 = RTree<i32>;

/// R-tree with i64 coordinates and i128 metrics.
pub type RTreeI64 = RTree<i64>;
