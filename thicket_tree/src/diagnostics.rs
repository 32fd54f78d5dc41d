// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Invariant checks, tree-quality metrics, and offline maintenance.
//!
//! Everything here only reads the structure, except [`Tree::rebuild_bottom_up`]
//! and [`Tree::shift_origin`]. `validate` is assert-based and meant for tests
//! and debug builds, not production error handling.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::tree::{NULL, Tree};
use crate::types::{Aabb, Scalar, Vec2, perimeter, union_aabb};

impl<T: Scalar, P: Copy + Debug> Tree<T, P> {
    /// Recompute the tree height from scratch, ignoring cached heights.
    pub fn compute_height(&self) -> i32 {
        if self.root == NULL {
            0
        } else {
            self.compute_node_height(self.root)
        }
    }

    fn compute_node_height(&self, index: u32) -> i32 {
        let node = &self.nodes[index as usize];
        if node.is_leaf() {
            return 0;
        }
        let h1 = self.compute_node_height(node.child1);
        let h2 = self.compute_node_height(node.child2);
        1 + h1.max(h2)
    }

    /// Worst height difference between any internal node's children.
    pub fn max_balance(&self) -> i32 {
        let mut worst = 0;
        for node in &self.nodes {
            if node.height < 2 {
                continue;
            }
            let h1 = self.nodes[node.child1 as usize].height;
            let h2 = self.nodes[node.child2 as usize].height;
            worst = worst.max((h2 - h1).abs());
        }
        worst
    }

    /// Sum of all live node perimeters over the root perimeter, a measure of
    /// tree bloat. `None` when the tree is empty.
    pub fn area_ratio(&self) -> Option<T::Acc> {
        if self.root == NULL {
            return None;
        }
        let root_perimeter = perimeter(&self.nodes[self.root as usize].aabb);
        let mut total = T::widen(T::zero());
        for node in &self.nodes {
            if node.height < 0 {
                continue;
            }
            total = total + perimeter(&node.aabb);
        }
        Some(total / root_perimeter)
    }

    /// Assert every structural invariant: child/parent link consistency,
    /// cached heights, internal boxes as exact child unions, and free-list
    /// accounting. Panics on the first violation.
    pub fn validate(&self) {
        self.validate_structure(self.root);
        self.validate_metrics(self.root);

        if self.root != NULL {
            assert!(
                self.nodes[self.root as usize].parent_or_next == NULL,
                "root must have no parent"
            );
        }
        assert_eq!(
            self.height(),
            self.compute_height(),
            "cached root height out of date"
        );

        let mut free_count: u32 = 0;
        let mut index = self.free_list;
        while index != NULL {
            assert!(
                (index as usize) < self.nodes.len(),
                "free list points outside the arena"
            );
            assert!(
                self.nodes[index as usize].height == -1,
                "free-listed node not marked free"
            );
            free_count += 1;
            index = self.nodes[index as usize].parent_or_next;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "node indices are 32-bit by design"
        )]
        let capacity = self.nodes.len() as u32;
        assert_eq!(
            self.node_count + free_count,
            capacity,
            "live and free nodes must account for the whole arena"
        );
    }

    fn validate_structure(&self, index: u32) {
        if index == NULL {
            return;
        }
        let node = &self.nodes[index as usize];
        if node.is_leaf() {
            assert!(node.child2 == NULL, "leaf with a second child");
            assert_eq!(node.height, 0, "leaf height must be zero");
            assert!(node.user_data.is_some(), "leaf without user data");
            return;
        }
        assert!(node.user_data.is_none(), "internal node with user data");
        let child1 = node.child1;
        let child2 = node.child2;
        assert!(
            (child1 as usize) < self.nodes.len() && (child2 as usize) < self.nodes.len(),
            "child index outside the arena"
        );
        assert!(
            self.nodes[child1 as usize].parent_or_next == index,
            "first child's parent link broken"
        );
        assert!(
            self.nodes[child2 as usize].parent_or_next == index,
            "second child's parent link broken"
        );
        self.validate_structure(child1);
        self.validate_structure(child2);
    }

    fn validate_metrics(&self, index: u32) {
        if index == NULL {
            return;
        }
        let node = &self.nodes[index as usize];
        if node.is_leaf() {
            return;
        }
        let child1 = node.child1;
        let child2 = node.child2;
        let h1 = self.nodes[child1 as usize].height;
        let h2 = self.nodes[child2 as usize].height;
        assert_eq!(node.height, 1 + h1.max(h2), "cached height out of date");
        let expected = union_aabb(
            self.nodes[child1 as usize].aabb,
            self.nodes[child2 as usize].aabb,
        );
        assert!(
            node.aabb == expected,
            "internal box must be the exact union of its children"
        );
        self.validate_metrics(child1);
        self.validate_metrics(child2);
    }

    /// Discard all internal nodes and rebuild by greedily pairing the two
    /// subtrees whose combined perimeter is smallest. O(n²); meant for
    /// occasional offline optimization, not per-frame use. Leaves, their
    /// payloads, and their fat boxes are untouched.
    pub fn rebuild_bottom_up(&mut self) {
        let mut roots: Vec<u32> = Vec::with_capacity(self.node_count() as usize);
        for i in 0..self.nodes.len() {
            if self.nodes[i].height < 0 {
                continue;
            }
            #[allow(
                clippy::cast_possible_truncation,
                reason = "node indices are 32-bit by design"
            )]
            let index = i as u32;
            if self.nodes[i].is_leaf() {
                self.nodes[i].parent_or_next = NULL;
                roots.push(index);
            } else {
                self.free_node(index);
            }
        }

        while roots.len() > 1 {
            let mut best: Option<(T::Acc, usize, usize)> = None;
            for i in 0..roots.len() {
                let aabb_i = self.nodes[roots[i] as usize].aabb;
                for j in (i + 1)..roots.len() {
                    let aabb_j = self.nodes[roots[j] as usize].aabb;
                    let cost = perimeter(&union_aabb(aabb_i, aabb_j));
                    if best.as_ref().map(|(c, _, _)| cost < *c).unwrap_or(true) {
                        best = Some((cost, i, j));
                    }
                }
            }
            let (_, i, j) = best.expect("at least two subtrees remain");
            let child1 = roots[i];
            let child2 = roots[j];

            let aabb = union_aabb(
                self.nodes[child1 as usize].aabb,
                self.nodes[child2 as usize].aabb,
            );
            let height = 1 + self.nodes[child1 as usize]
                .height
                .max(self.nodes[child2 as usize].height);

            let parent = self.allocate_node();
            {
                let node = &mut self.nodes[parent as usize];
                node.child1 = child1;
                node.child2 = child2;
                node.aabb = aabb;
                node.height = height;
                node.parent_or_next = NULL;
            }
            self.nodes[child1 as usize].parent_or_next = parent;
            self.nodes[child2 as usize].parent_or_next = parent;

            let last = *roots.last().expect("loop guard keeps roots non-empty");
            roots[j] = last;
            let _ = roots.pop();
            roots[i] = parent;
        }

        self.root = roots.first().copied().unwrap_or(NULL);
    }

    /// Translate every stored box by `-offset`, re-centering the world
    /// around a new origin. Relative geometry is unchanged, so the structure
    /// stays valid.
    pub fn shift_origin(&mut self, offset: Vec2<T>) {
        for node in &mut self.nodes {
            if node.height < 0 {
                continue;
            }
            node.aabb.min_x = T::sub(node.aabb.min_x, offset.x);
            node.aabb.min_y = T::sub(node.aabb.min_y, offset.y);
            node.aabb.max_x = T::sub(node.aabb.max_x, offset.x);
            node.aabb.max_y = T::sub(node.aabb.max_y, offset.y);
        }
    }

    /// Walk the tree in pre-order, handing each live node's box, height, and
    /// leaf-ness to `visit`. The debug-draw hook: a renderer can draw each
    /// box, tinted by depth or leaf-ness, without knowing the structure.
    pub fn visit_nodes<F>(&self, mut visit: F)
    where
        F: FnMut(&Aabb<T>, i32, bool),
    {
        self.visit_rec(self.root, &mut visit);
    }

    fn visit_rec<F>(&self, index: u32, visit: &mut F)
    where
        F: FnMut(&Aabb<T>, i32, bool),
    {
        if index == NULL {
            return;
        }
        let node = &self.nodes[index as usize];
        visit(&node.aabb, node.height, node.is_leaf());
        if !node.is_leaf() {
            self.visit_rec(node.child1, visit);
            self.visit_rec(node.child2, visit);
        }
    }
}
