// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=thicket_broadphase --heading-base-level=0

//! Thicket Broadphase: pair management over the dynamic AABB tree.
//!
//! A physics step wants one thing from its broad phase each frame: the set of
//! proxy pairs whose fat boxes started overlapping since the last frame, with
//! no duplicates and no self-pairs. This crate layers that bookkeeping over
//! [`thicket_tree::Tree`]:
//!
//! - Proxy lifecycle calls delegate to the tree and record which proxies
//!   moved (a *move buffer*).
//! - [`BroadPhase::update_pairs`] queries the tree once per buffered proxy,
//!   orients each candidate pair deterministically, deduplicates, and hands
//!   the result to the caller.
//! - [`BroadPhase::touch_proxy`] forces pair regeneration for a proxy that
//!   did not move (a body waking up, a filter change upstream).
//!
//! Rectangle queries and ray casts pass straight through to the tree.
//!
//! # Example
//!
//! ```rust
//! use thicket_broadphase::BroadPhase;
//! use thicket_tree::{Aabb, Vec2};
//!
//! let mut bp: BroadPhase<f64, u32> = BroadPhase::new();
//! let a = bp.create_proxy(Aabb::new(0.0, 0.0, 1.0, 1.0), 1);
//! let b = bp.create_proxy(Aabb::new(5.0, 0.0, 6.0, 1.0), 2);
//!
//! let mut pairs = Vec::new();
//! bp.update_pairs(|x, y| pairs.push((x, y)));
//! assert!(pairs.is_empty(), "nothing overlaps yet");
//!
//! // Slide b onto a and ask again.
//! let moved = bp.move_proxy(b, Aabb::new(0.5, 0.0, 1.5, 1.0), Vec2::new(-4.5, 0.0));
//! assert!(moved);
//! bp.update_pairs(|x, y| pairs.push((x, y)));
//! assert_eq!(pairs, vec![(a, b)]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::ControlFlow;

use thicket_tree::{Aabb, CastOutcome, ProxyId, RayCastInput, Scalar, Tree, TreeConfig, Vec2};

/// Broad-phase collision interface: a dynamic AABB tree plus the move
/// buffering needed to enumerate fresh overlap pairs each frame.
pub struct BroadPhase<T: Scalar, P: Copy + Debug> {
    tree: Tree<T, P>,
    move_buffer: Vec<ProxyId>,
    proxy_count: u32,
}

impl<T: Scalar, P: Copy + Debug> Debug for BroadPhase<T, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BroadPhase")
            .field("proxies", &self.proxy_count)
            .field("pending_moves", &self.move_buffer.len())
            .field("tree", &self.tree)
            .finish_non_exhaustive()
    }
}

impl<T: Scalar, P: Copy + Debug> Default for BroadPhase<T, P>
where
    TreeConfig<T>: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar, P: Copy + Debug> BroadPhase<T, P>
where
    TreeConfig<T>: Default,
{
    /// Create an empty broad phase with default tree tuning.
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }
}

impl<T: Scalar, P: Copy + Debug> BroadPhase<T, P> {
    /// Create an empty broad phase with explicit tree tuning.
    pub fn with_config(config: TreeConfig<T>) -> Self {
        Self {
            tree: Tree::with_config(config),
            move_buffer: Vec::new(),
            proxy_count: 0,
        }
    }

    /// Create a proxy and schedule it for pair enumeration.
    pub fn create_proxy(&mut self, aabb: Aabb<T>, user_data: P) -> ProxyId {
        let id = self.tree.create_proxy(aabb, user_data);
        self.proxy_count += 1;
        self.move_buffer.push(id);
        id
    }

    /// Destroy a proxy. Any buffered move for it is dropped.
    pub fn destroy_proxy(&mut self, proxy: ProxyId) {
        self.move_buffer.retain(|&id| id != proxy);
        self.proxy_count -= 1;
        self.tree.destroy_proxy(proxy);
    }

    /// Update a proxy's bounds; schedules pair enumeration if the tree
    /// actually reinserted it. Returns whether it did.
    pub fn move_proxy(&mut self, proxy: ProxyId, aabb: Aabb<T>, displacement: Vec2<T>) -> bool {
        let reinserted = self.tree.move_proxy(proxy, aabb, displacement);
        if reinserted {
            self.move_buffer.push(proxy);
        }
        reinserted
    }

    /// Schedule pair enumeration for a proxy that did not move.
    pub fn touch_proxy(&mut self, proxy: ProxyId) {
        assert!(self.tree.is_live(proxy), "cannot touch a stale proxy");
        self.move_buffer.push(proxy);
    }

    /// Whether the two proxies' fat boxes overlap right now.
    pub fn test_overlap(&self, a: ProxyId, b: ProxyId) -> bool {
        self.tree.fat_aabb(a).overlaps(&self.tree.fat_aabb(b))
    }

    /// Number of live proxies.
    pub fn proxy_count(&self) -> u32 {
        self.proxy_count
    }

    /// The proxy's fat (stored) box.
    pub fn fat_aabb(&self, proxy: ProxyId) -> Aabb<T> {
        self.tree.fat_aabb(proxy)
    }

    /// The payload supplied at proxy creation.
    pub fn user_data(&self, proxy: ProxyId) -> P {
        self.tree.user_data(proxy)
    }

    /// Whether `proxy` names a live proxy.
    pub fn is_live(&self, proxy: ProxyId) -> bool {
        self.tree.is_live(proxy)
    }

    /// Enumerate every fresh overlap pair involving a buffered proxy, then
    /// clear the buffer.
    ///
    /// Pairs are emitted lower id first, sorted, without duplicates or
    /// self-pairs. A pair whose ends both moved is enumerated once, owned by
    /// the lower id.
    pub fn update_pairs<F>(&mut self, mut emit: F)
    where
        F: FnMut(ProxyId, ProxyId),
    {
        let mut pairs: Vec<(ProxyId, ProxyId)> = Vec::new();
        let tree = &self.tree;
        for &query_id in &self.move_buffer {
            let fat = tree.fat_aabb(query_id);
            tree.query(&fat, |other| {
                if other == query_id {
                    return ControlFlow::Continue(());
                }
                // Both ends moved: the lower id owns the pair, the higher
                // end's own enumeration skips it.
                if tree.was_moved(other) && other > query_id {
                    return ControlFlow::Continue(());
                }
                let pair = if other < query_id {
                    (other, query_id)
                } else {
                    (query_id, other)
                };
                pairs.push(pair);
                ControlFlow::Continue(())
            });
        }

        pairs.sort_unstable();
        pairs.dedup();
        for &(a, b) in &pairs {
            emit(a, b);
        }

        for k in 0..self.move_buffer.len() {
            let id = self.move_buffer[k];
            self.tree.clear_moved(id);
        }
        self.move_buffer.clear();
    }

    /// Visit every proxy whose fat box overlaps `aabb`. See
    /// [`thicket_tree::Tree::query`].
    pub fn query<F>(&self, aabb: &Aabb<T>, callback: F)
    where
        F: FnMut(ProxyId) -> ControlFlow<()>,
    {
        self.tree.query(aabb, callback);
    }

    /// Cast a segment through the proxies. See
    /// [`thicket_tree::Tree::ray_cast`].
    pub fn ray_cast<F>(&self, input: &RayCastInput<T>, callback: F)
    where
        F: FnMut(&RayCastInput<T>, ProxyId) -> CastOutcome<T>,
    {
        self.tree.ray_cast(input, callback);
    }

    /// Read access to the underlying tree, for diagnostics and maintenance.
    pub fn tree(&self) -> &Tree<T, P> {
        &self.tree
    }
}
