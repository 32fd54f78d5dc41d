// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=thicket_tree --heading-base-level=0

//! Thicket Tree: a dynamic AABB tree broad-phase for 2D collision systems.
//!
//! Thicket Tree answers "which objects' bounds overlap this box?" and "what
//! does this ray hit first?" over a dynamic set of moving objects, far faster
//! than pairwise testing, while tolerating small per-frame motion without
//! restructuring.
//!
//! - Create, move, and destroy *proxies*: leaves carrying an opaque payload
//!   and a *fat* AABB (tight bounds plus a margin, biased toward predicted
//!   motion) that absorbs small displacements.
//! - Query by rectangle with callback-driven early exit, or cast a segment
//!   with caller-controlled clipping of the searched fraction.
//! - Inspect and maintain the structure: [`Tree::validate`],
//!   [`Tree::max_balance`], [`Tree::area_ratio`],
//!   [`Tree::rebuild_bottom_up`], [`Tree::shift_origin`], and a debug-draw
//!   walk via [`Tree::visit_nodes`].
//!
//! Internally the tree is an arena of fixed-size nodes addressed by `u32`
//! indices, with the free list threaded through the parent field. Insertion
//! descends by a perimeter cost heuristic (cheaper than area in 2D and as
//! effective); every update rebalances the ancestor path with single
//! AVL-style rotations, so query depth stays logarithmic under churn.
//!
//! It is generic over the float scalar `T` ([`Scalar`]: `f32` or `f64`, with
//! widened accumulators for cost metrics) and the payload `P`, and does not
//! depend on any geometry crate. Higher layers own narrow-phase testing; the
//! tree only promises conservative candidate sets over fat boxes.
//!
//! # Example
//!
//! ```rust
//! use thicket_tree::{Aabb, TreeF64, Vec2};
//!
//! let mut tree: TreeF64<&str> = TreeF64::new();
//! let ball = tree.create_proxy(Aabb::new(0.0, 0.0, 1.0, 1.0), "ball");
//! let _wall = tree.create_proxy(Aabb::new(8.0, 0.0, 9.0, 4.0), "wall");
//!
//! // Broad-phase question: what might touch this region?
//! let hits = tree.overlaps(&Aabb::new(0.0, 0.0, 2.0, 2.0));
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].1, "ball");
//!
//! // Small motion stays inside the fat box: no structural change.
//! let nudged = tree.move_proxy(ball, Aabb::new(0.05, 0.0, 1.05, 1.0), Vec2::new(0.05, 0.0));
//! assert!(!nudged);
//!
//! // A long hop forces reinsertion, biased toward the motion.
//! let hopped = tree.move_proxy(ball, Aabb::new(6.0, 0.0, 7.0, 1.0), Vec2::new(6.0, 0.0));
//! assert!(hopped);
//! ```
//!
//! Ray casts hand each candidate to the callback together with the current
//! clipped segment; the callback's [`CastOutcome`] steers the cast:
//!
//! ```rust
//! use thicket_tree::{Aabb, CastOutcome, RayCastInput, TreeF64, Vec2};
//!
//! let mut tree: TreeF64<u32> = TreeF64::new();
//! let wall = tree.create_proxy(Aabb::new(5.0, -1.0, 6.0, 1.0), 7);
//!
//! let input = RayCastInput {
//!     p1: Vec2::new(0.0, 0.0),
//!     p2: Vec2::new(10.0, 0.0),
//!     max_fraction: 1.0,
//! };
//! let mut first_hit = None;
//! tree.ray_cast(&input, |_, id| {
//!     first_hit = Some(id);
//!     CastOutcome::Halt
//! });
//! assert_eq!(first_hit, Some(wall));
//! ```
//!
//! ## Contract notes
//!
//! - The tree must not be mutated from inside a query or ray-cast callback;
//!   both take `&self`, so the borrow checker enforces this.
//! - Proxy ids are slot indices and may be reused after `destroy_proxy`;
//!   accessors panic on stale ids and [`Tree::is_live`] probes safely.
//! - Visitation order inside traversals is an artifact, not a contract.
//!
//! ### Float semantics
//!
//! This crate assumes no NaNs in coordinates. Cost comparisons use widened
//! accumulators (f32→f64) to reduce precision pitfalls.

#![no_std]

extern crate alloc;

mod diagnostics;
pub mod query;
pub mod tree;
pub mod types;

pub use query::{CastOutcome, RayCastInput};
pub use tree::{ProxyId, Tree, TreeConfig, TreeF32, TreeF64};
pub use types::{Aabb, Scalar, Vec2};
