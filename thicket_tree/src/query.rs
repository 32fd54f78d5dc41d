// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only traversals: rectangle overlap queries and segment ray casts.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::ControlFlow;

use crate::tree::{NULL, ProxyId, Tree};
use crate::types::{Aabb, Scalar, Vec2, max_t, min_t};

/// Initial capacity of the traversal stack; grows if the tree is deeper.
const STACK_DEPTH: usize = 64;

/// A directed segment with a fraction bound, as handed to ray-cast callbacks.
///
/// The segment runs from `p1` toward `p2`; only the prefix up to
/// `max_fraction` (0 at `p1`, 1 at `p2`) is searched.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayCastInput<T> {
    /// Segment start.
    pub p1: Vec2<T>,
    /// Segment end.
    pub p2: Vec2<T>,
    /// Upper bound on the searched fraction of `p1 → p2`.
    pub max_fraction: T,
}

/// Verdict returned by a ray-cast callback for one candidate leaf.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CastOutcome<T> {
    /// The object fully blocks the ray: terminate the cast now.
    Halt,
    /// A closer hit at this fraction: clip the searched segment and continue.
    Clip(T),
    /// Not a real hit: continue with the current fraction.
    Miss,
}

impl<T: Scalar, P: Copy + Debug> Tree<T, P> {
    /// Visit every leaf whose fat box overlaps `aabb`.
    ///
    /// Leaves are reported in traversal order, which is not a contract.
    /// Returning [`ControlFlow::Break`] from the callback terminates the
    /// whole traversal immediately.
    pub fn query<F>(&self, aabb: &Aabb<T>, mut callback: F)
    where
        F: FnMut(ProxyId) -> ControlFlow<()>,
    {
        let mut stack: Vec<u32> = Vec::with_capacity(STACK_DEPTH);
        stack.push(self.root);
        while let Some(index) = stack.pop() {
            if index == NULL {
                continue;
            }
            let node = &self.nodes[index as usize];
            if !node.aabb.overlaps(aabb) {
                continue;
            }
            if node.is_leaf() {
                if callback(ProxyId(index)).is_break() {
                    return;
                }
            } else {
                stack.push(node.child1);
                stack.push(node.child2);
            }
        }
    }

    /// Collect every overlapping proxy with its payload.
    ///
    /// Convenience over [`Tree::query`] for callers that want the whole set.
    pub fn overlaps(&self, aabb: &Aabb<T>) -> Vec<(ProxyId, P)> {
        let mut out = Vec::new();
        self.query(aabb, |id| {
            out.push((id, self.user_data(id)));
            ControlFlow::Continue(())
        });
        out
    }

    /// Cast a segment through the tree, visiting candidate leaves.
    ///
    /// The callback receives the current (possibly already clipped) segment
    /// and the candidate proxy, and steers the cast through its
    /// [`CastOutcome`]: `Halt` ends the cast, `Clip(f)` shrinks the searched
    /// segment to the fraction `f`, `Miss` leaves it unchanged. Candidates
    /// are pruned with the segment's shrinking bounding box and a
    /// separating-axis test against the segment's carrier line; visitation
    /// order is a traversal artifact, so callbacks must judge hits by the
    /// fractions they compute, not by arrival order.
    pub fn ray_cast<F>(&self, input: &RayCastInput<T>, mut callback: F)
    where
        F: FnMut(&RayCastInput<T>, ProxyId) -> CastOutcome<T>,
    {
        let p1 = input.p1;
        let p2 = input.p2;
        let rx = T::sub(p2.x, p1.x);
        let ry = T::sub(p2.y, p1.y);
        // Perpendicular to the segment; a sign test needs no normalization.
        let vx = T::sub(T::zero(), ry);
        let vy = rx;
        let abs_vx = T::abs(vx);
        let abs_vy = T::abs(vy);

        let mut max_fraction = input.max_fraction;
        let mut seg_box = segment_box(p1, p2, max_fraction);

        let mut stack: Vec<u32> = Vec::with_capacity(STACK_DEPTH);
        stack.push(self.root);
        while let Some(index) = stack.pop() {
            if index == NULL {
                continue;
            }
            let node = &self.nodes[index as usize];
            if !node.aabb.overlaps(&seg_box) {
                continue;
            }

            // Separating axis between the carrier line and the box:
            // |dot(v, p1 - c)| - dot(|v|, h) > 0 means the line misses it.
            let c = node.aabb.center();
            let h = node.aabb.half_extents();
            let reach = T::add(
                T::mul(vx, T::sub(p1.x, c.x)),
                T::mul(vy, T::sub(p1.y, c.y)),
            );
            let span = T::add(T::mul(abs_vx, h.x), T::mul(abs_vy, h.y));
            if T::sub(T::abs(reach), span) > T::zero() {
                continue;
            }

            if node.is_leaf() {
                let sub_input = RayCastInput {
                    p1,
                    p2,
                    max_fraction,
                };
                match callback(&sub_input, ProxyId(index)) {
                    CastOutcome::Halt => return,
                    CastOutcome::Clip(fraction) => {
                        max_fraction = fraction;
                        seg_box = segment_box(p1, p2, max_fraction);
                    }
                    CastOutcome::Miss => {}
                }
            } else {
                stack.push(node.child1);
                stack.push(node.child2);
            }
        }
    }
}

/// Bounding box of the segment prefix `p1 → p1 + fraction * (p2 - p1)`.
fn segment_box<T: Scalar>(p1: Vec2<T>, p2: Vec2<T>, fraction: T) -> Aabb<T> {
    let tx = T::add(p1.x, T::mul(fraction, T::sub(p2.x, p1.x)));
    let ty = T::add(p1.y, T::mul(fraction, T::sub(p2.y, p1.y)));
    Aabb::new(
        min_t(p1.x, tx),
        min_t(p1.y, ty),
        max_t(p1.x, tx),
        max_t(p1.y, ty),
    )
}
