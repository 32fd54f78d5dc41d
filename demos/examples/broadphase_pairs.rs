// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Broad-phase pairs.
//!
//! Step a handful of moving objects for a few frames, printing the fresh
//! overlap pairs each frame, then dump the tree's boxes as Kurbo rects the
//! way a debug-draw overlay would.
//!
//! Run:
//! - `cargo run -p thicket_demos --example broadphase_pairs`

use kurbo::Rect;
use thicket_broadphase::BroadPhase;
use thicket_tree::{Aabb, Vec2};

fn main() {
    let mut bp: BroadPhase<f64, char> = BroadPhase::new();

    // Two movers on a collision course, one bystander.
    let mut a_x = 0.0;
    let mut b_x = 30.0;
    let a = bp.create_proxy(Aabb::<f64>::from_xywh(a_x, 0.0, 2.0, 2.0), 'a');
    let b = bp.create_proxy(Aabb::<f64>::from_xywh(b_x, 0.0, 2.0, 2.0), 'b');
    let _c = bp.create_proxy(Aabb::<f64>::from_xywh(15.0, 20.0, 2.0, 2.0), 'c');

    for frame in 0..6 {
        a_x += 3.0;
        b_x -= 3.0;
        let _ = bp.move_proxy(a, Aabb::<f64>::from_xywh(a_x, 0.0, 2.0, 2.0), Vec2::new(3.0, 0.0));
        let _ = bp.move_proxy(b, Aabb::<f64>::from_xywh(b_x, 0.0, 2.0, 2.0), Vec2::new(-3.0, 0.0));

        let mut pairs = Vec::new();
        bp.update_pairs(|x, y| pairs.push((x, y)));
        let named: Vec<(char, char)> = pairs
            .iter()
            .map(|&(x, y)| (bp.user_data(x), bp.user_data(y)))
            .collect();
        println!("frame {frame}: movers at x = {a_x:.0} and {b_x:.0}, new pairs {named:?}");
    }

    // Debug-draw walk: every live node box as a Kurbo rect.
    println!("tree boxes:");
    bp.tree().visit_nodes(|aabb, height, is_leaf| {
        let rect = Rect::new(aabb.min_x, aabb.min_y, aabb.max_x, aabb.max_y);
        let kind = if is_leaf { "leaf" } else { "node" };
        println!("  {kind} h{height}: {rect:?}");
    });
}
