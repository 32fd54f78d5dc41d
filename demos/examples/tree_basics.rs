// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree basics.
//!
//! Create a few proxies from Kurbo rects, query a region, move a proxy, and
//! query again.
//!
//! Run:
//! - `cargo run -p thicket_demos --example tree_basics`

use kurbo::Rect;
use thicket_tree::{Aabb, TreeF64, Vec2};

fn rect_to_aabb(r: Rect) -> Aabb<f64> {
    Aabb::new(r.x0, r.y0, r.x1, r.y1)
}

fn main() {
    let mut tree: TreeF64<&str> = TreeF64::new();

    let ball = tree.create_proxy(rect_to_aabb(Rect::new(0.0, 0.0, 1.0, 1.0)), "ball");
    let _crate_box = tree.create_proxy(rect_to_aabb(Rect::new(10.0, 0.0, 11.0, 1.0)), "crate");
    let _bush = tree.create_proxy(rect_to_aabb(Rect::new(0.5, 0.5, 1.5, 1.5)), "bush");

    // What might touch the lower-left region?
    let region = rect_to_aabb(Rect::new(0.0, 0.0, 2.0, 2.0));
    let names: Vec<&str> = tree.overlaps(&region).iter().map(|(_, n)| *n).collect();
    println!("overlapping {region:?}: {names:?}");

    // Nudge the ball: still inside its fat box, the tree is untouched.
    let nudged = tree.move_proxy(
        ball,
        rect_to_aabb(Rect::new(0.05, 0.0, 1.05, 1.0)),
        Vec2::new(0.05, 0.0),
    );
    println!("nudge reinserted: {nudged}");

    // Kick it across the field: reinsertion, biased toward the motion.
    let kicked = tree.move_proxy(
        ball,
        rect_to_aabb(Rect::new(20.0, 0.0, 21.0, 1.0)),
        Vec2::new(20.0, 0.0),
    );
    println!("kick reinserted: {kicked}");
    println!("ball fat box now: {:?}", tree.fat_aabb(ball));

    let names: Vec<&str> = tree.overlaps(&region).iter().map(|(_, n)| *n).collect();
    println!("overlapping {region:?} after the kick: {names:?}");

    tree.validate();
    println!(
        "tree: height {}, {} nodes, area ratio {:?}",
        tree.height(),
        tree.node_count(),
        tree.area_ratio()
    );
}
