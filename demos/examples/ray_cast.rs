// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ray casting.
//!
//! Cast a segment through a field of boxes and report the closest hit by
//! clipping the searched fraction at every candidate.
//!
//! Run:
//! - `cargo run -p thicket_demos --example ray_cast`

use thicket_tree::{Aabb, CastOutcome, ProxyId, RayCastInput, TreeF64, Vec2};

/// Fraction at which the segment enters `aabb`, if it does within the
/// input's bound. Plain slab clipping.
fn enter_fraction(input: &RayCastInput<f64>, aabb: &Aabb<f64>) -> Option<f64> {
    let dx = input.p2.x - input.p1.x;
    let dy = input.p2.y - input.p1.y;
    let mut t0: f64 = 0.0;
    let mut t1 = input.max_fraction;
    for (p, d, lo, hi) in [
        (input.p1.x, dx, aabb.min_x, aabb.max_x),
        (input.p1.y, dy, aabb.min_y, aabb.max_y),
    ] {
        if d == 0.0 {
            if p < lo || p > hi {
                return None;
            }
            continue;
        }
        let (mut ta, mut tb) = ((lo - p) / d, (hi - p) / d);
        if ta > tb {
            std::mem::swap(&mut ta, &mut tb);
        }
        t0 = t0.max(ta);
        t1 = t1.min(tb);
        if t0 > t1 {
            return None;
        }
    }
    Some(t0)
}

fn main() {
    let mut tree: TreeF64<&str> = TreeF64::new();
    let _ = tree.create_proxy(Aabb::new(3.0, -1.0, 4.0, 1.0), "near wall");
    let _ = tree.create_proxy(Aabb::new(8.0, -2.0, 9.0, 2.0), "far wall");
    let _ = tree.create_proxy(Aabb::new(5.0, 4.0, 6.0, 6.0), "off to the side");

    let input = RayCastInput {
        p1: Vec2::new(0.0, 0.0),
        p2: Vec2::new(12.0, 0.0),
        max_fraction: 1.0,
    };

    let mut closest: Option<(ProxyId, f64)> = None;
    tree.ray_cast(&input, |sub, id| {
        println!(
            "candidate {:?} ({}), searching up to fraction {:.3}",
            id,
            tree.user_data(id),
            sub.max_fraction
        );
        match enter_fraction(sub, &tree.fat_aabb(id)) {
            Some(t) => {
                closest = Some((id, t));
                CastOutcome::Clip(t)
            }
            None => CastOutcome::Miss,
        }
    });

    match closest {
        Some((id, t)) => {
            let x = input.p1.x + t * (input.p2.x - input.p1.x);
            println!("closest hit: {} at fraction {t:.3} (x = {x:.2})", tree.user_data(id));
        }
        None => println!("nothing on the ray"),
    }
}
