//! Convenience combinators on top of the core constructors.

use glam::{DVec2, dvec2};

use crate::node::{Node, empty, group, square, translate};

/// Translate the subtree up (negative y in the board frame).
pub fn up(v: f64) -> Node {
    translate(dvec2(0.0, -v))
}

/// Translate the subtree down.
pub fn down(v: f64) -> Node {
    translate(dvec2(0.0, v))
}

/// Translate the subtree left.
pub fn left(v: f64) -> Node {
    translate(dvec2(-v, 0.0))
}

/// Translate the subtree right.
pub fn right(v: f64) -> Node {
    translate(dvec2(v, 0.0))
}

/// A rectangle of `size` with corner radius `r`.
///
/// Degenerate radii collapse: `r == 0` is a plain rectangle and `2r ==
/// min(size)` a fully-rounded one. Otherwise the result is an anonymous
/// group over a center rectangle plus four edge capsules; the group makes
/// all five primitives share one pad designator, so the whole thing renders
/// as a single logical pad.
///
/// # Panics
///
/// Panics when `2r` exceeds the shorter side.
pub fn rounded_square(size: DVec2, r: f64, center: bool) -> Node {
    if r == 0.0 {
        return square(size, center, false);
    }
    let short = size.x.min(size.y);
    if r * 2.0 == short {
        return square(size, center, true);
    }
    assert!(
        r * 2.0 < short,
        "corner radius {r} too large for a {size} rectangle"
    );

    let o = if center { DVec2::ZERO } else { size / 2.0 };
    group(None)
        & translate(o)
        & (square(size - DVec2::splat(r * 2.0), true, false)
            | left(size.x / 2.0 - r) & square(dvec2(r * 2.0, size.y), true, true)
            | right(size.x / 2.0 - r) & square(dvec2(r * 2.0, size.y), true, true)
            | up(size.y / 2.0 - r) & square(dvec2(size.x, r * 2.0), true, true)
            | down(size.y / 2.0 - r) & square(dvec2(size.x, r * 2.0), true, true))
}

/// `n` copies of `node` spaced `pitch` apart along x, optionally recentered
/// on the origin. Copies share name counters, so a row of pads numbers
/// itself in order.
pub fn row(node: &Node, pitch: f64, n: usize, center: bool) -> Node {
    let mut result = empty();
    for i in 0..n {
        result = result | (right(i as f64 * pitch) & node.clone());
    }
    if center {
        left(pitch * (n as f64 - 1.0) / 2.0) & result
    } else {
        result
    }
}
