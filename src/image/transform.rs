//! Pure image transforms: copy, flips, rotations, toroidal expansion,
//! sub-rectangle extraction, and the equality/overlap tests that ground the
//! tile builder's adjacency rules.
//!
//! Every function takes one or more source images and returns a newly
//! allocated image; sources are left unchanged, mirroring the
//! `wfc__img_*` family in the reference implementation.

use super::Image;
use crate::direction::Direction;

/// Duplicates an image.
pub fn copy(a: &Image) -> Image {
    a.clone()
}

/// Mirrors `a` left-to-right: `flip_h(a).pixel(x, y) == a.pixel(w-1-x, y)`.
pub fn flip_h(a: &Image) -> Image {
    let mut out = Image::blank(a.width(), a.height(), a.component_cnt());
    for y in 0..a.height() {
        for x in 0..a.width() {
            out.set_pixel(x, y, a.pixel(a.width() - 1 - x, y));
        }
    }
    out
}

/// Mirrors `a` top-to-bottom.
pub fn flip_v(a: &Image) -> Image {
    let mut out = Image::blank(a.width(), a.height(), a.component_cnt());
    for y in 0..a.height() {
        for x in 0..a.width() {
            out.set_pixel(x, y, a.pixel(x, a.height() - 1 - y));
        }
    }
    out
}

/// Rotates `a` clockwise by `k * 90` degrees, `k` in `1..=3`.
///
/// For odd `k` the output is `height x width`; for even `k`, `width x height`.
pub fn rotate90(a: &Image, k: u32) -> Image {
    let k = k % 4;
    assert!(k != 0, "rotate90 expects k in 1..=3");

    let (out_w, out_h) = if k % 2 == 1 {
        (a.height(), a.width())
    } else {
        (a.width(), a.height())
    };
    let mut out = Image::blank(out_w, out_h, a.component_cnt());

    for y in 0..a.height() {
        for x in 0..a.width() {
            let (dx, dy) = match k {
                1 => (out.width() - y - 1, x),
                2 => (out.width() - x - 1, out.height() - y - 1),
                3 => (y, out.height() - x - 1),
                _ => unreachable!(),
            };
            out.set_pixel(dx, dy, a.pixel(x, y));
        }
    }
    out
}

/// Expands `a` to `(w+dx) x (h+dy)` by tiling it toroidally, so an N×N tile
/// window can later span the original seam.
pub fn expand(a: &Image, dx: usize, dy: usize) -> Image {
    let out_w = a.width() + dx;
    let out_h = a.height() + dy;
    let mut out = Image::blank(out_w, out_h, a.component_cnt());
    for y in 0..out_h {
        for x in 0..out_w {
            out.set_pixel(x, y, a.pixel(x % a.width(), y % a.height()));
        }
    }
    out
}

/// Extracts the `w x h` sub-rectangle of `a` starting at `(x, y)`.
///
/// Panics if the rectangle does not fit, the same precondition the builder
/// upholds by construction (spec.md §4.1).
pub fn subrect(a: &Image, x: usize, y: usize, w: usize, h: usize) -> Image {
    assert!(x + w <= a.width() && y + h <= a.height());
    let mut out = Image::blank(w, h, a.component_cnt());
    for row in 0..h {
        for col in 0..w {
            out.set_pixel(col, row, a.pixel(x + col, y + row));
        }
    }
    out
}

/// `true` iff `a` and `b` have the same dimensions, component count, and
/// identical bytes.
pub fn equals(a: &Image, b: &Image) -> bool {
    a.width() == b.width() && a.height() == b.height() && a.component_cnt() == b.component_cnt() && a.data() == b.data()
}

/// `true` iff the `(N-1)`-wide strip shared when `a` and `b` are placed with
/// unit offset in direction `d` (`b` lies `d`-ward of `a`) matches
/// pixel-for-pixel.
///
/// Both images must be the same size (the tile size); `a` and `b` may be the
/// same tile — self-compatibility is computed, not assumed (spec.md §9).
pub fn overlap_equals(a: &Image, b: &Image, d: Direction) -> bool {
    debug_assert_eq!(a.width(), b.width());
    debug_assert_eq!(a.height(), b.height());
    debug_assert_eq!(a.component_cnt(), b.component_cnt());

    let w = a.width();
    let h = a.height();

    let (a_off, b_off, strip_w, strip_h) = match d {
        Direction::Up => ((0, 0), (0, 1), w, h - 1),
        Direction::Down => ((0, 1), (0, 0), w, h - 1),
        Direction::Left => ((0, 0), (1, 0), w - 1, h),
        Direction::Right => ((1, 0), (0, 0), w - 1, h),
    };

    for row in 0..strip_h {
        for col in 0..strip_w {
            if a.pixel(a_off.0 + col, a_off.1 + row) != b.pixel(b_off.0 + col, b_off.1 + row) {
                return false;
            }
        }
    }
    true
}
