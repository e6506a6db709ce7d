//! Tiles: the N×N patches cut from the input image.

mod builder;

pub use builder::{BuildFlags, TileBuilder, TileSet};
#[cfg(test)]
pub(crate) use builder::test_set;

use crate::image::Image;

/// One distinct N×N patch extracted from the (possibly augmented) input.
///
/// `freq` counts how many augmented source windows mapped to this tile after
/// deduplication (spec.md §3); all tiles in a [`TileSet`] share the same
/// `(N, component_cnt)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    image: Image,
    freq: u32,
}

impl Tile {
    pub(crate) fn new(image: Image, freq: u32) -> Self {
        Self { image, freq }
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn freq(&self) -> u32 {
        self.freq
    }
}
