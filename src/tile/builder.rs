//! Extraction, augmentation, deduplication, and adjacency computation.
//!
//! Mirrors `wfc__create_tiles_overlapping` in the reference C implementation,
//! written as a builder (`with_*` chain methods returning `Self`, as in
//! `grid-forge`'s `Resolver::with_subscriber`) ending in [`TileBuilder::build`].

use crate::direction::Direction;
use crate::error::BuildError;
use crate::image::{transform, Image};
use crate::rules::AdjacencyMatrix;

use super::Tile;

/// Augmentation flags accepted by [`TileBuilder`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildFlags {
    pub expand: bool,
    pub xflip: bool,
    pub yflip: bool,
    pub rotate: bool,
}

/// The deduplicated tiles plus their computed [`AdjacencyMatrix`].
#[derive(Debug, Clone)]
pub struct TileSet {
    tiles: Vec<Tile>,
    rules: AdjacencyMatrix,
    tile_width: usize,
    tile_height: usize,
}

impl TileSet {
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn rules(&self) -> &AdjacencyMatrix {
        &self.rules
    }

    pub fn tile_width(&self) -> usize {
        self.tile_width
    }

    pub fn tile_height(&self) -> usize {
        self.tile_height
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Cuts all `N x M` windows from an input image, augments, deduplicates with
/// frequency counting, and computes the adjacency matrix (spec.md §4.2).
#[derive(Debug, Clone, Copy)]
pub struct TileBuilder {
    tile_width: usize,
    tile_height: usize,
    flags: BuildFlags,
}

impl TileBuilder {
    pub fn new(tile_width: usize, tile_height: usize) -> Self {
        Self {
            tile_width,
            tile_height,
            flags: BuildFlags::default(),
        }
    }

    pub fn with_flags(mut self, flags: BuildFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_expand(mut self, expand: bool) -> Self {
        self.flags.expand = expand;
        self
    }

    pub fn with_xflip(mut self, xflip: bool) -> Self {
        self.flags.xflip = xflip;
        self
    }

    pub fn with_yflip(mut self, yflip: bool) -> Self {
        self.flags.yflip = yflip;
        self
    }

    pub fn with_rotate(mut self, rotate: bool) -> Self {
        self.flags.rotate = rotate;
        self
    }

    pub fn build(&self, input: &Image) -> Result<TileSet, BuildError> {
        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(BuildError::ZeroTileSize);
        }
        if !self.flags.expand && (self.tile_width > input.width() || self.tile_height > input.height()) {
            return Err(BuildError::TileLargerThanInput {
                tile_width: self.tile_width,
                tile_height: self.tile_height,
                input_width: input.width(),
                input_height: input.height(),
            });
        }

        let tiles = self.extract_windows(input);
        let tiles = self.augment(tiles);
        let tiles = dedup(tiles);

        let rules = AdjacencyMatrix::build(tiles.len(), |i, j, d| {
            transform::overlap_equals(tiles[i].image(), tiles[j].image(), d)
        });

        Ok(TileSet {
            tiles,
            rules,
            tile_width: self.tile_width,
            tile_height: self.tile_height,
        })
    }

    /// Step 1-2: optionally toroidally expand the input, then slide an
    /// `N x M` window across it.
    fn extract_windows(&self, input: &Image) -> Vec<Tile> {
        let (source, width_range, height_range) = if self.flags.expand {
            let expanded = transform::expand(input, self.tile_width - 1, self.tile_height - 1);
            (expanded, input.width(), input.height())
        } else {
            (
                input.clone(),
                input.width() - self.tile_width + 1,
                input.height() - self.tile_height + 1,
            )
        };

        let mut tiles = Vec::with_capacity(width_range * height_range);
        for y in 0..height_range {
            for x in 0..width_range {
                let window = transform::subrect(&source, x, y, self.tile_width, self.tile_height);
                tiles.push(Tile::new(window, 1));
            }
        }
        tiles
    }

    /// Steps 3-5: append horizontal flips, vertical flips (skipped when
    /// `xflip && rotate` already produce them through rotate180), then
    /// 90/180/270 rotations.
    fn augment(&self, tiles: Vec<Tile>) -> Vec<Tile> {
        let mut tiles = tiles;

        if self.flags.xflip {
            let flipped: Vec<Tile> = tiles
                .iter()
                .map(|t| Tile::new(transform::flip_h(t.image()), 1))
                .collect();
            tiles.extend(flipped);
        }

        if self.flags.yflip && !(self.flags.xflip && self.flags.rotate) {
            let flipped: Vec<Tile> = tiles
                .iter()
                .map(|t| Tile::new(transform::flip_v(t.image()), 1))
                .collect();
            tiles.extend(flipped);
        }

        if self.flags.rotate {
            let mut rotated = Vec::with_capacity(tiles.len() * 3);
            for t in &tiles {
                for k in 1..=3u32 {
                    rotated.push(Tile::new(transform::rotate90(t.image(), k), 1));
                }
            }
            tiles.extend(rotated);
        }

        tiles
    }
}

/// Step 6: scan linearly, keep the first occurrence of each distinct byte
/// pattern, and increment its `freq` for each later duplicate. The result is
/// the stable subsequence of first occurrences.
fn dedup(tiles: Vec<Tile>) -> Vec<Tile> {
    let mut unique: Vec<Tile> = Vec::new();
    for tile in tiles {
        if let Some(existing) = unique.iter_mut().find(|u| u.image() == tile.image()) {
            existing.freq += tile.freq;
        } else {
            unique.push(tile);
        }
    }
    unique
}

/// `allowed[d][i,j] = overlap_equals(tiles[i], tiles[j], d)`, exposed for
/// callers that already hold a tile list (e.g. tests) and don't need the
/// whole extraction pipeline.
pub fn build_rules(tiles: &[Tile]) -> AdjacencyMatrix {
    AdjacencyMatrix::build(tiles.len(), |i, j, d: Direction| {
        transform::overlap_equals(tiles[i].image(), tiles[j].image(), d)
    })
}

/// Assembles a [`TileSet`] from an already-built tile list and adjacency
/// matrix, bypassing extraction/augmentation/dedup. Used by other modules'
/// tests that need full control over the adjacency rules.
#[cfg(test)]
pub(crate) fn test_set(tiles: Vec<Tile>, rules: AdjacencyMatrix, tile_width: usize, tile_height: usize) -> TileSet {
    TileSet {
        tiles,
        rules,
        tile_width,
        tile_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Image;

    fn gray_tile(pixels: &[u8], w: usize, h: usize) -> Tile {
        Tile::new(Image::new(pixels.to_vec(), w, h, 1).unwrap(), 1)
    }

    #[test]
    fn dedup_counts_frequency_and_keeps_first_order() {
        // Four 2x2 tiles: A, A, B, B -> two survivors, each freq=2, in
        // first-occurrence order (spec.md §8 scenario 5).
        let a = gray_tile(&[1, 1, 1, 1], 2, 2);
        let b = gray_tile(&[2, 2, 2, 2], 2, 2);
        let tiles = vec![a.clone(), a.clone(), b.clone(), b.clone()];

        let result = dedup(tiles);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].image(), a.image());
        assert_eq!(result[0].freq(), 2);
        assert_eq!(result[1].image(), b.image());
        assert_eq!(result[1].freq(), 2);
    }

    #[test]
    fn single_window_when_tile_size_equals_input() {
        let input = Image::new(vec![1, 2, 3, 4], 2, 2, 1).unwrap();
        let set = TileBuilder::new(2, 2).build(&input).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.tiles()[0].freq(), 1);
    }

    #[test]
    fn expand_with_single_color_input_yields_one_tile() {
        let input = Image::new(vec![7; 16], 4, 4, 1).unwrap();
        let set = TileBuilder::new(2, 2).with_expand(true).build(&input).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.tiles()[0].freq() as usize, input.width() * input.height());
    }

    #[test]
    fn tile_larger_than_input_without_expand_is_an_error() {
        let input = Image::new(vec![0; 4], 2, 2, 1).unwrap();
        let err = TileBuilder::new(3, 3).build(&input).unwrap_err();
        assert!(matches!(err, BuildError::TileLargerThanInput { .. }));
    }

    #[test]
    fn xflip_and_rotate_skip_redundant_yflip() {
        // With xflip+yflip+rotate all set, yflip must not be appended
        // separately (spec.md §4.2 step 4): the multiplier is x2 (xflip)
        // then x4 (rotate) = x8, not x16.
        let input = Image::new((0..16u8).collect(), 4, 4, 1).unwrap();
        let builder = TileBuilder::new(2, 2)
            .with_xflip(true)
            .with_yflip(true)
            .with_rotate(true);
        let raw_windows = (4 - 2 + 1) * (4 - 2 + 1);

        let tiles = builder.extract_windows(&input);
        assert_eq!(tiles.len(), raw_windows);
        let augmented = builder.augment(tiles);
        assert_eq!(augmented.len(), raw_windows * 8);
    }

    #[test]
    fn yflip_alone_doubles_the_set() {
        let input = Image::new((0..16u8).collect(), 4, 4, 1).unwrap();
        let builder = TileBuilder::new(2, 2).with_yflip(true);
        let raw_windows = (4 - 2 + 1) * (4 - 2 + 1);

        let tiles = builder.extract_windows(&input);
        let augmented = builder.augment(tiles);
        assert_eq!(augmented.len(), raw_windows * 2);
    }

    #[test]
    fn sum_of_freqs_equals_pre_dedup_window_count() {
        let input = Image::new(vec![1, 1, 1, 1, 2, 2, 2, 2, 1, 1], 5, 2, 1).unwrap();
        let set = TileBuilder::new(2, 2).with_xflip(true).build(&input).unwrap();
        let raw_windows = (5 - 2 + 1) * (2 - 2 + 1) * 2; // x2 for xflip
        let total_freq: u32 = set.tiles().iter().map(Tile::freq).sum();
        assert_eq!(total_freq as usize, raw_windows);
    }

    #[test]
    fn adjacency_symmetry_holds_for_real_tiles() {
        let input = Image::new((0..25u8).map(|v| v % 5).collect(), 5, 5, 1).unwrap();
        let set = TileBuilder::new(2, 2).build(&input).unwrap();
        let rules = set.rules();
        for d in Direction::all() {
            for i in 0..set.len() {
                for j in 0..set.len() {
                    assert_eq!(
                        rules.is_allowed(*d, i, j),
                        rules.is_allowed(d.opposite(), j, i),
                        "direction {d:?}, i={i}, j={j}"
                    );
                }
            }
        }
    }
}
