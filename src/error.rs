//! Error types for engine construction and collapse runs.
//!
//! Mirrors the two-error-type split in `grid-forge`'s collapse module: a
//! construction-time error for bad inputs, and a run-time error reported
//! by `Engine::run` without tearing the engine down.

use std::error::Error;
use std::fmt::{self, Display};

/// Error returned by [`crate::Engine::new`] when the requested engine cannot
/// be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Output width or height is zero.
    ZeroOutputSize,
    /// Tile width or height is zero.
    ZeroTileSize,
    /// The tile is larger than the input image and `expand_input` was not
    /// set, so not even one window can be cut.
    TileLargerThanInput {
        tile_width: usize,
        tile_height: usize,
        input_width: usize,
        input_height: usize,
    },
    /// The input image's byte buffer length does not match
    /// `width * height * component_cnt`.
    MalformedImage,
}

impl Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::ZeroOutputSize => write!(f, "output width and height must both be at least 1"),
            BuildError::ZeroTileSize => write!(f, "tile width and height must both be at least 1"),
            BuildError::TileLargerThanInput {
                tile_width,
                tile_height,
                input_width,
                input_height,
            } => write!(
                f,
                "tile size {tile_width}x{tile_height} does not fit in input image {input_width}x{input_height} without expand_input"
            ),
            BuildError::MalformedImage => write!(
                f,
                "image byte buffer length does not match width * height * component_cnt"
            ),
        }
    }
}

impl Error for BuildError {}

/// Error reported by [`crate::Engine::run`] when propagation or collapse
/// reduces some cell to zero possibilities.
///
/// Per spec.md §7, the wave is left in an undefined state after this error;
/// the caller must call `Engine::init` before running again. This is never
/// retried internally — no backtracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollapseError {
    cell_idx: usize,
    kind: CollapseErrorKind,
    iter: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CollapseErrorKind {
    Init,
    Propagation,
}

impl CollapseError {
    pub(crate) fn init(cell_idx: usize, iter: u32) -> Self {
        Self {
            cell_idx,
            kind: CollapseErrorKind::Init,
            iter,
        }
    }

    pub(crate) fn propagation(cell_idx: usize, iter: u32) -> Self {
        Self {
            cell_idx,
            kind: CollapseErrorKind::Propagation,
            iter,
        }
    }

    /// Index of the cell that reached zero possibilities.
    pub fn failed_cell(&self) -> usize {
        self.cell_idx
    }

    /// Number of successful collapse iterations before this error occurred.
    pub fn failed_iter(&self) -> u32 {
        self.iter
    }

    /// `true` if retrying (after `Engine::init`) has a chance of succeeding.
    ///
    /// A contradiction found during the very first, pre-collapse propagation
    /// is not probabilistic: it means the ruleset itself is unsatisfiable for
    /// this wave size, and retrying will fail identically.
    pub fn is_probabilistic(&self) -> bool {
        !matches!(self.kind, CollapseErrorKind::Init)
    }
}

impl Display for CollapseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            CollapseErrorKind::Init => write!(
                f,
                "cell {} had no options left during initial propagation",
                self.cell_idx
            ),
            CollapseErrorKind::Propagation => write!(
                f,
                "cell {} had no options left during propagation (iteration {})",
                self.cell_idx, self.iter
            ),
        }
    }
}

impl Error for CollapseError {}
