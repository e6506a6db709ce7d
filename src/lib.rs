//! An overlapping-model Wave Function Collapse engine: cuts tiles from a
//! source image, learns their adjacency rules, and generates new images by
//! collapsing a wave of per-cell tile possibilities under those rules.

pub mod direction;
pub mod engine;
pub mod error;
pub mod image;
pub mod propagator;
pub mod render;
pub mod rules;
pub mod tile;
pub mod wave;

pub use direction::Direction;
pub use engine::{Engine, EngineConfig};
pub use error::{BuildError, CollapseError};
pub use image::Image;
pub use rules::AdjacencyMatrix;
pub use tile::{BuildFlags, Tile, TileBuilder, TileSet};
