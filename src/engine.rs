//! The overlapping-model engine: build → rules → wave-init →
//! (observe → collapse → propagate)* → render (spec.md §2, §6).

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{BuildError, CollapseError};
use crate::image::Image;
use crate::propagator::Propagator;
use crate::render;
use crate::tile::{BuildFlags, TileBuilder, TileSet};
use crate::wave::Wave;

/// Construction parameters for [`Engine::new`].
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub output_width: usize,
    pub output_height: usize,
    pub tile_width: usize,
    pub tile_height: usize,
    pub flags: BuildFlags,
    /// Fixed PRNG seed for reproducible runs; `None` seeds from wall-clock
    /// time at construction and at every `init` (spec.md §4.6).
    pub seed: Option<u64>,
}

/// An overlapping Wave Function Collapse engine bound to one tile set.
///
/// Owns the tile set, adjacency rules, wave, and propagation worklist; the
/// input image is only borrowed during construction (spec.md §5 ownership
/// note).
pub struct Engine {
    tiles: TileSet,
    output_width: usize,
    output_height: usize,
    wave: Wave,
    propagator: Propagator,
    rng: ChaCha8Rng,
    seed: Option<u64>,
    iter: u32,
}

impl Engine {
    /// Builds the tile set and adjacency matrix from `input`, then
    /// initializes a wave of `(output_width, output_height)` cells, all
    /// superposed (spec.md §6 `create_overlapping`).
    pub fn new(input: &Image, config: EngineConfig) -> Result<Self, BuildError> {
        if config.output_width == 0 || config.output_height == 0 {
            return Err(BuildError::ZeroOutputSize);
        }

        let tiles = TileBuilder::new(config.tile_width, config.tile_height)
            .with_flags(config.flags)
            .build(input)?;

        let mut rng = seed_rng(config.seed);
        let wave = Wave::new(config.output_width, config.output_height, &tiles, &mut rng);

        Ok(Self {
            tiles,
            output_width: config.output_width,
            output_height: config.output_height,
            wave,
            propagator: Propagator::new(),
            rng,
            seed: config.seed,
            iter: 0,
        })
    }

    /// Reseeds the PRNG, clears the wave back to all-possibilities, and
    /// resets the collapse iteration counter (spec.md §6 `init`).
    pub fn init(&mut self) {
        let mut rng = seed_rng(self.seed);
        self.wave = Wave::new(self.output_width, self.output_height, &self.tiles, &mut rng);
        self.rng = rng;
        self.iter = 0;
    }

    /// Drives `collapse -> propagateFrom -> nextCell` until the wave is
    /// fully collapsed or `max_collapses` iterations have run, starting from
    /// the grid's centre cell (spec.md §9 Open Question: the reference
    /// implementation starts at the centre rather than a random cell; this
    /// is documented in DESIGN.md and preserved here for determinism parity
    /// with it).
    pub fn run(&mut self, max_collapses: Option<u32>) -> Result<(), CollapseError> {
        let mut cell_idx = self.centre_cell();

        loop {
            if let Some(limit) = max_collapses {
                if self.iter >= limit {
                    return Ok(());
                }
            }

            self.wave.collapse(cell_idx, &mut self.rng);
            self.iter += 1;

            if let Err(failed) = self.propagator.propagate_from(cell_idx, &mut self.wave, self.tiles.rules()) {
                // A contradiction on the very first collapse means the
                // ruleset itself can't tile this wave size; later ones are
                // a consequence of earlier probabilistic choices.
                return if self.iter == 1 {
                    Err(CollapseError::init(failed, self.iter))
                } else {
                    Err(CollapseError::propagation(failed, self.iter))
                };
            }

            match self.wave.next_cell() {
                Some(next) => cell_idx = next,
                None => return Ok(()),
            }
        }
    }

    /// Renders the current wave state (spec.md §4.5); may be called on a
    /// partially collapsed wave for a blended preview.
    pub fn output_image(&self) -> Image {
        render::render(&self.wave, &self.tiles)
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn collapsed_count(&self) -> u32 {
        self.wave.collapsed_count()
    }

    /// Number of `collapse` calls executed by the most recent `run`.
    pub fn iterations(&self) -> u32 {
        self.iter
    }

    fn centre_cell(&self) -> usize {
        self.wave.idx_of(self.output_width / 2, self.output_height / 2)
    }
}

fn seed_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}
