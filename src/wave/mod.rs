//! Wave state: a grid of cells, each carrying its current tile-possibility
//! set plus a cached frequency sum and Shannon entropy (spec.md §3).

use rand::distributions::Uniform;
use rand::Rng;

use crate::tile::TileSet;

/// Scale of the additive tie-break noise mixed into a cell's entropy, so
/// ties between cells of genuinely equal entropy are broken by the PRNG
/// instead of by scan order (spec.md §4.4).
const NOISE_EPSILON: f64 = 1e-5;

/// One cell's possibility set plus its cached selection keys.
///
/// `possibilities` is a dense, order-unstable array: removal is
/// swap-and-truncate, matching the "length-prefixed dense array compacted in
/// place" description in spec.md §3/§9 without needing a real length prefix.
#[derive(Debug, Clone)]
pub struct Cell {
    possibilities: Vec<usize>,
    sum_freqs: u32,
    entropy: f64,
    noise: f64,
}

impl Cell {
    fn new_full(freqs: &[u32], noise: f64) -> Self {
        let possibilities: Vec<usize> = (0..freqs.len()).collect();
        let sum_freqs: u32 = freqs.iter().sum();
        let entropy = shannon_entropy(possibilities.iter().map(|&t| freqs[t]), sum_freqs);
        Self {
            possibilities,
            sum_freqs,
            entropy,
            noise,
        }
    }

    pub fn possibilities(&self) -> &[usize] {
        &self.possibilities
    }

    pub fn is_collapsed(&self) -> bool {
        self.possibilities.len() <= 1
    }

    pub fn is_contradiction(&self) -> bool {
        self.possibilities.is_empty()
    }

    pub fn sum_freqs(&self) -> u32 {
        self.sum_freqs
    }

    pub fn entropy(&self) -> f64 {
        self.entropy
    }

    pub fn contains(&self, tile: usize) -> bool {
        self.possibilities.contains(&tile)
    }
}

fn shannon_entropy(freqs: impl Iterator<Item = u32>, sum: u32) -> f64 {
    if sum == 0 {
        return 0.0;
    }
    let sum = sum as f64;
    -freqs
        .filter(|&f| f > 0)
        .map(|f| {
            let p = f as f64 / sum;
            p * p.ln()
        })
        .sum::<f64>()
}

/// The full grid of cells plus the frequency table they're scored against.
pub struct Wave {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    freqs: Vec<u32>,
}

impl Wave {
    /// Builds a wave where every cell starts with every tile possible,
    /// drawing one tie-break noise sample per cell from `rng`.
    pub fn new(width: usize, height: usize, tiles: &TileSet, rng: &mut impl Rng) -> Self {
        let freqs: Vec<u32> = tiles.tiles().iter().map(|t| t.freq()).collect();
        let noise_dist = Uniform::new(0u32, 124);
        let cells = (0..width * height)
            .map(|_| {
                let noise = rng.sample(noise_dist) as f64 * NOISE_EPSILON;
                Cell::new_full(&freqs, noise)
            })
            .collect();
        Self {
            width,
            height,
            cells,
            freqs,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn cell(&self, idx: usize) -> &Cell {
        &self.cells[idx]
    }

    /// Number of cells reduced to a single possibility, computed fresh each
    /// call (the driver's `nextCell` scan already costs O(cells), so this
    /// adds no new order of growth).
    pub fn collapsed_count(&self) -> u32 {
        self.cells.iter().filter(|c| c.is_collapsed()).count() as u32
    }

    pub fn idx_of(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn pos_of(&self, idx: usize) -> (usize, usize) {
        (idx % self.width, idx / self.width)
    }

    /// Linear scan for the uncollapsed cell with minimum `entropy + noise`
    /// (spec.md §4.4 `nextCell`). Returns `None` if every cell is collapsed.
    pub fn next_cell(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, cell) in self.cells.iter().enumerate() {
            if cell.possibilities.len() <= 1 {
                continue;
            }
            let key = cell.entropy + cell.noise;
            let is_better = match best {
                Some((_, best_key)) => key < best_key,
                None => true,
            };
            if is_better {
                best = Some((idx, key));
            }
        }
        best.map(|(idx, _)| idx)
    }

    /// Frequency-weighted sample of one tile from `idx`'s possibilities,
    /// collapsing the cell to that singleton (spec.md §4.4 `collapse`).
    pub fn collapse(&mut self, idx: usize, rng: &mut impl Rng) -> usize {
        let cell = &self.cells[idx];
        debug_assert!(!cell.possibilities.is_empty());

        let r = rng.gen_range(0..cell.sum_freqs.max(1));
        let mut acc = 0u32;
        let mut chosen = cell.possibilities[cell.possibilities.len() - 1];
        for &tile in &cell.possibilities {
            acc += self.freqs[tile];
            if acc > r {
                chosen = tile;
                break;
            }
        }

        let cell = &mut self.cells[idx];
        cell.possibilities.clear();
        cell.possibilities.push(chosen);
        cell.sum_freqs = 0;
        cell.entropy = 0.0;
        chosen
    }

    /// Removes `tile` from cell `idx`'s possibilities if present, updating
    /// its cached `sum_freqs`/`entropy`. Returns whether anything changed.
    pub fn remove_possibility(&mut self, idx: usize, tile: usize) -> bool {
        let cell = &mut self.cells[idx];
        let Some(pos) = cell.possibilities.iter().position(|&t| t == tile) else {
            return false;
        };
        cell.possibilities.swap_remove(pos);
        cell.sum_freqs -= self.freqs[tile];
        cell.entropy = if cell.possibilities.len() <= 1 {
            0.0
        } else {
            shannon_entropy(cell.possibilities.iter().map(|&t| self.freqs[t]), cell.sum_freqs)
        };
        true
    }
}
