//! Output image rendering (spec.md §4.5).

use crate::image::Image;
use crate::tile::TileSet;
use crate::wave::Wave;

/// Produces one pixel per cell: the truncated arithmetic mean, component by
/// component, of the top-left pixel of every tile still in that cell's
/// possibility set.
///
/// On a fully collapsed wave this is just the singleton tile's top-left
/// pixel; on a partial wave it's a blended preview.
pub fn render(wave: &Wave, tiles: &TileSet) -> Image {
    let component_cnt = tiles.tiles()[0].image().component_cnt();
    let mut out = Image::blank(wave.width(), wave.height(), component_cnt);

    let mut acc = vec![0u32; component_cnt];
    for y in 0..wave.height() {
        for x in 0..wave.width() {
            let idx = wave.idx_of(x, y);
            let cell = wave.cell(idx);
            let possibilities = cell.possibilities();

            acc.iter_mut().for_each(|v| *v = 0);
            for &t in possibilities {
                let pixel = tiles.tiles()[t].image().pixel(0, 0);
                for (a, &p) in acc.iter_mut().zip(pixel) {
                    *a += p as u32;
                }
            }

            let n = possibilities.len() as u32;
            let pixel: Vec<u8> = acc.iter().map(|&v| (v / n) as u8).collect();
            out.set_pixel(x, y, &pixel);
        }
    }

    out
}
