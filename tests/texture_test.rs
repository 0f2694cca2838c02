use diorama::data_structures::texture::{mip_chain, mip_level_count};
use image::{Rgba, RgbaImage};

fn dimensions(levels: &[RgbaImage]) -> Vec<(u32, u32)> {
    levels.iter().map(|level| level.dimensions()).collect()
}

#[test]
fn mip_level_count_reaches_one_pixel() {
    assert_eq!(mip_level_count(1, 1), 1);
    assert_eq!(mip_level_count(0, 0), 1);
    assert_eq!(mip_level_count(2, 2), 2);
    assert_eq!(mip_level_count(256, 100), 9);
    assert_eq!(mip_level_count(100, 256), 9);
    assert_eq!(mip_level_count(257, 1), 9);
}

#[test]
fn mip_chain_halves_down_to_one_pixel() {
    let base = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255]));
    let levels = mip_chain(base);
    assert_eq!(dimensions(&levels), vec![(8, 8), (4, 4), (2, 2), (1, 1)]);
}

#[test]
fn mip_chain_clamps_the_short_side() {
    let levels = mip_chain(RgbaImage::from_pixel(4, 1, Rgba([0, 0, 0, 255])));
    assert_eq!(dimensions(&levels), vec![(4, 1), (2, 1), (1, 1)]);

    let levels = mip_chain(RgbaImage::from_pixel(3, 8, Rgba([0, 0, 0, 255])));
    assert_eq!(dimensions(&levels), vec![(3, 8), (1, 4), (1, 2), (1, 1)]);
}

#[test]
fn mip_chain_keeps_the_base_level() {
    let mut base = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 255]));
    base.put_pixel(1, 1, Rgba([255, 0, 0, 255]));

    let levels = mip_chain(base.clone());

    assert_eq!(levels[0], base);
    assert_eq!(levels.len(), 2);
}

#[test]
fn mip_chain_of_a_flat_colour_stays_flat() {
    let colour = Rgba([40, 160, 90, 255]);
    let levels = mip_chain(RgbaImage::from_pixel(16, 4, colour));

    assert_eq!(levels.len() as u32, mip_level_count(16, 4));
    for level in &levels {
        for pixel in level.pixels() {
            for (channel, expected) in pixel.0.iter().zip(colour.0) {
                assert!(channel.abs_diff(expected) <= 1, "{pixel:?}");
            }
        }
    }
}
