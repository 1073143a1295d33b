//! Change compositor: turns two aligned grayscale renderings of a page into
//! one colour image where removed content is red, added content is blue and
//! content common to both revisions is gray.

use image::{GrayImage, Luma, Rgb, RgbImage};

pub const REMOVED_TINT: [u8; 3] = [0xff, 0x00, 0x00];
pub const ADDED_TINT: [u8; 3] = [0x00, 0x00, 0xff];
pub const UNCHANGED_TINT: [u8; 3] = [0x77, 0x77, 0x77];

/// The three grayscale channels computed before colourisation.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeChannels {
    /// Pixels brighter in the new rendering, stretched to full range.
    pub added: GrayImage,
    /// Pixels brighter in the old rendering, stretched to full range.
    pub removed: GrayImage,
    /// Per-pixel average of both renderings.
    pub unchanged: GrayImage,
}

/// Both images must already share dimensions (see [`crate::canvas::normalize`]).
pub fn change_channels(old: &GrayImage, new: &GrayImage) -> ChangeChannels {
    debug_assert_eq!(old.dimensions(), new.dimensions());
    ChangeChannels {
        added: autocontrast(&subtract_clamped(new, old)),
        removed: autocontrast(&subtract_clamped(old, new)),
        unchanged: blend(old, new, 0.5),
    }
}

impl ChangeChannels {
    pub fn colorize(&self) -> RgbImage {
        let unchanged = colorize(&self.unchanged, UNCHANGED_TINT);
        let removed = colorize(&self.removed, REMOVED_TINT);
        let added = colorize(&self.added, ADDED_TINT);
        add_saturating(&add_saturating(&unchanged, &removed), &added)
    }
}

pub fn composite(old: &GrayImage, new: &GrayImage) -> RgbImage {
    change_channels(old, new).colorize()
}

/// `max(a - b, 0)` per pixel.
pub fn subtract_clamped(a: &GrayImage, b: &GrayImage) -> GrayImage {
    GrayImage::from_fn(a.width(), a.height(), |x, y| {
        Luma([a.get_pixel(x, y)[0].saturating_sub(b.get_pixel(x, y)[0])])
    })
}

/// Stretch the occupied intensity range to `0..=255`.
///
/// An image whose pixels all share one value is returned unchanged.
pub fn autocontrast(img: &GrayImage) -> GrayImage {
    let Some((lo, hi)) = intensity_range(img) else {
        return img.clone();
    };
    if hi <= lo {
        return img.clone();
    }

    let (lo, span) = (i32::from(lo), i32::from(hi - lo));
    let mut lut = [0u8; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        let v = (i as i32 - lo) * 255 / span;
        *slot = v.clamp(0, 255) as u8;
    }

    let mut out = img.clone();
    for p in out.pixels_mut() {
        p[0] = lut[p[0] as usize];
    }
    out
}

fn intensity_range(img: &GrayImage) -> Option<(u8, u8)> {
    let mut pixels = img.pixels().map(|p| p[0]);
    let first = pixels.next()?;
    Some(pixels.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

/// `a + alpha * (b - a)`, truncated.
pub fn blend(a: &GrayImage, b: &GrayImage, alpha: f32) -> GrayImage {
    GrayImage::from_fn(a.width(), a.height(), |x, y| {
        let pa = f32::from(a.get_pixel(x, y)[0]);
        let pb = f32::from(b.get_pixel(x, y)[0]);
        Luma([(pa + alpha * (pb - pa)).clamp(0.0, 255.0) as u8])
    })
}

/// Map black to black and white to `tint`, linearly in between.
pub fn colorize(img: &GrayImage, tint: [u8; 3]) -> RgbImage {
    let mut lut = [[0u8; 3]; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        for (c, channel) in entry.iter_mut().enumerate() {
            *channel = (u32::from(tint[c]) * i as u32 / 255) as u8;
        }
    }
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        Rgb(lut[img.get_pixel(x, y)[0] as usize])
    })
}

pub fn add_saturating(a: &RgbImage, b: &RgbImage) -> RgbImage {
    RgbImage::from_fn(a.width(), a.height(), |x, y| {
        let pa = a.get_pixel(x, y);
        let pb = b.get_pixel(x, y);
        Rgb([
            pa[0].saturating_add(pb[0]),
            pa[1].saturating_add(pb[1]),
            pa[2].saturating_add(pb[2]),
        ])
    })
}
