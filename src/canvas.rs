use image::{imageops, GrayImage};

/// Pad both images onto black canvases of their common bounding size.
///
/// Sheet renderings may change size between revisions (the title block
/// prints the file name), so each image is anchored at the origin and the
/// extra area is left at zero. Nothing is ever cropped.
pub fn normalize(a: &GrayImage, b: &GrayImage) -> (GrayImage, GrayImage) {
    let width = a.width().max(b.width());
    let height = a.height().max(b.height());
    (pad_to(a, width, height), pad_to(b, width, height))
}

fn pad_to(img: &GrayImage, width: u32, height: u32) -> GrayImage {
    if img.dimensions() == (width, height) {
        return img.clone();
    }
    let mut canvas = GrayImage::new(width, height);
    imageops::replace(&mut canvas, img, 0, 0);
    canvas
}
