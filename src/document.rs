//! Multi-page PDF assembly from composite page images.

use std::path::Path;

use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::error::Result;

const POINTS_PER_INCH: f32 = 72.0;

/// Write `pages` as a PDF, one image per page, scaled so that `dpi` pixels
/// span one inch.
pub fn write_pdf(pages: &[RgbImage], dpi: u32, path: &Path) -> Result<()> {
    let mut doc = build_pdf(pages, dpi)?;
    doc.save(path)?;
    Ok(())
}

pub fn build_pdf(pages: &[RgbImage], dpi: u32) -> Result<Document> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::with_capacity(pages.len());
    for image in pages {
        let page_id = add_image_page(&mut doc, pages_id, image, dpi)?;
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();
    Ok(doc)
}

fn add_image_page(
    doc: &mut Document,
    parent: ObjectId,
    image: &RgbImage,
    dpi: u32,
) -> Result<ObjectId> {
    let (width, height) = image.dimensions();
    let scale = POINTS_PER_INCH / dpi.max(1) as f32;
    let (w_pt, h_pt) = (width as f32 * scale, height as f32 * scale);

    let xobject = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8i64,
        },
        image.as_raw().clone(),
    );
    let image_id = doc.add_object(xobject);

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    w_pt.into(),
                    0i64.into(),
                    0i64.into(),
                    h_pt.into(),
                    0i64.into(),
                    0i64.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let media_box: Vec<Object> = vec![0i64.into(), 0i64.into(), w_pt.into(), h_pt.into()];
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => parent,
        "MediaBox" => media_box,
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        },
    });
    Ok(page_id)
}
