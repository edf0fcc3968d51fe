use std::io::Cursor;

use detox_leadmagnet::assets::GuideImages;
use detox_leadmagnet::builder::RenderedPdf;
use detox_leadmagnet::content;
use detox_leadmagnet::fonts;
use image::{DynamicImage, ImageBuffer, ImageOutputFormat, Rgb};
use sha2::{Digest, Sha256};

const SKIP_NOTICE: &str =
    "bundled fonts missing; set LEADMAGNET_FONTS_DIR or copy them to assets/fonts";

/// Placeholder gradients standing in for the real marketing photos; the
/// pipeline only cares that they decode.
fn placeholder_images() -> GuideImages {
    GuideImages {
        cover: gradient_png(240, 140, [27, 94, 32], [200, 230, 201]),
        coral_mine: gradient_png(160, 120, [46, 125, 50], [232, 245, 233]),
        h500: gradient_png(160, 120, [25, 118, 210], [227, 242, 253]),
        assimilator: gradient_png(160, 120, [85, 139, 47], [241, 248, 233]),
        lecithin: gradient_png(160, 120, [13, 71, 161], [255, 248, 225]),
    }
}

fn gradient_png(width: u32, height: u32, start: [u8; 3], end: [u8; 3]) -> Vec<u8> {
    let width_f = width.saturating_sub(1).max(1) as f32;
    let height_f = height.saturating_sub(1).max(1) as f32;
    let buffer = ImageBuffer::from_fn(width, height, |x, y| {
        let mix = (0.6 * (x as f32 / width_f) + 0.4 * (y as f32 / height_f)).clamp(0.0, 1.0);
        let mut channels = [0u8; 3];
        for (index, channel) in channels.iter_mut().enumerate() {
            let from = start[index] as f32;
            let to = end[index] as f32;
            *channel = (from + (to - from) * mix).round().clamp(0.0, 255.0) as u8;
        }
        Rgb(channels)
    });

    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(buffer)
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .expect("encode placeholder png");
    bytes
}

fn render_guide() -> Option<RenderedPdf> {
    if !fonts::default_fonts_available() {
        return None;
    }

    let builder = content::leadmagnet(placeholder_images()).expect("guide content is valid");
    Some(builder.render().expect("render guide"))
}

/// Blanks out the metadata genpdf stamps per run (dates, IDs, producer) so
/// two renders of the same content hash identically.
fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn scrub_segment(data: &mut [u8], tag: &[u8], terminator: u8) {
        let mut index = 0;
        while index + tag.len() < data.len() {
            if data[index..].starts_with(tag) {
                let mut cursor = index + tag.len();
                while cursor < data.len() {
                    let byte = data[cursor];
                    if byte == terminator {
                        break;
                    }
                    if terminator == b')' {
                        data[cursor] = b'0';
                    } else if !matches!(byte, b'<' | b'>' | b' ' | b'\n' | b'\r' | b'\t') {
                        data[cursor] = b'0';
                    }
                    cursor += 1;
                }
                index = cursor;
            } else {
                index += 1;
            }
        }
    }

    fn scrub_xml_element(data: &mut [u8], name: &str) {
        let start = format!("<{}>", name).into_bytes();
        let end = format!("</{}>", name).into_bytes();
        let mut offset = 0;
        while offset + start.len() < data.len() {
            let Some(start_pos) = data[offset..]
                .windows(start.len())
                .position(|window| window == start)
            else {
                break;
            };
            let value_start = offset + start_pos + start.len();
            let Some(end_pos) = data[value_start..]
                .windows(end.len())
                .position(|window| window == end)
            else {
                break;
            };
            for byte in &mut data[value_start..value_start + end_pos] {
                if !matches!(*byte, b'<' | b'>' | b'/' | b' ' | b'\n' | b'\r' | b'\t') {
                    *byte = b'0';
                }
            }
            offset = value_start + end_pos + end.len();
        }
    }

    let mut normalized = bytes.to_vec();
    scrub_segment(&mut normalized, b"/CreationDate(", b')');
    scrub_segment(&mut normalized, b"/ModDate(", b')');
    scrub_segment(&mut normalized, b"/ID[", b']');
    scrub_segment(&mut normalized, b"/Producer(", b')');
    for element in [
        "xmp:CreateDate",
        "xmp:ModifyDate",
        "xmp:MetadataDate",
        "xmpMM:DocumentID",
        "xmpMM:InstanceID",
        "xmpMM:VersionID",
    ] {
        scrub_xml_element(&mut normalized, element);
    }
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(scrub_pdf(bytes)).into()
}

#[test]
fn renders_non_empty_pdf() {
    let Some(rendered) = render_guide() else {
        eprintln!("Skipping renders_non_empty_pdf: {}", SKIP_NOTICE);
        return;
    };

    assert!(!rendered.bytes.is_empty());
    assert!(
        rendered.bytes.starts_with(b"%PDF"),
        "output should carry the PDF header"
    );
}

#[test]
fn rendering_is_deterministic() {
    let Some(first) = render_guide() else {
        eprintln!("Skipping rendering_is_deterministic: {}", SKIP_NOTICE);
        return;
    };
    let Some(second) = render_guide() else {
        eprintln!("Skipping rendering_is_deterministic: {}", SKIP_NOTICE);
        return;
    };

    assert_eq!(
        first.bytes.len(),
        second.bytes.len(),
        "PDF sizes should match"
    );
    assert_eq!(
        normalized_hash(&first.bytes),
        normalized_hash(&second.bytes),
        "renders must be identical after metadata normalization"
    );
}

#[test]
fn sections_record_ascending_start_pages() {
    let Some(rendered) = render_guide() else {
        eprintln!(
            "Skipping sections_record_ascending_start_pages: {}",
            SKIP_NOTICE
        );
        return;
    };

    assert_eq!(rendered.section_pages.len(), 6);

    let mut previous = 1;
    for (index, maybe_page) in rendered.section_pages.iter().enumerate() {
        let page = maybe_page.unwrap_or_else(|| panic!("section {} recorded no page", index));
        assert!(
            page > 1,
            "content sections start after the cover, got page {}",
            page
        );
        assert!(
            page >= previous,
            "section start pages must not decrease ({} after {})",
            page,
            previous
        );
        previous = page;
    }
}

#[cfg(feature = "bookmarks")]
#[test]
fn outline_entries_follow_sections() {
    if !fonts::default_fonts_available() {
        eprintln!("Skipping outline_entries_follow_sections: {}", SKIP_NOTICE);
        return;
    }

    let builder = content::leadmagnet(placeholder_images()).expect("guide content is valid");
    let rendered = builder
        .render_with_bookmarks()
        .expect("render guide with outline");

    let document = lopdf::Document::load_mem(&rendered.bytes).expect("parse rendered PDF");
    let catalog_id = document
        .trailer
        .get(b"Root")
        .ok()
        .and_then(|object| object.as_reference().ok())
        .expect("catalog reference");
    let catalog = document
        .objects
        .get(&catalog_id)
        .and_then(|object| object.as_dict().ok())
        .expect("catalog dictionary");

    let outlines_id = catalog
        .get(b"Outlines")
        .ok()
        .and_then(|object| object.as_reference().ok())
        .expect("outline tree attached");
    let outlines = document
        .objects
        .get(&outlines_id)
        .and_then(|object| object.as_dict().ok())
        .expect("outline dictionary");

    let count = outlines
        .get(b"Count")
        .ok()
        .and_then(|object| object.as_i64().ok())
        .expect("outline count");
    assert_eq!(count as usize, builder.sections().len());
}
