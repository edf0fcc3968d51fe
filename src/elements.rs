//! Custom element implementations built on top of `genpdf` primitives.
//!
//! The original template leaned on CSS features `genpdf` has no notion of:
//! underlined links, a struck-through retail price, callout boxes with a
//! colored left border.  The elements here reproduce those effects with
//! `Area::draw_line` strokes, and the image helpers wrap the [`image`] crate
//! with descriptive errors.

use std::path::Path;

use image::GenericImageView;

use genpdf::elements::{Image, LinearLayout, Paragraph};
use genpdf::error::{Context as _, Error};
use genpdf::style::{Color, Style};
use genpdf::{render, Alignment, Element, Margins, Mm, Position, RenderResult, Scale, Size};

use crate::markup::DecoratedString;

const DEFAULT_IMAGE_DPI: f64 = 300.0;
const MM_PER_INCH: f64 = 25.4;
const DEFAULT_CAPTION_SPACING_MM: f64 = 2.0;
const DEFAULT_UNDERLINE_OFFSET_MM: f64 = 0.4;
const DEFAULT_CALLOUT_INDENT_MM: f64 = 5.0;
const CALLOUT_RULE_X_MM: f64 = 1.0;
const DEFAULT_PANEL_PADDING_MM: f64 = 5.0;

// Fraction of the glyph height at which the strikethrough stroke sits.
const STRIKE_HEIGHT_FRACTION: f64 = 0.55;

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

pub(crate) fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

fn estimated_image_size(image: &image::DynamicImage, dpi: f64) -> Size {
    let (px_width, px_height) = image.dimensions();
    let width_mm = MM_PER_INCH * (px_width as f64) / dpi;
    let height_mm = MM_PER_INCH * (px_height as f64) / dpi;
    Size::new(mm_from_f64(width_mm), mm_from_f64(height_mm))
}

/// Decodes an image held in memory, with a descriptive error on failure.
pub fn decode_image_from_bytes(bytes: impl AsRef<[u8]>) -> Result<image::DynamicImage, Error> {
    image::load_from_memory(bytes.as_ref()).context("Failed to decode image from provided bytes")
}

/// Decodes the image file at `path`, with a descriptive error on failure.
pub fn decode_image_from_path(path: impl AsRef<Path>) -> Result<image::DynamicImage, Error> {
    let path = path.as_ref();
    let reader = image::io::Reader::open(path)
        .with_context(|| format!("Failed to open image file {}", path.display()))?;
    reader
        .with_guessed_format()
        .context("Unable to determine image format")?
        .decode()
        .with_context(|| format!("Failed to decode image file {}", path.display()))
}

fn image_from_dynamic(image: image::DynamicImage) -> Result<(Image, Size), Error> {
    let size = estimated_image_size(&image, DEFAULT_IMAGE_DPI);
    let image = Image::from_dynamic_image(image)?;
    Ok((image, size))
}

/// Converts image bytes into a `genpdf` image plus its estimated print size.
pub fn image_from_bytes(bytes: impl AsRef<[u8]>) -> Result<(Image, Size), Error> {
    let dynamic = decode_image_from_bytes(bytes)?;
    image_from_dynamic(dynamic)
}

/// Converts the image at `path` into a `genpdf` image plus its estimated print size.
pub fn image_from_path(path: impl AsRef<Path>) -> Result<(Image, Size), Error> {
    let dynamic = decode_image_from_path(path)?;
    image_from_dynamic(dynamic)
}

/// An image with an optional caption stacked underneath.
///
/// Image and caption share one alignment, and the image can be constrained to
/// a width in millimetres while keeping its aspect ratio.
pub struct ImageFigure {
    image: Image,
    caption: Option<Paragraph>,
    alignment: Alignment,
    natural_size: Size,
    requested_width: Option<Mm>,
    spacing: Mm,
}

impl ImageFigure {
    fn new(image: Image, natural_size: Size) -> Self {
        Self {
            image,
            caption: None,
            alignment: Alignment::Left,
            natural_size,
            requested_width: None,
            spacing: mm_from_f64(DEFAULT_CAPTION_SPACING_MM),
        }
    }

    /// Creates a figure from an already decoded [`image::DynamicImage`].
    pub fn from_dynamic_image(image: image::DynamicImage) -> Result<Self, Error> {
        let (image, size) = image_from_dynamic(image)?;
        Ok(Self::new(image, size))
    }

    /// Creates a figure from encoded image bytes.
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Result<Self, Error> {
        let (image, size) = image_from_bytes(bytes)?;
        Ok(Self::new(image, size))
    }

    /// Creates a figure from the image file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let (image, size) = image_from_path(path)?;
        Ok(Self::new(image, size))
    }

    /// Sets the caption paragraph and returns the updated figure.
    pub fn with_caption(mut self, caption: impl Into<Option<Paragraph>>) -> Self {
        self.caption = caption.into();
        self
    }

    /// Sets the shared alignment and returns the updated figure.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Constrains the rendered width and returns the updated figure.
    pub fn with_width_mm(mut self, width_mm: impl Into<Option<f64>>) -> Self {
        self.requested_width = width_mm.into().map(mm_from_f64);
        self
    }

    fn apply_layout(&mut self) {
        self.image.set_alignment(self.alignment);
        if let Some(caption) = &mut self.caption {
            caption.set_alignment(self.alignment);
        }

        if let Some(width) = self.requested_width {
            let natural = mm_to_f64(self.natural_size.width);
            if natural > f64::EPSILON {
                let scale = mm_to_f64(width) / natural;
                self.image.set_scale(Scale::new(scale, scale));
            }
        } else {
            self.image.set_scale(Scale::new(1.0, 1.0));
        }
    }
}

impl Element for ImageFigure {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        self.apply_layout();

        let mut result = RenderResult::default();
        let image_result = self.image.render(context, area.clone(), style)?;
        result.size = result.size.stack_vertical(image_result.size);
        result.has_more |= image_result.has_more;

        if let Some(caption) = &mut self.caption {
            let spacing = self.spacing;
            area.add_offset(Position::new(0, image_result.size.height + spacing));
            result.size = result.size.stack_vertical(Size::new(0, spacing));

            let caption_result = caption.render(context, area, style)?;
            result.size = result.size.stack_vertical(caption_result.size);
            result.has_more |= caption_result.has_more;
        }

        Ok(result)
    }
}

/// A single line of decorated text.
///
/// Prints the fragments through a text section and then draws underline and
/// strikethrough strokes where the flags ask for them.  The underline color
/// defaults to the fragment color but can be overridden, which is how the
/// subheading rule gets its lighter green than the heading text.
pub struct DecoratedLine {
    fragments: Vec<DecoratedString>,
    alignment: Alignment,
    underline_offset: Mm,
    underline_color: Option<Color>,
}

impl DecoratedLine {
    /// Creates a line from the provided fragments.
    pub fn new<I>(fragments: I) -> Self
    where
        I: IntoIterator<Item = DecoratedString>,
    {
        Self {
            fragments: fragments.into_iter().collect(),
            alignment: Alignment::Left,
            underline_offset: mm_from_f64(DEFAULT_UNDERLINE_OFFSET_MM),
            underline_color: None,
        }
    }

    /// Sets the alignment and returns the updated line.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Sets the distance between the glyph bottom and the underline stroke.
    pub fn with_underline_offset(mut self, offset: Mm) -> Self {
        self.underline_offset = offset;
        self
    }

    /// Overrides the stroke color used for underlines.
    pub fn with_underline_color(mut self, color: Color) -> Self {
        self.underline_color = Some(color);
        self
    }
}

struct MeasuredFragment {
    string: genpdf::style::StyledString,
    underline: bool,
    strikethrough: bool,
    width: Mm,
}

impl Element for DecoratedLine {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let mut measured: Vec<MeasuredFragment> = Vec::with_capacity(self.fragments.len());
        let mut total_width = Mm::default();
        let mut max_line_height = style.line_height(&context.font_cache);
        let mut max_glyph_height = Mm::default();

        for fragment in &self.fragments {
            let mut string = fragment.string.clone();
            string.style = style.and(string.style);
            let width = string.width(&context.font_cache);
            total_width += width;
            max_line_height = max_line_height.max(string.style.line_height(&context.font_cache));
            let glyph_height = string
                .style
                .font(&context.font_cache)
                .glyph_height(string.style.font_size());
            max_glyph_height = max_glyph_height.max(glyph_height);
            measured.push(MeasuredFragment {
                string,
                underline: fragment.underline,
                strikethrough: fragment.strikethrough,
                width,
            });
        }

        let mut result = RenderResult::default();
        if max_line_height > area.size().height {
            result.has_more = true;
            return Ok(result);
        }

        let available_width = area.size().width;
        let x_offset = match self.alignment {
            Alignment::Left => Mm::default(),
            Alignment::Center => (available_width - total_width) / 2.0,
            Alignment::Right => available_width - total_width,
        };

        if let Some(mut section) =
            area.text_section(&context.font_cache, Position::new(x_offset, 0), style)
        {
            for fragment in &measured {
                section.print_str(&fragment.string.s, fragment.string.style)?;
            }
        } else {
            result.has_more = true;
            return Ok(result);
        }

        let underline_y = max_glyph_height + self.underline_offset;
        let strike_y = mm_from_f64(mm_to_f64(max_glyph_height) * STRIKE_HEIGHT_FRACTION);
        let mut cursor = x_offset;
        for fragment in &measured {
            let fragment_color = fragment.string.style.color().or(style.color());
            if fragment.underline {
                let color = self.underline_color.or(fragment_color);
                draw_stroke(&mut area, cursor, fragment.width, underline_y, color);
            }
            if fragment.strikethrough {
                draw_stroke(&mut area, cursor, fragment.width, strike_y, fragment_color);
            }
            cursor += fragment.width;
        }

        result.size = Size::new(total_width, max_line_height);
        area.add_offset(Position::new(0, max_line_height));

        Ok(result)
    }
}

fn draw_stroke(area: &mut render::Area<'_>, x: Mm, width: Mm, y: Mm, color: Option<Color>) {
    let mut stroke_style = Style::new();
    if let Some(color) = color {
        stroke_style = stroke_style.with_color(color);
    }
    area.draw_line(
        vec![Position::new(x, y), Position::new(x + width, y)],
        stroke_style,
    );
}

/// Stacked elements indented from a colored vertical rule on the left edge.
///
/// Stands in for the template's `border-left` callout boxes; `genpdf` cannot
/// fill backgrounds, so the rule carries the visual accent alone.
pub struct RuledCallout {
    content: LinearLayout,
    rule_color: Color,
    indent: Mm,
}

impl RuledCallout {
    /// Creates an empty callout with the given rule color.
    pub fn new(rule_color: Color) -> Self {
        Self {
            content: LinearLayout::vertical(),
            rule_color,
            indent: mm_from_f64(DEFAULT_CALLOUT_INDENT_MM),
        }
    }

    /// Appends a child element and returns the updated callout.
    pub fn with_element(mut self, element: impl Element + 'static) -> Self {
        self.content.push(element);
        self
    }

    /// Sets the content indent and returns the updated callout.
    pub fn with_indent(mut self, indent: Mm) -> Self {
        self.indent = indent;
        self
    }
}

impl Element for RuledCallout {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let mut inner = area.clone();
        inner.add_margins(Margins::trbl(0, 0, 0, self.indent));
        let content_result = self.content.render(context, inner, style)?;

        let height = content_result.size.height;
        if mm_to_f64(height) > 0.0 {
            let rule_x = mm_from_f64(CALLOUT_RULE_X_MM);
            area.draw_line(
                vec![Position::new(rule_x, 0), Position::new(rule_x, height)],
                Style::new().with_color(self.rule_color),
            );
        }

        let mut result = RenderResult::default();
        result.size = Size::new(content_result.size.width + self.indent, height);
        result.has_more = content_result.has_more;
        Ok(result)
    }
}

/// Stacked elements surrounded by a colored rectangular frame.
///
/// Used for the price box; the frame is drawn as a closed polyline once the
/// content height is known.
pub struct FramedPanel {
    content: LinearLayout,
    frame_color: Color,
    padding: Mm,
}

impl FramedPanel {
    /// Creates an empty panel with the given frame color.
    pub fn new(frame_color: Color) -> Self {
        Self {
            content: LinearLayout::vertical(),
            frame_color,
            padding: mm_from_f64(DEFAULT_PANEL_PADDING_MM),
        }
    }

    /// Appends a child element and returns the updated panel.
    pub fn with_element(mut self, element: impl Element + 'static) -> Self {
        self.content.push(element);
        self
    }
}

impl Element for FramedPanel {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let mut inner = area.clone();
        inner.add_margins(Margins::trbl(self.padding, self.padding, 0, self.padding));
        let content_result = self.content.render(context, inner, style)?;

        let width = area.size().width;
        let height = content_result.size.height + self.padding + self.padding;
        area.draw_line(
            vec![
                Position::new(0, 0),
                Position::new(width, 0),
                Position::new(width, height),
                Position::new(0, height),
                Position::new(0, 0),
            ],
            Style::new().with_color(self.frame_color),
        );

        let mut result = RenderResult::default();
        result.size = Size::new(width, height);
        result.has_more = content_result.has_more;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimated_size_follows_dpi() {
        let image = image::DynamicImage::new_rgb8(300, 150);
        let size = estimated_image_size(&image, 300.0);
        assert!((mm_to_f64(size.width) - 25.4).abs() < 1e-9);
        assert!((mm_to_f64(size.height) - 12.7).abs() < 1e-9);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_image_from_bytes([0u8, 1, 2, 3]).is_err());
    }

    #[test]
    fn mm_roundtrip() {
        let mm = mm_from_f64(12.5);
        assert!((mm_to_f64(mm) - 12.5).abs() < 1e-9);
    }
}
