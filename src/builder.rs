//! Document assembly: maps the content model onto `genpdf` and renders it.
//!
//! [`PdfBuilder`] collects the cover, the sections and the per-page footer,
//! then [`PdfBuilder::render`] composes a `genpdf::Document` with the bundled
//! fonts and the page decorator.  The decorator treats page one as the cover
//! (tight margins, no footer) and every later page as a content page with the
//! original template's margins and the legal footer.  Marker elements record
//! the page each section starts on so the outline feature can point at it.

use std::cell::Cell;
use std::rc::Rc;

use genpdf::elements::{
    Break, FrameCellDecorator, LinearLayout, PageBreak, Paragraph, TableLayout, UnorderedList,
};
use genpdf::error::{Error, ErrorKind};
use genpdf::style::Style;
use genpdf::{Alignment, Element, Margins, Mm, PageDecorator, PaperSize, Position};
use log::debug;

#[cfg(feature = "hyphenation")]
use hyphenation::Standard;

use crate::elements::{mm_from_f64, DecoratedLine, FramedPanel, ImageFigure, RuledCallout};
use crate::fonts;
use crate::markup::{DecoratedString, Span};
use crate::model::{
    Block, CallToAction, Callout, CalloutTone, Cover, CtaAccent, HorizontalAlignment, ImageBlock,
    ImageSource, PriceBox, ProductCard, ResultsTable, RichParagraph, Section,
};
use crate::palette;

const BASE_FONT_SIZE: u8 = 11;
const LINE_SPACING: f64 = 1.3;

const COVER_TITLE_SIZE: u8 = 30;
const COVER_SUBTITLE_SIZE: u8 = 16;
const SECTION_TITLE_SIZE: u8 = 22;
const SUBHEADING_SIZE: u8 = 16;
const PRODUCT_NAME_SIZE: u8 = 18;
const PRODUCT_TAGLINE_SIZE: u8 = 12;

fn content_margins() -> Margins {
    // 1.5cm vertical, 2cm horizontal, as on the template's content pages.
    Margins::trbl(15, 20, 15, 20)
}

fn cover_margins() -> Margins {
    Margins::trbl(25, 15, 10, 15)
}

/// A rendered document plus the page each section started on.
pub struct RenderedPdf {
    /// The PDF file contents.
    pub bytes: Vec<u8>,
    /// 1-indexed start page per section, in section order.  `None` when the
    /// section never rendered (which would indicate a composition bug).
    pub section_pages: Vec<Option<usize>>,
}

type FooterFactory = dyn Fn(usize) -> Box<dyn Element>;

/// A per-page footer: reserved height plus an element factory.
#[derive(Clone)]
pub struct FooterSpec {
    height: Mm,
    factory: Rc<FooterFactory>,
}

impl FooterSpec {
    /// Creates a footer specification from a height and an element factory.
    pub fn new<F, E>(height: impl Into<Mm>, factory: F) -> Self
    where
        F: Fn(usize) -> E + 'static,
        E: Element + 'static,
    {
        Self {
            height: height.into(),
            factory: Rc::new(move |page| Box::new(factory(page)) as Box<dyn Element>),
        }
    }
}

/// Builder for the lead magnet document.
#[derive(Default)]
pub struct PdfBuilder {
    title: Option<String>,
    cover: Option<Cover>,
    sections: Vec<Section>,
    footer: Option<FooterSpec>,
    #[cfg(feature = "hyphenation")]
    hyphenator: Option<Standard>,
}

impl PdfBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the document title recorded in the PDF metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the cover page.
    pub fn with_cover(mut self, cover: Cover) -> Self {
        self.cover = Some(cover);
        self
    }

    /// Appends a section.
    pub fn add_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Configures the footer rendered on every content page.
    pub fn with_footer<F, E>(mut self, height: impl Into<Mm>, factory: F) -> Self
    where
        F: Fn(usize) -> E + 'static,
        E: Element + 'static,
    {
        self.footer = Some(FooterSpec::new(height, factory));
        self
    }

    /// Enables hyphenation with the provided dictionary.
    #[cfg(feature = "hyphenation")]
    pub fn with_hyphenator(mut self, hyphenator: Standard) -> Self {
        self.hyphenator = Some(hyphenator);
        self
    }

    /// Returns the configured cover, if any.
    pub fn cover(&self) -> Option<&Cover> {
        self.cover.as_ref()
    }

    /// Returns the configured sections in order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Renders the document and returns its bytes plus section start pages.
    pub fn render(&self) -> Result<RenderedPdf, Error> {
        let font_family = fonts::default_font_family()?;
        let mut document = genpdf::Document::new(font_family);
        document.set_paper_size(PaperSize::A4);
        document.set_font_size(BASE_FONT_SIZE);
        document.set_line_spacing(LINE_SPACING);
        if let Some(title) = &self.title {
            document.set_title(title.clone());
        }

        #[cfg(feature = "hyphenation")]
        if let Some(hyphenator) = &self.hyphenator {
            document.set_hyphenator(hyphenator.clone());
        }

        let page_counter = Rc::new(Cell::new(0usize));
        document.set_page_decorator(GuidePageDecorator {
            page: Rc::clone(&page_counter),
            has_cover: self.cover.is_some(),
            footer: self.footer.clone(),
        });

        if let Some(cover) = &self.cover {
            document.push(cover_element(cover)?);
        }

        let mut section_slots = Vec::with_capacity(self.sections.len());
        for (index, section) in self.sections.iter().enumerate() {
            if index > 0 || self.cover.is_some() {
                document.push(PageBreak::new());
            }

            let slot: Rc<Cell<Option<usize>>> = Rc::new(Cell::new(None));
            document.push(PageMarker {
                page: Rc::clone(&page_counter),
                slot: Rc::clone(&slot),
            });
            section_slots.push(slot);

            push_section(&mut document, section)?;
        }

        let mut bytes = Vec::new();
        document.render(&mut bytes)?;

        let section_pages: Vec<Option<usize>> =
            section_slots.iter().map(|slot| slot.get()).collect();
        debug!(
            "Rendered {} sections across {} pages ({} bytes)",
            section_pages.len(),
            page_counter.get(),
            bytes.len()
        );

        Ok(RenderedPdf {
            bytes,
            section_pages,
        })
    }

    /// Renders the document and injects a section outline into the result.
    #[cfg(feature = "bookmarks")]
    pub fn render_with_bookmarks(&self) -> Result<RenderedPdf, Error> {
        let rendered = self.render()?;
        let bytes = crate::bookmarks::add_section_outline(
            &rendered.bytes,
            &self.sections,
            &rendered.section_pages,
        )
        .map_err(|err| {
            Error::new(
                format!("Failed to inject section outline: {}", err),
                ErrorKind::InvalidData,
            )
        })?;
        Ok(RenderedPdf {
            bytes,
            section_pages: rendered.section_pages,
        })
    }
}

struct GuidePageDecorator {
    page: Rc<Cell<usize>>,
    has_cover: bool,
    footer: Option<FooterSpec>,
}

impl PageDecorator for GuidePageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        let page = self.page.get() + 1;
        self.page.set(page);

        let is_cover = self.has_cover && page == 1;
        area.add_margins(if is_cover {
            cover_margins()
        } else {
            content_margins()
        });

        if is_cover {
            return Ok(area);
        }

        if let Some(footer) = &self.footer {
            let available = area.size().height;
            if footer.height > available {
                return Err(Error::new(
                    "Footer height exceeds available space",
                    ErrorKind::InvalidData,
                ));
            }

            let mut footer_area = area.clone();
            footer_area.add_offset(Position::new(0, available - footer.height));
            let mut element = (footer.factory)(page);
            let result = element.render(context, footer_area, style)?;
            if result.has_more {
                return Err(Error::new(
                    "Footer element does not fit into the reserved space",
                    ErrorKind::PageSizeExceeded,
                ));
            }

            area.set_height(available - footer.height);
        }

        Ok(area)
    }
}

/// Records the page the surrounding content lands on into a shared slot.
struct PageMarker {
    page: Rc<Cell<usize>>,
    slot: Rc<Cell<Option<usize>>>,
}

impl Element for PageMarker {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        _area: genpdf::render::Area<'_>,
        _style: Style,
    ) -> Result<genpdf::RenderResult, Error> {
        if self.slot.get().is_none() {
            self.slot.set(Some(self.page.get()));
        }
        Ok(genpdf::RenderResult::default())
    }
}

fn alignment(value: HorizontalAlignment) -> Alignment {
    match value {
        HorizontalAlignment::Left => Alignment::Left,
        HorizontalAlignment::Center => Alignment::Center,
        HorizontalAlignment::Right => Alignment::Right,
    }
}

fn paragraph_element(paragraph: &RichParagraph) -> Paragraph {
    let mut element = Paragraph::default();
    for span in paragraph.spans() {
        let mut string = span.to_styled_string();
        if let Some(size) = paragraph.size() {
            if span.size().is_none() {
                string.style.set_font_size(size);
            }
        }
        element.push(string);
    }
    element.set_alignment(alignment(paragraph.alignment()));
    element
}

fn cover_element(cover: &Cover) -> Result<LinearLayout, Error> {
    let mut layout = LinearLayout::vertical();
    layout.push(Break::new(2));
    layout.push(image_element(cover.image())?);
    layout.push(Break::new(2));
    layout.push(paragraph_element(
        &RichParagraph::new(vec![Span::new(cover.title())
            .bold()
            .sized(COVER_TITLE_SIZE)
            .colored(palette::HEADING_GREEN)])
        .centered(),
    ));
    layout.push(Break::new(1));
    layout.push(paragraph_element(
        &RichParagraph::new(vec![Span::new(cover.subtitle())
            .sized(COVER_SUBTITLE_SIZE)
            .colored(palette::ACCENT_GREEN)])
        .centered(),
    ));
    Ok(layout)
}

fn push_section(document: &mut genpdf::Document, section: &Section) -> Result<(), Error> {
    document.push(paragraph_element(
        &RichParagraph::new(vec![Span::new(section.title())
            .bold()
            .sized(SECTION_TITLE_SIZE)
            .colored(palette::HEADING_GREEN)])
        .centered(),
    ));
    document.push(Break::new(1));

    for block in section.blocks() {
        push_block(document, block)?;
        document.push(Break::new(0.5));
    }

    Ok(())
}

fn push_block(document: &mut genpdf::Document, block: &Block) -> Result<(), Error> {
    match block {
        Block::Paragraph(paragraph) => document.push(paragraph_element(paragraph)),
        Block::Subheading(title) => document.push(subheading_element(title)),
        Block::Image(image) => document.push(image_element(image)?),
        Block::Callout(callout) => document.push(callout_element(callout)),
        Block::Bullets(list) => document.push(bullets_element(list.items())),
        Block::Product(card) => document.push(product_element(card)?),
        Block::Table(table) => document.push(table_element(table)?),
        Block::Price(price) => document.push(price_element(price)),
        Block::Cta(cta) => document.push(cta_element(cta)),
    }
    Ok(())
}

fn subheading_element(title: &str) -> DecoratedLine {
    let span = Span::new(title)
        .bold()
        .sized(SUBHEADING_SIZE)
        .colored(palette::SUBHEAD_GREEN)
        .underline();
    DecoratedLine::new([DecoratedString::from(span)])
        .with_underline_color(palette::RULE_GREEN)
        .with_underline_offset(mm_from_f64(1.2))
}

fn image_element(block: &ImageBlock) -> Result<ImageFigure, Error> {
    let figure = match block.source() {
        ImageSource::Bytes(bytes) => ImageFigure::from_bytes(bytes)?,
        ImageSource::Path(path) => ImageFigure::from_path(path)?,
    };

    let mut figure = figure
        .with_alignment(alignment(block.alignment()))
        .with_width_mm(block.width_mm());
    if let Some(caption) = block.caption() {
        figure = figure.with_caption(paragraph_element(caption));
    }
    Ok(figure)
}

fn rule_color(tone: CalloutTone) -> genpdf::style::Color {
    match tone {
        CalloutTone::Warning => palette::BADGE_RED,
        CalloutTone::Science => palette::SCIENCE_BLUE,
    }
}

fn callout_element(callout: &Callout) -> RuledCallout {
    let mut element = RuledCallout::new(rule_color(callout.tone()));
    if let Some(title) = callout.title() {
        element = element.with_element(paragraph_element(title));
    }
    for paragraph in callout.body() {
        element = element.with_element(paragraph_element(paragraph));
    }
    element
}

fn bullets_element(items: &[RichParagraph]) -> UnorderedList {
    let mut list = UnorderedList::with_bullet("•");
    for item in items {
        list.push(paragraph_element(item));
    }
    list
}

fn product_element(card: &ProductCard) -> Result<LinearLayout, Error> {
    let mut layout = LinearLayout::vertical();
    layout.push(paragraph_element(&RichParagraph::new(vec![Span::new(
        card.name(),
    )
    .bold()
    .sized(PRODUCT_NAME_SIZE)
    .colored(palette::HEADING_GREEN)])));
    layout.push(paragraph_element(&RichParagraph::new(vec![Span::new(
        card.tagline(),
    )
    .sized(PRODUCT_TAGLINE_SIZE)
    .colored(palette::TAGLINE_OLIVE)])));
    layout.push(Break::new(0.5));
    layout.push(image_element(card.image())?);
    layout.push(Break::new(0.5));
    layout.push(paragraph_element(card.lead()));
    layout.push(Break::new(0.3));
    layout.push(bullets_element(card.benefits().items()));
    layout.push(Break::new(0.3));
    layout.push(
        RuledCallout::new(palette::SCIENCE_BLUE).with_element(paragraph_element(card.fact())),
    );
    layout.push(Break::new(0.5));
    layout.push(cta_element(card.cta()));
    Ok(layout)
}

fn table_element(table: &ResultsTable) -> Result<TableLayout, Error> {
    let mut element = TableLayout::new(vec![1, 2]);
    element.set_cell_decorator(FrameCellDecorator::new(true, true, false));

    let mut header_style = Style::new().with_color(palette::SUBHEAD_GREEN);
    header_style.set_bold();

    element
        .row()
        .element(
            Paragraph::new(table.period_header())
                .styled(header_style)
                .padded(1),
        )
        .element(
            Paragraph::new(table.effect_header())
                .styled(header_style)
                .padded(1),
        )
        .push()?;

    let mut period_style = Style::new();
    period_style.set_bold();

    for (period, effect) in table.rows() {
        element
            .row()
            .element(
                Paragraph::new(period.as_str())
                    .styled(period_style)
                    .padded(1),
            )
            .element(Paragraph::new(effect.as_str()).padded(1))
            .push()?;
    }

    Ok(element)
}

fn price_element(price: &PriceBox) -> FramedPanel {
    let old_price = Span::new(price.old_price())
        .strikethrough()
        .sized(16)
        .colored(palette::MUTED_GRAY);

    let mut club_price = Paragraph::default();
    club_price.push(
        Span::new(price.new_price())
            .bold()
            .sized(30)
            .colored(palette::SUBHEAD_GREEN)
            .to_styled_string(),
    );
    club_price.push(Span::new(" ").sized(12).to_styled_string());
    club_price.push(
        Span::new(price.new_price_suffix())
            .sized(12)
            .colored(palette::BODY_INK)
            .to_styled_string(),
    );
    club_price.set_alignment(Alignment::Center);

    FramedPanel::new(palette::PRICE_AMBER)
        .with_element(paragraph_element(
            &RichParagraph::new(vec![Span::new(price.heading())
                .sized(12)
                .colored(palette::BODY_INK)])
            .centered(),
        ))
        .with_element(
            DecoratedLine::new([DecoratedString::from(old_price)])
                .with_alignment(Alignment::Center),
        )
        .with_element(club_price)
        .with_element(paragraph_element(
            &RichParagraph::new(vec![Span::new(price.badge())
                .bold()
                .sized(12)
                .colored(palette::BADGE_RED)])
            .centered(),
        ))
        .with_element(Break::new(0.5))
        .with_element(paragraph_element(price.note()))
}

fn cta_accent_color(accent: CtaAccent) -> genpdf::style::Color {
    match accent {
        CtaAccent::Primary => palette::SUBHEAD_GREEN,
        CtaAccent::Secondary => palette::SCIENCE_INK,
    }
}

fn cta_element(cta: &CallToAction) -> LinearLayout {
    let color = cta_accent_color(cta.accent());
    let label_size = if cta.is_emphasized() { 16 } else { 14 };

    let mut layout = LinearLayout::vertical();
    layout.push(paragraph_element(
        &RichParagraph::new(vec![Span::new(cta.label())
            .bold()
            .sized(label_size)
            .colored(color)])
        .centered(),
    ));
    layout.push(
        DecoratedLine::new([DecoratedString::from(
            Span::new(cta.url()).sized(10).colored(color).underline(),
        )])
        .with_alignment(Alignment::Center),
    );
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Span;
    use crate::model::Section;

    #[test]
    fn alignment_mapping() {
        assert!(matches!(
            alignment(HorizontalAlignment::Center),
            Alignment::Center
        ));
        assert!(matches!(
            alignment(HorizontalAlignment::Right),
            Alignment::Right
        ));
    }

    #[test]
    fn builder_keeps_section_order() {
        let builder = PdfBuilder::new()
            .add_section(Section::new("Первая"))
            .add_section(Section::new("Вторая"));
        let titles: Vec<&str> = builder
            .sections()
            .iter()
            .map(|section| section.title())
            .collect();
        assert_eq!(titles, ["Первая", "Вторая"]);
    }

    #[test]
    fn paragraph_size_skips_spans_with_explicit_size() {
        let paragraph = RichParagraph::new(vec![
            Span::new("большой").sized(30),
            Span::new("обычный"),
        ])
        .with_size(14);
        // The styled strings are not inspectable through Paragraph, so this
        // exercises the composition path as a smoke test.
        let _ = paragraph_element(&paragraph);
        assert_eq!(paragraph.spans()[0].size(), Some(30));
        assert_eq!(paragraph.spans()[1].size(), None);
    }
}
