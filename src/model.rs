//! Typed content model for the lead magnet.
//!
//! The types here describe the document logically, without referencing the
//! rendering crate: paragraphs of styled spans, images, the callout and card
//! shapes the original template styled with CSS classes, and the section list
//! that drives pagination and outline entries.  The builder module maps this
//! model onto `genpdf` elements.

use std::path::PathBuf;

use crate::markup::Span;

/// Horizontal alignment for paragraphs and images.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    /// Left aligned content.
    #[default]
    Left,
    /// Center aligned content.
    Center,
    /// Right aligned content.
    Right,
}

/// A paragraph of styled spans with alignment and an optional font size.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RichParagraph {
    spans: Vec<Span>,
    alignment: HorizontalAlignment,
    size: Option<u8>,
}

impl RichParagraph {
    /// Creates a left-aligned paragraph from the provided spans.
    pub fn new(spans: impl Into<Vec<Span>>) -> Self {
        Self {
            spans: spans.into(),
            ..Self::default()
        }
    }

    /// Returns the spans that make up the paragraph.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Returns the configured alignment.
    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    /// Returns the paragraph-wide font size in points, if set.
    pub fn size(&self) -> Option<u8> {
        self.size
    }

    /// Sets the alignment and returns the updated paragraph.
    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Sets a paragraph-wide font size and returns the updated paragraph.
    pub fn with_size(mut self, size: u8) -> Self {
        self.size = Some(size);
        self
    }

    /// Shorthand for a centered paragraph.
    pub fn centered(self) -> Self {
        self.with_alignment(HorizontalAlignment::Center)
    }
}

/// Image sources supported by the content model.
#[derive(Clone, Debug, PartialEq)]
pub enum ImageSource {
    /// Image held as raw encoded bytes.
    Bytes(Vec<u8>),
    /// Image referenced by a file path.
    Path(PathBuf),
}

impl ImageSource {
    /// Creates an in-memory image source.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Creates a file-backed image source.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }
}

/// An image with optional caption, alignment and width constraint.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBlock {
    source: ImageSource,
    caption: Option<RichParagraph>,
    alignment: HorizontalAlignment,
    width_mm: Option<f64>,
}

impl ImageBlock {
    /// Creates a new image block from the given source.
    pub fn new(source: ImageSource) -> Self {
        Self {
            source,
            caption: None,
            alignment: HorizontalAlignment::Left,
            width_mm: None,
        }
    }

    /// Returns the image source.
    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    /// Returns the caption, if any.
    pub fn caption(&self) -> Option<&RichParagraph> {
        self.caption.as_ref()
    }

    /// Returns the configured alignment.
    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    /// Returns the requested rendered width in millimetres, if any.
    pub fn width_mm(&self) -> Option<f64> {
        self.width_mm
    }

    /// Sets the caption and returns the updated block.
    pub fn with_caption(mut self, caption: impl Into<Option<RichParagraph>>) -> Self {
        self.caption = caption.into();
        self
    }

    /// Sets the alignment and returns the updated block.
    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Constrains the rendered width in millimetres and returns the updated block.
    pub fn with_width_mm(mut self, width_mm: impl Into<Option<f64>>) -> Self {
        self.width_mm = width_mm.into();
        self
    }
}

/// Visual tone of a [`Callout`], selecting the rule color and title ink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalloutTone {
    /// Red-ruled alert box.
    Warning,
    /// Blue-ruled science-fact box.
    Science,
}

/// A left-ruled callout box with an optional title and body paragraphs.
#[derive(Clone, Debug, PartialEq)]
pub struct Callout {
    tone: CalloutTone,
    title: Option<RichParagraph>,
    body: Vec<RichParagraph>,
}

impl Callout {
    /// Creates an empty callout with the given tone.
    pub fn new(tone: CalloutTone) -> Self {
        Self {
            tone,
            title: None,
            body: Vec::new(),
        }
    }

    /// Returns the tone of the callout.
    pub fn tone(&self) -> CalloutTone {
        self.tone
    }

    /// Returns the title paragraph, if any.
    pub fn title(&self) -> Option<&RichParagraph> {
        self.title.as_ref()
    }

    /// Returns the body paragraphs.
    pub fn body(&self) -> &[RichParagraph] {
        &self.body
    }

    /// Sets the title and returns the updated callout.
    pub fn with_title(mut self, title: impl Into<Option<RichParagraph>>) -> Self {
        self.title = title.into();
        self
    }

    /// Appends a body paragraph and returns the updated callout.
    pub fn with_paragraph(mut self, paragraph: RichParagraph) -> Self {
        self.body.push(paragraph);
        self
    }
}

/// A bulleted list of rich paragraphs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BulletList {
    items: Vec<RichParagraph>,
}

impl BulletList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the list items.
    pub fn items(&self) -> &[RichParagraph] {
        &self.items
    }

    /// Appends an item and returns the updated list.
    pub fn with_item(mut self, item: RichParagraph) -> Self {
        self.items.push(item);
        self
    }

    /// Extends the list with multiple items and returns the updated list.
    pub fn with_items<I>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = RichParagraph>,
    {
        self.items.extend(items);
        self
    }
}

/// Accent color family for a [`CallToAction`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CtaAccent {
    /// Green, used for shop links.
    #[default]
    Primary,
    /// Blue, used for the secondary order link.
    Secondary,
}

/// A call-to-action label with its destination URL.
///
/// `genpdf` has no link annotations, so the URL is rendered underneath the
/// label as underlined text rather than as a clickable region.
#[derive(Clone, Debug, PartialEq)]
pub struct CallToAction {
    label: String,
    url: String,
    accent: CtaAccent,
    emphasized: bool,
}

impl CallToAction {
    /// Creates a primary call to action.
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            accent: CtaAccent::Primary,
            emphasized: false,
        }
    }

    /// Returns the label text.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the destination URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the accent family.
    pub fn accent(&self) -> CtaAccent {
        self.accent
    }

    /// Returns whether the label is rendered oversized.
    pub fn is_emphasized(&self) -> bool {
        self.emphasized
    }

    /// Sets the accent family and returns the updated value.
    pub fn with_accent(mut self, accent: CtaAccent) -> Self {
        self.accent = accent;
        self
    }

    /// Renders the label oversized, as the closing registration button.
    pub fn emphasized(mut self) -> Self {
        self.emphasized = true;
        self
    }
}

/// One product card: name, tagline, image, pitch, benefits, fact, shop link.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductCard {
    name: String,
    tagline: String,
    image: ImageBlock,
    lead: RichParagraph,
    benefits: BulletList,
    fact: RichParagraph,
    cta: CallToAction,
}

impl ProductCard {
    /// Creates a product card from all of its parts.
    pub fn new(
        name: impl Into<String>,
        tagline: impl Into<String>,
        image: ImageBlock,
        lead: RichParagraph,
        benefits: BulletList,
        fact: RichParagraph,
        cta: CallToAction,
    ) -> Self {
        Self {
            name: name.into(),
            tagline: tagline.into(),
            image,
            lead,
            benefits,
            fact,
            cta,
        }
    }

    /// Returns the product name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tagline shown under the name.
    pub fn tagline(&self) -> &str {
        &self.tagline
    }

    /// Returns the product image.
    pub fn image(&self) -> &ImageBlock {
        &self.image
    }

    /// Returns the lead paragraph.
    pub fn lead(&self) -> &RichParagraph {
        &self.lead
    }

    /// Returns the benefit list.
    pub fn benefits(&self) -> &BulletList {
        &self.benefits
    }

    /// Returns the science-fact paragraph.
    pub fn fact(&self) -> &RichParagraph {
        &self.fact
    }

    /// Returns the shop call to action.
    pub fn cta(&self) -> &CallToAction {
        &self.cta
    }
}

/// The day-by-day results table.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultsTable {
    period_header: String,
    effect_header: String,
    rows: Vec<(String, String)>,
}

impl ResultsTable {
    /// Creates a table with the given column headers.
    pub fn new(period_header: impl Into<String>, effect_header: impl Into<String>) -> Self {
        Self {
            period_header: period_header.into(),
            effect_header: effect_header.into(),
            rows: Vec::new(),
        }
    }

    /// Returns the header of the period column.
    pub fn period_header(&self) -> &str {
        &self.period_header
    }

    /// Returns the header of the effect column.
    pub fn effect_header(&self) -> &str {
        &self.effect_header
    }

    /// Returns the table rows.
    pub fn rows(&self) -> &[(String, String)] {
        &self.rows
    }

    /// Appends a row and returns the updated table.
    pub fn with_row(mut self, period: impl Into<String>, effect: impl Into<String>) -> Self {
        self.rows.push((period.into(), effect.into()));
        self
    }
}

/// The framed price box.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceBox {
    heading: String,
    old_price: String,
    new_price: String,
    new_price_suffix: String,
    badge: String,
    note: RichParagraph,
}

impl PriceBox {
    /// Creates a price box from all of its parts.
    pub fn new(
        heading: impl Into<String>,
        old_price: impl Into<String>,
        new_price: impl Into<String>,
        new_price_suffix: impl Into<String>,
        badge: impl Into<String>,
        note: RichParagraph,
    ) -> Self {
        Self {
            heading: heading.into(),
            old_price: old_price.into(),
            new_price: new_price.into(),
            new_price_suffix: new_price_suffix.into(),
            badge: badge.into(),
            note,
        }
    }

    /// Returns the heading line.
    pub fn heading(&self) -> &str {
        &self.heading
    }

    /// Returns the struck-through retail price.
    pub fn old_price(&self) -> &str {
        &self.old_price
    }

    /// Returns the highlighted club price.
    pub fn new_price(&self) -> &str {
        &self.new_price
    }

    /// Returns the text printed after the club price.
    pub fn new_price_suffix(&self) -> &str {
        &self.new_price_suffix
    }

    /// Returns the savings badge text.
    pub fn badge(&self) -> &str {
        &self.badge
    }

    /// Returns the closing note paragraph.
    pub fn note(&self) -> &RichParagraph {
        &self.note
    }
}

/// Content blocks that make up a section.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    /// Styled paragraph content.
    Paragraph(RichParagraph),
    /// A subheading with a light-green rule underneath.
    Subheading(String),
    /// Captioned image content.
    Image(ImageBlock),
    /// Left-ruled callout box.
    Callout(Callout),
    /// Bulleted list.
    Bullets(BulletList),
    /// Product card.
    Product(Box<ProductCard>),
    /// Day-by-day results table.
    Table(ResultsTable),
    /// Framed price box.
    Price(PriceBox),
    /// Call-to-action label with URL.
    Cta(CallToAction),
}

impl Block {
    /// Convenience helper for building a subheading block.
    pub fn subheading(title: impl Into<String>) -> Self {
        Self::Subheading(title.into())
    }

    /// Convenience helper for building a product block.
    pub fn product(card: ProductCard) -> Self {
        Self::Product(Box::new(card))
    }
}

/// The cover page: hero image, title and subtitle.
#[derive(Clone, Debug, PartialEq)]
pub struct Cover {
    title: String,
    subtitle: String,
    image: ImageBlock,
}

impl Cover {
    /// Creates a cover from its title, subtitle and hero image.
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>, image: ImageBlock) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            image,
        }
    }

    /// Returns the cover title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the cover subtitle.
    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    /// Returns the hero image.
    pub fn image(&self) -> &ImageBlock {
        &self.image
    }
}

/// A document section: title, optional outline identifier, content blocks.
///
/// Each section starts on a fresh page, matching the original template's
/// forced page break before every top-level heading.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    identifier: Option<String>,
    title: String,
    blocks: Vec<Block>,
}

impl Section {
    /// Creates an empty section with the provided title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            identifier: None,
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    /// Returns the outline identifier, if any.
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Returns the section title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the content blocks.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Sets the outline identifier and returns the updated section.
    pub fn with_identifier(mut self, identifier: impl Into<Option<String>>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// Appends a block and returns the updated section.
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Extends the section with multiple blocks and returns the updated section.
    pub fn with_blocks<I>(mut self, blocks: I) -> Self
    where
        I: IntoIterator<Item = Block>,
    {
        self.blocks.extend(blocks);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Span;

    #[test]
    fn paragraph_defaults() {
        let paragraph = RichParagraph::new(vec![Span::new("x")]);
        assert_eq!(paragraph.alignment(), HorizontalAlignment::Left);
        assert_eq!(paragraph.size(), None);

        let centered = paragraph.centered().with_size(14);
        assert_eq!(centered.alignment(), HorizontalAlignment::Center);
        assert_eq!(centered.size(), Some(14));
    }

    #[test]
    fn results_table_collects_rows() {
        let table = ResultsTable::new("Срок", "Что почувствуешь")
            .with_row("День 3-5", "Уходит вздутие")
            .with_row("День 30", "Ясная голова");
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.rows()[0].0, "День 3-5");
    }

    #[test]
    fn section_keeps_block_order() {
        let section = Section::new("Решение существует")
            .with_identifier(Some("solution".to_string()))
            .with_block(Block::subheading("CORAL DETOX"))
            .with_block(Block::Paragraph(RichParagraph::new(vec![Span::new(
                "4 продукта.",
            )])));
        assert_eq!(section.identifier(), Some("solution"));
        assert!(matches!(section.blocks()[0], Block::Subheading(_)));
        assert!(matches!(section.blocks()[1], Block::Paragraph(_)));
    }

    #[test]
    fn cta_builder_flags() {
        let cta = CallToAction::new("ЗАКАЗАТЬ", "https://example.com")
            .with_accent(CtaAccent::Secondary)
            .emphasized();
        assert_eq!(cta.accent(), CtaAccent::Secondary);
        assert!(cta.is_emphasized());
    }
}
