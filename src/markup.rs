//! Inline markup for the guide copy.
//!
//! The document text is authored as plain strings with a small markdown-inspired
//! syntax for the inline decorations the original template used everywhere
//! (bold claims, colored highlights, underlined links, a struck-through price).
//! [`parse_markup`] turns such a string into [`Span`] values, which carry the
//! styling attributes that [`genpdf`] supports natively plus the underline and
//! strikethrough flags it does not.  The flags are preserved through
//! [`DecoratedString`] so the element layer can draw the missing strokes itself.

use std::fmt;

use genpdf::style::{Color, Style, StyledString};

/// A text fragment together with its inline style attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    text: String,
    bold: bool,
    italic: bool,
    underline: bool,
    strikethrough: bool,
    color: Option<Color>,
    size: Option<u8>,
}

impl Span {
    /// Creates an unstyled span with the provided text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Returns the raw text of the span.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the span is bold.
    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Returns whether the span is italic.
    pub fn is_italic(&self) -> bool {
        self.italic
    }

    /// Returns whether the span is underlined.
    pub fn is_underlined(&self) -> bool {
        self.underline
    }

    /// Returns whether the span is struck through.
    pub fn is_struck(&self) -> bool {
        self.strikethrough
    }

    /// Returns the span color, if one was assigned.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Returns the explicit font size in points, if one was assigned.
    pub fn size(&self) -> Option<u8> {
        self.size
    }

    /// Marks the span as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Marks the span as italic.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Marks the span as underlined.
    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Marks the span as struck through.
    pub fn strikethrough(mut self) -> Self {
        self.strikethrough = true;
        self
    }

    /// Assigns a color to the span.
    pub fn colored(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Assigns an explicit font size in points.
    pub fn sized(mut self, size: u8) -> Self {
        self.size = Some(size);
        self
    }

    fn to_style(&self) -> Style {
        let mut style = Style::new();
        if let Some(color) = self.color {
            style.set_color(color);
        }
        if let Some(size) = self.size {
            style.set_font_size(size);
        }
        if self.bold {
            style.set_bold();
        }
        if self.italic {
            style.set_italic();
        }
        style
    }

    /// Converts the span to a [`StyledString`], dropping the stroke flags.
    ///
    /// Underline and strikethrough cannot be expressed on a `StyledString`;
    /// callers that need them must go through [`DecoratedString`] instead so
    /// the flags survive to the element layer.
    pub fn to_styled_string(&self) -> StyledString {
        StyledString::new(self.text.clone(), self.to_style())
    }
}

impl From<&Span> for StyledString {
    fn from(span: &Span) -> Self {
        span.to_styled_string()
    }
}

impl From<Span> for StyledString {
    fn from(span: Span) -> Self {
        span.to_styled_string()
    }
}

/// A styled string plus the stroke decorations `genpdf` cannot carry.
#[derive(Clone, Debug)]
pub struct DecoratedString {
    /// The styled text fragment.
    pub string: StyledString,
    /// Whether an underline stroke should be drawn beneath the fragment.
    pub underline: bool,
    /// Whether a strikethrough stroke should be drawn across the fragment.
    pub strikethrough: bool,
}

impl DecoratedString {
    /// Creates a decorated string from its parts.
    pub fn new(string: StyledString, underline: bool, strikethrough: bool) -> Self {
        Self {
            string,
            underline,
            strikethrough,
        }
    }
}

impl From<&Span> for DecoratedString {
    fn from(span: &Span) -> Self {
        DecoratedString::new(span.to_styled_string(), span.underline, span.strikethrough)
    }
}

impl From<Span> for DecoratedString {
    fn from(span: Span) -> Self {
        DecoratedString::from(&span)
    }
}

/// Parse errors produced by [`parse_markup`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    index: usize,
    message: String,
}

impl ParseError {
    fn new(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
        }
    }

    /// Byte index in the input where the error was detected.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Human-readable description of the error.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte {})", self.message, self.index)
    }
}

impl std::error::Error for ParseError {}

#[derive(Clone, Copy, Debug, Default)]
struct StyleState {
    bold: bool,
    italic: bool,
    underline: bool,
    strikethrough: bool,
    color: Option<Color>,
}

impl StyleState {
    fn to_span(self, text: impl Into<String>) -> Span {
        Span {
            text: text.into(),
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
            strikethrough: self.strikethrough,
            color: self.color,
            size: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Marker {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Color,
}

impl Marker {
    fn closing_token(self) -> &'static str {
        match self {
            Marker::Bold => "**",
            Marker::Italic => "*",
            Marker::Underline => "__",
            Marker::Strikethrough => "~~",
            Marker::Color => "}",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Marker::Bold => "bold span",
            Marker::Italic => "italic span",
            Marker::Underline => "underline span",
            Marker::Strikethrough => "strikethrough span",
            Marker::Color => "color span",
        }
    }

    fn apply(self, mut state: StyleState, color: Option<Color>) -> StyleState {
        match self {
            Marker::Bold => state.bold = true,
            Marker::Italic => state.italic = true,
            Marker::Underline => state.underline = true,
            Marker::Strikethrough => state.strikethrough = true,
            Marker::Color => state.color = color,
        }
        state
    }
}

/// Parses the inline markup syntax into a list of [`Span`]s.
///
/// Supported constructs:
///
/// - `**bold**`
/// - `*italic*`
/// - `__underline__`
/// - `~~strikethrough~~`
/// - `[color=#RRGGBB]{text}` for colored runs
///
/// Constructs nest freely.  Malformed input yields a [`ParseError`] carrying
/// the byte index of the offending token.  Font sizes are not expressible in
/// markup; callers assign them on the parsed spans or the owning paragraph.
pub fn parse_markup(input: &str) -> Result<Vec<Span>, ParseError> {
    let (spans, consumed) = parse_inner(input, 0, StyleState::default(), None)?;
    debug_assert_eq!(consumed, input.len());
    Ok(spans)
}

fn opening_marker(rest: &str) -> Option<(Marker, usize)> {
    // Two-character tokens take precedence over `*`.
    if rest.starts_with("**") {
        Some((Marker::Bold, 2))
    } else if rest.starts_with("__") {
        Some((Marker::Underline, 2))
    } else if rest.starts_with("~~") {
        Some((Marker::Strikethrough, 2))
    } else if rest.starts_with('*') {
        Some((Marker::Italic, 1))
    } else {
        None
    }
}

fn parse_inner(
    input: &str,
    mut index: usize,
    state: StyleState,
    closing_marker: Option<Marker>,
) -> Result<(Vec<Span>, usize), ParseError> {
    let mut spans = Vec::new();
    let mut buffer = String::new();

    while index < input.len() {
        let rest = &input[index..];

        if let Some(marker) = closing_marker {
            if rest.starts_with(marker.closing_token()) {
                flush_buffer(&mut buffer, &mut spans, state);
                return Ok((spans, index + marker.closing_token().len()));
            }
        }

        if let Some((marker, token_len)) = opening_marker(rest) {
            flush_buffer(&mut buffer, &mut spans, state);
            index += token_len;
            let (nested, after) =
                parse_inner(input, index, marker.apply(state, None), Some(marker))?;
            spans.extend(nested);
            index = after;
            continue;
        }

        if rest.starts_with("[color=") {
            let (color, after_directive) = parse_color_directive(input, index)?;
            flush_buffer(&mut buffer, &mut spans, state);
            let (nested, after) = parse_inner(
                input,
                after_directive,
                Marker::Color.apply(state, Some(color)),
                Some(Marker::Color),
            )?;
            spans.extend(nested);
            index = after;
            continue;
        }

        if rest.starts_with('}') {
            return Err(ParseError::new(
                index,
                "unexpected closing token `}` without matching opening `[color=...]`",
            ));
        }

        if rest.starts_with(']') {
            return Err(ParseError::new(index, "unexpected closing token `]`"));
        }

        if rest.starts_with('[') {
            return Err(ParseError::new(
                index,
                "unsupported directive; expected `[color=#RRGGBB]{...}`",
            ));
        }

        let ch = rest.chars().next().expect("non-empty remainder");
        buffer.push(ch);
        index += ch.len_utf8();
    }

    if let Some(marker) = closing_marker {
        Err(ParseError::new(
            index,
            format!("unterminated {}", marker.description()),
        ))
    } else {
        flush_buffer(&mut buffer, &mut spans, state);
        Ok((spans, index))
    }
}

fn flush_buffer(buffer: &mut String, spans: &mut Vec<Span>, state: StyleState) {
    if buffer.is_empty() {
        return;
    }
    spans.push(state.to_span(std::mem::take(buffer)));
}

fn parse_color_directive(input: &str, index: usize) -> Result<(Color, usize), ParseError> {
    const PREFIX: &str = "[color=";
    let hash_index = index + PREFIX.len();
    if !input[hash_index..].starts_with('#') {
        return Err(ParseError::new(
            hash_index,
            "expected `#` followed by a hexadecimal RGB value",
        ));
    }

    let hex_start = hash_index + 1;
    let hex_end = hex_start + 6;
    if hex_end > input.len() {
        return Err(ParseError::new(
            hex_start,
            "incomplete color specification; expected 6 hexadecimal digits",
        ));
    }

    let hex = &input[hex_start..hex_end];
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ParseError::new(
            hex_start,
            "invalid RGB specification; use hexadecimal digits only",
        ));
    }

    let r = u8::from_str_radix(&hex[0..2], 16).expect("validated hex digits");
    let g = u8::from_str_radix(&hex[2..4], 16).expect("validated hex digits");
    let b = u8::from_str_radix(&hex[4..6], 16).expect("validated hex digits");

    if !input[hex_end..].starts_with(']') {
        return Err(ParseError::new(
            hex_end,
            "expected `]` to close color directive",
        ));
    }

    let brace_index = hex_end + 1;
    if !input[brace_index..].starts_with('{') {
        return Err(ParseError::new(
            brace_index,
            "expected `{` to start the colored text",
        ));
    }

    Ok((Color::Rgb(r, g, b), brace_index + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_style_reflects_flags() {
        let span = Span::new("Текст")
            .bold()
            .italic()
            .sized(14)
            .colored(Color::Rgb(10, 20, 30));
        let styled = span.to_styled_string();
        assert_eq!(styled.s, "Текст");
        assert!(styled.style.is_bold());
        assert!(styled.style.is_italic());
        assert_eq!(styled.style.font_size(), 14);
        assert_eq!(styled.style.color(), Some(Color::Rgb(10, 20, 30)));
    }

    #[test]
    fn decorated_string_keeps_stroke_flags() {
        let link = DecoratedString::from(Span::new("coralclub.us").underline());
        assert!(link.underline);
        assert!(!link.strikethrough);

        let price = DecoratedString::from(Span::new("$107").strikethrough());
        assert!(price.strikethrough);
        assert!(!price.underline);
    }

    #[test]
    fn parse_plain_text() {
        let spans = parse_markup("Разработано в Японии.").expect("parse succeeds");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text(), "Разработано в Японии.");
        assert!(!spans[0].is_bold());
    }

    #[test]
    fn parse_bold_run() {
        let spans = parse_markup("**2-5 кг токсинов** в теле").expect("parse succeeds");
        assert_eq!(spans.len(), 2);
        assert!(spans[0].is_bold());
        assert_eq!(spans[0].text(), "2-5 кг токсинов");
        assert!(!spans[1].is_bold());
    }

    #[test]
    fn parse_nested_styles() {
        let spans = parse_markup("This is **very *cool***!").expect("parse succeeds");
        assert_eq!(spans.len(), 4);
        assert!(!spans[0].is_bold());
        assert!(spans[1].is_bold());
        assert!(!spans[1].is_italic());
        assert!(spans[2].is_bold());
        assert!(spans[2].is_italic());
        assert_eq!(spans[3].text(), "!");
    }

    #[test]
    fn parse_underline_run() {
        let spans = parse_markup("ссылка: __coralclub.us__").expect("parse succeeds");
        assert_eq!(spans.len(), 2);
        assert!(!spans[0].is_underlined());
        assert!(spans[1].is_underlined());
        assert_eq!(spans[1].text(), "coralclub.us");
    }

    #[test]
    fn parse_strikethrough_run() {
        let spans = parse_markup("~~$107~~ $85").expect("parse succeeds");
        assert_eq!(spans.len(), 2);
        assert!(spans[0].is_struck());
        assert_eq!(spans[0].text(), "$107");
        assert!(!spans[1].is_struck());
    }

    #[test]
    fn parse_color_run() {
        let spans = parse_markup("[color=#c62828]{важно} дальше").expect("parse succeeds");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].color(), Some(Color::Rgb(0xc6, 0x28, 0x28)));
        assert_eq!(spans[0].text(), "важно");
        assert_eq!(spans[1].color(), None);
    }

    #[test]
    fn error_on_unterminated_bold() {
        let err = parse_markup("**oops").unwrap_err();
        assert!(err.message().contains("unterminated bold"));
    }

    #[test]
    fn error_on_unterminated_strikethrough() {
        let err = parse_markup("~~oops").unwrap_err();
        assert!(err.message().contains("unterminated strikethrough"));
    }

    #[test]
    fn error_on_invalid_color() {
        let err = parse_markup("[color=#12FG34]{x}").unwrap_err();
        assert!(err.message().contains("invalid RGB"));
    }

    #[test]
    fn error_reports_byte_index() {
        let err = parse_markup("ok }").unwrap_err();
        assert_eq!(err.index(), 3);
    }
}
