//! Color palette lifted from the original template stylesheet.

use genpdf::style::Color;

/// Darkest green, used for section titles and product names.
pub const HEADING_GREEN: Color = Color::Rgb(0x1B, 0x5E, 0x20);

/// Mid green for subheadings and primary call-to-action labels.
pub const SUBHEAD_GREEN: Color = Color::Rgb(0x2E, 0x7D, 0x32);

/// Lighter green accents (cover subtitle, minor headings).
pub const ACCENT_GREEN: Color = Color::Rgb(0x38, 0x8E, 0x3C);

/// Pale green rule drawn under subheadings.
pub const RULE_GREEN: Color = Color::Rgb(0x81, 0xC7, 0x84);

/// Olive tone for product taglines.
pub const TAGLINE_OLIVE: Color = Color::Rgb(0x55, 0x8B, 0x2F);

/// Dark red for alert titles and urgent copy.
pub const ALERT_RED: Color = Color::Rgb(0xC6, 0x28, 0x28);

/// Bright red for the alert rule and the savings badge.
pub const BADGE_RED: Color = Color::Rgb(0xE5, 0x39, 0x35);

/// Blue rule next to science-fact callouts.
pub const SCIENCE_BLUE: Color = Color::Rgb(0x19, 0x76, 0xD2);

/// Dark blue for science-fact text and secondary call-to-action labels.
pub const SCIENCE_INK: Color = Color::Rgb(0x0D, 0x47, 0xA1);

/// Amber frame around the price box.
pub const PRICE_AMBER: Color = Color::Rgb(0xFF, 0xC1, 0x07);

/// Muted gray for struck-through prices and the legal footer.
pub const MUTED_GRAY: Color = Color::Rgb(0x99, 0x99, 0x99);

/// Default body ink.
pub const BODY_INK: Color = Color::Rgb(0x33, 0x33, 0x33);
