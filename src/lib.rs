//! Assembles the Coral Detox lead magnet PDF from its fixed content and assets.

pub mod assets;
pub mod builder;
pub mod content;
pub mod elements;
pub mod fonts;
pub mod markup;
pub mod model;
pub mod palette;

#[cfg(feature = "bookmarks")]
pub mod bookmarks;
