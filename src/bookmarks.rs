//! Section outline injection built on top of `lopdf`.
//!
//! `genpdf` writes a flat page stream with no outline tree, so the navigation
//! sidebar is patched in afterwards: the rendered bytes are reopened with
//! `lopdf`, an `/Outlines` dictionary is attached to the catalog, and every
//! section that recorded a start page gets a `/Dest [page /Fit]` entry.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::model::Section;

/// Errors that can occur while injecting the section outline.
#[derive(Debug)]
pub enum OutlineError {
    /// The PDF bytes could not be parsed by `lopdf`.
    Parse(lopdf::Error),
    /// The document trailer has no usable catalog reference.
    MissingCatalog,
    /// The catalog object is not a dictionary.
    InvalidCatalog,
    /// A recorded start page does not exist in the rendered document.
    MissingPage {
        /// Index of the section whose page reference failed to resolve.
        section_index: usize,
        /// The requested (1-indexed) page number.
        page_number: usize,
    },
}

impl From<lopdf::Error> for OutlineError {
    fn from(err: lopdf::Error) -> Self {
        Self::Parse(err)
    }
}

impl std::fmt::Display for OutlineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "Failed to parse PDF bytes: {err}"),
            Self::MissingCatalog => write!(f, "PDF catalog entry is missing"),
            Self::InvalidCatalog => write!(f, "PDF catalog entry is not a dictionary"),
            Self::MissingPage {
                section_index,
                page_number,
            } => write!(
                f,
                "Section {} refers to missing page {} for its outline destination",
                section_index, page_number
            ),
        }
    }
}

impl std::error::Error for OutlineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::MissingCatalog | Self::InvalidCatalog | Self::MissingPage { .. } => None,
        }
    }
}

struct OutlineEntry {
    object_id: ObjectId,
    page_ref: ObjectId,
    title: String,
    name: Option<String>,
}

/// Adds a flat outline mapping sections to their start pages.
///
/// Sections whose `section_pages` slot is `None` are skipped.  When nothing
/// remains to link, the input bytes are returned unchanged.
pub fn add_section_outline(
    pdf_bytes: &[u8],
    sections: &[Section],
    section_pages: &[Option<usize>],
) -> Result<Vec<u8>, OutlineError> {
    let mut document = Document::load_mem(pdf_bytes)?;

    let pages = document.get_pages();
    let entries = collect_entries(&mut document, sections, section_pages, &pages)?;
    if entries.is_empty() {
        return Ok(pdf_bytes.to_vec());
    }

    let outlines_id = document.new_object_id();
    insert_entries(&mut document, outlines_id, &entries);
    attach_outline_root(&mut document, outlines_id, &entries)?;

    let mut buffer = Vec::new();
    document.save_to(&mut buffer)?;
    Ok(buffer)
}

fn collect_entries(
    document: &mut Document,
    sections: &[Section],
    section_pages: &[Option<usize>],
    pages: &BTreeMap<u32, ObjectId>,
) -> Result<Vec<OutlineEntry>, OutlineError> {
    let mut entries = Vec::new();

    for (index, (section, maybe_page)) in sections.iter().zip(section_pages.iter()).enumerate() {
        let Some(page_number) = *maybe_page else {
            continue;
        };

        let page_ref = pages
            .get(&(page_number as u32))
            .copied()
            .ok_or(OutlineError::MissingPage {
                section_index: index,
                page_number,
            })?;

        entries.push(OutlineEntry {
            object_id: document.new_object_id(),
            page_ref,
            title: section.title().to_string(),
            name: section.identifier().map(str::to_string),
        });
    }

    Ok(entries)
}

fn insert_entries(document: &mut Document, outlines_id: ObjectId, entries: &[OutlineEntry]) {
    for (index, entry) in entries.iter().enumerate() {
        let mut dictionary = Dictionary::new();
        dictionary.set("Title", Object::string_literal(entry.title.as_str()));
        dictionary.set(
            "Dest",
            Object::Array(vec![
                Object::Reference(entry.page_ref),
                Object::Name("Fit".into()),
            ]),
        );
        dictionary.set("Parent", Object::Reference(outlines_id));
        if let Some(name) = &entry.name {
            dictionary.set("NM", Object::string_literal(name.as_str()));
        }
        if index > 0 {
            dictionary.set("Prev", Object::Reference(entries[index - 1].object_id));
        }
        if let Some(next) = entries.get(index + 1) {
            dictionary.set("Next", Object::Reference(next.object_id));
        }

        document
            .objects
            .insert(entry.object_id, Object::Dictionary(dictionary));
    }
}

fn attach_outline_root(
    document: &mut Document,
    outlines_id: ObjectId,
    entries: &[OutlineEntry],
) -> Result<(), OutlineError> {
    let catalog_id = document
        .trailer
        .get(b"Root")
        .ok()
        .and_then(|object| object.as_reference().ok())
        .ok_or(OutlineError::MissingCatalog)?;

    let mut outlines = Dictionary::new();
    outlines.set("Type", Object::Name("Outlines".into()));
    outlines.set("Count", Object::Integer(entries.len() as i64));
    if let Some(first) = entries.first() {
        outlines.set("First", Object::Reference(first.object_id));
    }
    if let Some(last) = entries.last() {
        outlines.set("Last", Object::Reference(last.object_id));
    }
    document
        .objects
        .insert(outlines_id, Object::Dictionary(outlines));

    let catalog = document
        .objects
        .get_mut(&catalog_id)
        .ok_or(OutlineError::MissingCatalog)?
        .as_dict_mut()
        .map_err(|_| OutlineError::InvalidCatalog)?;
    catalog.set("Outlines", Object::Reference(outlines_id));

    Ok(())
}
