// crates/wiki-validation-core/src/archive.rs
// ============================================================================
// Module: Wiki Archive Reader
// Description: Enumerates documents listed in a wiki archive bundle.
// Purpose: Produce document targets from the archive table of contents.
// Dependencies: roxmltree, zip, wiki-validation-config
// ============================================================================

//! ## Overview
//! A wiki archive is a zip file carrying a `package.xml` table of contents:
//! root, then `files`, then one `file` element per document full name.
//! [`read_archive_contents`] turns those names into [`DocumentReference`]s.
//! Invariants:
//! - An archive without a table of contents yields no documents, not an error.
//! - Every other open, read, or parse failure is fatal.
//! - Names keep table-of-contents order; the filter must match whole names.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::path::Path;

use roxmltree::Document;
use roxmltree::Node;
use roxmltree::ParsingOptions;
use thiserror::Error;
use wiki_validation_config::DEFAULT_WIKI;
use wiki_validation_config::DocumentFilter;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::reference::DocumentReference;
use crate::reference::ReferenceError;
use crate::reference::resolve_document_reference;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Name of the table-of-contents entry inside an archive.
pub const TABLE_OF_CONTENTS_ENTRY: &str = "package.xml";
/// Maximum accepted size of the table of contents, in bytes.
pub const MAX_TABLE_OF_CONTENTS_BYTES: usize = 16 * 1024 * 1024;
/// Element holding the document list.
const FILES_ELEMENT: &str = "files";
/// Element holding one document full name.
const FILE_ELEMENT: &str = "file";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while reading an archive.
///
/// # Invariants
/// - A missing table of contents is never reported through this type.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Archive file could not be opened.
    #[error("cannot open archive {path}: {reason}")]
    Open {
        /// Archive path.
        path: String,
        /// Underlying I/O diagnostic.
        reason: String,
    },
    /// Zip container is malformed or unreadable.
    #[error("archive read failure: {0}")]
    Zip(String),
    /// Table of contents exceeds the size cap.
    #[error("table of contents exceeds {max_bytes} bytes")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
    },
    /// Table of contents is not well-formed XML.
    #[error("table of contents parse failure: {0}")]
    Xml(String),
    /// Table of contents has no `files` element under its root.
    #[error("table of contents has no <files> element")]
    MissingFilesElement,
    /// A listed name could not be resolved into a reference.
    #[error("invalid document name {name}: {source}")]
    Reference {
        /// Offending document name.
        name: String,
        /// Resolution failure.
        source: ReferenceError,
    },
}

// ============================================================================
// SECTION: Archive Reading
// ============================================================================

/// Reads the documents listed in an archive, in the default wiki.
///
/// # Errors
///
/// Returns [`ArchiveError`] when the archive or its table of contents cannot be
/// read; a missing table of contents yields `Ok(vec![])`.
pub fn read_archive_contents(
    path: &Path,
    filter: Option<&DocumentFilter>,
) -> Result<Vec<DocumentReference>, ArchiveError> {
    read_archive_contents_for_wiki(path, filter, DEFAULT_WIKI)
}

/// Reads the documents listed in an archive, prefixing names with `wiki`.
///
/// # Errors
///
/// Returns [`ArchiveError`] when the archive or its table of contents cannot be
/// read; a missing table of contents yields `Ok(vec![])`.
pub fn read_archive_contents_for_wiki(
    path: &Path,
    filter: Option<&DocumentFilter>,
    wiki: &str,
) -> Result<Vec<DocumentReference>, ArchiveError> {
    let file = File::open(path).map_err(|err| ArchiveError::Open {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    let mut archive = ZipArchive::new(file).map_err(|err| ArchiveError::Zip(err.to_string()))?;
    let table_of_contents = match archive.by_name(TABLE_OF_CONTENTS_ENTRY) {
        Ok(entry) => read_entry_text(entry)?,
        Err(ZipError::FileNotFound) => return Ok(Vec::new()),
        Err(err) => return Err(ArchiveError::Zip(err.to_string())),
    };

    parse_table_of_contents(&table_of_contents)?
        .into_iter()
        .filter(|name| filter.is_none_or(|filter| filter.matches(name)))
        .map(|name| {
            resolve_document_reference(&format!("{wiki}:{name}"), wiki).map_err(|source| {
                ArchiveError::Reference {
                    name,
                    source,
                }
            })
        })
        .collect()
}

/// Extracts document full names from table-of-contents XML.
///
/// Names are trimmed; empty `file` elements are skipped.
///
/// # Errors
///
/// Returns [`ArchiveError::Xml`] for malformed XML and
/// [`ArchiveError::MissingFilesElement`] when the root has no `files` child.
pub fn parse_table_of_contents(xml: &str) -> Result<Vec<String>, ArchiveError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document = Document::parse_with_options(xml, options)
        .map_err(|err| ArchiveError::Xml(err.to_string()))?;
    let files = document
        .root_element()
        .children()
        .find(|node| node.has_tag_name(FILES_ELEMENT))
        .ok_or(ArchiveError::MissingFilesElement)?;
    Ok(files
        .children()
        .filter(|node| node.has_tag_name(FILE_ELEMENT))
        .map(|node| text_content(node).trim().to_string())
        .filter(|name| !name.is_empty())
        .collect())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads a zip entry as UTF-8 text under the size cap.
fn read_entry_text(entry: impl Read) -> Result<String, ArchiveError> {
    let limit = u64::try_from(MAX_TABLE_OF_CONTENTS_BYTES)
        .map_err(|_| ArchiveError::Zip("size limit exceeds u64".to_string()))?
        .saturating_add(1);
    let mut bytes = Vec::new();
    entry
        .take(limit)
        .read_to_end(&mut bytes)
        .map_err(|err| ArchiveError::Zip(err.to_string()))?;
    if bytes.len() > MAX_TABLE_OF_CONTENTS_BYTES {
        return Err(ArchiveError::TooLarge {
            max_bytes: MAX_TABLE_OF_CONTENTS_BYTES,
        });
    }
    String::from_utf8(bytes).map_err(|err| ArchiveError::Xml(err.to_string()))
}

/// Concatenates all descendant text of an element.
fn text_content(node: Node<'_, '_>) -> String {
    node.descendants().filter(Node::is_text).filter_map(|text| text.text()).collect()
}
