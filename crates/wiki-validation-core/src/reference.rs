// crates/wiki-validation-core/src/reference.rs
// ============================================================================
// Module: Document References
// Description: Structured wiki document references and full-name resolution.
// Purpose: Turn `wiki:Space.Page` strings into typed references.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! A [`DocumentReference`] names a wiki page by wiki identifier, space chain,
//! and page name. [`resolve_document_reference`] parses the textual full-name
//! form used in archive tables of contents.
//! Invariants:
//! - A reference always has at least one space and a non-empty page name.
//! - `\` escapes the following character; the first unescaped `:` before any
//!   `.` separates the wiki, and unescaped `.` separates spaces from the page.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Space used when a full name does not carry one.
pub const DEFAULT_SPACE: &str = "Main";
/// Page used when a full name does not carry one.
pub const DEFAULT_PAGE: &str = "WebHome";
/// Escape character for separators inside names.
const ESCAPE: char = '\\';
/// Separator between wiki and the space chain.
const WIKI_SEPARATOR: char = ':';
/// Separator between spaces and the page name.
const SPACE_SEPARATOR: char = '.';

// ============================================================================
// SECTION: Document Reference
// ============================================================================

/// Structured reference to a wiki document.
///
/// # Invariants
/// - `wiki` and `name` are non-empty.
/// - `spaces` is non-empty; the last entry is the document's own space.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentReference {
    /// Wiki identifier.
    wiki: String,
    /// Space chain, outermost first.
    spaces: Vec<String>,
    /// Page name.
    name: String,
}

impl DocumentReference {
    /// Creates a reference from its components.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError`] when a component is empty.
    pub fn new(
        wiki: impl Into<String>,
        spaces: Vec<String>,
        name: impl Into<String>,
    ) -> Result<Self, ReferenceError> {
        let wiki = wiki.into();
        let name = name.into();
        if wiki.is_empty() {
            return Err(ReferenceError::EmptyWiki);
        }
        if spaces.is_empty() || spaces.iter().any(String::is_empty) {
            return Err(ReferenceError::EmptySpace);
        }
        if name.is_empty() {
            return Err(ReferenceError::EmptyName);
        }
        Ok(Self {
            wiki,
            spaces,
            name,
        })
    }

    /// Returns the wiki identifier.
    #[must_use]
    pub fn wiki(&self) -> &str {
        &self.wiki
    }

    /// Returns the space chain, outermost first.
    #[must_use]
    pub fn spaces(&self) -> &[String] {
        &self.spaces
    }

    /// Returns the innermost space, which owns the document.
    #[must_use]
    pub fn last_space(&self) -> &str {
        self.spaces.last().map_or(DEFAULT_SPACE, String::as_str)
    }

    /// Returns the page name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for DocumentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_escaped(f, &self.wiki, &[WIKI_SEPARATOR])?;
        f.write_str(":")?;
        for space in &self.spaces {
            write_escaped(f, space, &[WIKI_SEPARATOR, SPACE_SEPARATOR])?;
            f.write_str(".")?;
        }
        write_escaped(f, &self.name, &[WIKI_SEPARATOR, SPACE_SEPARATOR])
    }
}

/// Writes `value`, escaping the escape character and the given separators.
fn write_escaped(f: &mut fmt::Formatter<'_>, value: &str, separators: &[char]) -> fmt::Result {
    for ch in value.chars() {
        if ch == ESCAPE || separators.contains(&ch) {
            write!(f, "{ESCAPE}")?;
        }
        write!(f, "{ch}")?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while building document references.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    /// The full name was empty.
    #[error("document full name is empty")]
    EmptyFullName,
    /// No wiki identifier was available.
    #[error("document reference requires a wiki")]
    EmptyWiki,
    /// A space component was empty.
    #[error("document reference requires non-empty spaces")]
    EmptySpace,
    /// The page name was empty.
    #[error("document reference requires a page name")]
    EmptyName,
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Resolves a full document name such as `xwiki:Space.Page`.
///
/// Missing parts fall back to `default_wiki`, [`DEFAULT_SPACE`], and
/// [`DEFAULT_PAGE`]. Nested spaces (`A.B.Page`) are kept in order.
///
/// # Errors
///
/// Returns [`ReferenceError`] when `full_name` is blank or `default_wiki` is
/// empty and the name carries no wiki.
pub fn resolve_document_reference(
    full_name: &str,
    default_wiki: &str,
) -> Result<DocumentReference, ReferenceError> {
    if full_name.trim().is_empty() {
        return Err(ReferenceError::EmptyFullName);
    }

    let mut wiki: Option<String> = None;
    let mut segments: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut chars = full_name.chars();
    while let Some(ch) = chars.next() {
        match ch {
            ESCAPE => current.push(chars.next().unwrap_or(ESCAPE)),
            WIKI_SEPARATOR if wiki.is_none() && segments.is_empty() => {
                wiki = Some(std::mem::take(&mut current));
            }
            SPACE_SEPARATOR => segments.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }

    let name = if current.is_empty() { DEFAULT_PAGE.to_string() } else { current };
    let mut spaces: Vec<String> =
        segments.into_iter().filter(|segment| !segment.is_empty()).collect();
    if spaces.is_empty() {
        spaces.push(DEFAULT_SPACE.to_string());
    }
    let wiki = wiki.filter(|value| !value.is_empty()).unwrap_or_else(|| default_wiki.to_string());
    DocumentReference::new(wiki, spaces, name)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only panic-based assertions are permitted."
    )]

    use super::*;

    #[test]
    fn resolves_wiki_space_and_page() {
        let reference = resolve_document_reference("xwiki:Main.WebHome", "other").unwrap();
        assert_eq!(reference.wiki(), "xwiki");
        assert_eq!(reference.spaces(), ["Main".to_string()]);
        assert_eq!(reference.last_space(), "Main");
        assert_eq!(reference.name(), "WebHome");
    }

    #[test]
    fn missing_wiki_uses_default() {
        let reference = resolve_document_reference("Sandbox.TestPage", "xwiki").unwrap();
        assert_eq!(reference.wiki(), "xwiki");
        assert_eq!(reference.last_space(), "Sandbox");
        assert_eq!(reference.name(), "TestPage");
    }

    #[test]
    fn nested_spaces_keep_order() {
        let reference = resolve_document_reference("xwiki:A.B.C.Page", "xwiki").unwrap();
        assert_eq!(reference.spaces(), ["A".to_string(), "B".to_string(), "C".to_string()]);
        assert_eq!(reference.last_space(), "C");
        assert_eq!(reference.name(), "Page");
    }

    #[test]
    fn escaped_separators_stay_in_names() {
        let reference = resolve_document_reference(r"xwiki:My\.Space.Page\:1", "xwiki").unwrap();
        assert_eq!(reference.last_space(), "My.Space");
        assert_eq!(reference.name(), "Page:1");
    }

    #[test]
    fn missing_parts_use_wiki_defaults() {
        let page_only = resolve_document_reference("xwiki:Page", "xwiki").unwrap();
        assert_eq!(page_only.last_space(), DEFAULT_SPACE);
        assert_eq!(page_only.name(), "Page");

        let space_only = resolve_document_reference("xwiki:Space.", "xwiki").unwrap();
        assert_eq!(space_only.last_space(), "Space");
        assert_eq!(space_only.name(), DEFAULT_PAGE);
    }

    #[test]
    fn colon_after_space_separator_is_literal() {
        let reference = resolve_document_reference("Space.Page:Sub", "xwiki").unwrap();
        assert_eq!(reference.wiki(), "xwiki");
        assert_eq!(reference.name(), "Page:Sub");
    }

    #[test]
    fn blank_full_name_is_rejected() {
        assert_eq!(resolve_document_reference("  ", "xwiki"), Err(ReferenceError::EmptyFullName));
    }

    #[test]
    fn empty_default_wiki_is_rejected_without_explicit_wiki() {
        assert_eq!(resolve_document_reference("Main.Page", ""), Err(ReferenceError::EmptyWiki));
    }

    #[test]
    fn display_escapes_separators() {
        let reference =
            DocumentReference::new("xwiki", vec!["My.Space".to_string()], "A:B").unwrap();
        let rendered = reference.to_string();
        assert_eq!(rendered, r"xwiki:My\.Space.A\:B");
        assert_eq!(resolve_document_reference(&rendered, "other").unwrap(), reference);
    }
}
