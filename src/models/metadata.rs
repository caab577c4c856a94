// src/models/metadata.rs

//! Page title and `<meta>` description/keywords.

use serde::{Deserialize, Serialize};

use crate::models::Document;
use crate::utils::normalize_text;

/// Descriptive metadata of a page. Absent or blank values are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    /// Text of the first `<title>`
    pub title: Option<String>,

    /// `content` of the first `<meta name="description">`
    pub description: Option<String>,

    /// `content` of the first `<meta name="keywords">`
    pub keywords: Option<String>,
}

impl PageMetadata {
    /// Read the metadata of a parsed page.
    pub fn from_document(document: &Document) -> Self {
        let title = document
            .find_element("title", |_| true)
            .map(|index| normalize_text(&document.text_content(index)));

        Self {
            title: non_blank(title),
            description: meta_content(document, "description"),
            keywords: meta_content(document, "keywords"),
        }
    }
}

fn meta_content(document: &Document, name: &str) -> Option<String> {
    let index = document.find_element("meta", |node| {
        node.attr("name")
            .is_some_and(|value| value.trim().eq_ignore_ascii_case(name))
    })?;
    let content = document.nodes()[index].attr("content")?;
    non_blank(Some(normalize_text(content)))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
