// src/models/extraction.rs

//! Tag categories and the aggregate extraction result.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the five tag kinds extracted independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    H1,
    H2,
    H3,
    P,
    A,
}

impl Category {
    /// All categories, in result field order.
    pub const ALL: [Category; 5] = [
        Category::H1,
        Category::H2,
        Category::H3,
        Category::P,
        Category::A,
    ];

    /// Lowercase HTML tag name matched by this category.
    pub fn tag(self) -> &'static str {
        match self {
            Category::H1 => "h1",
            Category::H2 => "h2",
            Category::H3 => "h3",
            Category::P => "p",
            Category::A => "a",
        }
    }

    /// Position of this category in `ALL`.
    pub fn index(self) -> usize {
        match self {
            Category::H1 => 0,
            Category::H2 => 1,
            Category::H3 => 2,
            Category::P => 3,
            Category::A => 4,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Normalized text of every h1/h2/h3/a/p element of a page, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,

    /// Anchor text
    #[serde(rename = "a")]
    pub anchors: Vec<String>,

    /// Paragraph text
    #[serde(rename = "p")]
    pub paragraphs: Vec<String>,
}

impl ExtractionResult {
    /// Sequence collected for a category.
    pub fn get(&self, category: Category) -> &[String] {
        match category {
            Category::H1 => &self.h1,
            Category::H2 => &self.h2,
            Category::H3 => &self.h3,
            Category::P => &self.paragraphs,
            Category::A => &self.anchors,
        }
    }

    /// Total number of entries across all categories.
    pub fn total(&self) -> usize {
        Category::ALL.iter().map(|c| self.get(*c).len()).sum()
    }
}

/// Per-category output slots, filled as collection tasks finish.
#[derive(Debug, Default)]
pub struct CategorySlots {
    slots: [Option<Vec<String>>; 5],
}

impl CategorySlots {
    /// Store the output of one category.
    pub fn fill(&mut self, category: Category, texts: Vec<String>) {
        self.slots[category.index()] = Some(texts);
    }

    /// First category that has not reported yet.
    pub fn missing(&self) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|c| self.slots[c.index()].is_none())
    }

    /// Assemble the final result, or name the first empty slot.
    pub fn into_result(self) -> Result<ExtractionResult, Category> {
        if let Some(category) = self.missing() {
            return Err(category);
        }
        let [h1, h2, h3, paragraphs, anchors] = self.slots.map(Option::unwrap_or_default);
        Ok(ExtractionResult {
            h1,
            h2,
            h3,
            anchors,
            paragraphs,
        })
    }
}
