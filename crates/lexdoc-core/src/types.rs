//! Domain types shared by the catalog, annotation and search crates.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub type DocumentId = String;
pub type AnnotationId = String;

/// A legal document of the static catalog.
///
/// - `id`: stable identity, also the partition key for annotations
/// - `doc_type`/`category`: the sidebar and search facets
/// - `source_url`: where the official PDF lives
/// - `is_offline`: whether a local copy is available
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub description: String,
    pub source_url: String,
    pub published_date: NaiveDate,
    pub category: String,
    #[serde(default)]
    pub is_offline: bool,
}

/// Pixel offset of a marker within the rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// What an annotation is, together with the payload only that kind carries.
///
/// Serialized with the discriminant under `type`, next to the payload
/// fields, so a stored record reads
/// `{"type":"comment","comment":"...",...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnnotationKind {
    Highlight,
    Comment {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        comment: Option<String>,
    },
    Bookmark,
    Reference {
        #[serde(rename = "refDocId", default, skip_serializing_if = "Option::is_none")]
        ref_doc_id: Option<String>,
        #[serde(rename = "refDocTitle", default, skip_serializing_if = "Option::is_none")]
        ref_doc_title: Option<String>,
    },
}

impl AnnotationKind {
    pub fn tag(&self) -> KindTag {
        match self {
            Self::Highlight => KindTag::Highlight,
            Self::Comment { .. } => KindTag::Comment,
            Self::Bookmark => KindTag::Bookmark,
            Self::Reference { .. } => KindTag::Reference,
        }
    }
}

/// Payload-free discriminant of [`AnnotationKind`], what a toolbar action asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindTag {
    Highlight,
    Comment,
    Bookmark,
    Reference,
}

impl KindTag {
    pub const ALL: [KindTag; 4] = [Self::Highlight, Self::Comment, Self::Bookmark, Self::Reference];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Highlight => "highlight",
            Self::Comment => "comment",
            Self::Bookmark => "bookmark",
            Self::Reference => "reference",
        }
    }

    /// Whether composing this kind needs input beyond the selected text.
    pub fn needs_extra_input(self) -> bool {
        matches!(self, Self::Comment | Self::Reference)
    }
}

impl std::fmt::Display for KindTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for KindTag {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::error::Error::InvalidInput(format!("unknown annotation kind '{s}'")))
    }
}

/// A user-created marker anchored to an excerpt on one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: AnnotationId,
    pub text: String,
    #[serde(flatten)]
    pub kind: AnnotationKind,
    pub page: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// Search panel state. Lives for one search session, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    /// `None` searches every document type.
    pub document_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub keywords: Vec<String>,
}

impl SearchFilters {
    /// Adds a keyword unless it is blank or already present. Returns whether it was added.
    pub fn add_keyword(&mut self, keyword: &str) -> bool {
        let keyword = keyword.trim();
        if keyword.is_empty() || self.keywords.iter().any(|k| k == keyword) {
            return false;
        }
        self.keywords.push(keyword.to_string());
        true
    }

    pub fn remove_keyword(&mut self, keyword: &str) {
        self.keywords.retain(|k| k != keyword);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True when `doc` passes the type, date range and keyword filters.
    pub fn accepts(&self, doc: &Document) -> bool {
        if let Some(t) = &self.document_type {
            if !doc.doc_type.to_lowercase().eq(&t.to_lowercase()) {
                return false;
            }
        }
        if self.start_date.is_some_and(|d| doc.published_date < d) {
            return false;
        }
        if self.end_date.is_some_and(|d| doc.published_date > d) {
            return false;
        }
        let haystack = format!("{} {}", doc.title, doc.description).to_lowercase();
        self.keywords.iter().all(|k| haystack.contains(&k.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tag_parses_case_insensitively() {
        assert_eq!("Comment".parse::<KindTag>().ok(), Some(KindTag::Comment));
        assert!("note".parse::<KindTag>().is_err());
    }

    #[test]
    fn keywords_are_deduplicated() {
        let mut f = SearchFilters::default();
        assert!(f.add_keyword("terra"));
        assert!(!f.add_keyword("terra"));
        assert!(!f.add_keyword("   "));
        f.remove_keyword("terra");
        assert!(f.keywords.is_empty());
    }

    #[test]
    fn highlight_serializes_without_payload_fields() {
        let a = Annotation {
            id: "1".into(),
            text: "x".into(),
            kind: AnnotationKind::Highlight,
            page: 1,
            created_at: DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z").unwrap().with_timezone(&Utc),
            position: None,
        };
        let v = serde_json::to_value(&a).unwrap();
        assert_eq!(v["type"], "highlight");
        assert!(v.get("comment").is_none());
        assert!(v.get("position").is_none());
        assert_eq!(v["createdAt"], "2024-05-01T10:00:00Z");
    }
}
