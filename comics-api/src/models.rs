//! Comic entity and its write payloads

use chrono::{DateTime, NaiveDate, Utc};

use crate::ids::ComicId;
use crate::repository::{FilterValue, Filterable};

/// A persisted comic
///
/// `title`, `description` and `author` are never empty once stored, and
/// `updated_at` never moves backwards for a given `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comic {
    pub id: ComicId,
    pub title: String,
    pub description: String,
    pub author: String,
    pub date: NaiveDate,
    /// Relative path of a stored image asset
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Filterable for Comic {
    fn field_value(&self, field: &str) -> Option<FilterValue> {
        match field {
            "title" => Some(FilterValue::from(self.title.as_str())),
            "description" => Some(FilterValue::from(self.description.as_str())),
            "author" => Some(FilterValue::from(self.author.as_str())),
            "date" => Some(FilterValue::Date(self.date)),
            "image" => Some(
                self.image
                    .as_deref()
                    .map_or(FilterValue::Null, FilterValue::from),
            ),
            _ => None,
        }
    }
}

/// Fields required to create a comic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComic {
    pub title: String,
    pub description: String,
    pub author: String,
    pub date: NaiveDate,
    pub image: Option<String>,
}

/// Full replacement of a comic's user-supplied fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComicReplacement {
    pub title: String,
    pub description: String,
    pub author: String,
    pub date: NaiveDate,
    /// `None` keeps the stored image reference
    pub image: Option<String>,
}

impl From<NewComic> for ComicReplacement {
    fn from(comic: NewComic) -> Self {
        Self {
            title: comic.title,
            description: comic.description,
            author: comic.author,
            date: comic.date,
            image: comic.image,
        }
    }
}
