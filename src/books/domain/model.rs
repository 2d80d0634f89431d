use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::books::domain::Book;
use crate::core::domain::Identifiable;
use crate::utils::date::serializer;

// BookEntity is the stored catalog record. `image` holds the public URL of the cover object, or
// an empty string while the book has no cover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookEntity {
    pub book_id: String,
    pub version: i64,
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub category: String,
    pub featured: bool,
    pub available: bool,
    pub image: String,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl BookEntity {
    pub fn new(fields: &BookFields, image: &str) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            book_id: Uuid::new_v4().to_string(),
            version: 0,
            title: fields.title.to_string(),
            description: fields.description.to_string(),
            author: fields.author.to_string(),
            language: fields.language.to_string(),
            category: fields.category.to_string(),
            featured: fields.featured,
            available: fields.available,
            image: image.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    // applies the present patch fields, bumping version and updated_at
    pub fn apply(&mut self, patch: &BookPatch) {
        if let Some(ref title) = patch.title {
            self.title = title.to_string();
        }
        if let Some(ref description) = patch.description {
            self.description = description.to_string();
        }
        if let Some(ref author) = patch.author {
            self.author = author.to_string();
        }
        if let Some(ref language) = patch.language {
            self.language = language.to_string();
        }
        if let Some(ref category) = patch.category {
            self.category = category.to_string();
        }
        if let Some(featured) = patch.featured {
            self.featured = featured;
        }
        if let Some(available) = patch.available {
            self.available = available;
        }
        if let Some(ref image) = patch.image {
            self.image = image.to_string();
        }
        self.version += 1;
        self.updated_at = Utc::now().naive_utc();
    }
}

impl Identifiable for BookEntity {
    fn id(&self) -> String {
        self.book_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl Book for BookEntity {
    fn cover_url(&self) -> Option<&str> {
        let image = self.image.trim();
        if image.is_empty() {
            None
        } else {
            Some(image)
        }
    }
}

// BookFields are the caller supplied attributes of a new book.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookFields {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub available: bool,
}

impl BookFields {
    #[cfg(test)]
    pub fn new(title: &str, author: &str) -> Self {
        Self {
            title: title.to_string(),
            author: author.to_string(),
            ..Default::default()
        }
    }
}

// BookPatch describes a partial update; `None` leaves the attribute alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub language: Option<String>,
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub available: Option<bool>,
    pub image: Option<String>,
}

impl BookPatch {
    pub fn image(url: &str) -> Self {
        Self {
            image: Some(url.to_string()),
            ..Default::default()
        }
    }

    pub fn without_image(self) -> Self {
        Self {
            image: None,
            ..self
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        *self == BookPatch::default()
    }
}
