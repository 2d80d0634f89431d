use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::books::domain::model::BookEntity;
use crate::utils::date::serializer;

// BookDto is a data transfer object for Catalog service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookDto {
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

impl From<&BookEntity> for BookDto {
    fn from(other: &BookEntity) -> Self {
        Self {
            book_id: other.book_id.to_string(),
            version: other.version,
            title: other.title.to_string(),
            description: other.description.to_string(),
            author: other.author.to_string(),
            language: other.language.to_string(),
            category: other.category.to_string(),
            featured: other.featured,
            available: other.available,
            image: other.image.to_string(),
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

// BookImageDto reports the cover that replaced the previous one
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct BookImageDto {
    pub id: String,
    #[serde(rename = "newImageUrl")]
    pub new_image_url: String,
}

impl BookImageDto {
    pub fn new(id: &str, new_image_url: &str) -> Self {
        Self {
            id: id.to_string(),
            new_image_url: new_image_url.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::books::domain::model::{BookEntity, BookFields};
    use crate::books::dto::{BookDto, BookImageDto};

    #[tokio::test]
    async fn test_should_build_books() {
        let entity = BookEntity::new(&BookFields::new("title", "author"), "https://bucket.example.com/books/1_a.png");
        let book = BookDto::from(&entity);
        assert_eq!(entity.book_id, book.book_id);
        assert_eq!("title", book.title.as_str());
        assert_eq!("https://bucket.example.com/books/1_a.png", book.image.as_str());
    }

    #[tokio::test]
    async fn test_should_serialize_image_dto() {
        let json = serde_json::to_value(BookImageDto::new("1", "https://bucket.example.com/books/2_b.png")).expect("should serialize");
        assert_eq!("1", json["id"]);
        assert_eq!("https://bucket.example.com/books/2_b.png", json["newImageUrl"]);
    }
}
