use crate::core::domain::Identifiable;

pub mod model;

pub(crate) trait Book: Identifiable {
    // public URL of the cover object, if the book has one
    fn cover_url(&self) -> Option<&str>;
}
