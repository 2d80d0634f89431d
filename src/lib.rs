pub mod books;
pub mod catalog;
pub mod core;
pub mod storage;
pub mod utils;
