pub mod aws;
pub mod date;
pub mod ddb;
pub mod lock;
pub mod logs;
#[cfg(test)]
pub(crate) mod testing;
