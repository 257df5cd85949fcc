pub mod catalog;
pub mod compression;
pub mod constants;
pub mod error;
pub mod extract;
pub mod format;
pub mod reader;
pub mod scanner;
pub mod source;

#[cfg(test)]
pub(crate) mod fixture;
