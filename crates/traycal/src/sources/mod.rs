//! Calendar source adapters.

mod demo;
mod inmemory;
mod json_file;

pub use demo::DemoSource;
pub use inmemory::InMemorySource;
pub use json_file::JsonFileSource;
