pub mod fetch;
pub mod output;
pub mod parser;
pub mod records;
pub mod report;
pub mod summary;
