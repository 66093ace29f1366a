pub mod error;
pub mod fetch;
pub mod loader;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod stats;
