pub mod api_key;
pub mod app;
pub mod backend;
pub mod cli;
pub mod config;
pub mod gemini;
pub mod paths;
pub mod probe;
pub mod report;
pub mod util;
