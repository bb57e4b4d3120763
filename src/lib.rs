pub mod api_connection;
pub mod cli;
pub mod config;
pub mod export;
pub mod planning;
pub mod recipe_parser;
pub mod session;
pub mod shell;
