pub mod cache;
pub mod cli;
pub mod commands;
pub mod commit;
pub mod config;
pub mod discovery;
pub mod error;
pub mod picker;
pub mod probe;
pub mod settings;
pub mod tools;
