pub mod classify;
pub mod config;
pub mod detect;
pub mod graph;
pub mod layout;
pub mod logger;
pub mod partition;
pub mod render;
pub mod types;
pub mod viz;
