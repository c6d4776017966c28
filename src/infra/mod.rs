pub mod backend;
pub mod config;
pub mod export_dir;
