pub mod config;
pub mod format;
pub mod logging;
pub mod procfs;
pub mod system;
pub mod ui;
