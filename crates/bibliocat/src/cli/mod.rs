pub mod commands;
pub mod menu;
pub mod output;

pub use menu::Menu;
pub use output::{OutputFormat, OutputWriter, WorkLayout};
