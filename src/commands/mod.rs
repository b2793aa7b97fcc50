pub mod entry;
pub mod menu;
pub mod session;
