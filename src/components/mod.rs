pub mod dialog;
pub mod grid;
pub mod help;
pub mod search_bar;
pub mod status_bar;
pub mod tabs;
