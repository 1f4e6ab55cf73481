pub mod export;
pub mod export_ui;
