pub mod console_log;
pub mod data_inspector;
pub mod detail_panel;
pub mod pipeline_canvas;
