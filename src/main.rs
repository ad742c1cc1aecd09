//! Browser entry point: mounts the pipeline app.

use search_pipeline_visualizer::{App, init_logging};

fn main() {
	init_logging();
	leptos::mount::mount_to_body(App);
}
