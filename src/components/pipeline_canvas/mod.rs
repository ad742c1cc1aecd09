mod component;
mod render;
mod state;
mod viewport;

pub use component::PipelineCanvas;
