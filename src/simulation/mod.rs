//! Scripted walk through the search pipeline.

mod controller;
mod steps;

pub use controller::{
	LOG_CAPACITY, LogEntry, SimulationController, SimulationPhase, VideoOutcome, VideoTicket,
};
pub use steps::{
	DEFAULT_REGION, InspectorPayload, REGIONS, RoiMetric, SimulationStep, Trend, VisualType,
	search_session_steps, validate_steps,
};
