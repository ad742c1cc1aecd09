use std::collections::VecDeque;

use log::{debug, warn};

use super::steps::{DEFAULT_REGION, InspectorPayload, SimulationStep, search_session_steps};
use crate::services::GenAiError;
use crate::topology::{EdgeRef, NodeId};

/// Number of console lines kept, newest first.
pub const LOG_CAPACITY: usize = 9;

/// One console line.
#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
	/// Milliseconds since the Unix epoch.
	pub at_ms: f64,
	/// Text shown after the timestamp.
	pub message: String,
}

/// Where the session is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SimulationPhase {
	/// Not started, or reset.
	#[default]
	Idle,
	/// Showing a step.
	Running {
		/// Index of the current step.
		step: usize,
	},
	/// Went past the last step.
	Finished,
}

/// Handed out by [`SimulationController::begin_video`]; a result delivered
/// with a ticket from before the last reset is dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VideoTicket(u64);

/// What [`SimulationController::finish_video`] did with a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VideoOutcome {
	/// The clip URL is available.
	Ready,
	/// The job finished without a sample.
	NoResult,
	/// The request failed.
	Failed {
		/// The key was rejected and the user should pick another one.
		reselect_key: bool,
	},
	/// The result belongs to a session that was reset since.
	Discarded,
}

#[derive(Clone, Debug, Default)]
struct VideoState {
	generating: bool,
	url: Option<String>,
	epoch: u64,
}

/// Drives the scripted session and owns everything the panels display.
#[derive(Clone, Debug)]
pub struct SimulationController {
	region: String,
	steps: Vec<SimulationStep>,
	phase: SimulationPhase,
	active_node: Option<NodeId>,
	active_edge: Option<EdgeRef>,
	log: VecDeque<LogEntry>,
	inspector: Option<InspectorPayload>,
	video: VideoState,
}

impl Default for SimulationController {
	fn default() -> Self {
		Self::new(DEFAULT_REGION)
	}
}

impl SimulationController {
	/// Idle controller whose sync step names `region`.
	pub fn new(region: impl Into<String>) -> Self {
		let region = region.into();
		Self {
			steps: search_session_steps(&region),
			region,
			phase: SimulationPhase::Idle,
			active_node: None,
			active_edge: None,
			log: VecDeque::with_capacity(LOG_CAPACITY),
			inspector: None,
			video: VideoState::default(),
		}
	}

	/// Current phase.
	pub fn phase(&self) -> SimulationPhase {
		self.phase
	}

	/// Whether a step is being shown.
	pub fn is_running(&self) -> bool {
		matches!(self.phase, SimulationPhase::Running { .. })
	}

	/// Region substituted into the sync step.
	pub fn region(&self) -> &str {
		&self.region
	}

	/// The script of the current or next run.
	pub fn steps(&self) -> &[SimulationStep] {
		&self.steps
	}

	/// Highlighted node: the current step's, or the last one clicked.
	pub fn active_node(&self) -> Option<NodeId> {
		self.active_node
	}

	/// Edge being animated.
	pub fn active_edge(&self) -> Option<EdgeRef> {
		self.active_edge
	}

	/// Inspector content of the current step.
	pub fn inspector(&self) -> Option<&InspectorPayload> {
		self.inspector.as_ref()
	}

	/// Console lines, newest first.
	/// Console lines, newest first.
	pub fn log(&self) -> impl ExactSizeIterator<Item = &LogEntry> {
		self.log.iter()
	}

	/// URL of the last generated clip.
	pub fn video_url(&self) -> Option<&str> {
		self.video.url.as_deref()
	}

	/// Whether a video request is in flight.
	pub fn is_generating_video(&self) -> bool {
		self.video.generating
	}

	/// `(current step, total)` counted from one, while running.
	pub fn progress(&self) -> Option<(usize, usize)> {
		match self.phase {
			SimulationPhase::Running { step } => Some((step + 1, self.steps.len())),
			_ => None,
		}
	}

	/// Changes the region used by the next run. Ignored mid-run.
	pub fn set_region(&mut self, region: impl Into<String>) {
		if self.is_running() {
			return;
		}
		self.region = region.into();
		self.steps = search_session_steps(&self.region);
	}

	/// Clears the previous run and applies the first step.
	pub fn start(&mut self, now_ms: f64) {
		self.steps = search_session_steps(&self.region);
		self.log.clear();
		self.inspector = None;
		self.video.url = None;
		self.push_log(now_ms, format!("Starting hybrid search pipeline in {}...", self.region));
		self.apply_step(0, now_ms);
	}

	/// Moves to the next step. No-op unless running.
	pub fn advance(&mut self, now_ms: f64) {
		if let SimulationPhase::Running { step } = self.phase {
			self.apply_step(step + 1, now_ms);
		}
	}

	fn apply_step(&mut self, idx: usize, now_ms: f64) {
		let Some(step) = self.steps.get(idx) else {
			debug!("simulation finished after {} steps", self.steps.len());
			self.active_edge = None;
			self.phase = SimulationPhase::Finished;
			self.push_log(now_ms, "Search session finished.".to_string());
			return;
		};

		debug!("simulation step {idx}: {} {:?}", step.node, step.edge);
		self.phase = SimulationPhase::Running { step: idx };
		self.active_node = Some(step.node);
		self.active_edge = step.edge;
		self.inspector = step.inspector.clone();
		let line = step.log.clone();
		self.push_log(now_ms, line);
	}

	/// Back to [`SimulationPhase::Idle`] with everything cleared. A video
	/// request still in flight will be discarded when it completes.
	pub fn reset(&mut self) {
		debug!("simulation reset");
		self.phase = SimulationPhase::Idle;
		self.active_node = None;
		self.active_edge = None;
		self.inspector = None;
		self.log.clear();
		self.video.url = None;
		self.video.epoch += 1;
	}

	/// Node picked on the canvas; drives the detail panel.
	pub fn select_node(&mut self, id: NodeId) {
		self.active_node = Some(id);
	}

	/// Closes the detail panel.
	pub fn clear_selection(&mut self) {
		self.active_node = None;
	}

	/// Marks a video request in flight. Returns `None` if one already is.
	pub fn begin_video(&mut self, now_ms: f64) -> Option<VideoTicket> {
		if self.video.generating {
			return None;
		}
		self.video.generating = true;
		self.video.url = None;
		self.push_log(now_ms, "Generating search experience visualization...".to_string());
		Some(VideoTicket(self.video.epoch))
	}

	/// Records the result of the request identified by `ticket`.
	pub fn finish_video(
		&mut self,
		ticket: VideoTicket,
		result: Result<Option<String>, GenAiError>,
		now_ms: f64,
	) -> VideoOutcome {
		self.video.generating = false;
		if ticket.0 != self.video.epoch {
			debug!("dropping video result requested before reset");
			return VideoOutcome::Discarded;
		}

		match result {
			Ok(Some(url)) => {
				self.video.url = Some(url);
				self.push_log(now_ms, "UX video generated.".to_string());
				VideoOutcome::Ready
			}
			Ok(None) => {
				self.push_log(now_ms, "Video generation failed.".to_string());
				VideoOutcome::NoResult
			}
			Err(err) => {
				warn!("video generation failed: {err}");
				self.push_log(
					now_ms,
					"Error generating video. Check the API key permissions.".to_string(),
				);
				let reselect_key = err.is_entity_not_found();
				if reselect_key {
					self.push_log(now_ms, "Requesting a new key...".to_string());
				}
				VideoOutcome::Failed { reselect_key }
			}
		}
	}

	fn push_log(&mut self, at_ms: f64, message: String) {
		self.log.push_front(LogEntry { at_ms, message });
		self.log.truncate(LOG_CAPACITY);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn messages(c: &SimulationController) -> Vec<String> {
		c.log().map(|e| e.message.clone()).collect()
	}

	#[test]
	fn start_applies_first_step() {
		let mut c = SimulationController::default();
		c.start(1.0);
		assert_eq!(c.phase(), SimulationPhase::Running { step: 0 });
		assert_eq!(c.active_node(), Some(NodeId::MerchantDashboard));
		assert_eq!(
			c.active_edge(),
			Some(EdgeRef::new(NodeId::MerchantDashboard, NodeId::Connectors))
		);
		assert_eq!(
			messages(&c),
			vec![
				"Merchant: price update".to_string(),
				"Starting hybrid search pipeline in US East (N. Virginia)...".to_string(),
			]
		);
		assert_eq!(c.progress(), Some((1, 12)));
	}

	#[test]
	fn step_without_edge_clears_active_edge() {
		let mut c = SimulationController::default();
		c.start(0.0);
		for _ in 0..4 {
			c.advance(0.0);
		}
		assert_eq!(c.active_node(), Some(NodeId::StorefrontUi));
		assert_eq!(c.active_edge(), None);
	}

	#[test]
	fn advance_is_ignored_when_idle() {
		let mut c = SimulationController::default();
		c.advance(0.0);
		assert_eq!(c.phase(), SimulationPhase::Idle);
		assert_eq!(c.log().len(), 0);
		assert!(c.active_node().is_none());
	}

	#[test]
	fn log_is_capped_newest_first() {
		let mut c = SimulationController::default();
		c.start(0.0);
		for i in 1..=8 {
			c.advance(i as f64);
		}
		let log: Vec<_> = c.log().collect();
		assert_eq!(log.len(), LOG_CAPACITY);
		assert_eq!(log[0].message, "GenAI: purchase summary");
		assert_eq!(log[0].at_ms, 8.0);
		assert_eq!(log[8].message, "Merchant: price update");
	}

	#[test]
	fn finishing_happens_once() {
		let mut c = SimulationController::default();
		c.start(0.0);
		for _ in 0..11 {
			c.advance(0.0);
		}
		assert_eq!(c.phase(), SimulationPhase::Running { step: 11 });

		c.advance(0.0);
		assert_eq!(c.phase(), SimulationPhase::Finished);
		assert_eq!(c.active_edge(), None);
		assert_eq!(c.active_node(), Some(NodeId::KibanaAnalytics));
		let before = messages(&c);
		assert_eq!(before[0], "Search session finished.");
		assert_eq!(before[1], "Kibana: conversion analytics");

		c.advance(0.0);
		assert_eq!(messages(&c), before);
		assert!(c.progress().is_none());
	}

	#[test]
	fn region_change_is_ignored_mid_run() {
		let mut c = SimulationController::default();
		c.set_region("EU West (Ireland)");
		c.start(0.0);
		c.set_region("Asia Pacific (Tokyo)");
		assert_eq!(c.region(), "EU West (Ireland)");
		c.advance(0.0);
		assert_eq!(messages(&c)[0], "Sync: product catalog (EU West (Ireland))");
	}

	#[test]
	fn restart_clears_previous_run() {
		let mut c = SimulationController::default();
		c.start(0.0);
		c.advance(0.0);
		c.start(5.0);
		assert_eq!(c.log().len(), 2);
		assert_eq!(c.phase(), SimulationPhase::Running { step: 0 });
	}

	#[test]
	fn selection_follows_node_clicks() {
		let mut c = SimulationController::default();
		c.select_node(NodeId::Reranker);
		assert_eq!(c.active_node(), Some(NodeId::Reranker));
		c.clear_selection();
		assert_eq!(c.active_node(), None);
	}

	#[test]
	fn video_generation_is_not_reentrant() {
		let mut c = SimulationController::default();
		let ticket = c.begin_video(0.0).unwrap();
		assert!(c.is_generating_video());
		assert!(c.begin_video(0.0).is_none());

		let outcome = c.finish_video(ticket, Ok(Some("blob:video".into())), 1.0);
		assert_eq!(outcome, VideoOutcome::Ready);
		assert!(!c.is_generating_video());
		assert_eq!(c.video_url(), Some("blob:video"));
		assert_eq!(messages(&c)[0], "UX video generated.");
	}

	#[test]
	fn empty_video_result_is_reported() {
		let mut c = SimulationController::default();
		let ticket = c.begin_video(0.0).unwrap();
		assert_eq!(c.finish_video(ticket, Ok(None), 0.0), VideoOutcome::NoResult);
		assert_eq!(messages(&c)[0], "Video generation failed.");
		assert!(c.video_url().is_none());
	}

	#[test]
	fn missing_entity_error_asks_for_a_new_key() {
		let mut c = SimulationController::default();
		let ticket = c.begin_video(0.0).unwrap();
		let err = GenAiError::Api {
			status: 404,
			message: "Requested entity was not found.".into(),
		};
		assert_eq!(
			c.finish_video(ticket, Err(err), 0.0),
			VideoOutcome::Failed { reselect_key: true }
		);
		assert_eq!(messages(&c)[0], "Requesting a new key...");

		let ticket = c.begin_video(0.0).unwrap();
		let err = GenAiError::Operation("quota exceeded".into());
		assert_eq!(
			c.finish_video(ticket, Err(err), 0.0),
			VideoOutcome::Failed { reselect_key: false }
		);
		assert_eq!(
			messages(&c)[0],
			"Error generating video. Check the API key permissions."
		);
	}

	#[test]
	fn reset_clears_everything_and_drops_late_video() {
		let mut c = SimulationController::default();
		c.start(0.0);
		c.advance(0.0);
		let ticket = c.begin_video(0.0).unwrap();
		c.reset();

		assert_eq!(c.phase(), SimulationPhase::Idle);
		assert!(c.active_node().is_none());
		assert!(c.active_edge().is_none());
		assert!(c.inspector().is_none());
		assert_eq!(c.log().len(), 0);

		let outcome = c.finish_video(ticket, Ok(Some("blob:late".into())), 0.0);
		assert_eq!(outcome, VideoOutcome::Discarded);
		assert!(c.video_url().is_none());
		assert!(!c.is_generating_video());
	}
}
