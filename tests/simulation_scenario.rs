use search_pipeline_visualizer::services::GenAiError;
use search_pipeline_visualizer::simulation::{
	LOG_CAPACITY, SimulationController, SimulationPhase, VideoOutcome,
};
use search_pipeline_visualizer::topology::{NodeId, validate_edges};

#[test]
fn full_session_then_reset() {
	validate_edges().expect("edge table is consistent");

	let mut sim = SimulationController::new("EU West (Ireland)");
	sim.start(0.0);
	for t in 1..=11 {
		sim.advance(f64::from(t));
	}

	let steps = sim.steps().to_vec();
	assert_eq!(steps.len(), 12);
	assert_eq!(sim.phase(), SimulationPhase::Running { step: 11 });
	assert_eq!(sim.progress(), Some((12, 12)));
	assert_eq!(sim.active_node(), Some(steps[11].node));
	assert_eq!(sim.active_edge(), steps[11].edge);
	assert_eq!(sim.inspector(), steps[11].inspector.as_ref());

	let log: Vec<_> = sim.log().map(|e| e.message.clone()).collect();
	assert_eq!(log.len(), LOG_CAPACITY);
	let expected: Vec<_> = steps[3..].iter().rev().map(|s| s.log.clone()).collect();
	assert_eq!(log, expected);

	sim.advance(12.0);
	assert_eq!(sim.phase(), SimulationPhase::Finished);
	assert_eq!(sim.active_edge(), None);
	assert_eq!(sim.log().next().map(|e| e.message.as_str()), Some("Search session finished."));

	sim.reset();
	assert_eq!(sim.phase(), SimulationPhase::Idle);
	assert_eq!(sim.active_node(), None);
	assert_eq!(sim.active_edge(), None);
	assert_eq!(sim.inspector(), None);
	assert_eq!(sim.log().len(), 0);
	assert_eq!(sim.video_url(), None);
}

#[test]
fn region_is_threaded_into_the_sync_step() {
	let mut sim = SimulationController::new("Asia Pacific (Tokyo)");
	sim.start(0.0);
	let lines = |sim: &SimulationController| -> Vec<String> {
		sim.log().map(|e| e.message.clone()).collect()
	};
	assert_eq!(
		lines(&sim),
		["Merchant: price update", "Starting hybrid search pipeline in Asia Pacific (Tokyo)..."]
	);

	sim.advance(1.0);
	assert_eq!(lines(&sim)[0], "Sync: product catalog (Asia Pacific (Tokyo))");

	sim.set_region("EU West (Ireland)");
	assert_eq!(sim.region(), "Asia Pacific (Tokyo)");
}

#[test]
fn video_outcomes_follow_the_session() {
	let mut sim = SimulationController::default();
	sim.start(0.0);

	let ticket = sim.begin_video(1.0).expect("first request is accepted");
	assert!(sim.begin_video(2.0).is_none());
	let outcome = sim.finish_video(ticket, Ok(Some("blob:clip".to_string())), 3.0);
	assert_eq!(outcome, VideoOutcome::Ready);
	assert_eq!(sim.video_url(), Some("blob:clip"));

	let ticket = sim.begin_video(4.0).expect("idle again");
	let err = GenAiError::Operation("Requested entity was not found.".to_string());
	assert_eq!(
		sim.finish_video(ticket, Err(err), 5.0),
		VideoOutcome::Failed { reselect_key: true }
	);

	let ticket = sim.begin_video(6.0).expect("idle again");
	sim.reset();
	assert_eq!(
		sim.finish_video(ticket, Ok(Some("blob:late".to_string())), 7.0),
		VideoOutcome::Discarded
	);
	assert_eq!(sim.video_url(), None);
	assert!(!sim.is_generating_video());
}

#[test]
fn node_names_round_trip_through_from_str() {
	for id in NodeId::ALL {
		assert_eq!(id.as_str().parse::<NodeId>().ok(), Some(id));
	}
}
