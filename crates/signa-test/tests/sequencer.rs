//! Sequencer scenarios against scripted sources

use std::time::Duration;

use signa_core::{ErrorKind, Generation, GestureId, SignaError};
use signa_runtime::{SequencerConfig, SequencerEvent, SequencerState, SessionOutcome};
use signa_test::{hold_x, ramp_x, wave, Scenario, ScriptedGestureSource};

fn ids(events: &[SequencerEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            SequencerEvent::GesturePlaying { gesture, .. } => Some(gesture.to_string()),
            _ => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_sequences_play_in_submitted_order() {
    let source = ScriptedGestureSource::new()
        .with_gesture(ramp_x("hello", 45.0, 300))
        .with_gesture(hold_x("i", 10.0, 200))
        .with_gesture(wave("want"))
        .with_gesture(ramp_x("water", -30.0, 400))
        .with_latency(Duration::from_millis(20))
        .with_jitter(42, Duration::from_millis(80));
    let mut scenario = Scenario::new(source).unwrap();

    let sequences: [&[&str]; 3] = [
        &["hello"],
        &["i", "want", "water"],
        &["water", "hello", "water", "i"],
    ];
    for sequence in sequences {
        let handle = scenario.submit(sequence).unwrap();
        let outcome = handle.wait().await;

        assert_eq!(outcome, SessionOutcome::Completed { played: sequence.len() });
        assert_eq!(scenario.sequencer().state(), SequencerState::Idle);

        let events = scenario.events();
        assert_eq!(ids(&events), sequence.to_vec());
        assert!(matches!(
            events.last(),
            Some(SequencerEvent::SessionCompleted { played, .. }) if *played == sequence.len()
        ));
    }
}

#[tokio::test(start_paused = true)]
async fn test_state_walk_ends_idle() {
    let source = ScriptedGestureSource::new().with_gesture(hold_x("G1", 5.0, 100));
    let scenario = Scenario::new(source).unwrap();
    let mut states = scenario.sequencer().watch_state();

    let handle = scenario.submit(&["G1"]).unwrap();
    let mut seen = Vec::new();
    while states.changed().await.is_ok() {
        let state = states.borrow_and_update().clone();
        let idle = state.is_idle();
        seen.push(state);
        if idle {
            break;
        }
    }

    assert_eq!(handle.wait().await, SessionOutcome::Completed { played: 1 });
    assert_eq!(seen.last(), Some(&SequencerState::Idle));
    assert!(seen.iter().any(|s| matches!(s, SequencerState::Playing { .. })));
    // Done is replaced by Idle under the same lock
    assert!(!seen.iter().any(|s| matches!(s, SequencerState::Done { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_late_fetch_of_superseded_session_is_dropped() {
    let mut source = ScriptedGestureSource::new()
        .with_gesture(hold_x("A", 90.0, 500))
        .with_gesture(hold_x("B", 0.0, 500));
    let gate = source.hold("A");
    let mut scenario = Scenario::new(source).unwrap();

    let first = scenario.submit(&["A"]).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    let second = scenario.submit(&["B"]).unwrap();
    let stale_generation = first.generation();

    // A's response arrives after B took over
    gate.release();
    assert_eq!(first.wait().await, SessionOutcome::Cancelled { played: 0 });
    assert_eq!(second.wait().await, SessionOutcome::Completed { played: 1 });

    assert!(!scenario.poses().is_empty());
    assert!(scenario.poses().writes().iter().all(|r| r.x == 0.0));

    let stale = scenario.events_for(stale_generation);
    assert_eq!(
        stale,
        vec![
            SequencerEvent::SessionStarted { generation: Generation(1), gestures: 1 },
            SequencerEvent::GestureLoading {
                generation: Generation(1),
                index: 0,
                gesture: GestureId::from("A"),
            },
            SequencerEvent::SessionCancelled { generation: Generation(1) },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_superseded_sequence_never_resumes() {
    let source = ScriptedGestureSource::new()
        .with_gesture(hold_x("A1", 10.0, 300))
        .with_gesture(hold_x("A2", 20.0, 300))
        .with_gesture(hold_x("B1", 0.0, 300));
    let scenario = Scenario::new(source).unwrap();

    let first = scenario.submit(&["A1", "A2"]).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let before = scenario.poses().len();
    let second = scenario.submit(&["B1"]).unwrap();
    assert_eq!(second.wait().await, SessionOutcome::Completed { played: 1 });
    assert_eq!(first.wait().await, SessionOutcome::Cancelled { played: 0 });

    // Give A every chance to continue
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(scenario.poses().since(before).iter().all(|r| r.x == 0.0));
    assert_eq!(scenario.source().fetch_count(&GestureId::from("A2")), 0);
}

#[tokio::test(start_paused = true)]
async fn test_resubmitting_plays_twice() {
    let source = ScriptedGestureSource::new()
        .with_gesture(ramp_x("G1", 90.0, 200))
        .with_gesture(ramp_x("G2", 45.0, 200));
    let scenario = Scenario::new(source).unwrap();

    let first = scenario.submit(&["G1", "G2"]).unwrap();
    let first_generation = first.generation();
    assert_eq!(first.wait().await, SessionOutcome::Completed { played: 2 });
    let once = scenario.poses().len();

    let second = scenario.submit(&["G1", "G2"]).unwrap();
    assert_ne!(first_generation, second.generation());
    assert_eq!(second.wait().await, SessionOutcome::Completed { played: 2 });

    assert_eq!(scenario.poses().len(), once * 2);
    assert_eq!(scenario.source().fetch_count(&GestureId::from("G1")), 2);
}

#[tokio::test(start_paused = true)]
async fn test_failure_keeps_played_gestures_and_next_submit_recovers() {
    let source = ScriptedGestureSource::new()
        .with_gesture(hold_x("G1", 10.0, 100))
        .with_gesture(hold_x("G2", 20.0, 100))
        .with_failure("bad", SignaError::malformed(&GestureId::from("bad"), "keyframes out of order"));
    let mut scenario = Scenario::new(source).unwrap();

    let failed = scenario.submit(&["G1", "bad", "G2"]).unwrap();
    let outcome = failed.wait().await;
    assert!(matches!(
        outcome,
        SessionOutcome::Failed { ref gesture, played: 1, .. } if gesture.as_str() == "bad"
    ));
    assert!(matches!(
        scenario.sequencer().state(),
        SequencerState::Error { kind: ErrorKind::MalformedData, .. }
    ));
    let played = scenario.poses().len();
    assert_eq!(played, 7);

    let events = scenario.events();
    assert!(matches!(
        events.last(),
        Some(SequencerEvent::SessionFailed { index: 1, kind: ErrorKind::MalformedData, .. })
    ));

    // The error state is left on the next submission
    let retry = scenario.submit(&["G2"]).unwrap();
    assert!(matches!(scenario.sequencer().state(), SequencerState::Loading { .. }));
    assert_eq!(retry.wait().await, SessionOutcome::Completed { played: 1 });
    assert_eq!(scenario.poses().len(), played + 7);

    // No cancellation is reported for a session that already failed
    assert!(!scenario
        .events()
        .iter()
        .any(|e| matches!(e, SequencerEvent::SessionCancelled { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_hung_fetch_times_out() {
    let mut source = ScriptedGestureSource::new().with_gesture(hold_x("G1", 10.0, 100));
    let _never = source.hold("G1");
    let config = SequencerConfig::default().with_fetch_timeout(Duration::from_secs(2));
    let scenario = Scenario::with_config(source, config).unwrap();

    let start = tokio::time::Instant::now();
    let outcome = scenario.submit(&["G1"]).unwrap().wait().await;

    assert!(matches!(
        outcome,
        SessionOutcome::Failed { error: SignaError::NetworkError(_), played: 0, .. }
    ));
    assert!(start.elapsed() >= Duration::from_secs(2));
    assert!(scenario.poses().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_teardown_mid_playback() {
    let source = ScriptedGestureSource::new().with_gesture(ramp_x("G1", 90.0, 2000));
    let scenario = Scenario::new(source).unwrap();

    let handle = scenario.submit(&["G1"]).unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    scenario.sequencer().teardown();
    let written = scenario.poses().len();

    assert_eq!(handle.wait().await, SessionOutcome::Cancelled { played: 0 });
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(scenario.poses().len(), written);
    assert_eq!(scenario.submit(&["G1"]).unwrap_err(), SignaError::SequencerClosed);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_the_sequencer_stops_playback() {
    let source = ScriptedGestureSource::new().with_gesture(ramp_x("G1", 90.0, 2000));
    let scenario = Scenario::new(source).unwrap();
    let poses = scenario.poses().clone();

    let handle = scenario.submit(&["G1"]).unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    drop(scenario);
    let written = poses.len();
    assert!(written > 0);

    assert_eq!(handle.wait().await, SessionOutcome::Cancelled { played: 0 });
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(poses.len(), written);
}

#[tokio::test(start_paused = true)]
async fn test_clone_keeps_the_sequencer_alive() {
    let source = ScriptedGestureSource::new().with_gesture(hold_x("G1", 10.0, 300));
    let scenario = Scenario::new(source).unwrap();
    let sequencer = scenario.sequencer().clone();

    let handle = scenario.submit(&["G1"]).unwrap();
    drop(scenario);

    assert_eq!(handle.wait().await, SessionOutcome::Completed { played: 1 });
    assert!(!sequencer.is_closed());
}

#[tokio::test]
async fn test_stop_when_idle_is_harmless() {
    let mut scenario = Scenario::manual(ScriptedGestureSource::new(), SequencerConfig::default()).unwrap();

    scenario.sequencer().stop();
    scenario.sequencer().stop();

    assert!(scenario.sequencer().state().is_idle());
    assert!(scenario.events().is_empty());
}
