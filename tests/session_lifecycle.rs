//! End-to-end call session lifecycle tests
//!
//! Delays are shortened via `CallConfig` so a full session runs in
//! milliseconds; assertions that depend on tick timing use bounds
//! rather than exact wall-clock counts.

use std::time::Duration;
use voxline::history::CallLog;
use voxline::session::{format_elapsed, CallConfig, CallController, CallMode, CallState};

fn fast_config() -> CallConfig {
    CallConfig::default()
        .with_setup_delay(Duration::from_millis(30))
        .with_tick_interval(Duration::from_millis(20))
}

async fn wait_for_elapsed(controller: &CallController, secs: u64) -> CallState {
    let mut rx = controller.subscribe();
    let state = *rx
        .wait_for(|s| matches!(s, CallState::Active { elapsed_secs, .. } if *elapsed_secs >= secs))
        .await
        .unwrap();
    state
}

#[tokio::test]
async fn full_lifecycle_reaches_every_state_in_order() {
    // Generous setup delay so the Connecting value cannot be overwritten
    // before this test observes it.
    let config = fast_config().with_setup_delay(Duration::from_millis(200));
    let controller = CallController::new(config).unwrap();
    let mut rx = controller.subscribe();
    assert_eq!(*rx.borrow(), CallState::Idle);

    controller.start_call();
    rx.wait_for(|s| *s == CallState::Connecting).await.unwrap();
    rx.wait_for(|s| s.is_active()).await.unwrap();

    controller.end_call();
    rx.wait_for(|s| matches!(s, CallState::Ended { .. }))
        .await
        .unwrap();

    controller.reset_to_idle();
    assert_eq!(controller.state(), CallState::Idle);
}

#[tokio::test]
async fn scenario_ticks_survive_a_mute_toggle() {
    // start -> 3 ticks -> toggle mute -> 2 more ticks -> end
    let controller = CallController::new(fast_config()).unwrap();
    controller.start_call();

    wait_for_elapsed(&controller, 3).await;
    controller.toggle_mic_mute();

    let state = wait_for_elapsed(&controller, 5).await;
    // The toggle must not have cost or gained any elapsed time, and the
    // subsequent ticks must not have clobbered the toggle.
    assert!(matches!(
        state,
        CallState::Active {
            mic_muted: true,
            ..
        }
    ));

    controller.end_call();
    match controller.state() {
        CallState::Ended { final_elapsed_secs } => {
            assert!(
                (5..=7).contains(&final_elapsed_secs),
                "expected ~5 elapsed seconds, got {final_elapsed_secs}"
            );
        }
        other => panic!("expected Ended, got {other:?}"),
    }
}

#[tokio::test]
async fn ended_duration_is_frozen() {
    let controller = CallController::new(fast_config()).unwrap();
    controller.start_call();
    wait_for_elapsed(&controller, 2).await;

    controller.end_call();
    let ended = controller.state();
    assert!(matches!(ended, CallState::Ended { .. }));

    // Several tick intervals later the frozen duration is unchanged.
    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(controller.state(), ended);
}

#[tokio::test]
async fn new_call_never_resumes_a_previous_duration() {
    let controller = CallController::new(fast_config()).unwrap();
    controller.start_call();
    wait_for_elapsed(&controller, 2).await;
    controller.end_call();

    let previous = match controller.state() {
        CallState::Ended { final_elapsed_secs } => final_elapsed_secs,
        other => panic!("expected Ended, got {other:?}"),
    };
    assert!(previous >= 2);

    controller.start_new_call();
    assert_eq!(controller.state(), CallState::Connecting);

    let mut rx = controller.subscribe();
    let state = *rx.wait_for(|s| s.is_active()).await.unwrap();
    match state {
        CallState::Active {
            elapsed_secs,
            mic_muted,
            ..
        } => {
            assert!(elapsed_secs <= 1, "fresh call started at {elapsed_secs}");
            assert!(!mic_muted);
        }
        other => panic!("expected Active, got {other:?}"),
    }
}

#[tokio::test]
async fn hangup_races_the_pending_connect() {
    let config = fast_config().with_setup_delay(Duration::from_millis(60));
    let controller = CallController::new(config).unwrap();

    controller.start_call();
    tokio::time::sleep(Duration::from_millis(10)).await;
    controller.end_call();
    assert_eq!(
        controller.state(),
        CallState::Ended {
            final_elapsed_secs: 0
        }
    );

    // The cancelled connect must never surface an Active state.
    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(
        controller.state(),
        CallState::Ended {
            final_elapsed_secs: 0
        }
    );
}

#[tokio::test]
async fn restart_during_active_call_starts_over() {
    let controller = CallController::new(fast_config()).unwrap();
    controller.start_call();
    wait_for_elapsed(&controller, 1).await;

    // Restart mid-call: back to Connecting, then a fresh Active.
    controller.start_new_call();
    assert_eq!(controller.state(), CallState::Connecting);
    let mut rx = controller.subscribe();
    let state = *rx.wait_for(|s| s.is_active()).await.unwrap();
    assert!(matches!(state, CallState::Active { elapsed_secs, .. } if elapsed_secs <= 1));
}

#[tokio::test]
async fn completed_video_call_lands_in_the_log() {
    let log = CallLog::new();
    let config = fast_config().with_mode(CallMode::Video);
    let controller = CallController::with_log(config, log.clone()).unwrap();

    controller.start_call();
    wait_for_elapsed(&controller, 1).await;
    controller.end_call();

    assert_eq!(log.len(), 1);
    let record = &log.get_all()[0];
    assert_eq!(record.mode, CallMode::Video);
    assert!(record.duration_secs >= 1);
    assert!(record.ended_at >= record.started_at);
    assert_eq!(
        format_elapsed(record.duration_secs),
        format!("00:{:02}", record.duration_secs)
    );
}
