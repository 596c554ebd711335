mod common;

use std::rc::Rc;
use std::time::Duration;

use futures::executor::block_on;
use scopelab_core::surface::MarkerOp;
use scopelab_core::{
    AnimationName, Config, DiagnosticKind, InMemorySurface, ScopelabError, Session, Severity,
    UiSurface,
};

use common::{immediate_session, noon_clock, tokio_session};

const ABC: [AnimationName; 3] = [
    AnimationName::Pulse,
    AnimationName::Bounce,
    AnimationName::Rotate,
];

fn op(marker: &str, added: bool) -> MarkerOp {
    MarkerOp {
        id: "box".to_string(),
        marker: marker.to_string(),
        added,
    }
}

#[test]
fn three_steps_give_three_progress_entries_and_one_completion() {
    let (surface, clock, session) = immediate_session();
    let summary = block_on(session.runner().run("box", &ABC, Some(Duration::from_millis(250))))
        .unwrap();
    assert_eq!(summary.target, "box");
    assert_eq!(summary.steps_completed, 3);

    let entries = session.log().entries(None);
    let messages: Vec<&str> = entries.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Animation 1/3: pulse",
            "Animation 2/3: bounce",
            "Animation 3/3: rotate",
            "Animation sequence completed!",
        ]
    );
    assert!(entries[..3].iter().all(|e| e.severity == Severity::Info));
    assert_eq!(entries[3].severity, Severity::Success);

    assert_eq!(clock.sleeps(), vec![Duration::from_millis(250); 3]);
    assert!(surface.markers("box").unwrap().is_empty());
    assert_eq!(
        surface.marker_ops(),
        vec![
            op("pulse", true),
            op("pulse", false),
            op("bounce", true),
            op("bounce", false),
            op("rotate", true),
            op("rotate", false),
        ]
    );
}

#[test]
fn leftover_markers_are_cleared_before_the_first_step() {
    let (surface, _, session) = immediate_session();
    surface.add_marker("box", "shake").unwrap();
    surface.add_marker("box", "highlight").unwrap();

    block_on(session.runner().run("box", &[AnimationName::Flip], None)).unwrap();

    let ops = surface.marker_ops();
    // ops[0] and ops[1] are the two seeded markers.
    assert_eq!(ops[2], op("shake", false));
    assert_eq!(ops[3], op("flip", true));
    // Non-animation markers survive the reset.
    assert_eq!(
        surface.markers("box").unwrap(),
        vec!["highlight".to_string()]
    );
}

#[test]
fn default_delay_comes_from_config() {
    let (_, clock, session) = immediate_session();
    block_on(session.runner().run("box", &[AnimationName::Pulse], None)).unwrap();
    assert_eq!(clock.sleeps(), vec![Duration::from_millis(1000)]);
}

#[test]
fn missing_target_does_nothing_but_report() {
    let (surface, clock, session) = immediate_session();
    let err = block_on(session.runner().run("ghost", &ABC, None)).unwrap_err();
    assert_eq!(err, ScopelabError::not_found("ghost"));
    assert!(session.log().is_empty(None));
    assert!(surface.marker_ops().is_empty());
    assert!(clock.sleeps().is_empty());
    assert_eq!(session.diagnostics().count(DiagnosticKind::NotFound), 1);
}

#[test]
fn run_without_a_log_surface_still_animates() {
    let surface = Rc::new(InMemorySurface::new().with_element("box"));
    let session = Session::new(surface.clone(), noon_clock(), Config::default());
    let summary = block_on(session.runner().run("box", &ABC, Some(Duration::ZERO))).unwrap();
    assert_eq!(summary.steps_completed, 3);
    assert_eq!(surface.marker_ops().len(), 6);
    assert!(session.log().is_empty(None));
    assert_eq!(session.diagnostics().count(DiagnosticKind::NotFound), 4);
}

#[test]
fn empty_sequence_only_logs_completion() {
    let (_, clock, session) = immediate_session();
    let summary = block_on(session.runner().run("box", &[], None)).unwrap();
    assert_eq!(summary.steps_completed, 0);
    let entries = session.log().entries(None);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].severity, Severity::Success);
    assert!(clock.sleeps().is_empty());
}

#[test]
fn run_ids_are_allocated_per_run() {
    let (_, _, session) = immediate_session();
    let a = block_on(session.runner().run("box", &[AnimationName::Pulse], None)).unwrap();
    let b = block_on(session.runner().run("box", &[AnimationName::Pulse], None)).unwrap();
    assert_ne!(a.run, b.run);
}

#[tokio::test(start_paused = true)]
async fn second_run_on_same_target_is_rejected() {
    let (surface, session) = tokio_session();
    let runner = session.runner();

    let first = runner.run("box", &ABC, Some(Duration::from_millis(100)));
    let second = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(runner.is_running("box"));
        runner.run("box", &[AnimationName::Shake], None).await
    };
    let (first, second) = tokio::join!(first, second);

    assert_eq!(first.unwrap().steps_completed, 3);
    assert_eq!(
        second.unwrap_err(),
        ScopelabError::RunInProgress {
            target: "box".to_string()
        }
    );
    assert_eq!(session.diagnostics().count(DiagnosticKind::RunRejected), 1);
    assert!(!surface
        .marker_ops()
        .iter()
        .any(|o| o.marker == "shake"));
    assert_eq!(session.log().len(None), 4);

    // The target is free again once the first run has finished.
    assert!(!runner.is_running("box"));
    let again = runner
        .run("box", &[AnimationName::Shake], Some(Duration::from_millis(5)))
        .await;
    assert!(again.is_ok());
}

#[tokio::test(start_paused = true)]
async fn runs_on_different_targets_interleave() {
    let (surface, session) = tokio_session();
    let runner = session.runner();

    let a = runner.run(
        "box",
        &[AnimationName::Pulse, AnimationName::Bounce],
        Some(Duration::from_millis(100)),
    );
    let b = runner.run(
        "box-2",
        &[AnimationName::Shake, AnimationName::Flip],
        Some(Duration::from_millis(150)),
    );
    let probe = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        (surface.markers("box").unwrap(), surface.markers("box-2").unwrap())
    };
    let (a, b, (box_markers, box2_markers)) = tokio::join!(a, b, probe);
    a.unwrap();
    b.unwrap();

    assert_eq!(box_markers, vec!["pulse".to_string()]);
    assert_eq!(box2_markers, vec!["shake".to_string()]);

    let messages: Vec<String> = session
        .log()
        .entries(None)
        .into_iter()
        .map(|e| e.message)
        .collect();
    assert_eq!(
        messages,
        vec![
            "Animation 1/2: pulse",
            "Animation 1/2: shake",
            "Animation 2/2: bounce",
            "Animation 2/2: flip",
            "Animation sequence completed!",
            "Animation sequence completed!",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn dropping_a_run_releases_its_target() {
    let (surface, session) = tokio_session();
    let runner = session.runner();
    {
        let run = runner.run("box", &ABC, Some(Duration::from_secs(5)));
        let timed_out = tokio::time::timeout(Duration::from_millis(10), run).await;
        assert!(timed_out.is_err());
    }
    assert!(!runner.is_running("box"));
    // The dropped run left its first marker behind; the next run resets it.
    assert_eq!(surface.markers("box").unwrap(), vec!["pulse".to_string()]);
    runner
        .run("box", &[AnimationName::Flip], Some(Duration::from_millis(1)))
        .await
        .unwrap();
    assert!(surface.markers("box").unwrap().is_empty());
}
