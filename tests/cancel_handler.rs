// tests/cancel_handler.rs

use std::cell::Cell;
use std::time::Duration;

use ssm_run::command::CommandHandle;
use ssm_run::config::CancelConfig;
use ssm_run::engine::{
    CancelHandler, CancelOutcome, Controller, ControllerOptions, cancel_recorded,
};
use ssm_run::errors::SsmRunError;
use ssm_run::handoff::{ActionsStateStore, HandoffStore};
use ssm_run_test_utils::builders::{RequestBuilder, TARGET, snapshot};
use ssm_run_test_utils::fakes::{FakeDispatch, FakeLogStore, MemoryHandoff, RecordingReporter};
use ssm_run_test_utils::{init_tracing, with_timeout};

#[tokio::test]
async fn empty_slot_is_a_silent_no_op() {
    init_tracing();

    let dispatch = FakeDispatch::new("unused");
    let handoff = MemoryHandoff::new();
    let reporter = RecordingReporter::new();

    let outcome = with_timeout(CancelHandler::new(&dispatch, &handoff, &reporter, TARGET).run()).await;

    assert_eq!(outcome, CancelOutcome::NothingToCancel);
    assert!(dispatch.cancelled().is_empty());
    assert!(reporter.events().is_empty());
}

#[tokio::test]
async fn saved_id_is_cancelled_exactly_once() {
    let dispatch = FakeDispatch::new("unused");
    let handoff = MemoryHandoff::new().with_id("cmd-77");
    let reporter = RecordingReporter::new();

    let outcome = with_timeout(CancelHandler::new(&dispatch, &handoff, &reporter, TARGET).run()).await;

    assert_eq!(outcome, CancelOutcome::Cancelled("cmd-77".to_string()));
    assert_eq!(dispatch.cancelled(), vec![CommandHandle::new("cmd-77", TARGET)]);
    assert_eq!(reporter.infos(), vec!["Cancelled command: cmd-77".to_string()]);
    assert!(reporter.warnings().is_empty());
}

#[tokio::test]
async fn rejected_cancel_becomes_a_warning() {
    let dispatch = FakeDispatch::new("unused").failing_cancel("InvalidCommandId");
    let handoff = MemoryHandoff::new().with_id("cmd-77");
    let reporter = RecordingReporter::new();

    let outcome = with_timeout(CancelHandler::new(&dispatch, &handoff, &reporter, TARGET).run()).await;

    assert_eq!(outcome, CancelOutcome::Failed("InvalidCommandId".to_string()));
    assert_eq!(dispatch.cancelled().len(), 1);
    assert_eq!(
        reporter.warnings(),
        vec!["Failed to cancel command: InvalidCommandId".to_string()]
    );
    assert!(reporter.errors().is_empty());
}

#[tokio::test]
async fn unreadable_slot_skips_the_cancel_call() {
    let dispatch = FakeDispatch::new("unused");
    let handoff = MemoryHandoff::new().with_id("cmd-77").failing_load();
    let reporter = RecordingReporter::new();

    let outcome = with_timeout(CancelHandler::new(&dispatch, &handoff, &reporter, TARGET).run()).await;

    assert!(matches!(outcome, CancelOutcome::Failed(_)));
    assert!(dispatch.cancelled().is_empty());
    assert_eq!(reporter.warnings().len(), 1);
}

#[tokio::test]
async fn controller_handler_cancels_the_command_it_submitted() {
    init_tracing();

    let dispatch = FakeDispatch::new("cmd-run-1")
        .with_statuses(vec![snapshot("Success", Some(0))]);
    let handoff = MemoryHandoff::new();
    let reporter = RecordingReporter::new();
    let controller = Controller::new(
        dispatch.clone(),
        FakeLogStore::new(),
        handoff.clone(),
        reporter.clone(),
        ControllerOptions {
            poll_interval: Duration::from_millis(1),
        },
    );

    let run = with_timeout(controller.run(RequestBuilder::new().build())).await;
    assert!(run.is_ok());
    assert_eq!(handoff.save_count(), 1);

    let outcome = with_timeout(controller.cancel_handler(TARGET).run()).await;

    assert_eq!(outcome, CancelOutcome::Cancelled("cmd-run-1".to_string()));
    assert_eq!(dispatch.cancelled(), vec![CommandHandle::new("cmd-run-1", TARGET)]);
}

fn cancel_config() -> Result<CancelConfig, SsmRunError> {
    Ok(CancelConfig {
        ec2_instance_id: TARGET.to_string(),
        region: Some("eu-west-1".to_string()),
    })
}

#[tokio::test]
async fn cancel_step_with_empty_slot_resolves_nothing() {
    let reporter = RecordingReporter::new();
    let resolved = Cell::new(false);
    let connected = Cell::new(false);

    let outcome = with_timeout(cancel_recorded(
        &MemoryHandoff::new(),
        &reporter,
        || {
            resolved.set(true);
            Err(SsmRunError::Config("Input required and not supplied: ec2_instance_id".into()))
        },
        |_region| {
            connected.set(true);
            async { FakeDispatch::new("unused") }
        },
    ))
    .await;

    assert_eq!(outcome, CancelOutcome::NothingToCancel);
    assert!(!resolved.get(), "inputs must not be validated for an empty slot");
    assert!(!connected.get(), "no client may be built for an empty slot");
    assert!(reporter.events().is_empty());
}

#[tokio::test]
async fn cancel_step_connects_only_with_a_recorded_id() {
    let dispatch = FakeDispatch::new("unused");
    let reporter = RecordingReporter::new();
    let seen_region = std::sync::Mutex::new(None);

    let outcome = with_timeout(cancel_recorded(
        &MemoryHandoff::new().with_id("cmd-post"),
        &reporter,
        cancel_config,
        |region| {
            *seen_region.lock().unwrap() = region;
            let dispatch = dispatch.clone();
            async move { dispatch }
        },
    ))
    .await;

    assert_eq!(outcome, CancelOutcome::Cancelled("cmd-post".to_string()));
    assert_eq!(seen_region.lock().unwrap().as_deref(), Some("eu-west-1"));
    assert_eq!(dispatch.cancelled(), vec![CommandHandle::new("cmd-post", TARGET)]);
}

#[tokio::test]
async fn cancel_step_with_bad_inputs_warns_without_connecting() {
    let reporter = RecordingReporter::new();
    let connected = Cell::new(false);

    let outcome = with_timeout(cancel_recorded(
        &MemoryHandoff::new().with_id("cmd-post"),
        &reporter,
        || Err(SsmRunError::Config("Input required and not supplied: ec2_instance_id".into())),
        |_region| {
            connected.set(true);
            async { FakeDispatch::new("unused") }
        },
    ))
    .await;

    assert!(matches!(outcome, CancelOutcome::Failed(ref m) if m.contains("ec2_instance_id")));
    assert!(!connected.get());
    assert_eq!(reporter.warnings().len(), 1);
}

#[tokio::test]
async fn interrupt_cancels_the_command_saved_to_step_state() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let state_file = dir.path().join("github_state");
    let dispatch = FakeDispatch::new("cmd-long").with_statuses(vec![snapshot("InProgress", None)]);
    let reporter = RecordingReporter::new();
    let controller = Controller::new(
        dispatch.clone(),
        FakeLogStore::new(),
        ActionsStateStore::new(Some(state_file.clone()), None),
        reporter.clone(),
        ControllerOptions {
            poll_interval: Duration::from_millis(1),
        },
    );

    let result = with_timeout(controller.run_until(
        RequestBuilder::new().build(),
        tokio::time::sleep(Duration::from_millis(30)),
    ))
    .await;

    assert!(matches!(result, Err(SsmRunError::Interrupted)));
    assert!(dispatch.poll_count() >= 1);
    assert_eq!(dispatch.cancelled(), vec![CommandHandle::new("cmd-long", TARGET)]);
    assert!(reporter.infos().contains(&"Cancelled command: cmd-long".to_string()));

    let state = std::fs::read_to_string(&state_file).unwrap();
    assert!(state.contains("\ncmd-long\n"));
}

#[tokio::test]
async fn run_finishing_first_ignores_the_interrupt() {
    let dispatch = FakeDispatch::new("cmd-quick").with_statuses(vec![snapshot("Success", Some(0))]);
    let handoff = MemoryHandoff::new();
    let controller = Controller::new(
        dispatch.clone(),
        FakeLogStore::new(),
        handoff.clone(),
        RecordingReporter::new(),
        ControllerOptions {
            poll_interval: Duration::from_millis(1),
        },
    );

    let result = with_timeout(
        controller.run_until(RequestBuilder::new().build(), std::future::pending::<()>()),
    )
    .await;

    assert!(result.is_ok());
    assert!(dispatch.cancelled().is_empty());
    assert_eq!(handoff.load().unwrap().as_deref(), Some("cmd-quick"));
}
