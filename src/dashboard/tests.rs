use super::*;
use crate::config::DashboardConfig;
use crate::notices::{MockNoticeClient, Notice, RecordingNoticePresenter};
use crate::status::LifecycleStatus;
use crate::status_source::StatusSource;
use crate::view::{derive, ActionLabel, RecordingViewBinder, ServiceCommand};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout, Duration};
use tokio_util::sync::CancellationToken;

struct Harness {
    controller: DashboardController,
    client: Arc<MockNoticeClient>,
    binder: Arc<RecordingViewBinder>,
    presenter: Arc<RecordingNoticePresenter>,
}

fn create_harness(client: MockNoticeClient) -> Harness {
    let client = Arc::new(client);
    let binder = Arc::new(RecordingViewBinder::new());
    let presenter = Arc::new(RecordingNoticePresenter::new());

    let controller = DashboardController::builder()
        .with_notice_client(client.clone())
        .with_view_binder(binder.clone())
        .with_presenter(presenter.clone())
        .build()
        .unwrap();

    Harness {
        controller,
        client,
        binder,
        presenter,
    }
}

fn notices(count: usize) -> Vec<Notice> {
    (0..count)
        .map(|i| Notice::new(format!("outbound option {}", i)))
        .collect()
}

#[test]
fn test_builder_requires_collaborators() {
    let result = DashboardController::builder()
        .with_view_binder(Arc::new(RecordingViewBinder::new()))
        .build();
    assert!(result.is_err());
}

#[tokio::test]
async fn test_each_status_applies_its_descriptor() {
    let mut harness = create_harness(MockNoticeClient::empty());

    for status in [
        LifecycleStatus::Stopped,
        LifecycleStatus::Starting,
        LifecycleStatus::Started,
        LifecycleStatus::Stopping,
        LifecycleStatus::Unknown(17),
    ] {
        harness.controller.on_status(status);
        assert_eq!(
            harness.binder.last_descriptor(),
            Some(derive(status).descriptor)
        );
    }

    assert_eq!(harness.binder.descriptors().len(), 5);
}

#[tokio::test]
async fn test_status_sequence_scenario() {
    let mut harness = create_harness(MockNoticeClient::empty());

    for status in [
        LifecycleStatus::Stopped,
        LifecycleStatus::Starting,
        LifecycleStatus::Started,
        LifecycleStatus::Started,
        LifecycleStatus::Stopping,
        LifecycleStatus::Stopped,
        LifecycleStatus::Started,
    ] {
        harness.controller.on_status(status);
    }
    harness.controller.settle().await;

    assert_eq!(harness.client.calls(), 2);
    assert!(harness.presenter.shown().is_empty());
    assert!(harness.presenter.errors().is_empty());
    assert_eq!(harness.binder.pager_enable_count(), 2);

    let stats = harness.controller.stats();
    assert_eq!(stats.status_changes, 7);
    assert_eq!(stats.activations, 2);
    assert_eq!(stats.notice_checks, 2);
    assert_eq!(stats.pager_enabled, 2);
}

#[tokio::test]
async fn test_repeated_started_fetches_once() {
    let mut harness = create_harness(MockNoticeClient::empty());

    harness.controller.on_status(LifecycleStatus::Started);
    harness.controller.on_status(LifecycleStatus::Started);
    harness.controller.settle().await;

    assert_eq!(harness.client.calls(), 1);
    assert_eq!(harness.binder.pager_enable_count(), 1);
    // Descriptor is still level-triggered
    assert_eq!(harness.binder.descriptors().len(), 2);
}

#[tokio::test]
async fn test_rearm_fetches_twice() {
    let mut harness = create_harness(MockNoticeClient::empty());

    harness.controller.on_status(LifecycleStatus::Started);
    harness.controller.on_status(LifecycleStatus::Stopped);
    harness.controller.on_status(LifecycleStatus::Started);
    harness.controller.settle().await;

    assert_eq!(harness.client.calls(), 2);
}

#[tokio::test]
async fn test_two_notices_shown_once() {
    let mut harness = create_harness(MockNoticeClient::with_notices(notices(2)));

    harness.controller.on_status(LifecycleStatus::Started);
    harness.controller.settle().await;

    let shown = harness.presenter.shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].len(), 2);
    assert!(harness.presenter.errors().is_empty());
    assert_eq!(harness.controller.stats().notices_delivered, 1);
}

#[tokio::test]
async fn test_fetch_failure_shows_error_once() {
    let mut harness = create_harness(MockNoticeClient::failing("connection refused"));

    harness.controller.on_status(LifecycleStatus::Started);
    harness.controller.on_status(LifecycleStatus::Started);
    harness.controller.settle().await;

    assert_eq!(harness.presenter.errors().len(), 1);
    assert!(harness.presenter.shown().is_empty());

    let stats = harness.controller.stats();
    assert_eq!(stats.fetch_failures, 1);
    assert_eq!(stats.failure_rate(), 1.0);
}

#[tokio::test]
async fn test_failure_does_not_disturb_view_state() {
    let mut harness = create_harness(MockNoticeClient::failing("connection refused"));

    harness.controller.on_status(LifecycleStatus::Started);
    harness.controller.settle().await;
    harness.controller.on_status(LifecycleStatus::Stopping);

    assert_eq!(
        harness.controller.last_status(),
        Some(LifecycleStatus::Stopping)
    );
    assert_eq!(
        harness.binder.last_descriptor().unwrap().action_label,
        Some(ActionLabel::Disconnecting)
    );
}

#[tokio::test]
async fn test_teardown_suppresses_outstanding_result() {
    let mut harness = create_harness(MockNoticeClient::with_notices(notices(1)).gated());

    harness.controller.on_status(LifecycleStatus::Started);
    harness.controller.tear_down();
    harness.client.release(1);
    harness.controller.settle().await;

    assert!(harness.presenter.shown().is_empty());
    assert!(harness.presenter.errors().is_empty());
    assert_eq!(harness.controller.stats().suppressed_completions, 1);
    assert!(harness.controller.is_torn_down());
}

#[tokio::test]
async fn test_status_after_teardown_is_ignored() {
    let mut harness = create_harness(MockNoticeClient::empty());

    harness.controller.tear_down();
    harness.controller.on_status(LifecycleStatus::Started);

    assert!(harness.binder.descriptors().is_empty());
    assert_eq!(harness.client.calls(), 0);
}

#[tokio::test]
async fn test_attach_disables_pager_first() {
    let mut harness = create_harness(MockNoticeClient::empty());

    harness.controller.attach(LifecycleStatus::Started);
    harness.controller.settle().await;

    assert_eq!(harness.binder.pager_calls(), vec![false, true]);
    assert_eq!(harness.client.calls(), 1);
}

#[tokio::test]
async fn test_attach_respects_pager_config() {
    let mut config = DashboardConfig::default();
    config.pager.start_disabled = false;
    config.notices.enabled = false;

    let client = Arc::new(MockNoticeClient::empty());
    let binder = Arc::new(RecordingViewBinder::new());
    let mut controller = DashboardController::builder()
        .with_config(&config)
        .with_notice_client(client.clone())
        .with_view_binder(binder.clone())
        .with_presenter(Arc::new(RecordingNoticePresenter::new()))
        .build()
        .unwrap();

    controller.attach(LifecycleStatus::Stopped);
    controller.on_status(LifecycleStatus::Started);
    controller.settle().await;

    assert_eq!(binder.pager_calls(), vec![true]);
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_press_action() {
    let mut harness = create_harness(MockNoticeClient::empty());

    // Nothing observed yet counts as stopped
    assert_eq!(
        harness.controller.press_action(),
        Some(ServiceCommand::Start)
    );
    assert_eq!(harness.binder.action_enabled_calls(), vec![false]);

    harness.controller.on_status(LifecycleStatus::Starting);
    assert_eq!(harness.controller.press_action(), None);

    harness.controller.on_status(LifecycleStatus::Started);
    assert_eq!(
        harness.controller.press_action(),
        Some(ServiceCommand::Stop)
    );
    assert_eq!(harness.binder.action_enabled_calls(), vec![false]);
}

#[tokio::test]
async fn test_run_loop_marshals_results() {
    let source = StatusSource::new(16, LifecycleStatus::Stopped);
    let harness = create_harness(MockNoticeClient::with_notices(notices(2)));
    let presenter = Arc::clone(&harness.presenter);
    let client = Arc::clone(&harness.client);
    let shutdown = CancellationToken::new();

    let receiver = source.subscribe("dashboard");
    let (_press_tx, press_rx) = mpsc::unbounded_channel();
    let (command_tx, _command_rx) = mpsc::unbounded_channel();
    let run = tokio::spawn(
        harness
            .controller
            .run(receiver, press_rx, command_tx, shutdown.clone()),
    );

    source.publish(LifecycleStatus::Starting);
    source.publish(LifecycleStatus::Started);
    source.publish(LifecycleStatus::Started);

    timeout(Duration::from_secs(2), async {
        while presenter.shown().is_empty() {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();

    shutdown.cancel();
    let stats = run.await.unwrap().unwrap();

    assert_eq!(client.calls(), 1);
    assert_eq!(presenter.shown().len(), 1);
    assert_eq!(presenter.shown()[0].len(), 2);
    assert_eq!(stats.status_changes, 3);
    assert_eq!(stats.activations, 1);
}

#[tokio::test]
async fn test_run_loop_ends_when_source_closes() {
    let source = StatusSource::new(4, LifecycleStatus::Stopped);
    let harness = create_harness(MockNoticeClient::empty());

    let receiver = source.subscribe("dashboard");
    drop(source);
    let (_press_tx, press_rx) = mpsc::unbounded_channel();
    let (command_tx, _command_rx) = mpsc::unbounded_channel();

    let stats = timeout(
        Duration::from_secs(1),
        harness
            .controller
            .run(receiver, press_rx, command_tx, CancellationToken::new()),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(stats.status_changes, 0);
}

#[tokio::test]
async fn test_run_loop_turns_presses_into_commands() {
    let source = StatusSource::new(16, LifecycleStatus::Stopped);
    let mut harness = create_harness(MockNoticeClient::empty());
    harness.controller.attach(source.current());
    let shutdown = CancellationToken::new();

    let receiver = source.subscribe("dashboard");
    let (press_tx, press_rx) = mpsc::unbounded_channel();
    let (command_tx, mut command_rx) = mpsc::unbounded_channel();
    let run = tokio::spawn(
        harness
            .controller
            .run(receiver, press_rx, command_tx, shutdown.clone()),
    );

    press_tx.send(()).unwrap();
    let command = timeout(Duration::from_secs(1), command_rx.recv())
        .await
        .unwrap();
    assert_eq!(command, Some(ServiceCommand::Start));

    shutdown.cancel();
    run.await.unwrap().unwrap();
}
