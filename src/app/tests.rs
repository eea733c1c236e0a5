use super::*;
use crate::config::DashboardConfig;
use crate::notices::{MockNoticeClient, Notice, RecordingNoticePresenter};
use crate::status::LifecycleStatus;
use crate::view::RecordingViewBinder;
use std::sync::Arc;
use tokio::time::{sleep, timeout, Duration};

fn create_test_config() -> DashboardConfig {
    let mut config = DashboardConfig::default();
    config.service.start_delay_ms = 10;
    config.service.stop_delay_ms = 10;
    config
}

async fn create_orchestrator(
    config: DashboardConfig,
    client: MockNoticeClient,
) -> (
    DashboardOrchestrator,
    Arc<MockNoticeClient>,
    Arc<RecordingViewBinder>,
    Arc<RecordingNoticePresenter>,
) {
    let client = Arc::new(client);
    let binder = Arc::new(RecordingViewBinder::new());
    let presenter = Arc::new(RecordingNoticePresenter::new());

    let orchestrator = DashboardOrchestrator::with_components(
        config,
        client.clone(),
        binder.clone(),
        presenter.clone(),
    )
    .await
    .unwrap();

    (orchestrator, client, binder, presenter)
}

#[tokio::test]
async fn test_orchestrator_creation() {
    let (orchestrator, _, _, _) =
        create_orchestrator(create_test_config(), MockNoticeClient::empty()).await;

    assert_eq!(
        orchestrator.status_source().current(),
        LifecycleStatus::Stopped
    );
    let states = orchestrator.get_all_component_states().await;
    assert!(states.is_empty());
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let mut config = create_test_config();
    config.system.status_channel_capacity = 0;

    let result = DashboardOrchestrator::new(config).await;
    assert!(matches!(
        result,
        Err(crate::error::DashboardError::Config(_))
    ));
}

#[tokio::test]
async fn test_initial_status_from_config() {
    let mut config = create_test_config();
    config.service.initial_status = "started".to_string();

    let (orchestrator, _, _, _) = create_orchestrator(config, MockNoticeClient::empty()).await;
    assert_eq!(
        orchestrator.status_source().current(),
        LifecycleStatus::Started
    );
}

#[tokio::test]
async fn test_component_state_management() {
    let (mut orchestrator, _, _, _) =
        create_orchestrator(create_test_config(), MockNoticeClient::empty()).await;

    orchestrator.initialize().await.unwrap();
    let states = orchestrator.get_all_component_states().await;
    assert_eq!(states.len(), 3);
    assert_eq!(
        orchestrator.get_component_state("dashboard").await,
        Some(ComponentState::Stopped)
    );

    orchestrator
        .set_component_state("dashboard", ComponentState::Failed)
        .await;
    assert_eq!(
        orchestrator.get_component_state("dashboard").await,
        Some(ComponentState::Failed)
    );
}

#[tokio::test]
async fn test_replay_scenario() {
    let (mut orchestrator, client, binder, presenter) =
        create_orchestrator(create_test_config(), MockNoticeClient::empty()).await;

    let stats = orchestrator
        .replay(&[
            LifecycleStatus::Stopped,
            LifecycleStatus::Starting,
            LifecycleStatus::Started,
            LifecycleStatus::Started,
            LifecycleStatus::Stopping,
            LifecycleStatus::Stopped,
            LifecycleStatus::Started,
        ])
        .await
        .unwrap();

    assert_eq!(client.calls(), 2);
    assert!(presenter.shown().is_empty());
    assert_eq!(binder.pager_enable_count(), 2);
    assert_eq!(stats.activations, 2);
    assert_eq!(
        orchestrator.status_source().current(),
        LifecycleStatus::Started
    );

    // The controller is consumed by the replay
    assert!(orchestrator.replay(&[LifecycleStatus::Stopped]).await.is_err());
}

#[tokio::test]
async fn test_press_connects_and_checks_notices() {
    let notices = vec![Notice::new("legacy inbound fields")];
    let (mut orchestrator, client, binder, presenter) = create_orchestrator(
        create_test_config(),
        MockNoticeClient::with_notices(notices),
    )
    .await;

    orchestrator.initialize().await.unwrap();
    orchestrator.start().await.unwrap();
    assert!(orchestrator.press_action());

    timeout(Duration::from_secs(2), async {
        while presenter.shown().is_empty() {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();

    assert_eq!(
        orchestrator.status_source().current(),
        LifecycleStatus::Started
    );
    assert_eq!(client.calls(), 1);
    assert_eq!(binder.pager_calls(), vec![false, true]);

    orchestrator.request_shutdown(ShutdownReason::UserRequest);
    let exit_code = orchestrator.run().await.unwrap();
    assert_eq!(exit_code, 0);
    assert_eq!(
        orchestrator.get_component_state("dashboard").await,
        Some(ComponentState::Stopped)
    );
}

#[tokio::test]
async fn test_shutdown_without_start() {
    let (mut orchestrator, _, _, _) =
        create_orchestrator(create_test_config(), MockNoticeClient::empty()).await;

    let exit_code = orchestrator.shutdown().await.unwrap();
    assert_eq!(exit_code, 0);
}

#[tokio::test]
async fn test_shutdown_reason_debug_formatting() {
    let reasons = vec![
        ShutdownReason::Signal("SIGTERM".to_string()),
        ShutdownReason::Error("Test error".to_string()),
        ShutdownReason::UserRequest,
        ShutdownReason::ScriptFinished,
    ];

    for reason in reasons {
        let debug_str = format!("{:?}", reason);
        match reason {
            ShutdownReason::Signal(ref sig) => assert!(debug_str.contains(sig)),
            ShutdownReason::Error(ref msg) => assert!(debug_str.contains(msg)),
            ShutdownReason::UserRequest => assert!(debug_str.contains("UserRequest")),
            ShutdownReason::ScriptFinished => assert!(debug_str.contains("ScriptFinished")),
        }
    }
}

#[test]
fn test_shutdown_reason_exit_codes() {
    assert_eq!(ShutdownReason::Signal("SIGINT".to_string()).exit_code(), 0);
    assert_eq!(ShutdownReason::UserRequest.exit_code(), 0);
    assert_eq!(ShutdownReason::ScriptFinished.exit_code(), 0);
    assert_eq!(ShutdownReason::Error("boom".to_string()).exit_code(), 1);
}

#[tokio::test]
async fn test_error_request_sets_exit_code() {
    let (mut orchestrator, _, _, _) =
        create_orchestrator(create_test_config(), MockNoticeClient::empty()).await;

    orchestrator.initialize().await.unwrap();
    orchestrator.request_shutdown(ShutdownReason::Error("status source lost".to_string()));
    assert_eq!(orchestrator.run().await.unwrap(), 1);
}

#[tokio::test]
async fn test_failed_component_fails_shutdown() {
    let (mut orchestrator, _, _, _) =
        create_orchestrator(create_test_config(), MockNoticeClient::empty()).await;

    orchestrator.initialize().await.unwrap();
    orchestrator
        .set_component_state("commands", ComponentState::Failed)
        .await;
    assert_eq!(
        orchestrator.components_in(ComponentState::Failed).await,
        vec!["commands".to_string()]
    );

    // Shutdown resets commands to stopped but still reports the failure
    orchestrator
        .set_component_state("dashboard", ComponentState::Failed)
        .await;
    assert_eq!(orchestrator.shutdown().await.unwrap(), 1);
    assert_eq!(ComponentState::Failed.to_string(), "failed");
}
