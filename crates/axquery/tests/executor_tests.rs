//! The owning-thread executor.

use axquery::platforms::mock::{MockElement, MockEngine};
use axquery::protocol::{CommandEnvelope, CommandType, Locator};
use axquery::{AutomationError, AxConfig, AxThread, Dispatcher};

fn spawn_textedit() -> AxThread {
    AxThread::spawn(|| {
        // Elements are built on the owning thread and never leave it
        let app = MockElement::new("AXApplication").title("TextEdit");
        let window = MockElement::new("AXWindow").title("Untitled");
        window.add_child(MockElement::new("AXButton").title("Save").action("AXPress"));
        app.add_window(window);
        let engine = MockEngine::new().with_application(&["com.apple.TextEdit"], app);
        Ok(Dispatcher::new(Box::new(engine), AxConfig::default()))
    })
    .unwrap()
}

#[tokio::test]
async fn test_execute_round_trip() {
    let ax = spawn_textedit();
    let response = ax
        .execute(
            CommandEnvelope::new("e1", CommandType::Query)
                .application("com.apple.TextEdit")
                .locator(Locator::role("AXButton")),
        )
        .await
        .unwrap();
    assert!(response.success, "{:?}", response.error);
    assert_eq!(response.command_id, "e1");
}

#[tokio::test]
async fn test_commands_are_answered_in_order() {
    let ax = spawn_textedit();
    for i in 0..5 {
        let id = format!("n{i}");
        let response = ax
            .execute(CommandEnvelope::new(id.clone(), CommandType::Ping))
            .await
            .unwrap();
        assert_eq!(response.command_id, id);
    }
    ax.shutdown();
}

#[test]
fn test_execute_blocking() {
    let ax = spawn_textedit();
    let response = ax
        .execute_blocking(CommandEnvelope::new("b1", CommandType::Ping))
        .unwrap();
    assert!(response.success);
}

#[test]
fn test_factory_failure_is_reported() {
    let result = AxThread::spawn(|| {
        Err(AutomationError::UnsupportedOperation(
            "no accessibility backend".into(),
        ))
    });
    match result {
        Err(AutomationError::UnsupportedOperation(message)) => {
            assert!(message.contains("backend"))
        }
        Err(other) => panic!("unexpected error {other}"),
        Ok(_) => panic!("spawn should fail"),
    }
}
