//! Failure normalisation of the HTTP adapter.

use super::helpers::{api_path, server, service_for};
use rstest::rstest;
use serde_json::json;
use tasksync::task::{
    adapters::http::{HttpTaskService, HttpTaskServiceConfig},
    domain::{TaskId, TaskStatus},
    ports::{NewTask, TaskService, TaskServiceError},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

/// A task service call exercised against a misbehaving server.
#[derive(Debug, Clone, Copy)]
enum Call {
    ListActive,
    ListCompleted,
    Create,
    SetStatus,
    Delete,
}

impl Call {
    const fn route(self) -> (&'static str, &'static str) {
        match self {
            Self::ListActive => ("GET", "/tasks"),
            Self::ListCompleted => ("GET", "/tasks/completed"),
            Self::Create => ("POST", "/tasks"),
            Self::SetStatus => ("POST", "/tasks/status"),
            Self::Delete => ("POST", "/tasks/delete"),
        }
    }

    async fn run(self, service: &HttpTaskService) -> Result<(), TaskServiceError> {
        let id = TaskId::server("7");
        match self {
            Self::ListActive => service.list_active().await.map(drop),
            Self::ListCompleted => service.list_completed().await.map(drop),
            Self::Create => service.create(&NewTask::new("A", "")).await.map(drop),
            Self::SetStatus => service.set_status(&id, TaskStatus::Completed).await,
            Self::Delete => service.delete(&id).await,
        }
    }
}

#[rstest]
#[case(Call::ListActive, 200)]
#[case(Call::ListCompleted, 200)]
#[case(Call::Create, 200)]
#[case(Call::SetStatus, 200)]
#[case(Call::Delete, 200)]
#[case(Call::Delete, 502)]
#[tokio::test(flavor = "multi_thread")]
async fn html_page_is_protocol_error(
    #[future] server: MockServer,
    #[case] call: Call,
    #[case] status: u16,
) -> eyre::Result<()> {
    let server = server.await;
    let (verb, route) = call.route();
    Mock::given(method(verb))
        .and(path(api_path(route)))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_raw("<html><body>Fatal error</body></html>", "text/html"),
        )
        .mount(&server)
        .await;

    let result = call.run(&service_for(&server)?).await;

    let Err(TaskServiceError::Protocol(message)) = result else {
        eyre::bail!("expected a protocol error from {call:?}, got {result:?}");
    };
    eyre::ensure!(message.contains("text/html"));
    eyre::ensure!(message.contains("Fatal error"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_json_is_protocol_error(#[future] server: MockServer) -> eyre::Result<()> {
    let server = server.await;
    Mock::given(method("GET"))
        .and(path(api_path("/tasks/completed")))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{\"completedTasks\": [", "application/json"))
        .mount(&server)
        .await;

    let result = service_for(&server)?.list_completed().await;

    eyre::ensure!(matches!(result, Err(TaskServiceError::Protocol(_))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_envelope_field_is_protocol_error(#[future] server: MockServer) -> eyre::Result<()> {
    let server = server.await;
    Mock::given(method("GET"))
        .and(path(api_path("/tasks/completed")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tasks": []})))
        .mount(&server)
        .await;

    let result = service_for(&server)?.list_completed().await;

    eyre::ensure!(matches!(result, Err(TaskServiceError::Protocol(_))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn not_found_status_names_the_task(#[future] server: MockServer) -> eyre::Result<()> {
    let server = server.await;
    Mock::given(method("POST"))
        .and(path(api_path("/tasks/status")))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"error": "no such task"})),
        )
        .mount(&server)
        .await;

    let result = service_for(&server)?
        .set_status(&TaskId::server("12"), TaskStatus::Completed)
        .await;

    eyre::ensure!(result == Err(TaskServiceError::NotFound(TaskId::server("12"))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unprocessable_create_is_validation(#[future] server: MockServer) -> eyre::Result<()> {
    let server = server.await;
    Mock::given(method("POST"))
        .and(path(api_path("/tasks")))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"message": "title too long"})),
        )
        .mount(&server)
        .await;

    let result = service_for(&server)?.create(&NewTask::new("A", "")).await;

    eyre::ensure!(result == Err(TaskServiceError::Validation("title too long".to_owned())));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn server_error_is_rejected_and_retryable(#[future] server: MockServer) -> eyre::Result<()> {
    let server = server.await;
    Mock::given(method("POST"))
        .and(path(api_path("/tasks/delete")))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "database down"})))
        .mount(&server)
        .await;

    let result = service_for(&server)?.delete(&TaskId::server("3")).await;

    let Err(err) = result else {
        eyre::bail!("expected the delete to fail");
    };
    eyre::ensure!(
        err == TaskServiceError::Rejected {
            status: 500,
            message: "database down".to_owned(),
        }
    );
    eyre::ensure!(err.is_retryable());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reported_failure_in_success_response_is_rejected(
    #[future] server: MockServer,
) -> eyre::Result<()> {
    let server = server.await;
    Mock::given(method("POST"))
        .and(path(api_path("/tasks/status")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "task is locked"
        })))
        .mount(&server)
        .await;

    let result = service_for(&server)?
        .set_status(&TaskId::server("4"), TaskStatus::Active)
        .await;

    eyre::ensure!(
        result
            == Err(TaskServiceError::Rejected {
                status: 200,
                message: "task is locked".to_owned(),
            })
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unreachable_service_is_transport_error() -> eyre::Result<()> {
    let config = HttpTaskServiceConfig::new("http://127.0.0.1:9/todo_api").with_timeout_secs(2);
    let service = HttpTaskService::new(&config)?;

    let result = service.list_active().await;

    eyre::ensure!(matches!(result, Err(TaskServiceError::Transport(_))));
    Ok(())
}
