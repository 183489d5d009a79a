//! Listing tasks over HTTP.

use super::helpers::{api_path, server, service_for};
use rstest::rstest;
use serde_json::json;
use tasksync::task::{
    domain::{TaskId, TaskStatus},
    ports::TaskService,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_active_reads_bare_array(#[future] server: MockServer) -> eyre::Result<()> {
    let server = server.await;
    Mock::given(method("GET"))
        .and(path(api_path("/tasks")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "Write report", "description": "quarterly", "completed": 0},
            {"id": "2", "title": "Call plumber"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let tasks = service_for(&server)?.list_active().await?;

    eyre::ensure!(tasks.len() == 2);
    let ids: Vec<&TaskId> = tasks.iter().map(|task| task.id()).collect();
    eyre::ensure!(ids == [&TaskId::server("1"), &TaskId::server("2")]);
    eyre::ensure!(tasks.iter().all(|task| task.status() == TaskStatus::Active));
    eyre::ensure!(tasks.first().map(|task| task.description()) == Some("quarterly"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_active_reads_wrapped_list(#[future] server: MockServer) -> eyre::Result<()> {
    let server = server.await;
    Mock::given(method("GET"))
        .and(path(api_path("/tasks")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "tasks": [{"id": 7, "title": "Buy milk", "status": "active"}]
        })))
        .mount(&server)
        .await;

    let tasks = service_for(&server)?.list_active().await?;

    eyre::ensure!(tasks.len() == 1);
    eyre::ensure!(tasks.first().map(|task| task.title()) == Some("Buy milk"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_completed_reads_envelope(#[future] server: MockServer) -> eyre::Result<()> {
    let server = server.await;
    Mock::given(method("GET"))
        .and(path(api_path("/tasks/completed")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "completedTasks": [
                {"id": 3, "title": "File taxes", "completed": true},
                {"id": 4, "title": "Renew passport"}
            ]
        })))
        .mount(&server)
        .await;

    let tasks = service_for(&server)?.list_completed().await?;

    eyre::ensure!(tasks.len() == 2);
    eyre::ensure!(tasks.iter().all(|task| task.status() == TaskStatus::Completed));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_lists_are_empty(#[future] server: MockServer) -> eyre::Result<()> {
    let server = server.await;
    Mock::given(method("GET"))
        .and(path(api_path("/tasks/completed")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"completedTasks": []})))
        .mount(&server)
        .await;

    let tasks = service_for(&server)?.list_completed().await?;

    eyre::ensure!(tasks.is_empty());
    Ok(())
}
