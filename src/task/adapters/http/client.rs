//! Task service adapter speaking HTTP with JSON payloads.

use super::{
    config::{ConfigError, HttpTaskServiceConfig, ResolvedEndpoints},
    wire::{
        CompletedList, CreateBody, Created, DeleteBody, Outcome, StatusBody, WireTask,
        WrappedList, decode, excerpt, into_tasks, is_json_content_type,
    },
};
use crate::task::{
    domain::{Task, TaskId, TaskStatus},
    ports::{NewTask, TaskService, TaskServiceError, TaskServiceResult},
};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode, Url, header::CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Task service reached over HTTP.
///
/// Every response is checked for a JSON `Content-Type` before its body is
/// parsed; anything else, such as an HTML error page, is reported as
/// [`TaskServiceError::Protocol`] and never mistaken for an empty list.
#[derive(Debug, Clone)]
pub struct HttpTaskService {
    client: reqwest::Client,
    endpoints: ResolvedEndpoints,
}

/// A parsed JSON response.
struct JsonReply {
    status: StatusCode,
    body: Value,
}

impl JsonReply {
    /// Fails on non-2xx statuses, mapping them onto the error taxonomy.
    ///
    /// `subject` is the task the request addressed, used for not-found
    /// reports.
    fn ensure_success(&self, subject: Option<&TaskId>) -> TaskServiceResult<()> {
        if self.status.is_success() {
            return Ok(());
        }
        let message = Outcome::of(&self.body).message().unwrap_or_else(|| {
            self.status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_owned()
        });
        Err(match (self.status, subject) {
            (StatusCode::NOT_FOUND, Some(id)) => TaskServiceError::NotFound(id.clone()),
            (StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY, _) => {
                TaskServiceError::Validation(message)
            }
            (status, _) => TaskServiceError::Rejected {
                status: status.as_u16(),
                message,
            },
        })
    }

    /// Fails when a 2xx body nevertheless reports a failure.
    fn ensure_not_reported_failure(&self) -> TaskServiceResult<()> {
        match Outcome::of(&self.body).failure() {
            Some(message) => Err(TaskServiceError::Rejected {
                status: self.status.as_u16(),
                message,
            }),
            None => Ok(()),
        }
    }
}

fn classify_transport(err: &reqwest::Error) -> TaskServiceError {
    if err.is_timeout() {
        TaskServiceError::transport(format!("request timed out: {err}"))
    } else if err.is_connect() {
        TaskServiceError::transport(format!("connection failed: {err}"))
    } else {
        TaskServiceError::transport(err)
    }
}

/// Returns the server id of `id`; provisional ids are unknown to the
/// service by construction.
fn server_id(id: &TaskId) -> TaskServiceResult<&str> {
    id.as_server()
        .ok_or_else(|| TaskServiceError::NotFound(id.clone()))
}

impl HttpTaskService {
    /// Builds the adapter from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the URLs or timeout are unusable or the
    /// HTTP client cannot be built.
    pub fn new(config: &HttpTaskServiceConfig) -> Result<Self, ConfigError> {
        let endpoints = config.resolve()?;
        let mut builder = reqwest::Client::builder().timeout(config.timeout()?);
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        Ok(Self {
            client: builder.build()?,
            endpoints,
        })
    }

    /// Builds the adapter around an existing client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client, endpoints: ResolvedEndpoints) -> Self {
        Self { client, endpoints }
    }

    /// Returns the resolved endpoint URLs.
    #[must_use]
    pub const fn endpoints(&self) -> &ResolvedEndpoints {
        &self.endpoints
    }

    async fn get(&self, url: &Url) -> TaskServiceResult<JsonReply> {
        self.exchange(Method::GET, url, self.client.get(url.clone()))
            .await
    }

    async fn post(&self, url: &Url, body: &impl Serialize) -> TaskServiceResult<JsonReply> {
        self.exchange(Method::POST, url, self.client.post(url.clone()).json(body))
            .await
    }

    async fn exchange(
        &self,
        method: Method,
        url: &Url,
        request: RequestBuilder,
    ) -> TaskServiceResult<JsonReply> {
        debug!(%method, %url, "sending task service request");
        let response = request.send().await.map_err(|err| {
            warn!(%method, %url, error = %err, "task service request failed");
            classify_transport(&err)
        })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);
        let text = response
            .text()
            .await
            .map_err(|err| classify_transport(&err))?;

        if !is_json_content_type(content_type.as_deref()) {
            let declared = content_type.as_deref().unwrap_or("no content type");
            warn!(%method, %url, %status, content_type = declared, "task service answered with non-JSON body");
            return Err(TaskServiceError::protocol(format!(
                "{method} {url} answered HTTP {status} with {declared}: {}",
                excerpt(&text)
            )));
        }

        let body = serde_json::from_str(&text).map_err(|err| {
            TaskServiceError::protocol(format!(
                "{method} {url} declared JSON but sent invalid JSON ({err}): {}",
                excerpt(&text)
            ))
        })?;
        debug!(%method, %url, %status, "task service replied");
        Ok(JsonReply { status, body })
    }
}

#[async_trait]
impl TaskService for HttpTaskService {
    async fn list_active(&self) -> TaskServiceResult<Vec<Task>> {
        let reply = self.get(&self.endpoints.list_active).await?;
        reply.ensure_success(None)?;
        if reply.body.is_array() {
            let tasks: Vec<WireTask> = decode(&reply.body, "active task list")?;
            return into_tasks(tasks, TaskStatus::Active);
        }
        reply.ensure_not_reported_failure()?;
        let wrapped: WrappedList = decode(&reply.body, "active task list")?;
        into_tasks(wrapped.tasks, TaskStatus::Active)
    }

    async fn list_completed(&self) -> TaskServiceResult<Vec<Task>> {
        let reply = self.get(&self.endpoints.list_completed).await?;
        reply.ensure_success(None)?;
        reply.ensure_not_reported_failure()?;
        let list: CompletedList = decode(&reply.body, "completed task list")?;
        into_tasks(list.completed_tasks, TaskStatus::Completed)
    }

    async fn create(&self, task: &NewTask) -> TaskServiceResult<Task> {
        let body = CreateBody {
            title: &task.title,
            description: &task.description,
        };
        let reply = self.post(&self.endpoints.create, &body).await?;
        reply.ensure_success(None)?;
        if let Some(message) = Outcome::of(&reply.body).failure() {
            return Err(TaskServiceError::Validation(message));
        }
        let created: Created = decode(&reply.body, "created task")?;
        created.task.into_task(TaskStatus::Active)
    }

    async fn set_status(&self, id: &TaskId, status: TaskStatus) -> TaskServiceResult<()> {
        let body = StatusBody {
            task_id: server_id(id)?,
            status: status.as_str(),
        };
        let reply = self.post(&self.endpoints.set_status, &body).await?;
        reply.ensure_success(Some(id))?;
        reply.ensure_not_reported_failure()
    }

    async fn delete(&self, id: &TaskId) -> TaskServiceResult<()> {
        let body = DeleteBody {
            task_id: server_id(id)?,
        };
        let reply = self.post(&self.endpoints.delete, &body).await?;
        reply.ensure_success(Some(id))?;
        reply.ensure_not_reported_failure()
    }
}
