//! HTTP client for the task-board and case-management REST APIs.
//!
//! One async method per endpoint. Each issues exactly one request, maps a
//! non-2xx response to an [`ApiError`] tagged with the operation, and never
//! retries or caches. Authenticated calls take the [`Session`] explicitly.

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::{ApiError, ApiOp, interpret_error};
use super::listing::Listing;
use crate::model::{
    ActivityEntry, Case, CaseUpdate, Credentials, Notification, PasswordChange, ProfileUpdate,
    Project, RecordKind, Session, Task, TaskDraft, TaskUpdate, TokenPair, User,
};
use crate::ops::board::TaskBackend;

/// Unauthenticated client bound to a base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .build()
            .map_err(|source| ApiError::Transport {
                op: ApiOp::Connect,
                source,
            })?;
        Ok(ApiClient {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, session: &Session, path: &str) -> RequestBuilder {
        self.client
            .get(self.url(path))
            .header(AUTHORIZATION, session.bearer())
    }

    fn post(&self, session: &Session, path: &str) -> RequestBuilder {
        self.client
            .post(self.url(path))
            .header(AUTHORIZATION, session.bearer())
    }

    fn put(&self, session: &Session, path: &str) -> RequestBuilder {
        self.client
            .put(self.url(path))
            .header(AUTHORIZATION, session.bearer())
    }

    fn delete(&self, session: &Session, path: &str) -> RequestBuilder {
        self.client
            .delete(self.url(path))
            .header(AUTHORIZATION, session.bearer())
    }

    /// Bind a session, producing the client the board controller uses
    pub fn authed(&self, session: Session) -> AuthedClient {
        AuthedClient {
            api: self.clone(),
            session,
        }
    }

    // Auth

    /// Exchange credentials for a token pair
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        tracing::info!(username = %credentials.username, "logging in");
        let request = self.client.post(self.url("/api/token/")).json(credentials);
        let pair: TokenPair = send_json(ApiOp::Login, request).await?;
        Ok(pair.into())
    }

    // Tasks

    pub async fn fetch_tasks(
        &self,
        session: &Session,
        project: Option<u64>,
    ) -> Result<Vec<Task>, ApiError> {
        let request = self.get(session, &tasks_path(project));
        send_list(ApiOp::FetchTasks, request).await
    }

    pub async fn create_task(&self, session: &Session, draft: &TaskDraft) -> Result<Task, ApiError> {
        let request = self.post(session, "/api/tasks/").json(draft);
        send_json(ApiOp::CreateTask, request).await
    }

    pub async fn update_task(
        &self,
        session: &Session,
        id: u64,
        update: &TaskUpdate,
    ) -> Result<Task, ApiError> {
        let request = self.put(session, &task_path(id)).json(update);
        send_json(ApiOp::UpdateTask, request).await
    }

    pub async fn delete_task(&self, session: &Session, id: u64) -> Result<(), ApiError> {
        let request = self.delete(session, &task_path(id));
        execute(ApiOp::DeleteTask, request).await.map(|_| ())
    }

    // Lookups

    pub async fn fetch_projects(&self, session: &Session) -> Result<Vec<Project>, ApiError> {
        send_list(ApiOp::FetchProjects, self.get(session, "/api/projects/")).await
    }

    pub async fn fetch_users(&self, session: &Session) -> Result<Vec<User>, ApiError> {
        send_list(ApiOp::FetchUsers, self.get(session, "/api/users/")).await
    }

    pub async fn fetch_me(&self, session: &Session) -> Result<User, ApiError> {
        send_json(ApiOp::FetchMe, self.get(session, "/api/me/")).await
    }

    // Profile

    pub async fn fetch_profile(&self, session: &Session) -> Result<User, ApiError> {
        send_json(ApiOp::FetchProfile, self.get(session, "/api/users/me/")).await
    }

    pub async fn update_profile(
        &self,
        session: &Session,
        update: &ProfileUpdate,
    ) -> Result<User, ApiError> {
        let request = self.put(session, "/api/users/me/").json(update);
        send_json(ApiOp::UpdateProfile, request).await
    }

    pub async fn change_password(
        &self,
        session: &Session,
        change: &PasswordChange,
    ) -> Result<(), ApiError> {
        let request = self
            .post(session, "/api/users/me/change_password/")
            .json(change);
        execute(ApiOp::ChangePassword, request).await.map(|_| ())
    }

    pub async fn fetch_notifications(
        &self,
        session: &Session,
    ) -> Result<Vec<Notification>, ApiError> {
        send_list(
            ApiOp::FetchNotifications,
            self.get(session, "/api/notifications/"),
        )
        .await
    }

    pub async fn fetch_activity(&self, session: &Session) -> Result<Vec<ActivityEntry>, ApiError> {
        send_list(
            ApiOp::FetchActivity,
            self.get(session, "/api/users/me/activity/"),
        )
        .await
    }

    // Case-management records

    pub async fn list_records<T: DeserializeOwned>(
        &self,
        session: &Session,
        kind: RecordKind,
    ) -> Result<Vec<T>, ApiError> {
        send_list(ApiOp::ListRecords(kind), self.get(session, kind.path())).await
    }

    pub async fn create_record<B, T>(
        &self,
        session: &Session,
        kind: RecordKind,
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.post(session, kind.path()).json(body);
        send_json(ApiOp::CreateRecord(kind), request).await
    }

    pub async fn fetch_record<T: DeserializeOwned>(
        &self,
        session: &Session,
        kind: RecordKind,
        id: u64,
    ) -> Result<T, ApiError> {
        let request = self.get(session, &kind.record_path(id));
        send_json(ApiOp::FetchRecord(kind), request).await
    }

    pub async fn fetch_case(&self, session: &Session, id: u64) -> Result<Case, ApiError> {
        send_json(ApiOp::FetchCase, self.get(session, &case_path(id))).await
    }

    pub async fn update_case(
        &self,
        session: &Session,
        id: u64,
        update: &CaseUpdate,
    ) -> Result<Case, ApiError> {
        let request = self.put(session, &case_path(id)).json(update);
        send_json(ApiOp::UpdateCase, request).await
    }

    pub async fn delete_case(&self, session: &Session, id: u64) -> Result<(), ApiError> {
        execute(ApiOp::DeleteCase, self.delete(session, &case_path(id)))
            .await
            .map(|_| ())
    }
}

/// An [`ApiClient`] with a session bound to it
#[derive(Debug, Clone)]
pub struct AuthedClient {
    api: ApiClient,
    session: Session,
}

impl AuthedClient {
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

impl TaskBackend for AuthedClient {
    async fn fetch_tasks(&self, project: Option<u64>) -> Result<Vec<Task>, ApiError> {
        self.api.fetch_tasks(&self.session, project).await
    }

    async fn create_task(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
        self.api.create_task(&self.session, draft).await
    }

    async fn update_task(&self, id: u64, update: &TaskUpdate) -> Result<Task, ApiError> {
        self.api.update_task(&self.session, id, update).await
    }

    async fn delete_task(&self, id: u64) -> Result<(), ApiError> {
        self.api.delete_task(&self.session, id).await
    }
}

/// `/api/tasks/`, filtered by project when one is given
pub fn tasks_path(project: Option<u64>) -> String {
    match project {
        Some(id) => format!("/api/tasks/?project={}", id),
        None => "/api/tasks/".to_string(),
    }
}

fn task_path(id: u64) -> String {
    format!("/api/tasks/{}/", id)
}

fn case_path(id: u64) -> String {
    format!("/cases/{}/", id)
}

/// Send the request and return the body of a 2xx response
async fn execute(op: ApiOp, request: RequestBuilder) -> Result<String, ApiError> {
    let response = request
        .send()
        .await
        .map_err(|source| ApiError::Transport { op, source })?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| ApiError::Transport { op, source })?;
    tracing::debug!(%op, status = status.as_u16(), bytes = body.len(), "api response");
    if status.is_success() {
        Ok(body)
    } else {
        let err = interpret_error(op, status.as_u16(), &body);
        tracing::warn!(%op, status = status.as_u16(), "api request failed");
        Err(err)
    }
}

async fn send_json<T: DeserializeOwned>(op: ApiOp, request: RequestBuilder) -> Result<T, ApiError> {
    let body = execute(op, request).await?;
    decode(op, &body)
}

async fn send_list<T: DeserializeOwned>(
    op: ApiOp,
    request: RequestBuilder,
) -> Result<Vec<T>, ApiError> {
    send_json::<Listing<T>>(op, request)
        .await
        .map(Listing::into_vec)
}

/// Deserialize a success body
pub fn decode<T: DeserializeOwned>(op: ApiOp, body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|source| ApiError::Decode { op, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskStatus;

    #[test]
    fn project_filter_in_query() {
        assert_eq!(tasks_path(None), "/api/tasks/");
        assert_eq!(tasks_path(Some(3)), "/api/tasks/?project=3");
        assert_eq!(task_path(12), "/api/tasks/12/");
        assert_eq!(case_path(5), "/cases/5/");
    }

    #[test]
    fn base_url_trailing_slash_dropped() {
        let client = ApiClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/api/me/"), "http://localhost:8000/api/me/");
    }

    #[test]
    fn decode_paged_tasks() {
        let body = r#"{"count": 1, "results": [{"id": 7, "title": "Ship", "status": "review"}]}"#;
        let tasks = decode::<Listing<Task>>(ApiOp::FetchTasks, body)
            .unwrap()
            .into_vec();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].status, TaskStatus::Review);
    }

    #[test]
    fn decode_failure_is_tagged() {
        let err = decode::<User>(ApiOp::FetchMe, "{\"nope\": true}").unwrap_err();
        assert!(matches!(err, ApiError::Decode { op: ApiOp::FetchMe, .. }));
        assert!(err.to_string().starts_with("fetch current user failed: unexpected response"));
    }

    #[test]
    fn login_response_becomes_session() {
        let pair: TokenPair =
            decode(ApiOp::Login, r#"{"access": "aaa", "refresh": "rrr"}"#).unwrap();
        let session = Session::from(pair);
        assert_eq!(session.bearer(), "Bearer aaa");
        assert_eq!(session.refresh, "rrr");
    }
}
