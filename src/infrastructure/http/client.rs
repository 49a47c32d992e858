//! reqwest implementation of the backend port.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, COOKIE};
use reqwest::{Client, ClientBuilder, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::response::{classify, rejection};
use crate::domain::error::DomainError;
use crate::domain::model::{
    CreateGroupPayload, GoalOption, Group, GroupDetails, GroupId, SubjectOption, User,
    UserFilters,
};
use crate::domain::repository::{GroupRepository, Result};
use crate::infrastructure::config::BackendConfig;

/// Talks to the study-group web backend over HTTP, authenticating with the
/// browser session cookie.
pub struct HttpGroupRepository {
    config: BackendConfig,
    client: Client,
}

impl HttpGroupRepository {
    pub fn new(config: &BackendConfig, session_cookie: Option<&str>) -> Result<Self> {
        Self::with_builder(config, session_cookie, Client::builder())
    }

    fn with_builder(
        config: &BackendConfig,
        session_cookie: Option<&str>,
        builder: ClientBuilder,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(cookie) = session_cookie.map(cookie_header).filter(|c| !c.is_empty()) {
            let value = HeaderValue::from_str(&cookie)
                .map_err(|e| DomainError::Config(format!("invalid session cookie: {}", e)))?;
            headers.insert(COOKIE, value);
        }

        let client = builder
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| DomainError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config: config.clone(),
            client,
        })
    }

    /// Send, classify, and unwrap business-level refusals.
    async fn send(&self, request: RequestBuilder) -> Result<Value> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await?;

        tracing::debug!("{} -> {}", url, status);
        let value = classify(
            status,
            content_type.as_deref(),
            &body,
            self.config.sniff_html_redirects,
        )
        .into_result()?;

        match rejection(&value) {
            Some(message) => Err(DomainError::Rejected(message)),
            None => Ok(value),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let request = self.client.get(self.config.url(path)).query(query);
        let value = self.send(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    fn json_query() -> (&'static str, String) {
        ("format", "json".to_string())
    }
}

/// A bare value is taken as the Flask `session` cookie.
fn cookie_header(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() || raw.contains('=') {
        raw.to_string()
    } else {
        format!("session={}", raw)
    }
}

#[async_trait]
impl GroupRepository for HttpGroupRepository {
    async fn current_user(&self) -> Result<User> {
        self.get("/api/user", &[]).await
    }

    async fn subjects(&self) -> Result<Vec<SubjectOption>> {
        self.get("/api/subjects", &[]).await
    }

    async fn goals(&self) -> Result<Vec<GoalOption>> {
        self.get("/api/goals", &[]).await
    }

    async fn find_groups(&self, filters: &UserFilters) -> Result<Vec<Group>> {
        let query = find_groups_query(filters);
        tracing::debug!("Searching groups with {:?}", query);
        self.get("/find-group", &query).await
    }

    async fn my_groups(&self) -> Result<Vec<Group>> {
        self.get("/my-groups", &[Self::json_query()]).await
    }

    async fn group_details(&self, id: &GroupId) -> Result<GroupDetails> {
        self.get(&format!("/group/{}", id), &[Self::json_query()])
            .await
    }

    async fn create_group(&self, payload: &CreateGroupPayload) -> Result<Option<GroupId>> {
        let request = self
            .client
            .post(self.config.url("/create-group"))
            .json(payload);
        let value = self.send(request).await?;
        Ok(created_group_id(&value))
    }

    async fn join_group(&self, id: &GroupId) -> Result<()> {
        let request = self
            .client
            .post(self.config.url(&format!("/join-group/{}", id)))
            .json(&json!({}));
        self.send(request).await?;
        Ok(())
    }

    async fn delete_group(&self, id: &GroupId) -> Result<()> {
        let request = self
            .client
            .delete(self.config.url(&format!("/user-delete-group/{}", id)));
        self.send(request).await?;
        Ok(())
    }

    async fn auto_match(&self) -> Result<Vec<Group>> {
        let request = self
            .client
            .post(self.config.url("/auto-match"))
            .json(&json!({}));
        let value = self.send(request).await?;
        matched_groups(value)
    }
}

/// Listing query: constrained filters only, plus the JSON switch.
fn find_groups_query(filters: &UserFilters) -> Vec<(&'static str, String)> {
    let mut query = filters.query_pairs();
    query.push(HttpGroupRepository::json_query());
    query
}

/// `group_id` from a create response; absent or null ids give `None`.
fn created_group_id(value: &Value) -> Option<GroupId> {
    value
        .get("group_id")
        .filter(|id| !id.is_null())
        .and_then(|id| serde_json::from_value(id.clone()).ok())
}

/// Groups from an auto-match response. No `matched_groups` means no matches.
fn matched_groups(mut value: Value) -> Result<Vec<Group>> {
    match value.get_mut("matched_groups").map(Value::take) {
        Some(groups) if !groups.is_null() => Ok(serde_json::from_value(groups)?),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{NewGroup, UserId};
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const LOGIN_PAGE: &str = "<!DOCTYPE html><html><body><form action=\"/login\"></form></body></html>";

    fn respond(status: &str, content_type: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            content_type,
            body.len(),
            body
        )
    }

    fn json_ok(body: &str) -> String {
        respond("200 OK", "application/json", body)
    }

    fn redirect_to_login() -> String {
        "HTTP/1.1 302 FOUND\r\nLocation: /login\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
            .to_string()
    }

    /// Minimal HTTP/1.1 backend on a local port. Answers by request path and
    /// records each request head.
    struct Backend {
        base_url: String,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl Backend {
        async fn start(routes: Vec<(&'static str, String)>) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let base_url = format!("http://{}", listener.local_addr().unwrap());
            let requests = Arc::new(Mutex::new(Vec::new()));
            let seen = requests.clone();

            tokio::spawn(async move {
                loop {
                    let Ok((mut socket, _)) = listener.accept().await else {
                        break;
                    };
                    let head = read_request(&mut socket).await;
                    let target = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                    let path = target.split('?').next().unwrap_or("/").to_string();
                    seen.lock().unwrap().push(head);

                    let response = routes
                        .iter()
                        .find(|(route, _)| *route == path)
                        .map(|(_, response)| response.clone())
                        .unwrap_or_else(|| respond("404 NOT FOUND", "text/plain", "missing"));
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                }
            });

            Self { base_url, requests }
        }

        fn repo(&self, session: Option<&str>) -> HttpGroupRepository {
            let config = BackendConfig {
                base_url: self.base_url.clone(),
                ..BackendConfig::default()
            };
            // system proxies must not intercept loopback traffic
            HttpGroupRepository::with_builder(&config, session, Client::builder().no_proxy())
                .unwrap()
        }

        fn request_lines(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|head| head.lines().next().unwrap_or_default().to_string())
                .collect()
        }

        fn heads(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    /// Reads the head and any body announced by content-length.
    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut data = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                break;
            }
            data.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&data).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let head = text[..end].to_ascii_lowercase();
                let length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if data.len() >= end + 4 + length {
                    return text[..end].to_string();
                }
            }
        }
        String::from_utf8_lossy(&data).to_string()
    }

    #[test]
    fn test_find_groups_query_omits_unconstrained_filters() {
        let all = UserFilters::new("all", "all", "all");
        assert_eq!(find_groups_query(&all), vec![("format", "json".to_string())]);

        let some = UserFilters::new("math101", "all", "thisWeek");
        assert_eq!(
            find_groups_query(&some),
            vec![
                ("subject", "math101".to_string()),
                ("date", "thisWeek".to_string()),
                ("format", "json".to_string()),
            ]
        );
    }

    #[test]
    fn test_created_group_id() {
        assert_eq!(
            created_group_id(&json!({"group_id": 42})),
            Some(GroupId::from("42"))
        );
        assert_eq!(
            created_group_id(&json!({"group_id": "g-7"})),
            Some(GroupId::from("g-7"))
        );
        assert_eq!(created_group_id(&json!({"group_id": null})), None);
        assert_eq!(created_group_id(&json!({"message": "ok"})), None);
    }

    #[test]
    fn test_matched_groups_missing_or_null_is_empty() {
        assert!(matched_groups(json!({})).unwrap().is_empty());
        assert!(matched_groups(json!({"matched_groups": null})).unwrap().is_empty());

        let groups = matched_groups(json!({"matched_groups": [{"id": 5, "subject": "bio101"}]}))
            .unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id.as_str(), "5");

        assert!(matches!(
            matched_groups(json!({"matched_groups": "nope"})),
            Err(DomainError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_find_groups_sends_filters_and_session() {
        let backend = Backend::start(vec![(
            "/find-group",
            json_ok(r#"[{"id": 1, "subject": "math101", "current_members": 2, "max_members": 5}]"#),
        )])
        .await;
        let repo = backend.repo(Some("abc"));

        let groups = repo
            .find_groups(&UserFilters::new("math101", "all", "thisWeek"))
            .await
            .unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(
            backend.request_lines(),
            vec!["GET /find-group?subject=math101&date=thisWeek&format=json HTTP/1.1"]
        );
        assert!(backend.heads()[0]
            .to_ascii_lowercase()
            .contains("cookie: session=abc"));
    }

    #[tokio::test]
    async fn test_redirect_to_login_page_is_auth_required() {
        let backend = Backend::start(vec![
            ("/my-groups", redirect_to_login()),
            ("/login", respond("200 OK", "text/html; charset=utf-8", LOGIN_PAGE)),
        ])
        .await;
        let repo = backend.repo(None);

        let result = repo.my_groups().await;

        assert!(matches!(result, Err(DomainError::AuthRequired)));
        let lines = backend.request_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("GET /login "));
    }

    #[tokio::test]
    async fn test_unauthorized_status_is_auth_required() {
        let backend = Backend::start(vec![(
            "/api/user",
            respond("401 UNAUTHORIZED", "application/json", r#"{"error": "Not logged in"}"#),
        )])
        .await;

        let result = backend.repo(None).current_user().await;
        assert!(matches!(result, Err(DomainError::AuthRequired)));
    }

    #[tokio::test]
    async fn test_error_body_with_ok_status_is_rejected() {
        let backend = Backend::start(vec![(
            "/join-group/4",
            json_ok(r#"{"error": "Already joined this group"}"#),
        )])
        .await;

        let result = backend.repo(None).join_group(&GroupId::from("4")).await;

        match result {
            Err(DomainError::Rejected(message)) => assert_eq!(message, "Already joined this group"),
            other => panic!("expected rejection, got {:?}", other),
        }
        assert_eq!(backend.request_lines(), vec!["POST /join-group/4 HTTP/1.1"]);
    }

    #[tokio::test]
    async fn test_delete_failure_flag_is_rejected() {
        let backend = Backend::start(vec![(
            "/user-delete-group/9",
            json_ok(r#"{"success": false, "message": "Not authorized"}"#),
        )])
        .await;

        let result = backend.repo(None).delete_group(&GroupId::from("9")).await;
        assert!(matches!(result, Err(DomainError::Rejected(m)) if m == "Not authorized"));
    }

    #[tokio::test]
    async fn test_create_and_auto_match_bodies() {
        let backend = Backend::start(vec![
            ("/create-group", json_ok(r#"{"group_id": 42}"#)),
            ("/auto-match", json_ok("{}")),
        ])
        .await;
        let repo = backend.repo(None);

        let payload = sample_payload();
        assert_eq!(
            repo.create_group(&payload).await.unwrap(),
            Some(GroupId::from("42"))
        );
        assert!(repo.auto_match().await.unwrap().is_empty());
    }

    fn sample_payload() -> CreateGroupPayload {
        NewGroup {
            subject: "math101".into(),
            goal: "midterm".into(),
            date: "2024-05-02".into(),
            time: "18:00".into(),
            location: "Library".into(),
            max_members: None,
        }
        .into_payload(UserId::Number(1))
    }

    #[tokio::test]
    async fn test_server_error_is_transport() {
        let backend = Backend::start(vec![(
            "/my-groups",
            respond("500 INTERNAL SERVER ERROR", "application/json", r#"{"error": "db down"}"#),
        )])
        .await;

        let result = backend.repo(None).my_groups().await;
        assert!(matches!(result, Err(DomainError::Transport(m)) if m.contains("db down")));
    }

    #[test]
    fn test_cookie_header_forms() {
        assert_eq!(cookie_header("abc.def"), "session=abc.def");
        assert_eq!(cookie_header(" session=xyz "), "session=xyz");
        assert_eq!(cookie_header("remember_token=1; session=2"), "remember_token=1; session=2");
        assert_eq!(cookie_header("  "), "");
    }

    #[test]
    fn test_new_rejects_unencodable_cookie() {
        let config = BackendConfig::default();
        assert!(HttpGroupRepository::new(&config, Some("abc")).is_ok());
        assert!(HttpGroupRepository::new(&config, None).is_ok());
        assert!(matches!(
            HttpGroupRepository::new(&config, Some("bad\nvalue")),
            Err(DomainError::Config(_))
        ));
    }
}
