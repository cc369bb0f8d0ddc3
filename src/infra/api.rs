//! Asynchronous client for the back-office REST API.
//!
//! - Attaches the bearer token to every call except login.
//! - Keeps list queries in an in-memory cache with a TTL and serves the stale
//!   copy when a refresh fails. Mutations call [`ApiClient::invalidate`].

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, SystemTime},
};

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{multipart, Client, RequestBuilder, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::domain::auth::{LoginRequest, LoginResponse};
use crate::domain::ship::{
    empty_strings_to_null, DocumentUpload, EntityId, FournisseurSummaryDto, GetFournisseursFilter,
    GetReceiversFilter, GetShipsFilter, ReceiverSummaryDto, ShipDto, ShipSubmission,
    ShipsExportFilter, SubCategorySummaryDto,
};
use crate::domain::users::{RoleDto, UserDto, UserRequest};

pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);
const USER_AGENT: &str = concat!("mariner-desk/", env!("CARGO_PKG_VERSION"));
const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("base URL cannot be extended: {0}")]
    InvalidBase(String),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("session expired, please log in again")]
    Unauthorized,
    #[error("server responded {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    Fresh,
    Cached,
    Stale,
}

#[derive(Clone, Debug)]
pub struct CachedPayload<T> {
    pub data: T,
    pub fetched_at: SystemTime,
    pub status: CacheStatus,
}

impl<T> CachedPayload<T> {
    fn new(data: T, fetched_at: SystemTime, status: CacheStatus) -> Self {
        Self {
            data,
            fetched_at,
            status,
        }
    }
}

impl CachedPayload<Value> {
    fn decode<T: DeserializeOwned>(self) -> Result<CachedPayload<T>, ApiError> {
        let data = serde_json::from_value(self.data)?;
        Ok(CachedPayload::new(data, self.fetched_at, self.status))
    }
}

struct Cached<T> {
    value: T,
    fetched_at: SystemTime,
}

impl<T: Clone> Cached<T> {
    fn new(value: T, fetched_at: SystemTime) -> Self {
        Self { value, fetched_at }
    }

    fn if_fresh(&self, ttl: Duration) -> Option<CachedPayload<T>> {
        if self
            .fetched_at
            .elapsed()
            .map(|elapsed| elapsed <= ttl)
            .unwrap_or(false)
        {
            Some(CachedPayload::new(
                self.value.clone(),
                self.fetched_at,
                CacheStatus::Cached,
            ))
        } else {
            None
        }
    }

    fn stale(&self) -> CachedPayload<T> {
        CachedPayload::new(self.value.clone(), self.fetched_at, CacheStatus::Stale)
    }
}

/// Raw JSON of GET queries keyed by full URL.
#[derive(Default)]
struct QueryCache {
    entries: HashMap<String, Cached<Value>>,
}

impl QueryCache {
    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// A stored document as returned by `GET /documents/{id}`.
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentBlob {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl DocumentBlob {
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type.starts_with(PDF_MIME)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    cache: Arc<Mutex<QueryCache>>,
    token: Arc<RwLock<Option<String>>>,
    ttl: Duration,
}

impl PartialEq for ApiClient {
    fn eq(&self, other: &Self) -> bool {
        self.base_url == other.base_url && Arc::ptr_eq(&self.cache, &other.cache)
    }
}

impl ApiClient {
    pub fn with_base_url(base: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base)?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBase(base.to_string()));
        }
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url,
            cache: Arc::new(Mutex::new(QueryCache::default())),
            token: Arc::new(RwLock::new(None)),
            ttl: DEFAULT_TTL,
        })
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Starts with a token restored from a previous run.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = Arc::new(RwLock::new(token));
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    /// Drops every cached query so the next read hits the backend.
    pub async fn invalidate(&self) {
        debug!("Invalidating query cache");
        self.cache.lock().await.clear();
    }

    // ---- auth ----

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let url = self.endpoint(&["auth", "login"])?;
        // No bearer header here, even if a stale token is still around.
        let response = match self.http.post(url).json(request).send().await {
            Ok(response) => response,
            Err(err) => {
                error!("[HTTP_ERROR] login: {err}");
                return Err(err.into());
            }
        };
        let response = check_status(response, "login").await?;
        Ok(response.json().await?)
    }

    // ---- ships ----

    /// Creates the ship with empty strings sent as `null`, then uploads its documents.
    pub async fn create_ship(&self, submission: &ShipSubmission) -> Result<EntityId, ApiError> {
        let mut body = serde_json::to_value(&submission.ship)?;
        empty_strings_to_null(&mut body);

        let url = self.endpoint(&["ships"])?;
        let response = self
            .send(self.http.post(url).json(&body), "create ship")
            .await?;
        let id = read_id(response).await?;
        info!("[CREATED SHIP] {id}");

        self.upload_documents(&id, &submission.documents).await?;
        self.invalidate().await;
        Ok(id)
    }

    /// Updates the ship as-is (empty strings are kept) and uploads any new documents.
    pub async fn update_ship(&self, id: &str, submission: &ShipSubmission) -> Result<(), ApiError> {
        let url = self.endpoint(&["ships", id])?;
        self.send(self.http.put(url).json(&submission.ship), "update ship")
            .await?;
        self.upload_documents(id, &submission.documents).await?;
        self.invalidate().await;
        Ok(())
    }

    /// Sends a full ship payload without touching documents, as the fleet conversion does.
    pub async fn put_ship(&self, id: &str, ship: &ShipDto) -> Result<(), ApiError> {
        let url = self.endpoint(&["ships", id])?;
        self.send(self.http.put(url).json(ship), "update ship").await?;
        self.invalidate().await;
        Ok(())
    }

    pub async fn delete_ship(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["ships", id])?;
        self.send(self.http.delete(url), "delete ship").await?;
        self.invalidate().await;
        Ok(())
    }

    pub async fn get_ship(&self, id: &str) -> Result<ShipDto, ApiError> {
        let url = self.endpoint(&["ships", id])?;
        self.get_json(url, "get ship").await
    }

    pub async fn get_ships(
        &self,
        filter: &GetShipsFilter,
    ) -> Result<CachedPayload<Vec<ShipDto>>, ApiError> {
        let url = with_query(self.endpoint(&["ships"])?, &filter.query_pairs());
        self.get_cached(url, "get ships").await
    }

    pub async fn get_fleets(
        &self,
        filter: &GetShipsFilter,
    ) -> Result<CachedPayload<Vec<ShipDto>>, ApiError> {
        let url = with_query(self.endpoint(&["ships", "fleets"])?, &filter.query_pairs());
        self.get_cached(url, "get fleets").await
    }

    pub async fn get_ships_by_agent(&self, agent: &str) -> Result<Vec<ShipDto>, ApiError> {
        let url = self.endpoint(&["ships", "by-agent", agent])?;
        self.get_json(url, "get ships by agent").await
    }

    pub async fn export_ships_pdf(&self, filter: &ShipsExportFilter) -> Result<Vec<u8>, ApiError> {
        let url = with_query(
            self.endpoint(&["ships", "export-all-pdf"])?,
            &filter.query_pairs(),
        );
        self.get_pdf(url, "export ships").await
    }

    pub async fn export_ship_cargoes_pdf(&self, id: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint(&["ships", id, "export", "pdf"])?;
        self.get_pdf(url, "export ship cargoes").await
    }

    // ---- receivers ----

    pub async fn get_receivers(
        &self,
        filter: &GetReceiversFilter,
    ) -> Result<CachedPayload<Vec<ReceiverSummaryDto>>, ApiError> {
        let url = with_query(
            self.endpoint(&["ships", "receivers"])?,
            &filter.query_pairs(),
        );
        self.get_cached(url, "get receivers").await
    }

    pub async fn export_receiver_pdf(&self, id: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint(&["receivers", id, "export-pdf"])?;
        self.get_pdf(url, "export receiver").await
    }

    pub async fn export_receivers_pdf(
        &self,
        filter: &GetReceiversFilter,
    ) -> Result<Vec<u8>, ApiError> {
        let url = with_query(
            self.endpoint(&["receivers", "export-all-pdf"])?,
            &filter.query_pairs(),
        );
        self.get_pdf(url, "export receivers").await
    }

    // ---- fournisseurs ----

    pub async fn get_fournisseurs(
        &self,
        filter: &GetFournisseursFilter,
    ) -> Result<CachedPayload<Vec<FournisseurSummaryDto>>, ApiError> {
        let url = with_query(self.endpoint(&["fournisseurs"])?, &filter.query_pairs());
        self.get_cached(url, "get fournisseurs").await
    }

    pub async fn get_fournisseur(&self, id: &str) -> Result<FournisseurSummaryDto, ApiError> {
        let url = self.endpoint(&["fournisseurs", id])?;
        self.get_json(url, "get fournisseur").await
    }

    pub async fn export_fournisseur_pdf(&self, id: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint(&["fournisseurs", id, "export-pdf"])?;
        self.get_pdf(url, "export fournisseur").await
    }

    pub async fn export_fournisseurs_pdf(
        &self,
        filter: &GetFournisseursFilter,
    ) -> Result<Vec<u8>, ApiError> {
        let url = with_query(
            self.endpoint(&["fournisseurs", "export-all-pdf"])?,
            &filter.query_pairs(),
        );
        self.get_pdf(url, "export fournisseurs").await
    }

    // ---- sub-categories ----

    pub async fn get_sub_category_summaries(
        &self,
    ) -> Result<CachedPayload<Vec<SubCategorySummaryDto>>, ApiError> {
        let url = self.endpoint(&["subcategories", "summaries"])?;
        self.get_cached(url, "get sub-category summaries").await
    }

    pub async fn export_sub_category_pdf(&self, name: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint(&["subcategories", name, "export-pdf"])?;
        self.get_pdf(url, "export sub-category").await
    }

    // ---- users ----

    pub async fn get_users(&self) -> Result<CachedPayload<Vec<UserDto>>, ApiError> {
        let url = self.endpoint(&["users"])?;
        self.get_cached(url, "get users").await
    }

    pub async fn get_roles(&self) -> Result<CachedPayload<Vec<RoleDto>>, ApiError> {
        let url = self.endpoint(&["roles"])?;
        self.get_cached(url, "get roles").await
    }

    pub async fn create_user(&self, request: &UserRequest) -> Result<EntityId, ApiError> {
        let url = self.endpoint(&["users"])?;
        let response = self
            .send(self.http.post(url).json(request), "create user")
            .await?;
        let id = read_id(response).await?;
        self.invalidate().await;
        Ok(id)
    }

    pub async fn update_user(&self, id: &str, request: &UserRequest) -> Result<(), ApiError> {
        let url = self.endpoint(&["users", id])?;
        self.send(self.http.put(url).json(request), "update user")
            .await?;
        self.invalidate().await;
        Ok(())
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["users", id])?;
        self.send(self.http.delete(url), "delete user").await?;
        self.invalidate().await;
        Ok(())
    }

    // ---- documents ----

    pub async fn get_document(&self, id: &str) -> Result<DocumentBlob, ApiError> {
        let url = self.endpoint(&["documents", id])?;
        let response = self.send(self.http.get(url), "get document").await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response.bytes().await?.to_vec();
        Ok(DocumentBlob {
            bytes,
            content_type,
        })
    }

    pub async fn delete_document(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["documents", id])?;
        self.send(self.http.delete(url), "delete document").await?;
        self.invalidate().await;
        Ok(())
    }

    // ---- plumbing ----

    /// One multipart `POST /ships/{id}` per document kind that has files.
    async fn upload_documents(
        &self,
        ship_id: &str,
        uploads: &[DocumentUpload],
    ) -> Result<Vec<EntityId>, ApiError> {
        let mut uploaded = Vec::new();
        for upload in uploads.iter().filter(|upload| !upload.files.is_empty()) {
            let mut form = multipart::Form::new().text("type", upload.kind.wire_name());
            for file in &upload.files {
                let part = multipart::Part::bytes(file.bytes.clone())
                    .file_name(file.name.clone())
                    .mime_str(&file.mime)?;
                form = form.part("files", part);
            }

            let url = self.endpoint(&["ships", ship_id])?;
            let response = self
                .send(self.http.post(url).multipart(form), "upload documents")
                .await?;
            let ids = read_ids(response).await?;
            info!(
                "Uploaded {} {} document(s) for ship {ship_id}",
                upload.files.len(),
                upload.kind.wire_name()
            );
            uploaded.extend(ids);
        }
        Ok(uploaded)
    }

    async fn get_cached<T>(&self, url: Url, label: &str) -> Result<CachedPayload<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let key = url.to_string();
        if let Some(hit) = self.cached(&key).await {
            debug!("Serving cached {label}");
            return hit.decode();
        }

        match self.get_json::<Value>(url, label).await {
            Ok(value) => {
                let fetched_at = SystemTime::now();
                self.cache
                    .lock()
                    .await
                    .entries
                    .insert(key, Cached::new(value.clone(), fetched_at));
                CachedPayload::new(value, fetched_at, CacheStatus::Fresh).decode()
            }
            Err(ApiError::Unauthorized) => Err(ApiError::Unauthorized),
            Err(err) => {
                if let Some(stale) = self.cached_stale(&key).await {
                    warn!("{label} failed ({err}); serving stale copy");
                    return stale.decode();
                }
                Err(err)
            }
        }
    }

    async fn cached(&self, key: &str) -> Option<CachedPayload<Value>> {
        let cache = self.cache.lock().await;
        cache
            .entries
            .get(key)
            .and_then(|entry| entry.if_fresh(self.ttl))
    }

    async fn cached_stale(&self, key: &str) -> Option<CachedPayload<Value>> {
        let cache = self.cache.lock().await;
        cache.entries.get(key).map(Cached::stale)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, label: &str) -> Result<T, ApiError> {
        let response = self.send(self.http.get(url), label).await?;
        Ok(response.json().await?)
    }

    async fn get_pdf(&self, url: Url, label: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .send(self.http.get(url).header(ACCEPT, PDF_MIME), label)
            .await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn send(&self, builder: RequestBuilder, label: &str) -> Result<Response, ApiError> {
        let builder = match self.token.read().await.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };
        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                error!("[HTTP_ERROR] {label}: {err}");
                return Err(err.into());
            }
        };
        check_status(response, label).await
    }

    /// Appends encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBase(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn with_query(mut url: Url, pairs: &[(&str, String)]) -> Url {
    if !pairs.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(pairs.iter().map(|(key, value)| (*key, value.as_str())));
    }
    url
}

async fn check_status(response: Response, label: &str) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        error!("[HTTP_ERROR] {label}: unauthorized");
        return Err(ApiError::Unauthorized);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.message.or(parsed.error))
        .filter(|message| !message.is_empty())
        .or_else(|| Some(body.trim().to_string()).filter(|text| !text.is_empty()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
    error!("[HTTP_ERROR] {label}: {status} {message}");
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

/// Ids come back either as a JSON string or as plain text.
async fn read_id(response: Response) -> Result<EntityId, ApiError> {
    let text = response.text().await?;
    Ok(serde_json::from_str::<String>(&text).unwrap_or_else(|_| text.trim().to_string()))
}

async fn read_ids(response: Response) -> Result<Vec<EntityId>, ApiError> {
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    if let Ok(ids) = serde_json::from_str::<Vec<String>>(&text) {
        return Ok(ids);
    }
    Ok(vec![serde_json::from_str::<String>(&text).unwrap_or_else(|_| text.trim().to_string())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ship::{DocumentKind, UploadFile};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client(server: &MockServer) -> ApiClient {
        let client = ApiClient::with_base_url(&format!("{}/api", server.uri())).unwrap();
        client.set_token(Some("tok-123".into())).await;
        client
    }

    fn submission() -> ShipSubmission {
        ShipSubmission {
            ship: ShipDto {
                name: "Atlantic Star".into(),
                imo: "9321483".into(),
                remarks_and_facts: String::new(),
                ..ShipDto::default()
            },
            documents: vec![
                DocumentUpload {
                    kind: DocumentKind::Ship,
                    files: Vec::new(),
                },
                DocumentUpload {
                    kind: DocumentKind::Charter,
                    files: vec![UploadFile {
                        name: "cp.pdf".into(),
                        mime: "application/pdf".into(),
                        bytes: b"%PDF-1.4".to_vec(),
                    }],
                },
            ],
        }
    }

    #[tokio::test]
    async fn login_never_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "jwt" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server).await;
        let response = client
            .login(&LoginRequest {
                email: "agent@navlion.mr".into(),
                password: "secret".into(),
            })
            .await
            .unwrap();
        assert_eq!(response.access_token, "jwt");

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
        let body: serde_json::Value = requests[0].body_json().unwrap();
        assert_eq!(body, json!({ "email": "agent@navlion.mr", "password": "secret" }));
    }

    #[tokio::test]
    async fn list_queries_are_cached_with_cleaned_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/ships"))
            .and(query_param("boardingPort", "Dakar"))
            .and(header("authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "name": "Atlantic Star" }])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server).await;
        let filter = GetShipsFilter {
            boarding_port: Some("Dakar".into()),
            receiver_name: Some(String::new()),
            ..GetShipsFilter::default()
        };
        let first = client.get_ships(&filter).await.unwrap();
        assert_eq!(first.status, CacheStatus::Fresh);
        assert_eq!(first.data[0].name, "Atlantic Star");

        let second = client.get_ships(&filter).await.unwrap();
        assert_eq!(second.status, CacheStatus::Cached);

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].url.query(), Some("boardingPort=Dakar"));
    }

    #[tokio::test]
    async fn failed_refresh_serves_stale_copy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "u-1" }])))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client(&server).await.with_ttl(Duration::ZERO);
        client.get_users().await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        let stale = client.get_users().await.unwrap();
        assert_eq!(stale.status, CacheStatus::Stale);
        assert_eq!(stale.data[0].id, "u-1");
    }

    #[tokio::test]
    async fn create_ship_nulls_empty_strings_and_uploads_documents() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/ships"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!("ship-1")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/ships/ship-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["doc-1"])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server).await;
        let id = client.create_ship(&submission()).await.unwrap();
        assert_eq!(id, "ship-1");

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = requests[0].body_json().unwrap();
        assert_eq!(body["name"], "Atlantic Star");
        assert_eq!(body["remarksAndFacts"], serde_json::Value::Null);
        assert!(body.get("documents").is_none());

        let upload = String::from_utf8_lossy(&requests[1].body);
        assert!(upload.contains("CHARTER"));
        assert!(upload.contains("filename=\"cp.pdf\""));
        assert!(upload.contains("%PDF-1.4"));
    }

    #[tokio::test]
    async fn update_ship_keeps_empty_strings() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/ships/ship-1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/ships/ship-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["doc-2"])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server).await;
        client.update_ship("ship-1", &submission()).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = requests[0].body_json().unwrap();
        assert_eq!(body["remarksAndFacts"], "");
    }

    #[tokio::test]
    async fn mutations_invalidate_cached_lists() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/ships/fleets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/ships/s-1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = client(&server).await;
        let filter = GetShipsFilter::default();
        client.get_fleets(&filter).await.unwrap();
        client.delete_ship("s-1").await.unwrap();
        let again = client.get_fleets(&filter).await.unwrap();
        assert_eq!(again.status, CacheStatus::Fresh);
    }

    #[tokio::test]
    async fn unauthorized_is_reported_distinctly() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/roles"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = client(&server).await;
        let err = client.get_roles().await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn server_error_message_is_extracted() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/users/u-1"))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(json!({ "message": "User owns ships" })),
            )
            .mount(&server)
            .await;

        let client = client(&server).await;
        match client.delete_user("u-1").await.unwrap_err() {
            ApiError::Status { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "User owns ships");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn pdf_exports_and_encoded_segments() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/ships/export-all-pdf"))
            .and(query_param("isFleet", "true"))
            .and(header("accept", "application/pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-ships".to_vec()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/subcategories/Vegetable%20oil/export-pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-sub".to_vec()))
            .mount(&server)
            .await;

        let client = client(&server).await;
        let ships = client
            .export_ships_pdf(&ShipsExportFilter {
                is_fleet: Some(true),
                ..ShipsExportFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(ships, b"%PDF-ships".to_vec());

        let sub = client.export_sub_category_pdf("Vegetable oil").await.unwrap();
        assert_eq!(sub, b"%PDF-sub".to_vec());
    }

    #[tokio::test]
    async fn documents_carry_their_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/documents/d-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/png")
                    .set_body_bytes(vec![137, 80, 78, 71]),
            )
            .mount(&server)
            .await;

        let client = client(&server).await;
        let blob = client.get_document("d-1").await.unwrap();
        assert!(blob.is_image());
        assert!(!blob.is_pdf());
        assert_eq!(blob.bytes.len(), 4);
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let with_slash = ApiClient::with_base_url("http://localhost:8080/api/").unwrap();
        let without = ApiClient::with_base_url("http://localhost:8080/api").unwrap();
        assert_eq!(
            with_slash.endpoint(&["ships", "s-1"]).unwrap().as_str(),
            "http://localhost:8080/api/ships/s-1"
        );
        assert_eq!(
            without.endpoint(&["ships", "by-agent", "NAV LION"]).unwrap().as_str(),
            "http://localhost:8080/api/ships/by-agent/NAV%20LION"
        );
        assert!(ApiClient::with_base_url("mailto:ops@navlion.mr").is_err());
    }
}
