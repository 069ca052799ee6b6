//! Client data hooks: typed request wrappers over the API contract.
//!
//! Every hook validates its outgoing payload with the shared contract
//! validators, issues the HTTP call, decodes into the shared model types,
//! and on mutations invalidates the cached results the mutation affects.

use std::collections::HashMap;
use std::sync::Mutex;

use axum::http::StatusCode;

use crate::contract;
use crate::errors::{AppError, ErrorBody};
use crate::models::{
    ChatMessage, ChatRequest, ChatResponse, Concern, ConcernFilters, CreateConcernRequest,
    RespondRequest, UpvoteResponse,
};
use crate::notify::{ContactRequest, ContactResponse};

/// Fallback message when the server gives no usable error body.
const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

/// Error surfaced to the UI layer, carrying the server-provided message
/// where available.
#[derive(Debug)]
pub struct ClientError {
    pub status: Option<StatusCode>,
    pub message: String,
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ClientError {}

impl From<AppError> for ClientError {
    fn from(err: AppError) -> Self {
        Self {
            status: Some(err.status_code()),
            message: err.message(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        tracing::debug!("Request failed: {}", err);
        Self {
            status: err.status(),
            message: GENERIC_ERROR.to_string(),
        }
    }
}

#[derive(Default)]
struct Cache {
    concern_lists: HashMap<String, Vec<Concern>>,
    concerns: HashMap<i64, Concern>,
    chat_history: HashMap<Option<i64>, Vec<ChatMessage>>,
    categories: Option<Vec<String>>,
}

/// Typed API client with request validation and cache invalidation.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    cache: Mutex<Cache>,
}

impl ApiClient {
    /// `base_url` is the gateway origin, e.g. `http://127.0.0.1:5000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            cache: Mutex::new(Cache::default()),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// List concerns, serving repeat queries from cache.
    pub async fn list_concerns(
        &self,
        filters: &ConcernFilters,
    ) -> Result<Vec<Concern>, ClientError> {
        let key = filter_key(filters);
        if let Some(cached) = self.cache.lock().unwrap().concern_lists.get(&key) {
            return Ok(cached.clone());
        }

        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(category) = filters.category {
            query.push(("category", category.as_str().to_string()));
        }
        if let Some(status) = filters.status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(search) = &filters.search {
            query.push(("search", search.clone()));
        }

        let response = self
            .http
            .get(self.url(contract::LIST_CONCERNS.path))
            .query(&query)
            .send()
            .await?;
        let response = expect_status(response, contract::LIST_CONCERNS.success).await?;
        let concerns: Vec<Concern> = response.json().await?;

        self.cache
            .lock()
            .unwrap()
            .concern_lists
            .insert(key, concerns.clone());
        Ok(concerns)
    }

    /// Fetch a single concern, cached by id.
    pub async fn get_concern(&self, id: i64) -> Result<Concern, ClientError> {
        if let Some(cached) = self.cache.lock().unwrap().concerns.get(&id) {
            return Ok(cached.clone());
        }

        let url = self.url(&contract::GET_CONCERN.build_url(&[("id", id.to_string().as_str())]));
        let response = self.http.get(url).send().await?;
        let response = expect_status(response, contract::GET_CONCERN.success).await?;
        let concern: Concern = response.json().await?;

        self.cache
            .lock()
            .unwrap()
            .concerns
            .insert(id, concern.clone());
        Ok(concern)
    }

    /// Create a concern. Invalidates the concerns-list cache.
    pub async fn create_concern(
        &self,
        request: &CreateConcernRequest,
    ) -> Result<Concern, ClientError> {
        contract::validate_create_concern(request)?;

        let response = self
            .http
            .post(self.url(contract::CREATE_CONCERN.path))
            .json(request)
            .send()
            .await?;
        let response = expect_status(response, contract::CREATE_CONCERN.success).await?;
        let concern: Concern = response.json().await?;

        self.cache.lock().unwrap().concern_lists.clear();
        Ok(concern)
    }

    /// Add a staff response. Invalidates the list cache and the concern entry.
    pub async fn respond_concern(
        &self,
        id: i64,
        request: &RespondRequest,
    ) -> Result<Concern, ClientError> {
        contract::validate_respond(request)?;

        let url = self.url(&contract::RESPOND_CONCERN.build_url(&[("id", id.to_string().as_str())]));
        let response = self.http.patch(url).json(request).send().await?;
        let response = expect_status(response, contract::RESPOND_CONCERN.success).await?;
        let concern: Concern = response.json().await?;

        let mut cache = self.cache.lock().unwrap();
        cache.concern_lists.clear();
        cache.concerns.remove(&id);
        Ok(concern)
    }

    /// Upvote a concern. Invalidates the list cache and the concern entry.
    pub async fn upvote_concern(&self, id: i64) -> Result<UpvoteResponse, ClientError> {
        let url = self.url(&contract::UPVOTE_CONCERN.build_url(&[("id", id.to_string().as_str())]));
        let response = self.http.post(url).send().await?;
        let response = expect_status(response, contract::UPVOTE_CONCERN.success).await?;
        let upvotes: UpvoteResponse = response.json().await?;

        let mut cache = self.cache.lock().unwrap();
        cache.concern_lists.clear();
        cache.concerns.remove(&id);
        Ok(upvotes)
    }

    /// Send a chat message. Invalidates the sender's chat-history cache.
    pub async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        contract::validate_chat(request)?;

        let response = self
            .http
            .post(self.url(contract::SEND_CHAT.path))
            .json(request)
            .send()
            .await?;
        let response = expect_status(response, contract::SEND_CHAT.success).await?;
        let reply: ChatResponse = response.json().await?;

        self.cache
            .lock()
            .unwrap()
            .chat_history
            .remove(&request.user_id);
        Ok(reply)
    }

    /// Fetch chat history for a user, cached per user.
    pub async fn chat_history(
        &self,
        user_id: Option<i64>,
    ) -> Result<Vec<ChatMessage>, ClientError> {
        if let Some(cached) = self.cache.lock().unwrap().chat_history.get(&user_id) {
            return Ok(cached.clone());
        }

        let mut request = self.http.get(self.url(contract::CHAT_HISTORY.path));
        if let Some(user_id) = user_id {
            request = request.query(&[("userId", user_id.to_string())]);
        }
        let response = request.send().await?;
        let response = expect_status(response, contract::CHAT_HISTORY.success).await?;
        let messages: Vec<ChatMessage> = response.json().await?;

        self.cache
            .lock()
            .unwrap()
            .chat_history
            .insert(user_id, messages.clone());
        Ok(messages)
    }

    /// Fetch the fixed category list, cached indefinitely.
    pub async fn categories(&self) -> Result<Vec<String>, ClientError> {
        if let Some(cached) = &self.cache.lock().unwrap().categories {
            return Ok(cached.clone());
        }

        let response = self
            .http
            .get(self.url(contract::LIST_CATEGORIES.path))
            .send()
            .await?;
        let response = expect_status(response, contract::LIST_CATEGORIES.success).await?;
        let categories: Vec<String> = response.json().await?;

        self.cache.lock().unwrap().categories = Some(categories.clone());
        Ok(categories)
    }

    /// Submit a contact-form message. Not cached.
    pub async fn send_contact(
        &self,
        request: &ContactRequest,
    ) -> Result<ContactResponse, ClientError> {
        contract::validate_contact(request)?;

        let response = self
            .http
            .post(self.url(contract::SEND_CONTACT.path))
            .json(request)
            .send()
            .await?;
        let response = expect_status(response, contract::SEND_CONTACT.success).await?;
        Ok(response.json().await?)
    }
}

fn filter_key(filters: &ConcernFilters) -> String {
    format!(
        "{}|{}|{}",
        filters.category.map(|c| c.as_str()).unwrap_or(""),
        filters.status.map(|s| s.as_str()).unwrap_or(""),
        filters.search.as_deref().unwrap_or("")
    )
}

/// Check the response against the contract's expected status; on mismatch,
/// surface the server-provided message when there is one.
async fn expect_status(
    response: reqwest::Response,
    expected: StatusCode,
) -> Result<reqwest::Response, ClientError> {
    if response.status() == expected {
        return Ok(response);
    }

    let status = response.status();
    let message = match response.json::<ErrorBody>().await {
        Ok(body) if !body.message.is_empty() => body.message,
        _ => GENERIC_ERROR.to_string(),
    };
    Err(ClientError {
        status: Some(status),
        message,
    })
}
