//! Async client: the blocking operation set as futures over `reqwest::Client`.

use crate::config::ClientConfig;
use crate::session::{self, props, Session};
use mem_request::{plan, ApiRequest};
use mem_types::{
    ApiVersion, BatchDelete, BatchUpdate, ClientError, EntityList, MessageResponse, Messages,
    Params, ProjectUpdate, Result, TelemetrySink,
};
use serde_json::Value;
use std::sync::Arc;

const EVENT_PREFIX: &str = "async_client";

/// Async client for the memory service.
///
/// Each operation yields while its request is in flight. Composite operations
/// await their sub-requests one after another. The connection pool is released
/// when the client is dropped.
pub struct AsyncMemoryClient {
    session: Session,
    http: reqwest::Client,
    telemetry: Arc<dyn TelemetrySink>,
}

impl std::fmt::Debug for AsyncMemoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncMemoryClient")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl AsyncMemoryClient {
    /// Build the client and validate the API key against `/v1/ping/`.
    pub async fn new(config: ClientConfig) -> Result<Self> {
        let (session, telemetry) = config.into_parts()?;
        let http = reqwest::Client::builder()
            .default_headers(session.headers()?)
            .timeout(session.timeout())
            .build()
            .map_err(session::transport_error)?;
        let mut client = Self {
            session,
            http,
            telemetry,
        };
        client.validate_api_key().await?;
        tracing::info!(host = %client.session.host(), "async memory client initialized");
        client.emit("init", props::none());
        Ok(client)
    }

    /// Shorthand for `AsyncMemoryClient::new(ClientConfig::from_env())`.
    pub async fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()).await
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    async fn validate_api_key(&mut self) -> Result<()> {
        let req = plan::ping(self.session.ids())?;
        let body = self.execute(&req).await.map_err(session::probe_error)?;
        self.session.adopt_ping(&body);
        Ok(())
    }

    /// The single error boundary: every request of every operation runs here.
    async fn execute(&self, req: &ApiRequest) -> Result<Value> {
        tracing::debug!(method = %req.method, path = %req.path, "memory API request");
        let mut builder = self
            .http
            .request(session::http_method(req.method), self.session.url(&req.path));
        let pairs = req.query_pairs();
        if !pairs.is_empty() {
            builder = builder.query(&pairs);
        }
        if let Some(ref body) = req.body {
            builder = builder.json(body);
        }
        let result = match builder.send().await {
            Ok(res) => {
                let status = res.status();
                match res.text().await {
                    Ok(text) => session::decode_response(status, &text),
                    Err(e) => Err(session::transport_error(e)),
                }
            }
            Err(e) => Err(session::transport_error(e)),
        };
        if let Err(ref e) = result {
            tracing::error!(method = %req.method, path = %req.path, error = %e, "memory API request failed");
        }
        result
    }

    fn emit(&self, op: &str, properties: Params) {
        session::emit(
            self.telemetry.as_ref(),
            EVENT_PREFIX,
            op,
            &self.session,
            properties,
        );
    }

    /// Execute `req`, then report `op` to telemetry.
    async fn call(&self, op: &str, req: ApiRequest, properties: Params) -> Result<Value> {
        let value = self.execute(&req).await?;
        self.emit(op, properties);
        Ok(value)
    }

    /// Store new memories extracted from `messages`.
    pub async fn add(&self, messages: impl Into<Messages>, options: impl Into<Params>) -> Result<Value> {
        let options = options.into();
        let properties = props::keys(&options);
        let req = plan::add(self.session.ids(), &messages.into(), options)?;
        self.call("add", req, properties).await
    }

    pub async fn get(&self, memory_id: &str) -> Result<Value> {
        let req = plan::get(self.session.ids(), memory_id)?;
        self.call("get", req, props::memory_id(memory_id)).await
    }

    /// List memories; `page`/`page_size` only reach the query string on v2
    /// when both are given.
    pub async fn get_all(&self, version: ApiVersion, options: impl Into<Params>) -> Result<Value> {
        let options = options.into();
        let properties = props::versioned_keys(version, &options);
        let req = plan::get_all(self.session.ids(), version, options)?;
        self.call("get_all", req, properties).await
    }

    pub async fn search(
        &self,
        query: &str,
        version: ApiVersion,
        options: impl Into<Params>,
    ) -> Result<Value> {
        let options = options.into();
        let properties = props::versioned_keys(version, &options);
        let req = plan::search(self.session.ids(), query, version, options)?;
        self.call("search", req, properties).await
    }

    pub async fn update(&self, memory_id: &str, text: &str) -> Result<Value> {
        let req = plan::update(self.session.ids(), memory_id, text)?;
        self.call("update", req, props::memory_id(memory_id)).await
    }

    pub async fn delete(&self, memory_id: &str) -> Result<Value> {
        let req = plan::delete(self.session.ids(), memory_id)?;
        self.call("delete", req, props::memory_id(memory_id)).await
    }

    pub async fn delete_all(&self, options: impl Into<Params>) -> Result<Value> {
        let options = options.into();
        let properties = props::keys(&options);
        let req = plan::delete_all(self.session.ids(), options)?;
        self.call("delete_all", req, properties).await
    }

    pub async fn history(&self, memory_id: &str) -> Result<Value> {
        let req = plan::history(self.session.ids(), memory_id)?;
        self.call("history", req, props::memory_id(memory_id)).await
    }

    /// Users, agents and runs that currently own memories.
    pub async fn users(&self) -> Result<EntityList> {
        let req = plan::users(self.session.ids())?;
        session::decode_as(self.call("users", req, props::none()).await?)
    }

    /// Delete every entity, awaiting each delete before issuing the next.
    ///
    /// Not atomic: the first failed delete is returned immediately and the
    /// entities before it stay deleted.
    pub async fn delete_users(&self) -> Result<MessageResponse> {
        let entities = self.users().await?;
        for entity in &entities.results {
            let req = plan::delete_entity(self.session.ids(), entity)?;
            self.execute(&req).await?;
        }
        self.emit("delete_users", props::count(entities.len()));
        Ok(MessageResponse::new(
            "All users, agents, and sessions deleted.",
        ))
    }

    /// Delete all entities; the service cascades to their memories.
    pub async fn reset(&self) -> Result<MessageResponse> {
        self.delete_users().await?;
        self.emit("reset", props::none());
        Ok(MessageResponse::new(
            "Client reset successful. All users and memories deleted.",
        ))
    }

    pub async fn batch_update(&self, memories: &[BatchUpdate]) -> Result<Value> {
        self.call(
            "batch_update",
            plan::batch_update(memories),
            props::count(memories.len()),
        )
        .await
    }

    pub async fn batch_delete(&self, memories: &[BatchDelete]) -> Result<Value> {
        self.call(
            "batch_delete",
            plan::batch_delete(memories),
            props::count(memories.len()),
        )
        .await
    }

    /// Request an export of memories shaped by the JSON `schema`.
    pub async fn create_memory_export(&self, schema: &str, options: impl Into<Params>) -> Result<Value> {
        let options = options.into();
        let properties = props::schema(schema, &options);
        let req = plan::create_export(self.session.ids(), schema, options)?;
        self.call("create_memory_export", req, properties).await
    }

    pub async fn get_memory_export(&self, options: impl Into<Params>) -> Result<Value> {
        let options = options.into();
        let properties = props::keys(&options);
        let req = plan::get_export(self.session.ids(), options)?;
        self.call("get_memory_export", req, properties).await
    }

    /// Project settings (instructions, categories); needs org and project ids.
    pub async fn get_project(&self, fields: Option<&[String]>) -> Result<Value> {
        let req = plan::get_project(self.session.ids(), fields)?;
        self.call("get_project", req, props::fields(fields)).await
    }

    pub async fn update_project(&self, update: &ProjectUpdate) -> Result<Value> {
        let req = plan::update_project(self.session.ids(), update)?;
        self.call("update_project", req, props::project_update(update)).await
    }

    pub async fn chat(&self) -> Result<Value> {
        Err(ClientError::NotImplemented("chat"))
    }
}
