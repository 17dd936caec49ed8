//! Request plans: the verb, path, query and JSON body of every operation.
//!
//! Each function reconciles identifiers first, so a misconfigured session fails
//! here, before any transport is touched.

use crate::payload::message_payload;
use crate::query::query_pairs;
use crate::reconcile::Identifiers;
use crate::routes;
use mem_types::{
    ApiVersion, BatchDelete, BatchUpdate, ClientError, Entity, Messages, Params, ProjectUpdate,
    Result,
};
use serde_json::{json, Value};

/// HTTP verbs used by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One planned request, relative to the session's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Params,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Params::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, query: Params) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: impl Into<Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        query_pairs(&self.query)
    }
}

/// Telemetry summary of caller options: their key names, minus `metadata`.
pub fn option_keys(options: &Params) -> Value {
    Value::Array(
        options
            .keys()
            .filter(|k| k.as_str() != "metadata")
            .map(|k| Value::from(k.as_str()))
            .collect(),
    )
}

pub fn ping(ids: &Identifiers) -> Result<ApiRequest> {
    Ok(ApiRequest::new(Method::Get, routes::PING).with_query(ids.reconcile(None)?))
}

pub fn add(ids: &Identifiers, messages: &Messages, options: Params) -> Result<ApiRequest> {
    let params = ids.reconcile(Some(options))?;
    Ok(ApiRequest::new(Method::Post, routes::MEMORIES)
        .with_body(message_payload(messages, params)))
}

pub fn get(ids: &Identifiers, memory_id: &str) -> Result<ApiRequest> {
    Ok(ApiRequest::new(Method::Get, routes::memory(memory_id)).with_query(ids.reconcile(None)?))
}

/// v1 lists with query parameters; v2 posts filters as a JSON body, moving
/// `page` and `page_size` to the query string only when both are given.
pub fn get_all(ids: &Identifiers, version: ApiVersion, options: Params) -> Result<ApiRequest> {
    let mut params = ids.reconcile(Some(options))?;
    let path = routes::memories(version);
    match version {
        ApiVersion::V1 => Ok(ApiRequest::new(Method::Get, path).with_query(params)),
        ApiVersion::V2 => {
            let mut query = Params::new();
            if params.contains_key("page") && params.contains_key("page_size") {
                for key in ["page", "page_size"] {
                    if let Some(v) = params.remove(key) {
                        query.insert(key.to_string(), v);
                    }
                }
            }
            Ok(ApiRequest::new(Method::Post, path)
                .with_query(query)
                .with_body(params))
        }
    }
}

pub fn search(
    ids: &Identifiers,
    query: &str,
    version: ApiVersion,
    options: Params,
) -> Result<ApiRequest> {
    let mut body = Params::new();
    body.insert("query".to_string(), Value::from(query));
    body.extend(ids.reconcile(Some(options))?);
    Ok(ApiRequest::new(Method::Post, routes::search(version)).with_body(body))
}

pub fn update(ids: &Identifiers, memory_id: &str, text: &str) -> Result<ApiRequest> {
    Ok(ApiRequest::new(Method::Put, routes::memory(memory_id))
        .with_query(ids.reconcile(None)?)
        .with_body(json!({ "text": text })))
}

pub fn delete(ids: &Identifiers, memory_id: &str) -> Result<ApiRequest> {
    Ok(ApiRequest::new(Method::Delete, routes::memory(memory_id))
        .with_query(ids.reconcile(None)?))
}

pub fn delete_all(ids: &Identifiers, options: Params) -> Result<ApiRequest> {
    Ok(ApiRequest::new(Method::Delete, routes::MEMORIES).with_query(ids.reconcile(Some(options))?))
}

pub fn history(ids: &Identifiers, memory_id: &str) -> Result<ApiRequest> {
    Ok(ApiRequest::new(Method::Get, routes::memory_history(memory_id))
        .with_query(ids.reconcile(None)?))
}

pub fn users(ids: &Identifiers) -> Result<ApiRequest> {
    Ok(ApiRequest::new(Method::Get, routes::ENTITIES).with_query(ids.reconcile(None)?))
}

pub fn delete_entity(ids: &Identifiers, entity: &Entity) -> Result<ApiRequest> {
    Ok(ApiRequest::new(Method::Delete, routes::entity(&entity.kind, &entity.id))
        .with_query(ids.reconcile(None)?))
}

pub fn batch_update(memories: &[BatchUpdate]) -> ApiRequest {
    let entries: Vec<Value> = memories
        .iter()
        .map(|m| json!({ "memory_id": m.memory_id, "text": m.text }))
        .collect();
    ApiRequest::new(Method::Put, routes::BATCH).with_body(json!({ "memories": entries }))
}

pub fn batch_delete(memories: &[BatchDelete]) -> ApiRequest {
    let entries: Vec<Value> = memories
        .iter()
        .map(|m| json!({ "memory_id": m.memory_id }))
        .collect();
    ApiRequest::new(Method::Delete, routes::BATCH).with_body(json!({ "memories": entries }))
}

pub fn create_export(ids: &Identifiers, schema: &str, options: Params) -> Result<ApiRequest> {
    let mut body = Params::new();
    body.insert("schema".to_string(), Value::from(schema));
    body.extend(ids.reconcile(Some(options))?);
    Ok(ApiRequest::new(Method::Post, routes::EXPORTS).with_body(body))
}

pub fn get_export(ids: &Identifiers, options: Params) -> Result<ApiRequest> {
    Ok(ApiRequest::new(Method::Get, routes::EXPORTS).with_query(ids.reconcile(Some(options))?))
}

fn project_path(ids: &Identifiers, action: &str) -> Result<String> {
    ids.validate()?;
    let (org_id, project_id) = ids.id_pair().ok_or_else(|| {
        ClientError::Configuration(format!(
            "org_id and project_id must be set to {action} project settings"
        ))
    })?;
    Ok(routes::project(org_id, project_id))
}

pub fn get_project(ids: &Identifiers, fields: Option<&[String]>) -> Result<ApiRequest> {
    let path = project_path(ids, "read")?;
    let mut options = Params::new();
    if let Some(fields) = fields {
        options.insert("fields".to_string(), json!(fields));
    }
    Ok(ApiRequest::new(Method::Get, path).with_query(ids.reconcile(Some(options))?))
}

pub fn update_project(ids: &Identifiers, update: &ProjectUpdate) -> Result<ApiRequest> {
    let path = project_path(ids, "update")?;
    if update.is_empty() {
        return Err(ClientError::InvalidInput(
            "provide custom_instructions or custom_categories to update".to_string(),
        ));
    }
    let mut options = Params::new();
    if let Some(ref instructions) = update.custom_instructions {
        options.insert("custom_instructions".to_string(), json!(instructions));
    }
    if let Some(ref categories) = update.custom_categories {
        options.insert("custom_categories".to_string(), json!(categories));
    }
    Ok(ApiRequest::new(Method::Patch, path).with_body(ids.reconcile(Some(options))?))
}
