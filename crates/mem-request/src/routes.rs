//! REST endpoint paths. Caller-supplied segments are percent-encoded.

use mem_types::ApiVersion;

pub const PING: &str = "/v1/ping/";
pub const MEMORIES: &str = "/v1/memories/";
pub const ENTITIES: &str = "/v1/entities/";
pub const BATCH: &str = "/v1/batch/";
pub const EXPORTS: &str = "/v1/exports/";

fn seg(raw: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(raw)
}

pub fn memory(memory_id: &str) -> String {
    format!("/v1/memories/{}/", seg(memory_id))
}

pub fn memory_history(memory_id: &str) -> String {
    format!("/v1/memories/{}/history/", seg(memory_id))
}

pub fn memories(version: ApiVersion) -> String {
    format!("/{}/memories/", version)
}

pub fn search(version: ApiVersion) -> String {
    format!("/{}/memories/search/", version)
}

pub fn entity(kind: &str, entity_id: &str) -> String {
    format!("/v1/entities/{}/{}/", seg(kind), seg(entity_id))
}

pub fn project(org_id: &str, project_id: &str) -> String {
    format!(
        "/api/v1/orgs/organizations/{}/projects/{}/",
        seg(org_id),
        seg(project_id)
    )
}
