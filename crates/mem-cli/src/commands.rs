//! Dispatch of parsed commands to the async client.

use crate::cli::{Cli, Command, ExportCommand, ProjectCommand};
use mem_client::{AsyncMemoryClient, ClientConfig, MemoryOptions, ProjectUpdate};
use serde_json::Value;
use std::time::Duration;

pub type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

impl Cli {
    /// Layer the command-line flags over `base`.
    pub fn client_config(&self, base: ClientConfig) -> ClientConfig {
        let mut config = base.timeout(Duration::from_secs(self.timeout));
        if let Some(ref key) = self.api_key {
            config = config.api_key(key);
        }
        if let Some(ref host) = self.host {
            config = config.host(host);
        }
        if let Some(ref org_id) = self.org_id {
            config = config.org_id(org_id);
        }
        if let Some(ref project_id) = self.project_id {
            config = config.project_id(project_id);
        }
        config
    }
}

fn with_page(mut options: MemoryOptions, page: Option<u32>, page_size: Option<u32>) -> MemoryOptions {
    if let Some(page) = page {
        options = options.page(page);
    }
    if let Some(page_size) = page_size {
        options = options.page_size(page_size);
    }
    options
}

/// Run one command and return the JSON to print.
pub async fn run(cli: Cli, base: ClientConfig) -> CliResult<Value> {
    if let Command::Reset { yes: false } = cli.command {
        return Err("reset deletes every memory; pass --yes to confirm".into());
    }
    let client = AsyncMemoryClient::new(cli.client_config(base)).await?;
    tracing::debug!(command = ?cli.command, "running command");

    let value = match cli.command {
        Command::Add {
            text,
            scope,
            metadata,
        } => {
            let mut options = scope.options();
            if let Some(metadata) = metadata {
                options = options.metadata(metadata);
            }
            client.add(text, options).await?
        }
        Command::Get { memory_id } => client.get(&memory_id).await?,
        Command::List {
            scope,
            api_version,
            filters,
            page,
            page_size,
        } => {
            let mut options = with_page(scope.options(), page, page_size);
            if let Some(filters) = filters {
                options = options.filters(filters);
            }
            client.get_all(api_version, options).await?
        }
        Command::Search {
            query,
            scope,
            api_version,
            limit,
            filters,
        } => {
            let mut options = scope.options();
            if let Some(limit) = limit {
                options = options.limit(limit);
            }
            if let Some(filters) = filters {
                options = options.filters(filters);
            }
            client.search(&query, api_version, options).await?
        }
        Command::Update { memory_id, text } => client.update(&memory_id, &text).await?,
        Command::Delete { memory_id } => client.delete(&memory_id).await?,
        Command::DeleteAll { scope } => client.delete_all(scope.options()).await?,
        Command::History { memory_id } => client.history(&memory_id).await?,
        Command::Entities => serde_json::to_value(client.users().await?)?,
        Command::Reset { .. } => serde_json::to_value(client.reset().await?)?,
        Command::Export(ExportCommand::Create { schema, scope }) => {
            client.create_memory_export(&schema, scope.options()).await?
        }
        Command::Export(ExportCommand::Get { scope }) => {
            client.get_memory_export(scope.options()).await?
        }
        Command::Project(ProjectCommand::Get { fields }) => {
            let fields = (!fields.is_empty()).then_some(fields.as_slice());
            client.get_project(fields).await?
        }
        Command::Project(ProjectCommand::Update {
            instructions,
            categories,
        }) => {
            let update = ProjectUpdate {
                custom_instructions: instructions,
                custom_categories: categories,
            };
            client.update_project(&update).await?
        }
    };
    Ok(value)
}
