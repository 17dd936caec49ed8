//! Command-line surface.

use clap::{Args, Parser, Subcommand};
use mem_client::{ApiVersion, MemoryOptions};
use serde_json::Value;

#[derive(Debug, Parser)]
#[command(
    name = "memctl",
    version,
    about = "Command-line client for the hosted memory service"
)]
pub struct Cli {
    /// API key
    #[arg(long, env = "MEM0_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Service base URL
    #[arg(long, env = "MEM0_HOST")]
    pub host: Option<String>,

    /// Organization ID (requires --project-id)
    #[arg(long)]
    pub org_id: Option<String>,

    /// Project ID (requires --org-id)
    #[arg(long)]
    pub project_id: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 60)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Which user, agent, app or run a memory belongs to.
#[derive(Debug, Clone, Default, Args)]
pub struct Scope {
    #[arg(long)]
    pub user_id: Option<String>,
    #[arg(long)]
    pub agent_id: Option<String>,
    #[arg(long)]
    pub app_id: Option<String>,
    #[arg(long)]
    pub run_id: Option<String>,
}

impl Scope {
    pub fn options(&self) -> MemoryOptions {
        let mut options = MemoryOptions::new();
        if let Some(ref id) = self.user_id {
            options = options.user_id(id);
        }
        if let Some(ref id) = self.agent_id {
            options = options.agent_id(id);
        }
        if let Some(ref id) = self.app_id {
            options = options.app_id(id);
        }
        if let Some(ref id) = self.run_id {
            options = options.run_id(id);
        }
        options
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store memories extracted from TEXT
    Add {
        text: String,
        #[command(flatten)]
        scope: Scope,
        /// JSON object stored alongside the memory
        #[arg(long, value_parser = parse_json)]
        metadata: Option<Value>,
    },
    /// Show one memory
    Get { memory_id: String },
    /// List memories
    List {
        #[command(flatten)]
        scope: Scope,
        #[arg(long, default_value = "v1")]
        api_version: ApiVersion,
        /// JSON filter expression (v2)
        #[arg(long, value_parser = parse_json)]
        filters: Option<Value>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Search memories
    Search {
        query: String,
        #[command(flatten)]
        scope: Scope,
        #[arg(long, default_value = "v1")]
        api_version: ApiVersion,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, value_parser = parse_json)]
        filters: Option<Value>,
    },
    /// Replace the text of a memory
    Update { memory_id: String, text: String },
    /// Delete one memory
    Delete { memory_id: String },
    /// Delete every memory in a scope
    DeleteAll {
        #[command(flatten)]
        scope: Scope,
    },
    /// Change history of a memory
    History { memory_id: String },
    /// List users, agents and runs that own memories
    Entities,
    /// Delete all entities and their memories
    Reset {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Memory exports
    #[command(subcommand)]
    Export(ExportCommand),
    /// Project settings
    #[command(subcommand)]
    Project(ProjectCommand),
}

#[derive(Debug, Subcommand)]
pub enum ExportCommand {
    /// Start an export shaped by a JSON schema
    Create {
        schema: String,
        #[command(flatten)]
        scope: Scope,
    },
    /// Fetch the latest export
    Get {
        #[command(flatten)]
        scope: Scope,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// Show project settings
    Get {
        /// Only these fields (comma separated)
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },
    /// Change custom instructions or categories
    Update {
        #[arg(long)]
        instructions: Option<String>,
        /// Comma separated category names
        #[arg(long, value_delimiter = ',')]
        categories: Option<Vec<String>>,
    },
}

fn parse_json(s: &str) -> Result<Value, String> {
    serde_json::from_str(s).map_err(|e| format!("invalid JSON: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_and_scope() {
        let cli = Cli::try_parse_from([
            "memctl",
            "--api-key",
            "k",
            "--host",
            "http://localhost:9",
            "add",
            "I like tea",
            "--user-id",
            "alex",
            "--metadata",
            r#"{"source":"chat"}"#,
        ])
        .unwrap();
        assert_eq!(cli.api_key.as_deref(), Some("k"));
        match cli.command {
            Command::Add {
                text,
                scope,
                metadata,
            } => {
                assert_eq!(text, "I like tea");
                assert_eq!(scope.user_id.as_deref(), Some("alex"));
                assert_eq!(metadata.unwrap()["source"], "chat");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn api_version_is_parsed() {
        let cli = Cli::try_parse_from(["memctl", "list", "--api-version", "v2", "--page", "3"])
            .unwrap();
        match cli.command {
            Command::List {
                api_version, page, ..
            } => {
                assert_eq!(api_version, ApiVersion::V2);
                assert_eq!(page, Some(3));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["memctl", "list", "--api-version", "v9"]).is_err());
    }

    #[test]
    fn only_key_and_host_read_environment() {
        use clap::CommandFactory;

        let cmd = Cli::command();
        let env_of = |id: &str| {
            cmd.get_arguments()
                .find(|a| a.get_id() == id)
                .and_then(|a| a.get_env())
                .map(|v| v.to_string_lossy().into_owned())
        };
        assert_eq!(env_of("api_key").as_deref(), Some("MEM0_API_KEY"));
        assert_eq!(env_of("host").as_deref(), Some("MEM0_HOST"));
        assert_eq!(env_of("org_id"), None);
        assert_eq!(env_of("project_id"), None);
    }

    #[test]
    fn bad_json_is_rejected() {
        assert!(Cli::try_parse_from(["memctl", "add", "x", "--metadata", "{oops"]).is_err());
    }

    #[test]
    fn project_categories_split_on_commas() {
        let cli = Cli::try_parse_from([
            "memctl",
            "project",
            "update",
            "--categories",
            "food,travel",
        ])
        .unwrap();
        match cli.command {
            Command::Project(ProjectCommand::Update { categories, .. }) => {
                assert_eq!(categories.unwrap(), vec!["food", "travel"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn scope_only_sets_given_ids() {
        let scope = Scope {
            agent_id: Some("planner".into()),
            ..Scope::default()
        };
        let params = scope.options().into_params();
        assert_eq!(params.len(), 1);
        assert_eq!(params["agent_id"], "planner");
    }
}
