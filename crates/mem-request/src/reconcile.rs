//! Identifier reconciliation: merge session-level org/project identifiers into
//! per-call options.

use mem_types::{ClientError, Params, Result};
use serde_json::Value;

/// Organization/project identifiers stored on a client session.
///
/// Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identifiers {
    pub org_id: Option<String>,
    pub project_id: Option<String>,
    /// Deprecated: organization name.
    pub org_name: Option<String>,
    /// Deprecated: project name.
    pub project_name: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl Identifiers {
    pub fn with_ids(org_id: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            org_id: Some(org_id.into()),
            project_id: Some(project_id.into()),
            ..Self::default()
        }
    }

    pub fn with_names(org_name: impl Into<String>, project_name: impl Into<String>) -> Self {
        Self {
            org_name: Some(org_name.into()),
            project_name: Some(project_name.into()),
            ..Self::default()
        }
    }

    /// Both IDs, when both are set.
    pub fn id_pair(&self) -> Option<(&str, &str)> {
        Some((present(&self.org_id)?, present(&self.project_id)?))
    }

    /// Both legacy names, when both are set.
    pub fn name_pair(&self) -> Option<(&str, &str)> {
        Some((present(&self.org_name)?, present(&self.project_name)?))
    }

    pub fn has_ids(&self) -> bool {
        present(&self.org_id).is_some() || present(&self.project_id).is_some()
    }

    pub fn uses_legacy_names(&self) -> bool {
        present(&self.org_name).is_some() || present(&self.project_name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_ids() && !self.uses_legacy_names()
    }

    /// Check the pairing rules without building anything.
    pub fn validate(&self) -> Result<()> {
        if self.has_ids() && self.uses_legacy_names() {
            return Err(ClientError::Configuration(
                "use either org_id/project_id or org_name/project_name, not both \
                 (org_name/project_name are deprecated)"
                    .to_string(),
            ));
        }
        if self.has_ids() && self.id_pair().is_none() {
            return Err(ClientError::Configuration(
                "org_id and project_id must be provided together".to_string(),
            ));
        }
        if self.uses_legacy_names() && self.name_pair().is_none() {
            return Err(ClientError::Configuration(
                "org_name and project_name must be provided together".to_string(),
            ));
        }
        Ok(())
    }

    /// Produce the parameters to send for one call.
    ///
    /// Session identifiers are inserted after the caller's options and so
    /// replace any caller-supplied `org_id`/`project_id`/`org_name`/`project_name`.
    /// Null values are dropped from the result.
    pub fn reconcile(&self, options: Option<Params>) -> Result<Params> {
        self.validate()?;
        let mut merged = options.unwrap_or_default();
        if let Some((org_id, project_id)) = self.id_pair() {
            merged.insert("org_id".to_string(), Value::from(org_id));
            merged.insert("project_id".to_string(), Value::from(project_id));
        }
        if let Some((org_name, project_name)) = self.name_pair() {
            merged.insert("org_name".to_string(), Value::from(org_name));
            merged.insert("project_name".to_string(), Value::from(project_name));
        }
        Ok(strip_nulls(merged))
    }
}

/// Drop top-level entries whose value is JSON null.
pub fn strip_nulls(params: Params) -> Params {
    params.into_iter().filter(|(_, v)| !v.is_null()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(v: Value) -> Params {
        match v {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn no_identifiers_returns_non_null_input() {
        let ids = Identifiers::default();
        let out = ids
            .reconcile(Some(params(json!({
                "user_id": "alex",
                "agent_id": null,
                "limit": 5,
                "filters": { "a": null }
            }))))
            .unwrap();
        assert_eq!(
            Value::Object(out),
            json!({ "user_id": "alex", "limit": 5, "filters": { "a": null } })
        );
    }

    #[test]
    fn no_identifiers_and_no_input_is_empty() {
        assert!(Identifiers::default().reconcile(None).unwrap().is_empty());
    }

    #[test]
    fn id_pair_overrides_caller_values() {
        let ids = Identifiers::with_ids("org-1", "proj-1");
        let out = ids
            .reconcile(Some(params(json!({
                "org_id": "spoofed",
                "project_id": null,
                "user_id": "alex"
            }))))
            .unwrap();
        assert_eq!(out["org_id"], "org-1");
        assert_eq!(out["project_id"], "proj-1");
        assert_eq!(out["user_id"], "alex");
        assert!(!out.contains_key("org_name"));
    }

    #[test]
    fn name_pair_is_injected_as_legacy_keys() {
        let ids = Identifiers::with_names("Acme", "Support");
        let out = ids.reconcile(None).unwrap();
        assert_eq!(out["org_name"], "Acme");
        assert_eq!(out["project_name"], "Support");
        assert!(ids.uses_legacy_names());
    }

    #[test]
    fn both_sets_are_rejected_for_any_input() {
        let ids = Identifiers {
            org_id: Some("org-1".into()),
            project_id: Some("proj-1".into()),
            org_name: Some("Acme".into()),
            project_name: Some("Support".into()),
        };
        for input in [None, Some(Params::new()), Some(params(json!({"user_id": "x"})))] {
            assert!(matches!(
                ids.reconcile(input),
                Err(ClientError::Configuration(_))
            ));
        }

        let partial = Identifiers {
            org_id: Some("org-1".into()),
            org_name: Some("Acme".into()),
            ..Identifiers::default()
        };
        assert!(matches!(
            partial.reconcile(None),
            Err(ClientError::Configuration(_))
        ));
    }

    #[test]
    fn unpaired_id_is_rejected() {
        let only_org = Identifiers {
            org_id: Some("org-1".into()),
            ..Identifiers::default()
        };
        let only_project = Identifiers {
            project_id: Some("proj-1".into()),
            ..Identifiers::default()
        };
        for ids in [only_org, only_project] {
            let err = ids.reconcile(Some(params(json!({"user_id": "alex"})))).unwrap_err();
            assert!(matches!(err, ClientError::Configuration(_)));
        }
    }

    #[test]
    fn unpaired_name_is_rejected() {
        let ids = Identifiers {
            project_name: Some("Support".into()),
            ..Identifiers::default()
        };
        assert!(matches!(
            ids.reconcile(None),
            Err(ClientError::Configuration(_))
        ));
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let ids = Identifiers {
            org_id: Some(String::new()),
            project_id: Some(String::new()),
            ..Identifiers::default()
        };
        assert!(ids.is_empty());
        assert!(ids.reconcile(None).unwrap().is_empty());
    }
}
