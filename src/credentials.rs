//! Credential resolution from integration configuration blobs.
//!
//! Integrations are stored under `integration_config_<name>` as a JSON object
//! with a `fields` map whose keys are whatever the user typed in the form.
//! Resolution tries a list of accepted field-name aliases in order, then
//! falls back to the first non-empty string field.

use serde_json::{Map, Value};

use crate::store::KeyValueStore;

/// Field names accepted for a hosting-provider access token, in priority order.
pub const GIT_TOKEN_ALIASES: &[&str] = &[
    "personal_access_token",
    "Personal Access Token",
    "token",
    "Token",
    "access_token",
    "Access Token",
    "api_key",
    "API Key",
    "apiKey",
    "pat",
    "PAT",
];

/// Field names accepted for the documentation assistant's API key.
pub const ASSISTANT_KEY_ALIASES: &[&str] = &[
    "api_key",
    "API Key",
    "apiKey",
    "Api Key",
    "ANTHROPIC_API_KEY",
    "anthropic_api_key",
    "key",
    "Key",
];

pub const GIT_INTEGRATION: &str = "github";
pub const ASSISTANT_INTEGRATION: &str = "anthropic";

/// Direct settings entry checked before the assistant integration blob.
pub const ASSISTANT_KEY_SETTING: &str = "anthropic_api_key";

const INTEGRATION_PREFIX: &str = "integration_config_";

/// Pick a credential out of a form-field map.
pub fn resolve_field(fields: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .find_map(|alias| non_empty(fields.get(*alias)))
        .or_else(|| fields.values().find_map(|v| non_empty(Some(v))))
}

fn non_empty(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub trait CredentialStore: Send + Sync {
    /// Raw settings entry.
    fn setting(&self, key: &str) -> Option<String>;

    /// Resolve a credential from the named integration's configuration.
    fn resolve(&self, integration: &str, aliases: &[&str]) -> Option<String> {
        let raw = self.setting(&format!("{INTEGRATION_PREFIX}{integration}"))?;
        let parsed: Value = match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("Ignoring malformed {} integration config: {}", integration, e);
                return None;
            }
        };
        let fields = parsed.get("fields")?.as_object()?;
        resolve_field(fields, aliases)
    }
}

impl<S: KeyValueStore + ?Sized> CredentialStore for S {
    fn setting(&self, key: &str) -> Option<String> {
        self.get(key)
    }
}

/// Access token for pushing and creating remote repositories.
pub fn git_token<S: CredentialStore + ?Sized>(store: &S) -> Option<String> {
    let token = store.resolve(GIT_INTEGRATION, GIT_TOKEN_ALIASES);
    if token.is_none() {
        tracing::warn!("No {} token configured; operating without authentication", GIT_INTEGRATION);
    }
    token
}

/// API key for documentation refresh. The settings entry wins over the
/// integration blob.
pub fn assistant_api_key<S: CredentialStore + ?Sized>(store: &S) -> Option<String> {
    let key = store
        .setting(ASSISTANT_KEY_SETTING)
        .filter(|k| !k.trim().is_empty())
        .or_else(|| store.resolve(ASSISTANT_INTEGRATION, ASSISTANT_KEY_ALIASES));
    if key.is_none() {
        tracing::debug!("No assistant API key configured");
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn alias_priority_wins_over_map_order() {
        let f = fields(json!({"token": "second", "personal_access_token": "first"}));
        assert_eq!(resolve_field(&f, GIT_TOKEN_ALIASES).as_deref(), Some("first"));
    }

    #[test]
    fn empty_alias_value_is_skipped() {
        let f = fields(json!({"personal_access_token": "", "PAT": "ghp_x"}));
        assert_eq!(resolve_field(&f, GIT_TOKEN_ALIASES).as_deref(), Some("ghp_x"));
    }

    #[test]
    fn falls_back_to_first_non_empty_string() {
        let f = fields(json!({"Owner": "", "count": 3, "Secret Thing": "s3cret"}));
        assert_eq!(resolve_field(&f, GIT_TOKEN_ALIASES).as_deref(), Some("s3cret"));
    }

    #[test]
    fn nothing_usable_is_none() {
        let f = fields(json!({"count": 3, "flag": true, "blank": ""}));
        assert_eq!(resolve_field(&f, GIT_TOKEN_ALIASES), None);
    }

    #[test]
    fn store_resolves_integration_blob() {
        let store = MemoryStore::with_entries([(
            "integration_config_github",
            r#"{"fields": {"Access Token": "ghp_abc"}}"#,
        )]);
        assert_eq!(git_token(&store).as_deref(), Some("ghp_abc"));
    }

    #[test]
    fn malformed_blob_is_absent() {
        let store = MemoryStore::with_entries([("integration_config_github", "{not json")]);
        assert_eq!(git_token(&store), None);
    }

    #[test]
    fn assistant_setting_beats_integration() {
        let store = MemoryStore::with_entries([
            ("anthropic_api_key", "sk-direct"),
            (
                "integration_config_anthropic",
                r#"{"fields": {"api_key": "sk-integration"}}"#,
            ),
        ]);
        assert_eq!(assistant_api_key(&store).as_deref(), Some("sk-direct"));
    }

    #[test]
    fn blank_assistant_setting_falls_through() {
        let store = MemoryStore::with_entries([
            ("anthropic_api_key", "   "),
            (
                "integration_config_anthropic",
                r#"{"fields": {"ANTHROPIC_API_KEY": "sk-integration"}}"#,
            ),
        ]);
        assert_eq!(assistant_api_key(&store).as_deref(), Some("sk-integration"));
    }
}
