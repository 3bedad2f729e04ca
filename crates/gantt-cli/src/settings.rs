use anyhow::Context;
use clap::Args;
use gantt_core::config::{
    DashboardOptions, DirectorViewRule, FieldMap, StoreSettings, DEFAULT_API_URL,
    DEFAULT_TIMEOUT_SECS,
};
use std::path::PathBuf;
use std::time::Duration;

/// Record store connection and field-map options shared by every command.
///
/// Each value resolves once: flag, then environment variable, then default.
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Airtable personal access token
    #[arg(long, global = true, env = "AIRTABLE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Airtable base id (app...)
    #[arg(long, global = true, env = "AIRTABLE_BASE_ID")]
    pub base_id: Option<String>,

    /// Record store API root
    #[arg(long, global = true, env = "AIRTABLE_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// YAML file with base field names; Config table rows still take precedence
    #[arg(long, global = true, env = "GANTT_FIELD_MAP")]
    pub field_map: Option<PathBuf>,

    /// How the Director View flag is read: strict or lenient
    #[arg(
        long,
        global = true,
        env = "GANTT_DIRECTOR_VIEW",
        default_value_t = DirectorViewRule::Strict
    )]
    pub director_view: DirectorViewRule,

    /// Per-page request timeout against the record store, in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub store_timeout: u64,
}

impl StoreArgs {
    /// Connection settings. Blank credentials are left for
    /// `StoreSettings::validate` to report.
    pub fn store_settings(&self) -> StoreSettings {
        let mut settings = StoreSettings::new(
            self.base_id.clone().unwrap_or_default(),
            self.token.clone().unwrap_or_default(),
        )
        .with_api_url(self.api_url.clone());
        settings.timeout = Duration::from_secs(self.store_timeout);
        settings
    }

    /// The base field map: the `--field-map` file when given, else defaults.
    pub fn base_fields(&self) -> anyhow::Result<FieldMap> {
        match &self.field_map {
            Some(path) => FieldMap::load_yaml(path)
                .with_context(|| format!("failed to load field map {}", path.display())),
            None => Ok(FieldMap::default()),
        }
    }

    pub fn dashboard_options(&self) -> anyhow::Result<DashboardOptions> {
        Ok(DashboardOptions {
            fields: self.base_fields()?,
            director_view: self.director_view,
            ..DashboardOptions::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args() -> StoreArgs {
        StoreArgs {
            token: Some("pat".to_string()),
            base_id: Some("appX".to_string()),
            api_url: DEFAULT_API_URL.to_string(),
            field_map: None,
            director_view: DirectorViewRule::Strict,
            store_timeout: 5,
        }
    }

    #[test]
    fn settings_carry_flags() {
        let settings = args().store_settings();
        assert_eq!(settings.base_id, "appX");
        assert_eq!(settings.token, "pat");
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn missing_token_fails_validation() {
        let mut a = args();
        a.token = None;
        assert!(a.store_settings().validate().is_err());
    }

    #[test]
    fn field_map_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fields.yaml");
        std::fs::write(&path, "milestone_name_field: Title\n").unwrap();

        let mut a = args();
        a.field_map = Some(path);
        a.director_view = DirectorViewRule::Lenient;
        let options = a.dashboard_options().unwrap();
        assert_eq!(options.fields.milestone_name_field, "Title");
        assert_eq!(options.fields.action_name_field, "Name");
        assert_eq!(options.director_view, DirectorViewRule::Lenient);
    }

    #[test]
    fn unreadable_field_map_names_the_file() {
        let mut a = args();
        a.field_map = Some(PathBuf::from("/nonexistent/fields.yaml"));
        let err = a.dashboard_options().unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/fields.yaml"));
    }
}
