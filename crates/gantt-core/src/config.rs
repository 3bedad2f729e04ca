use crate::error::{GanttError, Result};
use crate::record::RawRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Column of the Config table holding the semantic key.
pub const CONFIG_KEY_FIELD: &str = "Key";
/// Column of the Config table holding the field name to read.
pub const CONFIG_VALUE_FIELD: &str = "Value";

pub const DEFAULT_API_URL: &str = "https://api.airtable.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// ConfigWarning
// ---------------------------------------------------------------------------

/// A non-fatal problem met while resolving configuration or optional tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub message: String,
}

impl ConfigWarning {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// FieldMap
// ---------------------------------------------------------------------------

/// Which store field backs each semantic concept.
///
/// Every key always holds a usable name: a Config-table override wins, then a
/// locally supplied map (YAML), then the built-in default. Missing keys in a
/// YAML file fall back to the built-ins through `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMap {
    pub milestone_name_field: String,
    pub milestone_deadline_field: String,
    pub milestone_priority_id_field: String,
    pub milestone_priority_name_field: String,
    pub milestone_activities_field: String,
    pub milestone_start_field: String,
    pub milestone_accountable_field: String,
    pub milestone_status_field: String,

    pub action_name_field: String,
    pub action_responsible_field: String,
    pub action_deadline_field: String,
    pub action_status_field: String,
    pub action_tpw_role_field: String,
    pub action_director_view_field: String,
    pub action_notes_field: String,

    /// Name of the People table; renamable like any field.
    pub people_table: String,
    pub people_name_field: String,
    /// Display column of the Priorities table.
    pub priority_name_field: String,
    /// Text column of the Notes table, read when an action links a note.
    pub note_text_field: String,
}

impl Default for FieldMap {
    fn default() -> Self {
        Self {
            milestone_name_field: "Name".to_string(),
            milestone_deadline_field: "Deadline".to_string(),
            milestone_priority_id_field: "Priority area".to_string(),
            milestone_priority_name_field: "Priority".to_string(),
            milestone_activities_field: "Activities".to_string(),
            milestone_start_field: "Start Date".to_string(),
            milestone_accountable_field: "Accountable".to_string(),
            milestone_status_field: "Status".to_string(),
            action_name_field: "Name".to_string(),
            action_responsible_field: "Responsible".to_string(),
            action_deadline_field: "Deadline".to_string(),
            action_status_field: "Status".to_string(),
            action_tpw_role_field: "Current Status (TPW Role)".to_string(),
            action_director_view_field: "Director View".to_string(),
            action_notes_field: "Notes".to_string(),
            people_table: "People".to_string(),
            people_name_field: "Name".to_string(),
            priority_name_field: "Name".to_string(),
            note_text_field: "Notes".to_string(),
        }
    }
}

impl FieldMap {
    /// Every semantic key the engine reads, in declaration order.
    pub const KEYS: &'static [&'static str] = &[
        "milestone_name_field",
        "milestone_deadline_field",
        "milestone_priority_id_field",
        "milestone_priority_name_field",
        "milestone_activities_field",
        "milestone_start_field",
        "milestone_accountable_field",
        "milestone_status_field",
        "action_name_field",
        "action_responsible_field",
        "action_deadline_field",
        "action_status_field",
        "action_tpw_role_field",
        "action_director_view_field",
        "action_notes_field",
        "people_table",
        "people_name_field",
        "priority_name_field",
        "note_text_field",
    ];

    /// Layer Config-table `records` over `base`, keeping the raw pairs and
    /// any warnings about keys that were not applied.
    pub fn resolve_over(base: &FieldMap, records: &[RawRecord]) -> ResolvedFields {
        let config = config_pairs(records);
        let mut fields = base.clone();
        let warnings = fields.apply(&config);
        ResolvedFields {
            config,
            fields,
            warnings,
        }
    }

    /// Layer `pairs` over this map. Keys the engine does not know are left
    /// alone and reported back.
    pub fn apply(&mut self, pairs: &BTreeMap<String, String>) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        for (key, value) in pairs {
            match self.slot_mut(key) {
                Some(slot) => *slot = value.clone(),
                None => warnings.push(ConfigWarning::warning(format!(
                    "unknown config key '{key}' ignored"
                ))),
            }
        }
        warnings
    }

    /// Look up a semantic key by name.
    pub fn get(&self, key: &str) -> Option<&str> {
        let v = match key {
            "milestone_name_field" => &self.milestone_name_field,
            "milestone_deadline_field" => &self.milestone_deadline_field,
            "milestone_priority_id_field" => &self.milestone_priority_id_field,
            "milestone_priority_name_field" => &self.milestone_priority_name_field,
            "milestone_activities_field" => &self.milestone_activities_field,
            "milestone_start_field" => &self.milestone_start_field,
            "milestone_accountable_field" => &self.milestone_accountable_field,
            "milestone_status_field" => &self.milestone_status_field,
            "action_name_field" => &self.action_name_field,
            "action_responsible_field" => &self.action_responsible_field,
            "action_deadline_field" => &self.action_deadline_field,
            "action_status_field" => &self.action_status_field,
            "action_tpw_role_field" => &self.action_tpw_role_field,
            "action_director_view_field" => &self.action_director_view_field,
            "action_notes_field" => &self.action_notes_field,
            "people_table" => &self.people_table,
            "people_name_field" => &self.people_name_field,
            "priority_name_field" => &self.priority_name_field,
            "note_text_field" => &self.note_text_field,
            _ => return None,
        };
        Some(v.as_str())
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut String> {
        let slot = match key {
            "milestone_name_field" => &mut self.milestone_name_field,
            "milestone_deadline_field" => &mut self.milestone_deadline_field,
            "milestone_priority_id_field" => &mut self.milestone_priority_id_field,
            "milestone_priority_name_field" => &mut self.milestone_priority_name_field,
            "milestone_activities_field" => &mut self.milestone_activities_field,
            "milestone_start_field" => &mut self.milestone_start_field,
            "milestone_accountable_field" => &mut self.milestone_accountable_field,
            "milestone_status_field" => &mut self.milestone_status_field,
            "action_name_field" => &mut self.action_name_field,
            "action_responsible_field" => &mut self.action_responsible_field,
            "action_deadline_field" => &mut self.action_deadline_field,
            "action_status_field" => &mut self.action_status_field,
            "action_tpw_role_field" => &mut self.action_tpw_role_field,
            "action_director_view_field" => &mut self.action_director_view_field,
            "action_notes_field" => &mut self.action_notes_field,
            "people_table" => &mut self.people_table,
            "people_name_field" => &mut self.people_name_field,
            "priority_name_field" => &mut self.priority_name_field,
            "note_text_field" => &mut self.note_text_field,
            _ => return None,
        };
        Some(slot)
    }

    pub fn load_yaml(path: &Path) -> Result<FieldMap> {
        let data = std::fs::read_to_string(path)?;
        let map: FieldMap = serde_yaml::from_str(&data)?;
        Ok(map)
    }
}

/// The field map in effect for one request, with the Config rows it came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedFields {
    pub config: BTreeMap<String, String>,
    pub fields: FieldMap,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ConfigWarning>,
}

/// Flatten Config-table rows into `Key -> Value`, skipping rows where either
/// column is missing or blank.
pub fn config_pairs(records: &[RawRecord]) -> BTreeMap<String, String> {
    records
        .iter()
        .filter_map(|r| {
            let key = r.text(CONFIG_KEY_FIELD)?.trim();
            let value = r.text(CONFIG_VALUE_FIELD)?.trim();
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// DirectorViewRule
// ---------------------------------------------------------------------------

/// How the Director View flag is read.
///
/// `Strict` accepts only a JSON `true`. `Lenient` also accepts the string
/// `"true"` (any case) and the number `1`, which some bases produce when the
/// column is a formula or a text field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectorViewRule {
    #[default]
    Strict,
    Lenient,
}

impl DirectorViewRule {
    pub fn is_truthy(self, value: Option<&Value>) -> bool {
        match (self, value) {
            (_, Some(Value::Bool(b))) => *b,
            (DirectorViewRule::Lenient, Some(Value::String(s))) => {
                s.trim().eq_ignore_ascii_case("true")
            }
            (DirectorViewRule::Lenient, Some(Value::Number(n))) => {
                n.as_i64() == Some(1) || n.as_f64() == Some(1.0)
            }
            _ => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DirectorViewRule::Strict => "strict",
            DirectorViewRule::Lenient => "lenient",
        }
    }
}

impl fmt::Display for DirectorViewRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DirectorViewRule {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(DirectorViewRule::Strict),
            "lenient" => Ok(DirectorViewRule::Lenient),
            other => Err(format!(
                "unknown director view rule '{other}' (expected strict or lenient)"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// TableNames
// ---------------------------------------------------------------------------

/// Fixed table names. People is absent here: its name lives in the
/// `FieldMap` so a base can rename it through the Config table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableNames {
    pub config: String,
    pub milestones: String,
    pub actions: String,
    pub priorities: String,
    pub notes: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            config: "Config".to_string(),
            milestones: "Milestones".to_string(),
            actions: "Actions".to_string(),
            priorities: "Priorities".to_string(),
            notes: "Notes".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// DashboardOptions
// ---------------------------------------------------------------------------

/// Per-request knobs for an aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardOptions {
    /// Base field map the Config table is layered over.
    pub fields: FieldMap,
    pub tables: TableNames,
    pub director_view: DirectorViewRule,
}

// ---------------------------------------------------------------------------
// StoreSettings
// ---------------------------------------------------------------------------

/// Connection settings for the record store.
#[derive(Clone)]
pub struct StoreSettings {
    pub api_url: String,
    pub base_id: String,
    pub token: String,
    pub timeout: Duration,
}

impl StoreSettings {
    pub fn new(base_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            base_id: base_id.into(),
            token: token.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.token.trim().is_empty() {
            missing.push("token");
        }
        if self.base_id.trim().is_empty() {
            missing.push("base id");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(GanttError::MissingCredentials(missing.join(", ")))
        }
    }
}

impl fmt::Debug for StoreSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreSettings")
            .field("api_url", &self.api_url)
            .field("base_id", &self.base_id)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
