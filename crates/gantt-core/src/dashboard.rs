//! One aggregation request: Config → field map → concurrent table fetches →
//! reference maps → projected milestones and actions.

use crate::config::{ConfigWarning, DashboardOptions, FieldMap, ResolvedFields};
use crate::error::{GanttError, Result};
use crate::model::{Action, Milestone};
use crate::projector::{Projector, ReferenceMaps};
use crate::record::RawRecord;
use crate::reference::ReferenceMap;
use crate::store::{fetch_all, fetch_required, RecordStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Everything the renderer needs for one page load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    /// Raw `Key -> Value` pairs read from the Config table.
    pub config: BTreeMap<String, String>,
    /// Effective field map after layering the Config table.
    pub fields: FieldMap,
    pub milestones: Vec<Milestone>,
    /// Director View actions only.
    pub actions: Vec<Action>,
    /// Actions in the table before the Director View filter.
    pub all_actions_count: usize,
    pub people_map: ReferenceMap,
    pub priorities_map: ReferenceMap,
    pub notes_map: ReferenceMap,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ConfigWarning>,
}

/// Layer the Config table over `options.fields`. Never fails: a missing or
/// unreadable Config table leaves the base map untouched.
pub async fn resolve_fields<S: RecordStore>(store: &S, options: &DashboardOptions) -> ResolvedFields {
    let table = &options.tables.config;
    let mut warnings = Vec::new();
    let records = optional(table, fetch_all(store, table).await, &mut warnings);
    if records.is_empty() {
        debug!(table = %table, "no config rows, using default field names");
    }
    let mut resolved = FieldMap::resolve_over(&options.fields, &records);
    warnings.append(&mut resolved.warnings);
    resolved.warnings = warnings;
    resolved
}

/// Build a [`Dashboard`] from `store`.
///
/// Config, People, Priorities and Notes are optional: if they are missing or
/// fail, the aggregation carries on with defaults or empty maps and records a
/// warning. Milestones and Actions must exist: a missing table or a failed
/// fetch on either fails the whole call with [`GanttError::RequiredTable`].
pub async fn aggregate<S: RecordStore>(store: &S, options: &DashboardOptions) -> Result<Dashboard> {
    let tables = &options.tables;
    let ResolvedFields {
        config,
        fields,
        mut warnings,
    } = resolve_fields(store, options).await;

    let (milestones, actions, people, priorities, notes) = futures::join!(
        fetch_required(store, &tables.milestones),
        fetch_required(store, &tables.actions),
        fetch_all(store, &fields.people_table),
        fetch_all(store, &tables.priorities),
        fetch_all(store, &tables.notes),
    );
    let milestones = required(&tables.milestones, milestones)?;
    let actions = required(&tables.actions, actions)?;
    let people = optional(&fields.people_table, people, &mut warnings);
    let priorities = optional(&tables.priorities, priorities, &mut warnings);
    let notes = optional(&tables.notes, notes, &mut warnings);

    let refs = ReferenceMaps {
        people: ReferenceMap::build(&people, &fields.people_name_field),
        priorities: ReferenceMap::build(&priorities, &fields.priority_name_field),
        notes: ReferenceMap::build(&notes, &fields.note_text_field),
    };

    let projector = Projector::new(&fields, &refs).with_rule(options.director_view);
    let projected_milestones: Vec<Milestone> =
        milestones.iter().map(|r| projector.milestone(r)).collect();
    let director_actions: Vec<Action> = actions
        .iter()
        .filter_map(|r| projector.director_action(r))
        .collect();

    info!(
        milestones = projected_milestones.len(),
        actions = director_actions.len(),
        all_actions = actions.len(),
        people = refs.people.len(),
        priorities = refs.priorities.len(),
        "dashboard aggregated"
    );

    let ReferenceMaps {
        people,
        priorities,
        notes,
    } = refs;
    Ok(Dashboard {
        config,
        fields,
        milestones: projected_milestones,
        actions: director_actions,
        all_actions_count: actions.len(),
        people_map: people,
        priorities_map: priorities,
        notes_map: notes,
        warnings,
    })
}

fn required(table: &str, fetched: Result<Vec<RawRecord>>) -> Result<Vec<RawRecord>> {
    fetched.map_err(|source| GanttError::RequiredTable {
        table: table.to_string(),
        source: Box::new(source),
    })
}

fn optional(
    table: &str,
    fetched: Result<Vec<RawRecord>>,
    warnings: &mut Vec<ConfigWarning>,
) -> Vec<RawRecord> {
    match fetched {
        Ok(records) => records,
        Err(e) => {
            warn!(table = %table, error = %e, "optional table unavailable");
            warnings.push(ConfigWarning::warning(format!(
                "table '{table}' unavailable: {e}"
            )));
            Vec::new()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
