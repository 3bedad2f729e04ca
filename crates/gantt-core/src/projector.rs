//! Raw record → `Milestone` / `Action` projection, driven entirely by the
//! `FieldMap`.

use crate::config::{DirectorViewRule, FieldMap};
use crate::model::{Action, Milestone};
use crate::record::RawRecord;
use crate::reference::{ReferenceMap, UNKNOWN};
use chrono::{Months, NaiveDate};
use serde_json::Value;

pub const UNASSIGNED: &str = "Unassigned";
pub const UNTITLED: &str = "Untitled";
/// Role value an action must carry to appear in the Director View.
pub const CURRENT_ROLE: &str = "Current";
/// How far before the deadline an undated milestone is assumed to start.
pub const ESTIMATED_START_MONTHS: u32 = 3;

// ---------------------------------------------------------------------------
// ReferenceMaps
// ---------------------------------------------------------------------------

/// Reference maps for every linked table, built once per request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceMaps {
    pub people: ReferenceMap,
    pub priorities: ReferenceMap,
    pub notes: ReferenceMap,
}

// ---------------------------------------------------------------------------
// Linked-or-text resolution
// ---------------------------------------------------------------------------

/// Resolve a field that may hold linked record ids or free text.
///
/// A non-empty array resolves its first id through `refs` (`"Unknown"` if the
/// id is not there); a non-empty string is used as is; anything else gives
/// `sentinel`.
pub fn resolve_label(value: Option<&Value>, refs: &ReferenceMap, sentinel: &str) -> String {
    match value {
        Some(Value::Array(items)) if !items.is_empty() => match items[0].as_str() {
            Some(id) => refs.label(id).to_string(),
            None => UNKNOWN.to_string(),
        },
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        _ => sentinel.to_string(),
    }
}

/// Text of a plain or single-element field: strings, numbers and the first
/// element of an array.
fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => items.first().and_then(|v| scalar_text(Some(v))),
        _ => None,
    }
}

/// `deadline` minus three calendar months, clamping the day to the end of a
/// shorter month (31 May → 28 Feb).
pub fn estimated_start(deadline: NaiveDate) -> NaiveDate {
    deadline
        .checked_sub_months(Months::new(ESTIMATED_START_MONTHS))
        .unwrap_or(deadline)
}

// ---------------------------------------------------------------------------
// Projector
// ---------------------------------------------------------------------------

/// Projects raw records using one field map and one set of reference maps.
pub struct Projector<'a> {
    fields: &'a FieldMap,
    refs: &'a ReferenceMaps,
    rule: DirectorViewRule,
}

impl<'a> Projector<'a> {
    pub fn new(fields: &'a FieldMap, refs: &'a ReferenceMaps) -> Self {
        Self {
            fields,
            refs,
            rule: DirectorViewRule::default(),
        }
    }

    pub fn with_rule(mut self, rule: DirectorViewRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn milestone(&self, raw: &RawRecord) -> Milestone {
        let f = self.fields;
        let deadline = raw.date(&f.milestone_deadline_field);
        let explicit_start = raw.date(&f.milestone_start_field);
        let start_date = explicit_start.or_else(|| deadline.map(estimated_start));

        Milestone {
            id: raw.id.clone(),
            name: scalar_text(raw.field(&f.milestone_name_field))
                .unwrap_or_else(|| UNTITLED.to_string()),
            priority: self.priority(raw),
            status: scalar_text(raw.field(&f.milestone_status_field))
                .unwrap_or_else(|| UNKNOWN.to_string()),
            accountable: resolve_label(
                raw.field(&f.milestone_accountable_field),
                &self.refs.people,
                UNASSIGNED,
            ),
            start_date,
            deadline,
            has_start_date: explicit_start.is_some(),
            activity_ids: raw.links(&f.milestone_activities_field),
        }
    }

    /// The priority lookup field carries names directly; the linked id field
    /// is the fallback.
    fn priority(&self, raw: &RawRecord) -> String {
        let f = self.fields;
        match scalar_text(raw.field(&f.milestone_priority_name_field)) {
            Some(name) => name,
            None => resolve_label(
                raw.field(&f.milestone_priority_id_field),
                &self.refs.priorities,
                UNKNOWN,
            ),
        }
    }

    pub fn action(&self, raw: &RawRecord) -> Action {
        let f = self.fields;
        Action {
            id: raw.id.clone(),
            name: scalar_text(raw.field(&f.action_name_field))
                .unwrap_or_else(|| UNTITLED.to_string()),
            responsible: resolve_label(
                raw.field(&f.action_responsible_field),
                &self.refs.people,
                UNASSIGNED,
            ),
            deadline: raw.date(&f.action_deadline_field),
            status: scalar_text(raw.field(&f.action_status_field))
                .unwrap_or_else(|| UNKNOWN.to_string()),
            role: raw.text(&f.action_tpw_role_field).map(str::to_string),
            director_view: self.rule.is_truthy(raw.field(&f.action_director_view_field)),
            notes: self.notes(raw),
        }
    }

    /// Project `raw` only if it belongs in the Director View.
    pub fn director_action(&self, raw: &RawRecord) -> Option<Action> {
        let action = self.action(raw);
        is_director_visible(&action).then_some(action)
    }

    /// Inline text is used directly; linked notes go through the Notes map
    /// and are joined in link order. Ids missing from the map are dropped.
    fn notes(&self, raw: &RawRecord) -> Option<String> {
        match raw.field(&self.fields.action_notes_field)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Array(items) => {
                let texts: Vec<&str> = items
                    .iter()
                    .filter_map(Value::as_str)
                    .filter_map(|id| self.refs.notes.get(id))
                    .collect();
                (!texts.is_empty()).then(|| texts.join("\n\n"))
            }
            _ => None,
        }
    }
}

/// Director View rule: role is `Current` and the visibility flag is set.
pub fn is_director_visible(action: &Action) -> bool {
    action.role.as_deref() == Some(CURRENT_ROLE) && action.director_view
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn people() -> ReferenceMaps {
        ReferenceMaps {
            people: [("rec123".to_string(), "Jane Doe".to_string())]
                .into_iter()
                .collect(),
            priorities: [("recP1".to_string(), "2. Grant making".to_string())]
                .into_iter()
                .collect(),
            notes: [("recN1".to_string(), "Waiting on budget".to_string())]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn renamed_name_field_is_read() {
        let mut fields = FieldMap::default();
        fields.milestone_name_field = "Title".to_string();
        let refs = ReferenceMaps::default();
        let raw = RawRecord::new("rec1", json!({ "Title": "Kickoff", "Deadline": "2025-09-01" }));

        let m = Projector::new(&fields, &refs).milestone(&raw);
        assert_eq!(m.name, "Kickoff");
        assert_eq!(m.deadline, Some(date(2025, 9, 1)));
    }

    #[test]
    fn responsible_resolves_through_people() {
        let fields = FieldMap::default();
        let raw = RawRecord::new("recA", json!({ "Responsible": ["rec123"] }));

        let refs = people();
        let a = Projector::new(&fields, &refs).action(&raw);
        assert_eq!(a.responsible, "Jane Doe");

        let empty = ReferenceMaps::default();
        let a = Projector::new(&fields, &empty).action(&raw);
        assert_eq!(a.responsible, "Unknown");
    }

    #[test]
    fn free_text_and_missing_people() {
        let fields = FieldMap::default();
        let refs = people();
        let p = Projector::new(&fields, &refs);

        let text = RawRecord::new("rec1", json!({ "Accountable": "Regional lead" }));
        assert_eq!(p.milestone(&text).accountable, "Regional lead");

        let missing = RawRecord::new("rec2", json!({}));
        assert_eq!(p.milestone(&missing).accountable, "Unassigned");
        assert_eq!(p.action(&missing).responsible, "Unassigned");

        let empty_link = RawRecord::new("rec3", json!({ "Accountable": [] }));
        assert_eq!(p.milestone(&empty_link).accountable, "Unassigned");

        let unknown_link = RawRecord::new("rec4", json!({ "Accountable": ["recGone"] }));
        assert_eq!(p.milestone(&unknown_link).accountable, "Unknown");
    }

    #[test]
    fn start_date_is_estimated_and_flagged() {
        let fields = FieldMap::default();
        let refs = ReferenceMaps::default();
        let p = Projector::new(&fields, &refs);

        let m = p.milestone(&RawRecord::new("rec1", json!({ "Deadline": "2025-01-15" })));
        assert_eq!(m.start_date, Some(date(2024, 10, 15)));
        assert!(!m.has_start_date);

        let m = p.milestone(&RawRecord::new("rec2", json!({ "Deadline": "2025-05-31" })));
        assert_eq!(m.start_date, Some(date(2025, 2, 28)));
    }

    #[test]
    fn explicit_start_date_used_verbatim() {
        let fields = FieldMap::default();
        let refs = ReferenceMaps::default();
        let raw = RawRecord::new(
            "rec1",
            json!({ "Start Date": "2025-03-10", "Deadline": "2025-04-01" }),
        );
        let m = Projector::new(&fields, &refs).milestone(&raw);
        assert_eq!(m.start_date, Some(date(2025, 3, 10)));
        assert!(m.has_start_date);
    }

    #[test]
    fn undated_milestone_has_no_dates() {
        let fields = FieldMap::default();
        let refs = ReferenceMaps::default();
        let m = Projector::new(&fields, &refs).milestone(&RawRecord::new("rec1", json!({})));
        assert_eq!(m.deadline, None);
        assert_eq!(m.start_date, None);
        assert_eq!(m.name, "Untitled");
        assert_eq!(m.status, "Unknown");
        assert_eq!(m.priority, "Unknown");
    }

    #[test]
    fn priority_prefers_lookup_name_then_id() {
        let fields = FieldMap::default();
        let refs = people();
        let p = Projector::new(&fields, &refs);

        let lookup = RawRecord::new(
            "rec1",
            json!({ "Priority": ["1. Governance and Leadership"], "Priority area": ["recP1"] }),
        );
        assert_eq!(p.milestone(&lookup).priority, "1. Governance and Leadership");

        let by_id = RawRecord::new("rec2", json!({ "Priority area": ["recP1"] }));
        assert_eq!(p.milestone(&by_id).priority, "2. Grant making");

        let dangling = RawRecord::new("rec3", json!({ "Priority area": ["recP9"] }));
        assert_eq!(p.milestone(&dangling).priority, "Unknown");
    }

    #[test]
    fn director_view_filter_keeps_only_current_and_visible() {
        let fields = FieldMap::default();
        let refs = ReferenceMaps::default();
        let p = Projector::new(&fields, &refs);
        let raws = vec![
            RawRecord::new(
                "a1",
                json!({ "Current Status (TPW Role)": "Current", "Director View": true }),
            ),
            RawRecord::new(
                "a2",
                json!({ "Current Status (TPW Role)": "Current", "Director View": false }),
            ),
            RawRecord::new(
                "a3",
                json!({ "Current Status (TPW Role)": "Past", "Director View": true }),
            ),
        ];
        let kept: Vec<Action> = raws.iter().filter_map(|r| p.director_action(r)).collect();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "a1");
    }

    #[test]
    fn lenient_rule_accepts_string_flag() {
        let fields = FieldMap::default();
        let refs = ReferenceMaps::default();
        let raw = RawRecord::new(
            "a1",
            json!({ "Current Status (TPW Role)": "Current", "Director View": "true" }),
        );
        assert!(Projector::new(&fields, &refs).director_action(&raw).is_none());
        assert!(Projector::new(&fields, &refs)
            .with_rule(DirectorViewRule::Lenient)
            .director_action(&raw)
            .is_some());
    }

    #[test]
    fn notes_inline_or_linked() {
        let fields = FieldMap::default();
        let refs = people();
        let p = Projector::new(&fields, &refs);

        let inline = RawRecord::new("a1", json!({ "Notes": "Call partners" }));
        assert_eq!(p.action(&inline).notes.as_deref(), Some("Call partners"));

        let linked = RawRecord::new("a2", json!({ "Notes": ["recN1", "recGone"] }));
        assert_eq!(p.action(&linked).notes.as_deref(), Some("Waiting on budget"));

        let dangling = RawRecord::new("a3", json!({ "Notes": ["recGone"] }));
        assert_eq!(p.action(&dangling).notes, None);
    }

    #[test]
    fn activities_are_carried() {
        let fields = FieldMap::default();
        let refs = ReferenceMaps::default();
        let raw = RawRecord::new("m1", json!({ "Activities": ["a1", "a2"] }));
        let m = Projector::new(&fields, &refs).milestone(&raw);
        assert_eq!(m.activity_ids, vec!["a1", "a2"]);
    }
}
