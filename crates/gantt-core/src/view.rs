//! Filtering, grouping and ordering of projected items, and the two views the
//! dashboard renders: the milestone Gantt and the Director View action list.

use crate::dashboard::Dashboard;
use crate::model::{Action, Categorized, Category, Milestone};
use crate::timeline::{BarGeometry, TimelineBounds};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

// ---------------------------------------------------------------------------
// Building blocks
// ---------------------------------------------------------------------------

/// Distinct values of `category` in first-seen order. Call this on the
/// unfiltered set so deselected values can still be offered back.
pub fn chip_options<T: Categorized>(items: &[T], category: Category) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter_map(|item| item.category(category))
        .filter(|v| seen.insert(v.to_string()))
        .map(str::to_string)
        .collect()
}

/// `None` selects everything; `Some(&[])` selects nothing.
pub fn is_selected<T: Categorized>(item: &T, category: Category, selected: Option<&[String]>) -> bool {
    match selected {
        None => true,
        Some(values) => item
            .category(category)
            .is_some_and(|v| values.iter().any(|s| s == v)),
    }
}

/// Deadline ascending, undated items last. Stable, so ties keep input order.
pub fn sort_by_deadline<T: Categorized>(items: &mut [T]) {
    items.sort_by(|a, b| match (a.deadline(), b.deadline()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group<T> {
    /// Category value shared by the group; `None` for the single ungrouped list.
    pub key: Option<String>,
    pub items: Vec<T>,
}

/// Split `items` by `category`, groups in first-seen order, items keeping
/// their relative order. Items without the category land under `"Unknown"`.
pub fn group_by<T: Categorized>(items: Vec<T>, category: Category) -> Vec<Group<T>> {
    let mut groups: Vec<Group<T>> = Vec::new();
    for item in items {
        let key = item
            .category(category)
            .unwrap_or(crate::reference::UNKNOWN)
            .to_string();
        match groups.iter_mut().find(|g| g.key.as_deref() == Some(key.as_str())) {
            Some(group) => group.items.push(item),
            None => groups.push(Group {
                key: Some(key),
                items: vec![item],
            }),
        }
    }
    groups
}

fn ungrouped<T>(items: Vec<T>) -> Vec<Group<T>> {
    if items.is_empty() {
        return Vec::new();
    }
    vec![Group { key: None, items }]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipSet {
    pub category: Category,
    pub options: Vec<String>,
}

// ---------------------------------------------------------------------------
// GanttView
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GanttQuery {
    #[serde(default)]
    pub priorities: Option<Vec<String>>,
    #[serde(default)]
    pub statuses: Option<Vec<String>>,
    #[serde(default)]
    pub accountable: Option<Vec<String>>,
    #[serde(default = "default_true")]
    pub group_by_priority: bool,
    #[serde(default)]
    pub sort_by_deadline: bool,
}

fn default_true() -> bool {
    true
}

impl Default for GanttQuery {
    fn default() -> Self {
        Self {
            priorities: None,
            statuses: None,
            accountable: None,
            group_by_priority: true,
            sort_by_deadline: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GanttRow {
    #[serde(flatten)]
    pub milestone: Milestone,
    /// `None` for milestones without a deadline.
    pub geometry: Option<BarGeometry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GanttView {
    pub bounds: TimelineBounds,
    pub chips: Vec<ChipSet>,
    /// Milestones before filtering.
    pub total: usize,
    /// Milestones after filtering.
    pub shown: usize,
    pub groups: Vec<Group<GanttRow>>,
}

impl GanttView {
    /// Filter, order and lay out the dashboard's milestones. Bounds are fitted
    /// to the milestones that survive the filters.
    pub fn build(dashboard: &Dashboard, query: &GanttQuery, today: NaiveDate) -> Self {
        let all = &dashboard.milestones;
        let chips = vec![
            ChipSet {
                category: Category::Priority,
                options: chip_options(all, Category::Priority),
            },
            ChipSet {
                category: Category::Status,
                options: chip_options(all, Category::Status),
            },
            ChipSet {
                category: Category::Accountable,
                options: chip_options(all, Category::Accountable),
            },
        ];

        let mut shown: Vec<&Milestone> = all
            .iter()
            .filter(|m| is_selected(*m, Category::Priority, query.priorities.as_deref()))
            .filter(|m| is_selected(*m, Category::Status, query.statuses.as_deref()))
            .filter(|m| is_selected(*m, Category::Accountable, query.accountable.as_deref()))
            .collect();
        if query.sort_by_deadline {
            sort_by_deadline(&mut shown);
        }

        let bounds = TimelineBounds::compute(&shown, today);
        let rows: Vec<GanttRow> = shown
            .iter()
            .map(|m| GanttRow {
                milestone: (*m).clone(),
                geometry: bounds.geometry(m),
            })
            .collect();
        let count = rows.len();
        let groups = if query.group_by_priority {
            group_by(rows, Category::Priority)
        } else {
            ungrouped(rows)
        };

        Self {
            bounds,
            chips,
            total: all.len(),
            shown: count,
            groups,
        }
    }
}

impl Categorized for GanttRow {
    fn category(&self, category: Category) -> Option<&str> {
        self.milestone.category(category)
    }

    fn deadline(&self) -> Option<NaiveDate> {
        self.milestone.deadline
    }
}

impl<T: Categorized> Categorized for &T {
    fn category(&self, category: Category) -> Option<&str> {
        (*self).category(category)
    }

    fn deadline(&self) -> Option<NaiveDate> {
        (*self).deadline()
    }
}

// ---------------------------------------------------------------------------
// ActionsView
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionsQuery {
    #[serde(default)]
    pub responsible: Option<Vec<String>>,
    #[serde(default)]
    pub statuses: Option<Vec<String>>,
    /// `Responsible` or `Status`; `None` lists everything in one group.
    #[serde(default = "default_action_group")]
    pub group: Option<Category>,
}

fn default_action_group() -> Option<Category> {
    Some(Category::Responsible)
}

impl Default for ActionsQuery {
    fn default() -> Self {
        Self {
            responsible: None,
            statuses: None,
            group: default_action_group(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionsView {
    pub chips: Vec<ChipSet>,
    /// Director View actions before filtering.
    pub total: usize,
    pub shown: usize,
    pub groups: Vec<Group<Action>>,
}

impl ActionsView {
    /// Filter the Director View actions and order them by deadline.
    pub fn build(dashboard: &Dashboard, query: &ActionsQuery) -> Self {
        let all = &dashboard.actions;
        let chips = vec![
            ChipSet {
                category: Category::Responsible,
                options: chip_options(all, Category::Responsible),
            },
            ChipSet {
                category: Category::Status,
                options: chip_options(all, Category::Status),
            },
        ];

        let mut shown: Vec<Action> = all
            .iter()
            .filter(|a| is_selected(*a, Category::Responsible, query.responsible.as_deref()))
            .filter(|a| is_selected(*a, Category::Status, query.statuses.as_deref()))
            .cloned()
            .collect();
        sort_by_deadline(&mut shown);
        let count = shown.len();

        let groups = match query.group {
            Some(category) => group_by(shown, category),
            None => ungrouped(shown),
        };

        Self {
            chips,
            total: all.len(),
            shown: count,
            groups,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
