use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Milestone
// ---------------------------------------------------------------------------

/// A milestone row after field mapping and reference resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub name: String,
    pub priority: String,
    pub status: String,
    pub accountable: String,
    /// Explicit start date, or the estimate derived from the deadline.
    pub start_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    /// `false` when `start_date` is an estimate.
    pub has_start_date: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub activity_ids: Vec<String>,
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// An action row after field mapping and reference resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub id: String,
    pub name: String,
    pub responsible: String,
    pub deadline: Option<NaiveDate>,
    pub status: String,
    /// TPW role tag, e.g. `Current`.
    pub role: Option<String>,
    pub director_view: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Categorical fields items can be filtered and grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Priority,
    Accountable,
    Responsible,
    Status,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Priority => "priority",
            Category::Accountable => "accountable",
            Category::Responsible => "responsible",
            Category::Status => "status",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "priority" => Ok(Category::Priority),
            "accountable" => Ok(Category::Accountable),
            "responsible" => Ok(Category::Responsible),
            "status" => Ok(Category::Status),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

/// Items that expose categorical labels and a deadline.
pub trait Categorized {
    /// Label under `category`, or `None` if the item has no such field.
    fn category(&self, category: Category) -> Option<&str>;
    fn deadline(&self) -> Option<NaiveDate>;
}

impl Categorized for Milestone {
    fn category(&self, category: Category) -> Option<&str> {
        match category {
            Category::Priority => Some(&self.priority),
            Category::Accountable => Some(&self.accountable),
            Category::Status => Some(&self.status),
            Category::Responsible => None,
        }
    }

    fn deadline(&self) -> Option<NaiveDate> {
        self.deadline
    }
}

impl Categorized for Action {
    fn category(&self, category: Category) -> Option<&str> {
        match category {
            Category::Responsible => Some(&self.responsible),
            Category::Status => Some(&self.status),
            Category::Priority | Category::Accountable => None,
        }
    }

    fn deadline(&self) -> Option<NaiveDate> {
        self.deadline
    }
}
