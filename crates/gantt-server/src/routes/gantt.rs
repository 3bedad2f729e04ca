use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use gantt_core::view::{GanttQuery, GanttView};

use crate::error::AppError;
use crate::routes::{selection, single, Pairs};
use crate::state::AppState;

/// Query parameters for `/api/gantt`. Chip filters repeat their key, one
/// value per chip.
#[derive(Debug, Default)]
pub struct GanttParams {
    pub priority: Option<Vec<String>>,
    pub status: Option<Vec<String>>,
    pub accountable: Option<Vec<String>>,
    /// `priority` (default) or `none`.
    pub group: Option<String>,
    /// `deadline`, or `none` (default) to keep store order.
    pub sort: Option<String>,
    /// Anchor for the fallback window; defaults to the current UTC date.
    pub today: Option<NaiveDate>,
}

impl GanttParams {
    pub fn from_pairs(pairs: &Pairs) -> Result<Self, AppError> {
        let today = single(pairs, "today")
            .map(|raw| {
                raw.parse::<NaiveDate>().map_err(|e| {
                    AppError::bad_request(format!("invalid today '{raw}': {e}"))
                })
            })
            .transpose()?;
        Ok(Self {
            priority: selection(pairs, "priority"),
            status: selection(pairs, "status"),
            accountable: selection(pairs, "accountable"),
            group: single(pairs, "group").map(str::to_string),
            sort: single(pairs, "sort").map(str::to_string),
            today,
        })
    }

    pub fn to_query(&self) -> Result<GanttQuery, AppError> {
        let group_by_priority = match self.group.as_deref() {
            None | Some("priority") => true,
            Some("none") => false,
            Some(other) => {
                return Err(AppError::bad_request(format!(
                    "unknown group '{other}': expected priority or none"
                )))
            }
        };
        let sort_by_deadline = match self.sort.as_deref() {
            Some("deadline") => true,
            None | Some("none") => false,
            Some(other) => {
                return Err(AppError::bad_request(format!(
                    "unknown sort '{other}': expected deadline or none"
                )))
            }
        };
        Ok(GanttQuery {
            priorities: self.priority.clone(),
            statuses: self.status.clone(),
            accountable: self.accountable.clone(),
            group_by_priority,
            sort_by_deadline,
        })
    }
}

/// GET /api/gantt: filtered milestones with month grid and bar geometry.
pub async fn get_gantt(
    State(app): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<GanttView>, AppError> {
    let params = GanttParams::from_pairs(&pairs)?;
    let query = params.to_query()?;
    let today = params
        .today
        .unwrap_or_else(|| chrono::Utc::now().date_naive());
    let dashboard = app.dashboard().await?;
    Ok(Json(GanttView::build(&dashboard, &query, today)))
}
