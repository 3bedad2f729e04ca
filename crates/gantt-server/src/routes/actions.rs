use axum::extract::{Query, State};
use axum::Json;
use gantt_core::model::Category;
use gantt_core::view::{ActionsQuery, ActionsView};

use crate::error::AppError;
use crate::routes::{selection, single, Pairs};
use crate::state::AppState;

/// Query parameters for `/api/actions`. Chip filters repeat their key, one
/// value per chip.
#[derive(Debug, Default)]
pub struct ActionsParams {
    pub responsible: Option<Vec<String>>,
    pub status: Option<Vec<String>>,
    /// `responsible` (default), `status` or `none`.
    pub group: Option<String>,
}

impl ActionsParams {
    pub fn from_pairs(pairs: &Pairs) -> Self {
        Self {
            responsible: selection(pairs, "responsible"),
            status: selection(pairs, "status"),
            group: single(pairs, "group").map(str::to_string),
        }
    }

    pub fn to_query(&self) -> Result<ActionsQuery, AppError> {
        let group = match self.group.as_deref() {
            None | Some("responsible") => Some(Category::Responsible),
            Some("status") => Some(Category::Status),
            Some("none") => None,
            Some(other) => {
                return Err(AppError::bad_request(format!(
                    "unknown group '{other}': expected responsible, status or none"
                )))
            }
        };
        Ok(ActionsQuery {
            responsible: self.responsible.clone(),
            statuses: self.status.clone(),
            group,
        })
    }
}

/// GET /api/actions: Director View actions, filtered, deadline-ordered and
/// grouped.
pub async fn get_actions(
    State(app): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ActionsView>, AppError> {
    let query = ActionsParams::from_pairs(&pairs).to_query()?;
    let dashboard = app.dashboard().await?;
    Ok(Json(ActionsView::build(&dashboard, &query)))
}
