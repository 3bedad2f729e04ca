use thiserror::Error;

#[derive(Debug, Error)]
pub enum GanttError {
    #[error("missing record store credentials: {0}")]
    MissingCredentials(String),

    #[error("invalid record store url '{0}'")]
    InvalidStoreUrl(String),

    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("table not found: {0}")]
    TableNotFound(String),

    #[error("request for table '{table}' failed: {source}")]
    Request {
        table: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("record store returned {status} for table '{table}': {body}")]
    Upstream {
        table: String,
        status: u16,
        body: String,
    },

    #[error("failed to decode page of table '{table}': {source}")]
    Decode {
        table: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("required table '{table}' unavailable: {source}")]
    RequiredTable {
        table: String,
        #[source]
        source: Box<GanttError>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl GanttError {
    /// Transport failures and 5xx answers are worth one more attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            GanttError::Request { .. } => true,
            GanttError::Upstream { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, GanttError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_5xx_is_transient() {
        let err = GanttError::Upstream {
            table: "Actions".to_string(),
            status: 503,
            body: String::new(),
        };
        assert!(err.is_transient());
    }

    #[test]
    fn upstream_4xx_is_not_transient() {
        let err = GanttError::Upstream {
            table: "Actions".to_string(),
            status: 422,
            body: "INVALID_REQUEST".to_string(),
        };
        assert!(!err.is_transient());
        assert!(!GanttError::TableNotFound("Notes".to_string()).is_transient());
    }

    #[test]
    fn required_table_message_names_table_and_cause() {
        let err = GanttError::RequiredTable {
            table: "Milestones".to_string(),
            source: Box::new(GanttError::Upstream {
                table: "Milestones".to_string(),
                status: 401,
                body: "AUTHENTICATION_REQUIRED".to_string(),
            }),
        };
        let msg = err.to_string();
        assert!(msg.contains("Milestones"));
        assert!(msg.contains("401"));
    }
}
