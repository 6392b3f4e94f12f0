use super::http::{ApiClientConfig, ApiError, HttpClient};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

/// The four dashboard queries the analytics API exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardAction {
    Lender,
    Agent,
    Manager,
    Hr,
}

impl DashboardAction {
    pub const ALL: [DashboardAction; 4] = [
        DashboardAction::Lender,
        DashboardAction::Agent,
        DashboardAction::Manager,
        DashboardAction::Hr,
    ];

    pub fn descriptor(self) -> &'static ActionDescriptor {
        match self {
            DashboardAction::Lender => &ActionDescriptor {
                path: "/dashboard/lender/portfolio-summary",
                required_param: Some("lender_id"),
                optional_param: Some("bucket_filter"),
            },
            DashboardAction::Agent => &ActionDescriptor {
                path: "/dashboard/agent/assigned-loans",
                required_param: Some("agent_id"),
                optional_param: Some("status_filter"),
            },
            DashboardAction::Manager => &ActionDescriptor {
                path: "/dashboard/manager/branch-summary",
                required_param: Some("branch_id"),
                optional_param: Some("date"),
            },
            DashboardAction::Hr => &ActionDescriptor {
                path: "/dashboard/hr/performance",
                required_param: None,
                optional_param: None,
            },
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            DashboardAction::Lender => "Lender portfolio",
            DashboardAction::Agent => "Agent assigned loans",
            DashboardAction::Manager => "Branch summary",
            DashboardAction::Hr => "HR performance",
        }
    }

    pub fn index(self) -> usize {
        match self {
            DashboardAction::Lender => 0,
            DashboardAction::Agent => 1,
            DashboardAction::Manager => 2,
            DashboardAction::Hr => 3,
        }
    }
}

impl fmt::Display for DashboardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardAction::Lender => write!(f, "lender"),
            DashboardAction::Agent => write!(f, "agent"),
            DashboardAction::Manager => write!(f, "manager"),
            DashboardAction::Hr => write!(f, "hr"),
        }
    }
}

/// Static request shape for one action: endpoint path plus the names of
/// its identifier and filter query parameters.
#[derive(Debug)]
pub struct ActionDescriptor {
    pub path: &'static str,
    pub required_param: Option<&'static str>,
    pub optional_param: Option<&'static str>,
}

/// Raw form-field contents for one action, as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct ActionForm {
    pub primary: String,
    pub optional: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("{0} is required")]
    MissingField(&'static str),
}

/// A validated dashboard request: the action plus its query pairs in the
/// order they are sent (identifier first, then the optional filter).
#[derive(Debug, Clone)]
pub struct DashboardRequest {
    action: DashboardAction,
    params: Vec<(&'static str, String)>,
}

impl DashboardRequest {
    /// Trims the form fields and validates the required identifier. Blank
    /// optional fields are omitted rather than sent as empty parameters.
    pub fn from_form(action: DashboardAction, form: &ActionForm) -> Result<Self, RequestError> {
        let descriptor = action.descriptor();
        let mut params = Vec::new();

        if let Some(name) = descriptor.required_param {
            let value = form.primary.trim();
            if value.is_empty() {
                return Err(RequestError::MissingField(name));
            }
            params.push((name, value.to_string()));
        }

        if let Some(name) = descriptor.optional_param {
            let value = form.optional.trim();
            if !value.is_empty() {
                params.push((name, value.to_string()));
            }
        }

        Ok(Self { action, params })
    }

    pub fn action(&self) -> DashboardAction {
        self.action
    }

    pub fn url(&self, config: &ApiClientConfig) -> Result<Url, ApiError> {
        let mut url = config.endpoint(self.action.descriptor().path)?;
        if !self.params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

#[derive(Clone)]
pub struct DashboardClient {
    http: Arc<HttpClient>,
}

impl DashboardClient {
    pub fn new(config: ApiClientConfig) -> Result<Self, ApiError> {
        Ok(Self {
            http: Arc::new(HttpClient::new(config)?),
        })
    }

    /// Issues the GET for a validated request and returns the response body
    /// as-is. Non-success statuses with a JSON body are returned for
    /// display rather than treated as failures.
    pub async fn execute(&self, request: &DashboardRequest) -> Result<Value, ApiError> {
        let url = request.url(self.http.config())?;
        self.http.get_json(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use tokio;

    fn form(primary: &str, optional: &str) -> ActionForm {
        ActionForm {
            primary: primary.into(),
            optional: optional.into(),
        }
    }

    #[test]
    fn blank_identifier_is_rejected_before_any_request() {
        for (action, field) in [
            (DashboardAction::Lender, "lender_id"),
            (DashboardAction::Agent, "agent_id"),
            (DashboardAction::Manager, "branch_id"),
        ] {
            let err = DashboardRequest::from_form(action, &form("   ", "anything")).unwrap_err();
            assert_eq!(err, RequestError::MissingField(field));
            assert_eq!(err.to_string(), format!("{field} is required"));
        }
    }

    #[test]
    fn hr_needs_no_identifier() {
        let request = DashboardRequest::from_form(DashboardAction::Hr, &form("", "")).unwrap();
        let config = ApiClientConfig::try_from_url("http://x").unwrap();
        let url = request.url(&config).unwrap();
        assert_eq!(url.as_str(), "http://x/dashboard/hr/performance");
    }

    #[test]
    fn blank_optional_filter_is_omitted() {
        let request =
            DashboardRequest::from_form(DashboardAction::Lender, &form("L1", "  ")).unwrap();
        let config = ApiClientConfig::try_from_url("http://x").unwrap();
        let url = request.url(&config).unwrap();
        assert_eq!(url.query(), Some("lender_id=L1"));
    }

    #[test]
    fn identifier_precedes_optional_filter() {
        let request =
            DashboardRequest::from_form(DashboardAction::Lender, &form("L1", "30-60")).unwrap();
        let config = ApiClientConfig::try_from_url("http://x").unwrap();
        let url = request.url(&config).unwrap();
        assert_eq!(url.query(), Some("lender_id=L1&bucket_filter=30-60"));
    }

    #[test]
    fn trailing_slash_on_base_does_not_double() {
        let request = DashboardRequest::from_form(DashboardAction::Hr, &form("", "")).unwrap();
        let config = ApiClientConfig::try_from_url("http://x/").unwrap();
        let url = request.url(&config).unwrap();
        assert_eq!(url.as_str(), "http://x/dashboard/hr/performance");
        assert!(!url.as_str().contains("//dashboard"));
    }

    #[test]
    fn form_fields_are_trimmed() {
        let request =
            DashboardRequest::from_form(DashboardAction::Manager, &form(" BR-7 ", " 2025-01-01 "))
                .unwrap();
        let config = ApiClientConfig::try_from_url("http://x").unwrap();
        let url = request.url(&config).unwrap();
        assert_eq!(url.query(), Some("branch_id=BR-7&date=2025-01-01"));
    }

    #[tokio::test]
    async fn fetches_hr_performance() {
        let server = MockServer::start();
        let _mock = server.mock(|when, then| {
            when.method(GET).path("/dashboard/hr/performance");
            then.status(200).json_body(json!({ "total": 5 }));
        });

        let config = ApiClientConfig::try_from_url(&server.url("/")).unwrap();
        let client = DashboardClient::new(config).unwrap();
        let request = DashboardRequest::from_form(DashboardAction::Hr, &form("", "")).unwrap();
        let value = client.execute(&request).await.unwrap();
        assert_eq!(value, json!({ "total": 5 }));
    }

    #[tokio::test]
    async fn sends_agent_query_parameters() {
        let server = MockServer::start();
        let _mock = server.mock(|when, then| {
            when.method(GET)
                .path("/dashboard/agent/assigned-loans")
                .query_param("agent_id", "AG-9")
                .query_param("status_filter", "CONNECTED");
            then.status(200).json_body(json!({
                "loans": [],
                "total": 0,
                "followups_due": 0
            }));
        });

        let config = ApiClientConfig::try_from_url(&server.url("/")).unwrap();
        let client = DashboardClient::new(config).unwrap();
        let request =
            DashboardRequest::from_form(DashboardAction::Agent, &form("AG-9", "CONNECTED"))
                .unwrap();
        let value = client.execute(&request).await.unwrap();
        assert_eq!(value["total"], json!(0));
    }

    #[tokio::test]
    async fn json_error_bodies_are_passed_through() {
        let server = MockServer::start();
        let _mock = server.mock(|when, then| {
            when.method(GET).path("/dashboard/manager/branch-summary");
            then.status(400)
                .json_body(json!({ "detail": "branch_id is required for this demo" }));
        });

        let config = ApiClientConfig::try_from_url(&server.url("/")).unwrap();
        let client = DashboardClient::new(config).unwrap();
        let request =
            DashboardRequest::from_form(DashboardAction::Manager, &form("BR-1", "")).unwrap();
        let value = client.execute(&request).await.unwrap();
        assert_eq!(value["detail"], json!("branch_id is required for this demo"));
    }

    #[tokio::test]
    async fn non_json_failure_surfaces_status_and_body() {
        let server = MockServer::start();
        let _mock = server.mock(|when, then| {
            when.method(GET).path("/dashboard/lender/portfolio-summary");
            then.status(502).body("bad gateway");
        });

        let config = ApiClientConfig::try_from_url(&server.url("/")).unwrap();
        let client = DashboardClient::new(config).unwrap();
        let request =
            DashboardRequest::from_form(DashboardAction::Lender, &form("L1", "")).unwrap();
        let err = client.execute(&request).await.unwrap_err();
        match err {
            ApiError::HttpStatus { status, body } => {
                assert_eq!(status.as_u16(), 502);
                assert_eq!(body, "bad gateway");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
