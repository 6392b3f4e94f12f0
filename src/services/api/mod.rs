pub mod dashboard;
pub mod http;

pub use dashboard::{
    ActionDescriptor,
    ActionForm,
    DashboardAction,
    DashboardClient,
    DashboardRequest,
    RequestError,
};
pub use http::{ApiClientConfig, ApiError, HttpClient};
