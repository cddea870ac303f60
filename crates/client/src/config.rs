/// Connection settings for the inspection-image API.
///
/// An explicit struct handed to [`crate::InspectionApi`] at construction;
/// there is deliberately no process-wide base-URL or token state.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the API, e.g. `https://host/api`. No trailing slash.
    pub base_url: String,
    /// Static auth token sent as the `X-Auth-Token` header.
    pub auth_token: String,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var          | Meaning                      |
    /// |------------------|------------------------------|
    /// | `MVI_BASE_URL`   | API base URL (required)      |
    /// | `MVI_AUTH_TOKEN` | Static auth token (required) |
    pub fn from_env() -> Self {
        let base_url = std::env::var("MVI_BASE_URL").expect("MVI_BASE_URL must be set");
        let auth_token = std::env::var("MVI_AUTH_TOKEN").expect("MVI_AUTH_TOKEN must be set");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
        }
    }
}
