//! WatsonX configuration

use seoscan_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;

const DEFAULT_IAM_URL: &str = "iam.cloud.ibm.com";
const DEFAULT_API_URL: &str = "https://us-south.ml.cloud.ibm.com";

/// Configuration for the WatsonX AI client
///
/// Resolved from `SEOSCAN_WATSONX_*` variables first, then the bare
/// `WATSONX_*` names the IBM tooling conventionally sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatsonxConfig {
    pub api_key: String,
    pub project_id: String,
    pub iam_url: String,
    pub api_url: String,
}

fn first_env(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| env::var(name).ok())
}

impl WatsonxConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = first_env(&["SEOSCAN_WATSONX_API_KEY", "WATSONX_API_KEY"]).ok_or_else(
            || {
                Error::Configuration(
                    "set SEOSCAN_WATSONX_API_KEY or WATSONX_API_KEY".to_string(),
                )
            },
        )?;

        let project_id = first_env(&["SEOSCAN_WATSONX_PROJECT_ID", "WATSONX_PROJECT_ID"])
            .ok_or_else(|| {
                Error::Configuration(
                    "set SEOSCAN_WATSONX_PROJECT_ID or WATSONX_PROJECT_ID".to_string(),
                )
            })?;

        let iam_url = first_env(&["SEOSCAN_WATSONX_IAM_URL", "WATSONX_IAM_URL"])
            .unwrap_or_else(|| DEFAULT_IAM_URL.to_string());

        let api_url = first_env(&["SEOSCAN_WATSONX_API_URL", "WATSONX_API_URL"])
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self {
            api_key,
            project_id,
            iam_url,
            api_url,
        })
    }

    /// Create configuration with explicit values
    pub fn new(api_key: String, project_id: String) -> Self {
        Self {
            api_key,
            project_id,
            iam_url: DEFAULT_IAM_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_prefixed_vars_win() {
        env::set_var("SEOSCAN_WATSONX_API_KEY", "prefixed-key");
        env::set_var("WATSONX_API_KEY", "plain-key");
        env::set_var("WATSONX_PROJECT_ID", "plain-project");

        let config = WatsonxConfig::from_env().unwrap();
        assert_eq!(config.api_key, "prefixed-key");
        assert_eq!(config.project_id, "plain-project");
        assert_eq!(config.iam_url, DEFAULT_IAM_URL);
        assert_eq!(config.api_url, DEFAULT_API_URL);

        env::remove_var("SEOSCAN_WATSONX_API_KEY");
        env::remove_var("WATSONX_API_KEY");
        env::remove_var("WATSONX_PROJECT_ID");
    }
}
