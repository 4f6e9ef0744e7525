//! Provider dispatch and the placeholder dialects.
//!
//! Azure and GCP are unimplemented dialects that honor the
//! [`PolicyParser`] contract but always report empty results, matching
//! the observed behavior of the system this crate normalizes for.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::aws::AwsPolicyParser;
use crate::error::PolicyError;
use crate::models::Policy;
use crate::traits::PolicyParser;

/// The cloud provider dialects. Round-trips to the lowercase provider
/// name (`"aws"`, `"azure"`, `"gcp"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Aws,
    Azure,
    Gcp,
}

impl Provider {
    /// Build the dialect parser for this provider.
    pub fn parser(
        self,
        policy_text: &str,
        url_escaped: bool,
    ) -> Result<Box<dyn PolicyParser>, PolicyError> {
        match self {
            Provider::Aws => Ok(Box::new(AwsPolicyParser::new(policy_text, url_escaped)?)),
            Provider::Azure => Ok(Box::new(AzurePolicyParser::new(policy_text, url_escaped))),
            Provider::Gcp => Ok(Box::new(GcpPolicyParser::new(policy_text, url_escaped))),
        }
    }
}

/// Build a dialect parser from a provider name.
///
/// ```
/// use cloudpolicy::new_parser;
///
/// let text = r#"{"Statement":[{"Effect":"Deny","Action":"iam:CreateUser"}]}"#;
/// let mut parser = new_parser("aws", text, false).unwrap();
/// parser.parse().unwrap();
/// assert_eq!(parser.policies().unwrap().len(), 1);
/// ```
pub fn new_parser(
    provider: &str,
    policy_text: &str,
    url_escaped: bool,
) -> Result<Box<dyn PolicyParser>, PolicyError> {
    let provider: Provider = provider
        .parse()
        .map_err(|_| PolicyError::UnsupportedProvider(provider.to_string()))?;
    provider.parser(policy_text, url_escaped)
}

/// Placeholder Azure dialect.
#[allow(dead_code)]
pub struct AzurePolicyParser {
    policy_text: String,
    url_escaped: bool,
}

impl AzurePolicyParser {
    pub fn new(policy_text: &str, url_escaped: bool) -> Self {
        AzurePolicyParser {
            policy_text: policy_text.to_string(),
            url_escaped,
        }
    }
}

impl PolicyParser for AzurePolicyParser {
    fn parse(&mut self) -> Result<(), PolicyError> {
        Ok(())
    }

    fn policies(&self) -> Result<Vec<Policy>, PolicyError> {
        Ok(Vec::new())
    }
}

/// Placeholder GCP dialect.
#[allow(dead_code)]
pub struct GcpPolicyParser {
    policy_text: String,
    url_escaped: bool,
}

impl GcpPolicyParser {
    pub fn new(policy_text: &str, url_escaped: bool) -> Self {
        GcpPolicyParser {
            policy_text: policy_text.to_string(),
            url_escaped,
        }
    }
}

impl PolicyParser for GcpPolicyParser {
    fn parse(&mut self) -> Result<(), PolicyError> {
        Ok(())
    }

    fn policies(&self) -> Result<Vec<Policy>, PolicyError> {
        Ok(Vec::new())
    }
}
