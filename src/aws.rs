//! The AWS dialect facade: percent decoding, the lexer → parser →
//! normalizer pipeline, and the parsed-state cache.

use tracing::debug;

use crate::error::PolicyError;
use crate::models::Policy;
use crate::traits::PolicyParser;
use crate::{lexer, normalizer, parser};

/// Parser facade for AWS IAM policy documents.
///
/// ```
/// use cloudpolicy::{AwsPolicyParser, PolicyParser};
///
/// let text = r#"{"Statement":[{"Effect":"Allow","Action":"*","Resource":"*"}]}"#;
/// let mut parser = AwsPolicyParser::new(text, false).unwrap();
/// parser.parse().unwrap();
///
/// let policies = parser.policies().unwrap();
/// assert_eq!(policies.len(), 1);
/// assert!(policies[0].allowed);
/// assert_eq!(policies[0].actions, vec!["<.*>"]);
/// ```
#[derive(Debug)]
pub struct AwsPolicyParser {
    policy_text: String,
    policies: Option<Vec<Policy>>,
    error: Option<PolicyError>,
}

impl AwsPolicyParser {
    /// Build a facade over the given policy text. When `url_escaped`,
    /// the text is percent-decoded once before anything else; a decode
    /// failure is a construction failure.
    pub fn new(policy_text: &str, url_escaped: bool) -> Result<Self, PolicyError> {
        let text = if url_escaped {
            urlencoding::decode(policy_text)
                .map_err(|e| PolicyError::Decode(e.to_string()))?
                .into_owned()
        } else {
            policy_text.to_string()
        };
        debug!(
            event = "Parser",
            phase = "Create",
            provider = "aws",
            bytes = text.len()
        );
        Ok(AwsPolicyParser {
            policy_text: text,
            policies: None,
            error: None,
        })
    }
}

impl PolicyParser for AwsPolicyParser {
    fn parse(&mut self) -> Result<(), PolicyError> {
        let result = lexer::lex(&self.policy_text)
            .and_then(|tokens| parser::parse(&tokens))
            .map(|doc| normalizer::normalize(&doc));
        match result {
            Ok(policies) => {
                debug!(
                    event = "Parser",
                    phase = "Parsed",
                    provider = "aws",
                    policies = policies.len()
                );
                self.policies = Some(policies);
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }

    fn policies(&self) -> Result<Vec<Policy>, PolicyError> {
        if let Some(policies) = &self.policies {
            return Ok(policies.clone());
        }
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        Err(PolicyError::NotParsed)
    }
}
