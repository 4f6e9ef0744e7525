//! cloudpolicy: parser and normalizer for cloud provider IAM policy
//! documents.
//!
//! Raw policy text (optionally percent-escaped) goes through a
//! tokenizer, a bounded-lookahead recursive-descent parser, and a
//! single-pass semantic normalizer, producing canonical [`Policy`]
//! records suitable for permission auditing, authorization simulation,
//! and policy diffing. Only the AWS dialect is implemented; Azure and
//! GCP expose the same [`PolicyParser`] contract as placeholders.
//!
//! ```
//! use cloudpolicy::{new_parser, PolicyParser};
//!
//! let text = r#"{
//!   "Version": "2012-10-17",
//!   "Statement": [
//!     {"Effect": "Allow", "Action": ["s3:GetObject"], "Resource": "arn:aws:s3:::logs/*"}
//!   ]
//! }"#;
//!
//! let mut parser = new_parser("aws", text, false).unwrap();
//! parser.parse().unwrap();
//!
//! let policies = parser.policies().unwrap();
//! assert_eq!(policies[0].resources, vec!["arn:aws:s3:::logs/<.*>"]);
//! ```

pub use aws::AwsPolicyParser;
pub use error::{PolicyError, Position};
pub use models::{Condition, ConditionValueType, ConditionValues, Policy};
pub use providers::{AzurePolicyParser, GcpPolicyParser, Provider, new_parser};
pub use traits::PolicyParser;

mod ast;
mod aws;
mod error;
mod lexer;
mod models;
mod normalizer;
mod parser;
mod providers;
mod traits;
