use crate::error::PolicyError;
use crate::models::Policy;

/// Capability contract implemented by every provider dialect.
///
/// A parser is single-use: construct it with the policy text, call
/// [`parse`](PolicyParser::parse) once, then query
/// [`policies`](PolicyParser::policies) as often as needed. Instances
/// are independent; use one per document.
pub trait PolicyParser {
    /// Run the pipeline once. On success the normalized policies are
    /// cached; on failure the error is recorded and no partial result
    /// is retained.
    fn parse(&mut self) -> Result<(), PolicyError>;

    /// The cached policies from a successful parse. After a failed
    /// parse this returns the recorded parse error; before any parse it
    /// returns [`PolicyError::NotParsed`].
    fn policies(&self) -> Result<Vec<Policy>, PolicyError>;
}
