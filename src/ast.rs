//! Abstract syntax tree for the AWS policy dialect.
//!
//! Each node mirrors one grammar production. The tree is built by the
//! parser, handed to the normalizer exactly once, and then discarded;
//! nothing here survives into the canonical [`crate::models::Policy`]
//! records.

/// Root node: optional version and id plus the statement list.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub version: Option<String>,
    pub id: Option<String>,
    pub statements: Vec<Statement>,
}

/// One access-control statement, an ordered bag of elements.
///
/// Element order is irrelevant to the grammar but preserved so that
/// normalization is deterministic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Statement {
    pub elements: Vec<Element>,
}

/// Exactly one of the nine statement element kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Sid(String),
    Effect(String),
    Principal(PrincipalNode),
    NotPrincipal(PrincipalNode),
    Action(AnyOrList),
    NotAction(AnyOrList),
    Resource(AnyOrList),
    NotResource(AnyOrList),
    Condition(ConditionNode),
}

/// Either a single item or a bracketed list of items.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyOrList {
    One(Item),
    List(Vec<Item>),
}

/// A bare `"*"` wildcard or a literal string.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Any,
    One(String),
}

/// A principal block: the `"*"` wildcard or a map of principal entries.
#[derive(Debug, Clone, PartialEq)]
pub enum PrincipalNode {
    Any,
    Entries(Vec<PrincipalEntry>),
}

/// One entry of a principal map. The grammar admits exactly one of the
/// four entry kinds per entry.
#[derive(Debug, Clone, PartialEq)]
pub enum PrincipalEntry {
    Aws(AnyOrList),
    Federated(AnyOrList),
    CanonicalUser(AnyOrList),
    Service(AnyOrList),
}

/// A condition block: ordered operator/key/value entries.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionNode {
    pub entries: Vec<ConditionEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionEntry {
    pub operation: String,
    pub key: String,
    pub values: ValueList,
}

/// Either a single scalar value or a bracketed list of values.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueList {
    One(Value),
    List(Vec<Value>),
}

/// A scalar condition value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Bool(bool),
}
