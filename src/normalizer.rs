//! Semantic normalization: one pass over the AST producing canonical
//! [`Policy`] records.

use tracing::warn;

use crate::ast::{
    AnyOrList, ConditionNode, Document, Element, Item, PrincipalEntry, PrincipalNode, Value,
    ValueList,
};
use crate::models::{Condition, ConditionValues, Policy};

/// Pattern marker substituted for every literal `*` in resolved strings.
const WILDCARD: &str = "<.*>";

/// Walk the document once and emit one policy per statement, in
/// document order.
pub fn normalize(doc: &Document) -> Vec<Policy> {
    let id = doc.id.as_deref().unwrap_or_default();
    let version = doc.version.as_deref().unwrap_or_default();

    doc.statements
        .iter()
        .enumerate()
        .map(|(index, statement)| {
            let mut policy = Policy {
                id: format!("{id}:{index}"),
                version: version.to_string(),
                ..Policy::default()
            };
            for element in &statement.elements {
                match element {
                    // Parsed for grammar completeness, not retained.
                    Element::Sid(_) => {}
                    // Case-insensitive; anything but "allow" denies.
                    // A repeated Effect overwrites the earlier one.
                    Element::Effect(effect) => {
                        policy.allowed = effect.eq_ignore_ascii_case("allow");
                    }
                    Element::Action(list) => policy.actions = resolve_any_or_list(list),
                    Element::NotAction(list) => policy.not_actions = resolve_any_or_list(list),
                    Element::Resource(list) => policy.resources = resolve_any_or_list(list),
                    Element::NotResource(list) => {
                        policy.not_resources = resolve_any_or_list(list);
                    }
                    Element::Principal(principal) => {
                        policy.subjects = resolve_principal(principal);
                    }
                    Element::NotPrincipal(principal) => {
                        policy.not_subjects = resolve_principal(principal);
                    }
                    Element::Condition(node) => {
                        policy.conditions = resolve_conditions(node);
                    }
                }
            }
            policy
        })
        .collect()
}

/// Pure substring substitution: every `*` becomes `<.*>`, whether or
/// not it was meant as a wildcard.
fn resolve_item(item: &Item) -> String {
    match item {
        Item::Any => WILDCARD.to_string(),
        Item::One(s) => s.replace('*', WILDCARD),
    }
}

fn resolve_any_or_list(list: &AnyOrList) -> Vec<String> {
    match list {
        AnyOrList::One(item) => vec![resolve_item(item)],
        AnyOrList::List(items) => items.iter().map(resolve_item).collect(),
    }
}

/// Flatten a principal block into a single subject list, preserving
/// entry declaration order.
fn resolve_principal(principal: &PrincipalNode) -> Vec<String> {
    match principal {
        PrincipalNode::Any => vec![WILDCARD.to_string()],
        PrincipalNode::Entries(entries) => entries
            .iter()
            .flat_map(|entry| {
                let list = match entry {
                    PrincipalEntry::Aws(list)
                    | PrincipalEntry::Federated(list)
                    | PrincipalEntry::CanonicalUser(list)
                    | PrincipalEntry::Service(list) => list,
                };
                resolve_any_or_list(list)
            })
            .collect(),
    }
}

fn resolve_conditions(node: &ConditionNode) -> Vec<Condition> {
    let mut conditions = Vec::new();
    for entry in &node.entries {
        if entry.operation.is_empty() || entry.key.is_empty() {
            continue;
        }
        let Some(values) = classify_values(&entry.values) else {
            // Mixed value types are a normalization drop, never an error.
            warn!(
                event = "Normalize",
                phase = "Condition",
                operation = %entry.operation,
                key = %entry.key,
                "dropping condition entry with mixed value types"
            );
            continue;
        };
        let value_type = values.value_type();
        conditions.push(Condition {
            operation: entry.operation.clone(),
            key: entry.key.clone(),
            values,
            value_type,
        });
    }
    conditions
}

/// Infer the homogeneous value type, or `None` when the list mixes
/// types. The expected type is the first element's type.
fn classify_values(values: &ValueList) -> Option<ConditionValues> {
    match values {
        ValueList::One(value) => Some(match value {
            Value::Str(s) => ConditionValues::String(vec![s.clone()]),
            Value::Int(n) => ConditionValues::Int64(vec![*n]),
            Value::Bool(b) => ConditionValues::Bool(vec![*b]),
        }),
        ValueList::List(values) => match values.first()? {
            Value::Str(_) => values
                .iter()
                .map(|v| match v {
                    Value::Str(s) => Some(s.clone()),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()
                .map(ConditionValues::String),
            Value::Int(_) => values
                .iter()
                .map(|v| match v {
                    Value::Int(n) => Some(*n),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()
                .map(ConditionValues::Int64),
            Value::Bool(_) => values
                .iter()
                .map(|v| match v {
                    Value::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()
                .map(ConditionValues::Bool),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ConditionEntry, Statement};
    use crate::models::ConditionValueType;
    use crate::{lexer, parser};
    use yare::parameterized;

    fn normalize_text(src: &str) -> Vec<Policy> {
        let tokens = lexer::lex(src).unwrap();
        normalize(&parser::parse(&tokens).unwrap())
    }

    #[parameterized(
        allow_title_case = { "Allow", true },
        allow_lower_case = { "allow", true },
        allow_upper_case = { "ALLOW", true },
        deny = { "Deny", false },
        arbitrary_value = { "Grant", false },
    )]
    fn effect_is_case_insensitive(effect: &str, allowed: bool) {
        let policies =
            normalize_text(&format!(r#"{{"Statement":[{{"Effect":"{effect}"}}]}}"#));
        assert_eq!(policies[0].allowed, allowed);
    }

    #[test]
    fn absent_effect_denies() {
        let policies = normalize_text(r#"{"Statement":[{"Action":"s3:GetObject"}]}"#);
        assert!(!policies[0].allowed);
    }

    #[test]
    fn repeated_effect_last_write_wins() {
        let policies =
            normalize_text(r#"{"Statement":[{"Effect":"Allow","Effect":"Deny"}]}"#);
        assert!(!policies[0].allowed);
    }

    #[test]
    fn statement_indexing_uses_document_id() {
        let policies = normalize_text(
            r#"{"Id":"X","Statement":[{"Effect":"Allow"},{"Effect":"Deny"}]}"#,
        );
        assert_eq!(policies.len(), 2);
        assert_eq!(policies[0].id, "X:0");
        assert_eq!(policies[1].id, "X:1");
    }

    #[test]
    fn missing_id_and_version_default_to_empty() {
        let policies = normalize_text(r#"{"Statement":[{"Effect":"Allow"}]}"#);
        assert_eq!(policies[0].id, ":0");
        assert_eq!(policies[0].version, "");
    }

    #[parameterized(
        bare_wildcard = { r#""*""#, vec!["<.*>"] },
        wildcard_list = { r#"["*"]"#, vec!["<.*>"] },
        embedded_wildcards = {
            r#"["arn:aws:iam::*:role/aws-reserved/sso.amazonaws.com/*"]"#,
            vec!["arn:aws:iam::<.*>:role/aws-reserved/sso.amazonaws.com/<.*>"]
        },
        plain_strings = { r#"["iam:CreateUser","iam:RemoveUser"]"#, vec!["iam:CreateUser", "iam:RemoveUser"] },
    )]
    fn wildcard_rewrite(resource: &str, expected: Vec<&str>) {
        let policies =
            normalize_text(&format!(r#"{{"Statement":[{{"Resource":{resource}}}]}}"#));
        assert_eq!(policies[0].resources, expected);
    }

    #[test]
    fn principal_wildcard_resolves_to_pattern_marker() {
        let policies = normalize_text(r#"{"Statement":[{"Principal":"*"}]}"#);
        assert_eq!(policies[0].subjects, vec!["<.*>"]);
    }

    #[test]
    fn principal_entries_flatten_in_declaration_order() {
        let policies = normalize_text(
            r#"{"Statement":[{"Principal":{"Service":"ec2.amazonaws.com","AWS":["arn:a","arn:b"],"Federated":"cognito-identity.amazonaws.com"}}]}"#,
        );
        assert_eq!(
            policies[0].subjects,
            vec!["ec2.amazonaws.com", "arn:a", "arn:b", "cognito-identity.amazonaws.com"]
        );
    }

    #[test]
    fn not_principal_populates_not_subjects() {
        let policies = normalize_text(
            r#"{"Statement":[{"NotPrincipal":{"CanonicalUser":"79a59df9"}}]}"#,
        );
        assert_eq!(policies[0].not_subjects, vec!["79a59df9"]);
        assert!(policies[0].subjects.is_empty());
    }

    #[test]
    fn sid_is_parsed_but_not_retained() {
        let policies =
            normalize_text(r#"{"Statement":[{"Sid":"FirstStatement","Effect":"Allow"}]}"#);
        assert_eq!(policies[0].to_json().get("sid"), None);
    }

    #[parameterized(
        string_scalar = {
            r#""${aws:PrincipalAccount}""#,
            ConditionValues::String(vec!["${aws:PrincipalAccount}".into()]),
        },
        int_scalar = { "3600", ConditionValues::Int64(vec![3600]) },
        // A lone boolean classifies as "bool". The Go source this dialect
        // was ported from could never reach that classification for
        // scalars; the tagged-union model here makes it unambiguous.
        bool_scalar = { "true", ConditionValues::Bool(vec![true]) },
        string_list = {
            r#"["a","b"]"#,
            ConditionValues::String(vec!["a".into(), "b".into()]),
        },
        int_list = { "[1,2,3]", ConditionValues::Int64(vec![1, 2, 3]) },
        bool_list = { "[true,false]", ConditionValues::Bool(vec![true, false]) },
    )]
    fn condition_value_classification(values: &str, expected: ConditionValues) {
        let policies = normalize_text(&format!(
            r#"{{"Statement":[{{"Condition":{{"Op":{{"k":{values}}}}}}}]}}"#
        ));
        let conditions = &policies[0].conditions;
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].operation, "Op");
        assert_eq!(conditions[0].key, "k");
        assert_eq!(conditions[0].values, expected);
        assert_eq!(conditions[0].value_type, expected.value_type());
    }

    #[parameterized(
        string_then_int = { r#"["a",1]"# },
        int_then_string = { r#"[1,"a"]"# },
        bool_then_int = { "[true,0]" },
    )]
    fn mixed_type_condition_is_dropped_silently(values: &str) {
        let policies = normalize_text(&format!(
            r#"{{"Statement":[{{"Effect":"Allow","Condition":{{"Op":{{"k":{values}}}}}}}]}}"#
        ));
        // The drop never fails the statement itself.
        assert!(policies[0].allowed);
        assert!(policies[0].conditions.is_empty());
    }

    #[test]
    fn condition_entry_with_empty_operator_or_key_is_skipped() {
        let node = ConditionNode {
            entries: vec![
                ConditionEntry {
                    operation: "".into(),
                    key: "k".into(),
                    values: ValueList::One(Value::Str("v".into())),
                },
                ConditionEntry {
                    operation: "StringEquals".into(),
                    key: "".into(),
                    values: ValueList::One(Value::Str("v".into())),
                },
                ConditionEntry {
                    operation: "StringEquals".into(),
                    key: "k".into(),
                    values: ValueList::One(Value::Str("v".into())),
                },
            ],
        };
        let doc = Document {
            version: None,
            id: None,
            statements: vec![Statement {
                elements: vec![Element::Condition(node)],
            }],
        };
        let policies = normalize(&doc);
        assert_eq!(policies[0].conditions.len(), 1);
        assert_eq!(policies[0].conditions[0].key, "k");
    }

    #[test]
    fn condition_order_follows_document_order() {
        let policies = normalize_text(
            r#"{"Statement":[{"Condition":{"StringEquals":{"aud":"x"},"ForAnyValue:StringLike":{"amr":"authenticated"}}}]}"#,
        );
        let conditions = &policies[0].conditions;
        assert_eq!(conditions.len(), 2);
        assert_eq!(conditions[0].operation, "StringEquals");
        assert_eq!(conditions[1].operation, "ForAnyValue:StringLike");
        assert_eq!(conditions[1].value_type, ConditionValueType::String);
    }
}
