// ledger/src/adapters/selector.rs
//! Evaluation of CouchDB-style selector queries against JSON documents.

use std::cmp::Ordering;

use serde_json::{Map, Value};

use crate::LedgerError;

/// A parsed `{"selector": {...}}` query.
#[derive(Debug, Clone)]
pub(crate) struct Selector {
    clauses: Vec<Clause>,
}

#[derive(Debug, Clone)]
struct Clause {
    path: Vec<String>,
    op: Op,
    operand: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Op {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "$eq" => Some(Op::Eq),
            "$ne" => Some(Op::Ne),
            "$gt" => Some(Op::Gt),
            "$gte" => Some(Op::Gte),
            "$lt" => Some(Op::Lt),
            "$lte" => Some(Op::Lte),
            _ => None,
        }
    }
}

impl Selector {
    pub(crate) fn parse(query: &str) -> Result<Self, LedgerError> {
        let root: Value = serde_json::from_str(query)
            .map_err(|e| LedgerError::Query(format!("malformed query: {}", e)))?;

        let selector = root
            .as_object()
            .and_then(|obj| obj.get("selector"))
            .and_then(Value::as_object)
            .ok_or_else(|| LedgerError::Query("query has no selector object".to_string()))?;

        let mut clauses = Vec::new();
        for (field, condition) in selector {
            let path: Vec<String> = field.split('.').map(str::to_string).collect();
            match condition {
                Value::Object(ops) if is_operator_map(ops) => {
                    for (name, operand) in ops {
                        let op = Op::parse(name).ok_or_else(|| {
                            LedgerError::Query(format!("unsupported operator: {}", name))
                        })?;
                        clauses.push(Clause {
                            path: path.clone(),
                            op,
                            operand: operand.clone(),
                        });
                    }
                }
                other => clauses.push(Clause {
                    path,
                    op: Op::Eq,
                    operand: other.clone(),
                }),
            }
        }

        Ok(Self { clauses })
    }

    /// Documents that are not JSON objects never match.
    pub(crate) fn matches(&self, document: &[u8]) -> bool {
        let Ok(Value::Object(doc)) = serde_json::from_slice::<Value>(document) else {
            return false;
        };

        self.clauses.iter().all(|clause| {
            let Some(actual) = lookup(&doc, &clause.path) else {
                return false;
            };
            match clause.op {
                Op::Eq => actual == &clause.operand,
                Op::Ne => actual != &clause.operand,
                Op::Gt => compare(actual, &clause.operand) == Some(Ordering::Greater),
                Op::Gte => matches!(
                    compare(actual, &clause.operand),
                    Some(Ordering::Greater | Ordering::Equal)
                ),
                Op::Lt => compare(actual, &clause.operand) == Some(Ordering::Less),
                Op::Lte => matches!(
                    compare(actual, &clause.operand),
                    Some(Ordering::Less | Ordering::Equal)
                ),
            }
        })
    }
}

fn is_operator_map(ops: &Map<String, Value>) -> bool {
    !ops.is_empty() && ops.keys().all(|k| k.starts_with('$'))
}

fn lookup<'a>(doc: &'a Map<String, Value>, path: &[String]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    let mut current = doc.get(first)?;
    for segment in rest {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn compare(actual: &Value, operand: &Value) -> Option<Ordering> {
    match (actual, operand) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_and_ranges() {
        let doc = br#"{"color":"blue","size":5,"owner":"alice@Org1"}"#;

        let sel = Selector::parse(r#"{"selector":{"color":"blue","size":5}}"#).unwrap();
        assert!(sel.matches(doc));

        let sel = Selector::parse(r#"{"selector":{"size":{"$gt":3,"$lte":5}}}"#).unwrap();
        assert!(sel.matches(doc));

        let sel = Selector::parse(r#"{"selector":{"size":{"$lt":5}}}"#).unwrap();
        assert!(!sel.matches(doc));

        let sel = Selector::parse(r#"{"selector":{"color":{"$ne":"red"}}}"#).unwrap();
        assert!(sel.matches(doc));
    }

    #[test]
    fn test_missing_field_and_non_json() {
        let sel = Selector::parse(r#"{"selector":{"type":"asset.v1"}}"#).unwrap();
        assert!(!sel.matches(br#"{"color":"blue"}"#));
        assert!(!sel.matches(b"not json"));
    }

    #[test]
    fn test_empty_selector_matches_every_object() {
        let sel = Selector::parse(r#"{"selector":{}}"#).unwrap();
        assert!(sel.matches(br#"{"anything":1}"#));
        assert!(!sel.matches(b"[1,2,3]"));
    }

    #[test]
    fn test_malformed_queries() {
        assert!(matches!(
            Selector::parse("not json"),
            Err(LedgerError::Query(_))
        ));
        assert!(matches!(
            Selector::parse(r#"{"fields":["id"]}"#),
            Err(LedgerError::Query(_))
        ));
        assert!(matches!(
            Selector::parse(r#"{"selector":{"size":{"$regex":"^1"}}}"#),
            Err(LedgerError::Query(_))
        ));
    }
}
