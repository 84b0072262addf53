// src/integrations/document_store/query.rs
//
// List filters understood by the document store.
// Serialized to the store's JSON query syntax, one string per query:
//   {"method":"equal","attribute":"user_id","values":["u1"]}

use serde_json::{json, Value};

/// System attribute holding the creation timestamp
pub const CREATED_AT: &str = "$createdAt";

#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Attribute equals the value
    Equal(String, Value),
    OrderAsc(String),
    OrderDesc(String),
    Limit(usize),
    Offset(usize),
}

impl Query {
    pub fn equal(attribute: &str, value: impl Into<Value>) -> Self {
        Query::Equal(attribute.to_string(), value.into())
    }

    pub fn order_asc(attribute: &str) -> Self {
        Query::OrderAsc(attribute.to_string())
    }

    pub fn order_desc(attribute: &str) -> Self {
        Query::OrderDesc(attribute.to_string())
    }

    pub fn limit(n: usize) -> Self {
        Query::Limit(n)
    }

    pub fn offset(n: usize) -> Self {
        Query::Offset(n)
    }

    /// Wire form used in the `queries[]` URL parameter
    pub fn to_wire(&self) -> String {
        let value = match self {
            Query::Equal(attribute, value) => json!({
                "method": "equal",
                "attribute": attribute,
                "values": [value],
            }),
            Query::OrderAsc(attribute) => json!({
                "method": "orderAsc",
                "attribute": attribute,
            }),
            Query::OrderDesc(attribute) => json!({
                "method": "orderDesc",
                "attribute": attribute,
            }),
            Query::Limit(n) => json!({ "method": "limit", "values": [n] }),
            Query::Offset(n) => json!({ "method": "offset", "values": [n] }),
        };
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_wire_form() {
        let wire: Value = serde_json::from_str(&Query::equal("searchTerm", "alien").to_wire()).unwrap();
        assert_eq!(wire["method"], "equal");
        assert_eq!(wire["attribute"], "searchTerm");
        assert_eq!(wire["values"], json!(["alien"]));
    }

    #[test]
    fn test_numeric_equal_keeps_type() {
        let wire: Value = serde_json::from_str(&Query::equal("movie_id", 603).to_wire()).unwrap();
        assert_eq!(wire["values"], json!([603]));
    }

    #[test]
    fn test_order_and_limit_wire_form() {
        let order: Value = serde_json::from_str(&Query::order_desc(CREATED_AT).to_wire()).unwrap();
        assert_eq!(order["method"], "orderDesc");
        assert_eq!(order["attribute"], "$createdAt");

        let limit: Value = serde_json::from_str(&Query::limit(5).to_wire()).unwrap();
        assert_eq!(limit, json!({"method": "limit", "values": [5]}));
    }
}
