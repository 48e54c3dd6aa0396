use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A small flat set of named string facts.
pub type ValueRecord = BTreeMap<String, String>;

/// One persisted line of the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactRecord {
    pub identifier: String,
    pub attribute: String,
    pub value: ValueRecord,
}

/// Borrowed form of [`FactRecord`] used when writing.
#[derive(Serialize)]
pub(crate) struct FactLine<'a> {
    pub identifier: &'a str,
    pub attribute: &'a str,
    pub value: &'a ValueRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_and_record_share_a_format() {
        let value: ValueRecord = [("v".to_string(), "red".to_string())].into();
        let line = FactLine {
            identifier: "x",
            attribute: "color",
            value: &value,
        };
        let json = serde_json::to_string(&line).unwrap();
        assert_eq!(
            json,
            r#"{"identifier":"x","attribute":"color","value":{"v":"red"}}"#
        );

        let record: FactRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record.identifier, "x");
        assert_eq!(record.attribute, "color");
        assert_eq!(record.value, value);
    }

    #[test]
    fn non_string_values_rejected() {
        let json = r#"{"identifier":"x","attribute":"size","value":{"bytes":12}}"#;
        assert!(serde_json::from_str::<FactRecord>(json).is_err());
    }
}
