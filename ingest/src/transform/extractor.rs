//! Map nested records to the storage shape.
//!
//! ```text
//! {                                           {
//!   "name": { "firstName", "lastName" },  →     "name": "John Doe",
//!   "age": 25,                                  "age": 25,
//!   "address": { ... },                         "address": { ... } | null,
//!   "gender": "male", "phone": ...              "additional_info": { "gender", "phone" } | null
//! }                                           }
//! ```

use crate::error::{RowError, RowResult};
use crate::models::{Leaf, NestedRecord, Node, StorageRecord};

const NAME_KEY: &str = "name";
const FIRST_NAME_PATH: &str = "name.firstName";
const LAST_NAME_PATH: &str = "name.lastName";
const AGE_KEY: &str = "age";
const ADDRESS_KEY: &str = "address";

/// Build the storage record for one nested record.
///
/// # Errors
/// [`RowError::MissingStorageFields`] naming each of `name.firstName`,
/// `name.lastName` and `age` that is absent, empty, or (for `age`) not a
/// number.
pub fn extract(record: &NestedRecord) -> RowResult<StorageRecord> {
    let first = truthy_leaf(record, FIRST_NAME_PATH);
    let last = truthy_leaf(record, LAST_NAME_PATH);
    let age = record.leaf_at(AGE_KEY).and_then(Leaf::as_number);

    let (first, last, age) = match (first, last, age) {
        (Some(f), Some(l), Some(a)) => (f, l, a),
        (f, l, a) => {
            let mut fields = Vec::new();
            if f.is_none() {
                fields.push(FIRST_NAME_PATH.to_string());
            }
            if l.is_none() {
                fields.push(LAST_NAME_PATH.to_string());
            }
            if a.is_none() {
                fields.push(AGE_KEY.to_string());
            }
            return Err(RowError::MissingStorageFields { fields });
        }
    };

    let address = record.get(ADDRESS_KEY).filter(|node| !is_falsy(node)).cloned();

    let mut additional = NestedRecord::new();
    for (key, node) in record.iter() {
        if key != NAME_KEY && key != AGE_KEY && key != ADDRESS_KEY {
            additional.insert(key, node.clone());
        }
    }

    Ok(StorageRecord {
        name: format!("{} {}", first, last),
        age: age.clone(),
        address,
        additional_info: (!additional.is_empty()).then_some(additional),
    })
}

fn truthy_leaf<'a>(record: &'a NestedRecord, path: &str) -> Option<&'a Leaf> {
    record.leaf_at(path).filter(|leaf| leaf.is_truthy())
}

/// Empty text and zero leaves; a sub-record always counts.
fn is_falsy(node: &Node) -> bool {
    matches!(node, Node::Leaf(leaf) if !leaf.is_truthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FlatRecord;
    use crate::transform::normalizer::normalize;
    use serde_json::json;

    fn nested(pairs: &[(&str, &str)]) -> NestedRecord {
        normalize(&pairs.iter().copied().collect::<FlatRecord>())
    }

    #[test]
    fn test_minimal_record() {
        let record = nested(&[("name.firstName", "John"), ("name.lastName", "Doe"), ("age", "25")]);
        let out = extract(&record).unwrap();

        assert_eq!(
            out.to_json(),
            json!({ "name": "John Doe", "age": 25, "address": null, "additional_info": null })
        );
    }

    #[test]
    fn test_address_and_additional_info() {
        let record = nested(&[
            ("name.firstName", "Rohit"),
            ("name.lastName", "Prasad"),
            ("age", "35"),
            ("address.line1", "A-563 Rakshak Society"),
            ("address.city", "Pune"),
            ("gender", "male"),
            ("contact.phone", "555-0100"),
        ]);
        let out = extract(&record).unwrap();

        assert_eq!(out.name, "Rohit Prasad");
        assert_eq!(
            out.address.as_ref().map(Node::to_json),
            Some(json!({ "line1": "A-563 Rakshak Society", "city": "Pune" }))
        );
        let info = out.additional_info.unwrap();
        let keys: Vec<&str> = info.keys().collect();
        assert_eq!(keys, vec!["gender", "contact"]);
        assert_eq!(info.to_json(), json!({ "gender": "male", "contact": { "phone": "555-0100" } }));
    }

    #[test]
    fn test_extra_name_parts_stay_under_name() {
        // Only firstName/lastName are used; the rest of `name` is dropped.
        let record = nested(&[
            ("name.firstName", "Ann"),
            ("name.lastName", "Lee"),
            ("name.middle", "Q"),
            ("age", "40"),
        ]);
        let out = extract(&record).unwrap();
        assert_eq!(out.name, "Ann Lee");
        assert!(out.additional_info.is_none());
    }

    #[test]
    fn test_numeric_name_parts_render() {
        let record = nested(&[("name.firstName", "R2"), ("name.lastName", "2"), ("age", "3")]);
        assert_eq!(extract(&record).unwrap().name, "R2 2");
    }

    #[test]
    fn test_missing_fields_listed() {
        let record = nested(&[("name.firstName", "John"), ("age", "n/a")]);
        let err = extract(&record).unwrap_err();
        assert_eq!(
            err,
            RowError::MissingStorageFields {
                fields: vec!["name.lastName".into(), "age".into()]
            }
        );
    }

    #[test]
    fn test_name_must_be_object() {
        let record = nested(&[("name", "John Doe"), ("age", "30")]);
        let err = extract(&record).unwrap_err();
        assert_eq!(
            err,
            RowError::MissingStorageFields {
                fields: vec!["name.firstName".into(), "name.lastName".into()]
            }
        );
    }

    #[test]
    fn test_blank_address_is_null() {
        let record = nested(&[
            ("name.firstName", "John"),
            ("name.lastName", "Doe"),
            ("age", "25"),
            ("address", ""),
        ]);
        assert!(extract(&record).unwrap().address.is_none());
    }

    #[test]
    fn test_zero_address_is_null() {
        let record = nested(&[
            ("name.firstName", "John"),
            ("name.lastName", "Doe"),
            ("age", "25"),
            ("address", "0"),
        ]);
        assert!(extract(&record).unwrap().address.is_none());
    }

    #[test]
    fn test_scalar_address_is_kept() {
        let record = nested(&[
            ("name.firstName", "John"),
            ("name.lastName", "Doe"),
            ("age", "25"),
            ("address", "General Delivery"),
        ]);
        let out = extract(&record).unwrap();
        assert_eq!(out.address, Some(Node::Leaf(Leaf::from("General Delivery"))));
    }
}
