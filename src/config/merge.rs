//! Field-by-field merging of configuration tiers.
//!
//! Objects merge recursively; anything else in a higher tier replaces the
//! lower tier's value. `null` means "not specified" and keeps the base.

use serde_json::Value;

/// Write `overlay` into `base` in place. Keys the overlay leaves `null` are
/// not created.
pub fn merge_into(base: &mut Value, overlay: Value) {
    match overlay {
        Value::Null => {}
        Value::Object(overlay_map) => match base.as_object_mut() {
            Some(base_map) => {
                for (key, value) in overlay_map {
                    match base_map.get_mut(&key) {
                        Some(slot) => merge_into(slot, value),
                        None if value.is_null() => {}
                        None => {
                            base_map.insert(key, value);
                        }
                    }
                }
            }
            None => *base = Value::Object(overlay_map),
        },
        other => *base = other,
    }
}

/// Collapse tiers, lowest priority first, into one document.
pub fn merge_tiers(tiers: impl IntoIterator<Item = Value>) -> Value {
    let mut merged = Value::Null;
    for tier in tiers {
        merge_into(&mut merged, tier);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_section_override() {
        let base = json!({
            "pricing": {"endpoint": "http://localhost:8000/calculate", "timeout_seconds": 30},
            "server": {"port": 31995}
        });
        let mut merged = base;
        merge_into(&mut merged, json!({"pricing": {"timeout_seconds": 10}}));
        assert_eq!(
            merged,
            json!({
                "pricing": {"endpoint": "http://localhost:8000/calculate", "timeout_seconds": 10},
                "server": {"port": 31995}
            })
        );
    }

    #[test]
    fn test_null_keeps_base() {
        let mut merged = json!({"server": {"host": "0.0.0.0"}});
        merge_into(&mut merged, json!({"server": {"host": null}}));
        assert_eq!(merged, json!({"server": {"host": "0.0.0.0"}}));
    }

    #[test]
    fn test_later_tiers_win() {
        let tiers = vec![
            json!({"server": {"port": 1}}),
            json!({"server": {"port": 2, "host": "a"}}),
            json!({"server": {"port": 3}}),
        ];
        assert_eq!(merge_tiers(tiers), json!({"server": {"port": 3, "host": "a"}}));
    }

    #[test]
    fn test_scalar_replaced_by_object() {
        let mut merged = json!({"pricing": "off"});
        merge_into(&mut merged, json!({"pricing": {"timeout_seconds": 1}}));
        assert_eq!(merged, json!({"pricing": {"timeout_seconds": 1}}));
    }

    #[test]
    fn test_null_only_key_is_not_created() {
        let mut merged = json!({"server": {"port": 31995}});
        merge_into(&mut merged, json!({"server": {"host": null}, "pricing": null}));
        assert_eq!(merged, json!({"server": {"port": 31995}}));
    }

    #[test]
    fn test_no_tiers_is_null() {
        assert_eq!(merge_tiers(Vec::new()), Value::Null);
    }
}
