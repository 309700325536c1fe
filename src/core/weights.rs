use crate::models::WeightSet;
use serde_json::Value;
use std::collections::BTreeMap;

pub const SKILLS_KEY: &str = "skills";
pub const EXPERIENCE_KEY: &str = "experience";
pub const LOCATION_KEY: &str = "location";
pub const SALARY_KEY: &str = "salary";

/// Build a complete weight set from a raw configuration mapping
///
/// Each key is resolved on its own: a missing entry, a non-numeric value
/// (strings and booleans included) or a number outside [0, 100] is replaced
/// by the default for that key. Nothing here ever fails.
pub fn resolve_weights(raw: &BTreeMap<String, Value>) -> WeightSet {
    let defaults = WeightSet::default();

    WeightSet {
        skills: resolve_key(raw, SKILLS_KEY, defaults.skills),
        experience: resolve_key(raw, EXPERIENCE_KEY, defaults.experience),
        location: resolve_key(raw, LOCATION_KEY, defaults.location),
        salary: resolve_key(raw, SALARY_KEY, defaults.salary),
    }
}

fn resolve_key(raw: &BTreeMap<String, Value>, key: &str, default: f64) -> f64 {
    let Some(value) = raw.get(key) else {
        return default;
    };

    match value.as_f64() {
        Some(weight) if weight.is_finite() && (0.0..=100.0).contains(&weight) => weight,
        _ => {
            tracing::debug!("Invalid weight for '{}' ({}), using default {}", key, value, default);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping(value: Value) -> BTreeMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_mapping_uses_defaults() {
        let weights = resolve_weights(&BTreeMap::new());
        assert_eq!(weights, WeightSet::default());
    }

    #[test]
    fn test_valid_values_pass_through() {
        let weights = resolve_weights(&mapping(json!({
            "skills": 50,
            "experience": 20.5,
            "location": 0,
            "salary": 100
        })));

        assert_eq!(weights.skills, 50.0);
        assert_eq!(weights.experience, 20.5);
        assert_eq!(weights.location, 0.0);
        assert_eq!(weights.salary, 100.0);
    }

    #[test]
    fn test_each_key_falls_back_independently() {
        let weights = resolve_weights(&mapping(json!({
            "skills": -1,
            "experience": "30",
            "location": 101,
            "salary": 10
        })));

        assert_eq!(weights.skills, 40.0);
        assert_eq!(weights.experience, 25.0);
        assert_eq!(weights.location, 20.0);
        assert_eq!(weights.salary, 10.0);
    }

    #[test]
    fn test_non_numeric_values_fall_back() {
        let weights = resolve_weights(&mapping(json!({
            "skills": true,
            "experience": null,
            "location": [20],
            "salary": {"value": 15}
        })));

        assert_eq!(weights, WeightSet::default());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let weights = resolve_weights(&mapping(json!({ "culture": 10, "skills": 35 })));
        assert_eq!(weights.skills, 35.0);
        assert_eq!(weights.salary, 15.0);
    }
}
