//! Response payload generation policies
//!
//! The original fixture existed as two near-duplicate scripts, one with a
//! canned payload and one with randomized values. Both survive here as
//! variants of a single configurable policy.

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// How the `Data` object of a method response is filled in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResponsePolicy {
    /// Fixed values: `value1 = 123`, `value2 = "FooBar"`
    #[default]
    Static,
    /// `value1` uniform in `[0, 100)`, `value2` uniform in `[0.0, 1.0)`
    Random,
}

impl ResponsePolicy {
    /// Produce the `Data` object for one response.
    pub fn generate_data(&self) -> Value {
        match self {
            ResponsePolicy::Static => json!({
                "value1": 123,
                "value2": "FooBar",
            }),
            ResponsePolicy::Random => {
                let mut rng = rand::thread_rng();
                json!({
                    "value1": rng.gen_range(0..100),
                    "value2": rng.gen::<f64>(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_data() {
        let data = ResponsePolicy::Static.generate_data();
        assert_eq!(data["value1"], 123);
        assert_eq!(data["value2"], "FooBar");
    }

    #[test]
    fn test_random_data_ranges() {
        for _ in 0..1000 {
            let data = ResponsePolicy::Random.generate_data();
            let v1 = data["value1"].as_i64().unwrap();
            assert!((0..100).contains(&v1));
            let v2 = data["value2"].as_f64().unwrap();
            assert!((0.0..1.0).contains(&v2));
        }
    }

    #[test]
    fn test_random_data_varies() {
        // 1000 uniform draws from [0.0, 1.0) collide with negligible probability
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            let data = ResponsePolicy::Random.generate_data();
            seen.insert(data["value2"].to_string());
        }
        assert!(seen.len() > 900);
    }
}
