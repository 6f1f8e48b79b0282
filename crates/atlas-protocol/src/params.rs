//! Query parameter handling.

use std::collections::BTreeMap;

/// Parameter keys consumed by the protocol itself. Everything else is
/// offered to the layout as a text item substitution.
const RESERVED_KEYS: &[&str] = &[
    "SERVICE",
    "REQUEST",
    "VERSION",
    "MAP",
    "TEMPLATE",
    "EXP_FILTER",
    "SCALE",
    "SCALES",
    "FORMAT",
];

/// Case-insensitive view over request query parameters.
///
/// The wire protocol treats parameter names case-insensitively, so lookups
/// go through upper-cased keys. When a key repeats, the last occurrence
/// wins.
#[derive(Debug, Clone, Default)]
pub struct RequestParams {
    values: BTreeMap<String, String>,
    extras: BTreeMap<String, String>,
}

impl RequestParams {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = RequestParams::default();
        for (key, value) in pairs {
            let upper = key.as_ref().to_uppercase();
            let value = value.into();
            if !RESERVED_KEYS.contains(&upper.as_str()) {
                params
                    .extras
                    .insert(key.as_ref().to_lowercase(), value.clone());
            }
            params.values.insert(upper, value);
        }
        params
    }

    /// Raw value of a parameter, by case-insensitive name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(&name.to_uppercase()).map(String::as_str)
    }

    /// Value that is present and not the empty string.
    ///
    /// The protocol treats `TEMPLATE=` the same as an absent TEMPLATE.
    pub fn get_nonempty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    /// Non-reserved parameters with lower-cased keys, for matching against
    /// layout text item ids.
    pub fn extras(&self) -> impl Iterator<Item = (&str, &str)> {
        self.extras.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// ============================================================================
// Tests
// ============================================================================
