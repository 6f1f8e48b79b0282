//! Predefined map scale handling.

/// Built-in scale list used when neither the request nor the project
/// provides one, from 1:1000000 down to 1:500.
const DEFAULT_SCALES: &str = "1:1000000,1:500000,1:250000,1:100000,1:50000,1:25000,\
                              1:10000,1:5000,1:2500,1:1000,1:500";

/// The engine's default scale denominators.
pub fn default_scales() -> Vec<f64> {
    parse_scale_list(DEFAULT_SCALES)
}

/// Parse a comma separated `1:denominator` list, skipping malformed entries.
pub fn parse_scale_list(text: &str) -> Vec<f64> {
    text.split(',')
        .filter_map(|entry| {
            let parts: Vec<&str> = entry.split(':').collect();
            if parts.len() != 2 {
                return None;
            }
            parts[1].trim().parse::<f64>().ok()
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
