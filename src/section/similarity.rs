use std::collections::HashSet;

/// Token-set overlap on a 0..=100 scale: lower-cased, whitespace-split,
/// duplicates collapsed. Two empty inputs are identical (100); one empty
/// input shares nothing (0).
pub fn token_set_similarity(a: &str, b: &str) -> u32 {
    let ta = token_set(a);
    let tb = token_set(b);
    if ta.is_empty() && tb.is_empty() {
        return 100;
    }
    if ta.is_empty() || tb.is_empty() {
        return 0;
    }
    let inter = ta.intersection(&tb).count();
    let union = ta.union(&tb).count();
    ((inter as f64 / union as f64) * 100.0).round() as u32
}

fn token_set(s: &str) -> HashSet<String> {
    s.split_whitespace()
        .map(|t| t.to_lowercase())
        .collect()
}
