use rand::{Rng, distr::Alphanumeric};

pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

pub fn generate_session_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(24)
        .map(char::from)
        .collect()
}

/// Rough provider quota estimate for a conversion run: 150 units per item
/// search plus 50 for playlist creation. Logged for observability only,
/// never enforced.
pub fn estimate_quota(item_count: usize) -> u64 {
    (item_count as u64) * 150 + 50
}
