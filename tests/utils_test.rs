use tunebridge::utils::*;

#[test]
fn test_generate_state() {
    let state = generate_state();

    // Should be exactly 32 characters
    assert_eq!(state.len(), 32);

    // Should contain only alphanumeric characters
    assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated states should be different
    let state2 = generate_state();
    assert_ne!(state, state2);
}

#[test]
fn test_generate_session_id() {
    let session = generate_session_id();

    assert_eq!(session.len(), 24);
    assert!(session.chars().all(|c| c.is_ascii_alphanumeric()));

    let session2 = generate_session_id();
    assert_ne!(session, session2);
}

#[test]
fn test_estimate_quota() {
    // 50 units base cost for playlist creation
    assert_eq!(estimate_quota(0), 50);

    // 150 units per item search on top
    assert_eq!(estimate_quota(1), 200);
    assert_eq!(estimate_quota(25), 25 * 150 + 50);
}
