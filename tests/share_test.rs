//! Tests for share-token encoding and viewing sessions.

use cairn::{BuildRecord, Orientation, Stone, decode, encode};
use chrono::{Duration, Utc};

fn sample_record() -> BuildRecord {
    let shape = vec![
        Stone::new(0, 0, Orientation::Horizontal),
        Stone::new(0, 1, Orientation::Vertical),
        Stone::new(3, 0, Orientation::Horizontal),
        Stone::new(6, 0, Orientation::Vertical),
    ];
    let now = Utc::now();
    BuildRecord::new(5, 247, shape.len(), shape, now, 6, now + Duration::days(7))
}

#[test]
fn test_round_trip_preserves_result() {
    let record = sample_record();
    let token = encode(&record);
    let shared = decode(&token).unwrap();

    assert_eq!(shared.attempt(), record.attempt());
    assert_eq!(shared.time_secs(), record.time_secs());
    assert_eq!(shared.stone_count(), record.stone_count());
    assert_eq!(shared.shape(), record.shape());
}

#[test]
fn test_token_is_url_safe() {
    let token = encode(&sample_record());
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_decode_rejects_garbage() {
    assert!(decode("not a token").is_err());
    // Valid hex, but not a payload.
    assert!(decode("deadbeef").is_err());
    assert!(decode("").is_err());
}

#[test]
fn test_decode_rejects_hostile_column_values() {
    // Well-formed JSON, hostile shape: sizing a viewing session from this
    // column would blow up, so decode must refuse it.
    let payload = format!(
        r#"{{"attempt":1,"time_secs":10,"stone_count":1,"shape":[{{"column":{},"row":0,"orientation":"horizontal"}}]}}"#,
        usize::MAX
    );
    assert!(decode(&hex::encode(payload)).is_err());

    // Just past the viewing bound, not only the absurd extreme.
    let payload = r#"{"attempt":1,"time_secs":10,"stone_count":1,"shape":[{"column":64,"row":0,"orientation":"horizontal"}]}"#;
    assert!(decode(&hex::encode(payload)).is_err());

    // The top of the allowed range still decodes and views cleanly.
    let payload = r#"{"attempt":1,"time_secs":10,"stone_count":1,"shape":[{"column":63,"row":0,"orientation":"horizontal"}]}"#;
    let shared = decode(&hex::encode(payload)).unwrap();
    let session = shared.into_session();
    assert!(session.is_complete());
    assert_eq!(session.stones().len(), 1);
}

#[test]
fn test_decode_tolerates_surrounding_whitespace() {
    let token = encode(&sample_record());
    let padded = format!("  {}\n", token);
    assert!(decode(&padded).is_ok());
}

#[test]
fn test_shared_result_becomes_viewing_session() {
    let record = sample_record();
    let shared = decode(&encode(&record)).unwrap();
    let attempt = *shared.attempt();

    let session = shared.into_session();
    assert!(session.is_complete());
    assert_eq!(session.attempt(), attempt);
    assert_eq!(session.stones(), record.shape().as_slice());
}
