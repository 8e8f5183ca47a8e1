//! JSON backup codec for the feeding history.
//!
//! The wire format is a flat JSON array of `{id, breast, additions,
//! timestamp}` entries with `timestamp` in epoch milliseconds. Encoding
//! interprets the stored wall-clock values at a fixed UTC+2 offset; decoding
//! interprets the instant in the machine's local timezone. Existing backup
//! files depend on exactly this pairing, so neither side can change
//! independently; the two only agree when the local offset is UTC+2.

use chrono::{FixedOffset, Local, NaiveDateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared::Feeding;

/// Offset applied when turning stored wall-clock values into instants.
const ENCODE_OFFSET_SECONDS: i32 = 2 * 3600;

/// Flattened wire form of a feeding.
///
/// Unknown fields reject the whole document; a backup is imported fully or
/// not at all.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct BackupFeeding {
    id: i64,
    breast: i32,
    additions: i32,
    /// Epoch milliseconds
    timestamp: i64,
}

#[derive(Debug, Error)]
pub enum BackupCodecError {
    #[error("backup content is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("backup timestamp {0} is outside the representable range")]
    TimestampOutOfRange(i64),
}

/// Encode feedings into backup JSON; an empty history becomes `[]`.
pub fn encode(feedings: &[Feeding]) -> Result<String, BackupCodecError> {
    let entries: Vec<BackupFeeding> = feedings.iter().map(to_entry).collect();
    Ok(serde_json::to_string(&entries)?)
}

/// Decode backup JSON into feedings.
pub fn decode(content: &str) -> Result<Vec<Feeding>, BackupCodecError> {
    let entries: Vec<BackupFeeding> = serde_json::from_str(content)?;
    entries.into_iter().map(from_entry).collect()
}

fn encode_offset() -> FixedOffset {
    // Two hours east is always within the valid offset range
    FixedOffset::east_opt(ENCODE_OFFSET_SECONDS).unwrap()
}

fn to_entry(feeding: &Feeding) -> BackupFeeding {
    let datetime = NaiveDateTime::new(feeding.date, feeding.timestamp);
    // A fixed offset maps every wall-clock value to exactly one instant
    let instant = encode_offset().from_local_datetime(&datetime).unwrap();

    BackupFeeding {
        id: feeding.id,
        breast: feeding.breast,
        additions: feeding.additions,
        timestamp: instant.timestamp() * 1000,
    }
}

fn from_entry(entry: BackupFeeding) -> Result<Feeding, BackupCodecError> {
    let instant = Utc
        .timestamp_millis_opt(entry.timestamp)
        .single()
        .ok_or(BackupCodecError::TimestampOutOfRange(entry.timestamp))?;
    let local = instant.with_timezone(&Local);

    // Sub-second precision is dropped
    let timestamp = local.time().with_nanosecond(0).unwrap_or_else(|| local.time());

    Ok(Feeding {
        id: entry.id,
        date: local.date_naive(),
        timestamp,
        breast: entry.breast,
        additions: entry.additions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveTime, Offset};
    use shared::{additions, breast};

    fn feeding(id: i64, date: &str, time: &str) -> Feeding {
        Feeding {
            id,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            timestamp: NaiveTime::parse_from_str(time, "%H:%M:%S").unwrap(),
            breast: breast::LEFT,
            additions: additions::ESPUMISAN,
        }
    }

    #[test]
    fn test_encode_uses_fixed_offset_epoch_millis() {
        let encoded = encode(&[feeding(7, "2024-03-15", "21:05:00")]).unwrap();
        let entries: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        let entry = &entries.as_array().unwrap()[0];

        // 21:05 at UTC+2 is 19:05 UTC
        let expected = Utc
            .with_ymd_and_hms(2024, 3, 15, 19, 5, 0)
            .unwrap()
            .timestamp_millis();
        assert_eq!(entry["timestamp"].as_i64().unwrap(), expected);
        assert_eq!(entry["id"].as_i64().unwrap(), 7);
        assert_eq!(entry["breast"].as_i64().unwrap(), breast::LEFT as i64);
        assert_eq!(entry["additions"].as_i64().unwrap(), additions::ESPUMISAN as i64);
    }

    #[test]
    fn test_empty_history_encodes_to_empty_array() {
        assert_eq!(encode(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_decode_empty_array() {
        assert!(decode("[]").unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_malformed_json() {
        let result = decode("{\"not\": \"a backup\"");
        assert!(matches!(result, Err(BackupCodecError::Json(_))));
    }

    #[test]
    fn test_decode_rejects_unknown_and_missing_fields() {
        let unknown =
            decode("[{\"id\":1,\"breast\":0,\"additions\":0,\"timestamp\":0,\"extra\":true}]");
        assert!(matches!(unknown, Err(BackupCodecError::Json(_))));

        let missing = decode("[{\"id\":1,\"breast\":0,\"additions\":0}]");
        assert!(matches!(missing, Err(BackupCodecError::Json(_))));
    }

    #[test]
    fn test_round_trip_shift_matches_local_offset() {
        let original = feeding(3, "2024-06-10", "08:30:00");
        let encoded = encode(std::slice::from_ref(&original)).unwrap();
        let decoded = decode(&encoded).unwrap().remove(0);

        assert_eq!(decoded.id, original.id);
        assert_eq!(decoded.breast, original.breast);
        assert_eq!(decoded.additions, original.additions);

        // Decoding applies the local offset to an instant that was encoded
        // at UTC+2, so the wall-clock values shift by exactly the offset
        // difference; on a UTC+2 machine the round trip is lossless.
        let original_dt = NaiveDateTime::new(original.date, original.timestamp);
        let decoded_dt = NaiveDateTime::new(decoded.date, decoded.timestamp);
        let instant = encode_offset().from_local_datetime(&original_dt).unwrap();
        let local_offset_seconds = Local
            .timestamp_millis_opt(instant.timestamp_millis())
            .unwrap()
            .offset()
            .fix()
            .local_minus_utc() as i64;

        let expected_shift =
            Duration::seconds(local_offset_seconds - ENCODE_OFFSET_SECONDS as i64);
        assert_eq!(decoded_dt - original_dt, expected_shift);
    }

    #[test]
    fn test_decode_drops_subsecond_precision() {
        let base_millis = 1_718_011_800_000i64;
        let payload = |millis: i64| {
            format!(
                "[{{\"id\":1,\"breast\":0,\"additions\":0,\"timestamp\":{}}}]",
                millis
            )
        };

        let exact = decode(&payload(base_millis)).unwrap().remove(0);
        let with_millis = decode(&payload(base_millis + 999)).unwrap().remove(0);

        assert_eq!(exact.timestamp, with_millis.timestamp);
        assert_eq!(exact.date, with_millis.date);
    }

    #[test]
    fn test_decode_rejects_out_of_range_timestamp() {
        let result = decode("[{\"id\":1,\"breast\":0,\"additions\":0,\"timestamp\":9223372036854775807}]");
        assert!(matches!(
            result,
            Err(BackupCodecError::TimestampOutOfRange(_))
        ));
    }
}
