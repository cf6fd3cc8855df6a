//! Checksummed record framing and the bincode payload helpers used for
//! tree cells.

use serde::{Serialize, de::DeserializeOwned};
use telar_common::{Result, error::Error, verify_arg};

use crate::defs::{CHECKSUM_SIZE, RECORD_LEN_SIZE};

/// Validates a framed record by checking its size and checksum.
///
/// A framed record consists of a 4-byte little-endian payload length,
/// the payload itself and a 4-byte checksum suffix. Returns the payload
/// slice on success.
///
/// # Errors
///
/// Returns an error if the record is too short, if the declared length is
/// inconsistent with the record size, or if the checksum does not match.
pub fn validate_record(record: &[u8]) -> Result<&[u8]> {
    verify_arg!(record, record.len() >= RECORD_LEN_SIZE + CHECKSUM_SIZE);
    let size = u32::from_le_bytes(record[0..4].try_into().expect("size bytes")) as usize;
    verify_arg!(size, size + RECORD_LEN_SIZE + CHECKSUM_SIZE <= record.len());
    let record = &record[RECORD_LEN_SIZE..];
    let payload = &record[..size];
    let checksum = u32::from_le_bytes(
        record[size..size + CHECKSUM_SIZE]
            .try_into()
            .expect("checksum bytes"),
    );
    validate_buffer(payload, checksum, Some("record"))?;
    Ok(payload)
}

/// Validates a buffer by comparing its computed checksum with the provided one.
pub fn validate_buffer(buf: &[u8], checksum: u32, name: Option<&str>) -> Result<()> {
    use telar_common::error::ErrorKind;

    let actual = compute(buf);
    if actual == checksum {
        Ok(())
    } else {
        Err(ErrorKind::ChecksumMismatch {
            element: name.unwrap_or_default().to_string(),
        }
        .into())
    }
}

/// Computes a checksum for a given buffer using the xxHash algorithm.
pub fn compute(buf: &[u8]) -> u32 {
    let h = xxhash_rust::xxh3::xxh3_64(buf);
    (h as u32) ^ ((h >> 32) as u32)
}

/// Frames a payload as a record: length prefix, payload, checksum suffix.
pub fn build_record(payload: &[u8]) -> Vec<u8> {
    let mut record = Vec::with_capacity(payload.len() + RECORD_LEN_SIZE + CHECKSUM_SIZE);
    record.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    record.extend_from_slice(payload);
    record.extend_from_slice(&compute(payload).to_le_bytes());
    record
}

/// Serializes a value into a raw bincode payload.
pub fn encode_payload<T: Serialize>(element: &str, value: &T) -> Result<Vec<u8>> {
    bincode::serde::encode_to_vec(value, bincode::config::standard())
        .map_err(|e| Error::invalid_arg(element, e.to_string()))
}

/// Deserializes a value from a raw bincode payload, requiring the payload
/// to be fully consumed.
pub fn decode_payload<T: DeserializeOwned>(element: &str, payload: &[u8]) -> Result<T> {
    let (value, consumed) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())
            .map_err(|e| Error::invalid_arg(element, e.to_string()))?;
    if consumed != payload.len() {
        return Err(Error::invalid_format(element));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::CategoryInfoRecord;

    #[test]
    fn test_record_round_trip() {
        let record = CategoryInfoRecord {
            ids: vec![1, 2],
            names: vec!["hits".to_string(), "tracks".to_string()],
            subset_flags: vec![false, true],
            schema_versions: vec![1, 2],
            reference_counts: vec![0, 1],
            member_counts: vec![0, 0],
        };
        let payload = encode_payload("info", &record).unwrap();
        let framed = build_record(&payload);
        let restored: CategoryInfoRecord =
            decode_payload("info", validate_record(&framed).unwrap()).unwrap();
        assert_eq!(restored, record);
    }

    #[test]
    fn test_corrupted_checksum_detected() {
        let payload = encode_payload("v", &42u64).unwrap();
        let mut framed = build_record(&payload);
        let last = framed.len() - 1;
        framed[last] ^= 0xff;
        assert!(validate_record(&framed).is_err());
    }

    #[test]
    fn test_truncated_record_rejected() {
        let framed = build_record(b"some payload");
        assert!(validate_record(&framed[..framed.len() - 2]).is_err());
    }
}
