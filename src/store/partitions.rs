/// Key layout for the Fjall partitions
///
/// Partition structure:
/// - `publishers`: {id:u64 big-endian} -> Publisher (JSON)
/// - `metadata`: meta:{key} -> value
///
/// Big-endian ids keep the `publishers` partition ordered by id.

pub const NEXT_ID_KEY: &str = "next_id";

/// Encode a publisher key
pub fn encode_publisher_key(id: u64) -> [u8; 8] {
    id.to_be_bytes()
}

/// Decode a publisher key back into its id
pub fn decode_publisher_key(key: &[u8]) -> Option<u64> {
    let bytes: [u8; 8] = key.try_into().ok()?;
    Some(u64::from_be_bytes(bytes))
}

/// Encode a metadata key: meta:{key}
pub fn encode_meta_key(key: &str) -> Vec<u8> {
    format!("meta:{}", key).into_bytes()
}
