//! Little-endian integer decoding of generator output.
//!
//! Inputs shorter than the target width are zero-padded on the right; longer
//! inputs only contribute their leading bytes.

fn pad<const N: usize>(data: &[u8]) -> [u8; N] {
    let mut buf = [0u8; N];
    let len = data.len().min(N);
    buf[..len].copy_from_slice(&data[..len]);
    buf
}

/// Decode an unsigned 64-bit integer.
pub fn decode_u64(data: &[u8]) -> u64 {
    u64::from_le_bytes(pad::<8>(data))
}

/// Decode a signed 64-bit integer (two's complement of the same bytes).
pub fn decode_i64(data: &[u8]) -> i64 {
    i64::from_le_bytes(pad::<8>(data))
}

pub fn decode_u32(data: &[u8]) -> u32 {
    u32::from_le_bytes(pad::<4>(data))
}

pub fn decode_u16(data: &[u8]) -> u16 {
    u16::from_le_bytes(pad::<2>(data))
}

pub fn bytes_from_i64(v: i64) -> [u8; 8] {
    v.to_le_bytes()
}

pub fn bytes_from_u64(v: u64) -> [u8; 8] {
    v.to_le_bytes()
}

/// Map 8 bytes onto a ratio in `[0, 1]` via `|i64| / 2^63`.
pub(crate) fn unit_ratio(data: &[u8]) -> f64 {
    (decode_i64(data) as f64 / 9_223_372_036_854_775_808.0).abs()
}
