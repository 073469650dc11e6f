//! 32-bit FNV-1a, stable across platforms and runs.

const OFFSET: u32 = 0x811c_9dc5;
const PRIME: u32 = 0x0100_0193;

/// FNV-1a 32-bit hash of `bytes`.
pub fn fnv1a32(bytes: &[u8]) -> u32 {
    let mut h = OFFSET;
    for &b in bytes {
        h ^= b as u32;
        h = h.wrapping_mul(PRIME);
    }
    h
}

/// Eight lowercase hex characters of the FNV-1a hash of `input`.
pub fn fingerprint_hex(input: &str) -> String {
    format!("{:08x}", fnv1a32(input.as_bytes()))
}
