//! Hamming (12,8) / (24,16) parity for the transmit path.
//!
//! The badge corrects single-bit errors per 12-bit codeword on receive;
//! the transmitter only has to derive the 4-bit parity nibble for each
//! data byte. Parity comes from two 16-entry tables indexed by the low
//! and high nibble of the byte, combined by XOR.

const PARITY_LOW_NIBBLE: [u8; 16] = [0, 3, 5, 6, 6, 5, 3, 0, 7, 4, 2, 1, 1, 2, 4, 7];
const PARITY_HIGH_NIBBLE: [u8; 16] = [0, 9, 10, 3, 11, 2, 1, 8, 12, 5, 6, 15, 7, 14, 13, 4];

/// Parity nibble for one data byte — the (12,8) code.
pub fn parity_128(byte: u8) -> u8 {
    PARITY_LOW_NIBBLE[(byte & 0x0F) as usize] ^ PARITY_HIGH_NIBBLE[(byte >> 4) as usize]
}

/// Parity byte covering a 16-bit data pair — the (24,16) code.
/// The second byte's nibble occupies the high half.
pub fn parity_2416(first: u8, second: u8) -> u8 {
    parity_128(second) << 4 | parity_128(first)
}

/// Expand `data` into consecutive `(d0, d1, parity)` triples.
///
/// Odd-length input is padded with a single zero byte first, so the
/// output is always exactly 1.5x the padded length.
pub fn interleave_parity(data: &[u8]) -> Vec<u8> {
    let mut padded = data.to_vec();
    if padded.len() % 2 != 0 {
        padded.push(0);
    }

    let mut out = Vec::with_capacity(padded.len() / 2 * 3);
    for pair in padded.chunks_exact(2) {
        out.push(pair[0]);
        out.push(pair[1]);
        out.push(parity_2416(pair[0], pair[1]));
    }

    log::debug!(
        "parity expansion: {} data bytes -> {} line bytes",
        data.len(),
        out.len()
    );
    out
}
