const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";
const NO_VALUE: u8 = 255;
const BITS_PER_CHAR: u32 = 5;

/// Number of base32 characters needed for a 128-bit value.
pub(crate) const U128_CHARS: usize = 26;

/// Strict lookup table for Crockford base32 decoding.
///
/// Only the canonical upper-case alphabet is accepted; `I`, `L`, `O`, `U` and
/// lower-case letters decode to [`NO_VALUE`] so that decoding agrees with the
/// structural validators.
const LOOKUP: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0_u8;
    while i < 32 {
        lut[ALPHABET[i as usize] as usize] = i;
        i += 1;
    }
    lut
};

/// Returns the alphabet character of a 5-bit digit.
#[inline]
pub(crate) const fn digit_char(digit: u8) -> u8 {
    ALPHABET[(digit & 0x1F) as usize]
}

/// Returns the 5-bit value of a character, if it is in the alphabet.
#[inline]
pub(crate) const fn char_value(c: u8) -> Option<u8> {
    match LOOKUP[c as usize] {
        NO_VALUE => None,
        v => Some(v),
    }
}

/// Encodes the low `chars * 5` bits of `value`, most significant digit first.
///
/// This is the repeated `divmod 32` of the textbook algorithm, expressed as
/// shifts.
pub(crate) fn encode_u128(value: u128, buf: &mut [u8]) {
    let chars = buf.len();
    for (i, slot) in buf.iter_mut().enumerate() {
        let shift = (chars - 1 - i) as u32 * BITS_PER_CHAR;
        *slot = digit_char(((value >> shift) & 0x1F) as u8);
    }
}

/// Decodes a base32 string into a 128-bit value.
///
/// Returns `None` if the input contains a character outside the alphabet or
/// encodes more than 128 bits of non-zero data.
pub(crate) fn decode_u128(encoded: &str) -> Option<u128> {
    let mut acc = 0_u128;
    for b in encoded.bytes() {
        let val = char_value(b)?;
        if acc >> (128 - BITS_PER_CHAR) != 0 {
            return None;
        }
        acc = (acc << BITS_PER_CHAR) | u128::from(val);
    }
    Some(acc)
}
