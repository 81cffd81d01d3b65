//! Checksummed 16-bit encoder words.
//!
//! Layout, most significant bit first:
//!
//! ```text
//!  15  14  13 ........................ 2   1 0
//!  K1  K0  [ 12-bit value, scaled by 4 ]   0 0
//! ```
//!
//! `K1 = !(b13 ^ b11 ^ b9 ^ b7 ^ b5 ^ b3 ^ b1)` covers the odd bits and
//! `K0 = !(b12 ^ b10 ^ b8 ^ b6 ^ b4 ^ b2 ^ b0)` covers the even bits.

const DATA_MASK: u16 = 0x3FFF;
const ODD_BITS: u16 = 0b0010_1010_1010_1010;
const EVEN_BITS: u16 = 0b0001_0101_0101_0101;

/// Largest value a position word can carry.
pub const MAX_POSITION_VALUE: u16 = DATA_MASK >> 2;

/// Raw position or turn counter word as read from the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionWord(pub u16);

impl PositionWord {
    /// Build a correctly checksummed word carrying `value` (masked to 12 bits).
    pub fn encode(value: u16) -> Self {
        let data = (value << 2) & DATA_MASK;
        let (k1, k0) = parity_bits(data);
        Self(data | (u16::from(k1) << 15) | (u16::from(k0) << 14))
    }

    /// Raw word.
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Position value carried by the data bits.
    #[inline]
    pub const fn value(self) -> u16 {
        (self.0 & DATA_MASK) >> 2
    }

    /// Checksum bits stored in the word, as `(K1, K0)`.
    #[inline]
    pub const fn stored_checksum(self) -> (bool, bool) {
        ((self.0 >> 15) & 1 == 1, (self.0 >> 14) & 1 == 1)
    }

    /// Checksum bits computed over the data bits, as `(K1, K0)`.
    #[inline]
    pub fn expected_checksum(self) -> (bool, bool) {
        parity_bits(self.0 & DATA_MASK)
    }

    /// Whether the stored checksum matches the data bits.
    #[inline]
    pub fn checksum_valid(self) -> bool {
        self.stored_checksum() == self.expected_checksum()
    }
}

fn parity_bits(data: u16) -> (bool, bool) {
    let k1 = (data & ODD_BITS).count_ones() % 2 == 0;
    let k0 = (data & EVEN_BITS).count_ones() % 2 == 0;
    (k1, k0)
}
