//! Scalar arithmetic on little-endian `u32` limb buffers.
//!
//! Every function takes the buffer, the number of limbs in use and a scalar,
//! works in place and returns the new length. A value of zero is represented
//! by length 0; lengths returned here never include a most-significant zero
//! limb.

/// Drop most-significant zero limbs
#[inline]
pub(crate) fn normalized_len(limbs: &[u32], mut len: usize) -> usize {
    while len > 0 && limbs[len - 1] == 0 {
        len -= 1;
    }
    len
}

/// Multiply `limbs[..len]` by `m`.
///
/// A final carry is stored in `limbs[len]` when the buffer has room for it.
/// Otherwise it is returned, and a non-zero carry means the product did not
/// fit the buffer.
#[allow(clippy::cast_possible_truncation)]
pub fn mul_scalar(limbs: &mut [u32], len: usize, m: u32) -> (usize, u32) {
    let mut carry = 0u64;
    for limb in &mut limbs[..len] {
        let product = u64::from(*limb) * u64::from(m) + carry;
        *limb = product as u32;
        carry = product >> 32;
    }

    let mut carry = carry as u32;
    let mut len = len;
    if carry != 0 && len < limbs.len() {
        limbs[len] = carry;
        len += 1;
        carry = 0;
    }
    (normalized_len(limbs, len), carry)
}

/// Divide `limbs[..len]` by `d`, returning the new length and the remainder.
///
/// # Panics
///
/// Panics if `d` is zero.
#[allow(clippy::cast_possible_truncation)]
pub fn div_scalar(limbs: &mut [u32], len: usize, d: u32) -> (usize, u32) {
    assert!(d != 0, "limb division by zero");
    if d == 1 {
        return (len, 0);
    }

    let divisor = u64::from(d);
    let mut rem = 0u64;
    for limb in limbs[..len].iter_mut().rev() {
        let current = (rem << 32) | u64::from(*limb);
        *limb = (current / divisor) as u32;
        rem = current % divisor;
    }
    (normalized_len(limbs, len), rem as u32)
}

/// Add `v` to `limbs[..len]`.
///
/// As with [`mul_scalar`], a carry out of the top limb is stored when the
/// buffer has room, and returned otherwise.
pub fn add_scalar(limbs: &mut [u32], len: usize, v: u32) -> (usize, u32) {
    let mut carry = v;
    let mut i = 0;
    while carry != 0 && i < len {
        let (sum, overflow) = limbs[i].overflowing_add(carry);
        limbs[i] = sum;
        carry = u32::from(overflow);
        i += 1;
    }

    let mut len = len;
    if carry != 0 && len < limbs.len() {
        limbs[len] = carry;
        len += 1;
        carry = 0;
    }
    (len, carry)
}

/// Subtract `v` from `limbs[..len]`.
///
/// # Panics
///
/// Panics if `v` is larger than the represented value; callers only
/// subtract what they know is there.
pub fn sub_scalar(limbs: &mut [u32], len: usize, v: u32) -> usize {
    assert!(
        len > 1 || (len == 1 && limbs[0] >= v) || v == 0,
        "limb subtraction underflow"
    );

    let mut borrow = v;
    let mut i = 0;
    while borrow != 0 && i < len {
        let (diff, underflow) = limbs[i].overflowing_sub(borrow);
        limbs[i] = diff;
        borrow = u32::from(underflow);
        i += 1;
    }
    normalized_len(limbs, len)
}

/// Owned arbitrary-length unsigned integer stored as little-endian limbs
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BigUnsigned {
    limbs: Vec<u32>,
}

impl BigUnsigned {
    /// Zero
    #[must_use]
    pub const fn zero() -> Self {
        Self { limbs: Vec::new() }
    }

    /// Build from little-endian limbs, dropping most-significant zero limbs
    #[must_use]
    pub fn from_limbs(mut limbs: Vec<u32>) -> Self {
        let len = normalized_len(&limbs, limbs.len());
        limbs.truncate(len);
        Self { limbs }
    }

    /// Little-endian limbs, without most-significant zeros
    #[must_use]
    pub fn as_limbs(&self) -> &[u32] {
        &self.limbs
    }

    /// Consume and return the limbs
    #[must_use]
    pub fn into_limbs(self) -> Vec<u32> {
        self.limbs
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.limbs.is_empty()
    }

    /// The value as a `u128`, if it fits
    #[must_use]
    pub fn to_u128(&self) -> Option<u128> {
        if self.limbs.len() > 4 {
            return None;
        }
        Some(
            self.limbs
                .iter()
                .rev()
                .fold(0u128, |acc, &limb| (acc << 32) | u128::from(limb)),
        )
    }

    /// `self = self * m + a`, growing the buffer as needed
    pub(crate) fn mul_add(&mut self, m: u32, a: u32) {
        let len = self.limbs.len();
        self.limbs.push(0);
        let (len, _) = mul_scalar(&mut self.limbs, len, m);
        self.limbs.resize(len + 1, 0);
        let (len, _) = add_scalar(&mut self.limbs, len, a);
        self.limbs.truncate(len);
    }
}

impl From<u64> for BigUnsigned {
    #[allow(clippy::cast_possible_truncation)]
    fn from(value: u64) -> Self {
        Self::from_limbs(vec![value as u32, (value >> 32) as u32])
    }
}

impl From<u128> for BigUnsigned {
    #[allow(clippy::cast_possible_truncation)]
    fn from(value: u128) -> Self {
        Self::from_limbs(vec![
            value as u32,
            (value >> 32) as u32,
            (value >> 64) as u32,
            (value >> 96) as u32,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_of(limbs: &[u32], len: usize) -> u128 {
        limbs[..len]
            .iter()
            .rev()
            .fold(0u128, |acc, &l| (acc << 32) | u128::from(l))
    }

    #[test]
    fn test_mul_grows_into_spare_limb() {
        let mut limbs = [u32::MAX, 0, 0];
        let (len, carry) = mul_scalar(&mut limbs, 1, 16);
        assert_eq!((len, carry), (2, 0));
        assert_eq!(value_of(&limbs, len), u128::from(u32::MAX) * 16);
    }

    #[test]
    fn test_mul_reports_overflow_without_room() {
        let mut limbs = [u32::MAX];
        let (len, carry) = mul_scalar(&mut limbs, 1, 2);
        assert_eq!(len, 1);
        assert_eq!(carry, 1);
    }

    #[test]
    fn test_mul_by_zero_is_zero_length() {
        let mut limbs = [5, 7];
        assert_eq!(mul_scalar(&mut limbs, 2, 0), (0, 0));
    }

    #[test]
    fn test_div_remainder_and_trim() {
        let mut limbs = [0, 1];
        let (len, rem) = div_scalar(&mut limbs, 2, 3);
        assert_eq!(len, 1);
        assert_eq!(u128::from(limbs[0]), (1u128 << 32) / 3);
        assert_eq!(u128::from(rem), (1u128 << 32) % 3);
    }

    #[test]
    fn test_div_by_one_is_noop() {
        let mut limbs = [9, 9];
        assert_eq!(div_scalar(&mut limbs, 2, 1), (2, 0));
        assert_eq!(limbs, [9, 9]);
    }

    #[test]
    #[should_panic(expected = "division by zero")]
    fn test_div_by_zero_panics() {
        let mut limbs = [1];
        let _ = div_scalar(&mut limbs, 1, 0);
    }

    #[test]
    fn test_add_ripples_carry() {
        let mut limbs = [u32::MAX, u32::MAX, 0];
        let (len, carry) = add_scalar(&mut limbs, 2, 1);
        assert_eq!((len, carry), (3, 0));
        assert_eq!(limbs, [0, 0, 1]);
    }

    #[test]
    fn test_add_to_zero() {
        let mut limbs = [0u32; 2];
        assert_eq!(add_scalar(&mut limbs, 0, 42), (1, 0));
        assert_eq!(limbs[0], 42);
    }

    #[test]
    fn test_sub_borrows_and_trims() {
        let mut limbs = [0, 1];
        let len = sub_scalar(&mut limbs, 2, 1);
        assert_eq!(len, 1);
        assert_eq!(limbs[0], u32::MAX);
    }

    #[test]
    #[should_panic(expected = "underflow")]
    fn test_sub_underflow_panics() {
        let mut limbs = [3];
        let _ = sub_scalar(&mut limbs, 1, 4);
    }

    #[test]
    fn test_chunked_accumulation_matches_u128() {
        // "123456789012345678901234567" fed as 9-digit chunks
        let chunks = [123_456_789u32, 12_345_678, 901_234_567];
        let mut limbs = [0u32; 4];
        let mut len = 0;
        for chunk in chunks {
            len = mul_scalar(&mut limbs, len, 1_000_000_000).0;
            len = add_scalar(&mut limbs, len, chunk).0;
        }
        assert_eq!(value_of(&limbs, len), 123_456_789_012_345_678_901_234_567);
    }

    #[test]
    fn test_big_unsigned_mul_add() {
        let mut big = BigUnsigned::zero();
        for _ in 0..5 {
            big.mul_add(1 << 16, 0xFFFF);
        }
        assert_eq!(big.to_u128(), Some((1u128 << 80) - 1));
        assert_eq!(big.as_limbs().len(), 3);
    }

    #[test]
    fn test_big_unsigned_normalizes() {
        assert!(BigUnsigned::from_limbs(vec![0, 0]).is_zero());
        assert_eq!(BigUnsigned::from(u64::MAX).as_limbs(), &[u32::MAX, u32::MAX]);
        assert_eq!(BigUnsigned::from(7u128).as_limbs(), &[7]);
    }
}
