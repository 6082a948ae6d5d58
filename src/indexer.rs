//! Index ⇄ candidate mapping.
//!
//! A search space of length `n` over an alphabet of `A` symbols holds `A^n`
//! candidates. Candidate `i` is `i` written in base `A`, most-significant
//! digit first, zero-padded to `n` digits, with each digit replaced by the
//! alphabet symbol at that position. Walking `i` upward is odometer order:
//! the rightmost symbol changes fastest.

use crate::alphabet::Alphabet;

/// Number of candidates of exactly `length` symbols, or `None` if it does
/// not fit in a `u128`.
pub fn space_size(alphabet_size: usize, length: usize) -> Option<u128> {
    let exp = u32::try_from(length).ok()?;
    (alphabet_size as u128).checked_pow(exp)
}

/// `Σ A^l` for `l` in `1..=max_length`, or `None` on overflow.
///
/// `max_length == 0` yields `Some(0)`.
pub fn total_combinations(alphabet_size: usize, max_length: usize) -> Option<u128> {
    (1..=max_length).try_fold(0u128, |acc, len| acc.checked_add(space_size(alphabet_size, len)?))
}

/// Decode `index` into the candidate of `length` symbols it denotes.
///
/// `index` must be below `A^length`; higher digits beyond `length` are
/// silently dropped otherwise.
pub fn encode(index: u128, alphabet: &Alphabet, length: usize) -> String {
    let mut digits = vec![0usize; length];
    fill_digits(index, alphabet.len(), &mut digits);
    digits.iter().map(|&d| alphabet.symbols()[d]).collect()
}

/// Write the base-`base` digits of `index` into `digits`, most significant
/// first.
fn fill_digits(mut index: u128, base: usize, digits: &mut [usize]) {
    debug_assert!(base > 0);
    let base = base as u128;
    for slot in digits.iter_mut().rev() {
        *slot = (index % base) as usize;
        index /= base;
    }
    debug_assert_eq!(index, 0, "index out of range for length");
}

// ---------------------------------------------------------------------------
// Odometer
// ---------------------------------------------------------------------------

/// Incremental decoder over consecutive indices.
///
/// Seeded once with [`encode`]'s digit expansion of a start index, then
/// stepped with [`advance`](Odometer::advance). Stepping is a carry-propagating
/// increment of the rightmost digit, so after `k` steps the current
/// candidate equals `encode(start + k, ..)` without a division per symbol.
pub struct Odometer<'a> {
    alphabet: &'a Alphabet,
    digits:   Vec<usize>,
    current:  Vec<char>,
}

impl<'a> Odometer<'a> {
    pub fn new(alphabet: &'a Alphabet, length: usize, start: u128) -> Self {
        let mut digits = vec![0usize; length];
        fill_digits(start, alphabet.len(), &mut digits);
        let current = digits.iter().map(|&d| alphabet.symbols()[d]).collect();
        Self {
            alphabet,
            digits,
            current,
        }
    }

    /// The candidate at the current index.
    pub fn current(&self) -> &[char] {
        &self.current
    }

    /// The candidate at the current index, as an owned string.
    pub fn candidate(&self) -> String {
        self.current.iter().collect()
    }

    /// Step to the next index. Wraps to all-first-symbol past the last one.
    pub fn advance(&mut self) {
        let base = self.alphabet.len();
        let symbols = self.alphabet.symbols();
        for pos in (0..self.digits.len()).rev() {
            let d = self.digits[pos] + 1;
            if d < base {
                self.digits[pos] = d;
                self.current[pos] = symbols[d];
                return;
            }
            self.digits[pos] = 0;
            self.current[pos] = symbols[0];
        }
    }
}
