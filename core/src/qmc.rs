//! Quasi-Monte Carlo sequences.
//!
//! Generalized Halton sequences with Faure digit scrambling for the higher
//! dimensions, and the bit-reversal sigma tables used to spread jitter over a
//! regular subpixel grid.

use crate::common::*;
use std::sync::LazyLock;

/// Number of prime bases with precomputed scrambling permutations.
pub const PRIME_TABLE_SIZE: usize = 128;

/// `1 / 2^32` for mapping 32-bit integers onto [0, 1).
const INV_2_POW_32: f64 = 1.0 / 4294967296.0;

/// Prime bases and their Faure digit permutations.
struct FaureTables {
    /// The first `PRIME_TABLE_SIZE` primes.
    primes: Vec<u32>,

    /// `sigma[d]` is the digit permutation for base `primes[d]`.
    sigma: Vec<Vec<u32>>,
}

/// Precomputed scrambling tables.
static FAURE_TABLES: LazyLock<FaureTables> = LazyLock::new(FaureTables::new);

impl FaureTables {
    /// Build the prime table and the Faure permutations for every prime.
    fn new() -> Self {
        debug!("Initializing Faure scrambling tables");

        let mut primes = Vec::with_capacity(PRIME_TABLE_SIZE);
        primes.push(2_u32);
        while primes.len() < PRIME_TABLE_SIZE {
            let p = next_prime(primes[primes.len() - 1]);
            primes.push(p);
        }

        // Faure permutations are defined recursively for every base, not just
        // primes; build them all up to the largest prime.
        let largest = primes[PRIME_TABLE_SIZE - 1] as usize;
        let mut table: Vec<Vec<u32>> = vec![vec![]; largest + 1];
        table[2] = vec![0, 1];
        for b in 3..=largest {
            let mut perm = Vec::with_capacity(b);
            if b & 1 == 0 {
                let prev = &table[b >> 1];
                perm.extend(prev.iter().map(|&v| 2 * v));
                perm.extend(prev.iter().map(|&v| 2 * v + 1));
            } else {
                let prev = &table[b - 1];
                let med = ((b - 1) >> 1) as u32;
                let shift = |v: u32| if v >= med { v + 1 } else { v };
                perm.extend(prev[..med as usize].iter().map(|&v| shift(v)));
                perm.push(med);
                perm.extend(prev[med as usize..].iter().map(|&v| shift(v)));
            }
            table[b] = perm;
        }

        let sigma = primes.iter().map(|&p| table[p as usize].clone()).collect();
        Self { primes, sigma }
    }
}

/// Returns the smallest odd prime greater than `p`.
///
/// * `p` - Starting value.
fn next_prime(p: u32) -> u32 {
    let mut p = p + (p & 1) + 1;
    loop {
        let mut div = 3;
        let mut is_prime = true;
        while is_prime && div * div <= p {
            is_prime = p % div != 0;
            div += 2;
        }
        if is_prime {
            return p;
        }
        p += 2;
    }
}

/// Returns the prime base used for a Halton dimension.
///
/// * `dimension` - The dimension.
pub fn prime_base(dimension: usize) -> u32 {
    assert!(
        dimension < PRIME_TABLE_SIZE,
        "Halton sequences are limited to {PRIME_TABLE_SIZE} dimensions"
    );
    FAURE_TABLES.primes[dimension]
}

/// Returns the `index`-th element of the generalized Halton sequence in the
/// given dimension. The result is in [0, 1).
///
/// * `dimension` - The dimension; 0 is base 2, 1 is base 3, higher dimensions
///                 use the next primes with Faure scrambling.
/// * `index`     - Index into the sequence.
pub fn halton(dimension: usize, index: u32) -> f64 {
    match dimension {
        0 => index.reverse_bits() as f64 * INV_2_POW_32,
        1 => {
            let inv = 1.0 / 3.0;
            let mut v = 0.0;
            let mut p = inv;
            let mut n = index;
            while n != 0 {
                v += (n % 3) as f64 * p;
                p *= inv;
                n /= 3;
            }
            v
        }
        d => {
            let base = prime_base(d);
            let perm = &FAURE_TABLES.sigma[d];
            let inv = 1.0 / base as f64;
            let mut v = 0.0;
            let mut p = inv;
            let mut n = index;
            while n != 0 {
                v += perm[(n % base) as usize] as f64 * p;
                p *= inv;
                n /= base;
            }
            v
        }
    }
}

/// Returns the fractional part of a non-negative number.
///
/// * `x` - The number.
#[inline(always)]
pub fn mod1(x: f64) -> f64 {
    debug_assert!(x >= 0.0);
    x - x.trunc()
}

/// Generates a permutation of `[0, n)` where entry `i` is `i` with its
/// `log2(n)` low bits reversed.
///
/// * `n` - Table size; must be a power of 2.
pub fn generate_sigma_table(n: usize) -> Vec<usize> {
    assert!(is_power_of_2(n), "sigma table size {n} is not a power of 2");
    (0..n)
        .map(|i| {
            let mut digit = n;
            let mut sigma = 0;
            let mut bits = i;
            while bits != 0 {
                digit >>= 1;
                if bits & 1 != 0 {
                    sigma += digit;
                }
                bits >>= 1;
            }
            sigma
        })
        .collect()
}
