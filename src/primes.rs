//! Number-theoretic machinery behind the kernel dispatcher: a process-wide
//! primes cache, deterministic Miller–Rabin, prime decomposition, primitive
//! roots, and modular arithmetic.

use lazy_static::lazy_static;
use parking_lot::Mutex;

lazy_static! {
    //
    // Global ordered primes cache, grown on demand.
    //
    static ref PRIMES: Mutex<PrimeTable> = Mutex::new(PrimeTable::new());
}

/// Primes known so far, in ascending order. Monotonic; never evicted.
struct PrimeTable {
    primes: Vec<u64>,
}

impl PrimeTable {
    fn new() -> Self {
        Self {
            primes: vec![2, 3, 5, 7],
        }
    }

    /// Returns the `i`-th prime (0-based), extending the table as needed
    /// with an odd-candidate Miller–Rabin sweep.
    fn get(&mut self, i: usize) -> u64 {
        while i >= self.primes.len() {
            let mut candidate = self.primes[self.primes.len() - 1] + 2;
            while !miller_rabin(candidate) {
                candidate += 2;
            }
            self.primes.push(candidate);
        }
        self.primes[i]
    }
}

/// Returns the `i`-th prime, 0-based: `nth_prime(0) == 2`.
pub fn nth_prime(i: usize) -> u64 {
    PRIMES.lock().get(i)
}

/// True iff `x` is a positive power of two.
pub fn is_power_of_two(x: usize) -> bool {
    x != 0 && x & (x - 1) == 0
}

/// Smallest power of two `>= x`.
pub fn next_power_of_two(x: usize) -> usize {
    x.next_power_of_two()
}

/// Index of the single set bit of a power of two.
pub fn highest_bit(x: usize) -> u32 {
    x.trailing_zeros()
}

/// Number of trailing zero bits; `x` must be positive.
pub fn trailing_zeros(x: usize) -> u32 {
    x.trailing_zeros()
}

// Primes below 256, used as a membership table and quick trial-division
// screen ahead of the witness tests.
const SMALL_PRIMES: [u64; 54] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191,
    193, 197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

/// (a * b) mod m without overflow.
#[inline]
fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

/// Computes `g^k mod n` by square-and-multiply.
///
/// Products are widened to 128 bits, so the native path is exact for any
/// 64-bit modulus; no big-integer fallback is needed.
pub fn exp_mod(g: u64, k: u64, n: u64) -> u64 {
    if n <= 1 {
        return 0;
    }
    let mut base = g % n;
    let mut exp = k;
    let mut result = 1u64;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, n);
        }
        base = mul_mod(base, base, n);
        exp >>= 1;
    }
    result
}

/// One strong-probable-prime round for witness `a`. `n` is odd, `> 2`, and
/// `n - 1 = d * 2^r` with `d` odd.
fn sprp(n: u64, a: u64, d: u64, r: u32) -> bool {
    let a = a % n;
    if a == 0 {
        return true;
    }
    let mut x = exp_mod(a, d, n);
    if x == 1 || x == n - 1 {
        return true;
    }
    for _ in 1..r {
        x = mul_mod(x, x, n);
        if x == n - 1 {
            return true;
        }
    }
    false
}

/// Deterministic Miller–Rabin over the fixed witness set
/// {2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37}, applied through the
/// standard threshold ladder. Exact for every `u64` input.
fn miller_rabin(n: u64) -> bool {
    const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

    //
    // Published bounds below which a prefix of the witness set is already
    // deterministic.
    //
    let count = match n {
        0..=2_046 => 1,
        2_047..=1_373_652 => 2,
        1_373_653..=25_326_000 => 3,
        25_326_001..=3_215_031_750 => 4,
        3_215_031_751..=2_152_302_898_746 => 5,
        2_152_302_898_747..=3_474_749_660_382 => 6,
        3_474_749_660_383..=341_550_071_728_320 => 7,
        341_550_071_728_321..=3_825_123_056_546_413_050 => 9,
        _ => 12,
    };

    let mut d = n - 1;
    let r = d.trailing_zeros();
    d >>= r;

    WITNESSES[..count].iter().all(|&a| sprp(n, a, d, r))
}

/// Primality test: a hard-coded small-prime screen, then deterministic
/// Miller–Rabin.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n == 2 {
        return true;
    }
    if n & 1 == 0 {
        return false;
    }
    if n <= 255 {
        return SMALL_PRIMES.binary_search(&n).is_ok();
    }
    for &p in SMALL_PRIMES.iter().skip(1) {
        if p * p > n {
            return true;
        }
        if n % p == 0 {
            return false;
        }
    }
    miller_rabin(n)
}

/// Prime factors of `n` with multiplicity, ascending. Empty for `n < 2`.
///
/// Trial-divides by cached primes up to the square root; whatever residue
/// remains is itself prime and is appended last.
pub fn prime_decomp(mut n: u64) -> Vec<u64> {
    let mut factors = Vec::new();
    if n < 2 {
        return factors;
    }
    let mut table = PRIMES.lock();
    let mut i = 0;
    loop {
        let p = table.get(i);
        if p > n / p {
            break;
        }
        while n % p == 0 {
            factors.push(p);
            n /= p;
        }
        i += 1;
    }
    if n > 1 {
        factors.push(n);
    }
    factors
}

/// Unique prime factors of `n`, ascending.
pub fn prime_factors(n: u64) -> Vec<u64> {
    let mut factors = prime_decomp(n);
    factors.dedup();
    factors
}

/// Largest prime factor of `n`; returns `n` itself for `n < 2`.
pub fn largest_prime_factor(n: u64) -> u64 {
    prime_decomp(n).last().copied().unwrap_or(n)
}

/// True iff the largest prime factor of `n` exceeds `k`.
///
/// Short-circuits as soon as the residue can only contain factors above
/// `k`, without finishing the decomposition.
pub fn largest_prime_factor_is_above(mut n: u64, k: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut table = PRIMES.lock();
    let mut i = 0;
    loop {
        let p = table.get(i);
        if p > k {
            // Every remaining factor is >= p.
            return n > 1;
        }
        if p > n / p {
            break;
        }
        while n % p == 0 {
            n /= p;
        }
        i += 1;
    }
    n > k
}

/// Decides whether Rader's algorithm for odd prime `p` should zero-pad its
/// internal convolution up to a power of two.
///
/// Padding wins when `p - 1` carries a large prime factor; a handful of
/// sizes measured faster padded despite factoring smoothly.
pub fn prime_padding_heuristic(p: u64) -> bool {
    matches!(p, 31 | 61 | 101 | 241 | 251) || largest_prime_factor_is_above(p - 1, 5)
}

/// Smallest primitive root modulo the odd prime `p`.
///
/// The result is unspecified if `p` is not an odd prime.
pub fn primitive_root_of_prime(p: u64) -> u64 {
    let factors = prime_factors(p - 1);
    let mut g = 2;
    loop {
        if factors.iter().all(|&q| exp_mod(g, (p - 1) / q, p) != 1) {
            return g;
        }
        g += 1;
    }
}

/// Multiplicative inverse of `x` modulo the prime `p`, by Fermat.
pub fn multiplicative_inverse_of_prime(x: u64, p: u64) -> u64 {
    exp_mod(x, p - 2, p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn is_prime_trial(n: u64) -> bool {
        if n < 2 {
            return false;
        }
        let mut d = 2;
        while d * d <= n {
            if n % d == 0 {
                return false;
            }
            d += 1;
        }
        true
    }

    #[test]
    fn power_of_two_helpers() {
        assert!(is_power_of_two(1));
        assert!(is_power_of_two(1024));
        assert!(!is_power_of_two(0));
        assert!(!is_power_of_two(12));
        assert_eq!(next_power_of_two(1), 1);
        assert_eq!(next_power_of_two(44), 64);
        assert_eq!(highest_bit(1 << 20), 20);
        assert_eq!(trailing_zeros(48), 4);
    }

    #[test]
    fn nth_prime_matches_known_sequence() {
        let known = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47];
        for (i, &p) in known.iter().enumerate() {
            assert_eq!(nth_prime(i), p);
        }
        assert_eq!(nth_prime(99), 541);
    }

    #[test]
    fn is_prime_agrees_with_trial_division() {
        for n in 0..10_000u64 {
            assert_eq!(is_prime(n), is_prime_trial(n), "disagree at {}", n);
        }
    }

    #[test]
    fn base2_pseudoprimes_are_rejected() {
        // Strong pseudoprimes to base 2 alone.
        for n in [2_047u64, 3_277, 4_033, 4_681, 8_321] {
            assert!(!is_prime(n), "{} is composite", n);
        }
        // First composite surviving the nine-witness prefix.
        assert!(!is_prime(3_825_123_056_546_413_051));
    }

    #[test]
    fn prime_decomp_reassembles() {
        for n in 2..2_000u64 {
            let factors = prime_decomp(n);
            assert_eq!(factors.iter().product::<u64>(), n);
            assert!(factors.windows(2).all(|w| w[0] <= w[1]));
            for &f in &factors {
                assert!(is_prime(f), "{} has non-prime factor {}", n, f);
            }
        }
        assert!(prime_decomp(1).is_empty());
        assert_eq!(prime_decomp(360), vec![2, 2, 2, 3, 3, 5]);
        // Residue larger than the square root is kept as a prime factor.
        assert_eq!(prime_decomp(2 * 1_000_003), vec![2, 1_000_003]);
    }

    #[test]
    fn prime_factor_queries() {
        assert_eq!(prime_factors(360), vec![2, 3, 5]);
        assert_eq!(largest_prime_factor(360), 5);
        assert_eq!(largest_prime_factor(97), 97);
        assert!(largest_prime_factor_is_above(22, 5));
        assert!(!largest_prime_factor_is_above(40, 5));
        assert!(largest_prime_factor_is_above(1_000_003, 1000));
        assert!(!largest_prime_factor_is_above(1, 1));
    }

    #[test]
    fn padding_heuristic() {
        // Explicit exceptions.
        for p in [31u64, 61, 101, 241, 251] {
            assert!(prime_padding_heuristic(p));
        }
        // p - 1 smooth: stay unpadded.
        for p in [5u64, 7, 11, 13, 17, 37, 41, 73, 97, 151, 181] {
            assert!(!prime_padding_heuristic(p), "{} should be unpadded", p);
        }
        // p - 1 with a large prime factor: pad.
        for p in [23u64, 29, 43, 47, 59, 67, 83, 103, 107] {
            assert!(prime_padding_heuristic(p), "{} should be padded", p);
        }
    }

    #[test]
    fn primitive_roots_match_a001918() {
        let primes = [
            3u64, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79,
            83, 89, 97, 101, 103, 107, 109, 113,
        ];
        let roots = [
            2u64, 2, 3, 2, 2, 3, 2, 5, 2, 3, 2, 6, 3, 5, 2, 2, 2, 2, 7, 5, 3, 2, 3, 5, 2, 5, 2,
            6, 3,
        ];
        for (&p, &g) in primes.iter().zip(roots.iter()) {
            assert_eq!(primitive_root_of_prime(p), g, "root of {}", p);
        }
    }

    #[test]
    fn inverse_mod_47() {
        let p = 47u64;
        for x in 1..p {
            let inv = multiplicative_inverse_of_prime(x, p);
            assert_eq!(x * inv % p, 1, "inverse of {} mod {}", x, p);
        }
    }

    #[test]
    fn exp_mod_agrees_with_bigint() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..500 {
            let g: u64 = rng.gen();
            let k: u64 = rng.gen_range(0..1 << 40);
            let n: u64 = rng.gen_range(2..u64::MAX);
            let expected = BigUint::from(g)
                .modpow(&BigUint::from(k), &BigUint::from(n));
            assert_eq!(BigUint::from(exp_mod(g, k, n)), expected);
        }
    }
}
