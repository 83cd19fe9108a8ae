//! Combinatorial primitives shared by the block codec and the index.

/// Return $\lfloor \log_2 n \rfloor$, or 0 for `n == 0`.
///
/// Equivalent to `bit_width(n) - 1` for positive `n`; computed without
/// floating point.
#[inline]
pub fn floor_log2(n: u64) -> u8 {
    if n == 0 {
        0
    } else {
        (63 - n.leading_zeros()) as u8
    }
}

/// Return the binomial coefficient $C(n, k)$ for $k \le n \le 64$.
///
/// Returns 0 if `k > n` and 1 if `k` is 0 or `n`. Uses the multiplicative
/// form $\prod_{i=1}^{k} (n-i+1)/i$, dividing inside the loop so every
/// partial product is itself a binomial coefficient. The multiply-divide
/// step is widened to `u128`: the running product `result * (n-i+1)` can
/// exceed `u64` for `n = 64` even though every $C(64, k)$ fits.
pub fn choose(n: u64, k: u64) -> u64 {
    debug_assert!(n <= 64, "choose is only defined for n <= 64, got {n}");
    if k > n {
        return 0;
    }
    if k == 0 || k == n {
        return 1;
    }
    let k = k.min(n - k);
    let mut result = 1u64;
    for i in 1..=k {
        result = (u128::from(result) * u128::from(n - i + 1) / u128::from(i)) as u64;
    }
    result
}

/// Number of set bits among the low `width` bits of `value`.
#[inline]
pub fn popcount(width: u8, value: u64) -> u32 {
    let masked = if width >= 64 {
        value
    } else {
        value & ((1u64 << width) - 1)
    };
    masked.count_ones()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_log2_powers() {
        for k in 0..64u32 {
            assert_eq!(floor_log2(1u64 << k), k as u8);
        }
    }

    #[test]
    fn test_floor_log2_between_powers() {
        assert_eq!(floor_log2(0), 0);
        assert_eq!(floor_log2(1), 0);
        assert_eq!(floor_log2(2), 1);
        assert_eq!(floor_log2(3), 1);
        assert_eq!(floor_log2(1000), 9);
        assert_eq!(floor_log2(u64::MAX), 63);
    }

    #[test]
    fn test_choose_edges() {
        assert_eq!(choose(10, 11), 0);
        assert_eq!(choose(10, 0), 1);
        assert_eq!(choose(10, 10), 1);
        assert_eq!(choose(0, 0), 1);
    }

    #[test]
    fn test_choose_symmetry() {
        for n in 0..=64u64 {
            for k in 0..=n {
                assert_eq!(choose(n, k), choose(n, n - k), "n={n} k={k}");
            }
        }
    }

    #[test]
    fn test_choose_pascal() {
        for n in 1..=30u64 {
            for k in 1..n {
                assert_eq!(
                    choose(n, k),
                    choose(n - 1, k - 1) + choose(n - 1, k),
                    "n={n} k={k}"
                );
            }
        }
    }

    #[test]
    fn test_choose_largest() {
        // The central coefficient is the worst case for intermediate overflow.
        assert_eq!(choose(64, 32), 1_832_624_140_942_590_534);
        assert_eq!(choose(64, 1), 64);
        assert_eq!(choose(63, 31), 916_312_070_471_295_267);
    }

    #[test]
    fn test_popcount() {
        assert_eq!(popcount(8, 0xFF), 8);
        assert_eq!(popcount(4, 0xFF), 4);
        assert_eq!(popcount(64, u64::MAX), 64);
        assert_eq!(popcount(1, 0b10), 0);
        assert_eq!(popcount(2, 0b10), 1);
    }
}
