//! Entropy-compressed bit sequence with sub-logarithmic rank.
//!
//! Implements the Raman-Raman-Rao scheme: the input is cut into
//! $b$-bit blocks, each block is stored as a (class, offset) pair, and
//! an inline directory of cumulative-rank headers makes rank a short
//! local walk instead of a scan.
//!
//! # Layout
//!
//! The packed container holds one record per superblock, back to back:
//!
//! ```text
//! | cum_rank | class offset | class offset | ... (s blocks) | cum_rank | ...
//! ```
//!
//! - `cum_rank`: number of 1-bits before this superblock's first block
//! - `class`: popcount of the block (fixed width, $\lfloor \log_2 b \rfloor + 1$)
//! - `offset`: the block's rank within its class (fixed width, sized for
//!   the largest class, $\lfloor \log_2 C(b, \lfloor b/2 \rfloor) \rfloor + 1$)
//!
//! Headers are interleaved with the block fields rather than held in a
//! side array: a rank query touches one contiguous region.
//!
//! A query locates the enclosing superblock by division, starts from its
//! header, adds the class fields of the blocks before the target, and
//! finishes by decoding the target block and counting a prefix of it.
//! Cost is $O(s + b)$, with $s, b = O(\log n)$ at the default sizes.
//!
//! The final block is zero-padded when $b$ does not divide $n$; padding
//! never contains a 1-bit and every query clamps to the logical length,
//! so the padding is unobservable.

use crate::binom::{choose, floor_log2, popcount};
use crate::block;
use crate::container::BitContainer;
use crate::error::{Error, Result};

/// Construction parameters for [`Rrr`].
///
/// Usually the defaults are what you want: both sizes are derived from
/// the input length to balance directory overhead against query cost.
#[derive(Clone, Copy, Debug, Default)]
pub struct RrrOptions {
    /// Bits per block. `1..=64` is used exactly; 0 picks
    /// $\max(1, \lfloor \log_2 n \rfloor / 2)$. Values above 64 are
    /// rejected.
    pub block_size: u8,

    /// Blocks per superblock. `2..=255` is used exactly; 0 or 1 picks
    /// $\max(2, \lfloor \log_2 n \rfloor)$.
    pub super_block_size: u8,
}

/// An immutable entropy-compressed index over a bit sequence.
///
/// Construction reads the input once; afterwards the index answers
/// `rank`, `select` and `access` from the compressed form alone.
/// All query paths take `&self`, so concurrent readers need no
/// synchronization.
pub struct Rrr {
    /// Packed directory: superblock headers interleaved with block fields.
    encoded: BitContainer,
    /// Original sequence length in bits.
    n: u64,
    /// Total number of 1-bits (cached at construction).
    ones: u64,
    block_size: u8,
    super_block_size: u8,
    class_field_size: u8,
    offset_field_size: u8,
    cum_rank_field_size: u8,
    num_blocks: u64,
    num_super_blocks: u64,
}

impl std::fmt::Debug for Rrr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rrr")
            .field("len", &self.n)
            .field("ones", &self.ones)
            .field("block_size", &self.block_size)
            .field("super_block_size", &self.super_block_size)
            .finish()
    }
}

/// Read `bitsize` bits through the narrowest accessor that fits.
fn read_field(bits: &BitContainer, i: u64, bitsize: u8) -> u64 {
    match bitsize {
        1..=8 => u64::from(bits.get8(bitsize, i)),
        9..=16 => u64::from(bits.get16(bitsize, i)),
        17..=32 => u64::from(bits.get32(bitsize, i)),
        _ => bits.get64(bitsize, i),
    }
}

/// Write `bitsize` bits through the narrowest accessor that fits.
fn write_field(bits: &mut BitContainer, i: u64, bitsize: u8, value: u64) {
    match bitsize {
        1..=8 => bits.set8(bitsize, i, value as u8),
        9..=16 => bits.set16(bitsize, i, value as u16),
        17..=32 => bits.set32(bitsize, i, value as u32),
        _ => bits.set64(bitsize, i, value),
    }
}

/// Position of the `need`-th (1-based) bit equal to `want` among the low
/// `width` bits of `raw`, if it exists.
fn nth_bit(raw: u64, width: u8, want: bool, mut need: u64) -> Option<u8> {
    for p in 0..width {
        if ((raw >> p) & 1 == 1) == want {
            need -= 1;
            if need == 0 {
                return Some(p);
            }
        }
    }
    None
}

impl Rrr {
    /// Build an index over `bits`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBlockSize`] if `opts.block_size > 64`.
    pub fn try_new(bits: &BitContainer, opts: RrrOptions) -> Result<Self> {
        if opts.block_size > 64 {
            return Err(Error::InvalidBlockSize(opts.block_size));
        }

        let n = bits.len();
        let log_n = floor_log2(n);

        let block_size = if opts.block_size == 0 {
            (log_n / 2).max(1)
        } else {
            opts.block_size
        };
        let super_block_size = if opts.super_block_size < 2 {
            log_n.max(2)
        } else {
            opts.super_block_size
        };

        let class_field_size = floor_log2(u64::from(block_size)) + 1;
        let max_offset = choose(u64::from(block_size), u64::from(block_size) / 2);
        let offset_field_size = floor_log2(max_offset) + 1;
        let cum_rank_field_size = floor_log2(n) + 1;

        let num_blocks = n.div_ceil(u64::from(block_size));
        let num_super_blocks = num_blocks.div_ceil(u64::from(super_block_size));

        let serialized_block = u64::from(class_field_size) + u64::from(offset_field_size);
        let capacity =
            num_super_blocks * u64::from(cum_rank_field_size) + num_blocks * serialized_block;
        let mut encoded = BitContainer::new(capacity);

        let mut in_cursor = 0u64;
        let mut out_cursor = 0u64;
        let mut cum_rank = 0u64;

        for j in 0..num_blocks {
            if j % u64::from(super_block_size) == 0 {
                write_field(&mut encoded, out_cursor, cum_rank_field_size, cum_rank);
                out_cursor += u64::from(cum_rank_field_size);
            }

            // The last block may cover fewer than block_size source bits;
            // the accessor zero-extends it.
            let take = (n - in_cursor).min(u64::from(block_size)) as u8;
            let raw = read_field(bits, in_cursor, take);
            in_cursor += u64::from(take);

            let (class, offset) = block::encode(block_size, raw);
            cum_rank += u64::from(class);

            encoded.set8(class_field_size, out_cursor, class);
            out_cursor += u64::from(class_field_size);
            write_field(&mut encoded, out_cursor, offset_field_size, offset);
            out_cursor += u64::from(offset_field_size);
        }

        Ok(Self {
            encoded,
            n,
            ones: cum_rank,
            block_size,
            super_block_size,
            class_field_size,
            offset_field_size,
            cum_rank_field_size,
            num_blocks,
            num_super_blocks,
        })
    }

    /// Build an index over `bits`, panicking on invalid options.
    pub fn new(bits: &BitContainer, opts: RrrOptions) -> Self {
        match Self::try_new(bits, opts) {
            Ok(rrr) => rrr,
            Err(e) => panic!("{e}"),
        }
    }

    /// Length of the indexed sequence in bits.
    pub fn len(&self) -> u64 {
        self.n
    }

    /// Return true if the indexed sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Total number of 1-bits in the sequence.
    pub fn count_ones(&self) -> u64 {
        self.ones
    }

    /// Total number of 0-bits in the sequence.
    pub fn count_zeros(&self) -> u64 {
        self.n - self.ones
    }

    /// Bits per block.
    pub fn block_size(&self) -> u8 {
        self.block_size
    }

    /// Blocks per superblock.
    pub fn super_block_size(&self) -> u8 {
        self.super_block_size
    }

    /// Approximate heap memory usage in bytes.
    pub fn heap_bytes(&self) -> usize {
        self.encoded.heap_bytes()
    }

    fn serialized_block_size(&self) -> u64 {
        u64::from(self.class_field_size) + u64::from(self.offset_field_size)
    }

    fn serialized_super_block_size(&self) -> u64 {
        u64::from(self.cum_rank_field_size)
            + u64::from(self.super_block_size) * self.serialized_block_size()
    }

    /// Cumulative-rank header of superblock `sb`: 1-bits before its
    /// first block.
    fn header(&self, sb: u64) -> u64 {
        read_field(
            &self.encoded,
            sb * self.serialized_super_block_size(),
            self.cum_rank_field_size,
        )
    }

    /// Bit cursor of block `blk`'s class field inside the directory.
    fn block_cursor(&self, blk: u64) -> u64 {
        let sb = blk / u64::from(self.super_block_size);
        sb * self.serialized_super_block_size()
            + u64::from(self.cum_rank_field_size)
            + (blk - sb * u64::from(self.super_block_size)) * self.serialized_block_size()
    }

    /// Decode the raw contents of block `blk`, given the cursor of its
    /// class field.
    fn decode_block_at(&self, cursor: u64) -> u64 {
        let class = self.encoded.get8(self.class_field_size, cursor);
        let offset = read_field(
            &self.encoded,
            cursor + u64::from(self.class_field_size),
            self.offset_field_size,
        );
        block::decode(self.block_size, class, offset)
    }

    /// Count occurrences of `bit` in positions `[0, i)`.
    ///
    /// # Panics
    ///
    /// Panics if `bit` is not 0 or 1, or if `i` exceeds the sequence
    /// length.
    pub fn rank(&self, bit: u8, i: u64) -> u64 {
        match self.try_rank(bit, i) {
            Ok(rank) => rank,
            Err(e) => panic!("{e}"),
        }
    }

    /// Count occurrences of `bit` in positions `[0, i)`, reporting an
    /// out-of-range `i` as an error instead of panicking.
    ///
    /// # Panics
    ///
    /// Panics if `bit` is not 0 or 1.
    pub fn try_rank(&self, bit: u8, i: u64) -> Result<u64> {
        assert!(bit <= 1, "bit must be 0 or 1, got {bit}");
        if i > self.n {
            return Err(Error::IndexOutOfBounds(i));
        }
        let ones = self.rank1_inner(i);
        Ok(if bit == 1 { ones } else { i - ones })
    }

    /// Count 1-bits in positions `[0, i)`.
    pub fn rank1(&self, i: u64) -> u64 {
        assert!(
            i <= self.n,
            "rank index out of range: [{i}] (length {})",
            self.n
        );
        self.rank1_inner(i)
    }

    /// Count 0-bits in positions `[0, i)`.
    pub fn rank0(&self, i: u64) -> u64 {
        assert!(
            i <= self.n,
            "rank index out of range: [{i}] (length {})",
            self.n
        );
        i - self.rank1_inner(i)
    }

    fn rank1_inner(&self, i: u64) -> u64 {
        if i == 0 {
            return 0;
        }

        let blk = i / u64::from(self.block_size);
        let rem = (i % u64::from(self.block_size)) as u8;

        // i == n can land one block past the end; the clamp makes the
        // walk below cover that superblock's full block run instead.
        let sb = (blk / u64::from(self.super_block_size)).min(self.num_super_blocks - 1);
        let full_blocks = blk - sb * u64::from(self.super_block_size);

        let mut cursor = sb * self.serialized_super_block_size();
        let mut rank = read_field(&self.encoded, cursor, self.cum_rank_field_size);
        cursor += u64::from(self.cum_rank_field_size);

        for _ in 0..full_blocks {
            rank += u64::from(self.encoded.get8(self.class_field_size, cursor));
            cursor += self.serialized_block_size();
        }

        if rem > 0 {
            let raw = self.decode_block_at(cursor);
            rank += u64::from(popcount(rem, raw));
        }

        rank
    }

    /// Return bit `i` of the original sequence.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len()`.
    pub fn access(&self, i: u64) -> bool {
        assert!(
            i < self.n,
            "access index out of range: [{i}] (length {})",
            self.n
        );
        let blk = i / u64::from(self.block_size);
        let within = (i % u64::from(self.block_size)) as u8;
        let raw = self.decode_block_at(self.block_cursor(blk));
        (raw >> within) & 1 == 1
    }

    /// Position of the k-th 1-bit (0-indexed), or `None` if fewer than
    /// `k + 1` ones exist.
    pub fn select1(&self, k: u64) -> Option<u64> {
        if k >= self.ones {
            return None;
        }
        let target = k + 1;

        // Last superblock with fewer than `target` ones before it; the
        // headers are non-decreasing and header(0) = 0 < target.
        let mut lo = 0u64;
        let mut hi = self.num_super_blocks;
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if self.header(mid) < target {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        let mut cur = self.header(lo);
        let mut cursor = lo * self.serialized_super_block_size()
            + u64::from(self.cum_rank_field_size);
        let first_blk = lo * u64::from(self.super_block_size);
        let last_blk = (first_blk + u64::from(self.super_block_size)).min(self.num_blocks);

        for blk in first_blk..last_blk {
            let class = u64::from(self.encoded.get8(self.class_field_size, cursor));
            if cur + class >= target {
                let raw = self.decode_block_at(cursor);
                let p = nth_bit(raw, self.block_size, true, target - cur)?;
                return Some(blk * u64::from(self.block_size) + u64::from(p));
            }
            cur += class;
            cursor += self.serialized_block_size();
        }
        None
    }

    /// Position of the k-th 0-bit (0-indexed), or `None` if fewer than
    /// `k + 1` zeros exist.
    pub fn select0(&self, k: u64) -> Option<u64> {
        if k >= self.count_zeros() {
            return None;
        }
        let target = k + 1;
        let super_block_bits = u64::from(self.super_block_size) * u64::from(self.block_size);

        // Zeros before superblock sb: its start position minus its header.
        let zeros_before = |sb: u64| sb * super_block_bits - self.header(sb);

        let mut lo = 0u64;
        let mut hi = self.num_super_blocks;
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if zeros_before(mid) < target {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        let mut cur = zeros_before(lo);
        let mut cursor = lo * self.serialized_super_block_size()
            + u64::from(self.cum_rank_field_size);
        let first_blk = lo * u64::from(self.super_block_size);
        let last_blk = (first_blk + u64::from(self.super_block_size)).min(self.num_blocks);

        for blk in first_blk..last_blk {
            let class = u64::from(self.encoded.get8(self.class_field_size, cursor));
            // The padded tail of the last block holds no sequence bits.
            let block_bits = (self.n - blk * u64::from(self.block_size))
                .min(u64::from(self.block_size)) as u8;
            let block_zeros = u64::from(block_bits) - class;
            if cur + block_zeros >= target {
                let raw = self.decode_block_at(cursor);
                let p = nth_bit(raw, block_bits, false, target - cur)?;
                return Some(blk * u64::from(self.block_size) + u64::from(p));
            }
            cur += block_zeros;
            cursor += self.serialized_block_size();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container_of(pattern: &str) -> BitContainer {
        let mut vec = BitContainer::new(pattern.len() as u64);
        for (i, ch) in pattern.chars().enumerate() {
            if ch == '1' {
                vec.set8(1, i as u64, 1);
            }
        }
        vec
    }

    #[test]
    fn test_rank_all_ones() {
        let bits = container_of("1111111111");
        let rrr = Rrr::new(&bits, RrrOptions::default());
        assert_eq!(rrr.rank(1, 10), 10);
        assert_eq!(rrr.rank(0, 10), 0);
        assert_eq!(rrr.rank(1, 5), 5);
    }

    #[test]
    fn test_rank_all_zeros() {
        let bits = container_of("0000000000");
        let rrr = Rrr::new(&bits, RrrOptions::default());
        assert_eq!(rrr.rank(1, 10), 0);
        assert_eq!(rrr.rank(0, 10), 10);
    }

    #[test]
    fn test_rank_alternating() {
        let bits = container_of("1010101010");
        let rrr = Rrr::new(&bits, RrrOptions::default());
        for i in 0..=10u64 {
            assert_eq!(rrr.rank(1, i), i.div_ceil(2), "rank1 at {i}");
            assert_eq!(rrr.rank(0, i), i / 2, "rank0 at {i}");
        }
    }

    #[test]
    fn test_rank_matches_naive_on_random_input() {
        // xorshift64: deterministic input, no external RNG.
        let mut state = 0x9E37_79B9_7F4A_7C15u64;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        };

        let n = 10_000u64;
        let words: Vec<u64> = (0..n.div_ceil(64)).map(|_| next()).collect();
        let bits = BitContainer::from_words(&words, n);
        let rrr = Rrr::new(&bits, RrrOptions::default());

        let naive_rank = |i: u64| -> u64 {
            (0..i)
                .filter(|&p| (words[(p / 64) as usize] >> (p % 64)) & 1 == 1)
                .count() as u64
        };

        for &i in &[0u64, 1, 499, 500, 1000, 4999, 5000, 9999, 10_000] {
            assert_eq!(rrr.rank(1, i), naive_rank(i), "rank1 at {i}");
            assert_eq!(rrr.rank(0, i), i - naive_rank(i), "rank0 at {i}");
        }
    }

    #[test]
    fn test_rank_every_position_with_partial_tail() {
        // 23 bits with block_size 5 leaves a 3-bit padded tail.
        let pattern = "11010011100101101110010";
        let bits = container_of(pattern);
        let rrr = Rrr::new(
            &bits,
            RrrOptions {
                block_size: 5,
                super_block_size: 3,
            },
        );
        let mut expected = 0u64;
        for (i, ch) in pattern.chars().enumerate() {
            assert_eq!(rrr.rank(1, i as u64), expected, "rank1 at {i}");
            if ch == '1' {
                expected += 1;
            }
        }
        assert_eq!(rrr.rank(1, pattern.len() as u64), expected);
    }

    #[test]
    fn test_access_reconstructs_sequence() {
        let pattern = "110100111001011011100101101";
        let bits = container_of(pattern);
        let rrr = Rrr::new(
            &bits,
            RrrOptions {
                block_size: 4,
                super_block_size: 2,
            },
        );
        for (i, ch) in pattern.chars().enumerate() {
            assert_eq!(rrr.access(i as u64), ch == '1', "bit {i}");
        }
    }

    #[test]
    fn test_select1_and_select0() {
        let pattern = "0110010011";
        let bits = container_of(pattern);
        let rrr = Rrr::new(
            &bits,
            RrrOptions {
                block_size: 3,
                super_block_size: 2,
            },
        );

        assert_eq!(rrr.select1(0), Some(1));
        assert_eq!(rrr.select1(1), Some(2));
        assert_eq!(rrr.select1(2), Some(5));
        assert_eq!(rrr.select1(3), Some(8));
        assert_eq!(rrr.select1(4), Some(9));
        assert_eq!(rrr.select1(5), None);

        assert_eq!(rrr.select0(0), Some(0));
        assert_eq!(rrr.select0(1), Some(3));
        assert_eq!(rrr.select0(2), Some(4));
        assert_eq!(rrr.select0(3), Some(6));
        assert_eq!(rrr.select0(4), Some(7));
        assert_eq!(rrr.select0(5), None);
    }

    #[test]
    fn test_select_rank_inverse_on_random_input() {
        let mut state = 0xDEAD_BEEF_CAFE_F00Du64;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        };
        let n = 3000u64;
        let words: Vec<u64> = (0..n.div_ceil(64)).map(|_| next()).collect();
        let bits = BitContainer::from_words(&words, n);
        let rrr = Rrr::new(&bits, RrrOptions::default());

        for k in (0..rrr.count_ones()).step_by(37) {
            let pos = rrr.select1(k).unwrap();
            assert!(pos < n);
            assert_eq!(rrr.rank(1, pos), k);
            assert_eq!(rrr.rank(1, pos + 1), k + 1);
            assert!(rrr.access(pos));
        }
        for k in (0..rrr.count_zeros()).step_by(41) {
            let pos = rrr.select0(k).unwrap();
            assert!(pos < n);
            assert_eq!(rrr.rank(0, pos), k);
            assert!(!rrr.access(pos));
        }
        assert_eq!(rrr.select1(rrr.count_ones()), None);
        assert_eq!(rrr.select0(rrr.count_zeros()), None);
    }

    #[test]
    fn test_default_parameters() {
        let bits = BitContainer::new(1000);
        let rrr = Rrr::new(&bits, RrrOptions::default());
        // floor(log2(1000)) = 9
        assert_eq!(rrr.block_size(), 4);
        assert_eq!(rrr.super_block_size(), 9);
        assert!(rrr.block_size() >= 1 && rrr.block_size() <= 10);
        assert!(rrr.super_block_size() >= 2);
    }

    #[test]
    fn test_invalid_block_size() {
        let bits = BitContainer::new(100);
        let err = Rrr::try_new(
            &bits,
            RrrOptions {
                block_size: 65,
                super_block_size: 0,
            },
        );
        assert!(matches!(err, Err(Error::InvalidBlockSize(65))));
    }

    #[test]
    #[should_panic(expected = "invalid block size")]
    fn test_invalid_block_size_panics() {
        let bits = BitContainer::new(100);
        Rrr::new(
            &bits,
            RrrOptions {
                block_size: 65,
                super_block_size: 0,
            },
        );
    }

    #[test]
    fn test_try_rank_out_of_range() {
        let bits = container_of("1010");
        let rrr = Rrr::new(&bits, RrrOptions::default());
        assert!(matches!(
            rrr.try_rank(1, 5),
            Err(Error::IndexOutOfBounds(5))
        ));
        assert_eq!(rrr.try_rank(1, 4).unwrap(), 2);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_rank_out_of_range_panics() {
        let bits = container_of("1010");
        let rrr = Rrr::new(&bits, RrrOptions::default());
        rrr.rank(1, 5);
    }

    #[test]
    fn test_tiny_inputs_degrade_gracefully() {
        // A 1-byte input must still produce a valid index.
        let bits = container_of("10110001");
        let rrr = Rrr::new(&bits, RrrOptions::default());
        assert_eq!(rrr.count_ones(), 4);
        assert_eq!(rrr.rank(1, 8), 4);
        assert_eq!(rrr.rank(1, 3), 2);

        let empty = BitContainer::new(0);
        let rrr = Rrr::new(&empty, RrrOptions::default());
        assert!(rrr.is_empty());
        assert_eq!(rrr.rank(1, 0), 0);
        assert_eq!(rrr.select1(0), None);
        assert_eq!(rrr.select0(0), None);

        let one = container_of("1");
        let rrr = Rrr::new(&one, RrrOptions::default());
        assert_eq!(rrr.rank(1, 1), 1);
        assert_eq!(rrr.select1(0), Some(0));
    }

    #[test]
    fn test_every_block_size() {
        let pattern: String = (0..130).map(|i| if i % 3 == 0 { '1' } else { '0' }).collect();
        let bits = container_of(&pattern);
        for block_size in 1..=64u8 {
            let rrr = Rrr::new(
                &bits,
                RrrOptions {
                    block_size,
                    super_block_size: 0,
                },
            );
            for i in [0u64, 1, 63, 64, 65, 129, 130] {
                let expected = (0..i).filter(|p| p % 3 == 0).count() as u64;
                assert_eq!(rrr.rank(1, i), expected, "b={block_size} i={i}");
            }
        }
    }
}
