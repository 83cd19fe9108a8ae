#![no_main]
use libfuzzer_sys::fuzz_target;
use rrrbits::{BitContainer, Rrr, RrrOptions};

fuzz_target!(|data: (u16, Vec<(u8, u8, u64, u64)>, u8)| {
    let (len_raw, ops, block_size_raw) = data;
    let len = u64::from(len_raw % 2048);
    if len == 0 {
        return;
    }

    let mut vec = BitContainer::new(len);
    let mut shadow = vec![false; len as usize];

    for (width_sel, bitsize_seed, pos_seed, value) in ops {
        let width = 8u8 << (width_sel % 4);
        let bitsize = 1 + bitsize_seed % width;
        if len < u64::from(bitsize) {
            continue;
        }
        let i = pos_seed % (len - u64::from(bitsize) + 1);

        match width {
            8 => vec.set8(bitsize, i, value as u8),
            16 => vec.set16(bitsize, i, value as u16),
            32 => vec.set32(bitsize, i, value as u32),
            _ => vec.set64(bitsize, i, value),
        }
        for p in 0..u64::from(bitsize) {
            shadow[(i + p) as usize] = (value >> p) & 1 == 1;
        }

        let mask = if bitsize == 64 {
            u64::MAX
        } else {
            (1u64 << bitsize) - 1
        };
        assert_eq!(vec.get64(bitsize, i), value & mask);
    }

    for (i, &bit) in shadow.iter().enumerate() {
        assert_eq!(vec.get8(1, i as u64) == 1, bit, "bit {i} disturbed");
    }

    // Index the fuzzed bits and cross-check every query path.
    let rrr = Rrr::new(
        &vec,
        RrrOptions {
            block_size: block_size_raw % 65,
            super_block_size: 0,
        },
    );

    let mut ones = 0u64;
    for (i, &bit) in shadow.iter().enumerate() {
        assert_eq!(rrr.rank1(i as u64), ones, "rank1 at {i}");
        assert_eq!(rrr.access(i as u64), bit, "access at {i}");
        if bit {
            ones += 1;
        }
    }
    assert_eq!(rrr.rank1(len), ones);
    assert_eq!(rrr.count_ones(), ones);

    if ones > 0 {
        let pos = rrr.select1(ones - 1).expect("last one must be selectable");
        assert!(shadow[pos as usize]);
        assert_eq!(rrr.rank1(pos), ones - 1);
    }
    assert_eq!(rrr.select1(ones), None);
});
