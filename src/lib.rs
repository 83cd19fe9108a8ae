//! # RRR: Entropy-Compressed Rank
//!
//! *Store the bits at their entropy, keep rank almost free.*
//!
//! ## Intuition First
//!
//! Picture a bookshelf where every run of identical books is replaced by
//! a little card saying "7 red ones here". The shelf shrinks to the
//! size of its actual variety. The trick of RRR is that you can still
//! walk up and ask "how many red books before slot 9000?" and get the
//! answer by reading two or three cards, never by re-expanding the
//! shelf.
//!
//! ## The Problem
//!
//! A plain bit vector with a rank directory answers rank in $O(1)$ but
//! stores all $n$ bits even when the sequence is heavily skewed.
//! General-purpose compression reaches the entropy $n H_0(B)$ but
//! answers no queries without decompressing. RRR takes both: space
//! $n H_0(B) + o(n)$ bits, rank in $O(\log n)$ field reads (constant
//! word operations per read).
//!
//! ## Historical Context
//!
//! ```text
//! 1989  Jacobson    rank/select directories over plain bit vectors
//! 2002  Raman-Raman-Rao  block (class, offset) encoding: the "RRR" scheme
//! 2005  Grossi et al.    RRR inside compressed text indexes
//! 2008  Claude-Navarro   practical RRR: engineering the block tables
//! ```
//!
//! The Raman-Raman-Rao insight: a $b$-bit block with $c$ ones is fully
//! described by $c$ plus its index among the $C(b, c)$ patterns of that
//! popcount. Skewed blocks have tiny classes and shrink to almost
//! nothing; summed over the sequence the offsets meet the entropy bound.
//!
//! ## Mathematical Formulation
//!
//! For a block $V$ of width $b$ with class $c$, the offset is the rank
//! of $V$ in the combinatorial number system: with set-bit positions
//! $p_1 < \dots < p_c$,
//! $\mathrm{offset}(V) = \sum_{j} C(p_j, j) \in [0, C(b, c))$.
//!
//! A superblock of $s$ blocks carries a cumulative-rank header, so
//! $\mathrm{rank}_1(i)$ = header + (classes of the blocks before $i$'s
//! block) + (popcount of a decoded prefix).
//!
//! ## Complexity Analysis
//!
//! - **Time**: $O(s + b)$ per rank; $O(\log n)$ superblock binary search
//!   plus $O(s + b)$ per select.
//! - **Space**: $n H_0(B) + o(n)$ bits with the default
//!   $b = \lfloor \log_2 n \rfloor / 2$, $s = \lfloor \log_2 n \rfloor$.
//!
//! ## What Could Go Wrong
//!
//! 1. **Field widths**: a class field of $\lfloor \log_2 b \rfloor$ bits
//!    silently corrupts all-ones blocks when $b$ is a power of two. All
//!    field widths here carry the extra bit.
//! 2. **Static only**: the directory is rebuilt from scratch for any
//!    change to the bits; there is deliberately no mutation API.
//!
//! ## Implementation Notes
//!
//! This crate provides:
//! - **[`BitContainer`]**: packed storage of 1-64 bit fields at
//!   arbitrary bit offsets.
//! - **[`Rrr`]**: the compressed index with `rank`, `select1`/`select0`
//!   and `access`.
//! - **[`ImplicitIndex`]**: the uncompressed linear-scan baseline.
//!
//! ## References
//!
//! - Raman, R., Raman, V., & Rao, S. S. (2002). "Succinct indexable
//!   dictionaries with applications to encoding k-ary trees and
//!   multisets."
//! - Claude, F., & Navarro, G. (2008). "Practical rank/select queries
//!   over arbitrary sequences."

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod binom;
pub mod block;
pub mod container;
pub mod error;
pub mod implicit;
pub mod rrr;

pub use container::BitContainer;
pub use error::Error;
pub use implicit::ImplicitIndex;
pub use rrr::{Rrr, RrrOptions};
