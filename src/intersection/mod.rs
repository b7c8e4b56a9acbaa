//! Sizes of intersections of ascending neighbor lists.
//!
//! The scalar two-pointer merge is the reference; the lane variants compare blocks of 4, 8
//! or 16 neighbors at once and must return exactly the same count. Inputs must be strictly
//! ascending, which every [`CsrGraph`](crate::graph::CsrGraph) neighbor list is. Sortedness
//! is not checked.

pub use lanes::scalar_intersection;

use crate::types::VId;
use log::debug;
use std::cmp::Ordering;

mod lanes;
#[cfg(target_arch = "x86_64")]
mod x86;

/// Counts the common elements of two strictly ascending lists.
///
/// Both lists must be strictly ascending: duplicated values make the lane variants count
/// one element of `u` once for every equal element it meets in a block of `v`.
pub trait Intersect: Sync {
    fn intersection_size(&self, u: &[VId], v: &[VId]) -> usize;
}

/// Number of `i32` lanes compared at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LaneWidth {
    Scalar,
    /// 128-bit lanes.
    X4,
    /// 256-bit lanes.
    X8,
    /// 512-bit lanes.
    X16,
}

impl LaneWidth {
    pub const ALL: [LaneWidth; 4] = [
        LaneWidth::Scalar,
        LaneWidth::X4,
        LaneWidth::X8,
        LaneWidth::X16,
    ];

    pub fn lanes(self) -> usize {
        match self {
            LaneWidth::Scalar => 1,
            LaneWidth::X4 => 4,
            LaneWidth::X8 => 8,
            LaneWidth::X16 => 16,
        }
    }
}

/// Counts how many elements of the first block occur in the second one.
/// Both blocks hold exactly as many elements as the lane width.
pub(crate) type BlockFn = fn(&[VId], &[VId]) -> usize;

#[derive(Debug, Clone, Copy)]
pub(crate) struct BlockKernels {
    pub x4: BlockFn,
    pub x8: BlockFn,
    pub x16: BlockFn,
}

impl BlockKernels {
    fn portable() -> Self {
        Self {
            x4: lanes::match_block::<4>,
            x8: lanes::match_block::<8>,
            x16: lanes::match_block::<16>,
        }
    }

    #[cfg(target_arch = "x86_64")]
    fn native() -> Option<Self> {
        if !is_x86_feature_detected!("sse2") {
            return None;
        }
        let mut kernels = Self {
            x4: x86::match_block_x4,
            ..Self::portable()
        };
        if is_x86_feature_detected!("avx2") {
            kernels.x8 = x86::match_block_x8;
            kernels.x16 = x86::match_block_x16;
        }
        if is_x86_feature_detected!("avx512f") {
            kernels.x16 = x86::match_block_x16_avx512;
        }
        Some(kernels)
    }

    #[cfg(not(target_arch = "x86_64"))]
    fn native() -> Option<Self> {
        None
    }
}

/// The intersection routine handed to the kernels.
///
/// It is chosen once, usually through [`IntersectionStrategy::detect`], and passed
/// explicitly, so every width can be injected in tests.
#[derive(Debug, Clone, Copy)]
pub struct IntersectionStrategy {
    width: LaneWidth,
    kernels: BlockKernels,
    native: bool,
}

impl IntersectionStrategy {
    /// Picks the widest lanes the running CPU supports.
    pub fn detect() -> Self {
        let strategy = Self::new(detect_width());
        debug!(
            "intersection strategy: {:?} (native: {})",
            strategy.width, strategy.native
        );
        strategy
    }

    /// Uses `width` lanes, with SIMD block matching when the CPU has it.
    pub fn new(width: LaneWidth) -> Self {
        match BlockKernels::native() {
            Some(kernels) => Self {
                width,
                kernels,
                native: true,
            },
            None => Self::portable(width),
        }
    }

    /// Uses `width` lanes with plain array block matching.
    pub fn portable(width: LaneWidth) -> Self {
        Self {
            width,
            kernels: BlockKernels::portable(),
            native: false,
        }
    }

    pub fn scalar() -> Self {
        Self::portable(LaneWidth::Scalar)
    }

    pub fn width(&self) -> LaneWidth {
        self.width
    }

    pub fn is_native(&self) -> bool {
        self.native && self.width != LaneWidth::Scalar
    }
}

impl Default for IntersectionStrategy {
    fn default() -> Self {
        Self::detect()
    }
}

impl Intersect for IntersectionStrategy {
    fn intersection_size(&self, u: &[VId], v: &[VId]) -> usize {
        lanes::intersection(u, v, self.width, &self.kernels)
    }
}

#[cfg(target_arch = "x86_64")]
fn detect_width() -> LaneWidth {
    if is_x86_feature_detected!("avx512f") {
        LaneWidth::X16
    } else if is_x86_feature_detected!("avx2") {
        LaneWidth::X8
    } else if is_x86_feature_detected!("sse2") {
        LaneWidth::X4
    } else {
        LaneWidth::Scalar
    }
}

#[cfg(not(target_arch = "x86_64"))]
fn detect_width() -> LaneWidth {
    LaneWidth::Scalar
}

/// Calls `f` on every common element of two strictly ascending lists, in ascending order.
pub fn for_each_common<F: FnMut(VId)>(u: &[VId], v: &[VId], mut f: F) {
    let (mut i, mut j) = (0, 0);
    while i < u.len() && j < v.len() {
        match u[i].cmp(&v[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                f(u[i]);
                i += 1;
                j += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_is_usable() {
        let strategy = IntersectionStrategy::detect();
        assert_eq!(strategy.intersection_size(&[1, 2, 3], &[2, 3, 4]), 2);
    }

    #[test]
    fn test_all_widths_agree() {
        let u: Vec<VId> = (0..100).filter(|x| x % 3 == 0).collect();
        let v: Vec<VId> = (0..100).filter(|x| x % 2 == 0).collect();
        let expected = scalar_intersection(&u, &v);
        assert_eq!(expected, 17);
        for &width in LaneWidth::ALL.iter() {
            assert_eq!(IntersectionStrategy::new(width).intersection_size(&u, &v), expected);
            assert_eq!(
                IntersectionStrategy::portable(width).intersection_size(&u, &v),
                expected
            );
        }
    }

    #[test]
    fn test_for_each_common() {
        let mut common = vec![];
        for_each_common(&[1, 3, 5, 7, 9], &[0, 3, 4, 9, 10], |x| common.push(x));
        assert_eq!(common, vec![3, 9]);
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn test_native_kernels_follow_cpu() {
        let kernels = BlockKernels::native().unwrap();
        if is_x86_feature_detected!("avx512f") {
            assert_eq!(kernels.x16 as usize, x86::match_block_x16_avx512 as usize);
        } else if is_x86_feature_detected!("avx2") {
            assert_eq!(kernels.x16 as usize, x86::match_block_x16 as usize);
        }
        let u: Vec<VId> = (0..200).filter(|x| x % 3 == 0).collect();
        let v: Vec<VId> = (0..200).filter(|x| x % 5 == 0).collect();
        assert_eq!(lanes::intersection(&u, &v, LaneWidth::X16, &kernels), 14);
    }

    #[test]
    fn test_scalar_is_never_native() {
        assert!(!IntersectionStrategy::new(LaneWidth::Scalar).is_native());
        assert!(!IntersectionStrategy::portable(LaneWidth::X16).is_native());
    }
}
