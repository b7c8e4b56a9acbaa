//! SSE2, AVX2 and AVX-512 block matching.
//!
//! The safe wrappers are only handed out by `BlockKernels::native`, after the CPU features
//! they need have been detected.

use crate::types::VId;
use std::arch::x86_64::*;

pub(super) fn match_block_x4(a: &[VId], b: &[VId]) -> usize {
    assert!(a.len() >= 4 && b.len() >= 4);
    unsafe { match_block_sse2(a.as_ptr(), b.as_ptr()) }
}

pub(super) fn match_block_x8(a: &[VId], b: &[VId]) -> usize {
    assert!(a.len() >= 8 && b.len() >= 8);
    unsafe { match_block_avx2(a.as_ptr(), b.as_ptr()) }
}

pub(super) fn match_block_x16_avx512(a: &[VId], b: &[VId]) -> usize {
    assert!(a.len() >= 16 && b.len() >= 16);
    unsafe { match_block_avx512(a.as_ptr(), b.as_ptr()) }
}

/// Without AVX-512, a 16-lane block is matched as four 8-lane quadrants. Elements are distinct, so each
/// element of `a` matches in at most one quadrant and the counts add up.
pub(super) fn match_block_x16(a: &[VId], b: &[VId]) -> usize {
    assert!(a.len() >= 16 && b.len() >= 16);
    unsafe {
        let (a0, a1) = (a.as_ptr(), a.as_ptr().add(8));
        let (b0, b1) = (b.as_ptr(), b.as_ptr().add(8));
        match_block_avx2(a0, b0)
            + match_block_avx2(a0, b1)
            + match_block_avx2(a1, b0)
            + match_block_avx2(a1, b1)
    }
}

#[target_feature(enable = "sse2")]
unsafe fn match_block_sse2(a: *const VId, b: *const VId) -> usize {
    let va = _mm_loadu_si128(a as *const __m128i);
    let vb = _mm_loadu_si128(b as *const __m128i);
    let m0 = _mm_cmpeq_epi32(va, vb);
    // rotations by one, two and three lanes
    let m1 = _mm_cmpeq_epi32(va, _mm_shuffle_epi32(vb, 0x39));
    let m2 = _mm_cmpeq_epi32(va, _mm_shuffle_epi32(vb, 0x4e));
    let m3 = _mm_cmpeq_epi32(va, _mm_shuffle_epi32(vb, 0x93));
    let m = _mm_or_si128(_mm_or_si128(m0, m1), _mm_or_si128(m2, m3));
    (_mm_movemask_ps(_mm_castsi128_ps(m)) as u32).count_ones() as usize
}

#[target_feature(enable = "avx2")]
unsafe fn match_block_avx2(a: *const VId, b: *const VId) -> usize {
    let va = _mm256_loadu_si256(a as *const __m256i);
    let vb = _mm256_loadu_si256(b as *const __m256i);
    let mut m = _mm256_cmpeq_epi32(va, vb);
    if _mm256_movemask_ps(_mm256_castsi256_ps(m)) == 0xff {
        return 8;
    }
    for r in 1..8 {
        let rotation = _mm256_setr_epi32(
            r,
            (r + 1) & 7,
            (r + 2) & 7,
            (r + 3) & 7,
            (r + 4) & 7,
            (r + 5) & 7,
            (r + 6) & 7,
            (r + 7) & 7,
        );
        let rotated = _mm256_permutevar8x32_epi32(vb, rotation);
        m = _mm256_or_si256(m, _mm256_cmpeq_epi32(va, rotated));
    }
    (_mm256_movemask_ps(_mm256_castsi256_ps(m)) as u32).count_ones() as usize
}

#[target_feature(enable = "avx512f")]
unsafe fn match_block_avx512(a: *const VId, b: *const VId) -> usize {
    let va = _mm512_loadu_epi32(a);
    let vb = _mm512_loadu_epi32(b);
    let mut m = _mm512_cmpeq_epi32_mask(va, vb);
    if m == 0xffff {
        return 16;
    }
    let mut rotation = [0 as VId; 16];
    for r in 1..16 {
        for (i, lane) in rotation.iter_mut().enumerate() {
            *lane = ((i + r) & 15) as VId;
        }
        let rotated = _mm512_permutexvar_epi32(_mm512_loadu_epi32(rotation.as_ptr()), vb);
        m |= _mm512_cmpeq_epi32_mask(va, rotated);
    }
    m.count_ones() as usize
}
