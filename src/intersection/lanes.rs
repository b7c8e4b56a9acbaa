use super::{BlockFn, BlockKernels, LaneWidth};
use crate::types::VId;
use std::cmp::Ordering;

/// The two-pointer merge shared by every width.
///
/// Every pair of equal elements `(u[p], v[q])` with `p < iu` or `q < iv` has already been
/// counted in `total`, and no pair with `p >= iu` and `q >= iv` has.
struct Merge<'a> {
    u: &'a [VId],
    v: &'a [VId],
    iu: usize,
    iv: usize,
    total: usize,
}

impl<'a> Merge<'a> {
    fn new(u: &'a [VId], v: &'a [VId]) -> Self {
        Self {
            u,
            v,
            iu: 0,
            iv: 0,
            total: 0,
        }
    }

    /// Runs the `L`-lane passes. Returns `false` once no common element can remain.
    fn lanes<const L: usize>(&mut self, match_block: BlockFn) -> bool {
        self.blocks::<L>(match_block) && {
            self.tails::<L>();
            true
        }
    }

    fn blocks<const L: usize>(&mut self, match_block: BlockFn) -> bool {
        let (u, v) = (self.u, self.v);
        let (nu, nv) = (u.len(), v.len());
        while self.iu + L <= nu && self.iv + L <= nv {
            let (iu, iv) = (self.iu, self.iv);
            let (min_u, max_v) = (u[iu], v[iv + L - 1]);
            if min_u > max_v {
                if min_u > v[nv - 1] {
                    return false;
                }
                self.iv += L;
                continue;
            }
            let (min_v, max_u) = (v[iv], u[iu + L - 1]);
            if min_v > max_u {
                if min_v > u[nu - 1] {
                    return false;
                }
                self.iu += L;
                continue;
            }
            self.total += match_block(&u[iu..iu + L], &v[iv..iv + L]);
            if max_u >= max_v {
                self.iv += L;
            }
            if max_u <= max_v {
                self.iu += L;
            }
        }
        true
    }

    /// Once one side has less than `L` elements left, walks the full blocks of the other.
    fn tails<const L: usize>(&mut self) {
        let (u, v) = (self.u, self.v);
        while self.iu + L <= u.len() && self.iv < v.len() {
            let block = &u[self.iu..self.iu + L];
            while self.iv < v.len() && v[self.iv] <= block[L - 1] {
                if block.contains(&v[self.iv]) {
                    self.total += 1;
                }
                self.iv += 1;
            }
            self.iu += L;
        }
        while self.iv + L <= v.len() && self.iu < u.len() {
            let block = &v[self.iv..self.iv + L];
            while self.iu < u.len() && u[self.iu] <= block[L - 1] {
                if block.contains(&u[self.iu]) {
                    self.total += 1;
                }
                self.iu += 1;
            }
            self.iv += L;
        }
    }

    fn scalar(&mut self) -> usize {
        let (u, v) = (self.u, self.v);
        while self.iu < u.len() && self.iv < v.len() {
            if u[self.iu] > v[v.len() - 1] || v[self.iv] > u[u.len() - 1] {
                break;
            }
            match u[self.iu].cmp(&v[self.iv]) {
                Ordering::Equal => {
                    self.total += 1;
                    self.iu += 1;
                    self.iv += 1;
                }
                Ordering::Less => self.iu += 1,
                Ordering::Greater => self.iv += 1,
            }
        }
        self.total
    }
}

/// The reference two-pointer intersection size.
///
/// Stops as soon as the current element of one list exceeds the last element of the other.
pub fn scalar_intersection(u: &[VId], v: &[VId]) -> usize {
    Merge::new(u, v).scalar()
}

/// Runs the widest pass first, then every narrower one, then the scalar remainder.
pub(super) fn intersection(
    u: &[VId],
    v: &[VId],
    width: LaneWidth,
    kernels: &BlockKernels,
) -> usize {
    let mut merge = Merge::new(u, v);
    if width >= LaneWidth::X16 && !merge.lanes::<16>(kernels.x16) {
        return merge.total;
    }
    if width >= LaneWidth::X8 && !merge.lanes::<8>(kernels.x8) {
        return merge.total;
    }
    if width >= LaneWidth::X4 && !merge.lanes::<4>(kernels.x4) {
        return merge.total;
    }
    merge.scalar()
}

/// Compares block `a` against every cyclic rotation of block `b`.
pub(super) fn match_block<const L: usize>(a: &[VId], b: &[VId]) -> usize {
    let (a, b) = (&a[..L], &b[..L]);
    let mut matched = [false; L];
    for (m, (x, y)) in matched.iter_mut().zip(a.iter().zip(b)) {
        *m = x == y;
    }
    if matched.iter().all(|&m| m) {
        return L;
    }
    for rotation in 1..L {
        for (i, m) in matched.iter_mut().enumerate() {
            *m |= a[i] == b[(i + rotation) % L];
        }
    }
    matched.iter().filter(|&&m| m).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_widths(u: &[VId], v: &[VId]) -> Vec<usize> {
        let kernels = BlockKernels::portable();
        LaneWidth::ALL
            .iter()
            .map(|&width| intersection(u, v, width, &kernels))
            .collect()
    }

    #[test]
    fn test_scalar_intersection() {
        assert_eq!(scalar_intersection(&[], &[1, 2]), 0);
        assert_eq!(scalar_intersection(&[1], &[1]), 1);
        assert_eq!(scalar_intersection(&[1, 2, 3], &[4, 5]), 0);
        assert_eq!(scalar_intersection(&[1, 4, 6, 8], &[2, 4, 8, 9]), 2);
    }

    #[test]
    fn test_match_block() {
        assert_eq!(match_block::<4>(&[1, 2, 3, 4], &[1, 2, 3, 4]), 4);
        assert_eq!(match_block::<4>(&[1, 2, 3, 4], &[3, 4, 5, 6]), 2);
        assert_eq!(match_block::<4>(&[1, 3, 5, 7], &[2, 4, 6, 8]), 0);
        let a: Vec<VId> = (0..16).collect();
        let b: Vec<VId> = (8..24).collect();
        assert_eq!(match_block::<16>(&a, &b), 8);
    }

    #[test]
    fn test_lane_boundaries() {
        for len in [0usize, 1, 3, 4, 5, 7, 8, 9, 15, 16, 17, 31, 32, 33].iter() {
            let u: Vec<VId> = (0..*len as VId).collect();
            let v: Vec<VId> = (0..40).map(|x| 2 * x).collect();
            let expected = scalar_intersection(&u, &v);
            assert!(all_widths(&u, &v).iter().all(|&x| x == expected));
            assert!(all_widths(&v, &u).iter().all(|&x| x == expected));
        }
    }

    #[test]
    fn test_disjoint_ranges_skip_blocks() {
        let u: Vec<VId> = (0..64).collect();
        let v: Vec<VId> = (100..164).collect();
        assert_eq!(all_widths(&u, &v), vec![0; 4]);
        let v: Vec<VId> = (60..124).collect();
        assert_eq!(all_widths(&u, &v), vec![4; 4]);
    }
}
