//! Optimal sub-run partitioning via dynamic programming.

use crate::element::Element;

/// Sub-run lengths the control byte can express, in increasing order. The
/// high control nibble is an index into this table.
pub(crate) const PARTITION_LENGTHS: [usize; 16] =
    [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 16, 32, 64, 128];

/// Longest expressible sub-run.
pub(crate) const MAX_PARTITION: usize = 128;

/// DP state for splitting one block.
///
/// The tables grow to `block len + 1` entries; one `Partitioner` is reused
/// across every block of a stream so they are allocated once instead of
/// occupying a ~512 KiB stack frame per block.
#[derive(Default)]
pub(crate) struct Partitioner {
    cost: Vec<u64>,
    refs: Vec<usize>,
    parts: Vec<usize>,
}

impl Partitioner {
    /// Splits `src` into sub-runs with lengths drawn from
    /// [`PARTITION_LENGTHS`], minimising the total packed size
    /// `sum(ceil(len·width/8))` where each sub-run's width is the rounded
    /// bit need of its largest element.
    ///
    /// Returns the boundary array: strictly increasing, starting at 0 and
    /// ending at `src.len()`. Cost ties go to the longer sub-run, which
    /// keeps the control directory short.
    pub(crate) fn split<E: Element>(&mut self, src: &[E]) -> &[usize] {
        let n = src.len();
        debug_assert!(n >= MAX_PARTITION);

        self.cost.clear();
        self.cost.resize(n + 1, u64::MAX);
        self.refs.clear();
        self.refs.resize(n + 1, 0);

        // Prefixes shorter than the longest sub-run admit only the
        // singleton chain, costed at the raw byte need of each element.
        self.cost[0] = src[0].bits_needed().div_ceil(8) as u64;
        for i in 1..MAX_PARTITION {
            self.refs[i] = i - 1;
            self.cost[i] = self.cost[i - 1] + src[i].bits_needed().div_ceil(8) as u64;
        }

        for i in MAX_PARTITION..=n {
            // The candidate sub-runs [i-len, i) nest as len grows, so the
            // width is a running maximum extended over each new element.
            let mut width = 0usize;
            let mut lo = i;
            for len in PARTITION_LENGTHS {
                let bp = i - len;
                for &v in &src[bp..lo] {
                    width = width.max(E::ROUNDUP[v.bits_needed()] as usize);
                }
                lo = bp;

                let c = self.cost[bp] + ((len * width).div_ceil(8)) as u64;
                if c <= self.cost[i] {
                    self.cost[i] = c;
                    self.refs[i] = bp;
                }
            }
        }

        self.parts.clear();
        let mut next = n;
        while next != 0 {
            self.parts.push(next);
            next = self.refs[next];
        }
        self.parts.push(0);
        self.parts.reverse();
        &self.parts
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    fn lengths(parts: &[usize]) -> Vec<usize> {
        parts.iter().tuple_windows().map(|(a, b)| b - a).collect()
    }

    /// 128 zeros, then short runs of ones separated by all-bits sentinels.
    fn sentinel_fixture() -> Vec<u32> {
        let mut src = vec![0u32; 128];
        for run in [8usize, 4, 6, 7, 2] {
            src.push(u32::MAX);
            src.extend(std::iter::repeat_n(1u32, run));
        }
        src
    }

    #[test]
    fn test_uniform_prefix_is_one_partition() {
        let src = sentinel_fixture();
        let mut splitter = Partitioner::default();
        let parts = splitter.split(&src[..128]);
        assert_eq!(parts, &[0, 128]);
    }

    #[test]
    fn test_sentinels_isolate_runs() {
        let src = sentinel_fixture();
        assert_eq!(src.len(), 160);
        let mut splitter = Partitioner::default();
        let parts = splitter.split(&src);
        assert_eq!(lengths(parts), [128, 1, 8, 1, 4, 1, 6, 1, 7, 1, 2]);
    }

    #[test]
    fn test_boundaries_are_well_formed() {
        // A value mix that exercises several widths.
        let src: Vec<u64> = (0..1000u64)
            .map(|i| (i.wrapping_mul(2654435761)) >> (i % 48))
            .collect();
        let mut splitter = Partitioner::default();
        let parts = splitter.split(&src);

        assert_eq!(*parts.first().unwrap(), 0);
        assert_eq!(*parts.last().unwrap(), src.len());
        for (&lo, &hi) in parts.iter().tuple_windows() {
            assert!(lo < hi);
            assert!(PARTITION_LENGTHS.contains(&(hi - lo)));
        }
    }

    #[test]
    fn test_tie_break_prefers_long_runs() {
        // All-equal input: one 128 sub-run beats any split of equal cost.
        let src = vec![5u32; 256];
        let mut splitter = Partitioner::default();
        let parts = splitter.split(&src);
        assert_eq!(lengths(parts), [128, 128]);
    }
}
