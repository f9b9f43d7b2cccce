// First-match segment lookup, bucketed by y.
//
// Answers "which is the first segment, in input order, whose closed y interval
// contains this y?" exactly like a linear scan would, but only looks at the
// segments whose interval touches the query's bucket.

use crate::curve::LineSegment;

const MAX_BUCKETS: usize = 256;

pub struct SegmentIndex<'a> {
    segments: &'a [LineSegment],
    lo: f64,
    hi: f64,
    bucket_height: f64,
    buckets: Vec<Vec<u32>>, // segment indices, ascending
}

impl<'a> SegmentIndex<'a> {
    pub fn new(segments: &'a [LineSegment]) -> Self {
        // Bucket range spans the finite endpoints only.
        let (lo, hi) = segments
            .iter()
            .flat_map(|s| [s.y1, s.y2])
            .filter(|y| y.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| (lo.min(y), hi.max(y)));

        if lo > hi {
            return Self { segments, lo, hi, bucket_height: 1.0, buckets: Vec::new() };
        }

        let count = if hi > lo { segments.len().clamp(1, MAX_BUCKETS) } else { 1 };
        let bucket_height = if hi > lo { (hi - lo) / count as f64 } else { 1.0 };
        let mut index = Self { segments, lo, hi, bucket_height, buckets: vec![Vec::new(); count] };

        for (i, s) in segments.iter().enumerate() {
            let (a, b) = s.y_interval();
            // NaN endpoints never contain anything; intervals entirely outside
            // [lo, hi] cannot match an in-range query.
            if a.is_nan() || b.is_nan() || b < lo || a > hi {
                continue;
            }
            let (first, last) = (index.bucket_of(a), index.bucket_of(b));
            for bucket in &mut index.buckets[first..=last] {
                bucket.push(i as u32);
            }
        }
        index
    }

    /// Bucket for a value, clamped into range. Monotone in `y`, so every bucket a
    /// contained query can land in lies between the buckets of the interval ends.
    #[inline]
    fn bucket_of(&self, y: f64) -> usize {
        let last = self.buckets.len() - 1;
        let pos = ((y - self.lo) / self.bucket_height).floor();
        if pos <= 0.0 {
            0
        } else if pos >= last as f64 {
            last
        } else {
            pos as usize
        }
    }

    /// First segment (input order) whose interval contains `y`.
    pub fn find(&self, y: f64) -> Option<&'a LineSegment> {
        if self.buckets.is_empty() || !(y >= self.lo && y <= self.hi) {
            // Out of range (or NaN): only non-finite intervals could match.
            return self.segments.iter().find(|s| s.contains_y(y));
        }
        self.buckets[self.bucket_of(y)]
            .iter()
            .map(|&i| &self.segments[i as usize])
            .find(|s| s.contains_y(y))
    }
}
