//! Fast PRNG for battle resolution. Uses SplitMix64 for throughput and good statistical quality.
//! Deterministic: same seed produces the same sequence. Not cryptographically secure.
//!
//! Every random decision in the combat core (crit rolls, targeting, move picks, confusion)
//! draws from one injected `Rng` so whole battles are replayable from a single seed.

const SPLITMIX64_GOLDEN: u64 = 0x9e3779b97f4a7c15;
const SPLITMIX64_M1: u64 = 0xbf58476d1ce4e5b9;
const SPLITMIX64_M2: u64 = 0x94d049bb133111eb;

#[derive(Debug, Clone, Copy)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seed from OS entropy. Falls back to a fixed seed if the entropy source fails,
    /// which keeps the battle playable rather than aborting.
    pub fn from_entropy() -> Self {
        let mut bytes = [0u8; 8];
        if getrandom::getrandom(&mut bytes).is_err() {
            return Self::new(0x4d41_5449_4e45_4531);
        }
        Self::new(u64::from_le_bytes(bytes))
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(SPLITMIX64_GOLDEN);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX64_M1);
        z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX64_M2);
        z ^ (z >> 31)
    }

    /// Uniform f64 in [0, 1).
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// True with probability `p`. Non-finite or non-positive `p` never fires; `p >= 1` always fires.
    #[inline]
    pub fn chance(&mut self, p: f64) -> bool {
        if !p.is_finite() || p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.next_f64() < p
    }

    /// Uniform integer in [lo, hi] inclusive. Returns `lo` when the range is empty or inverted.
    #[inline]
    pub fn range_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        let span = u64::from(hi - lo) + 1;
        lo + (self.next_u64() % span) as u32
    }

    /// Uniform index into a slice of length `len`. Returns 0 for `len <= 1`; callers
    /// check emptiness themselves (the combat core always does).
    #[inline]
    pub fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        (self.next_u64() % len as u64) as usize
    }

    /// Weighted pick over `weights`. Non-finite or negative weights count as zero;
    /// if every weight is zero the last index wins (a cumulative scan that never
    /// crosses the roll). Returns None for an empty slice.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        if weights.is_empty() {
            return None;
        }
        let sane = |w: f64| if w.is_finite() && w > 0.0 { w } else { 0.0 };
        let total: f64 = weights.iter().copied().map(sane).sum();
        if total <= 0.0 {
            return Some(weights.len() - 1);
        }
        let mut roll = self.next_f64() * total;
        for (i, &w) in weights.iter().enumerate() {
            roll -= sane(w);
            if roll <= 0.0 {
                return Some(i);
            }
        }
        Some(weights.len() - 1)
    }
}
