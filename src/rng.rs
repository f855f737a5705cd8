//! Deterministic pseudo-random stream for effects
//!
//! Cooling, sparking and sparkle placement all draw from this stream.
//! Seeded explicitly so simulation runs are reproducible.

/// SplitMix64-based generator (no floats, no global state)
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Next 32 random bits
    #[allow(clippy::cast_possible_truncation)]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        (z ^ (z >> 31)) as u32
    }

    /// Next random byte
    #[allow(clippy::cast_possible_truncation)]
    pub fn next_u8(&mut self) -> u8 {
        (self.next_u32() & 0xFF) as u8
    }

    /// Uniform value in `0..bound` (`0` when `bound == 0`)
    #[allow(clippy::cast_possible_truncation)]
    pub fn next_below(&mut self, bound: u16) -> u16 {
        if bound == 0 {
            return 0;
        }
        (u32::from(bound) * u32::from(self.next_u32() as u16) >> 16) as u16
    }
}
