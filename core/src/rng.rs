//! Seeded random source shared by live play and replay verification.
//!
//! Tile generation only ever draws through [`TileRng`], so a game replayed
//! from the same seed and move list sees exactly the same spawns as the game
//! that was played.

use alloc::vec::Vec;

/// Reproducible random source consumed by tile generation.
///
/// Implementations must be deterministic: two instances built from the same
/// seed and driven through the same calls return the same values.
pub trait TileRng {
    /// Next raw 32-bit output.
    fn next_word(&mut self) -> u32;

    /// Uniform value in `[0, 1)` with 32 bits of resolution.
    fn next_unit(&mut self) -> f64 {
        f64::from(self.next_word()) / 4_294_967_296.0
    }

    /// Uniform index in `0..bound`; `bound` must be non-zero.
    ///
    /// Computed as `floor(unit * bound)` in integer arithmetic, which is exact.
    fn next_index(&mut self, bound: usize) -> usize {
        ((u128::from(self.next_word()) * bound as u128) >> 32) as usize
    }

    /// `true` with probability `probability`.
    fn next_bool(&mut self, probability: f64) -> bool {
        self.next_unit() <= probability
    }

    /// Uniformly picks an item, drawing nothing from an empty slice.
    fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            items.get(self.next_index(items.len()))
        }
    }

    /// `amount` distinct indices from `0..population`.
    ///
    /// Shuffles the whole population back to front, one draw per position
    /// but the first, then keeps the leading `amount` entries. The number of
    /// draws depends only on `population`.
    fn sample_indices(&mut self, population: usize, amount: usize) -> Vec<usize> {
        let mut items: Vec<usize> = (0..population).collect();
        for i in (1..population).rev() {
            let j = self.next_index(i + 1);
            items.swap(i, j);
        }
        items.truncate(amount);
        items
    }
}

/// Xorshift32 generator seeded by the FNV-1a hash of a text seed.
///
/// This is the same generator the browser client runs. Together with the
/// draw order of [`SpawnGenerator`](crate::SpawnGenerator), a seed handed
/// out by the server reproduces the client's spawns bit for bit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedRng {
    state: u32,
}

impl SeedRng {
    const FNV_OFFSET: u32 = 0x811c_9dc5;
    const FNV_PRIME: u32 = 0x0100_0193;
    /// Xorshift never leaves the zero state, so a zero hash is remapped.
    const ZERO_STATE: u32 = 0x6d2b_79f5;

    pub fn new(seed: &str) -> Self {
        Self::from_seed_bytes(seed.as_bytes())
    }

    pub fn from_seed_bytes(seed: &[u8]) -> Self {
        let hash = seed.iter().fold(Self::FNV_OFFSET, |hash, &byte| {
            (hash ^ u32::from(byte)).wrapping_mul(Self::FNV_PRIME)
        });
        Self::from_state(hash)
    }

    pub const fn from_state(state: u32) -> Self {
        Self {
            state: if state == 0 { Self::ZERO_STATE } else { state },
        }
    }

    pub const fn state(&self) -> u32 {
        self.state
    }
}

impl TileRng for SeedRng {
    fn next_word(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl rand::RngCore for SeedRng {
    fn next_u32(&mut self) -> u32 {
        self.next_word()
    }

    fn next_u64(&mut self) -> u64 {
        let low = u64::from(self.next_word());
        let high = u64::from(self.next_word());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.next_word().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl rand::SeedableRng for SeedRng {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::from_state(u32::from_le_bytes(seed))
    }
}
