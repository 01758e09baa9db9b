//! Randomness behind the simulated replies

/// Source of uniform integers
pub trait Dice: Send + Sync {
    /// A value in `0..bound`. `bound` is never zero.
    fn below(&self, bound: u64) -> u64;
}

/// Draws from the operating system's RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct OsDice;

impl Dice for OsDice {
    fn below(&self, bound: u64) -> u64 {
        // Redraw values past the last whole multiple of `bound` so every
        // residue is equally likely
        let zone = u64::MAX - u64::MAX % bound;
        loop {
            let mut buf = [0u8; 8];
            if let Err(e) = getrandom::getrandom(&mut buf) {
                tracing::warn!("OS RNG unavailable: {}", e);
                return 0;
            }
            let value = u64::from_le_bytes(buf);
            if value < zone {
                return value % bound;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_dice_in_range() {
        for bound in [1, 2, 3, 5, 2000, u64::MAX / 3 * 2, u64::MAX] {
            for _ in 0..100 {
                assert!(OsDice.below(bound) < bound);
            }
        }
    }

    #[test]
    fn test_os_dice_varies() {
        let rolls: std::collections::HashSet<u64> = (0..50).map(|_| OsDice.below(1000)).collect();
        assert!(rolls.len() > 1);
    }
}
