//! Random source used by placement and the tick rules.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Source of every random decision the world makes
pub trait Dice {
    /// Bernoulli draw: true with the given probability
    fn chance(&mut self, probability: f64) -> bool;

    /// Uniform index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

impl Dice for ChaCha8Rng {
    fn chance(&mut self, probability: f64) -> bool {
        self.gen::<f64>() < probability
    }

    fn pick(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

/// Bernoulli draw that does not consult the dice for certain outcomes
pub(crate) fn roll<D: Dice + ?Sized>(dice: &mut D, probability: f64) -> bool {
    if probability >= 1.0 {
        true
    } else if probability <= 0.0 {
        false
    } else {
        dice.chance(probability)
    }
}
