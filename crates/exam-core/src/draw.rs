//! Random source injected into composition.
//!
//! Every [`rand::Rng`] is a [`DrawSource`], so production code passes
//! `rand::rng()` while tests pass a seeded `StdRng` or a scripted stub.

use rand::Rng;

/// Picks which of the remaining candidates is drawn next.
pub trait DrawSource {
    /// Return an index in `0..len`. Callers never pass `len == 0`.
    fn draw_index(&mut self, len: usize) -> usize;
}

impl<R: Rng> DrawSource for R {
    fn draw_index(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}
