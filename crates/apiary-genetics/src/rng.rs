//! RNG trait abstraction for breeding
//!
//! Breeding draws from the single random source of the world it runs in.
//! Any `rand::Rng` qualifies, so hosts can hand in a seeded generator to get
//! reproducible runs.

/// Random number generator used by breeding code
pub trait WorldRng {
    /// Generate random f32 in [0.0, 1.0)
    fn gen_f32(&mut self) -> f32;
}

impl<T: ?Sized + rand::Rng> WorldRng for T {
    fn gen_f32(&mut self) -> f32 {
        rand::Rng::r#gen(self)
    }
}
