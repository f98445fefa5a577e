use rand::Rng;

pub const UPPER_BOUND: u64 = 500_000;

/// Uniform over `[1, upper_bound]`. Range sampling rejects rather than reduces modulo.
pub fn random_fid<R: Rng>(rng: &mut R, upper_bound: u64) -> u64 {
    rng.gen_range(1..=upper_bound.max(1))
}
