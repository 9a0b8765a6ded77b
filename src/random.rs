use crate::constants::HOPPER_FALLBACK_SEED;
use core::cmp::min;
use rand::{RngCore, SeedableRng};
use std::{
    fs::File,
    io::{self, Read},
};

/// A cumulative table of weighted choices over the full `u64` range. Rolls that land past the
/// last threshold pick nothing.
#[derive(Debug, Clone, Copy)]
pub struct Breakdown<K: Copy, const N: usize> {
    choices: [(K, u64); N],
}

impl<K: Copy, const N: usize> Breakdown<K, N> {
    pub const fn new(probabilities: [(K, u64); N]) -> Self {
        let mut choices = probabilities;
        let mut t = 0u64;
        let mut idx = 0;
        while idx < N {
            t = match t.checked_add(choices[idx].1) {
                Some(t) => t,
                None => panic!("probabilities overflow"),
            };
            choices[idx].1 = t;
            idx += 1;
        }
        Self { choices }
    }

    #[inline]
    pub fn choices(&self) -> &[(K, u64); N] {
        &self.choices
    }

    pub fn pick(&self, rng: &mut impl RngCore) -> Option<K> {
        let roll = rng.next_u64();
        self.choices
            .iter()
            .find_map(|(k, p)| (roll < *p).then_some(*k))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationEvent {
    /// replace an instruction with a freshly drawn one
    Replace,
    /// perturb an instruction in place
    Jitter,
}

pub const fn percent(x: u64) -> u64 {
    x * (u64::MAX / 100)
}

/// Map a probability in `[0, 1]` onto the `u64` threshold scale used by [percent]
pub fn probability(p: f64) -> u64 {
    if p <= 0. {
        0
    } else if p >= 1. {
        u64::MAX
    } else {
        (p * u64::MAX as f64) as u64
    }
}

#[inline]
pub fn chance(rng: &mut impl RngCore, p: u64) -> bool {
    p > rng.next_u64()
}

pub trait Probabilities {
    type Update;
    fn probability(&self, evt: MutationEvent) -> u64;
    fn update(&mut self, stats: Self::Update);
}

pub trait Happens: RngCore + Probabilities {
    fn happens(&mut self, evt: MutationEvent) -> bool;
}

impl<T: RngCore + Probabilities> Happens for T {
    fn happens(&mut self, evt: MutationEvent) -> bool {
        self.probability(evt) > self.next_u64()
    }
}

/// Per-instruction mutation probabilities, stored on the [percent] scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationRates {
    replace: u64,
    jitter: u64,
}

impl MutationRates {
    pub fn new(mutation_rate: f64, replace_rate: f64) -> Self {
        Self {
            replace: probability(replace_rate),
            jitter: probability(mutation_rate),
        }
    }

    pub fn with_overrides(mut self, updates: &[(MutationEvent, u64)]) -> Self {
        for update in updates {
            self.update(*update);
        }
        self
    }
}

impl Default for MutationRates {
    fn default() -> Self {
        Self::new(
            crate::constants::HOPPER_MUTATION_RATE,
            crate::constants::HOPPER_REPLACE_RATE,
        )
    }
}

impl Probabilities for MutationRates {
    type Update = (MutationEvent, u64);
    fn probability(&self, evt: MutationEvent) -> u64 {
        match evt {
            MutationEvent::Replace => self.replace,
            MutationEvent::Jitter => self.jitter,
        }
    }

    fn update(&mut self, (evt, v): Self::Update) {
        match evt {
            MutationEvent::Replace => self.replace = v,
            MutationEvent::Jitter => self.jitter = v,
        }
    }
}

pub struct WyRng {
    state: u64,
}

impl WyRng {
    pub fn seeded(state: u64) -> Self {
        Self { state }
    }
}

impl RngCore for WyRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        const WY_CONST_0: u64 = 0x2d35_8dcc_aa6c_78a5;
        const WY_CONST_1: u64 = 0x8bb8_4b93_962e_acc9;
        self.state = self.state.wrapping_add(WY_CONST_0);
        let t = u128::from(self.state) * u128::from(self.state ^ WY_CONST_1);
        (t as u64) ^ (t >> 64) as u64
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        let mut idx = 0;
        while idx < dst.len() {
            let lim = min(8, dst.len() - idx);
            dst[idx..idx + lim].copy_from_slice(&self.next_u64().to_ne_bytes()[..lim]);
            idx += lim;
        }
    }
}

impl SeedableRng for WyRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::seeded(u64::from_le_bytes(seed))
    }
}

/// Binds a set of [Probabilities] to a source of randomness, so that both can be handed to
/// mutation routines as one value
pub struct ProbBinding<P: Probabilities, R: RngCore> {
    p: P,
    r: R,
}

impl<P: Probabilities, R: RngCore> ProbBinding<P, R> {
    pub fn new(p: P, r: R) -> Self {
        Self { p, r }
    }
}

impl<P: Probabilities, R: RngCore> Probabilities for ProbBinding<P, R> {
    type Update = P::Update;
    fn probability(&self, evt: MutationEvent) -> u64 {
        self.p.probability(evt)
    }

    fn update(&mut self, stats: Self::Update) {
        self.p.update(stats);
    }
}

impl<P: Probabilities, R: RngCore> RngCore for ProbBinding<P, R> {
    fn next_u32(&mut self) -> u32 {
        self.r.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.r.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.r.fill_bytes(dest)
    }
}

pub fn seed_urandom() -> io::Result<u64> {
    let mut file = File::open("/dev/urandom")?;
    let mut buffer = [0u8; 8];
    file.read_exact(&mut buffer)?;
    Ok(u64::from_le_bytes(buffer))
}

pub fn default_rng() -> WyRng {
    let seed = seed_urandom().unwrap_or_else(|err| {
        tracing::warn!(%err, "cannot read /dev/urandom, using the fallback seed");
        HOPPER_FALLBACK_SEED
    });
    WyRng::seeded(seed)
}

/// A generator for one independent `stream` of a run, reproducible when `seed` is given
pub fn stream_rng(seed: Option<u64>, stream: u64) -> WyRng {
    seed.map_or_else(default_rng, |seed| WyRng::seeded(seed.wrapping_add(stream)))
}
