use indexmap::IndexSet;
use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};

/// Source of uniformly distributed values in `[0, 1)` used to pick targets.
pub trait RandomSource: Send {
    /// Next value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

impl<R: RngCore + Send> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Build the random source used by sessions, seeded when a fixed seed is configured.
pub fn random_source(seed: Option<u64>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(StdRng::from_os_rng()),
    }
}

/// Pool of names that have not been answered correctly yet.
pub struct TargetSelector {
    remaining: IndexSet<String>,
    random: Box<dyn RandomSource>,
}

impl TargetSelector {
    /// Empty selector drawing from `random`.
    pub fn new(random: Box<dyn RandomSource>) -> Self {
        Self {
            remaining: IndexSet::new(),
            random,
        }
    }

    /// Replace the pool with `names`, dropping any prior state.
    pub fn initialize<I>(&mut self, names: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.remaining = names.into_iter().collect();
    }

    /// Pick the next target uniformly among the remaining names.
    ///
    /// Returns `None` once the pool is empty, which signals completion. The
    /// picked name stays in the pool until [`TargetSelector::remove`] is called.
    pub fn pick_next(&mut self) -> Option<String> {
        let len = self.remaining.len();
        if len == 0 {
            return None;
        }
        let unit = self.random.next_unit().clamp(0.0, 1.0);
        let index = ((unit * len as f64).floor() as usize).min(len - 1);
        self.remaining.get_index(index).cloned()
    }

    /// Drop a solved name; no-op when absent.
    pub fn remove(&mut self, name: &str) -> bool {
        self.remaining.shift_remove(name)
    }

    /// Number of names left.
    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    /// True when every name has been found.
    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Iterate the remaining names in their stable order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.remaining.iter().map(String::as_str)
    }
}

impl std::fmt::Debug for TargetSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetSelector")
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}
