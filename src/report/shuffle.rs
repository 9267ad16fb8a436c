//! Row Anonymization
//!
//! Leaf directives see the records in a random order so list position does
//! not reveal who answered what. A fixed seed makes the order reproducible;
//! a disabled shuffler keeps input order.

use std::borrow::Cow;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::config::RenderConfig;
use crate::types::Table;

/// Source of record permutations
#[derive(Debug, Clone)]
pub struct RowShuffler {
    rng: Option<StdRng>,
}

impl RowShuffler {
    /// Keep records in input order
    pub fn disabled() -> Self {
        Self { rng: None }
    }

    /// Reproducible permutations
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Some(StdRng::seed_from_u64(seed)),
        }
    }

    /// Permutations seeded from the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: Some(StdRng::from_os_rng()),
        }
    }

    pub fn from_config(render: &RenderConfig) -> Self {
        match (render.shuffle, render.seed) {
            (false, _) => Self::disabled(),
            (true, Some(seed)) => Self::seeded(seed),
            (true, None) => Self::from_entropy(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.rng.is_some()
    }

    /// Full permutation of the records; the header stays in place
    pub fn shuffle<'t>(&mut self, table: &'t Table) -> Cow<'t, Table> {
        match self.rng.as_mut() {
            Some(rng) if table.len() > 1 => {
                let mut records = table.records().to_vec();
                records.shuffle(rng);
                Cow::Owned(table.with_records(records))
            }
            _ => Cow::Borrowed(table),
        }
    }
}
