//! Sapling that grows into a tree once enough seeds sit in its zone.

use std::{collections::HashSet, hash::Hash};

/// Default number of seeds the sapling needs.
pub const DEFAULT_REQUIRED_SEEDS: usize = 4;

/// Outcome of interacting with the sapling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaplingInteraction<S> {
    /// The sapling became a tree; these seeds were consumed.
    Grown { consumed: Vec<S> },
    /// Nothing left to do.
    AlreadyGrown,
    /// Not enough seeds in the zone yet.
    NeedSeeds { have: usize, need: usize },
}

/// Seed-counting state machine, generic over the seed identifier.
#[derive(Debug, Clone)]
pub struct SaplingPuzzle<S> {
    required_seeds: usize,
    seeds_in_zone: HashSet<S>,
    grown: bool,
}

impl<S: Eq + Hash + Copy> Default for SaplingPuzzle<S> {
    fn default() -> Self {
        Self::new(DEFAULT_REQUIRED_SEEDS)
    }
}

impl<S: Eq + Hash + Copy> SaplingPuzzle<S> {
    pub fn new(required_seeds: usize) -> Self {
        Self {
            required_seeds,
            seeds_in_zone: HashSet::new(),
            grown: false,
        }
    }

    pub fn required_seeds(&self) -> usize {
        self.required_seeds
    }

    pub fn seed_count(&self) -> usize {
        self.seeds_in_zone.len()
    }

    pub fn is_grown(&self) -> bool {
        self.grown
    }

    /// All seeds are present and the sapling has not grown yet.
    pub fn can_grow(&self) -> bool {
        !self.grown && self.seeds_in_zone.len() >= self.required_seeds
    }

    /// A seed entered the detection zone. Ignored once grown.
    pub fn seed_entered(&mut self, seed: S) {
        if self.grown {
            return;
        }
        if self.seeds_in_zone.insert(seed) {
            tracing::info!(
                "Seed entered zone ({}/{})",
                self.seeds_in_zone.len(),
                self.required_seeds
            );
        }
    }

    /// A seed left the detection zone. Ignored once grown.
    pub fn seed_left(&mut self, seed: S) {
        if self.grown {
            return;
        }
        if self.seeds_in_zone.remove(&seed) {
            tracing::info!(
                "Seed left zone ({}/{})",
                self.seeds_in_zone.len(),
                self.required_seeds
            );
        }
    }

    /// Try to grow the sapling.
    pub fn interact(&mut self) -> SaplingInteraction<S> {
        if self.grown {
            return SaplingInteraction::AlreadyGrown;
        }
        if !self.can_grow() {
            return SaplingInteraction::NeedSeeds {
                have: self.seeds_in_zone.len(),
                need: self.required_seeds,
            };
        }

        self.grown = true;
        let consumed: Vec<S> = self.seeds_in_zone.drain().collect();
        tracing::info!("Sapling grew into a tree, {} seeds consumed", consumed.len());
        SaplingInteraction::Grown { consumed }
    }
}
