//! Hand-off of in-run economy values to a persistent store.

use serde::{Deserialize, Serialize};

/// Currency totals mirrored outside the simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomyTotals {
    /// Gold carried between runs.
    pub gold: u32,
    /// Diamonds carried between runs.
    pub diamonds: u32,
}

/// Persistent store the simulation mirrors its economy into.
pub trait EconomyLedger {
    /// Totals a new run starts from.
    fn totals(&self) -> EconomyTotals;

    /// Records the latest in-run totals.
    fn record(&mut self, totals: EconomyTotals);
}

/// Ledger that keeps totals in memory for the lifetime of the process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InMemoryLedger {
    totals: EconomyTotals,
    writes: usize,
}

impl InMemoryLedger {
    /// Creates a ledger seeded with `totals`.
    #[must_use]
    pub const fn new(totals: EconomyTotals) -> Self {
        Self { totals, writes: 0 }
    }

    /// Number of records received so far.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }
}

impl EconomyLedger for InMemoryLedger {
    fn totals(&self) -> EconomyTotals {
        self.totals
    }

    fn record(&mut self, totals: EconomyTotals) {
        self.totals = totals;
        self.writes += 1;
    }
}
