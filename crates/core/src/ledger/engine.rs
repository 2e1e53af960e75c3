//! Per-entity running balance computation.
//!
//! For one entity and one [`DateWindow`]:
//! 1. Opening = signed sum of postings dated strictly before the start.
//! 2. In-window postings are ordered by `(date, transaction_id)` and each
//!    carries `opening + cumulative signed sum` as its running balance.
//! 3. Closing = opening + signed in-window sum.
//!
//! Postings after the end bound are ignored.

use banquet_shared::types::{DateWindow, EntityId};
use rayon::prelude::*;
use rust_decimal::Decimal;

use super::balance::{BalanceSnapshot, normalize_zero};
use super::types::{Posting, SignConvention};

/// A posting placed in a ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry<T> {
    /// The underlying transaction.
    pub posting: T,
    /// Signed contribution under the ledger's sign convention.
    pub contribution: Decimal,
    /// Balance after this posting, opening included.
    pub running_balance: Decimal,
}

/// Computed ledger of one entity over one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityLedger<T> {
    /// Ledger owner.
    pub entity_id: EntityId,
    /// Balance carried into the window.
    pub opening: BalanceSnapshot,
    /// In-window postings in `(date, transaction_id)` order.
    pub entries: Vec<LedgerEntry<T>>,
    /// Balance at the end of the window.
    pub closing: BalanceSnapshot,
}

impl<T> EntityLedger<T> {
    /// True when at least one posting falls inside the window.
    #[must_use]
    pub fn has_movement(&self) -> bool {
        !self.entries.is_empty()
    }

    /// True when the opening or the closing balance is non-zero.
    #[must_use]
    pub fn has_balance(&self) -> bool {
        !self.opening.balance.is_zero() || !self.closing.balance.is_zero()
    }
}

/// Running balance engine for one sign convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerEngine {
    sign: SignConvention,
}

impl LedgerEngine {
    /// Creates an engine.
    #[must_use]
    pub const fn new(sign: SignConvention) -> Self {
        Self { sign }
    }

    /// Computes the ledger of one entity.
    ///
    /// `postings` may arrive in any order and may include rows outside the
    /// window; they are classified here.
    pub fn compute<T: Posting>(
        &self,
        entity_id: EntityId,
        window: &DateWindow,
        postings: Vec<T>,
    ) -> EntityLedger<T> {
        let mut opening = Decimal::ZERO;
        let mut in_window = Vec::with_capacity(postings.len());

        for posting in postings {
            let date = posting.posted_on();
            if window.is_after_end(date) {
                continue;
            }
            if window.is_before_start(date) {
                opening += self.contribution_of(&posting);
            } else {
                in_window.push(posting);
            }
        }

        in_window.sort_by_key(|p| (p.posted_on(), p.transaction_id()));

        let opening = normalize_zero(opening);
        let mut running = opening;
        let entries: Vec<LedgerEntry<T>> = in_window
            .into_iter()
            .map(|posting| {
                let contribution = self.contribution_of(&posting);
                running += contribution;
                LedgerEntry {
                    posting,
                    contribution,
                    running_balance: normalize_zero(running),
                }
            })
            .collect();

        EntityLedger {
            entity_id,
            opening: BalanceSnapshot {
                entity_id,
                as_of: window.start(),
                balance: opening,
            },
            entries,
            closing: BalanceSnapshot {
                entity_id,
                as_of: window.end(),
                balance: normalize_zero(running),
            },
        }
    }

    /// Computes several independent ledgers in parallel.
    ///
    /// Output order matches input order.
    pub fn compute_many<T: Posting + Send>(
        &self,
        window: &DateWindow,
        groups: Vec<(EntityId, Vec<T>)>,
    ) -> Vec<EntityLedger<T>> {
        groups
            .into_par_iter()
            .map(|(entity_id, postings)| self.compute(entity_id, window, postings))
            .collect()
    }

    fn contribution_of<T: Posting>(&self, posting: &T) -> Decimal {
        self.sign.signed(posting.direction(), posting.magnitude())
    }
}
