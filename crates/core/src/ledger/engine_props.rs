//! Tests for the running balance engine.
//!
//! - Property: Balance continuity
//! - Property: In-window ordering
//! - Property: Idempotence
//! - Scenario: carry-forward across two windows

use banquet_shared::types::{DateWindow, EntityId, TransactionId};
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::engine::LedgerEngine;
use super::types::{Direction, Posting, SignConvention};

#[derive(Debug, Clone, PartialEq, Eq)]
struct TestPosting {
    id: i64,
    date: NaiveDate,
    direction: Direction,
    amount: Decimal,
}

impl Posting for TestPosting {
    fn transaction_id(&self) -> TransactionId {
        TransactionId(self.id)
    }

    fn posted_on(&self) -> NaiveDate {
        self.date
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn magnitude(&self) -> Decimal {
        self.amount
    }
}

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).unwrap()
}

fn posting(id: i64, date: NaiveDate, direction: Direction, amount: Decimal) -> TestPosting {
    TestPosting {
        id,
        date,
        direction,
        amount,
    }
}

/// +100 on 1/1, -30 on 1/15, +50 on 2/1.
fn scenario() -> Vec<TestPosting> {
    vec![
        posting(3, date(2, 1), Direction::Inflow, dec!(50)),
        posting(1, date(1, 1), Direction::Inflow, dec!(100)),
        posting(2, date(1, 15), Direction::Outflow, dec!(30)),
    ]
}

fn engine() -> LedgerEngine {
    LedgerEngine::new(SignConvention::InflowPositive)
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_window_inside_history() {
    let window = DateWindow::new(Some(date(1, 10)), Some(date(1, 20))).unwrap();
    let ledger = engine().compute(EntityId(1), &window, scenario());

    assert_eq!(ledger.opening.balance, dec!(100));
    assert_eq!(ledger.entries.len(), 1);
    assert_eq!(ledger.entries[0].posting.id, 2);
    assert_eq!(ledger.entries[0].running_balance, dec!(70));
    assert_eq!(ledger.closing.balance, dec!(70));
    assert_eq!(ledger.opening.as_of, Some(date(1, 10)));
    assert_eq!(ledger.closing.as_of, Some(date(1, 20)));
}

#[test]
fn test_window_covering_all_history() {
    let window = DateWindow::new(Some(date(1, 1)), Some(date(2, 1))).unwrap();
    let ledger = engine().compute(EntityId(1), &window, scenario());

    assert_eq!(ledger.opening.balance, Decimal::ZERO);
    let running: Vec<Decimal> = ledger.entries.iter().map(|e| e.running_balance).collect();
    assert_eq!(running, vec![dec!(100), dec!(70), dec!(120)]);
    assert_eq!(ledger.closing.balance, dec!(120));
}

#[test]
fn test_open_bounds() {
    let ledger = engine().compute(EntityId(1), &DateWindow::unbounded(), scenario());
    assert_eq!(ledger.opening.balance, Decimal::ZERO);
    assert_eq!(ledger.entries.len(), 3);
    assert_eq!(ledger.closing.balance, dec!(120));

    let until = DateWindow::new(None, Some(date(1, 15))).unwrap();
    let ledger = engine().compute(EntityId(1), &until, scenario());
    assert_eq!(ledger.entries.len(), 2);
    assert_eq!(ledger.closing.balance, dec!(70));

    let from = DateWindow::new(Some(date(1, 15)), None).unwrap();
    let ledger = engine().compute(EntityId(1), &from, scenario());
    assert_eq!(ledger.opening.balance, dec!(100));
    assert_eq!(ledger.entries.len(), 2);
    assert_eq!(ledger.closing.balance, dec!(120));
}

#[test]
fn test_window_without_movement_carries_opening() {
    let window = DateWindow::new(Some(date(3, 1)), Some(date(3, 31))).unwrap();
    let ledger = engine().compute(EntityId(1), &window, scenario());
    assert!(!ledger.has_movement());
    assert!(ledger.has_balance());
    assert_eq!(ledger.opening.balance, dec!(120));
    assert_eq!(ledger.closing.balance, dec!(120));
}

#[test]
fn test_outflow_positive_convention() {
    let window = DateWindow::new(Some(date(1, 10)), None).unwrap();
    let ledger = LedgerEngine::new(SignConvention::OutflowPositive).compute(
        EntityId(1),
        &window,
        scenario(),
    );
    assert_eq!(ledger.opening.balance, dec!(-100));
    assert_eq!(ledger.closing.balance, dec!(-120));
}

#[test]
fn test_same_day_ordered_by_transaction_id() {
    let day = date(1, 5);
    let postings = vec![
        posting(9, day, Direction::Inflow, dec!(1)),
        posting(4, day, Direction::Inflow, dec!(2)),
        posting(7, day, Direction::Outflow, dec!(3)),
    ];
    let ledger = engine().compute(EntityId(1), &DateWindow::unbounded(), postings);
    let ids: Vec<i64> = ledger.entries.iter().map(|e| e.posting.id).collect();
    assert_eq!(ids, vec![4, 7, 9]);
}

#[test]
fn test_zero_closing_is_not_negative() {
    let postings = vec![
        posting(1, date(1, 1), Direction::Outflow, dec!(30.00)),
        posting(2, date(1, 2), Direction::Inflow, dec!(30.00)),
    ];
    let ledger = engine().compute(EntityId(1), &DateWindow::unbounded(), postings);
    assert!(ledger.closing.balance.is_zero());
    assert!(!ledger.closing.balance.is_sign_negative());
    assert!(!ledger.has_balance());
}

#[test]
fn test_compute_many_preserves_order() {
    let groups: Vec<(EntityId, Vec<TestPosting>)> = (1..=20)
        .rev()
        .map(|id| (EntityId(id), scenario()))
        .collect();
    let ledgers = engine().compute_many(&DateWindow::unbounded(), groups);
    let ids: Vec<i64> = ledgers.iter().map(|l| l.entity_id.get()).collect();
    assert_eq!(ids, (1..=20).rev().collect::<Vec<_>>());
    assert!(ledgers.iter().all(|l| l.closing.balance == dec!(120)));
}

// ============================================================================
// Properties
// ============================================================================

fn posting_strategy() -> impl Strategy<Value = TestPosting> {
    (
        1i64..500,
        1u32..=12,
        1u32..=28,
        prop_oneof![Just(Direction::Inflow), Just(Direction::Outflow)],
        1i64..1_000_000,
    )
        .prop_map(|(id, month, day, direction, cents)| {
            posting(id, date(month, day), direction, Decimal::new(cents, 2))
        })
}

/// Postings with unique transaction ids.
fn postings_strategy() -> impl Strategy<Value = Vec<TestPosting>> {
    prop::collection::vec(posting_strategy(), 0..40).prop_map(|mut postings| {
        for (index, posting) in postings.iter_mut().enumerate() {
            posting.id = i64::try_from(index).unwrap_or(i64::MAX) + 1;
        }
        postings
    })
}

fn window_strategy() -> impl Strategy<Value = DateWindow> {
    (
        proptest::option::of((1u32..=12, 1u32..=28)),
        proptest::option::of((1u32..=12, 1u32..=28)),
    )
        .prop_map(|(start, end)| {
            let start = start.map(|(m, d)| date(m, d));
            let end = end.map(|(m, d)| date(m, d));
            match (start, end) {
                (Some(s), Some(e)) if e < s => DateWindow::new(Some(e), Some(s)).unwrap(),
                _ => DateWindow::new(start, end).unwrap(),
            }
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property: Balance continuity**
    ///
    /// closing == opening + signed in-window sum, and the last running
    /// balance equals the closing balance.
    #[test]
    fn prop_balance_continuity(
        postings in postings_strategy(),
        window in window_strategy(),
    ) {
        let ledger = engine().compute(EntityId(1), &window, postings);
        let sum: Decimal = ledger.entries.iter().map(|e| e.contribution).sum();
        prop_assert_eq!(ledger.closing.balance, ledger.opening.balance + sum);
        let last = ledger.entries.last().map_or(ledger.opening.balance, |e| e.running_balance);
        prop_assert_eq!(ledger.closing.balance, last);
    }

    /// **Property: In-window ordering**
    ///
    /// Entries are sorted by (date, transaction id) and all lie in the window.
    #[test]
    fn prop_entries_ordered_and_in_window(
        postings in postings_strategy(),
        window in window_strategy(),
    ) {
        let ledger = engine().compute(EntityId(1), &window, postings);
        for pair in ledger.entries.windows(2) {
            let a = (pair[0].posting.date, pair[0].posting.id);
            let b = (pair[1].posting.date, pair[1].posting.id);
            prop_assert!(a <= b);
        }
        for entry in &ledger.entries {
            prop_assert!(window.contains(entry.posting.date));
        }
    }

    /// **Property: Idempotence**
    ///
    /// Input order does not affect the computed ledger.
    #[test]
    fn prop_idempotent_under_reordering(
        postings in postings_strategy(),
        window in window_strategy(),
    ) {
        let mut reversed = postings.clone();
        reversed.reverse();
        let first = engine().compute(EntityId(1), &window, postings);
        let second = engine().compute(EntityId(1), &window, reversed);
        prop_assert_eq!(first.opening, second.opening);
        prop_assert_eq!(first.closing, second.closing);
        let a: Vec<Decimal> = first.entries.iter().map(|e| e.running_balance).collect();
        let b: Vec<Decimal> = second.entries.iter().map(|e| e.running_balance).collect();
        prop_assert_eq!(a, b);
    }
}
