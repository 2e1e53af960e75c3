//! Tests for the report source repository against a mock connection.

use banquet_core::ledger::Direction;
use banquet_core::reports::{
    EntityFilter, EntityGrouping, LedgerSource, SourceError, SourceQuery, TransactionSource,
};
use banquet_shared::types::{CategoryId, EntityId, LanguageSelector, TransactionId, UnitId};
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase};

use super::{CASH_IN_HAND_ENTITY_ID, LedgerSourceRepository, direction, payment_mode};
use crate::entities::{account_history, contact, raw_material, stock_history};

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).unwrap()
}

fn history(id: i64, contact_id: i64, kind: i16, mode: i16) -> account_history::Model {
    account_history::Model {
        id,
        contact_id,
        transaction_date: date(1, u32::try_from(id).unwrap()),
        transaction_type: kind,
        amount: dec!(100.00),
        voucher_type: "SALES".to_string(),
        voucher_number: Some(format!("S-{id}")),
        payment_mode: mode,
        bank_contact_id: (mode == payment_mode::BANK).then_some(50),
        remark: None,
        gst_rate: Some(dec!(18)),
    }
}

fn contact(id: i64, name: &str, preferred: Option<&str>) -> contact::Model {
    contact::Model {
        id,
        name: name.to_string(),
        preferred_name: preferred.map(str::to_string),
        supportive_name: None,
        category_id: Some(3),
        is_bank: false,
    }
}

fn query(source: TransactionSource, grouping: EntityGrouping, filter: EntityFilter) -> SourceQuery {
    SourceQuery {
        source,
        grouping,
        filter,
        until: Some(date(1, 31)),
    }
}

#[tokio::test]
async fn test_contact_transactions_with_names() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            history(1, 7, 0, payment_mode::JOURNAL),
            history(2, 7, 1, payment_mode::CASH),
        ]])
        .append_query_results([vec![contact(7, "Shah Traders", Some("શાહ ટ્રેડર્સ"))]])
        .into_connection();
    let repo = LedgerSourceRepository::new(db);

    let rows = repo
        .fetch_transactions(&query(
            TransactionSource::AccountHistory,
            EntityGrouping::Contact,
            EntityFilter::all(),
        ))
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].entity_id, EntityId(7));
    assert_eq!(rows[0].transaction_id, TransactionId(1));
    assert_eq!(rows[0].direction, Direction::Inflow);
    assert_eq!(rows[1].direction, Direction::Outflow);
    assert_eq!(rows[0].gst_rate, Some(dec!(18)));
    assert_eq!(rows[0].entity_name.resolve(LanguageSelector::Preferred), "શાહ ટ્રેડર્સ");
    assert_eq!(rows[0].entity_name.resolve(LanguageSelector::Default), "Shah Traders");
}

#[tokio::test]
async fn test_cash_in_hand_needs_no_name_lookup() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![history(1, 7, 1, payment_mode::CASH)]])
        .into_connection();
    let repo = LedgerSourceRepository::new(db);

    let rows = repo
        .fetch_transactions(&query(
            TransactionSource::AccountHistory,
            EntityGrouping::CashInHand,
            EntityFilter::all(),
        ))
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].entity_id, CASH_IN_HAND_ENTITY_ID);
    assert_eq!(rows[0].entity_name.default, "Cash In Hand");
}

#[tokio::test]
async fn test_bank_rows_belong_to_bank_contact() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![history(1, 7, 1, payment_mode::BANK)]])
        .append_query_results([vec![contact(50, "State Bank", None)]])
        .into_connection();
    let repo = LedgerSourceRepository::new(db);

    let rows = repo
        .fetch_transactions(&query(
            TransactionSource::AccountHistory,
            EntityGrouping::BankAccount,
            EntityFilter::all(),
        ))
        .await
        .unwrap();

    assert_eq!(rows[0].entity_id, EntityId(50));
    assert_eq!(rows[0].entity_name.default, "State Bank");
}

#[tokio::test]
async fn test_empty_category_short_circuits() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<contact::Model>::new()])
        .into_connection();
    let repo = LedgerSourceRepository::new(db);

    let filter = EntityFilter {
        entity_id: None,
        category_id: Some(CategoryId(3)),
    };
    let rows = repo
        .fetch_transactions(&query(
            TransactionSource::AccountHistory,
            EntityGrouping::Contact,
            filter,
        ))
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_unknown_direction_is_invalid_row() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![history(1, 7, 5, payment_mode::JOURNAL)]])
        .append_query_results([vec![contact(7, "Shah Traders", None)]])
        .into_connection();
    let repo = LedgerSourceRepository::new(db);

    let result = repo
        .fetch_transactions(&query(
            TransactionSource::AccountHistory,
            EntityGrouping::Contact,
            EntityFilter::all(),
        ))
        .await;
    assert!(matches!(result, Err(SourceError::InvalidRow(_))));
}

#[tokio::test]
async fn test_database_error_is_query_error() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Custom("connection refused".to_string())])
        .into_connection();
    let repo = LedgerSourceRepository::new(db);

    let result = repo
        .fetch_transactions(&query(
            TransactionSource::StockHistory,
            EntityGrouping::RawMaterial,
            EntityFilter::all(),
        ))
        .await;
    assert!(matches!(result, Err(SourceError::Query(_))));
}

#[tokio::test]
async fn test_stock_rows_carry_units() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![stock_history::Model {
            id: 11,
            raw_material_id: 4,
            transfer_date: date(1, 3),
            transfer_type: 1,
            quantity: dec!(250),
            measurement_id: 2,
            voucher_number: None,
            remark: Some("kitchen".to_string()),
        }]])
        .append_query_results([vec![raw_material::Model {
            id: 4,
            name: "Sugar".to_string(),
            preferred_name: None,
            supportive_name: Some("चीनी".to_string()),
            measurement_id: 1,
        }]])
        .into_connection();
    let repo = LedgerSourceRepository::new(db);

    let rows = repo
        .fetch_transactions(&query(
            TransactionSource::StockHistory,
            EntityGrouping::RawMaterial,
            EntityFilter::all(),
        ))
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].unit_id, Some(UnitId(2)));
    assert_eq!(rows[0].direction, Direction::Outflow);
    assert_eq!(rows[0].entity_name.resolve(LanguageSelector::Supportive), "चीनी");
    assert_eq!(rows[0].remark.as_deref(), Some("kitchen"));
}

#[tokio::test]
async fn test_placeholder_names() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![contact(7, "Shah Traders", None)]])
        .into_connection();
    let repo = LedgerSourceRepository::new(db);

    let cash = repo
        .entity_name(EntityGrouping::CashInHand, &EntityFilter::all())
        .await
        .unwrap();
    assert_eq!(cash.unwrap().default, "Cash In Hand");

    let filter = EntityFilter {
        entity_id: Some(EntityId(7)),
        category_id: None,
    };
    let named = repo
        .entity_name(EntityGrouping::Contact, &filter)
        .await
        .unwrap();
    assert_eq!(named.unwrap().default, "Shah Traders");

    let none = repo
        .entity_name(EntityGrouping::Contact, &EntityFilter::all())
        .await
        .unwrap();
    assert!(none.is_none());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property: Stored direction flags map one to one**
    ///
    /// Only 0 and 1 are accepted, and the mapped direction stores back as
    /// the same flag.
    #[test]
    fn prop_direction_flag_round_trip(code in any::<i16>(), id in 1i64..1_000_000) {
        match direction(code, "stock_history", id) {
            Ok(mapped) => {
                prop_assert!(code == 0 || code == 1);
                prop_assert_eq!(mapped.code(), code);
            }
            Err(SourceError::InvalidRow(message)) => {
                prop_assert!(code != 0 && code != 1);
                let expected = format!("row {id}");
                prop_assert!(message.contains(&expected));
            }
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }
}
