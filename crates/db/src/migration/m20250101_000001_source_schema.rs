//! Report source schema.
//!
//! Creates the reference tables (contacts, measurement units, raw materials,
//! crockery) and the four history tables the ledger reports read, and seeds
//! the standard measurement units.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: REFERENCE DATA
        // ============================================================
        db.execute_unprepared(CONTACTS_SQL).await?;
        db.execute_unprepared(MEASUREMENT_SQL).await?;
        db.execute_unprepared(ITEMS_SQL).await?;

        // ============================================================
        // PART 2: HISTORY TABLES
        // ============================================================
        db.execute_unprepared(ACCOUNT_HISTORY_SQL).await?;
        db.execute_unprepared(STOCK_HISTORY_SQL).await?;
        db.execute_unprepared(ORDER_HISTORY_SQL).await?;

        // ============================================================
        // PART 3: SEED DATA
        // ============================================================
        db.execute_unprepared(SEED_MEASUREMENT_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const CONTACTS_SQL: &str = r"
CREATE TABLE contact_category (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    preferred_name VARCHAR(255),
    supportive_name VARCHAR(255)
);

CREATE TABLE contact (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    preferred_name VARCHAR(255),
    supportive_name VARCHAR(255),
    category_id BIGINT REFERENCES contact_category(id) ON DELETE SET NULL,
    is_bank BOOLEAN NOT NULL DEFAULT FALSE
);

CREATE INDEX idx_contact_category ON contact(category_id);
";

const MEASUREMENT_SQL: &str = r"
CREATE TABLE measurement (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    preferred_name VARCHAR(100),
    supportive_name VARCHAR(100),
    symbol VARCHAR(16) NOT NULL,
    base_unit_id BIGINT NOT NULL REFERENCES measurement(id),
    base_unit_equivalent NUMERIC(19, 6) NOT NULL,
    smallest_unit_id BIGINT REFERENCES measurement(id),
    decimal_precision INTEGER NOT NULL DEFAULT 0,

    CONSTRAINT chk_base_unit_equivalent_positive CHECK (base_unit_equivalent > 0),
    CONSTRAINT chk_decimal_precision CHECK (decimal_precision >= -1)
);
";

const ITEMS_SQL: &str = r"
CREATE TABLE raw_material (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    preferred_name VARCHAR(255),
    supportive_name VARCHAR(255),
    measurement_id BIGINT NOT NULL REFERENCES measurement(id)
);

CREATE TABLE crockery (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    preferred_name VARCHAR(255),
    supportive_name VARCHAR(255),
    measurement_id BIGINT NOT NULL REFERENCES measurement(id)
);
";

const ACCOUNT_HISTORY_SQL: &str = r"
-- transaction_type: 0 = inflow, 1 = outflow
-- payment_mode: 0 = journal, 1 = cash, 2 = bank
CREATE TABLE account_history (
    id BIGSERIAL PRIMARY KEY,
    contact_id BIGINT NOT NULL REFERENCES contact(id),
    transaction_date DATE NOT NULL,
    transaction_type SMALLINT NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    voucher_type VARCHAR(32) NOT NULL,
    voucher_number VARCHAR(64),
    payment_mode SMALLINT NOT NULL DEFAULT 0,
    bank_contact_id BIGINT REFERENCES contact(id),
    remark TEXT,
    gst_rate NUMERIC(5, 2),

    CONSTRAINT chk_account_transaction_type CHECK (transaction_type IN (0, 1)),
    CONSTRAINT chk_account_amount CHECK (amount >= 0),
    CONSTRAINT chk_payment_mode CHECK (payment_mode IN (0, 1, 2)),
    CONSTRAINT chk_gst_rate CHECK (gst_rate IS NULL OR gst_rate >= 0)
);

CREATE INDEX idx_account_history_contact ON account_history(contact_id, transaction_date, id);
CREATE INDEX idx_account_history_bank ON account_history(bank_contact_id, transaction_date, id)
    WHERE payment_mode = 2;
CREATE INDEX idx_account_history_cash ON account_history(transaction_date, id)
    WHERE payment_mode = 1;
";

const STOCK_HISTORY_SQL: &str = r"
CREATE TABLE stock_history (
    id BIGSERIAL PRIMARY KEY,
    raw_material_id BIGINT NOT NULL REFERENCES raw_material(id),
    transfer_date DATE NOT NULL,
    transfer_type SMALLINT NOT NULL,
    quantity NUMERIC(19, 4) NOT NULL,
    measurement_id BIGINT NOT NULL REFERENCES measurement(id),
    voucher_number VARCHAR(64),
    remark TEXT,

    CONSTRAINT chk_stock_transfer_type CHECK (transfer_type IN (0, 1)),
    CONSTRAINT chk_stock_quantity CHECK (quantity >= 0)
);

CREATE INDEX idx_stock_history_material ON stock_history(raw_material_id, transfer_date, id);
";

const ORDER_HISTORY_SQL: &str = r"
CREATE TABLE order_crockery (
    id BIGSERIAL PRIMARY KEY,
    order_id BIGINT NOT NULL,
    crockery_id BIGINT NOT NULL REFERENCES crockery(id),
    order_date DATE NOT NULL,
    transfer_type SMALLINT NOT NULL,
    quantity NUMERIC(19, 4) NOT NULL,
    measurement_id BIGINT NOT NULL REFERENCES measurement(id),
    remark TEXT,

    CONSTRAINT chk_crockery_transfer_type CHECK (transfer_type IN (0, 1)),
    CONSTRAINT chk_crockery_quantity CHECK (quantity >= 0)
);

CREATE INDEX idx_order_crockery_item ON order_crockery(crockery_id, order_date, id);

CREATE TABLE order_general_fix_raw_material (
    id BIGSERIAL PRIMARY KEY,
    order_id BIGINT NOT NULL,
    raw_material_id BIGINT NOT NULL REFERENCES raw_material(id),
    order_date DATE NOT NULL,
    transfer_type SMALLINT NOT NULL,
    quantity NUMERIC(19, 4) NOT NULL,
    measurement_id BIGINT NOT NULL REFERENCES measurement(id),
    remark TEXT,

    CONSTRAINT chk_general_fix_transfer_type CHECK (transfer_type IN (0, 1)),
    CONSTRAINT chk_general_fix_quantity CHECK (quantity >= 0)
);

CREATE INDEX idx_order_general_fix_material
    ON order_general_fix_raw_material(raw_material_id, order_date, id);
";

const SEED_MEASUREMENT_SQL: &str = r"
-- decimal_precision -1 resolves per value (0 for whole numbers, else 3)
INSERT INTO measurement
    (id, name, symbol, base_unit_id, base_unit_equivalent, smallest_unit_id, decimal_precision)
VALUES
    (1, 'Kilogram', 'kg', 1, 1, 2, -1),
    (2, 'Gram', 'g', 1, 0.001, NULL, 0),
    (3, 'Litre', 'L', 3, 1, 4, -1),
    (4, 'Millilitre', 'ml', 3, 0.001, NULL, 0),
    (5, 'Piece', 'pcs', 5, 1, NULL, 0),
    (6, 'Dozen', 'dz', 5, 12, NULL, 2),
    (7, 'Quintal', 'qtl', 1, 100, NULL, 3),
    (8, 'Tonne', 't', 1, 1000, NULL, 3);

SELECT setval('measurement_id_seq', (SELECT MAX(id) FROM measurement));
";

const DROP_ALL_SQL: &str = r"
-- Order matters due to foreign key constraints
DROP TABLE IF EXISTS order_general_fix_raw_material CASCADE;
DROP TABLE IF EXISTS order_crockery CASCADE;
DROP TABLE IF EXISTS stock_history CASCADE;
DROP TABLE IF EXISTS account_history CASCADE;
DROP TABLE IF EXISTS crockery CASCADE;
DROP TABLE IF EXISTS raw_material CASCADE;
DROP TABLE IF EXISTS measurement CASCADE;
DROP TABLE IF EXISTS contact CASCADE;
DROP TABLE IF EXISTS contact_category CASCADE;
";
