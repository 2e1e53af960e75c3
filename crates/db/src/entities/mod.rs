//! `SeaORM` entity definitions for the report source schema.
//!
//! All tables are read-only from this crate's point of view.

pub mod account_history;
pub mod contact;
pub mod contact_category;
pub mod crockery;
pub mod measurement;
pub mod order_crockery;
pub mod order_general_fix_raw_material;
pub mod raw_material;
pub mod stock_history;

pub mod prelude {
    //! Entity re-exports.

    pub use super::account_history::Entity as AccountHistory;
    pub use super::contact::Entity as Contact;
    pub use super::contact_category::Entity as ContactCategory;
    pub use super::crockery::Entity as Crockery;
    pub use super::measurement::Entity as Measurement;
    pub use super::order_crockery::Entity as OrderCrockery;
    pub use super::order_general_fix_raw_material::Entity as OrderGeneralFixRawMaterial;
    pub use super::raw_material::Entity as RawMaterial;
    pub use super::stock_history::Entity as StockHistory;
}
