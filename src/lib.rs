//! # quarry
//!
//! Typed, alias-aware queries over SQLite, built from field handles instead
//! of SQL strings.
//!
//! ## Quick Start
//!
//! ```rust
//! use quarry::prelude::*;
//!
//! #[derive(Debug, Default)]
//! struct Product {
//!     product_id: i32,
//!     product_name: String,
//!     unit_price: f64,
//! }
//!
//! quarry::fields!(Product {
//!     PRODUCT_ID => product_id: i32,
//!     PRODUCT_NAME => product_name: String,
//!     UNIT_PRICE => unit_price: f64,
//! });
//!
//! impl Entity for Product {
//!     fn define(table: &mut Define<Self>) {
//!         table.column(Self::PRODUCT_ID).primary_key();
//!         table.column(Self::PRODUCT_NAME).max_length(40);
//!         table.column(Self::UNIT_PRICE);
//!     }
//! }
//!
//! # fn main() -> quarry::Result<()> {
//! let db = Db::open_in_memory()?;
//! db.insert(&Product { product_id: 1, product_name: "Chai".into(), unit_price: 18.0 })?;
//!
//! let p = Alias::<Product>::new()?;
//! let names = db
//!     .from(&p)
//!     .r#where(p.col(Product::UNIT_PRICE)).bigger(10.0)
//!     .order_by(p.col(Product::PRODUCT_ID))
//!     .select_as(p.col(Product::PRODUCT_NAME))?;
//!
//! assert_eq!(names, ["Chai"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! | Feature    | Enables                                         |
//! |------------|-------------------------------------------------|
//! | `rusqlite` | [`Db`] and query execution on SQLite            |
//! | `chrono`   | `NaiveDate`, `NaiveTime`, `NaiveDateTime` fields |
//! | `tracing`  | `debug` events for every executed statement     |

#[cfg(feature = "rusqlite")]
mod db;
#[cfg(feature = "rusqlite")]
mod query;

#[cfg(feature = "rusqlite")]
pub use db::Db;
#[cfg(feature = "rusqlite")]
pub use query::{Join, Query, Where};

pub use quarry_core::*;
pub use quarry_core::fields;

pub mod prelude {
    #[cfg(feature = "rusqlite")]
    pub use crate::{Db, Query};
    pub use quarry_core::{
        Alias, Condition, Define, Entity, Expr, Field, MappingRegistry, QuarryError, Result,
        Shape, and, count, count_of, is_null, length, max, min, not, or, sum, test,
    };
}
