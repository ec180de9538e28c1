#![allow(dead_code)]

pub mod schema;

pub use schema::*;

use quarry::Db;
use std::fmt::Display;

/// In-memory database loaded with the sample products, customers, orders
/// and complex objects.
pub fn setup_db() -> Db {
    let db = Db::open_in_memory().expect("Failed to create in-memory database");
    db.insert_all(&Product::list()).expect("Failed to insert products");
    db.insert_all(&Customer::list()).expect("Failed to insert customers");
    db.insert_all(&Order::list()).expect("Failed to insert orders");
    db.insert_all(&ComplexObject::list()).expect("Failed to insert complex objects");
    db
}

/// `[a, b, c]`, using each item's `Display`.
pub fn listing<T: Display>(items: &[T]) -> String {
    let items: Vec<String> = items.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}
