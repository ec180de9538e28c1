use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use quarry::prelude::*;
use std::fmt;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Product {
    pub product_id: i32,
    pub product_name: String,
    pub category: String,
    pub unit_price: f64,
    pub units_in_stock: i32,
}

quarry::fields!(Product {
    PRODUCT_ID => product_id: i32,
    PRODUCT_NAME => product_name: String,
    CATEGORY => category: String,
    UNIT_PRICE => unit_price: f64,
    UNITS_IN_STOCK => units_in_stock: i32,
});

impl Entity for Product {
    fn define(table: &mut Define<Self>) {
        table.column(Self::PRODUCT_ID).primary_key();
        table.column(Self::PRODUCT_NAME);
        table.column(Self::CATEGORY);
        table.column(Self::UNIT_PRICE);
        table.column(Self::UNITS_IN_STOCK);
        table
            .max_length(&Self::PRODUCT_NAME, 255)
            .max_length(&Self::CATEGORY, 255)
            .index(&[&Self::PRODUCT_NAME, &Self::CATEGORY]);
    }
}

impl Product {
    pub fn new(id: i32, name: &str, category: &str, unit_price: f64, units_in_stock: i32) -> Self {
        Self {
            product_id: id,
            product_name: name.to_string(),
            category: category.to_string(),
            unit_price,
            units_in_stock,
        }
    }

    pub fn list() -> Vec<Product> {
        vec![
            Product::new(1, "Chai", "Beverages", 18.0, 39),
            Product::new(2, "Chang", "Beverages", 19.0, 17),
            Product::new(3, "Aniseed Syrup", "Condiments", 10.0, 13),
            Product::new(4, "Chef Anton's Cajun Seasoning", "Condiments", 22.0, 53),
            Product::new(5, "Chef Anton's Gumbo Mix", "Condiments", 21.35, 0),
            Product::new(6, "Grandma's Boysenberry Spread", "Condiments", 25.0, 120),
            Product::new(7, "Uncle Bob's Organic Dried Pears", "Produce", 30.0, 15),
            Product::new(8, "Northwoods Cranberry Sauce", "Condiments", 40.0, 6),
            Product::new(9, "Mishi Kobe Niku", "Meat/Poultry", 97.0, 29),
            Product::new(10, "Ikura", "Seafood", 31.0, 31),
        ]
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.product_name, self.units_in_stock)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Customer {
    pub customer_id: String,
    pub region: String,
}

quarry::fields!(Customer {
    CUSTOMER_ID => customer_id: String,
    REGION => region: String,
});

impl Entity for Customer {
    fn define(table: &mut Define<Self>) {
        table.column(Self::CUSTOMER_ID).primary_key().max_length(5);
        table.column(Self::REGION).max_length(2);
    }
}

impl Customer {
    pub fn list() -> Vec<Customer> {
        [("ALFKI", "WA"), ("ANATR", "WA"), ("ANTON", "CA")]
            .into_iter()
            .map(|(id, region)| Customer {
                customer_id: id.to_string(),
                region: region.to_string(),
            })
            .collect()
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.customer_id)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Order {
    pub customer_id: String,
    pub order_id: i32,
    pub order_date: NaiveDate,
    pub total: f64,
}

quarry::fields!(Order {
    CUSTOMER_ID => customer_id: String,
    ORDER_ID => order_id: i32,
    ORDER_DATE => order_date: NaiveDate,
    TOTAL => total: f64,
});

impl Entity for Order {
    fn define(table: &mut Define<Self>) {
        table.table_name("Orders");
        table.column(Self::CUSTOMER_ID);
        table.column(Self::ORDER_ID);
        table.column(Self::ORDER_DATE);
        table.column(Self::TOTAL);
        table.primary_key(&[&Self::CUSTOMER_ID, &Self::ORDER_ID]);
    }
}

pub fn date(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
}

impl Order {
    pub fn list() -> Vec<Order> {
        [
            ("ALFKI", 10702, 330.00, "2007-01-02"),
            ("ALFKI", 10952, 471.20, "2007-02-03"),
            ("ANATR", 10308, 88.80, "2007-01-03"),
            ("ANATR", 10625, 479.75, "2007-03-03"),
            ("ANATR", 10759, 320.00, "2007-04-01"),
            ("ANTON", 10365, 403.20, "2007-02-13"),
            ("ANTON", 10682, 375.50, "2007-03-13"),
            ("ANTON", 10355, 480.00, "2007-04-11"),
        ]
        .into_iter()
        .map(|(customer_id, order_id, total, order_date)| Order {
            customer_id: customer_id.to_string(),
            order_id,
            order_date: date(order_date),
            total,
        })
        .collect()
    }
}

/// One field of every supported column type.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ComplexObject {
    pub id: i32,
    pub amount: i64,
    pub name: String,
    pub value: f64,
    pub birthday: NaiveDate,
    pub time: NaiveTime,
    pub created: NaiveDateTime,
}

quarry::fields!(ComplexObject {
    ID => id: i32,
    AMOUNT => amount: i64,
    NAME => name: String,
    VALUE => value: f64,
    BIRTHDAY => birthday: NaiveDate,
    TIME => time: NaiveTime,
    CREATED => created: NaiveDateTime,
});

impl Entity for ComplexObject {
    fn define(table: &mut Define<Self>) {
        table.column(Self::ID).primary_key();
        table.column(Self::AMOUNT);
        table.column(Self::NAME);
        table.column(Self::VALUE);
        table.column(Self::BIRTHDAY);
        table.column(Self::TIME);
        table.column(Self::CREATED);
    }
}

impl ComplexObject {
    fn create(id: i32, amount: i64, name: &str, value: f64, birthday: &str, time: &str, created: &str) -> Self {
        Self {
            id,
            amount,
            name: name.to_string(),
            value,
            birthday: date(birthday),
            time: NaiveTime::parse_from_str(time, "%H:%M:%S").unwrap(),
            created: NaiveDateTime::parse_from_str(created, "%Y-%m-%d %H:%M:%S").unwrap(),
        }
    }

    pub fn list() -> Vec<ComplexObject> {
        vec![
            ComplexObject::create(1, 1, "hello", 1.0, "2001-01-01", "01:02:03", "2004-05-06 07:08:09"),
            ComplexObject::create(2, 2, "World", 2.0, "2002-02-02", "02:03:04", "2005-06-07 08:09:10"),
        ]
    }
}
