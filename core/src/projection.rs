//! Result shapes for `select_as`.
//!
//! A projection lists the expressions to select and reads each row back,
//! positionally, into its output type.

use std::vec;

use crate::error::{QuarryError, Result};
use crate::expr::{Expr, ExprNode};
use crate::field::Field;
use crate::value::{SqlType, Value};

pub trait Projection {
    type Output;

    /// Selected expressions, in column order.
    fn expressions(&self) -> Vec<ExprNode>;

    /// Consumes this projection's values from the front of `row`.
    fn read(&self, row: &mut vec::IntoIter<Value>) -> Result<Self::Output>;
}

fn next_value(row: &mut vec::IntoIter<Value>) -> Result<Value> {
    row.next()
        .ok_or_else(|| QuarryError::Mapping("row has fewer columns than the projection".into()))
}

impl<F: SqlType> Projection for Expr<F> {
    type Output = F;

    fn expressions(&self) -> Vec<ExprNode> {
        vec![self.node().clone()]
    }

    fn read(&self, row: &mut vec::IntoIter<Value>) -> Result<F> {
        F::from_value(next_value(row)?)
    }
}

macro_rules! impl_tuple_projection {
    ($($name:ident),+) => {
        impl<$($name: Projection),+> Projection for ($($name,)+) {
            type Output = ($($name::Output,)+);

            #[allow(non_snake_case)]
            fn expressions(&self) -> Vec<ExprNode> {
                let ($($name,)+) = self;
                let mut expressions = Vec::new();
                $(expressions.extend($name.expressions());)+
                expressions
            }

            #[allow(non_snake_case)]
            fn read(&self, row: &mut vec::IntoIter<Value>) -> Result<Self::Output> {
                let ($($name,)+) = self;
                Ok(($($name.read(row)?,)+))
            }
        }
    };
}

impl_tuple_projection!(A, B);
impl_tuple_projection!(A, B, C);
impl_tuple_projection!(A, B, C, D);

type Writer<R> = Box<dyn Fn(&mut R, Value) -> Result<()> + Send + Sync>;

/// A custom result type filled field by field.
///
/// ```ignore
/// let shape = Shape::new()
///     .map(CategoryCount::CATEGORY, p.col(Product::CATEGORY))
///     .map(CategoryCount::COUNT, count());
/// ```
pub struct Shape<R> {
    entries: Vec<(ExprNode, Writer<R>)>,
}

impl<R: Default + 'static> Shape<R> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Selects `expr` into `field` of the result.
    pub fn map<F: SqlType>(mut self, field: Field<R, F>, expr: Expr<F>) -> Self {
        self.entries.push((
            expr.into_node(),
            Box::new(move |result: &mut R, value: Value| {
                field.set(result, F::from_value(value)?);
                Ok(())
            }),
        ));
        self
    }
}

impl<R: Default + 'static> Default for Shape<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Default + 'static> Projection for Shape<R> {
    type Output = R;

    fn expressions(&self) -> Vec<ExprNode> {
        self.entries.iter().map(|(node, _)| node.clone()).collect()
    }

    fn read(&self, row: &mut vec::IntoIter<Value>) -> Result<R> {
        let mut result = R::default();
        for (_, write) in &self.entries {
            write(&mut result, next_value(row)?)?;
        }
        Ok(result)
    }
}

impl<R> core::fmt::Debug for Shape<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(node, _)| node))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::count;

    #[derive(Default, Debug, PartialEq)]
    struct CategoryCount {
        category: String,
        count: i64,
    }

    crate::fields!(CategoryCount {
        CATEGORY => category: String,
        COUNT => count: i64,
    });

    #[test]
    fn tuples_read_in_order() {
        let projection = (count(), (count(), count()));
        assert_eq!(projection.expressions().len(), 3);

        let mut row = vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)].into_iter();
        assert_eq!(projection.read(&mut row).unwrap(), (1, (2, 3)));
    }

    #[test]
    fn shape_fills_mapped_fields() {
        let shape = Shape::new()
            .map(CategoryCount::COUNT, count())
            .map(CategoryCount::CATEGORY, Expr::column(crate::alias::ColumnToken {
                alias: crate::alias::AliasId::next(),
                field: "category",
            }));
        let mut row = vec![Value::Integer(5), Value::Text("Condiments".into())].into_iter();

        assert_eq!(
            shape.read(&mut row).unwrap(),
            CategoryCount {
                category: "Condiments".into(),
                count: 5
            }
        );
    }

    #[test]
    fn short_row_is_a_mapping_error() {
        let mut row = Vec::new().into_iter();
        assert!(matches!(count().read(&mut row), Err(QuarryError::Mapping(_))));
    }
}
