//! Tracing hooks for statement execution and schema definition.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]` boilerplate
//! at every call site.

/// Emit a debug-level tracing event with the SQL text and parameter count.
///
/// ```ignore
/// quarry_trace_query!(plan.sql(), plan.params().len());
/// ```
#[macro_export]
macro_rules! quarry_trace_query {
    ($sql:expr, $param_count:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(sql = %$sql, params = $param_count, "quarry.query");
    };
}

/// Emit a debug-level tracing event when a type's mapping is first built.
///
/// ```ignore
/// quarry_trace_define!(schema.table_name(), schema.columns().len());
/// ```
#[macro_export]
macro_rules! quarry_trace_define {
    ($table:expr, $column_count:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(table = %$table, columns = $column_count, "quarry.define");
    };
}
