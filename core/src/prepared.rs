use smallvec::SmallVec;

use crate::value::Value;

/// Rendered SQL text with positional `?` placeholders plus the values bound
/// to them, in placeholder order. Immutable once rendered; a plan may be
/// executed any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedStatementPlan {
    sql: String,
    params: SmallVec<[Value; 8]>,
}

impl PreparedStatementPlan {
    pub(crate) fn new(sql: String, params: SmallVec<[Value; 8]>) -> Self {
        Self { sql, params }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Number of `?` placeholders in the text.
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }

    pub fn into_parts(self) -> (String, SmallVec<[Value; 8]>) {
        (self.sql, self.params)
    }
}

impl core::fmt::Display for PreparedStatementPlan {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, r#"sql: "{}", params: {:?}"#, self.sql, self.params.as_slice())
    }
}
