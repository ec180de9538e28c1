use crate::error::{QuarryError, Result};
use crate::expr::ExprNode;
use crate::prepared::PreparedStatementPlan;
use crate::query::{Connective, OrderTerm, QueryContext};
use crate::sql::{SQL, Token};

/// What a SELECT returns.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Every column of the primary source.
    All,
    /// `COUNT(*)`
    Count,
    Exprs {
        exprs: Vec<ExprNode>,
        distinct: bool,
    },
}

impl QueryContext {
    pub fn render_select(&self, selection: &Selection) -> Result<PreparedStatementPlan> {
        let resolver = self.resolver()?;

        let mut sql = SQL::token(Token::SELECT);
        sql = match selection {
            Selection::All if self.is_joined() => {
                let name = resolver.alias_name(self.sources[0].alias).unwrap_or_default();
                sql.append(SQL::raw(format!("{name}.*")))
            }
            Selection::All => sql.push(Token::STAR),
            Selection::Count => sql.append(SQL::func("COUNT", SQL::token(Token::STAR))),
            Selection::Exprs { exprs, distinct } => {
                if exprs.is_empty() {
                    return Err(QuarryError::Statement("empty select list".into()));
                }
                if *distinct {
                    sql = sql.push(Token::DISTINCT);
                }
                sql.append(SQL::join(exprs.iter().map(ExprNode::to_sql), Token::COMMA))
            }
        };

        let sql = sql
            .append(self.from_clause(&resolver))
            .append(self.where_clause())
            .append(self.group_by_clause())
            .append(self.order_by_clause())
            .append(self.limit_clause());
        sql.build(&resolver)
    }

    /// `DELETE FROM table WHERE ...`
    pub fn render_delete(&self) -> Result<PreparedStatementPlan> {
        self.require_single_source("DELETE")?;
        let resolver = self.resolver()?;
        SQL::token(Token::DELETE)
            .append(self.from_clause(&resolver))
            .append(self.where_clause())
            .build(&resolver)
    }

    /// `UPDATE table SET col = ?, ... WHERE ...`
    pub fn render_update(&self) -> Result<PreparedStatementPlan> {
        self.require_single_source("UPDATE")?;
        if self.assignments.is_empty() {
            return Err(QuarryError::Statement("UPDATE without SET assignments".into()));
        }
        let resolver = self.resolver()?;

        let mut assignments = Vec::with_capacity(self.assignments.len());
        for (target, value) in &self.assignments {
            let ExprNode::Column(token) = target else {
                return Err(QuarryError::Statement(format!(
                    "SET target must be a plain column, got {target:?}"
                )));
            };
            assignments.push(
                SQL::column(*token)
                    .push(Token::EQ)
                    .append(SQL::param(value.clone())),
            );
        }

        SQL::token(Token::UPDATE)
            .append(SQL::ident(self.primary_table().table_name().to_owned()))
            .push(Token::SET)
            .append(SQL::join(assignments, Token::COMMA))
            .append(self.where_clause())
            .build(&resolver)
    }

    fn require_single_source(&self, verb: &str) -> Result<()> {
        if self.is_joined() {
            return Err(QuarryError::Statement(format!(
                "{verb} cannot be rendered for a joined query"
            )));
        }
        Ok(())
    }

    fn from_clause(&self, resolver: &crate::resolver::TokenResolver) -> SQL {
        let qualify = self.is_joined();
        let mut sql = SQL::token(Token::FROM);
        for source in &self.sources {
            if let Some((kind, _)) = &source.join {
                sql = sql.push(kind.token()).push(Token::JOIN);
            }
            sql = sql.append(SQL::ident(source.table.table_name().to_owned()));
            if qualify && let Some(name) = resolver.alias_name(source.alias) {
                sql = sql.append(SQL::raw(name.to_owned()));
            }
            if let Some((_, on)) = &source.join {
                sql = sql.push(Token::ON).append(on.to_sql());
            }
        }
        sql
    }

    fn where_clause(&self) -> SQL {
        if self.filters.is_empty() {
            return SQL::empty();
        }
        let mut sql = SQL::token(Token::WHERE);
        for (i, filter) in self.filters.iter().enumerate() {
            if i > 0 {
                sql = sql.push(match filter.connective {
                    Connective::And => Token::AND,
                    Connective::Or => Token::OR,
                });
            }
            let condition = filter.condition.to_sql();
            sql = sql.append(if filter.grouped { condition.parens() } else { condition });
        }
        sql
    }

    fn group_by_clause(&self) -> SQL {
        if self.group_by.is_empty() {
            return SQL::empty();
        }
        SQL::token(Token::GROUP)
            .push(Token::BY)
            .append(SQL::join(self.group_by.iter().map(ExprNode::to_sql), Token::COMMA))
    }

    fn order_by_clause(&self) -> SQL {
        if self.order_by.is_empty() {
            return SQL::empty();
        }
        let terms = self.order_by.iter().map(|term| match term {
            OrderTerm::Asc(expr) => expr.to_sql(),
            OrderTerm::Desc(expr) => expr.to_sql().push(Token::DESC),
            OrderTerm::Ordinal(position) => SQL::number(*position),
        });
        SQL::token(Token::ORDER)
            .push(Token::BY)
            .append(SQL::join(terms, Token::COMMA))
    }

    fn limit_clause(&self) -> SQL {
        let mut sql = SQL::empty();
        match (self.limit, self.offset) {
            (Some(limit), _) => sql = sql.push(Token::LIMIT).append(SQL::number(limit)),
            // SQLite only accepts OFFSET after a LIMIT
            (None, Some(_)) => sql = sql.push(Token::LIMIT).append(SQL::raw("-1")),
            (None, None) => {}
        }
        if let Some(offset) = self.offset {
            sql = sql.push(Token::OFFSET).append(SQL::number(offset));
        }
        sql
    }
}
