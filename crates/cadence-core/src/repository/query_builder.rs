use crate::query::{Filter, RecurrenceQuery};
use sqlx::{QueryBuilder, Sqlite};

/// Utility functions for building SQL queries from a [`RecurrenceQuery`]
pub struct SqlQueryBuilder;

impl SqlQueryBuilder {
    /// Appends ` WHERE ...` for the query's filters; nothing when it has none.
    pub fn push_where_clause(query: &RecurrenceQuery, qb: &mut QueryBuilder<'_, Sqlite>) {
        for (i, filter) in query.filters.iter().enumerate() {
            qb.push(if i == 0 { " WHERE " } else { " AND " });
            Self::push_filter(filter, qb);
        }
    }

    fn push_filter(filter: &Filter, qb: &mut QueryBuilder<'_, Sqlite>) {
        match filter {
            Filter::Interval(interval) => {
                qb.push("interval = ");
                qb.push_bind(interval.as_str());
            }
            Filter::Timezone(timezone) => {
                qb.push("timezone = ");
                qb.push_bind(timezone.clone());
            }
            Filter::DueBefore(time) => {
                qb.push("next_scheduled < ");
                qb.push_bind(*time);
            }
            Filter::ScheduledAfter(time) => {
                qb.push("next_scheduled > ");
                qb.push_bind(*time);
            }
        }
    }
}
