use chrono::{DateTime, Utc};

use crate::models::Interval;

/// Conditions selecting recurrences; all filters must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecurrenceQuery {
    pub filters: Vec<Filter>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Interval(Interval),
    Timezone(String),
    /// `next_scheduled` strictly before the given instant
    DueBefore(DateTime<Utc>),
    /// `next_scheduled` strictly after the given instant
    ScheduledAfter(DateTime<Utc>),
}

impl RecurrenceQuery {
    /// Matches every recurrence.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn due(time: DateTime<Utc>) -> Self {
        Self::all().filter(Filter::DueBefore(time))
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_accumulates_filters() {
        let now = Utc::now();
        let query = RecurrenceQuery::due(now).filter(Filter::Interval(Interval::Week));
        assert_eq!(
            query.filters,
            vec![Filter::DueBefore(now), Filter::Interval(Interval::Week)]
        );
        assert!(RecurrenceQuery::all().is_empty());
    }
}
