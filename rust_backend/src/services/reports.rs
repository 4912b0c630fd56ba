//! Report aggregation over a range of sessions.
//!
//! A report covers every session in an inclusive date range. An empty range
//! yields `None`; a range whose sessions hold no observations yields a report
//! with zero counts.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use log::{debug, info};
use serde::Serialize;

use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::{Object, ObjectId, Stored};

use super::error::{LogbookError, LogbookResult};

/// Inclusive range of session dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> LogbookResult<Self> {
        if start > end {
            return Err(LogbookError::InvalidDateRange(format!(
                "{} is after {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// The calendar month `month` (1-12) of `year`.
    pub fn month(year: i32, month: u32) -> LogbookResult<Self> {
        let invalid = || LogbookError::InvalidDateRange(format!("{}-{:02}", year, month));
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let end = next.and_then(|d| d.pred_opt()).ok_or_else(invalid)?;
        Ok(Self { start, end })
    }

    /// The calendar year `year`.
    pub fn year(year: i32) -> LogbookResult<Self> {
        let invalid = || LogbookError::InvalidDateRange(year.to_string());
        let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid)?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(invalid)?;
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Summary statistics of the sessions in a date range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub n_sessions: usize,
    pub n_observations: usize,
    /// Distinct objects observed, sorted by name.
    pub unique_objects: Vec<Stored<Object>>,
    /// Every object observed as often as the most observed one, sorted by name.
    pub most_observed_objects: Vec<Stored<Object>>,
}

impl Report {
    pub fn unique_object_names(&self) -> Vec<&str> {
        self.unique_objects.iter().map(|o| o.name.as_str()).collect()
    }

    pub fn most_observed_names(&self) -> Vec<&str> {
        self.most_observed_objects
            .iter()
            .map(|o| o.name.as_str())
            .collect()
    }
}

fn sorted_by_name(mut objects: Vec<Stored<Object>>) -> Vec<Stored<Object>> {
    objects.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    objects
}

/// Aggregate the sessions in `range`.
///
/// # Returns
/// * `Ok(None)` if no session falls in the range
/// * `Ok(Some(report))` otherwise, even when nothing was observed
pub fn get_report<R: FullRepository + ?Sized>(
    repo: &R,
    range: DateRange,
) -> RepositoryResult<Option<Report>> {
    info!(
        "Service layer: building report for {} to {}",
        range.start, range.end
    );

    let sessions = repo.sessions_between(range.start, range.end)?;
    if sessions.is_empty() {
        debug!("No sessions between {} and {}", range.start, range.end);
        return Ok(None);
    }

    let mut n_observations = 0;
    let mut tally: HashMap<ObjectId, usize> = HashMap::new();
    for session in &sessions {
        for observation in repo.observations_for_session(session.id)? {
            n_observations += 1;
            *tally.entry(observation.object).or_default() += 1;
        }
    }

    let seen: BTreeSet<ObjectId> = tally.keys().copied().collect();
    let unique_objects = seen
        .into_iter()
        .map(|id| repo.get_object(id))
        .collect::<RepositoryResult<Vec<_>>>()?;

    let max = tally.values().copied().max().unwrap_or(0);
    let most_observed_objects = unique_objects
        .iter()
        .filter(|object| tally.get(&object.id) == Some(&max))
        .cloned()
        .collect();

    Ok(Some(Report {
        n_sessions: sessions.len(),
        n_observations,
        unique_objects: sorted_by_name(unique_objects),
        most_observed_objects: sorted_by_name(most_observed_objects),
    }))
}

/// Report over one calendar month.
pub fn get_monthly_report<R: FullRepository + ?Sized>(
    repo: &R,
    year: i32,
    month: u32,
) -> LogbookResult<Option<Report>> {
    let range = DateRange::month(year, month)?;
    Ok(get_report(repo, range)?)
}

/// Report over one calendar year.
pub fn get_yearly_report<R: FullRepository + ?Sized>(
    repo: &R,
    year: i32,
) -> LogbookResult<Option<Report>> {
    let range = DateRange::year(year)?;
    Ok(get_report(repo, range)?)
}
