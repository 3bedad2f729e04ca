//! Month grid and bar geometry for the Gantt timeline.

use crate::model::{Action, Milestone};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Narrowest bar drawn, in percent of the timeline width.
pub const MIN_BAR_WIDTH: f64 = 2.0;
/// Months shown when nothing has a deadline.
pub const DEFAULT_WINDOW_MONTHS: u32 = 24;
/// How many months before today the fallback window starts.
pub const DEFAULT_LOOKBACK_MONTHS: u32 = 2;

// ---------------------------------------------------------------------------
// Scheduled
// ---------------------------------------------------------------------------

/// Items that occupy a date range on the timeline. Items without a deadline
/// return `None` and are left out of layout.
pub trait Scheduled {
    fn span(&self) -> Option<(NaiveDate, NaiveDate)>;
}

impl Scheduled for Milestone {
    fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let end = self.deadline?;
        Some((self.start_date.unwrap_or(end), end))
    }
}

impl Scheduled for Action {
    fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.deadline.map(|d| (d, d))
    }
}

impl<T: Scheduled> Scheduled for &T {
    fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        (*self).span()
    }
}

// ---------------------------------------------------------------------------
// TimelineBounds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthMarker {
    pub year: i32,
    pub month: u32,
    /// First day of the month.
    pub start: NaiveDate,
    /// Short label, e.g. `Jan 2025`.
    pub label: String,
}

impl MonthMarker {
    fn new(start: NaiveDate) -> Self {
        Self {
            year: start.year(),
            month: start.month(),
            start,
            label: start.format("%b %Y").to_string(),
        }
    }
}

/// The drawn date range: `min_date` is the first day of a month, `max_date`
/// the last day of a month, `months` one marker per month in between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineBounds {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    pub months: Vec<MonthMarker>,
}

impl TimelineBounds {
    /// Bounds covering every scheduled item, rounded out to whole months.
    /// With nothing scheduled, a fixed window around `today`.
    pub fn compute<T: Scheduled>(items: &[T], today: NaiveDate) -> Self {
        let mut range: Option<(NaiveDate, NaiveDate)> = None;
        for (start, end) in items.iter().filter_map(Scheduled::span) {
            let lo = start.min(end);
            let hi = start.max(end);
            range = Some(match range {
                Some((min, max)) => (min.min(lo), max.max(hi)),
                None => (lo, hi),
            });
        }
        match range {
            Some((lo, hi)) => Self::spanning(lo, hi),
            None => Self::default_window(today),
        }
    }

    /// Whole months from `lo`'s month through `hi`'s month.
    pub fn spanning(lo: NaiveDate, hi: NaiveDate) -> Self {
        let min_date = first_of_month(lo);
        let max_date = last_of_month(hi);
        let mut months = Vec::new();
        let mut cursor = min_date;
        while cursor <= max_date {
            months.push(MonthMarker::new(cursor));
            match cursor.checked_add_months(Months::new(1)) {
                Some(next) => cursor = next,
                None => break,
            }
        }
        Self {
            min_date,
            max_date,
            months,
        }
    }

    /// `DEFAULT_WINDOW_MONTHS` months starting `DEFAULT_LOOKBACK_MONTHS`
    /// before the month of `today`.
    pub fn default_window(today: NaiveDate) -> Self {
        let this_month = first_of_month(today);
        let start = this_month
            .checked_sub_months(Months::new(DEFAULT_LOOKBACK_MONTHS))
            .unwrap_or(this_month);
        let end = start
            .checked_add_months(Months::new(DEFAULT_WINDOW_MONTHS - 1))
            .unwrap_or(start);
        Self::spanning(start, end)
    }

    /// Days covered, counting both ends.
    pub fn total_days(&self) -> i64 {
        (self.max_date - self.min_date).num_days() + 1
    }

    pub fn geometry<T: Scheduled>(&self, item: &T) -> Option<BarGeometry> {
        let (start, end) = item.span()?;
        Some(BarGeometry::compute(start, end, self))
    }
}

fn first_of_month(d: NaiveDate) -> NaiveDate {
    d.with_day(1).unwrap_or(d)
}

fn last_of_month(d: NaiveDate) -> NaiveDate {
    first_of_month(d)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(d)
}

// ---------------------------------------------------------------------------
// BarGeometry
// ---------------------------------------------------------------------------

/// Horizontal placement of one bar, in percent of the timeline width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarGeometry {
    pub left_percent: f64,
    pub width_percent: f64,
}

impl BarGeometry {
    /// Place `start..end` inside `bounds`. `left` stays within
    /// `[0, 100 - MIN_BAR_WIDTH]`, `width` is at least `MIN_BAR_WIDTH` and the
    /// bar never runs past the right edge.
    pub fn compute(start: NaiveDate, end: NaiveDate, bounds: &TimelineBounds) -> Self {
        let total = bounds.total_days().max(1) as f64;
        let offset = (start - bounds.min_date).num_days() as f64;
        let duration = (end - start).num_days() as f64;

        let left = (offset / total * 100.0).clamp(0.0, 100.0 - MIN_BAR_WIDTH);
        let raw_width = duration / total * 100.0;
        let width = raw_width.min(100.0 - left).max(MIN_BAR_WIDTH);

        Self {
            left_percent: left,
            width_percent: width,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn milestone(start: Option<NaiveDate>, deadline: Option<NaiveDate>) -> Milestone {
        Milestone {
            id: "m".to_string(),
            name: "m".to_string(),
            priority: "p".to_string(),
            status: "s".to_string(),
            accountable: "a".to_string(),
            start_date: start,
            deadline,
            has_start_date: false,
            activity_ids: Vec::new(),
        }
    }

    #[test]
    fn bounds_cover_estimated_lookback() {
        // Start dates as the projector derives them: deadline minus 3 months.
        let items = vec![
            milestone(Some(date(2024, 10, 15)), Some(date(2025, 1, 15))),
            milestone(Some(date(2025, 3, 1)), Some(date(2025, 6, 1))),
        ];
        let b = TimelineBounds::compute(&items, date(2030, 1, 1));
        assert_eq!(b.min_date, date(2024, 10, 1));
        assert_eq!(b.max_date, date(2025, 6, 30));
        let labels: Vec<&str> = b.months.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Oct 2024", "Nov 2024", "Dec 2024", "Jan 2025", "Feb 2025", "Mar 2025",
                "Apr 2025", "May 2025", "Jun 2025"
            ]
        );
    }

    #[test]
    fn undated_items_are_ignored_for_bounds() {
        let items = vec![
            milestone(Some(date(2020, 1, 1)), None),
            milestone(None, Some(date(2025, 2, 10))),
        ];
        let b = TimelineBounds::compute(&items, date(2030, 1, 1));
        assert_eq!(b.min_date, date(2025, 2, 1));
        assert_eq!(b.max_date, date(2025, 2, 28));
        assert_eq!(b.months.len(), 1);
        assert!(b.geometry(&items[0]).is_none());
    }

    #[test]
    fn no_deadlines_fall_back_to_window_around_today() {
        let items: Vec<Milestone> = vec![milestone(None, None)];
        let b = TimelineBounds::compute(&items, date(2026, 10, 19));
        assert_eq!(b.min_date, date(2026, 8, 1));
        assert_eq!(b.months.len(), DEFAULT_WINDOW_MONTHS as usize);
        assert_eq!(b.max_date, date(2028, 7, 31));
    }

    #[test]
    fn start_after_deadline_still_bounded() {
        let items = vec![milestone(Some(date(2025, 8, 1)), Some(date(2025, 7, 1)))];
        let b = TimelineBounds::compute(&items, date(2030, 1, 1));
        assert_eq!(b.min_date, date(2025, 7, 1));
        assert_eq!(b.max_date, date(2025, 8, 31));
        let g = b.geometry(&items[0]).unwrap();
        assert_eq!(g.width_percent, MIN_BAR_WIDTH);
    }

    #[test]
    fn same_day_bar_gets_minimum_width() {
        let b = TimelineBounds::spanning(date(2025, 1, 1), date(2025, 12, 31));
        let g = BarGeometry::compute(date(2025, 6, 1), date(2025, 6, 1), &b);
        assert_eq!(g.width_percent, MIN_BAR_WIDTH);
    }

    #[test]
    fn full_span_bar_fills_grid() {
        let b = TimelineBounds::spanning(date(2025, 1, 1), date(2025, 12, 31));
        let g = BarGeometry::compute(date(2025, 1, 1), date(2025, 12, 31), &b);
        assert_eq!(g.left_percent, 0.0);
        assert!(g.width_percent > 99.0 && g.width_percent <= 100.0);
    }

    #[test]
    fn geometry_stays_inside_grid() {
        let b = TimelineBounds::spanning(date(2025, 1, 1), date(2025, 12, 31));
        let dates = [
            date(2024, 11, 3),
            date(2025, 1, 1),
            date(2025, 4, 17),
            date(2025, 12, 30),
            date(2025, 12, 31),
            date(2026, 3, 1),
        ];
        for &start in &dates {
            for &end in &dates {
                let g = BarGeometry::compute(start, end, &b);
                assert!(g.left_percent >= 0.0 && g.left_percent <= 100.0, "{start}..{end}");
                assert!(g.width_percent >= MIN_BAR_WIDTH, "{start}..{end}");
                assert!(g.left_percent + g.width_percent <= 100.0 + EPS, "{start}..{end}");
            }
        }
    }

    #[test]
    fn action_spans_its_deadline() {
        let a = Action {
            id: "a".to_string(),
            name: "a".to_string(),
            responsible: "r".to_string(),
            deadline: Some(date(2025, 3, 3)),
            status: "s".to_string(),
            role: None,
            director_view: false,
            notes: None,
        };
        assert_eq!(a.span(), Some((date(2025, 3, 3), date(2025, 3, 3))));
    }
}
