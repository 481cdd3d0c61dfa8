use crate::domain::model::{Project, ProjectSummary};
use std::cmp::Ordering;

pub const ITEMS_PER_PAGE: usize = 10;
pub const TOP_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    ScoreInitial,
    ScoreDevelopment,
    ScoreReady,
    Total,
}

impl SortKey {
    pub fn column(&self) -> &'static str {
        match self {
            SortKey::ScoreInitial => "Puntaje TRL 1-3",
            SortKey::ScoreDevelopment => "Puntaje TRL 4-7",
            SortKey::ScoreReady => "Puntaje TRL 8-9",
            SortKey::Total => "Puntaje Total",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Rows the projects table can order.
pub trait ScoredRow {
    fn is_approved(&self) -> bool;
    fn score(&self, key: SortKey) -> f64;
}

impl ScoredRow for ProjectSummary {
    fn is_approved(&self) -> bool {
        self.approval.is_approved()
    }

    fn score(&self, key: SortKey) -> f64 {
        match key {
            SortKey::ScoreInitial => self.score_initial,
            SortKey::ScoreDevelopment => self.score_development,
            SortKey::ScoreReady => self.score_ready,
            SortKey::Total => self.total_score,
        }
    }
}

impl ScoredRow for Project {
    fn is_approved(&self) -> bool {
        Project::is_approved(self)
    }

    fn score(&self, key: SortKey) -> f64 {
        match key {
            SortKey::ScoreInitial => self.score_initial,
            SortKey::ScoreDevelopment => self.score_development,
            SortKey::ScoreReady => self.score_ready,
            SortKey::Total => self.total_score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            key: SortKey::Total,
            direction: SortDirection::Descending,
        }
    }
}

impl SortConfig {
    /// Same key while ascending flips to descending; anything else sorts ascending.
    pub fn request_sort(&mut self, key: SortKey) {
        self.direction = if self.key == key && self.direction == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        self.key = key;
    }

    pub fn compare<R: ScoredRow>(&self, a: &R, b: &R) -> Ordering {
        match (a.is_approved(), b.is_approved()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
        let ordering = a
            .score(self.key)
            .partial_cmp(&b.score(self.key))
            .unwrap_or(Ordering::Equal);
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Stable sort: approved rows first, then by the configured key.
pub fn sort_projects<R: ScoredRow + Clone>(rows: &[R], config: &SortConfig) -> Vec<R> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| config.compare(a, b));
    sorted
}

pub fn total_pages(len: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    len.div_ceil(per_page)
}

/// 1-based page slice; out-of-range pages are empty.
pub fn paginate<T>(rows: &[T], page: usize, per_page: usize) -> &[T] {
    if page == 0 || per_page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(per_page);
    if start >= rows.len() {
        return &[];
    }
    let end = (start + per_page).min(rows.len());
    &rows[start..end]
}

pub fn has_prev(page: usize) -> bool {
    page > 1
}

pub fn has_next(page: usize, len: usize, per_page: usize) -> bool {
    page < total_pages(len, per_page)
}

/// Ten highest totals, descending, ties in input order.
pub fn top10(rows: &[ProjectSummary]) -> Vec<ProjectSummary> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
    sorted.truncate(TOP_COUNT);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Approval, Segment};

    fn row(name: &str, approved: bool, initial: f64, total: f64) -> ProjectSummary {
        ProjectSummary {
            name: name.to_string(),
            approval: Approval::from(approved),
            score_initial: initial,
            score_development: 0.0,
            score_ready: 0.0,
            total_score: total,
            segment: Segment::Initial,
            industry: None,
            insights: Vec::new(),
        }
    }

    fn names(rows: &[ProjectSummary]) -> Vec<&str> {
        rows.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_request_sort_toggles() {
        let mut config = SortConfig::default();
        assert_eq!(config.key, SortKey::Total);
        assert_eq!(config.direction, SortDirection::Descending);

        // 同一欄位但目前為降冪 → 升冪
        config.request_sort(SortKey::Total);
        assert_eq!(config.direction, SortDirection::Ascending);

        config.request_sort(SortKey::Total);
        assert_eq!(config.direction, SortDirection::Descending);

        config.request_sort(SortKey::ScoreInitial);
        assert_eq!(config.key, SortKey::ScoreInitial);
        assert_eq!(config.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_approved_rows_come_first() {
        let rows = vec![
            row("a", false, 10.0, 90.0),
            row("b", true, 30.0, 55.0),
            row("c", false, 20.0, 10.0),
            row("d", true, 5.0, 70.0),
        ];

        let sorted = sort_projects(&rows, &SortConfig::default());
        assert_eq!(names(&sorted), vec!["d", "b", "a", "c"]);

        let by_initial = SortConfig {
            key: SortKey::ScoreInitial,
            direction: SortDirection::Ascending,
        };
        assert_eq!(names(&sort_projects(&rows, &by_initial)), vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn test_pagination() {
        let rows: Vec<usize> = (0..23).collect();
        assert_eq!(total_pages(rows.len(), ITEMS_PER_PAGE), 3);
        assert_eq!(total_pages(0, ITEMS_PER_PAGE), 0);
        assert_eq!(paginate(&rows, 1, ITEMS_PER_PAGE).len(), 10);
        assert_eq!(paginate(&rows, 3, ITEMS_PER_PAGE), &[20, 21, 22]);
        assert!(paginate(&rows, 4, ITEMS_PER_PAGE).is_empty());
        assert!(paginate(&rows, 0, ITEMS_PER_PAGE).is_empty());

        assert!(!has_prev(1));
        assert!(has_prev(2));
        assert!(has_next(2, rows.len(), ITEMS_PER_PAGE));
        assert!(!has_next(3, rows.len(), ITEMS_PER_PAGE));
    }

    #[test]
    fn test_top10() {
        let rows: Vec<ProjectSummary> = (0..12)
            .map(|i| row(&format!("p{}", i), i % 2 == 0, 0.0, i as f64))
            .collect();
        let top = top10(&rows);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].name, "p11");
        assert_eq!(top[9].name, "p2");
    }
}
