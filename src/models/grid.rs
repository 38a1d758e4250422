//! Weekly slot grid model.
//!
//! A grid is the per-class day × period timetable. Cells start empty and
//! are pre-seeded with break and elective placeholders before a solver
//! sees them; solvers only ever write `Confirmed` cells.
//!
//! Grids are owned, independently cloneable values: sibling candidate
//! solutions must never observe each other's mutations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A complete candidate solution: class name → grid.
///
/// `BTreeMap` keeps cross-class iteration order deterministic.
pub type Solution = BTreeMap<String, Grid>;

/// Status of a filled grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    /// A placed subject period. The only status a solver may write or
    /// rewrite during search.
    Confirmed,
    /// Unassigned period, filled in by the result normalizer.
    Free,
    /// Fixed break. Never changes once set.
    Break,
    /// Reserved for elective-group meetings; the actual subject is
    /// resolved externally by which teacher occupies it.
    Elective,
}

/// One filled timetable cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    /// Subject name ("Break"/"Free"/"Elective" for placeholders).
    pub subject: String,
    /// Owning class name.
    pub class_name: String,
    /// Cell status.
    pub status: SlotStatus,
    /// Assigned teacher ID; empty when unstaffed.
    pub teacher: String,
}

impl Slot {
    /// Creates a confirmed subject slot.
    pub fn confirmed(
        subject: impl Into<String>,
        class_name: impl Into<String>,
        teacher: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            class_name: class_name.into(),
            status: SlotStatus::Confirmed,
            teacher: teacher.into(),
        }
    }

    /// Creates a break placeholder.
    pub fn break_slot(class_name: impl Into<String>) -> Self {
        Self {
            subject: "Break".into(),
            class_name: class_name.into(),
            status: SlotStatus::Break,
            teacher: String::new(),
        }
    }

    /// Creates an elective placeholder.
    pub fn elective(class_name: impl Into<String>) -> Self {
        Self {
            subject: "Elective".into(),
            class_name: class_name.into(),
            status: SlotStatus::Elective,
            teacher: String::new(),
        }
    }

    /// Creates a free-period slot.
    pub fn free(class_name: impl Into<String>) -> Self {
        Self {
            subject: "Free".into(),
            class_name: class_name.into(),
            status: SlotStatus::Free,
            teacher: String::new(),
        }
    }
}

/// A per-class day × period timetable grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    /// Working days (rows).
    pub days: usize,
    /// Periods per day (columns).
    pub hours: usize,
    /// `cells[day][period]`; `None` = not yet assigned.
    pub cells: Vec<Vec<Option<Slot>>>,
}

impl Grid {
    /// Creates an all-empty grid.
    pub fn blank(days: usize, hours: usize) -> Self {
        Self {
            days,
            hours,
            cells: vec![vec![None; hours]; days],
        }
    }

    /// Creates a grid pre-seeded with break and elective placeholders.
    ///
    /// Breaks land at every configured index, every day (out-of-range
    /// indices are ignored). Elective markers rotate per day:
    /// `(index + day) mod hours`, linear-probing forward (with wraparound)
    /// past occupied cells so two markers never collide on one day.
    pub fn seeded(
        class_name: &str,
        days: usize,
        hours: usize,
        break_slots: &[usize],
        elective_periods: &[usize],
    ) -> Self {
        let mut grid = Self::blank(days, hours);
        for day in 0..days {
            for &b in break_slots {
                if b < hours {
                    grid.cells[day][b] = Some(Slot::break_slot(class_name));
                }
            }
        }
        for day in 0..days {
            for &e in elective_periods {
                if hours == 0 {
                    continue;
                }
                let mut period = (e + day) % hours;
                for _ in 0..hours {
                    if grid.cells[day][period].is_none() {
                        grid.cells[day][period] = Some(Slot::elective(class_name));
                        break;
                    }
                    period = (period + 1) % hours;
                }
            }
        }
        grid
    }

    /// Returns the cell at (day, period), if within bounds and filled.
    pub fn cell(&self, day: usize, period: usize) -> Option<&Slot> {
        self.cells.get(day)?.get(period)?.as_ref()
    }

    /// Whether the cell at (day, period) is unassigned.
    pub fn is_empty_cell(&self, day: usize, period: usize) -> bool {
        matches!(self.cells.get(day).and_then(|row| row.get(period)), Some(None))
    }

    /// Writes a slot at (day, period). Out-of-bounds writes are ignored.
    pub fn set(&mut self, day: usize, period: usize, slot: Slot) {
        if let Some(cell) = self.cells.get_mut(day).and_then(|row| row.get_mut(period)) {
            *cell = Some(slot);
        }
    }

    /// Iterates all filled cells as `(day, period, &slot)`.
    pub fn iter_slots(&self) -> impl Iterator<Item = (usize, usize, &Slot)> {
        self.cells.iter().enumerate().flat_map(|(day, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(period, cell)| cell.as_ref().map(|s| (day, period, s)))
        })
    }

    /// Counts filled cells with the given status.
    pub fn count_status(&self, status: SlotStatus) -> usize {
        self.iter_slots().filter(|(_, _, s)| s.status == status).count()
    }

    /// Counts confirmed occurrences of a subject on one day.
    pub fn subject_count_on_day(&self, day: usize, subject: &str) -> usize {
        let Some(row) = self.cells.get(day) else {
            return 0;
        };
        row.iter()
            .flatten()
            .filter(|s| s.status == SlotStatus::Confirmed && s.subject == subject)
            .count()
    }

    /// Period indices of confirmed occurrences of a subject on one day.
    pub fn subject_periods_on_day(&self, day: usize, subject: &str) -> Vec<usize> {
        let Some(row) = self.cells.get(day) else {
            return Vec::new();
        };
        row.iter()
            .enumerate()
            .filter_map(|(period, cell)| {
                cell.as_ref()
                    .filter(|s| s.status == SlotStatus::Confirmed && s.subject == subject)
                    .map(|_| period)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_grid() {
        let grid = Grid::blank(5, 6);
        assert_eq!(grid.days, 5);
        assert_eq!(grid.hours, 6);
        assert!(grid.is_empty_cell(0, 0));
        assert!(grid.is_empty_cell(4, 5));
        assert!(!grid.is_empty_cell(5, 0)); // out of bounds
    }

    #[test]
    fn test_seeded_breaks_every_day() {
        let grid = Grid::seeded("C1", 5, 6, &[2, 4], &[]);
        for day in 0..5 {
            assert_eq!(grid.cell(day, 2).unwrap().status, SlotStatus::Break);
            assert_eq!(grid.cell(day, 4).unwrap().status, SlotStatus::Break);
        }
        assert_eq!(grid.count_status(SlotStatus::Break), 10);
    }

    #[test]
    fn test_elective_rotation() {
        // electivePeriodIndices=[3], 2 working days: day 0 at period 3,
        // day 1 at period (3+1) % hours.
        let grid = Grid::seeded("C1", 2, 5, &[], &[3]);
        assert_eq!(grid.cell(0, 3).unwrap().status, SlotStatus::Elective);
        assert_eq!(grid.cell(1, 4).unwrap().status, SlotStatus::Elective);
    }

    #[test]
    fn test_elective_probes_past_break() {
        // Break sits exactly where the rotated elective would land; the
        // marker must probe forward to the next free cell that day.
        let grid = Grid::seeded("C1", 1, 5, &[3], &[3]);
        assert_eq!(grid.cell(0, 3).unwrap().status, SlotStatus::Break);
        assert_eq!(grid.cell(0, 4).unwrap().status, SlotStatus::Elective);
    }

    #[test]
    fn test_elective_probe_wraps() {
        let grid = Grid::seeded("C1", 1, 3, &[2], &[2]);
        assert_eq!(grid.cell(0, 2).unwrap().status, SlotStatus::Break);
        // Probe wraps to period 0.
        assert_eq!(grid.cell(0, 0).unwrap().status, SlotStatus::Elective);
    }

    #[test]
    fn test_out_of_range_break_ignored() {
        let grid = Grid::seeded("C1", 2, 4, &[9], &[]);
        assert_eq!(grid.count_status(SlotStatus::Break), 0);
    }

    #[test]
    fn test_subject_queries() {
        let mut grid = Grid::blank(2, 4);
        grid.set(0, 0, Slot::confirmed("Math", "C1", "T1"));
        grid.set(0, 1, Slot::confirmed("Math", "C1", "T1"));
        grid.set(0, 2, Slot::confirmed("Art", "C1", "T2"));
        grid.set(1, 0, Slot::free("C1"));

        assert_eq!(grid.subject_count_on_day(0, "Math"), 2);
        assert_eq!(grid.subject_periods_on_day(0, "Math"), vec![0, 1]);
        assert_eq!(grid.subject_count_on_day(1, "Math"), 0);
        // Free slots never count as subject occurrences.
        assert_eq!(grid.subject_count_on_day(1, "Free"), 0);
    }

    #[test]
    fn test_iter_slots() {
        let grid = Grid::seeded("C1", 2, 3, &[1], &[]);
        let filled: Vec<_> = grid.iter_slots().collect();
        assert_eq!(filled.len(), 2);
        assert!(filled.iter().all(|(_, p, s)| *p == 1 && s.status == SlotStatus::Break));
    }
}
