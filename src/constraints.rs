//! Placement feasibility and solution scoring.
//!
//! `can_place` answers whether one demand item fits a grid cell without
//! breaking hard placement rules (occupancy, lab contiguity, teacher
//! availability, theory daily repeat limits). `evaluate` scores a
//! complete multi-class solution as a negated penalty sum; both solvers
//! maximize it.

use itertools::Itertools;
use std::collections::{HashMap, HashSet};

use crate::demand::DemandItem;
use crate::models::{Grid, SlotStatus, Solution, Teacher};

/// Penalty weight per teacher double-booking collision.
pub const W_TEACHER_CONFLICT: f64 = 6.0;
/// Penalty weight per daily subject occurrence beyond two.
pub const W_DAILY_EXCESS: f64 = 2.0;
/// Penalty weight per excess adjacency in a same-subject run beyond two.
pub const W_ADJACENT_REPEAT: f64 = 3.0;
/// Penalty weight per excess streak unit beyond two.
pub const W_LONG_STREAK: f64 = 1.0;
/// Penalty weight per confirmed cell with no teacher.
pub const W_UNSTAFFED: f64 = 1.0;
/// Penalty weight on per-subject daily-count variance.
pub const W_SUBJECT_SPREAD: f64 = 1.5;
/// Penalty weight on per-teacher daily-load variance.
pub const W_TEACHER_SPREAD: f64 = 2.0;
/// Penalty weight per period a teacher is used beyond target hours.
pub const W_OVERFLOW: f64 = 4.0;
/// Penalty weight per period of absolute deviation from target hours.
pub const W_DEVIATION: f64 = 0.5;

/// Per-candidate teacher occupancy across all classes.
///
/// One tracker exists per candidate solution under construction, passed
/// by `&mut` into per-class placement, reset for every ant. Never shared
/// across candidates.
#[derive(Debug, Clone, Default)]
pub struct TeacherTracker {
    busy: HashSet<(String, usize, usize)>,
}

impl TeacherTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a teacher is already occupied at (day, period).
    pub fn is_busy(&self, teacher: &str, day: usize, period: usize) -> bool {
        self.busy.contains(&(teacher.to_string(), day, period))
    }

    /// Marks a teacher occupied at (day, period).
    pub fn mark(&mut self, teacher: &str, day: usize, period: usize) {
        if !teacher.is_empty() {
            self.busy.insert((teacher.to_string(), day, period));
        }
    }

    /// Whether a teacher is free for `span` consecutive periods.
    ///
    /// An empty teacher (unstaffed item) is always considered free.
    pub fn is_span_free(&self, teacher: &str, day: usize, period: usize, span: usize) -> bool {
        if teacher.is_empty() {
            return true;
        }
        (0..span).all(|off| !self.is_busy(teacher, day, period + off))
    }
}

/// Whether `item` may be placed at (day, period) of `grid`.
///
/// Checks, in order: cell occupancy over the item's span, lab sessions
/// not running past the last period, teacher availability over the span,
/// and (theory only) the at-most-twice-per-day / adjacent-double rule.
pub fn can_place(
    grid: &Grid,
    day: usize,
    period: usize,
    item: &DemandItem,
    tracker: &TeacherTracker,
) -> bool {
    let span = item.span();
    if period + span > grid.hours {
        return false;
    }
    if !(0..span).all(|off| grid.is_empty_cell(day, period + off)) {
        return false;
    }
    let teacher = item.teacher.as_deref().unwrap_or("");
    if !tracker.is_span_free(teacher, day, period, span) {
        return false;
    }
    if !item.is_lab {
        let existing = grid.subject_periods_on_day(day, &item.subject);
        match existing.len() {
            0 => {}
            1 => {
                let other = existing[0];
                if period.abs_diff(other) != 1 {
                    return false;
                }
            }
            _ => return false,
        }
    }
    true
}

/// Scores a complete solution. Higher is better (negated penalty sum).
pub fn evaluate(solution: &Solution, teachers: &[Teacher]) -> f64 {
    let mut penalty = 0.0;

    penalty += conflict_penalty(solution);
    penalty += repetition_penalty(solution);
    penalty += spread_penalty(solution);
    penalty += workload_penalty(solution, teachers);
    penalty += staffing_penalty(solution);

    -penalty
}

/// Teacher double-booking across classes at the same (day, period).
fn conflict_penalty(solution: &Solution) -> f64 {
    let mut occupancy: HashMap<(&str, usize, usize), usize> = HashMap::new();
    for grid in solution.values() {
        for (day, period, slot) in grid.iter_slots() {
            if slot.status == SlotStatus::Confirmed && !slot.teacher.is_empty() {
                *occupancy
                    .entry((slot.teacher.as_str(), day, period))
                    .or_insert(0) += 1;
            }
        }
    }
    occupancy
        .values()
        .map(|&count| (count.saturating_sub(1)) as f64 * W_TEACHER_CONFLICT)
        .sum()
}

/// Daily repeats beyond two and same-subject streaks beyond length two.
fn repetition_penalty(solution: &Solution) -> f64 {
    let mut penalty = 0.0;
    for grid in solution.values() {
        for row in &grid.cells {
            // Occurrence counts per subject on this day.
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for slot in row.iter().flatten() {
                if slot.status == SlotStatus::Confirmed {
                    *counts.entry(slot.subject.as_str()).or_insert(0) += 1;
                }
            }
            for &count in counts.values() {
                penalty += count.saturating_sub(2) as f64 * W_DAILY_EXCESS;
            }

            // Maximal same-subject runs; a length-2 run (the legal
            // adjacent double) is free, anything longer is penalized.
            let keys = row.iter().map(|cell| {
                cell.as_ref()
                    .filter(|s| s.status == SlotStatus::Confirmed)
                    .map(|s| s.subject.as_str())
            });
            for (key, run) in &keys.chunk_by(|k| *k) {
                if key.is_some() {
                    let len = run.count();
                    let excess = len.saturating_sub(2) as f64;
                    penalty += excess * (W_ADJACENT_REPEAT + W_LONG_STREAK);
                }
            }
        }
    }
    penalty
}

/// Variance of per-subject daily counts (encourages spreading a subject
/// across the week).
fn spread_penalty(solution: &Solution) -> f64 {
    let mut penalty = 0.0;
    for grid in solution.values() {
        let mut daily_counts: HashMap<&str, Vec<f64>> = HashMap::new();
        for (day, _, slot) in grid.iter_slots() {
            if slot.status == SlotStatus::Confirmed {
                daily_counts
                    .entry(slot.subject.as_str())
                    .or_insert_with(|| vec![0.0; grid.days])[day] += 1.0;
            }
        }
        for counts in daily_counts.values() {
            penalty += variance(counts) * W_SUBJECT_SPREAD;
        }
    }
    penalty
}

/// Teacher usage vs. target hours plus daily-load evenness.
fn workload_penalty(solution: &Solution, teachers: &[Teacher]) -> f64 {
    let days = solution.values().map(|g| g.days).max().unwrap_or(0);
    let mut daily_load: HashMap<&str, Vec<f64>> = HashMap::new();
    for grid in solution.values() {
        for (day, _, slot) in grid.iter_slots() {
            if slot.status == SlotStatus::Confirmed && !slot.teacher.is_empty() {
                daily_load
                    .entry(slot.teacher.as_str())
                    .or_insert_with(|| vec![0.0; days])[day] += 1.0;
            }
        }
    }

    let mut penalty = 0.0;
    for loads in daily_load.values() {
        penalty += variance(loads) * W_TEACHER_SPREAD;
    }
    for teacher in teachers {
        let used: f64 = daily_load
            .get(teacher.id.as_str())
            .map(|loads| loads.iter().sum())
            .unwrap_or(0.0);
        let target = teacher.weekly_hours as f64;
        penalty += (used - target).max(0.0) * W_OVERFLOW;
        penalty += (used - target).abs() * W_DEVIATION;
    }
    penalty
}

/// Confirmed cells left without a teacher.
fn staffing_penalty(solution: &Solution) -> f64 {
    solution
        .values()
        .flat_map(|grid| grid.iter_slots())
        .filter(|(_, _, s)| s.status == SlotStatus::Confirmed && s.teacher.is_empty())
        .count() as f64
        * W_UNSTAFFED
}

/// Population variance.
fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}
