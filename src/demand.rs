//! Demand derivation: class subjects → concrete demand items.
//!
//! Converts a class's subject definitions plus the global week shape into
//! an ordered list of atomic scheduling requests. Each theory subject
//! yields single-period items; each lab subject yields 3-period session
//! items. Integer allocation uses largest-remainder (Hamilton)
//! apportionment over the class's usable weekly capacity.
//!
//! Degenerate inputs (zero credits, no teachable subjects, zero capacity)
//! produce empty demand rather than errors.

use serde::{Deserialize, Serialize};

use crate::models::{catalog_credit_sum, program_min_credits, ClassUnit, Course, Program};

/// Grid cells one lab session occupies.
pub const LAB_SESSION_PERIODS: usize = 3;

/// One atomic scheduling request.
///
/// Either a single theory period or one 3-contiguous-period lab session.
/// The ACO solver pre-assigns a tentative `teacher` before placement; the
/// GA chooses teachers per instance and leaves it `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandItem {
    /// Subject name.
    pub subject: String,
    /// Whether this item is a 3-period lab session.
    pub is_lab: bool,
    /// Tentative teacher candidate, if pre-assigned.
    pub teacher: Option<String>,
}

impl DemandItem {
    /// Grid cells this item occupies.
    #[inline]
    pub fn span(&self) -> usize {
        if self.is_lab {
            LAB_SESSION_PERIODS
        } else {
            1
        }
    }
}

/// Usable scheduling capacity for one class week.
///
/// Break and elective indices each remove one period from every day.
pub fn usable_capacity(
    days: usize,
    hours: usize,
    break_slots: &[usize],
    elective_periods: &[usize],
) -> usize {
    let usable_per_day = hours.saturating_sub(break_slots.len() + elective_periods.len());
    days * usable_per_day
}

/// Resolves the minimum-credit target for a class.
///
/// Resolution order: explicit program record, catalog course-credit sum
/// for the program+semester, else the class's own teachable subject
/// credits.
pub fn min_required_credits(class: &ClassUnit, programs: &[Program], courses: &[Course]) -> f64 {
    if let Some(min) = program_min_credits(programs, &class.program, class.semester) {
        return min;
    }
    let catalog = catalog_credit_sum(courses, &class.program, class.semester);
    if catalog > 0.0 {
        return catalog;
    }
    class.teachable_subjects().map(|s| s.credits).sum()
}

/// Builds the demand list for one class.
///
/// Each teachable subject's credit share of `total_usable` determines its
/// desired period count (labs: desired sessions = periods / 3); integer
/// units are then apportioned by largest remainder, with leftover
/// capacity handed out in descending-remainder order, skipping any
/// subject whose unit cost (3 for labs) no longer fits.
pub fn build_demand(
    class: &ClassUnit,
    programs: &[Program],
    courses: &[Course],
    days: usize,
    hours: usize,
    break_slots: &[usize],
    elective_periods: &[usize],
) -> Vec<DemandItem> {
    let total_usable = usable_capacity(days, hours, break_slots, elective_periods);
    let min_credits = min_required_credits(class, programs, courses);
    if total_usable == 0 || min_credits <= 0.0 {
        return Vec::new();
    }

    struct Share<'a> {
        subject: &'a str,
        is_lab: bool,
        units: usize,
        remainder: f64,
        unit_cost: usize,
    }

    let mut shares: Vec<Share> = Vec::new();
    let mut used = 0usize;
    for subject in class.teachable_subjects() {
        if subject.credits <= 0.0 {
            continue;
        }
        let desired_periods = subject.credits / min_credits * total_usable as f64;
        let (desired_units, unit_cost) = if subject.is_lab() {
            (desired_periods / LAB_SESSION_PERIODS as f64, LAB_SESSION_PERIODS)
        } else {
            (desired_periods, 1)
        };
        let units = desired_units.floor() as usize;
        used += units * unit_cost;
        shares.push(Share {
            subject: &subject.name,
            is_lab: subject.is_lab(),
            units,
            remainder: desired_units - units as f64,
            unit_cost,
        });
    }

    // Largest-remainder distribution of whatever capacity the floors left.
    let mut remaining = total_usable.saturating_sub(used);
    shares.sort_by(|a, b| {
        b.remainder
            .partial_cmp(&a.remainder)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    loop {
        let mut placed = false;
        for share in shares.iter_mut() {
            if share.unit_cost <= remaining {
                share.units += 1;
                remaining -= share.unit_cost;
                placed = true;
            }
        }
        if !placed {
            break;
        }
    }

    // Restore class subject order for stable emission.
    let order: Vec<&str> = class.teachable_subjects().map(|s| s.name.as_str()).collect();
    shares.sort_by_key(|s| order.iter().position(|n| *n == s.subject));

    let mut demand = Vec::new();
    for share in &shares {
        for _ in 0..share.units {
            demand.push(DemandItem {
                subject: share.subject.to_string(),
                is_lab: share.is_lab,
                teacher: None,
            });
        }
    }
    demand
}
