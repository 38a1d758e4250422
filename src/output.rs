//! Result normalization.
//!
//! Turns the best solution a solver found into the final generation
//! result: every remaining empty cell becomes a Free slot, confirmed
//! cells are re-stamped with their owning class and status, and each
//! teacher's remaining weekly hours are derived from actual usage.
//! Normalization is idempotent.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::models::{ClassUnit, Grid, Slot, SlotStatus, Solution, Teacher};

/// Final output of one generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Class name → fully-filled weekly grid.
    pub timetables: BTreeMap<String, Grid>,
    /// Teacher ID → `max(0, weekly_hours − periods used)`.
    pub teacher_hours_left: BTreeMap<String, u32>,
}

/// Fills unassigned cells with Free slots and re-stamps filled cells
/// with their owning class name.
pub fn normalize(solution: &mut Solution) {
    for (class_name, grid) in solution.iter_mut() {
        for row in grid.cells.iter_mut() {
            for cell in row.iter_mut() {
                match cell {
                    None => *cell = Some(Slot::free(class_name)),
                    Some(slot) => slot.class_name = class_name.clone(),
                }
            }
        }
    }
}

/// Periods each teacher spends on elective-group meetings.
///
/// Conservative attribution: every teacher listed under any elective
/// option of a class is charged for all of that class's elective slots.
pub fn elective_usage(classes: &[ClassUnit], solution: &Solution) -> HashMap<String, u32> {
    let mut usage: HashMap<String, u32> = HashMap::new();
    for class in classes {
        let Some(grid) = solution.get(&class.name) else {
            continue;
        };
        let elective_cells = grid.count_status(SlotStatus::Elective) as u32;
        if elective_cells == 0 {
            continue;
        }
        for group in class.elective_groups() {
            for option in &group.options {
                for teacher in &option.teachers {
                    *usage.entry(teacher.clone()).or_insert(0) += elective_cells;
                }
            }
        }
    }
    usage
}

/// Finalizes a solution into a [`GenerationResult`].
///
/// `extra_usage` carries periods not visible as confirmed cells (elective
/// attribution from the ACO path); pass an empty map otherwise.
pub fn finalize(
    mut solution: Solution,
    teachers: &[Teacher],
    extra_usage: &HashMap<String, u32>,
) -> GenerationResult {
    normalize(&mut solution);

    let mut used: HashMap<&str, u32> = HashMap::new();
    for grid in solution.values() {
        for (_, _, slot) in grid.iter_slots() {
            if slot.status == SlotStatus::Confirmed && !slot.teacher.is_empty() {
                *used.entry(slot.teacher.as_str()).or_insert(0) += 1;
            }
        }
    }

    let teacher_hours_left = teachers
        .iter()
        .map(|t| {
            let spent = used.get(t.id.as_str()).copied().unwrap_or(0)
                + extra_usage.get(&t.id).copied().unwrap_or(0);
            (t.id.clone(), t.weekly_hours.saturating_sub(spent))
        })
        .collect();

    GenerationResult {
        timetables: solution,
        teacher_hours_left,
    }
}
