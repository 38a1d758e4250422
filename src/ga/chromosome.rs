//! Timetable chromosome for the genetic scheduler.
//!
//! A chromosome is one complete multi-class solution. Whole class grids
//! are the unit of recombination: crossover coin-flips each class's grid
//! from one parent or the other, never splitting a grid mid-week.
//! Chromosomes are deep, owned values; siblings never observe each
//! other's mutations.

use rand::prelude::IndexedRandom;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

use crate::models::{Grid, Slot, SlotStatus, Solution, Teacher};

/// Per-class data the GA needs to build and mutate grids.
#[derive(Debug, Clone)]
pub struct ClassGenome {
    /// Class name.
    pub name: String,
    /// Teachable subject names with credit weights.
    pub subjects: Vec<(String, f64)>,
    /// Subject → eligible teacher IDs (known, non-zero weekly target).
    pub eligible: HashMap<String, Vec<String>>,
    /// Break period indices within range.
    pub break_slots: Vec<usize>,
}

/// One candidate timetable (complete solution) with cached fitness.
#[derive(Debug, Clone)]
pub struct TimetableChromosome {
    /// Class name → grid.
    pub solution: Solution,
    /// Cached fitness (higher = better); `NEG_INFINITY` = unevaluated.
    pub fitness: f64,
}

impl TimetableChromosome {
    /// Creates a random chromosome.
    ///
    /// Per class: a shuffled pool sized to non-break capacity —
    /// credit-proportioned subject picks (scaled by the free-period
    /// share), leftover filled with random subjects, padded with Free —
    /// popped into cells day-major/period-minor. Teachers are drawn from
    /// the eligible set in randomized order, first with hours left wins;
    /// the hours tracker spans the whole chromosome.
    pub fn random<R: Rng>(
        genomes: &[ClassGenome],
        teachers: &[Teacher],
        days: usize,
        hours: usize,
        free_percentage: f64,
        rng: &mut R,
    ) -> Self {
        let mut hours_left: HashMap<&str, i64> = teachers
            .iter()
            .map(|t| (t.id.as_str(), t.weekly_hours as i64))
            .collect();

        let mut solution = Solution::new();
        for genome in genomes {
            let grid = Self::random_grid(genome, &mut hours_left, days, hours, free_percentage, rng);
            solution.insert(genome.name.clone(), grid);
        }
        Self {
            solution,
            fitness: f64::NEG_INFINITY,
        }
    }

    fn random_grid<R: Rng>(
        genome: &ClassGenome,
        hours_left: &mut HashMap<&str, i64>,
        days: usize,
        hours: usize,
        free_percentage: f64,
        rng: &mut R,
    ) -> Grid {
        let per_day = hours.saturating_sub(genome.break_slots.len());
        let capacity = days * per_day;
        let subject_slots =
            ((capacity as f64) * (1.0 - free_percentage / 100.0)).round() as usize;
        let subject_slots = subject_slots.min(capacity);

        // Pool of subject picks, credit-proportioned then topped up.
        let total_credits: f64 = genome.subjects.iter().map(|(_, c)| c).sum();
        let mut pool: Vec<Option<String>> = Vec::with_capacity(capacity);
        if total_credits > 0.0 {
            for (name, credits) in &genome.subjects {
                let share = (credits / total_credits * subject_slots as f64).round() as usize;
                for _ in 0..share {
                    if pool.len() < subject_slots {
                        pool.push(Some(name.clone()));
                    }
                }
            }
            while pool.len() < subject_slots {
                let (name, _) = genome.subjects.choose(rng).expect("non-empty subjects");
                pool.push(Some(name.clone()));
            }
        }
        while pool.len() < capacity {
            pool.push(None);
        }
        pool.shuffle(rng);

        let mut grid = Grid::blank(days, hours);
        for day in 0..days {
            for &b in &genome.break_slots {
                grid.set(day, b, Slot::break_slot(&genome.name));
            }
        }
        let mut items = pool.into_iter();
        for day in 0..days {
            for period in 0..hours {
                if !grid.is_empty_cell(day, period) {
                    continue;
                }
                match items.next().flatten() {
                    Some(subject) => {
                        let teacher =
                            Self::pick_teacher(genome, &subject, hours_left, rng).unwrap_or_default();
                        grid.set(
                            day,
                            period,
                            Slot::confirmed(subject.as_str(), genome.name.as_str(), teacher),
                        );
                    }
                    None => grid.set(day, period, Slot::free(&genome.name)),
                }
            }
        }
        grid
    }

    /// First eligible teacher, in randomized order, with hours left.
    fn pick_teacher<R: Rng>(
        genome: &ClassGenome,
        subject: &str,
        hours_left: &mut HashMap<&str, i64>,
        rng: &mut R,
    ) -> Option<String> {
        let pool = genome.eligible.get(subject)?;
        let mut order: Vec<&String> = pool.iter().collect();
        order.shuffle(rng);
        for id in order {
            if let Some(left) = hours_left.get_mut(id.as_str()) {
                if *left > 0 {
                    *left -= 1;
                    return Some(id.clone());
                }
            }
        }
        None
    }
}

/// Per-class coin-flip crossover: each class grid comes whole from one
/// parent or the other.
pub fn class_crossover<R: Rng>(
    p1: &TimetableChromosome,
    p2: &TimetableChromosome,
    rng: &mut R,
) -> TimetableChromosome {
    let mut solution = Solution::new();
    for (name, grid) in &p1.solution {
        let donor = if rng.random_bool(0.5) {
            grid
        } else {
            p2.solution.get(name).unwrap_or(grid)
        };
        solution.insert(name.clone(), donor.clone());
    }
    TimetableChromosome {
        solution,
        fitness: f64::NEG_INFINITY,
    }
}

/// Mutates a chromosome in place.
///
/// Per class, independently: with probability `rate`, swap two randomly
/// chosen non-break cells; with probability 0.5, reassign one confirmed
/// slot's teacher to another eligible candidate for that subject.
pub fn mutate<R: Rng>(
    chromosome: &mut TimetableChromosome,
    genomes: &[ClassGenome],
    rate: f64,
    rng: &mut R,
) {
    for genome in genomes {
        let Some(grid) = chromosome.solution.get_mut(&genome.name) else {
            continue;
        };
        if rng.random_bool(rate) {
            swap_cells(grid, rng);
        }
        if rng.random_bool(0.5) {
            reassign_teacher(grid, genome, rng);
        }
    }
    chromosome.fitness = f64::NEG_INFINITY;
}

/// Swaps the contents of two random non-break cells.
fn swap_cells<R: Rng>(grid: &mut Grid, rng: &mut R) {
    let swappable: Vec<(usize, usize)> = cell_positions(grid, |slot| {
        slot.map_or(true, |s| s.status != SlotStatus::Break)
    });
    if swappable.len() < 2 {
        return;
    }
    let a = swappable[rng.random_range(0..swappable.len())];
    let b = swappable[rng.random_range(0..swappable.len())];
    if a == b {
        return;
    }
    let slot_a = grid.cells[a.0][a.1].take();
    let slot_b = grid.cells[b.0][b.1].take();
    grid.cells[a.0][a.1] = slot_b;
    grid.cells[b.0][b.1] = slot_a;
}

/// Reassigns one random confirmed slot's teacher among its eligible set.
fn reassign_teacher<R: Rng>(grid: &mut Grid, genome: &ClassGenome, rng: &mut R) {
    let confirmed: Vec<(usize, usize)> = cell_positions(grid, |slot| {
        slot.map_or(false, |s| s.status == SlotStatus::Confirmed)
    });
    let Some(&(day, period)) = confirmed.choose(rng) else {
        return;
    };
    let subject = grid.cells[day][period]
        .as_ref()
        .map(|s| s.subject.clone())
        .unwrap_or_default();
    if let Some(pool) = genome.eligible.get(&subject) {
        if let Some(teacher) = pool.choose(rng) {
            if let Some(slot) = grid.cells[day][period].as_mut() {
                slot.teacher = teacher.clone();
            }
        }
    }
}

fn cell_positions<F>(grid: &Grid, keep: F) -> Vec<(usize, usize)>
where
    F: Fn(Option<&Slot>) -> bool,
{
    let mut positions = Vec::new();
    for day in 0..grid.days {
        for period in 0..grid.hours {
            if keep(grid.cells[day][period].as_ref()) {
                positions.push((day, period));
            }
        }
    }
    positions
}
