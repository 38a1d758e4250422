//! Ant-colony timetable scheduler.
//!
//! Each ant independently constructs one complete multi-class solution:
//! demand items are placed one by one, choosing among feasible grid
//! cells by roulette-wheel sampling over `tau^alpha * eta^beta`
//! transition weights. After every iteration the pheromone table
//! evaporates and the iteration-best solution reinforces its trails.
//! The global best across all iterations is the result.
//!
//! Construction is fail-open: an item with no feasible cell is dropped
//! and the periods it would have used end up Free.
//!
//! # Reference
//! Dorigo & Stützle (2004), "Ant Colony Optimization"

mod pheromone;

pub use pheromone::{PheromoneTable, PHEROMONE_FLOOR, PHEROMONE_REWARD};

use log::{debug, trace};
use rand::prelude::IndexedRandom;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

use crate::constraints::{can_place, evaluate, TeacherTracker};
use crate::demand::{build_demand, DemandItem};
use crate::models::{rating_for, CourseRating, Grid, Slot, SlotStatus, Solution};
use crate::output::{elective_usage, finalize, GenerationResult};
use crate::request::TimetableRequest;
use crate::validation::{validate_request, ValidationError};
use crate::TimetableSolver;

/// Damping applied to lab placements starting after the day midpoint.
/// A soft preference only: late starts stay in the roulette.
const LATE_LAB_DAMPING: f64 = 0.25;
/// Weight factor for rule-compliant theory placements. Compliance is
/// pre-filtered, so this is uniform over surviving candidates; kept for
/// parity with trail weighting.
const THEORY_COMPLIANT_WEIGHT: f64 = 1.05;
/// Scale of the course-rating nudge (extreme ratings pull placement).
const RATING_NUDGE: f64 = 0.1;
/// Rating sweet spot on the 1-5 scale.
const RATING_SWEET_SPOT: f64 = 3.0;

/// Tunable parameters for the ant-colony scheduler.
///
/// Out-of-range values are clamped, never rejected.
#[derive(Debug, Clone)]
pub struct AcoOptions {
    /// Candidate solutions per iteration (10-200).
    pub ants: usize,
    /// Iterations (10-400).
    pub iterations: usize,
    /// Pheromone evaporation rate (0.01-0.99).
    pub evaporation: f64,
    /// Pheromone exponent (0.1-5.0).
    pub alpha: f64,
    /// Heuristic exponent (0.1-5.0).
    pub beta: f64,
}

impl Default for AcoOptions {
    fn default() -> Self {
        Self {
            ants: 40,
            iterations: 80,
            evaporation: 0.3,
            alpha: 1.0,
            beta: 2.0,
        }
    }
}

impl AcoOptions {
    /// Sets the ant count.
    pub fn with_ants(mut self, ants: usize) -> Self {
        self.ants = ants;
        self
    }

    /// Sets the iteration count.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the evaporation rate.
    pub fn with_evaporation(mut self, evaporation: f64) -> Self {
        self.evaporation = evaporation;
        self
    }

    /// Sets the pheromone exponent.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the heuristic exponent.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Returns a copy with every field clamped to its valid range.
    pub fn clamped(&self) -> Self {
        Self {
            ants: self.ants.clamp(10, 200),
            iterations: self.iterations.clamp(10, 400),
            evaporation: self.evaporation.clamp(0.01, 0.99),
            alpha: self.alpha.clamp(0.1, 5.0),
            beta: self.beta.clamp(0.1, 5.0),
        }
    }
}

/// Precomputed per-class state, derived once per run (never per ant).
struct ClassPlan {
    name: String,
    /// Seeded grid with break/elective placeholders, cloned per ant.
    grid_template: Grid,
    /// Demand items, labs first, teacher unassigned.
    demand: Vec<DemandItem>,
    /// Subject → eligible teachers (known, with a non-zero weekly target).
    eligible: HashMap<String, Vec<String>>,
    /// Teachers attached to any elective option of this class.
    elective_teachers: Vec<String>,
    /// Positions of this class's elective placeholders.
    elective_cells: Vec<(usize, usize)>,
}

/// Ant-colony timetable scheduler.
#[derive(Debug, Clone, Default)]
pub struct AcoScheduler {
    options: AcoOptions,
}

impl AcoScheduler {
    /// Creates a scheduler with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the options.
    pub fn with_options(mut self, options: AcoOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs the search with an ambient RNG.
    pub fn generate(
        &self,
        request: &TimetableRequest,
    ) -> Result<GenerationResult, Vec<ValidationError>> {
        self.generate_with_rng(request, &mut SmallRng::from_os_rng())
    }

    /// Runs the search with an injected RNG (reproducible).
    pub fn generate_with_rng<R: Rng>(
        &self,
        request: &TimetableRequest,
        rng: &mut R,
    ) -> Result<GenerationResult, Vec<ValidationError>> {
        validate_request(request)?;
        let options = self.options.clamped();
        let days = request.days();
        let hours = request.hours();
        let plans = build_plans(request, days, hours);

        let mut pheromone = PheromoneTable::new(&request.classes, days, hours);
        let mut global_best: Option<(f64, Solution)> = None;

        for iteration in 0..options.iterations {
            let mut iteration_best: Option<(f64, Solution)> = None;
            for _ in 0..options.ants {
                let candidate =
                    construct_candidate(&plans, &pheromone, &options, &request.course_ratings, rng);
                let fitness = evaluate(&candidate, &request.teachers);
                if iteration_best.as_ref().map_or(true, |(f, _)| fitness > *f) {
                    iteration_best = Some((fitness, candidate));
                }
            }
            if let Some((fitness, best)) = iteration_best {
                pheromone.evaporate(options.evaporation);
                pheromone.reinforce(&best);
                debug!("aco iteration {iteration}: best fitness {fitness:.3}");
                if global_best.as_ref().map_or(true, |(f, _)| fitness > *f) {
                    global_best = Some((fitness, best));
                }
            }
        }

        let best = global_best.map(|(_, s)| s).unwrap_or_default();
        let extra = elective_usage(&request.classes, &best);
        Ok(finalize(best, &request.teachers, &extra))
    }
}

impl TimetableSolver for AcoScheduler {
    fn generate_with_rng<R: Rng>(
        &self,
        request: &TimetableRequest,
        rng: &mut R,
    ) -> Result<GenerationResult, Vec<ValidationError>> {
        AcoScheduler::generate_with_rng(self, request, rng)
    }
}

fn build_plans(request: &TimetableRequest, days: usize, hours: usize) -> Vec<ClassPlan> {
    request
        .classes
        .iter()
        .map(|class| {
            let grid_template = Grid::seeded(
                &class.name,
                days,
                hours,
                &request.break_slots,
                &request.elective_periods,
            );
            let elective_cells: Vec<(usize, usize)> = grid_template
                .iter_slots()
                .filter(|(_, _, s)| s.status == SlotStatus::Elective)
                .map(|(day, period, _)| (day, period))
                .collect();

            let mut elective_teachers: Vec<String> = class
                .elective_groups()
                .flat_map(|group| group.options.iter())
                .flat_map(|option| option.teachers.iter().cloned())
                .collect();
            elective_teachers.sort_unstable();
            elective_teachers.dedup();

            let eligible = class
                .teachable_subjects()
                .map(|subject| {
                    let pool: Vec<String> = subject
                        .teachers
                        .iter()
                        .filter(|id| {
                            request
                                .teachers
                                .iter()
                                .any(|t| &t.id == *id && t.weekly_hours > 0)
                        })
                        .cloned()
                        .collect();
                    (subject.name.clone(), pool)
                })
                .collect();

            let mut demand = build_demand(
                class,
                &request.programs,
                &request.courses,
                days,
                hours,
                &request.break_slots,
                &request.elective_periods,
            );
            // Labs are the hardest to place; secure 3-blocks first.
            demand.sort_by_key(|item| !item.is_lab);

            ClassPlan {
                name: class.name.clone(),
                grid_template,
                demand,
                eligible,
                elective_teachers,
                elective_cells,
            }
        })
        .collect()
}

/// Builds one ant's complete solution.
fn construct_candidate<R: Rng>(
    plans: &[ClassPlan],
    pheromone: &PheromoneTable,
    options: &AcoOptions,
    ratings: &[CourseRating],
    rng: &mut R,
) -> Solution {
    let mut tracker = TeacherTracker::new();
    let mut solution = Solution::new();

    for plan in plans {
        let mut grid = plan.grid_template.clone();

        // Elective-option teachers are unavailable for this class's
        // elective periods, whichever option actually meets.
        for &(day, period) in &plan.elective_cells {
            for teacher in &plan.elective_teachers {
                tracker.mark(teacher, day, period);
            }
        }

        let mut demand = plan.demand.clone();
        for item in &mut demand {
            if let Some(pool) = plan.eligible.get(&item.subject) {
                item.teacher = pool.choose(rng).cloned();
            }
        }

        for item in &demand {
            let rating = rating_for(ratings, &item.subject);
            let mut cells: Vec<(usize, usize)> = Vec::new();
            let mut weights: Vec<f64> = Vec::new();
            for day in 0..grid.days {
                for period in 0..grid.hours {
                    if can_place(&grid, day, period, item, &tracker) {
                        let tau = pheromone.get(&plan.name, &item.subject, day, period);
                        let eta = heuristic(item, period, grid.hours, rating);
                        cells.push((day, period));
                        weights.push(tau.powf(options.alpha) * eta.powf(options.beta));
                    }
                }
            }
            if cells.is_empty() {
                trace!("no feasible cell for {} in {}; item dropped", item.subject, plan.name);
                continue;
            }
            let (day, period) = cells[roulette(&weights, rng)];
            let teacher = item.teacher.as_deref().unwrap_or("");
            for offset in 0..item.span() {
                grid.set(
                    day,
                    period + offset,
                    Slot::confirmed(item.subject.as_str(), plan.name.as_str(), teacher),
                );
                tracker.mark(teacher, day, period + offset);
            }
        }

        solution.insert(plan.name.clone(), grid);
    }

    solution
}

/// Heuristic attractiveness of placing `item` at a period.
fn heuristic(item: &DemandItem, period: usize, hours: usize, rating: Option<f64>) -> f64 {
    let mut eta = 1.0;
    if item.is_lab {
        if period > hours / 2 {
            eta *= LATE_LAB_DAMPING;
        }
    } else {
        eta *= THEORY_COMPLIANT_WEIGHT;
    }
    if let Some(rating) = rating {
        eta *= 1.0 + RATING_NUDGE * (rating - RATING_SWEET_SPOT).abs() / 2.0;
    }
    eta
}

/// Roulette-wheel index selection over non-negative weights.
fn roulette<R: Rng>(weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return rng.random_range(0..weights.len());
    }
    let mut remaining = rng.random::<f64>() * total;
    for (index, weight) in weights.iter().enumerate() {
        remaining -= weight;
        if remaining <= 0.0 {
            return index;
        }
    }
    weights.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ClassUnit, DeliveryMode, ElectiveOption, SlotStatus, SubjectDefinition, Teacher,
    };
    use std::collections::HashSet;

    fn fast_options() -> AcoOptions {
        AcoOptions::default().with_ants(10).with_iterations(10)
    }

    fn basic_request() -> TimetableRequest {
        let classes = vec![
            ClassUnit::new("CS-A")
                .with_program("CS")
                .with_semester(1)
                .with_subject(
                    SubjectDefinition::new("Math", 3.0).with_teachers(vec!["T1".into()]),
                )
                .with_subject(
                    SubjectDefinition::new("Physics", 2.0)
                        .with_teachers(vec!["T2".into()]),
                ),
            ClassUnit::new("CS-B")
                .with_program("CS")
                .with_semester(1)
                .with_subject(
                    SubjectDefinition::new("Math", 3.0).with_teachers(vec!["T1".into()]),
                )
                .with_subject(
                    SubjectDefinition::new("Physics", 2.0)
                        .with_teachers(vec!["T2".into()]),
                ),
        ];
        let teachers = vec![Teacher::new("T1", 20), Teacher::new("T2", 20)];
        TimetableRequest::new(5, 6)
            .with_classes(classes)
            .with_teachers(teachers)
            .with_break_slots(vec![3])
    }

    #[test]
    fn test_options_clamped() {
        let options = AcoOptions::default()
            .with_ants(1000)
            .with_iterations(1)
            .with_evaporation(2.0)
            .with_alpha(0.0)
            .with_beta(99.0)
            .clamped();
        assert_eq!(options.ants, 200);
        assert_eq!(options.iterations, 10);
        assert_eq!(options.evaporation, 0.99);
        assert_eq!(options.alpha, 0.1);
        assert_eq!(options.beta, 5.0);
    }

    #[test]
    fn test_roulette_bounds() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..100 {
            let index = roulette(&[1.0, 2.0, 3.0], &mut rng);
            assert!(index < 3);
        }
        // Degenerate all-zero weights still pick a valid index.
        assert!(roulette(&[0.0, 0.0], &mut rng) < 2);
    }

    #[test]
    fn test_heuristic_damps_late_labs() {
        let lab = DemandItem {
            subject: "Lab".into(),
            is_lab: true,
            teacher: None,
        };
        let early = heuristic(&lab, 0, 8, None);
        let late = heuristic(&lab, 6, 8, None);
        assert!(early > late);
    }

    #[test]
    fn test_invalid_request_rejected() {
        let request = TimetableRequest::new(0, 6);
        let scheduler = AcoScheduler::new().with_options(fast_options());
        let mut rng = SmallRng::seed_from_u64(7);
        assert!(scheduler.generate_with_rng(&request, &mut rng).is_err());
    }

    #[test]
    fn test_grid_completeness_and_break_immutability() {
        let _ = env_logger::builder().is_test(true).try_init();
        let request = basic_request();
        let scheduler = AcoScheduler::new().with_options(fast_options());
        let mut rng = SmallRng::seed_from_u64(42);
        let result = scheduler.generate_with_rng(&request, &mut rng).unwrap();

        assert_eq!(result.timetables.len(), 2);
        for grid in result.timetables.values() {
            for day in 0..5 {
                for period in 0..6 {
                    let slot = grid.cell(day, period).expect("cell must be filled");
                    assert!(matches!(
                        slot.status,
                        SlotStatus::Confirmed
                            | SlotStatus::Free
                            | SlotStatus::Break
                            | SlotStatus::Elective
                    ));
                }
                assert_eq!(grid.cell(day, 3).unwrap().status, SlotStatus::Break);
            }
        }
    }

    #[test]
    fn test_no_teacher_double_booking() {
        let request = basic_request();
        let scheduler = AcoScheduler::new().with_options(fast_options());
        let mut rng = SmallRng::seed_from_u64(99);
        let result = scheduler.generate_with_rng(&request, &mut rng).unwrap();

        let mut seen: HashSet<(String, usize, usize)> = HashSet::new();
        for grid in result.timetables.values() {
            for (day, period, slot) in grid.iter_slots() {
                if slot.status == SlotStatus::Confirmed && !slot.teacher.is_empty() {
                    assert!(
                        seen.insert((slot.teacher.clone(), day, period)),
                        "{} double-booked at day {day} period {period}",
                        slot.teacher
                    );
                }
            }
        }
    }

    #[test]
    fn test_theory_daily_cap() {
        let request = basic_request();
        let scheduler = AcoScheduler::new().with_options(fast_options());
        let mut rng = SmallRng::seed_from_u64(7);
        let result = scheduler.generate_with_rng(&request, &mut rng).unwrap();

        for grid in result.timetables.values() {
            for day in 0..grid.days {
                for subject in ["Math", "Physics"] {
                    let periods = grid.subject_periods_on_day(day, subject);
                    assert!(periods.len() <= 2);
                    if periods.len() == 2 {
                        assert_eq!(periods[1] - periods[0], 1);
                    }
                }
            }
        }
    }

    #[test]
    fn test_lab_contiguity() {
        let class = ClassUnit::new("C1").with_subject(
            SubjectDefinition::new("Chem Lab", 3.0)
                .with_teachers(vec!["T1".into()])
                .with_mode(DeliveryMode::Lab),
        );
        let request = TimetableRequest::new(5, 7)
            .with_classes(vec![class])
            .with_teachers(vec![Teacher::new("T1", 20)]);
        let scheduler = AcoScheduler::new().with_options(fast_options());
        let mut rng = SmallRng::seed_from_u64(3);
        let result = scheduler.generate_with_rng(&request, &mut rng).unwrap();

        let grid = &result.timetables["C1"];
        for day in 0..grid.days {
            let periods = grid.subject_periods_on_day(day, "Chem Lab");
            assert!(periods.len() % 3 == 0, "partial lab session on day {day}");
            for block in periods.chunks(3) {
                if block.len() == 3 {
                    assert_eq!(block[1], block[0] + 1);
                    assert_eq!(block[2], block[0] + 2);
                    let teachers: HashSet<&str> = block
                        .iter()
                        .map(|&p| grid.cell(day, p).unwrap().teacher.as_str())
                        .collect();
                    assert_eq!(teachers.len(), 1);
                }
            }
        }
    }

    #[test]
    fn test_zero_hour_teacher_never_assigned() {
        let class = ClassUnit::new("C1").with_subject(
            SubjectDefinition::new("Math", 2.0).with_teachers(vec!["T0".into(), "T1".into()]),
        );
        let request = TimetableRequest::new(3, 4)
            .with_classes(vec![class])
            .with_teachers(vec![Teacher::new("T0", 0), Teacher::new("T1", 12)]);
        let scheduler = AcoScheduler::new().with_options(fast_options());
        let mut rng = SmallRng::seed_from_u64(11);
        let result = scheduler.generate_with_rng(&request, &mut rng).unwrap();

        for grid in result.timetables.values() {
            for (_, _, slot) in grid.iter_slots() {
                assert_ne!(slot.teacher, "T0");
            }
        }
        assert_eq!(result.teacher_hours_left["T0"], 0);
    }

    #[test]
    fn test_hours_left_counts_elective_attachment() {
        let class = ClassUnit::new("C1")
            .with_subject(SubjectDefinition::new("Math", 2.0).with_teachers(vec!["T1".into()]))
            .with_subject(
                SubjectDefinition::new("Language", 0.0)
                    .with_option(ElectiveOption::new("French", vec!["T2".into()])),
            );
        let request = TimetableRequest::new(2, 5)
            .with_classes(vec![class])
            .with_teachers(vec![Teacher::new("T1", 10), Teacher::new("T2", 10)])
            .with_elective_periods(vec![4]);
        let scheduler = AcoScheduler::new().with_options(fast_options());
        let mut rng = SmallRng::seed_from_u64(21);
        let result = scheduler.generate_with_rng(&request, &mut rng).unwrap();

        // Two elective cells (one per day) charge T2's target.
        assert_eq!(result.teacher_hours_left["T2"], 8);
    }

    #[test]
    fn test_elective_teacher_blocked_from_elective_periods() {
        // T1 teaches theory for C1 and also runs an elective option; the
        // tracker must keep theory off C1's elective cells.
        let class = ClassUnit::new("C1")
            .with_subject(SubjectDefinition::new("Math", 4.0).with_teachers(vec!["T1".into()]))
            .with_subject(
                SubjectDefinition::new("Language", 0.0)
                    .with_option(ElectiveOption::new("French", vec!["T1".into()])),
            );
        let request = TimetableRequest::new(3, 5)
            .with_classes(vec![class])
            .with_teachers(vec![Teacher::new("T1", 15)])
            .with_elective_periods(vec![2]);
        let scheduler = AcoScheduler::new().with_options(fast_options());
        let mut rng = SmallRng::seed_from_u64(5);
        let result = scheduler.generate_with_rng(&request, &mut rng).unwrap();

        let grid = &result.timetables["C1"];
        for (_, _, slot) in grid.iter_slots() {
            if slot.status == SlotStatus::Elective {
                assert!(slot.teacher.is_empty());
            }
        }
        // Elective cells survive as electives, never overwritten.
        assert_eq!(grid.count_status(SlotStatus::Elective), 3);
    }
}
