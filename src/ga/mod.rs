//! Genetic-algorithm timetable scheduler.
//!
//! Evolves a population of complete multi-class solutions: tournament
//! selection, per-class crossover, swap/teacher mutation, and elitism.
//! Fitness is the shared penalty evaluator; higher is better.
//!
//! The genetic entry takes no elective configuration — its grids carry
//! breaks only, and free periods come from `free_period_percentage`.
//!
//! # Reference
//! Goldberg (1989), "Genetic Algorithms in Search, Optimization and
//! Machine Learning"

mod chromosome;

pub use chromosome::{class_crossover, mutate, ClassGenome, TimetableChromosome};

use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

use crate::constraints::evaluate;
use crate::output::{finalize, GenerationResult};
use crate::request::TimetableRequest;
use crate::validation::{validate_request, ValidationError};
use crate::TimetableSolver;

/// Tournament size for parent selection.
const TOURNAMENT_SIZE: usize = 3;

/// Tunable parameters for the genetic scheduler.
///
/// Out-of-range values are clamped, never rejected.
#[derive(Debug, Clone)]
pub struct GaOptions {
    /// Population size (10-200).
    pub population_size: usize,
    /// Generations (10-500).
    pub generations: usize,
    /// Per-class cell-swap probability (0.01-0.8).
    pub mutation_rate: f64,
    /// Individuals carried unchanged into the next generation (0-10).
    pub elitism: usize,
}

impl Default for GaOptions {
    fn default() -> Self {
        Self {
            population_size: 40,
            generations: 80,
            mutation_rate: 0.15,
            elitism: 2,
        }
    }
}

impl GaOptions {
    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the generation count.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the elite count.
    pub fn with_elitism(mut self, elitism: usize) -> Self {
        self.elitism = elitism;
        self
    }

    /// Returns a copy with every field clamped to its valid range.
    pub fn clamped(&self) -> Self {
        Self {
            population_size: self.population_size.clamp(10, 200),
            generations: self.generations.clamp(10, 500),
            mutation_rate: self.mutation_rate.clamp(0.01, 0.8),
            elitism: self.elitism.min(10),
        }
    }
}

/// Genetic-algorithm timetable scheduler.
#[derive(Debug, Clone, Default)]
pub struct GeneticScheduler {
    options: GaOptions,
}

impl GeneticScheduler {
    /// Creates a scheduler with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the options.
    pub fn with_options(mut self, options: GaOptions) -> Self {
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
        let free_percentage = request.free_percentage();
        let genomes = build_genomes(request, hours);

        let mut population: Vec<TimetableChromosome> = (0..options.population_size)
            .map(|_| {
                TimetableChromosome::random(
                    &genomes,
                    &request.teachers,
                    days,
                    hours,
                    free_percentage,
                    rng,
                )
            })
            .collect();

        for generation in 0..options.generations {
            evaluate_population(&mut population, request);
            population.sort_by(|a, b| {
                b.fitness
                    .partial_cmp(&a.fitness)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            debug!(
                "ga generation {generation}: best fitness {:.3}",
                population[0].fitness
            );

            let mut next: Vec<TimetableChromosome> = population
                .iter()
                .take(options.elitism.min(population.len()))
                .cloned()
                .collect();
            while next.len() < options.population_size {
                let p1 = tournament(&population, rng);
                let p2 = tournament(&population, rng);
                let mut child = class_crossover(p1, p2, rng);
                mutate(&mut child, &genomes, options.mutation_rate, rng);
                next.push(child);
            }
            population = next;
        }

        evaluate_population(&mut population, request);
        let best = population
            .into_iter()
            .max_by(|a, b| {
                a.fitness
                    .partial_cmp(&b.fitness)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .expect("population is never empty");

        Ok(finalize(best.solution, &request.teachers, &HashMap::new()))
    }
}

impl TimetableSolver for GeneticScheduler {
    fn generate_with_rng<R: Rng>(
        &self,
        request: &TimetableRequest,
        rng: &mut R,
    ) -> Result<GenerationResult, Vec<ValidationError>> {
        GeneticScheduler::generate_with_rng(self, request, rng)
    }
}

fn build_genomes(request: &TimetableRequest, hours: usize) -> Vec<ClassGenome> {
    request
        .classes
        .iter()
        .map(|class| {
            let subjects: Vec<(String, f64)> = class
                .teachable_subjects()
                .filter(|s| s.credits > 0.0)
                .map(|s| (s.name.clone(), s.credits))
                .collect();
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
            let mut break_slots: Vec<usize> = request
                .break_slots
                .iter()
                .copied()
                .filter(|&b| b < hours)
                .collect();
            break_slots.sort_unstable();
            break_slots.dedup();

            ClassGenome {
                name: class.name.clone(),
                subjects,
                eligible,
                break_slots,
            }
        })
        .collect()
}

fn evaluate_population(population: &mut [TimetableChromosome], request: &TimetableRequest) {
    for chromosome in population.iter_mut() {
        if chromosome.fitness == f64::NEG_INFINITY {
            chromosome.fitness = evaluate(&chromosome.solution, &request.teachers);
        }
    }
}

/// Best of `TOURNAMENT_SIZE` uniformly drawn individuals.
fn tournament<'a, R: Rng>(
    population: &'a [TimetableChromosome],
    rng: &mut R,
) -> &'a TimetableChromosome {
    let mut best: Option<&TimetableChromosome> = None;
    for _ in 0..TOURNAMENT_SIZE {
        let candidate = &population[rng.random_range(0..population.len())];
        if best.map_or(true, |b| candidate.fitness > b.fitness) {
            best = Some(candidate);
        }
    }
    best.expect("tournament over non-empty population")
}
