//! Metaheuristic school timetable generation.
//!
//! Assigns weekly class periods (subjects, 3-period lab sessions,
//! electives) to day/period slots and teachers, subject to availability,
//! workload targets, and pedagogical constraints. Two independent
//! solvers search the same combinatorial space behind one interface: an
//! ant-colony scheduler and a genetic scheduler.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `ClassUnit`, `SubjectDefinition`,
//!   `Teacher`, `Program`, `Course`, `Grid`, `Slot`
//! - **`demand`**: Credit-share demand derivation (Hamilton apportionment)
//! - **`constraints`**: Placement feasibility and penalty scoring
//! - **`aco`**: Ant-colony scheduler (pheromone-guided construction)
//! - **`ga`**: Genetic scheduler (tournament / crossover / elitism)
//! - **`output`**: Result normalization and remaining teacher hours
//! - **`validation`**: Input integrity checks
//!
//! # Design
//!
//! The core is fail-open: infeasible demand degrades to Free periods or
//! unstaffed slots, reflected in the fitness score rather than raised.
//! All randomness flows through an injected `rand::Rng`, so seeded runs
//! are reproducible. Solvers are synchronous, in-memory compute with no
//! I/O.
//!
//! # Example
//!
//! ```
//! use timetabler::models::{ClassUnit, SubjectDefinition, Teacher};
//! use timetabler::{generate_genetic, GaOptions, TimetableRequest};
//!
//! let request = TimetableRequest::new(5, 6)
//!     .with_classes(vec![ClassUnit::new("CS-A").with_subject(
//!         SubjectDefinition::new("Math", 4.0).with_teachers(vec!["T1".into()]),
//!     )])
//!     .with_teachers(vec![Teacher::new("T1", 20)]);
//!
//! let result = generate_genetic(&request, &GaOptions::default()
//!     .with_population_size(10)
//!     .with_generations(10))
//!     .unwrap();
//! assert!(result.timetables.contains_key("CS-A"));
//! ```
//!
//! # References
//!
//! - Dorigo & Stützle (2004), "Ant Colony Optimization"
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and
//!   Machine Learning"
//! - Burke & Petrovic (2002), "Recent research directions in automated
//!   timetabling"

pub mod aco;
pub mod constraints;
pub mod demand;
pub mod ga;
pub mod models;
pub mod output;
mod request;
pub mod validation;

pub use aco::{AcoOptions, AcoScheduler};
pub use ga::{GaOptions, GeneticScheduler};
pub use output::GenerationResult;
pub use request::TimetableRequest;
pub use validation::{ValidationError, ValidationErrorKind};

use rand::Rng;

/// Common interface over both timetable solvers.
pub trait TimetableSolver {
    /// Runs the search with an injected RNG (reproducible).
    fn generate_with_rng<R: Rng>(
        &self,
        request: &TimetableRequest,
        rng: &mut R,
    ) -> Result<GenerationResult, Vec<ValidationError>>;
}

/// Generates a timetable with the ant-colony scheduler.
pub fn generate_aco(
    request: &TimetableRequest,
    options: &AcoOptions,
) -> Result<GenerationResult, Vec<ValidationError>> {
    AcoScheduler::new().with_options(options.clone()).generate(request)
}

/// Generates a timetable with the genetic scheduler.
pub fn generate_genetic(
    request: &TimetableRequest,
    options: &GaOptions,
) -> Result<GenerationResult, Vec<ValidationError>> {
    GeneticScheduler::new().with_options(options.clone()).generate(request)
}
