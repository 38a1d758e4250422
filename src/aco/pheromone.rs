//! Pheromone table for the ant-colony scheduler.
//!
//! One trail value per (class, subject, day, period) cell, initialized
//! to 1.0 and persisting across iterations. Evaporation keeps a small
//! floor so roulette probabilities never collapse to zero.

use std::collections::HashMap;

use crate::models::{ClassUnit, SlotStatus, Solution};

/// Floor added after evaporation so no trail ever reaches zero.
pub const PHEROMONE_FLOOR: f64 = 1e-6;
/// Trail increment per confirmed cell of the iteration-best solution.
pub const PHEROMONE_REWARD: f64 = 1.0;

/// Trail values `tau[class][subject][day][period]`.
#[derive(Debug, Clone)]
pub struct PheromoneTable {
    trails: HashMap<(String, String), Vec<Vec<f64>>>,
    days: usize,
    hours: usize,
}

impl PheromoneTable {
    /// Builds a table with every teachable (class, subject) pair at 1.0.
    pub fn new(classes: &[ClassUnit], days: usize, hours: usize) -> Self {
        let mut trails = HashMap::new();
        for class in classes {
            for subject in class.teachable_subjects() {
                trails.insert(
                    (class.name.clone(), subject.name.clone()),
                    vec![vec![1.0; hours]; days],
                );
            }
        }
        Self {
            trails,
            days,
            hours,
        }
    }

    /// Trail value for a placement; 1.0 for unknown pairs.
    pub fn get(&self, class: &str, subject: &str, day: usize, period: usize) -> f64 {
        self.trails
            .get(&(class.to_string(), subject.to_string()))
            .and_then(|grid| grid.get(day))
            .and_then(|row| row.get(period))
            .copied()
            .unwrap_or(1.0)
    }

    /// Elementwise `tau = (1 - rate) * tau + floor`.
    pub fn evaporate(&mut self, rate: f64) {
        for grid in self.trails.values_mut() {
            for row in grid.iter_mut() {
                for tau in row.iter_mut() {
                    *tau = (1.0 - rate) * *tau + PHEROMONE_FLOOR;
                }
            }
        }
    }

    /// Reinforces every confirmed cell of a solution by the fixed reward.
    pub fn reinforce(&mut self, solution: &Solution) {
        for (class_name, grid) in solution {
            for (day, period, slot) in grid.iter_slots() {
                if slot.status != SlotStatus::Confirmed {
                    continue;
                }
                if let Some(trail) = self
                    .trails
                    .get_mut(&(class_name.clone(), slot.subject.clone()))
                {
                    if day < self.days && period < self.hours {
                        trail[day][period] += PHEROMONE_REWARD;
                    }
                }
            }
        }
    }
}
