//! Per-session cue statistics.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::{Category, Movement};

/// Counts for the active session.
///
/// `total_cues`, the sum of `category_counts` and `movements.len()` are
/// always equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub total_cues: u32,
    /// Always holds an entry for every category.
    pub category_counts: BTreeMap<Category, u32>,
    /// Emitted movements in emission order.
    pub movements: Vec<Movement>,
}

impl Default for SessionStats {
    fn default() -> Self {
        Self {
            total_cues: 0,
            category_counts: Category::ALL.into_iter().map(|c| (c, 0)).collect(),
            movements: Vec::new(),
        }
    }
}

/// One row of the end-of-session summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: Category,
    pub label: &'static str,
    pub count: u32,
    /// 0.0 .. 100.0
    pub percent: f64,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one emitted cue.
    pub fn record_cue(mut self, movement: Movement) -> Self {
        self.total_cues += 1;
        *self.category_counts.entry(movement.category).or_insert(0) += 1;
        self.movements.push(movement);
        self
    }

    pub fn count(&self, category: Category) -> u32 {
        self.category_counts.get(&category).copied().unwrap_or(0)
    }

    pub fn is_consistent(&self) -> bool {
        let sum: u32 = self.category_counts.values().sum();
        sum == self.total_cues && self.movements.len() == self.total_cues as usize
    }

    /// Per-category breakdown in display order.
    pub fn summary(&self) -> Vec<CategoryShare> {
        Category::ALL
            .into_iter()
            .map(|category| {
                let count = self.count(category);
                let percent = if self.total_cues == 0 {
                    0.0
                } else {
                    count as f64 / self.total_cues as f64 * 100.0
                };
                CategoryShare {
                    category,
                    label: category.label(),
                    count,
                    percent,
                }
            })
            .collect()
    }

    /// Category with the most cues; ties go to the earlier category.
    pub fn most_frequent_category(&self) -> Option<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.count(*c) > 0)
            .fold(None, |best: Option<Category>, c| match best {
                Some(b) if self.count(b) >= self.count(c) => Some(b),
                _ => Some(c),
            })
    }
}
