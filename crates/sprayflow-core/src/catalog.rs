//! Static movement catalog.
//!
//! Every movement belongs to exactly one [`Category`]. The catalog is fixed
//! at build time and never mutated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    BodyPositions,
    Footwork,
    HandPositions,
    Transitions,
    Balance,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 5] = [
        Category::BodyPositions,
        Category::Footwork,
        Category::HandPositions,
        Category::Transitions,
        Category::Balance,
    ];

    /// Machine name, as used in settings and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::BodyPositions => "body-positions",
            Category::Footwork => "footwork",
            Category::HandPositions => "hand-positions",
            Category::Transitions => "transitions",
            Category::Balance => "balance",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Category::BodyPositions => "Body Positions",
            Category::Footwork => "Footwork",
            Category::HandPositions => "Hand Positions",
            Category::Transitions => "Transitions",
            Category::Balance => "Balance",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase().replace('_', "-");
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| ValidationError::UnknownCategory(s.to_string()))
    }
}

/// A single training cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Movement {
    pub id: u16,
    pub name: &'static str,
    pub category: Category,
}

const fn mv(id: u16, name: &'static str, category: Category) -> Movement {
    Movement { id, name, category }
}

use Category::*;

static MOVEMENTS: [Movement; 38] = [
    mv(1, "Drop-knee", BodyPositions),
    mv(2, "Backflag", BodyPositions),
    mv(3, "High-step", BodyPositions),
    mv(4, "Side-pull", BodyPositions),
    mv(5, "Gastón", BodyPositions),
    mv(6, "Mantle", BodyPositions),
    mv(7, "Undercling", BodyPositions),
    mv(8, "Layback", BodyPositions),
    mv(9, "Toe hook", Footwork),
    mv(10, "Heel hook", Footwork),
    mv(11, "Knee bar", Footwork),
    mv(12, "Smear", Footwork),
    mv(13, "Pogo", Footwork),
    mv(14, "Flag", Footwork),
    mv(15, "Drop-knee foot", Footwork),
    mv(16, "Outside edge", Footwork),
    mv(17, "Crimp", HandPositions),
    mv(18, "Open hand", HandPositions),
    mv(19, "Pinch", HandPositions),
    mv(20, "Sloper", HandPositions),
    mv(21, "Mono", HandPositions),
    mv(22, "Sidepull", HandPositions),
    mv(23, "Gaston", HandPositions),
    mv(24, "Mantle", HandPositions),
    mv(25, "Cross-through", Transitions),
    mv(26, "Match", Transitions),
    mv(27, "Bump", Transitions),
    mv(28, "Deadpoint", Transitions),
    mv(29, "Dyno", Transitions),
    mv(30, "Cut loose", Transitions),
    mv(31, "Rock over", Transitions),
    mv(32, "Drop knee transition", Transitions),
    mv(33, "Static balance", Balance),
    mv(34, "Slow movement", Balance),
    mv(35, "Controlled reach", Balance),
    mv(36, "Precision foot", Balance),
    mv(37, "Body tension", Balance),
    mv(38, "Core engagement", Balance),
];

/// The full catalog in id order.
pub fn all_movements() -> &'static [Movement] {
    &MOVEMENTS
}

/// Every category the catalog knows about.
pub fn categories() -> [Category; 5] {
    Category::ALL
}

/// Movements tagged with `category`, in catalog order.
pub fn movements_in(category: Category) -> impl Iterator<Item = &'static Movement> {
    MOVEMENTS.iter().filter(move |m| m.category == category)
}
