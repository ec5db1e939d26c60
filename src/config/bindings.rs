//! Controller binding configuration and parsing.
//!
//! Each action lists the hands whose input source it listens on. The lists
//! are parsed once into a [`BindingMap`] for lookup while dispatching.

use crate::error::BindingError;
use crate::input::{Action, Hand, SourceId};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Parse a hand name like "left" or "Right".
fn parse_hand(action: Action, raw: &str) -> Result<Hand, BindingError> {
    match raw.trim().to_lowercase().as_str() {
        "left" | "l" => Ok(Hand::Left),
        "right" | "r" => Ok(Hand::Right),
        _ => Err(BindingError::UnknownHand {
            action,
            name: raw.to_string(),
        }),
    }
}

/// Configuration for all controller bindings.
///
/// Users specify them in config.toml as:
/// ```toml
/// [bindings]
/// toggle_tool = ["left", "right"]
/// save_world = ["left"]
/// load_world = ["right"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BindingsConfig {
    #[serde(default = "both_hands")]
    pub toggle_tool: Vec<String>,

    #[serde(default = "both_hands")]
    pub draw: Vec<String>,

    #[serde(default = "right_hand")]
    pub next_strategy: Vec<String>,

    #[serde(default = "left_hand")]
    pub previous_strategy: Vec<String>,

    #[serde(default = "left_hand")]
    pub save_world: Vec<String>,

    #[serde(default = "right_hand")]
    pub load_world: Vec<String>,

    #[serde(default = "both_hands")]
    pub curve_intensity: Vec<String>,
}

impl Default for BindingsConfig {
    fn default() -> Self {
        Self {
            toggle_tool: both_hands(),
            draw: both_hands(),
            next_strategy: right_hand(),
            previous_strategy: left_hand(),
            save_world: left_hand(),
            load_world: right_hand(),
            curve_intensity: both_hands(),
        }
    }
}

impl BindingsConfig {
    /// Build a lookup set of (action, hand) pairs.
    /// Returns an error if any hand name is invalid or listed twice for one action.
    pub fn build_binding_map(&self) -> Result<BindingMap, BindingError> {
        let mut bound = HashSet::new();

        let mut insert_binding = |action: Action, hands: &[String]| -> Result<(), BindingError> {
            for raw in hands {
                let hand = parse_hand(action, raw)?;
                if !bound.insert((action, hand)) {
                    return Err(BindingError::Duplicate {
                        action,
                        hand: hand.to_string(),
                    });
                }
            }
            Ok(())
        };

        insert_binding(Action::ToggleTool, &self.toggle_tool)?;
        insert_binding(Action::Draw, &self.draw)?;
        insert_binding(Action::NextStrategy, &self.next_strategy)?;
        insert_binding(Action::PreviousStrategy, &self.previous_strategy)?;
        insert_binding(Action::SaveWorld, &self.save_world)?;
        insert_binding(Action::LoadWorld, &self.load_world)?;
        insert_binding(Action::CurveIntensity, &self.curve_intensity)?;

        Ok(BindingMap { bound })
    }
}

/// Parsed bindings: which hands each action listens on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingMap {
    bound: HashSet<(Action, Hand)>,
}

impl BindingMap {
    pub fn is_bound(&self, action: Action, hand: Hand) -> bool {
        self.bound.contains(&(action, hand))
    }
}

/// Resolves raw input sources to hand roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandMap {
    left: SourceId,
    right: SourceId,
}

impl HandMap {
    pub fn new(left: &str, right: &str) -> Result<Self, BindingError> {
        let left = left.trim();
        let right = right.trim();
        if left.is_empty() {
            return Err(BindingError::EmptySource {
                hand: Hand::Left.to_string(),
            });
        }
        if right.is_empty() {
            return Err(BindingError::EmptySource {
                hand: Hand::Right.to_string(),
            });
        }
        if left == right {
            return Err(BindingError::SharedSource {
                source_id: left.to_string(),
            });
        }
        Ok(Self {
            left: SourceId::new(left),
            right: SourceId::new(right),
        })
    }

    /// Returns the hand for a source, or `None` for sources that are neither hand.
    pub fn hand_for(&self, source: &SourceId) -> Option<Hand> {
        if *source == self.left {
            Some(Hand::Left)
        } else if *source == self.right {
            Some(Hand::Right)
        } else {
            None
        }
    }
}

// =============================================================================
// Default binding functions (matching the stock controller layout)
// =============================================================================

fn both_hands() -> Vec<String> {
    vec!["left".to_string(), "right".to_string()]
}

fn left_hand() -> Vec<String> {
    vec!["left".to_string()]
}

fn right_hand() -> Vec<String> {
    vec!["right".to_string()]
}
