//! Activation handling
//!
//! Maps discrete user activations onto state transitions and packages the
//! re-render request for whatever surface owns the bar visuals.

use tracing::debug;

use crate::legend;
use crate::settings::Settings;
use crate::state::{ProgressState, Transition};

/// Discrete user input, decoupled from any particular input device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Left-click equivalent: advance the bar
    Primary,
    /// Right-click equivalent: reset the bar (when enabled)
    Secondary,
}

/// Current view of one bar
#[derive(Debug, Clone, PartialEq)]
pub struct BarView {
    pub progress: i64,
    pub total: i64,
    /// Fill fraction in [0.0, 1.0]
    pub fraction: f64,
    /// Rendered legend text, when the bar configures a legend template
    pub legend: Option<String>,
}

/// Re-render request produced by an effective activation
#[derive(Debug, Clone, PartialEq)]
pub struct BarUpdate {
    pub view: BarView,
    pub transition: Transition,
}

pub struct InteractionController {
    state: ProgressState,
}

impl InteractionController {
    pub fn new(state: ProgressState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    /// Handle one activation.
    ///
    /// Returns `None` when the activation has no effect (secondary activation
    /// with reset disabled): no state change, no store write, no re-render.
    pub fn handle(&mut self, activation: Activation, settings: &Settings) -> Option<BarUpdate> {
        let transition = match activation {
            Activation::Primary => self.state.apply_increment(),
            Activation::Secondary => {
                if !settings.enable_reset_on_right_click {
                    debug!(key = %self.state.identity_key(), "Secondary activation ignored, reset disabled");
                    return None;
                }
                self.state.reset()
            }
        };

        Some(BarUpdate {
            view: self.snapshot(settings),
            transition,
        })
    }

    /// Current view of the bar without applying a transition
    pub fn snapshot(&self, settings: &Settings) -> BarView {
        let config = &self.state.config;
        let progress = self.state.progress();

        let legend = if config.legend.is_empty() {
            None
        } else {
            Some(legend::render(&config.legend, settings, progress, config.total))
        };

        BarView {
            progress,
            total: config.total,
            // The parser guarantees a positive total
            fraction: progress as f64 / config.total as f64,
            legend,
        }
    }
}
