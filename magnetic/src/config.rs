// Copyright 2025 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene-wide configuration.

/// Behavior switches and tuning constants for a [`Magnetic`](crate::Magnetic) scene.
///
/// Apply with [`Magnetic::set_config`](crate::Magnetic::set_config) so the
/// selection invariant is re-established when multi-select is turned off.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MagneticConfig {
    /// Allow more than one node to be selected at once.
    pub allows_multiple_selection: bool,
    /// Drags that do not start on a node (or any drag, when single-node
    /// movement is off) nudge every node.
    pub moves_all_nodes: bool,
    /// Drags that start on a node move only that node.
    pub moves_single_node: bool,
    /// How strongly a grabbed node follows the finger.
    pub single_node_acceleration: f64,
    /// Maximum finger travel, in points, still treated as a tap.
    pub selection_forgiveness_distance: f64,
    /// Interval, in seconds, at which the grab force is re-applied while the
    /// finger is stationary.
    pub drag_repeat_interval: f64,
    /// Remove unselected nodes on long press instead of selecting them.
    pub remove_on_long_press: bool,
    /// Minimum hold, in seconds, that counts as a long press.
    pub long_press_duration: f64,
    /// Per-node delay, in seconds, between staggered exits during reset.
    pub reset_stagger: f64,
    /// Seed for entry-position randomness; `None` uses a fixed default.
    pub seed: Option<u64>,
}

impl MagneticConfig {
    /// Seed used when [`MagneticConfig::seed`] is `None`.
    pub const DEFAULT_SEED: u64 = 0x6d61_676e_6574_6963;
}

impl Default for MagneticConfig {
    fn default() -> Self {
        Self {
            allows_multiple_selection: true,
            moves_all_nodes: true,
            moves_single_node: false,
            single_node_acceleration: 30.0,
            selection_forgiveness_distance: 5.0,
            drag_repeat_interval: 0.01,
            remove_on_long_press: false,
            long_press_duration: 0.35,
            reset_stagger: 0.01,
            seed: None,
        }
    }
}
