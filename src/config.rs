// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the configuration options for the `EnergyGraph`.

/// Configuration options for the `EnergyGraph`.
#[derive(Clone, Default, Debug)]
pub struct EnergyGraphConfig {
    /// Whether to allow nodes that have more than one slot without an explicit
    /// share on the same side.  When this is `true`, the shares of such slots
    /// are derived from their demand once the node demand is known, otherwise
    /// graph creation fails.
    pub allow_implicit_slot_shares: bool,

    /// Whether to skip the share propagation pass that runs before the
    /// demands are calculated.
    pub skip_share_propagation: bool,
}
