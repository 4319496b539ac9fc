use serde::Serialize;

/// What happened to one quota cell during the fill pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotOutcome {
    pub role: String,
    pub hour: String,
    pub quota_row: usize,
    pub column: usize,
    pub quota: u32,
    /// Names found at the top of the block before the fill.
    pub already_filled: u32,
    /// Seats asked of the engine.
    pub requested: u32,
    /// Names written by the engine, top to bottom.
    pub assigned: Vec<String>,
    /// Every name in the block after the fill, wherever it sits.
    pub names_in_block: u32,
    /// The block lacked blank rows for the missing names.
    pub room_limited: bool,
}

impl SlotOutcome {
    /// Seats still empty after the fill.
    pub fn shortfall(&self) -> u32 {
        self.quota.saturating_sub(self.names_in_block)
    }
}

/// Result of matching hand-written grid names to the roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    pub matched: usize,
    /// Names present in the grid that no volunteer answers to.
    pub unmatched: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FillReport {
    pub reconcile: ReconcileSummary,
    pub slots: Vec<SlotOutcome>,
}

impl FillReport {
    pub fn names_written(&self) -> usize {
        self.slots.iter().map(|s| s.assigned.len()).sum()
    }

    pub fn shortfalls(&self) -> impl Iterator<Item = &SlotOutcome> {
        self.slots.iter().filter(|s| s.shortfall() > 0)
    }

    pub fn total_shortfall(&self) -> u32 {
        self.slots.iter().map(SlotOutcome::shortfall).sum()
    }
}
