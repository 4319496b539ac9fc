use rand::Rng;
use tracing::{debug, info, warn};

use super::rules::RoleTable;
use super::select::FillEngine;
use super::types::{FillReport, ReconcileSummary, SlotOutcome};
use crate::grid::{Grid, FIRST_ROLE_ROW};

/// A cell that is only digits is a count, not a name.
fn is_count(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

impl<R: Rng> FillEngine<R> {
    /// Accounts for every name already typed into the grid so the fill never
    /// double-books those volunteers and their hour totals include it.
    pub fn reconcile(&mut self, grid: &Grid) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();
        let columns: Vec<(usize, String)> = grid
            .hour_columns()
            .map(|(col, hour)| (col, hour.to_string()))
            .collect();

        for (col, hour) in &columns {
            for row in FIRST_ROLE_ROW..grid.height() {
                if grid.quota_at(row, *col).is_some() {
                    continue;
                }
                let name = grid.cell(row, *col).trim();
                if name.is_empty() || is_count(name) {
                    continue;
                }
                match self.roster().find_by_name(name) {
                    Some(id) => {
                        self.roster_mut()[id].record_manual(hour);
                        summary.matched += 1;
                    }
                    None => {
                        debug!(row, hour = hour.as_str(), name, "grid name matches no volunteer");
                        if !summary.unmatched.iter().any(|n| n == name) {
                            summary.unmatched.push(name.to_string());
                        }
                    }
                }
            }
        }

        info!(
            matched = summary.matched,
            unmatched = summary.unmatched.len(),
            "manual assignments reconciled"
        );
        summary
    }

    /// Fills every open seat under every positive quota cell, writing
    /// "First Last" into the blank rows beneath it. Existing names are kept.
    pub fn fill_grid(
        &mut self,
        grid: &mut Grid,
        roles: &RoleTable,
        max_rows_per_slot: usize,
    ) -> Vec<SlotOutcome> {
        let mut outcomes = Vec::new();
        let quota_rows = grid.quota_rows().to_vec();
        let columns: Vec<(usize, String)> = grid
            .hour_columns()
            .map(|(col, hour)| (col, hour.to_string()))
            .collect();

        for quota_row in quota_rows {
            let role = roles.resolve(grid.label(quota_row));
            let block = grid.assignment_rows(quota_row, max_rows_per_slot);

            for (col, hour) in &columns {
                let quota = match grid.quota_at(quota_row, *col) {
                    Some(q) if q > 0 => q,
                    _ => continue,
                };
                let already_filled = grid.filled_from_top(block.clone(), *col) as u32;
                let open = quota.saturating_sub(already_filled) as usize;
                let blanks = grid.blank_rows(block.clone(), *col);
                let count = open.min(blanks.len());
                let present = (block.len() - blanks.len()) as u32;

                let picked = self.fill_slot(
                    |v| role.prefers(v),
                    hour,
                    count,
                    role.require_first_aid,
                    role.requires_strong_at(hour),
                    &role.name,
                );

                let mut assigned = Vec::with_capacity(picked.len());
                for (&row, id) in blanks.iter().zip(picked) {
                    let name = self.roster()[id].full_name();
                    grid.set(row, *col, name.clone());
                    assigned.push(name);
                }

                let outcome = SlotOutcome {
                    role: role.name.clone(),
                    hour: hour.clone(),
                    quota_row,
                    column: *col,
                    quota,
                    already_filled,
                    requested: count as u32,
                    names_in_block: present + assigned.len() as u32,
                    assigned,
                    room_limited: (blanks.len() as u32) < quota.saturating_sub(present),
                };
                if outcome.shortfall() > 0 {
                    warn!(
                        role = outcome.role.as_str(),
                        hour = hour.as_str(),
                        quota,
                        filled = outcome.names_in_block,
                        room_limited = outcome.room_limited,
                        "slot under-filled"
                    );
                }
                outcomes.push(outcome);
            }
        }

        outcomes
    }

    /// Reconciliation followed by the quota-driven fill.
    pub fn run(
        &mut self,
        grid: &mut Grid,
        roles: &RoleTable,
        max_rows_per_slot: usize,
    ) -> FillReport {
        let reconcile = self.reconcile(grid);
        let slots = self.fill_grid(grid, roles, max_rows_per_slot);
        let report = FillReport { reconcile, slots };
        info!(
            written = report.names_written(),
            missing = report.total_shortfall(),
            "fill pass complete"
        );
        report
    }
}
