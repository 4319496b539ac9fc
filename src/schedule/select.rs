use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::roster::{Roster, Volunteer, VolunteerId};

/// Greedy slot filler. Owns the roster for the whole run and draws every
/// tie-break from one injected random source.
pub struct FillEngine<R> {
    roster: Roster,
    rng: R,
}

impl<R: Rng> FillEngine<R> {
    pub fn new(roster: Roster, rng: R) -> Self {
        FillEngine { roster, rng }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub(crate) fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    pub fn into_roster(self) -> Roster {
        self.roster
    }

    /// Volunteers who could take `hour`: capacity left, available, not
    /// already booked, and either preferring the role or accepting any duty.
    /// `require_strong` is a hard filter on top of that.
    pub fn candidates<F>(&self, prefers: &F, hour: &str, require_strong: bool) -> Vec<VolunteerId>
    where
        F: Fn(&Volunteer) -> bool,
    {
        self.roster
            .iter()
            .filter(|&(_, v)| v.has_capacity() && v.is_free_at(hour))
            .filter(|&(_, v)| prefers(v) || v.accepts_any)
            .filter(|&(_, v)| !require_strong || v.strong)
            .map(|(id, _)| id)
            .collect()
    }

    /// Picks up to `count` volunteers for `role` at `hour` and books them.
    ///
    /// Order of preference: one first-aider when asked for, then volunteers
    /// who already did this role today, then whoever has the fewest hours
    /// (random among ties). Returns fewer than `count` when the pool runs dry.
    pub fn fill_slot<F>(
        &mut self,
        prefers: F,
        hour: &str,
        count: usize,
        require_first_aid: bool,
        require_strong: bool,
        role: &str,
    ) -> Vec<VolunteerId>
    where
        F: Fn(&Volunteer) -> bool,
    {
        if count == 0 {
            return Vec::new();
        }
        let mut pool = self.candidates(&prefers, hour, require_strong);
        let mut chosen = Vec::with_capacity(count);

        if require_first_aid {
            let first_aiders: Vec<VolunteerId> = pool
                .iter()
                .copied()
                .filter(|&id| self.roster[id].first_aid)
                .collect();
            match first_aiders.choose(&mut self.rng) {
                Some(&id) => {
                    chosen.push(id);
                    pool.retain(|&c| c != id);
                }
                None => debug!(role, hour, "no first-aider available"),
            }
        }

        let mut returning: VecDeque<VolunteerId> = pool
            .iter()
            .copied()
            .filter(|&id| self.roster[id].has_done(role))
            .collect();

        while chosen.len() < count {
            let pick = match returning.pop_front() {
                Some(id) => id,
                None => match self.least_loaded(&pool) {
                    Some(id) => id,
                    None => break,
                },
            };
            chosen.push(pick);
            pool.retain(|&c| c != pick);
        }

        for &id in &chosen {
            self.roster[id].record_assignment(hour, role);
        }
        chosen
    }

    /// Uniform pick among the candidates holding the fewest hours.
    fn least_loaded(&mut self, pool: &[VolunteerId]) -> Option<VolunteerId> {
        let fewest = pool.iter().map(|&id| self.roster[id].assigned_hours).min()?;
        let tied: Vec<VolunteerId> = pool
            .iter()
            .copied()
            .filter(|&id| self.roster[id].assigned_hours == fewest)
            .collect();
        tied.choose(&mut self.rng).copied()
    }
}
