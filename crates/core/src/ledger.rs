// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Participants resource pools.
//!
//! Each participant owns a pool of labelled units (the items of clothing in the
//! party game), a round outcome removes one unit from each penalized participant
//! and a participant with no units left is out of the game.
use ahash::AHashSet;
use log::info;
use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    poker::ParticipantId,
};

/// A resource unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    label: String,
    present: bool,
}

impl Unit {
    /// The unit label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Checks if the unit has not been removed.
    pub fn is_present(&self) -> bool {
        self.present
    }
}

/// An ordered collection of units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePool {
    units: Vec<Unit>,
}

impl ResourcePool {
    /// Creates a pool with all units present.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let units = labels
            .into_iter()
            .map(|label| Unit {
                label: label.into(),
                present: true,
            })
            .collect();
        Self { units }
    }

    /// Creates a pool with only the first `remaining` units present.
    pub fn with_remaining<I, S>(labels: I, remaining: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut pool = Self::new(labels);
        for unit in pool.units.iter_mut().skip(remaining) {
            unit.present = false;
        }

        pool
    }

    /// The number of units still present.
    pub fn remaining(&self) -> usize {
        self.units.iter().filter(|u| u.present).count()
    }

    /// The total number of units.
    pub fn capacity(&self) -> usize {
        self.units.len()
    }

    /// Checks if all units have been removed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the pool units.
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Removes a random present unit and returns its index.
    fn remove_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        let present = self
            .units
            .iter()
            .enumerate()
            .filter(|(_, u)| u.present)
            .map(|(idx, _)| idx)
            .collect::<Vec<_>>();

        let idx = *present.choose(rng)?;
        self.units[idx].present = false;
        Some(idx)
    }
}

/// A game participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    id: ParticipantId,
    name: String,
    pool: ResourcePool,
}

impl Participant {
    /// This participant id.
    pub fn id(&self) -> ParticipantId {
        self.id
    }

    /// This participant display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// This participant resource pool.
    pub fn pool(&self) -> &ResourcePool {
        &self.pool
    }

    /// Checks if this participant has units left and can play.
    pub fn is_active(&self) -> bool {
        !self.pool.is_empty()
    }
}

/// A unit removed from a participant pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loss {
    /// The participant who lost the unit.
    pub participant_id: ParticipantId,
    /// The removed unit label.
    pub label: String,
    /// The units left after the removal.
    pub remaining: usize,
}

/// The participants ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    participants: Vec<Participant>,
    // Wider than the ids so that restoring `u32::MAX` cannot wrap.
    next_id: u64,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new participant with all the units present.
    ///
    /// Fails if the ledger has run out of participant ids.
    pub fn join<I, S>(&mut self, name: &str, labels: I) -> Result<ParticipantId>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = u32::try_from(self.next_id)
            .map(ParticipantId::new)
            .map_err(|_| Error::InvalidSetup("no participant ids left".to_string()))?;
        self.next_id += 1;

        self.participants.push(Participant {
            id,
            name: name.to_string(),
            pool: ResourcePool::new(labels),
        });

        Ok(id)
    }

    /// Adds a participant from stored state, with `remaining` units present.
    pub fn restore<I, S>(
        &mut self,
        id: ParticipantId,
        name: &str,
        labels: I,
        remaining: usize,
    ) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.participant(id).is_some() {
            return Err(Error::InvalidSetup(format!("duplicate participant {id}")));
        }

        let pool = ResourcePool::with_remaining(labels, remaining);
        if pool.remaining() < remaining {
            return Err(Error::InvalidSetup(format!(
                "participant {id} has {} units, cannot restore {remaining}",
                pool.capacity()
            )));
        }

        self.next_id = self.next_id.max(u64::from(id.value()) + 1);
        self.participants.push(Participant {
            id,
            name: name.to_string(),
            pool,
        });

        Ok(())
    }

    /// Returns a participant given its id.
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Returns an iterator to all participants, including eliminated ones.
    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    /// Returns the participants with at least one unit left.
    pub fn active_roster(&self) -> Vec<&Participant> {
        self.participants.iter().filter(|p| p.is_active()).collect()
    }

    /// Returns the number of participants with at least one unit left.
    pub fn count_active(&self) -> usize {
        self.participants.iter().filter(|p| p.is_active()).count()
    }

    /// Checks if at most one participant is left.
    pub fn is_game_over(&self) -> bool {
        self.count_active() <= 1
    }

    /// The sole remaining participant when the game is over.
    ///
    /// Returns `None` while the game is running or if nobody is left.
    pub fn winner(&self) -> Option<&Participant> {
        let mut active = self.participants.iter().filter(|p| p.is_active());
        match (active.next(), active.next()) {
            (Some(p), None) => Some(p),
            _ => None,
        }
    }

    /// Removes a random unit from each participant.
    ///
    /// All the participants are checked before any unit is removed, so either
    /// every participant loses a unit or the ledger is left unchanged. Repeated
    /// ids are debited once.
    pub fn apply_loss<R: Rng + ?Sized>(
        &mut self,
        ids: &[ParticipantId],
        rng: &mut R,
    ) -> Result<Vec<Loss>> {
        let mut seen = AHashSet::with_capacity(ids.len());
        let mut positions = Vec::with_capacity(ids.len());

        for id in ids {
            if !seen.insert(*id) {
                continue;
            }

            let pos = self
                .participants
                .iter()
                .position(|p| &p.id == id)
                .ok_or(Error::UnknownParticipant(*id))?;

            if !self.participants[pos].is_active() {
                return Err(Error::NoUnitsLeft(*id));
            }

            positions.push(pos);
        }

        let mut losses = Vec::with_capacity(positions.len());
        for pos in positions {
            let participant = &mut self.participants[pos];
            if let Some(idx) = participant.pool.remove_random(rng) {
                let loss = Loss {
                    participant_id: participant.id,
                    label: participant.pool.units[idx].label.clone(),
                    remaining: participant.pool.remaining(),
                };

                info!(
                    "{} loses {}, {} left",
                    participant.name, loss.label, loss.remaining
                );

                if loss.remaining == 0 {
                    info!("{} is out of the game", participant.name);
                }

                losses.push(loss);
            }
        }

        Ok(losses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    const ITEMS: [&str; 3] = ["Socks", "Shoes", "Hat"];

    fn new_ledger(players: usize) -> (Ledger, Vec<ParticipantId>) {
        let mut ledger = Ledger::new();
        let ids = (0..players)
            .map(|idx| ledger.join(&format!("Player {}", idx + 1), ITEMS).unwrap())
            .collect();
        (ledger, ids)
    }

    #[test]
    fn join_participants() {
        let (ledger, ids) = new_ledger(3);
        assert_eq!(ids.len(), 3);
        assert_eq!(ledger.count_active(), 3);
        assert!(!ledger.is_game_over());
        assert!(ledger.winner().is_none());

        let p = ledger.participant(ids[1]).unwrap();
        assert_eq!(p.name(), "Player 2");
        assert_eq!(p.pool().remaining(), 3);
        assert_eq!(p.pool().capacity(), 3);
        assert!(p.pool().units().iter().all(Unit::is_present));
    }

    #[test]
    fn apply_loss_removes_one_unit() {
        let mut rng = StdRng::seed_from_u64(1);
        let (mut ledger, ids) = new_ledger(3);

        let losses = ledger.apply_loss(&ids[..2], &mut rng).unwrap();
        assert_eq!(losses.len(), 2);

        for (loss, id) in losses.iter().zip(&ids) {
            assert_eq!(loss.participant_id, *id);
            assert_eq!(loss.remaining, 2);
            assert!(ITEMS.contains(&loss.label.as_str()));

            let pool = ledger.participant(*id).unwrap().pool();
            assert_eq!(pool.remaining(), 2);
            let removed = pool.units().iter().find(|u| !u.is_present()).unwrap();
            assert_eq!(removed.label(), loss.label);
        }

        assert_eq!(ledger.participant(ids[2]).unwrap().pool().remaining(), 3);
    }

    #[test]
    fn apply_loss_with_repeated_ids() {
        let mut rng = StdRng::seed_from_u64(1);
        let (mut ledger, ids) = new_ledger(2);

        let losses = ledger.apply_loss(&[ids[0], ids[0]], &mut rng).unwrap();
        assert_eq!(losses.len(), 1);
        assert_eq!(ledger.participant(ids[0]).unwrap().pool().remaining(), 2);
    }

    #[test]
    fn apply_loss_is_atomic() {
        let mut rng = StdRng::seed_from_u64(1);
        let (mut ledger, ids) = new_ledger(2);

        let unknown = ParticipantId::new(99);
        let res = ledger.apply_loss(&[ids[0], unknown], &mut rng);
        assert_eq!(res, Err(Error::UnknownParticipant(unknown)));
        assert_eq!(ledger.participant(ids[0]).unwrap().pool().remaining(), 3);

        // Empty the second participant pool.
        for _ in 0..3 {
            ledger.apply_loss(&[ids[1]], &mut rng).unwrap();
        }

        let res = ledger.apply_loss(&[ids[0], ids[1]], &mut rng);
        assert_eq!(res, Err(Error::NoUnitsLeft(ids[1])));
        assert_eq!(ledger.participant(ids[0]).unwrap().pool().remaining(), 3);
    }

    #[test]
    fn elimination_boundary() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut ledger = Ledger::new();
        let p1 = ledger.join("Alice", ["Socks"]).unwrap();
        let p2 = ledger.join("Bob", ITEMS).unwrap();
        let p3 = ledger.join("Carol", ["Hat", "Shoes"]).unwrap();

        let losses = ledger.apply_loss(&[p1], &mut rng).unwrap();
        assert_eq!(losses[0].remaining, 0);
        assert_eq!(losses[0].label, "Socks");

        let roster = ledger.active_roster();
        assert_eq!(roster.len(), 2);
        assert!(roster.iter().all(|p| p.id() != p1));
        assert!(!ledger.is_game_over());

        // Eliminated participants are kept.
        assert!(ledger.participant(p1).is_some());
        assert_eq!(ledger.participants().count(), 3);

        ledger.apply_loss(&[p3], &mut rng).unwrap();
        ledger.apply_loss(&[p3], &mut rng).unwrap();
        assert_eq!(ledger.active_roster().len(), 1);
        assert!(ledger.is_game_over());
        assert_eq!(ledger.winner().map(|p| p.id()), Some(p2));
    }

    #[test]
    fn nobody_left() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut ledger = Ledger::new();
        let p1 = ledger.join("Alice", ["Socks"]).unwrap();
        let p2 = ledger.join("Bob", ["Socks"]).unwrap();

        ledger.apply_loss(&[p1, p2], &mut rng).unwrap();
        assert!(ledger.is_game_over());
        assert!(ledger.winner().is_none());
    }

    #[test]
    fn unit_choice_is_uniform() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut counts = [0usize; 3];

        for _ in 0..3_000 {
            let mut ledger = Ledger::new();
            let id = ledger.join("Alice", ITEMS).unwrap();
            let losses = ledger.apply_loss(&[id], &mut rng).unwrap();
            let idx = ITEMS.iter().position(|l| *l == losses[0].label).unwrap();
            counts[idx] += 1;
        }

        for count in counts {
            assert!((800..1200).contains(&count), "count {count}");
        }
    }

    #[test]
    fn restore_participants() {
        let mut ledger = Ledger::new();
        ledger
            .restore(ParticipantId::new(4), "Alice", ITEMS, 1)
            .unwrap();
        ledger
            .restore(ParticipantId::new(2), "Bob", ITEMS, 0)
            .unwrap();

        let alice = ledger.participant(ParticipantId::new(4)).unwrap();
        assert_eq!(alice.pool().remaining(), 1);
        assert_eq!(alice.pool().capacity(), 3);
        assert!(!ledger.participant(ParticipantId::new(2)).unwrap().is_active());
        assert!(ledger.is_game_over());

        // New ids don't clash with restored ones.
        let id = ledger.join("Carol", ITEMS).unwrap();
        assert_eq!(id, ParticipantId::new(5));

        let res = ledger.restore(ParticipantId::new(4), "Dave", ITEMS, 1);
        assert!(matches!(res, Err(Error::InvalidSetup(_))));

        let res = ledger.restore(ParticipantId::new(9), "Dave", ITEMS, 4);
        assert!(matches!(res, Err(Error::InvalidSetup(_))));
    }

    #[test]
    fn restore_largest_id() {
        let mut ledger = Ledger::new();
        let max = ParticipantId::new(u32::MAX);
        ledger.restore(max, "Max", ["Socks"], 1).unwrap();
        assert_eq!(ledger.participant(max).unwrap().pool().remaining(), 1);

        // No id is left to hand out and existing ids are never reused.
        let res = ledger.join("Alice", ITEMS);
        assert!(matches!(res, Err(Error::InvalidSetup(_))));
        assert_eq!(ledger.participants().count(), 1);

        ledger.restore(ParticipantId::new(3), "Bob", ITEMS, 2).unwrap();
        assert!(ledger.join("Carol", ITEMS).is_err());
        assert_eq!(ledger.count_active(), 2);
    }

    #[test]
    fn ledger_serde() {
        let mut rng = StdRng::seed_from_u64(1);
        let (mut ledger, ids) = new_ledger(2);
        ledger.apply_loss(&ids[..1], &mut rng).unwrap();

        let bytes = bincode::serialize(&ledger).unwrap();
        let restored: Ledger = bincode::deserialize(&bytes).unwrap();
        assert_eq!(
            restored.participant(ids[0]).unwrap(),
            ledger.participant(ids[0]).unwrap()
        );
        assert_eq!(restored.participant(ids[0]).unwrap().pool().remaining(), 2);
    }
}
