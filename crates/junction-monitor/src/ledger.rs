//! # Event Ledger
//!
//! Per-agent, append-only fact histories for every vehicle currently inside
//! the monitored region.
//!
//! ## Invariant
//!
//! A present key always corresponds to an agent inside the region. Eviction
//! removes the whole history at once, so an evicted agent contributes zero
//! facts to every later program.
//!
//! ## Ordering
//!
//! Agents are kept in a `BTreeMap` keyed by [`VehicleId`]; serialization is
//! in ascending identifier order and each history in insertion order.

use std::collections::BTreeMap;

use junction_core::{Atom, VehicleId};

use crate::event::AgentPhase;

// ---------------------------------------------------------------------------
// AgentRecord
// ---------------------------------------------------------------------------

/// Everything the ledger knows about one agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRecord {
    phase: Option<AgentPhase>,
    facts: Vec<Atom>,
}

impl AgentRecord {
    fn new() -> Self {
        Self {
            phase: None,
            facts: Vec::new(),
        }
    }

    /// Last observed phase; `None` until a phase-bearing event arrives.
    pub fn phase(&self) -> Option<AgentPhase> {
        self.phase
    }

    /// Facts in insertion order.
    pub fn facts(&self) -> &[Atom] {
        &self.facts
    }
}

// ---------------------------------------------------------------------------
// EventLedger
// ---------------------------------------------------------------------------

/// Mapping from agent identity to its observed history.
#[derive(Debug, Clone, Default)]
pub struct EventLedger {
    agents: BTreeMap<VehicleId, AgentRecord>,
}

impl EventLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one fact, creating the agent's history if absent.
    /// No deduplication.
    pub fn record_event(&mut self, vehicle: &VehicleId, atom: Atom) {
        self.agents
            .entry(vehicle.clone())
            .or_insert_with(AgentRecord::new)
            .facts
            .push(atom);
    }

    /// Move the agent to `phase` and append `atoms`.
    ///
    /// Unexpected transitions are logged at debug level and applied anyway.
    pub fn observe(&mut self, vehicle: &VehicleId, phase: AgentPhase, atoms: Vec<Atom>) {
        let record = self
            .agents
            .entry(vehicle.clone())
            .or_insert_with(AgentRecord::new);
        if !AgentPhase::expects(record.phase, phase) {
            tracing::debug!(
                vehicle = %vehicle,
                from = ?record.phase,
                to = ?phase,
                "unexpected agent phase transition"
            );
        }
        record.phase = Some(phase);
        record.facts.extend(atoms);
    }

    /// Remove the agent's entire history. Returns whether anything was
    /// removed; evicting an unknown agent is a no-op.
    pub fn evict(&mut self, vehicle: &VehicleId) -> bool {
        self.agents.remove(vehicle).is_some()
    }

    /// All histories as program text, one fact per line, agents in
    /// ascending identifier order.
    pub fn serialize(&self) -> String {
        junction_core::atom::render_facts(self.agents.values().flat_map(|r| r.facts.iter()))
    }

    /// Whether the agent is known.
    pub fn contains(&self, vehicle: &VehicleId) -> bool {
        self.agents.contains_key(vehicle)
    }

    /// The agent's record, if known.
    pub fn record(&self, vehicle: &VehicleId) -> Option<&AgentRecord> {
        self.agents.get(vehicle)
    }

    /// The agent's facts, if known.
    pub fn history(&self, vehicle: &VehicleId) -> Option<&[Atom]> {
        self.agents.get(vehicle).map(|r| r.facts())
    }

    /// Known agents in identifier order.
    pub fn vehicles(&self) -> impl Iterator<Item = &VehicleId> {
        self.agents.keys()
    }

    /// Number of known agents.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether no agent is known.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Total number of recorded facts.
    pub fn fact_count(&self) -> usize {
        self.agents.values().map(|r| r.facts.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use junction_core::Term;
    use proptest::prelude::*;

    fn v(name: &str) -> VehicleId {
        VehicleId::new(name).unwrap()
    }

    fn fact(vehicle: &str, tick: i64) -> Atom {
        Atom::new(
            "arrivesAtForkAtTime",
            vec![Term::sym(format!("v_{vehicle}")), Term::sym("f_a"), Term::from(tick)],
        )
    }

    #[test]
    fn record_creates_history_and_keeps_duplicates() {
        let mut ledger = EventLedger::new();
        ledger.record_event(&v("a"), fact("a", 1));
        ledger.record_event(&v("a"), fact("a", 1));
        assert_eq!(ledger.history(&v("a")).unwrap().len(), 2);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.record(&v("a")).unwrap().phase(), None);
    }

    #[test]
    fn serialize_orders_agents_by_identifier() {
        let mut ledger = EventLedger::new();
        ledger.record_event(&v("b"), fact("b", 2));
        ledger.record_event(&v("a"), fact("a", 5));
        ledger.record_event(&v("b"), fact("b", 3));
        assert_eq!(
            ledger.serialize(),
            "arrivesAtForkAtTime(v_a, f_a, 5).\n\
             arrivesAtForkAtTime(v_b, f_a, 2).\n\
             arrivesAtForkAtTime(v_b, f_a, 3).\n"
        );
    }

    #[test]
    fn eviction_is_idempotent() {
        let mut ledger = EventLedger::new();
        ledger.record_event(&v("a"), fact("a", 1));
        assert!(ledger.evict(&v("a")));
        assert!(!ledger.evict(&v("a")));
        assert!(!ledger.evict(&v("never_seen")));
        assert!(ledger.is_empty());
        assert_eq!(ledger.serialize(), "");
    }

    #[test]
    fn observe_tracks_phase_even_out_of_order() {
        let mut ledger = EventLedger::new();
        ledger.observe(&v("a"), AgentPhase::InLane, vec![fact("a", 1)]);
        assert_eq!(ledger.record(&v("a")).unwrap().phase(), Some(AgentPhase::InLane));
        ledger.observe(&v("a"), AgentPhase::Entered, vec![]);
        assert_eq!(ledger.record(&v("a")).unwrap().phase(), Some(AgentPhase::Entered));
        assert_eq!(ledger.fact_count(), 1);
    }

    proptest! {
        /// An evicted agent contributes no facts, whatever else is recorded.
        #[test]
        fn evicted_agent_contributes_nothing(
            ops in proptest::collection::vec((0usize..4, 0i64..10), 0..40),
            victim in 0usize..4,
        ) {
            let names = ["a", "b", "c", "d"];
            let mut ledger = EventLedger::new();
            for (who, tick) in &ops {
                ledger.record_event(&v(names[*who]), fact(names[*who], *tick));
            }
            ledger.evict(&v(names[victim]));
            let text = ledger.serialize();
            let needle = format!("v_{},", names[victim]);
            prop_assert!(!text.contains(&needle));
            prop_assert!(!ledger.contains(&v(names[victim])));
        }
    }
}
