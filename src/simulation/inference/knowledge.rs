//! Forward-chaining knowledge base over typed cell facts.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::simulation::environment::Position;

/// What a fact claims about a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FactKind {
    /// The cell is blocked
    Obstacle,
    /// The cell is traversable
    Free,
    /// The cell is safe to enter (derived by domain rules)
    Safe,
}

/// A ground propositional atom about one cell, e.g. `Free(2, 3)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fact {
    pub kind: FactKind,
    pub position: Position,
}

impl Fact {
    #[must_use]
    pub const fn new(kind: FactKind, position: Position) -> Self {
        Self { kind, position }
    }

    #[must_use]
    pub const fn obstacle(position: Position) -> Self {
        Self::new(FactKind::Obstacle, position)
    }

    #[must_use]
    pub const fn free(position: Position) -> Self {
        Self::new(FactKind::Free, position)
    }

    #[must_use]
    pub const fn safe(position: Position) -> Self {
        Self::new(FactKind::Safe, position)
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}({}, {})",
            self.kind, self.position.row, self.position.col
        )
    }
}

/// A Horn clause: if every premise holds, the conclusion holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    pub premises: Vec<Fact>,
    pub conclusion: Fact,
}

impl Rule {
    #[must_use]
    pub fn new(premises: Vec<Fact>, conclusion: Fact) -> Self {
        Self {
            premises,
            conclusion,
        }
    }

    fn fires(&self, facts: &HashSet<Fact>) -> bool {
        !facts.contains(&self.conclusion) && self.premises.iter().all(|p| facts.contains(p))
    }
}

/// Store of asserted and derived facts.
///
/// Facts are never retracted. [`KnowledgeBase::infer`] runs rules to a fixpoint,
/// so repeated calls without new facts derive nothing.
#[derive(Clone, Debug, Default)]
pub struct KnowledgeBase {
    facts: HashSet<Fact>,
    rules: Vec<Rule>,
}

impl KnowledgeBase {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule. Takes effect on the next [`KnowledgeBase::infer`].
    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Asserts a fact. Returns true if it was new.
    pub fn tell(&mut self, fact: Fact) -> bool {
        self.facts.insert(fact)
    }

    /// Membership over asserted and derived facts.
    #[must_use]
    pub fn ask(&self, fact: &Fact) -> bool {
        self.facts.contains(fact)
    }

    /// Forward chaining to fixpoint. Returns the number of newly derived facts.
    pub fn infer(&mut self) -> usize {
        let mut derived = 0;
        loop {
            let new: Vec<Fact> = self
                .rules
                .iter()
                .filter(|r| r.fires(&self.facts))
                .map(|r| r.conclusion)
                .collect();
            let mut added = 0;
            for fact in new {
                if self.facts.insert(fact) {
                    added += 1;
                }
            }
            if added == 0 {
                break;
            }
            derived += added;
        }
        derived
    }

    /// Number of facts, asserted plus derived.
    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// All facts in a stable order.
    #[must_use]
    pub fn facts(&self) -> BTreeSet<Fact> {
        self.facts.iter().copied().collect()
    }

    /// Positions that hold both an Obstacle and a Free fact.
    #[must_use]
    pub fn contradictions(&self) -> Vec<Position> {
        let mut positions: Vec<Position> = self
            .facts
            .iter()
            .filter(|f| f.kind == FactKind::Obstacle)
            .map(|f| f.position)
            .filter(|&p| self.facts.contains(&Fact::free(p)))
            .collect();
        positions.sort_unstable();
        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: i32, col: i32) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn test_tell_is_idempotent() {
        let mut kb = KnowledgeBase::new();
        assert!(kb.tell(Fact::free(pos(0, 0))));
        assert!(!kb.tell(Fact::free(pos(0, 0))));
        assert_eq!(kb.len(), 1);
    }

    #[test]
    fn test_ask_missing_fact_is_false() {
        let kb = KnowledgeBase::new();
        assert!(!kb.ask(&Fact::obstacle(pos(1, 1))));
    }

    #[test]
    fn test_infer_without_rules_derives_nothing() {
        let mut kb = KnowledgeBase::new();
        kb.tell(Fact::free(pos(0, 1)));
        assert_eq!(kb.infer(), 0);
        assert_eq!(kb.len(), 1);
    }

    #[test]
    fn test_infer_chains_to_fixpoint() {
        let mut kb = KnowledgeBase::new();
        kb.add_rule(Rule::new(vec![Fact::free(pos(0, 0))], Fact::safe(pos(0, 0))));
        kb.add_rule(Rule::new(
            vec![Fact::safe(pos(0, 0)), Fact::free(pos(0, 1))],
            Fact::safe(pos(0, 1)),
        ));
        kb.tell(Fact::free(pos(0, 0)));
        kb.tell(Fact::free(pos(0, 1)));

        assert_eq!(kb.infer(), 2);
        assert!(kb.ask(&Fact::safe(pos(0, 1))));
    }

    #[test]
    fn test_infer_is_idempotent() {
        let mut kb = KnowledgeBase::new();
        kb.add_rule(Rule::new(vec![Fact::free(pos(2, 2))], Fact::safe(pos(2, 2))));
        kb.tell(Fact::free(pos(2, 2)));

        kb.infer();
        let first = kb.facts();
        assert_eq!(kb.infer(), 0);
        assert_eq!(kb.facts(), first);
    }

    #[test]
    fn test_rule_with_missing_premise_does_not_fire() {
        let mut kb = KnowledgeBase::new();
        kb.add_rule(Rule::new(
            vec![Fact::free(pos(0, 0)), Fact::free(pos(0, 1))],
            Fact::safe(pos(0, 1)),
        ));
        kb.tell(Fact::free(pos(0, 0)));
        assert_eq!(kb.infer(), 0);
        assert!(!kb.ask(&Fact::safe(pos(0, 1))));
    }

    #[test]
    fn test_contradictions_are_reported() {
        let mut kb = KnowledgeBase::new();
        kb.tell(Fact::free(pos(1, 1)));
        kb.tell(Fact::obstacle(pos(1, 1)));
        kb.tell(Fact::obstacle(pos(0, 1)));
        assert_eq!(kb.contradictions(), vec![pos(1, 1)]);
    }

    #[test]
    fn test_fact_display() {
        assert_eq!(Fact::obstacle(pos(3, 4)).to_string(), "Obstacle(3, 4)");
    }
}
