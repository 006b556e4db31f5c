use std::{
  cmp::Reverse,
  collections::{HashMap, HashSet, VecDeque},
  error::Error,
};

use common::crossword::{Assignment, Crossword, Slot};
use itertools::Itertools;
use log::{debug, trace};
use util::error::{XWordError, XWordResult};

use crate::word_bank::WordBank;

/// Constraint-satisfaction filler for one crossword. Owns a mutable domain
/// store (slot -> admissible words) that only ever shrinks: node
/// consistency and AC-3 prune it destructively, and the backtracking
/// search leaves it untouched, mutating only the candidate assignment.
pub struct XWordCsp {
  crossword: Crossword,
  domains: HashMap<Slot, HashSet<String>>,
}

impl XWordCsp {
  /// Every slot starts with the full vocabulary as its domain.
  pub fn new(crossword: Crossword, bank: &WordBank) -> Self {
    let domains = crossword
      .slots()
      .iter()
      .map(|&slot| (slot, bank.words().map(str::to_owned).collect()))
      .collect();
    Self { crossword, domains }
  }

  pub fn crossword(&self) -> &Crossword {
    &self.crossword
  }

  fn unknown_slot(slot: &Slot) -> Box<dyn Error> {
    XWordError::Internal(format!("Slot {slot} is not part of the puzzle")).into()
  }

  pub fn domain(&self, slot: &Slot) -> XWordResult<&HashSet<String>> {
    self
      .domains
      .get(slot)
      .ok_or_else(|| Self::unknown_slot(slot))
  }

  fn neighbors(&self, slot: &Slot) -> XWordResult<&[Slot]> {
    self
      .crossword
      .neighbors(slot)
      .ok_or_else(|| Self::unknown_slot(slot))
  }

  /// Enforce node and arc consistency, then run backtracking search.
  /// `Ok(None)` is the ordinary "no solution" outcome; an unsolvable
  /// puzzle and one whose slots match no vocabulary word look alike here.
  pub fn solve(&mut self) -> XWordResult<Option<Assignment>> {
    self.enforce_node_consistency();
    debug!(
      "{} candidates across {} slots after node consistency",
      self.total_domain_size(),
      self.domains.len()
    );
    if !self.ac3(None)? {
      debug!("arc consistency emptied a domain");
      return Ok(None);
    }
    debug!(
      "{} candidates remain after arc consistency",
      self.total_domain_size()
    );
    self.backtrack(&mut Assignment::new())
  }

  fn total_domain_size(&self) -> usize {
    self.domains.values().map(HashSet::len).sum()
  }

  /// Drop every candidate whose length differs from its slot's length.
  /// Idempotent; safe to run before any arc processing.
  pub fn enforce_node_consistency(&mut self) {
    for (slot, domain) in &mut self.domains {
      domain.retain(|word| word.chars().count() == slot.len());
    }
  }

  /// Remove from `domain(x)` every word with no compatible partner in
  /// `domain(y)` at the slots' shared cell. No-op for non-overlapping
  /// slots. Returns whether `domain(x)` changed.
  pub fn revise(&mut self, x: &Slot, y: &Slot) -> XWordResult<bool> {
    if !self.domains.contains_key(x) {
      return Err(Self::unknown_slot(x));
    }
    let y_domain = self.domain(y)?.clone();
    let Some((ix, iy)) = self.crossword.overlap(x, y) else {
      return Ok(false);
    };

    let x_domain = self
      .domains
      .get_mut(x)
      .ok_or_else(|| Self::unknown_slot(x))?;
    let size_before = x_domain.len();
    x_domain.retain(|word| {
      word
        .chars()
        .nth(ix)
        .is_some_and(|c| y_domain.iter().any(|other| other.chars().nth(iy) == Some(c)))
    });
    Ok(x_domain.len() != size_before)
  }

  /// AC-3 worklist fixpoint: process arcs FIFO, seeded with
  /// `initial_arcs` or with every ordered overlapping pair. Returns false
  /// as soon as some domain empties, true once the queue drains.
  /// Terminates because domains are finite and only shrink.
  pub fn ac3(&mut self, initial_arcs: Option<Vec<(Slot, Slot)>>) -> XWordResult<bool> {
    let mut queue: VecDeque<_> = match initial_arcs {
      Some(arcs) => arcs.into(),
      None => self.all_arcs()?,
    };

    while let Some((x, y)) = queue.pop_front() {
      if self.revise(&x, &y)? {
        if self.domain(&x)?.is_empty() {
          trace!("domain of {x} wiped out while revising against {y}");
          return Ok(false);
        }
        for &z in self.neighbors(&x)? {
          if z != y {
            queue.push_back((x, z));
          }
        }
      }
    }

    Ok(true)
  }

  fn all_arcs(&self) -> XWordResult<VecDeque<(Slot, Slot)>> {
    let mut arcs = VecDeque::new();
    for &slot in self.crossword.slots() {
      for &neighbor in self.neighbors(&slot)? {
        arcs.push_back((slot, neighbor));
      }
    }
    Ok(arcs)
  }

  pub fn assignment_complete(&self, assignment: &Assignment) -> bool {
    self.domains.keys().all(|slot| assignment.contains_key(slot))
  }

  /// Check all currently assigned slots: words pairwise distinct, lengths
  /// matching, shared letters agreeing. Assigning a slot outside the
  /// puzzle is a contract violation, not an inconsistency.
  pub fn consistent(&self, assignment: &Assignment) -> XWordResult<bool> {
    let mut used_words = HashSet::new();
    for (slot, word) in assignment {
      if !self.domains.contains_key(slot) {
        return Err(Self::unknown_slot(slot));
      }
      if !used_words.insert(word.as_str()) {
        return Ok(false);
      }
      if word.chars().count() != slot.len() {
        return Ok(false);
      }
      for neighbor in self.neighbors(slot)? {
        let Some(other) = assignment.get(neighbor) else {
          continue;
        };
        let Some((ix, iy)) = self.crossword.overlap(slot, neighbor) else {
          continue;
        };
        if word.chars().nth(ix) != other.chars().nth(iy) {
          return Ok(false);
        }
      }
    }
    Ok(true)
  }

  /// Minimum-remaining-values, breaking ties by highest degree. Further
  /// ties fall to map iteration order; any of them is a correct choice.
  pub fn select_unassigned_slot(&self, assignment: &Assignment) -> XWordResult<Slot> {
    let mut candidates = vec![];
    for (&slot, domain) in &self.domains {
      if assignment.contains_key(&slot) {
        continue;
      }
      candidates.push((domain.len(), Reverse(self.neighbors(&slot)?.len()), slot));
    }

    candidates
      .into_iter()
      .min_by_key(|&(remaining, degree, _)| (remaining, degree))
      .map(|(_, _, slot)| slot)
      .ok_or_else(|| {
        XWordError::Internal("select_unassigned_slot called on a complete assignment".to_owned())
          .into()
      })
  }

  /// Least-constraining-value: candidates sorted ascending by how many
  /// values they would rule out of unassigned neighbors' domains. Since
  /// overlaps are checked against live domains during search, the only
  /// forced removal is the word itself, which no neighbor may reuse.
  pub fn order_domain_values(
    &self,
    slot: &Slot,
    assignment: &Assignment,
  ) -> XWordResult<Vec<String>> {
    let unassigned_neighbors: Vec<_> = self
      .neighbors(slot)?
      .iter()
      .filter(|neighbor| !assignment.contains_key(neighbor))
      .collect();

    let mut values = vec![];
    for word in self.domain(slot)? {
      let mut ruled_out = 0;
      for &&neighbor in &unassigned_neighbors {
        if self.domain(&neighbor)?.contains(word) {
          ruled_out += 1;
        }
      }
      values.push((ruled_out, word.clone()));
    }

    Ok(
      values
        .into_iter()
        .sorted_by_key(|&(ruled_out, _)| ruled_out)
        .map(|(_, word)| word)
        .collect(),
    )
  }

  /// Depth-first search over partial assignments. Each candidate is
  /// inserted tentatively and removed again on every non-success path,
  /// including error propagation out of the consistency check.
  pub fn backtrack(&self, assignment: &mut Assignment) -> XWordResult<Option<Assignment>> {
    if self.assignment_complete(assignment) {
      return Ok(Some(assignment.clone()));
    }

    let slot = self.select_unassigned_slot(assignment)?;
    trace!(
      "descending into {slot} with {} candidates",
      self.domain(&slot)?.len()
    );
    for word in self.order_domain_values(&slot, assignment)? {
      assignment.insert(slot, word);
      let branch = self.explore(assignment);
      assignment.remove(&slot);
      if let Some(solution) = branch? {
        return Ok(Some(solution));
      }
    }
    Ok(None)
  }

  fn explore(&self, assignment: &mut Assignment) -> XWordResult<Option<Assignment>> {
    if self.consistent(assignment)? {
      self.backtrack(assignment)
    } else {
      Ok(None)
    }
  }
}
