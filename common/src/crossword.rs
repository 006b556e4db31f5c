use std::{collections::HashMap, fmt::Display};

use itertools::Itertools;
use util::{
  error::{XWordError, XWordResult},
  grid::Grid,
  pos::{Diff, Pos},
};

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Orientation {
  Across,
  Down,
}

impl Orientation {
  /// Unit step from one cell of a slot to the next.
  pub const fn delta(self) -> Diff {
    match self {
      Orientation::Across => Diff::DX,
      Orientation::Down => Diff::DY,
    }
  }
}

impl Display for Orientation {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Orientation::Across => write!(f, "across"),
      Orientation::Down => write!(f, "down"),
    }
  }
}

/// A maximal run of at least two open cells in one orientation, requiring
/// one word. Identity is (start position, orientation, length).
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Slot {
  pub pos: Pos,
  pub orientation: Orientation,
  pub length: u32,
}

impl Slot {
  pub fn len(&self) -> usize {
    self.length as usize
  }

  pub fn is_empty(&self) -> bool {
    self.length == 0
  }

  /// The grid positions this slot occupies, in word order.
  pub fn cells(&self) -> impl Iterator<Item = Pos> {
    let pos = self.pos;
    let delta = self.orientation.delta();
    (0..self.length as i32).map(move |idx| pos + delta * idx)
  }
}

impl Display for Slot {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}-{} at {}", self.length, self.orientation, self.pos)
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tile {
  Letter(char),
  Empty,
  Wall,
}

impl Display for Tile {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{}",
      match self {
        Tile::Letter(c) => *c,
        Tile::Empty => '_',
        Tile::Wall => '█',
      }
    )
  }
}

/// A word choice for every slot it maps.
pub type Assignment = HashMap<Slot, String>;

/// Immutable puzzle structure: which cells are open, the slots they form,
/// and where slots cross each other.
#[derive(Clone, Debug)]
pub struct Crossword {
  structure: Grid<bool>,
  slots: Vec<Slot>,
  overlaps: HashMap<(Slot, Slot), (usize, usize)>,
  neighbors: HashMap<Slot, Vec<Slot>>,
}

impl Crossword {
  /// Parse a structure description: one line per row, `_` for an open cell
  /// and `X` for a blocked one.
  pub fn from_layout(layout: &str) -> XWordResult<Self> {
    let (width, height, cells) = layout.lines().try_fold(
      (None, 0u32, vec![]),
      |(width, height, mut cells), line| -> XWordResult<_> {
        let line = line.trim();
        cells.extend(
          line
            .chars()
            .map(|c| match c {
              '_' => Ok(true),
              'X' => Ok(false),
              _ => Err(XWordError::Parse(format!("Unrecognized board character '{c}'")).into()),
            })
            .collect::<XWordResult<Vec<_>>>()?,
        );
        if let Some(width) = width {
          if line.len() != width {
            return Err(
              XWordError::Parse(format!(
                "Board line lengths differ: {} vs {width}",
                line.len()
              ))
              .into(),
            );
          }
        }

        Ok((Some(line.len()), height + 1, cells))
      },
    )?;

    let width = width.ok_or_else(|| XWordError::Parse("Empty board string".to_owned()))? as u32;
    let structure = Grid::from_vec(cells, width, height)?;

    let slots = Self::extract_slots(&structure);
    let (overlaps, neighbors) = Self::build_overlaps(&slots);
    Ok(Self { structure, slots, overlaps, neighbors })
  }

  /// Find every maximal run of open cells of length >= 2, row by row and
  /// column by column. A lone open cell forms no slot.
  fn extract_slots(structure: &Grid<bool>) -> Vec<Slot> {
    fn runs(line: impl Iterator<Item = bool>) -> Vec<(i32, u32)> {
      let mut runs = vec![];
      let mut start = None;
      // Chain a closed sentinel so a run touching the edge still ends.
      for (idx, open) in line.chain(std::iter::once(false)).enumerate() {
        match (open, start) {
          (true, None) => start = Some(idx as i32),
          (false, Some(from)) => {
            let length = idx as i32 - from;
            if length >= 2 {
              runs.push((from, length as u32));
            }
            start = None;
          }
          _ => {}
        }
      }
      runs
    }

    (0..structure.height())
      .flat_map(|y| {
        runs(structure.iter_row(y).copied())
          .into_iter()
          .map(move |(x, length)| Slot {
            pos: Pos { x, y: y as i32 },
            orientation: Orientation::Across,
            length,
          })
      })
      .chain((0..structure.width()).flat_map(|x| {
        runs(structure.iter_col(x).copied())
          .into_iter()
          .map(move |(y, length)| Slot {
            pos: Pos { x: x as i32, y },
            orientation: Orientation::Down,
            length,
          })
      }))
      .collect()
  }

  /// Intra-word indices of the cell shared by two perpendicular slots, if
  /// any. Parallel slots never share a cell: runs are maximal, so two
  /// slots of the same orientation are separated by a wall or lie in
  /// different rows/columns.
  fn crossing_indices(a: Slot, b: Slot) -> Option<(usize, usize)> {
    match (a.orientation, b.orientation) {
      (Orientation::Across, Orientation::Down) => {
        let ia = b.pos.x - a.pos.x;
        let ib = a.pos.y - b.pos.y;
        ((0..a.length as i32).contains(&ia) && (0..b.length as i32).contains(&ib))
          .then_some((ia as usize, ib as usize))
      }
      (Orientation::Down, Orientation::Across) => {
        Self::crossing_indices(b, a).map(|(ib, ia)| (ia, ib))
      }
      _ => None,
    }
  }

  fn build_overlaps(
    slots: &[Slot],
  ) -> (
    HashMap<(Slot, Slot), (usize, usize)>,
    HashMap<Slot, Vec<Slot>>,
  ) {
    let mut overlaps = HashMap::new();
    let mut neighbors: HashMap<_, Vec<_>> =
      slots.iter().map(|&slot| (slot, vec![])).collect();

    for (&a, &b) in slots.iter().tuple_combinations() {
      if let Some((ia, ib)) = Self::crossing_indices(a, b) {
        overlaps.insert((a, b), (ia, ib));
        overlaps.insert((b, a), (ib, ia));
        neighbors.entry(a).or_default().push(b);
        neighbors.entry(b).or_default().push(a);
      }
    }

    (overlaps, neighbors)
  }

  pub fn slots(&self) -> &[Slot] {
    &self.slots
  }

  pub fn contains(&self, slot: &Slot) -> bool {
    self.neighbors.contains_key(slot)
  }

  /// `Some((ix, iy))` when `x`'s letter at `ix` must equal `y`'s letter at
  /// `iy`, `None` when the slots never intersect (or either is unknown).
  pub fn overlap(&self, x: &Slot, y: &Slot) -> Option<(usize, usize)> {
    self.overlaps.get(&(*x, *y)).copied()
  }

  /// Every other slot sharing a cell with `slot`, or `None` if `slot` is
  /// not part of this puzzle.
  pub fn neighbors(&self, slot: &Slot) -> Option<&[Slot]> {
    self.neighbors.get(slot).map(Vec::as_slice)
  }

  pub fn width(&self) -> u32 {
    self.structure.width()
  }

  pub fn height(&self) -> u32 {
    self.structure.height()
  }

  pub fn is_open(&self, pos: Pos) -> bool {
    self.structure.get(pos).is_some_and(|&open| open)
  }

  /// Render an assignment onto the structure. Assigned letters land on
  /// open cells; a length mismatch or two words disagreeing on a shared
  /// cell is a contract violation.
  pub fn letter_grid(&self, assignment: &Assignment) -> XWordResult<Grid<Tile>> {
    let mut grid = self
      .structure
      .map(|&open| if open { Tile::Empty } else { Tile::Wall });

    for (slot, word) in assignment {
      if word.chars().count() != slot.len() {
        return Err(
          XWordError::Internal(format!("Word \"{word}\" does not fit slot {slot}")).into(),
        );
      }
      for (c, pos) in word.chars().zip(slot.cells()) {
        let tile = grid
          .get_mut(pos)
          .ok_or_else(|| XWordError::Internal(format!("Position {pos} is out of bounds")))?;
        match tile {
          Tile::Letter(existing) if *existing != c => {
            return Err(
              XWordError::Internal(format!(
                "Conflicting letter assignment at position {pos}: {c} vs {existing}"
              ))
              .into(),
            );
          }
          Tile::Wall => {
            return Err(XWordError::Internal(format!("Position {pos} is a wall")).into());
          }
          _ => *tile = Tile::Letter(c),
        }
      }
    }

    Ok(grid)
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use googletest::prelude::*;
  use util::pos::Pos;

  use super::{Assignment, Crossword, Orientation, Slot, Tile};

  fn across(x: i32, y: i32, length: u32) -> Slot {
    Slot {
      pos: Pos { x, y },
      orientation: Orientation::Across,
      length,
    }
  }

  fn down(x: i32, y: i32, length: u32) -> Slot {
    Slot {
      pos: Pos { x, y },
      orientation: Orientation::Down,
      length,
    }
  }

  #[gtest]
  fn test_empty_layout() {
    let crossword = Crossword::from_layout("");
    expect_that!(crossword, err(anything()));
  }

  #[gtest]
  fn test_bad_character() {
    let crossword = Crossword::from_layout("_?_");
    expect_that!(crossword, err(anything()));
  }

  #[gtest]
  fn test_ragged_lines() {
    let crossword = Crossword::from_layout(
      "___
       __",
    );
    expect_that!(crossword, err(anything()));
  }

  #[gtest]
  fn test_open_cells() {
    let crossword = Crossword::from_layout(
      "__
       X_",
    )
    .unwrap();
    expect_true!(crossword.is_open(Pos { x: 0, y: 0 }));
    expect_true!(crossword.is_open(Pos { x: 1, y: 0 }));
    expect_false!(crossword.is_open(Pos { x: 0, y: 1 }));
    expect_true!(crossword.is_open(Pos { x: 1, y: 1 }));
    expect_false!(crossword.is_open(Pos { x: 2, y: 0 }));
  }

  #[gtest]
  fn test_single_row_slot() {
    let crossword = Crossword::from_layout("___").unwrap();
    expect_that!(crossword.slots().to_vec(), container_eq([across(0, 0, 3)]));
  }

  #[gtest]
  fn test_lone_cell_forms_no_slot() {
    let crossword = Crossword::from_layout(
      "_X
       XX",
    )
    .unwrap();
    expect_that!(crossword.slots(), empty());
  }

  #[gtest]
  fn test_slots_in_both_orientations() {
    let crossword = Crossword::from_layout(
      "__
       _X",
    )
    .unwrap();
    expect_that!(
      crossword.slots().to_vec(),
      unordered_elements_are![&across(0, 0, 2), &down(0, 0, 2)]
    );
  }

  #[gtest]
  fn test_walls_split_runs() {
    let crossword = Crossword::from_layout(
      "__X__
       XXXXX
       _____",
    )
    .unwrap();
    expect_that!(
      crossword.slots().to_vec(),
      unordered_elements_are![&across(0, 0, 2), &across(3, 0, 2), &across(0, 2, 5)]
    );
  }

  #[gtest]
  fn test_overlap_indices() {
    // Across slot in row 0, down slot in column 1 crossing it at
    // across-index 1 / down-index 0.
    let crossword = Crossword::from_layout(
      "___
       X_X
       X_X",
    )
    .unwrap();
    let a = across(0, 0, 3);
    let d = down(1, 0, 3);
    expect_that!(crossword.overlap(&a, &d), some(eq((1, 0))));
    expect_that!(crossword.overlap(&d, &a), some(eq((0, 1))));
  }

  #[gtest]
  fn test_no_overlap_for_disjoint_slots() {
    let crossword = Crossword::from_layout(
      "__X
       XX_
       XX_",
    )
    .unwrap();
    let a = across(0, 0, 2);
    let d = down(2, 1, 2);
    expect_that!(crossword.overlap(&a, &d), none());
    expect_that!(crossword.neighbors(&a).unwrap(), empty());
  }

  #[gtest]
  fn test_neighbors_symmetric() {
    let crossword = Crossword::from_layout(
      "___
       X_X
       X_X",
    )
    .unwrap();
    let a = across(0, 0, 3);
    let d = down(1, 0, 3);
    expect_that!(crossword.neighbors(&a).unwrap().to_vec(), container_eq([d]));
    expect_that!(crossword.neighbors(&d).unwrap().to_vec(), container_eq([a]));
  }

  #[gtest]
  fn test_neighbors_of_unknown_slot() {
    let crossword = Crossword::from_layout("___").unwrap();
    expect_that!(crossword.neighbors(&across(0, 5, 3)), none());
    expect_false!(crossword.contains(&across(0, 5, 3)));
  }

  #[gtest]
  fn test_letter_grid() {
    let crossword = Crossword::from_layout(
      "___
       X_X",
    )
    .unwrap();
    let assignment: Assignment = [
      (across(0, 0, 3), "cat".to_owned()),
      (down(1, 0, 2), "ah".to_owned()),
    ]
    .into_iter()
    .collect();

    let grid = crossword.letter_grid(&assignment).unwrap();
    expect_that!(grid.get(Pos { x: 0, y: 0 }), some(eq(&Tile::Letter('c'))));
    expect_that!(grid.get(Pos { x: 1, y: 0 }), some(eq(&Tile::Letter('a'))));
    expect_that!(grid.get(Pos { x: 2, y: 0 }), some(eq(&Tile::Letter('t'))));
    expect_that!(grid.get(Pos { x: 1, y: 1 }), some(eq(&Tile::Letter('h'))));
    expect_that!(grid.get(Pos { x: 0, y: 1 }), some(eq(&Tile::Wall)));
  }

  #[gtest]
  fn test_letter_grid_conflicting_letters() {
    let crossword = Crossword::from_layout(
      "___
       X_X",
    )
    .unwrap();
    let assignment: Assignment = [
      (across(0, 0, 3), "cat".to_owned()),
      (down(1, 0, 2), "oh".to_owned()),
    ]
    .into_iter()
    .collect();

    expect_that!(crossword.letter_grid(&assignment), err(anything()));
  }

  #[gtest]
  fn test_letter_grid_length_mismatch() {
    let crossword = Crossword::from_layout("___").unwrap();
    let assignment: Assignment = [(across(0, 0, 3), "cats".to_owned())].into_iter().collect();
    expect_that!(crossword.letter_grid(&assignment), err(anything()));
  }

  #[gtest]
  fn test_slot_len() {
    expect_eq!(across(0, 0, 3).len(), 3);
    expect_false!(across(0, 0, 3).is_empty());
    expect_true!(down(2, 1, 0).is_empty());
  }

  #[gtest]
  fn test_slot_cells() {
    expect_that!(
      down(2, 1, 3).cells().collect::<Vec<_>>(),
      container_eq([Pos { x: 2, y: 1 }, Pos { x: 2, y: 2 }, Pos { x: 2, y: 3 }])
    );
  }
}
