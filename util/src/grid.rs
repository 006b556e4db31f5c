use std::fmt::{Debug, Display};

use crate::{
  error::{XWordError, XWordResult},
  pos::Pos,
};

/// Dense row-major grid with bounds-checked access.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid<T> {
  cells: Vec<T>,
  width: u32,
  height: u32,
}

impl<T> Grid<T> {
  pub fn from_vec(cells: Vec<T>, width: u32, height: u32) -> XWordResult<Self> {
    let expected_size = width as usize * height as usize;
    if cells.len() != expected_size {
      return Err(
        XWordError::Internal(format!(
          "Expected cells.len() == expected_size, {} != {expected_size}",
          cells.len()
        ))
        .into(),
      );
    }

    Ok(Self { cells, width, height })
  }

  pub fn width(&self) -> u32 {
    self.width
  }

  pub fn height(&self) -> u32 {
    self.height
  }

  pub fn in_bounds(&self, pos: Pos) -> bool {
    pos.x >= 0 && pos.x < self.width as i32 && pos.y >= 0 && pos.y < self.height as i32
  }

  fn idx(&self, pos: Pos) -> usize {
    debug_assert!(self.in_bounds(pos));
    pos.x as usize + pos.y as usize * self.width as usize
  }

  pub fn get(&self, pos: Pos) -> Option<&T> {
    self
      .in_bounds(pos)
      .then(|| self.cells.get(self.idx(pos)))
      .flatten()
  }

  pub fn get_mut(&mut self, pos: Pos) -> Option<&mut T> {
    self
      .in_bounds(pos)
      .then(|| {
        let index = self.idx(pos);
        self.cells.get_mut(index)
      })
      .flatten()
  }

  pub fn iter_row<'a>(&'a self, y: u32) -> impl Iterator<Item = &'a T> {
    let y = y as i32;
    (0..self.width as i32).flat_map(move |x| self.get(Pos { x, y }))
  }

  pub fn iter_col<'a>(&'a self, x: u32) -> impl Iterator<Item = &'a T> {
    let x = x as i32;
    (0..self.height as i32).flat_map(move |y| self.get(Pos { x, y }))
  }

  pub fn map<F, U>(&self, f: F) -> Grid<U>
  where
    F: FnMut(&T) -> U,
  {
    Grid {
      cells: self.cells.iter().map(f).collect(),
      width: self.width,
      height: self.height,
    }
  }
}

impl<T: Debug> Debug for Grid<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    (0..self.height).try_fold((), |_, y| {
      self.iter_row(y).try_fold((), |_, t| write!(f, "{t:?} "))?;
      writeln!(f)
    })
  }
}

impl<T: Display> Display for Grid<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    (0..self.height).try_fold((), |_, y| {
      self.iter_row(y).try_fold((), |_, t| write!(f, "{t}"))?;
      writeln!(f)
    })
  }
}
