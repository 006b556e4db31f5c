use std::{collections::HashSet, fs, path::Path};

use util::error::{XWordError, XWordResult};

/// A vocabulary of candidate words, read from a one-word-per-line source.
/// Words are case-normalized to lowercase and deduplicated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordList {
  words: HashSet<String>,
}

impl WordList {
  fn canonicalize_word(word: &str) -> String {
    word.to_ascii_lowercase()
  }

  pub fn parse<S: AsRef<str>>(lines: impl IntoIterator<Item = S>) -> XWordResult<Self> {
    Ok(Self {
      words: lines
        .into_iter()
        .filter_map(|line| {
          let word = line.as_ref().trim().to_owned();
          if word.is_empty() {
            return None;
          }
          if !word.chars().all(char::is_alphabetic) {
            return Some(Err(
              XWordError::Parse(format!("Invalid word list entry \"{word}\"")).into(),
            ));
          }
          Some(Ok(Self::canonicalize_word(&word)))
        })
        .collect::<XWordResult<_>>()?,
    })
  }

  pub fn read_file(path: impl AsRef<Path>) -> XWordResult<Self> {
    Self::parse(fs::read_to_string(path)?.lines())
  }

  pub fn has(&self, word: &str) -> bool {
    self.words.contains(word)
  }

  pub fn into_words(self) -> HashSet<String> {
    self.words
  }

  pub fn len(&self) -> usize {
    self.words.len()
  }

  pub fn is_empty(&self) -> bool {
    self.words.is_empty()
  }
}
