use std::collections::HashSet;

/// Owned, deduplicated candidate vocabulary for one fill.
#[derive(Clone, Debug, Default)]
pub struct WordBank {
  word_set: HashSet<String>,
}

impl WordBank {
  pub fn from_words(words: impl IntoIterator<Item = String>) -> Self {
    Self {
      word_set: words
        .into_iter()
        .map(|word| word.to_ascii_lowercase())
        .collect(),
    }
  }

  pub fn has(&self, word: &str) -> bool {
    self.word_set.contains(word)
  }

  pub fn words(&self) -> impl Iterator<Item = &str> {
    self.word_set.iter().map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.word_set.len()
  }

  pub fn is_empty(&self) -> bool {
    self.word_set.is_empty()
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use googletest::prelude::*;

  use super::WordBank;

  #[gtest]
  fn test_dedup_and_case() {
    let bank = WordBank::from_words(["Cat", "cat", "dog"].map(str::to_owned));
    expect_eq!(bank.len(), 2);
    expect_true!(bank.has("cat"));
    expect_true!(bank.has("dog"));
    expect_false!(bank.has("Cat"));
  }

  #[gtest]
  fn test_empty() {
    let bank = WordBank::from_words([]);
    expect_true!(bank.is_empty());
  }
}
