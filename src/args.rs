use std::path::PathBuf;

use clap::Parser;

/// Fill a crossword structure with words from a vocabulary list.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
  /// Path to the structure file: one line per row, '_' for an open cell,
  /// 'X' for a blocked one.
  pub structure: PathBuf,

  /// Path to the word list, one word per line.
  pub words: PathBuf,

  /// Also write the filled grid to this file.
  #[arg(long)]
  pub output: Option<PathBuf>,
}
