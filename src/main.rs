#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod args;

use std::fs;

use args::Args;
use clap::Parser;
use common::crossword::Crossword;
use log::info;
use util::{error::XWordResult, time::time_fn};
use xword_dict::word_list::WordList;
use xword_solver::{solver::XWordCsp, word_bank::WordBank};

fn main() -> XWordResult {
  env_logger::init();
  let args = Args::parse();

  let crossword = Crossword::from_layout(&fs::read_to_string(&args.structure)?)?;
  let words = WordList::read_file(&args.words)?;
  info!(
    "{}x{} grid with {} slots, {} candidate words",
    crossword.width(),
    crossword.height(),
    crossword.slots().len(),
    words.len()
  );

  let bank = WordBank::from_words(words.into_words());
  let mut csp = XWordCsp::new(crossword, &bank);
  let (elapsed, solution) = time_fn(|| csp.solve());
  info!("search finished in {:.3}s", elapsed.as_secs_f32());

  match solution? {
    Some(assignment) => {
      let grid = csp.crossword().letter_grid(&assignment)?;
      print!("{grid}");
      if let Some(output) = args.output {
        fs::write(output, grid.to_string())?;
      }
    }
    None => println!("No solution."),
  }

  Ok(())
}
