pub mod crossword;
