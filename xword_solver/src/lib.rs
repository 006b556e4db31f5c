pub mod solver;
pub mod word_bank;
