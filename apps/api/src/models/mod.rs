pub mod benchmark;
pub mod matching;
