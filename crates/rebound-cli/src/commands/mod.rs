pub mod check;
pub mod dump;
pub mod exec;
pub mod run_common;
pub mod split;
pub mod trace;

#[cfg(test)]
mod exec_tests;
#[cfg(test)]
mod run_common_tests;
