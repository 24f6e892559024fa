//! changedir library exports for testing

pub mod commands;
pub mod core;
pub mod install;
pub mod prompt;
pub mod shells;

#[cfg(test)]
pub mod test_support;
