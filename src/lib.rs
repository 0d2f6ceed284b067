pub mod benchmark;
pub mod command_parser;

#[cfg(test)]
mod unit_test;
