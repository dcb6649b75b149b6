//! Integration tests for the mk CLI.

mod common;

mod exec_tests;
mod newer_tests;
mod run_tests;
