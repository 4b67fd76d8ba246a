mod common;
mod eval_tests;
mod manager_tests;
mod registry_tests;
