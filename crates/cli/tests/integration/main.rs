mod common;
mod dispatch_tests;
mod plan_tests;
mod synth_tests;
