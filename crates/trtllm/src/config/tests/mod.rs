//! Tests for executor configuration.

mod validation_tests;
