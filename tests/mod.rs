//! Test module organization.
//!
//! This module organizes all integration tests for the batch driver.




/// Process backend tests against scripted tools.
mod process_tests;

/// Stage sequence compilation tests.
mod sequence_tests;
