//! Unit tests for command registration and dispatch.

mod definition_tests;
