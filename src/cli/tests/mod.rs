//! Unit tests for the command-line front end.
