//! Integration tests for the DTMS freshness exporter.
//!
//! These tests run the exporter against a stub upstream API over real HTTP
//! and verify what scrapers observe on `/metrics`.

mod common;
mod lifecycle_tests;
