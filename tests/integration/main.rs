//! Integration test entry point.

mod helpers;

mod auth_test;
mod ws_test;
