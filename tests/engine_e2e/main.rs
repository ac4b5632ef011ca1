//! Engine E2E test suite.
//!
//! Drives the aggregation engine against an in-memory paginated source on
//! tokio's paused clock, so debounce windows and latencies elapse instantly.
//!
//! Run with: cargo test --test engine_e2e


mod test_fetch_sequence;
