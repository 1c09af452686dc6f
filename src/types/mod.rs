//! Common types used across the Coinbase client library.

pub mod common;

pub use common::*;
