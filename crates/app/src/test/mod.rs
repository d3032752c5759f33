//! Test harness shared by service tests.

pub(crate) mod helpers;

pub(crate) use context::TestContext;
