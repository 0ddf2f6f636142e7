//! Rewrites an event log into an equivalent, smaller one.

pub(crate) mod pass;
