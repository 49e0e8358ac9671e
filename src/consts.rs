//! Shared timing constants for the collaboration core.

/// How long a reaction stays in the rendered set, in milliseconds.
pub const REACTION_TTL_MS: i64 = 4000;

/// Period of the expiry sweep that prunes stale reactions, in milliseconds.
pub const SWEEP_INTERVAL_MS: u64 = 1000;

/// Period of the emission sampler while a reaction is held, in milliseconds.
/// One event per tick gives the steady 10 events/second emission rate.
pub const SAMPLE_INTERVAL_MS: u64 = 100;
