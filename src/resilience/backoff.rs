//! Exponential backoff with jitter for repeated poll failures.

use std::time::Duration;
use rand::Rng;

/// Delay for the `attempt`-th consecutive failure: `base_ms * 2^(attempt-1)`,
/// capped at `max_ms`, plus up to 10% jitter so that many clients losing the
/// same server do not reconnect in lockstep.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let factor = 2u64.saturating_pow(attempt - 1);
    let capped_ms = base_ms.saturating_mul(factor).min(max_ms);

    Duration::from_millis(capped_ms.saturating_add(jitter_ms(capped_ms)))
}

fn jitter_ms(delay_ms: u64) -> u64 {
    let range = delay_ms / 10;
    if range == 0 {
        return 0;
    }
    rand::thread_rng().gen_range(0..range)
}
