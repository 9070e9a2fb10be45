//! Resend Throttle Policy
//!
//! Pure domain logic deciding whether a verification email may be re-sent
//! now, and if not, how long the caller has to wait. Escalating cooldowns
//! defend against verification-email abuse while still allowing legitimate
//! retries; the hard cap converts unbounded retry into a terminal lockout
//! requiring out-of-band intervention.

use chrono::{DateTime, Utc};

use crate::domain::entity::account::Account;

/// Cooldown (seconds) required before the next resend, indexed by the
/// current `email_resend_count` before incrementing.
///
/// The first resend is free; counts past the table end never consult it
/// because the account is locked out first.
pub const RESEND_COOLDOWN_SECS: [i64; 5] = [0, 30, 60, 720, 3600];

/// Resend count at which the account transitions to the terminal lockout.
/// The 4th resend is the last one ever permitted.
pub const RESEND_LOCKOUT_THRESHOLD: u16 = 4;

/// Outcome of evaluating the throttle policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResendDecision {
    /// A resend may proceed now
    Allowed,
    /// The cooldown window is still open; retry after `wait_ms`
    Cooling { wait_ms: i64 },
    /// Terminal lockout; no resend will ever be allowed again
    Blocked,
}

/// Cooldown in milliseconds for a given resend count
///
/// Used to report the *next* wait to a caller after a successful resend.
pub fn cooldown_ms(resend_count: u16) -> i64 {
    let idx = usize::from(resend_count).min(RESEND_COOLDOWN_SECS.len() - 1);
    RESEND_COOLDOWN_SECS[idx] * 1000
}

/// Evaluate whether `account` may resend a verification email at `now`
///
/// Check order matters: an already-blocked account and one that has just
/// exhausted its allowance both answer `Blocked` without consulting the
/// schedule. The caller is responsible for persisting `email_blocked = true`
/// when the threshold was reached, and for the bookkeeping on an
/// acted-upon `Allowed` (token rotation, counter increment, timestamp).
pub fn evaluate(account: &Account, now: DateTime<Utc>) -> ResendDecision {
    if account.email_blocked {
        return ResendDecision::Blocked;
    }

    if account.email_resend_count >= RESEND_LOCKOUT_THRESHOLD {
        return ResendDecision::Blocked;
    }

    let cooldown_ms = cooldown_ms(account.email_resend_count);

    let Some(last) = account.last_email_resend_at else {
        // Never re-sent: cooldown trivially satisfied
        return ResendDecision::Allowed;
    };

    let elapsed_ms = now.signed_duration_since(last).num_milliseconds();
    let wait_ms = (cooldown_ms - elapsed_ms).max(0);

    if wait_ms == 0 {
        ResendDecision::Allowed
    } else {
        ResendDecision::Cooling { wait_ms }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{
        AccountPassword, DisplayName, Email, ExperienceLevel, RawPassword,
    };
    use chrono::Duration;

    fn account_with(count: u16, last: Option<DateTime<Utc>>, blocked: bool) -> Account {
        let raw = RawPassword::new("correct horse battery".to_string()).unwrap();
        let mut account = Account::new(
            Email::new("alice@x.com").unwrap(),
            DisplayName::new("Alice").unwrap(),
            None,
            ExperienceLevel::Junior,
            AccountPassword::from_raw(&raw, None).unwrap(),
        );
        account.email_resend_count = count;
        account.last_email_resend_at = last;
        account.email_blocked = blocked;
        account
    }

    #[test]
    fn test_schedule_strictly_increases() {
        for w in RESEND_COOLDOWN_SECS.windows(2) {
            assert!(w[0] < w[1]);
        }
    }

    #[test]
    fn test_first_resend_is_free() {
        let now = Utc::now();
        let account = account_with(0, None, false);
        assert_eq!(evaluate(&account, now), ResendDecision::Allowed);
    }

    #[test]
    fn test_cooling_wait_is_remaining_time() {
        let now = Utc::now();
        // count=1 requires 30s; only 10s elapsed
        let account = account_with(1, Some(now - Duration::seconds(10)), false);
        assert_eq!(
            evaluate(&account, now),
            ResendDecision::Cooling { wait_ms: 20_000 }
        );
    }

    #[test]
    fn test_allowed_after_cooldown_elapsed() {
        let now = Utc::now();
        for (count, secs) in [(1u16, 30i64), (2, 60), (3, 720)] {
            let account = account_with(count, Some(now - Duration::seconds(secs)), false);
            assert_eq!(evaluate(&account, now), ResendDecision::Allowed);

            let account = account_with(count, Some(now - Duration::seconds(secs - 1)), false);
            assert!(matches!(
                evaluate(&account, now),
                ResendDecision::Cooling { .. }
            ));
        }
    }

    #[test]
    fn test_wait_never_negative() {
        let now = Utc::now();
        // Elapsed far beyond the cooldown never yields a negative wait
        let account = account_with(2, Some(now - Duration::hours(48)), false);
        assert_eq!(evaluate(&account, now), ResendDecision::Allowed);
    }

    #[test]
    fn test_threshold_blocks_regardless_of_elapsed_time() {
        let now = Utc::now();
        let account = account_with(4, Some(now - Duration::days(365)), false);
        assert_eq!(evaluate(&account, now), ResendDecision::Blocked);

        let account = account_with(7, None, false);
        assert_eq!(evaluate(&account, now), ResendDecision::Blocked);
    }

    #[test]
    fn test_blocked_flag_is_terminal() {
        let now = Utc::now();
        // Even a count below the threshold stays blocked once the flag is set
        let account = account_with(0, None, true);
        assert_eq!(evaluate(&account, now), ResendDecision::Blocked);
    }

    #[test]
    fn test_cooldown_ms_reporting() {
        assert_eq!(cooldown_ms(0), 0);
        assert_eq!(cooldown_ms(1), 30_000);
        assert_eq!(cooldown_ms(2), 60_000);
        assert_eq!(cooldown_ms(3), 720_000);
        assert_eq!(cooldown_ms(4), 3_600_000);
        // Past the table end, clamps to the last entry
        assert_eq!(cooldown_ms(9), 3_600_000);
    }
}
