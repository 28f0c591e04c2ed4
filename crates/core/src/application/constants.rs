// Application constants (ADR: No magic values)
use std::time::Duration;

/// Expiry sweep cadence (1 minute)
pub const DEFAULT_EXPIRY_INTERVAL: Duration = Duration::from_secs(60);

/// Time past `scheduled_time` before a still-`scheduled` interview expires (2 minutes)
pub const DEFAULT_EXPIRY_GRACE: Duration = Duration::from_secs(2 * 60);

/// Read-evaluate-write rounds before a lost conditional update is reported as a conflict
/// (the first write plus one re-read)
pub const CONDITIONAL_UPDATE_ATTEMPTS: usize = 2;

/// Decline reason written by the job-closure cascade
pub const JOB_CLOSED_REASON: &str = "job closed";

/// Decline reason when the applicant declines an offer without giving one
pub const OFFER_DECLINED_REASON: &str = "offer declined by applicant";
