use crate::model::EnforcementSchedule;
use polgate_types::EnforcementLevel;
use time::OffsetDateTime;

/// Resolve the enforcement level of a schedule at a given instant.
///
/// Total over all schedules and instants; first match wins:
/// 1. not yet in effect (or never) -> `NOT_IN_EFFECT`
/// 2. past the blocking threshold -> `BLOCK`
/// 3. past the warning threshold -> `WARNING`
/// 4. in effect, no stricter tier reached -> `RECOMMEND`
///
/// Pure and deterministic: identical inputs always yield identical levels.
pub fn resolve_level(schedule: &EnforcementSchedule, now: OffsetDateTime) -> EnforcementLevel {
    let Some(in_effect_after) = schedule.in_effect_after else {
        return EnforcementLevel::NotInEffect;
    };
    if now < in_effect_after {
        return EnforcementLevel::NotInEffect;
    }

    if let Some(blocking_after) = schedule.blocking_after {
        if now >= blocking_after {
            return EnforcementLevel::Block;
        }
    }

    if let Some(warning_after) = schedule.warning_after {
        if now >= warning_after {
            return EnforcementLevel::Warning;
        }
    }

    EnforcementLevel::Recommend
}
