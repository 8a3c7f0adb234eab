//! Totality check: every declared `(intent, subject)` pair must be mapped.

use harvest_core::errors::ConfigurationError;
use harvest_core::intent::Intent;
use harvest_core::models::PolicySubject;
use harvest_core::traits::IDegradationPolicy;

/// Pairs from `declared` the policy cannot decide, in input order.
pub fn missing_rules(
    policy: &dyn IDegradationPolicy,
    declared: &[(Intent, PolicySubject)],
) -> Vec<(Intent, PolicySubject)> {
    declared
        .iter()
        .filter(|(intent, subject)| policy.decide(intent, subject).is_err())
        .cloned()
        .collect()
}

/// Fail with the first unmapped pair, if any.
pub fn ensure_total(
    policy: &dyn IDegradationPolicy,
    declared: &[(Intent, PolicySubject)],
) -> Result<(), ConfigurationError> {
    for (intent, subject) in declared {
        policy.decide(intent, subject)?;
    }
    Ok(())
}
