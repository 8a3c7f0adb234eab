//! Ready-made degradation policies.

use harvest_core::models::{DegradationAction, PolicySubject};
use harvest_policy::DeclarativePolicy;

/// Every field and the given advisors proceed with a disclaimer, for every intent.
pub fn proceed_everywhere(advisors: &[&str]) -> DeclarativePolicy {
    let mut policy = DeclarativePolicy::new();
    for label in ["field:weather", "field:soil", "field:crop_history", "field:preferences"]
        .iter()
        .map(|s| s.to_string())
        .chain(advisors.iter().map(|a| format!("advisor:{a}")))
    {
        if let Ok(subject) = PolicySubject::parse(&label) {
            let _ = policy.insert_wildcard(subject, DegradationAction::ProceedWithDisclaimer);
        }
    }
    policy
}

/// `proceed_everywhere` with specific overrides, given as `(intent, subject, action)`.
pub fn policy_with(
    advisors: &[&str],
    overrides: &[(&str, &str, DegradationAction)],
) -> DeclarativePolicy {
    let mut policy = proceed_everywhere(advisors);
    for (intent, subject, action) in overrides {
        let subject = PolicySubject::parse(subject)
            .unwrap_or_else(|e| panic!("bad subject in test policy: {e}"));
        policy
            .insert(harvest_core::Intent::parse(intent), subject, *action)
            .unwrap_or_else(|e| panic!("bad test policy rule: {e}"));
    }
    policy
}
