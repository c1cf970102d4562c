//! Unit tests for rampart-core.

#[test]
fn test_crate_structure() {
    // Smoke test - verifies the module structure compiles
    use crate::{FailureCode, RampartConfig, RequestContext, StageOutcome};

    let _config = RampartConfig::default();
    let context = RequestContext::new("agent", "user", "session-12345678", "task");
    let _proceed = StageOutcome::proceed(context);
    let _reject = StageOutcome::reject(FailureCode::Internal, "request could not be processed");
}
