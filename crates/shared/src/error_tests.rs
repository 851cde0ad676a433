use super::*;
use rstest::rstest;

#[rstest]
#[case(AppError::NotFound("x".into()), 404, "NOT_FOUND")]
#[case(AppError::Validation("x".into()), 400, "VALIDATION_ERROR")]
#[case(AppError::BusinessRule("x".into()), 422, "BUSINESS_RULE_VIOLATION")]
#[case(AppError::Conflict("x".into()), 409, "CONFLICT")]
#[case(AppError::Database("x".into()), 500, "DATABASE_ERROR")]
#[case(AppError::ExternalService("x".into()), 502, "EXTERNAL_SERVICE_ERROR")]
#[case(AppError::Internal("x".into()), 500, "INTERNAL_ERROR")]
fn test_app_error_mapping(#[case] err: AppError, #[case] status: u16, #[case] code: &str) {
    assert_eq!(err.status_code(), status);
    assert_eq!(err.error_code(), code);
}

#[test]
fn test_app_error_display() {
    assert_eq!(
        AppError::BusinessRule("job is blocked".into()).to_string(),
        "Business rule violation: job is blocked"
    );
    assert_eq!(
        AppError::Conflict("duplicate".into()).to_string(),
        "Conflict: duplicate"
    );
}

#[test]
fn test_guard_classification() {
    assert!(AppError::BusinessRule(String::new()).is_guard());
    assert!(AppError::Conflict(String::new()).is_guard());
    assert!(AppError::Validation(String::new()).is_guard());
    assert!(!AppError::Database(String::new()).is_guard());
    assert!(!AppError::ExternalService(String::new()).is_guard());
}
