use kataforge_auth::email::Mailer;
use kataforge_auth::error::AuthServiceError;
use kataforge_auth::password::verify_password;
use kataforge_auth::usecase::AuthOutcome;
use kataforge_auth::usecase::signup::{SignupInput, SignupUseCase};
use kataforge_auth_types::token::VerificationPurpose;

use crate::helpers::{MockCodeRepo, MockUserRepo, TEST_JWT_SECRET, test_user};

fn signup_usecase(
    users: MockUserRepo,
    codes: MockCodeRepo,
    two_factor: bool,
) -> SignupUseCase<MockUserRepo, MockCodeRepo> {
    SignupUseCase {
        users,
        codes,
        mailer: Mailer::Log,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        two_factor,
    }
}

#[tokio::test]
async fn should_create_active_student_with_hashed_password() {
    let users = MockUserRepo::empty();
    let users_handle = users.users_handle();
    let usecase = signup_usecase(users, MockCodeRepo::empty(), false);

    let outcome = usecase
        .execute(SignupInput {
            name: "Jane".to_owned(),
            email: "jane@example.com".to_owned(),
            password: "Secret123".to_owned(),
        })
        .await
        .unwrap();

    assert!(matches!(outcome, AuthOutcome::Session { .. }));

    let stored = users_handle.lock().unwrap();
    assert_eq!(stored.len(), 1);
    let created = &stored[0];
    assert_eq!(created.email, "jane@example.com");
    assert_eq!(created.role, "student");
    assert!(created.is_active);
    assert_ne!(created.password_hash, "Secret123", "password must be hashed");
    assert!(verify_password("Secret123", &created.password_hash).unwrap());
}

#[tokio::test]
async fn should_reject_taken_email() {
    let existing = test_user("Secret123");
    let email = existing.email.clone();
    let usecase = signup_usecase(
        MockUserRepo::new(vec![existing]),
        MockCodeRepo::empty(),
        false,
    );

    let result = usecase
        .execute(SignupInput {
            name: "Other Jane".to_owned(),
            email,
            password: "Another1".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::EmailTaken)),
        "expected EmailTaken, got {result:?}"
    );
}

#[tokio::test]
async fn should_require_verification_in_two_factor_mode() {
    let codes = MockCodeRepo::empty();
    let codes_handle = codes.codes_handle();
    let usecase = signup_usecase(MockUserRepo::empty(), codes, true);

    let outcome = usecase
        .execute(SignupInput {
            name: "Jane".to_owned(),
            email: "jane@example.com".to_owned(),
            password: "Secret123".to_owned(),
        })
        .await
        .unwrap();

    let AuthOutcome::VerificationRequired { code_id, .. } = outcome else {
        panic!("expected VerificationRequired outcome");
    };

    let stored = codes_handle.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, code_id);
    assert_eq!(stored[0].purpose, VerificationPurpose::TwoFactor);
}
