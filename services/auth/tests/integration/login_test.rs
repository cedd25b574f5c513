use kataforge_auth::email::Mailer;
use kataforge_auth::error::AuthServiceError;
use kataforge_auth::usecase::AuthOutcome;
use kataforge_auth::usecase::login::{LoginInput, LoginUseCase};
use kataforge_auth_types::token::{
    VerificationPurpose, validate_session_token, validate_verification_token,
};

use crate::helpers::{MockCodeRepo, MockUserRepo, TEST_JWT_SECRET, test_user};

fn login_usecase(
    users: MockUserRepo,
    codes: MockCodeRepo,
    two_factor: bool,
) -> LoginUseCase<MockUserRepo, MockCodeRepo> {
    LoginUseCase {
        users,
        codes,
        mailer: Mailer::Log,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        two_factor,
    }
}

#[tokio::test]
async fn should_mint_session_for_valid_credentials() {
    let user = test_user("Secret123");
    let usecase = login_usecase(MockUserRepo::new(vec![user.clone()]), MockCodeRepo::empty(), false);

    let outcome = usecase
        .execute(LoginInput {
            email: user.email.clone(),
            password: "Secret123".to_owned(),
        })
        .await
        .unwrap();

    let AuthOutcome::Session {
        user: session_user,
        session_token,
    } = outcome
    else {
        panic!("expected Session outcome");
    };
    assert_eq!(session_user.id, user.id);

    let claims = validate_session_token(&session_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(claims.user_id().unwrap(), user.id);
    assert_eq!(claims.email, user.email);
    assert_eq!(claims.role, "student");
}

#[tokio::test]
async fn should_reject_wrong_password() {
    let user = test_user("Secret123");
    let usecase = login_usecase(MockUserRepo::new(vec![user.clone()]), MockCodeRepo::empty(), false);

    let result = usecase
        .execute(LoginInput {
            email: user.email.clone(),
            password: "WrongPass1".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_unknown_email_with_same_error_as_wrong_password() {
    let usecase = login_usecase(MockUserRepo::empty(), MockCodeRepo::empty(), false);

    let result = usecase
        .execute(LoginInput {
            email: "nobody@example.com".to_owned(),
            password: "Secret123".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_disabled_account() {
    let mut user = test_user("Secret123");
    user.is_active = false;
    let usecase = login_usecase(MockUserRepo::new(vec![user.clone()]), MockCodeRepo::empty(), false);

    let result = usecase
        .execute(LoginInput {
            email: user.email.clone(),
            password: "Secret123".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::AccountDisabled)),
        "expected AccountDisabled, got {result:?}"
    );
}

#[tokio::test]
async fn should_require_verification_in_two_factor_mode() {
    let user = test_user("Secret123");
    let codes = MockCodeRepo::empty();
    let codes_handle = codes.codes_handle();
    let usecase = login_usecase(MockUserRepo::new(vec![user.clone()]), codes, true);

    let outcome = usecase
        .execute(LoginInput {
            email: user.email.clone(),
            password: "Secret123".to_owned(),
        })
        .await
        .unwrap();

    let AuthOutcome::VerificationRequired {
        verification_token,
        code_id,
    } = outcome
    else {
        panic!("expected VerificationRequired outcome");
    };

    // The verification token binds the attempt to the user and purpose.
    let claims = validate_verification_token(&verification_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(claims.user_id().unwrap(), user.id);
    assert_eq!(claims.purpose, VerificationPurpose::TwoFactor);

    // Exactly one six-digit code row, matching the cookie id.
    let stored = codes_handle.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, code_id);
    assert_eq!(stored[0].user_id, user.id);
    assert_eq!(stored[0].purpose, VerificationPurpose::TwoFactor);
    assert_eq!(stored[0].code.len(), 6);
    assert!(stored[0].expires_at > chrono::Utc::now());
}
