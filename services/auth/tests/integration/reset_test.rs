use kataforge_auth::email::Mailer;
use kataforge_auth::error::AuthServiceError;
use kataforge_auth::usecase::login::{LoginInput, LoginUseCase};
use kataforge_auth::usecase::reset::{
    CompleteResetInput, CompleteResetUseCase, RequestResetUseCase,
};
use kataforge_auth_types::token::{VerificationPurpose, validate_verification_token};

use crate::helpers::{MockCodeRepo, MockUserRepo, TEST_JWT_SECRET, test_user};

#[tokio::test]
async fn should_report_nothing_for_unknown_email() {
    let codes = MockCodeRepo::empty();
    let codes_handle = codes.codes_handle();
    let usecase = RequestResetUseCase {
        users: MockUserRepo::empty(),
        codes,
        mailer: Mailer::Log,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = usecase.execute("nobody@example.com").await.unwrap();
    assert!(result.is_none());
    assert!(
        codes_handle.lock().unwrap().is_empty(),
        "no code may be minted for an unknown account"
    );
}

#[tokio::test]
async fn should_report_nothing_for_deactivated_account() {
    let mut user = test_user("Secret123");
    user.is_active = false;
    let usecase = RequestResetUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        codes: MockCodeRepo::empty(),
        mailer: Mailer::Log,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    assert!(usecase.execute(&user.email).await.unwrap().is_none());
}

#[tokio::test]
async fn should_mint_reset_code_and_token_for_known_account() {
    let user = test_user("Secret123");
    let codes = MockCodeRepo::empty();
    let codes_handle = codes.codes_handle();
    let usecase = RequestResetUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        codes,
        mailer: Mailer::Log,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let (verification_token, code_id) = usecase.execute(&user.email).await.unwrap().unwrap();

    let claims = validate_verification_token(&verification_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(claims.user_id().unwrap(), user.id);
    assert_eq!(claims.purpose, VerificationPurpose::PasswordReset);

    let stored = codes_handle.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, code_id);
    assert_eq!(stored[0].purpose, VerificationPurpose::PasswordReset);
}

#[tokio::test]
async fn should_round_trip_password_reset() {
    let user = test_user("OldSecret1");
    let users = MockUserRepo::new(vec![user.clone()]);
    let users_handle = users.users_handle();
    let codes = MockCodeRepo::empty();
    let codes_handle = codes.codes_handle();

    // Request a code.
    let request = RequestResetUseCase {
        users: MockUserRepo {
            users: users_handle.clone(),
        },
        codes: MockCodeRepo {
            codes: codes_handle.clone(),
        },
        mailer: Mailer::Log,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let (verification_token, code_id) = request.execute(&user.email).await.unwrap().unwrap();
    let claims = validate_verification_token(&verification_token, TEST_JWT_SECRET).unwrap();
    let code = codes_handle.lock().unwrap()[0].code.clone();

    // Complete with the correct code and a new password.
    let complete = CompleteResetUseCase {
        users: MockUserRepo {
            users: users_handle.clone(),
        },
        codes: MockCodeRepo {
            codes: codes_handle.clone(),
        },
    };
    complete
        .execute(CompleteResetInput {
            claims,
            code_id,
            code,
            new_password: "NewSecret1".to_owned(),
        })
        .await
        .unwrap();

    // Old password no longer logs in; the new one does.
    let login = LoginUseCase {
        users,
        codes: MockCodeRepo::empty(),
        mailer: Mailer::Log,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        two_factor: false,
    };
    let old = login
        .execute(LoginInput {
            email: user.email.clone(),
            password: "OldSecret1".to_owned(),
        })
        .await;
    assert!(
        matches!(old, Err(AuthServiceError::InvalidCredentials)),
        "old password must be rejected after reset, got {old:?}"
    );
    login
        .execute(LoginInput {
            email: user.email.clone(),
            password: "NewSecret1".to_owned(),
        })
        .await
        .expect("new password must log in");
}

#[tokio::test]
async fn should_keep_password_when_code_is_wrong() {
    let user = test_user("OldSecret1");
    let users = MockUserRepo::new(vec![user.clone()]);
    let users_handle = users.users_handle();
    let codes = MockCodeRepo::empty();
    let codes_handle = codes.codes_handle();

    let request = RequestResetUseCase {
        users,
        codes: MockCodeRepo {
            codes: codes_handle.clone(),
        },
        mailer: Mailer::Log,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let (verification_token, code_id) = request.execute(&user.email).await.unwrap().unwrap();
    let claims = validate_verification_token(&verification_token, TEST_JWT_SECRET).unwrap();

    let stored_code = codes_handle.lock().unwrap()[0].code.clone();
    let wrong = if stored_code == "111111" { "222222" } else { "111111" };

    let complete = CompleteResetUseCase {
        users: MockUserRepo {
            users: users_handle.clone(),
        },
        codes,
    };
    let result = complete
        .execute(CompleteResetInput {
            claims,
            code_id,
            code: wrong.to_owned(),
            new_password: "NewSecret1".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidCode)),
        "expected InvalidCode, got {result:?}"
    );
    let users = users_handle.lock().unwrap();
    assert!(
        kataforge_auth::password::verify_password("OldSecret1", &users[0].password_hash).unwrap()
    );
}
