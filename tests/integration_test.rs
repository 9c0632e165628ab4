// End-to-end sign-in flows against mock collaborators.
// Requires the `testing` feature for access to signon::testing.

use signon::testing::builders::{fake_id_token, AppleAuthorizationBuilder};
use signon::testing::constants::{TEST_EMAIL, TEST_PASSWORD, TEST_SESSION_TOKEN};
use signon::testing::mocks::{MockAppleSignIn, MockGoogleSignIn, MockIdentityBackend};
use signon::{
    AuthError, ExchangePayload, GoogleTokens, IdentityBackend, ProviderError, SessionTokenCache,
    SignInOrchestrator, TokenKind,
};
use std::sync::Arc;
use std::time::Duration;

/// Wait out the fire-and-forget refresh window: the token cache is
/// eventually consistent with a successful sign-in, not immediately.
async fn wait_for_token(cache: &SessionTokenCache) -> String {
    for _ in 0..100 {
        if let Some(token) = cache.current() {
            return token.value.clone();
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("session token cache never picked up the refreshed token");
}

#[tokio::test]
async fn email_sign_in_produces_normalized_user_and_refreshes_token_cache() {
    let backend = Arc::new(
        MockIdentityBackend::new()
            .with_user_id("u1")
            .with_token(TEST_SESSION_TOKEN),
    );
    let orchestrator = SignInOrchestrator::new(Arc::clone(&backend) as Arc<dyn IdentityBackend>);

    let user = orchestrator
        .sign_in_with_email("a@b.com", "pw")
        .await
        .unwrap();
    assert_eq!(user.id, "u1");
    assert_eq!(user.email.as_deref(), Some("a@b.com"));
    assert!(user.photo_url.is_none());

    // The sign-in returned before the refresh necessarily landed.
    let token = wait_for_token(&orchestrator.session_tokens()).await;
    assert_eq!(token, TEST_SESSION_TOKEN);
}

#[tokio::test]
async fn apple_prompt_error_fails_without_touching_the_backend() {
    let backend = Arc::new(MockIdentityBackend::new());
    let orchestrator = SignInOrchestrator::new(Arc::clone(&backend) as Arc<dyn IdentityBackend>);
    let apple = MockAppleSignIn::failing(ProviderError::Cancelled);

    let result = orchestrator.sign_in_with_apple(&apple).await;
    assert!(matches!(
        result,
        Err(AuthError::Provider(ProviderError::Cancelled))
    ));
    assert_eq!(backend.backend_calls(), 0);
    assert!(orchestrator.session_tokens().current().is_none());
}

#[tokio::test]
async fn concurrent_email_and_anonymous_sign_ins_are_independent() {
    let backend = Arc::new(MockIdentityBackend::new().with_user_id("u1"));
    let orchestrator = Arc::new(SignInOrchestrator::new(Arc::clone(&backend) as Arc<dyn IdentityBackend>));

    let (email_result, anonymous_result) = tokio::join!(
        orchestrator.sign_in_with_email(TEST_EMAIL, TEST_PASSWORD),
        orchestrator.sign_in_anonymously(),
    );

    let email_user = email_result.unwrap();
    let anonymous_user = anonymous_result.unwrap();
    assert_eq!(email_user.id, "u1");
    assert_eq!(email_user.email.as_deref(), Some(TEST_EMAIL));
    assert!(anonymous_user.id.starts_with("anon-"));
    assert!(anonymous_user.email.is_none());
    assert_eq!(backend.backend_calls(), 2);
}

#[tokio::test]
async fn apple_sign_in_exchanges_the_raw_nonce_not_the_digest() {
    let backend = Arc::new(MockIdentityBackend::new());
    let orchestrator = SignInOrchestrator::new(Arc::clone(&backend) as Arc<dyn IdentityBackend>);
    let apple = MockAppleSignIn::succeeding(
        AppleAuthorizationBuilder::new()
            .with_identity_token(&fake_id_token("apple-user", Some(TEST_EMAIL)))
            .with_email(TEST_EMAIL)
            .build(),
    );

    let user = orchestrator.sign_in_with_apple(&apple).await.unwrap();
    assert!(user.id.ends_with("@apple.com"));

    let request = apple.last_request().expect("prompt was presented");
    let payload = backend.last_payload().expect("backend saw the exchange");
    let ExchangePayload::Apple {
        id_token,
        raw_nonce,
    } = payload
    else {
        panic!("expected an apple exchange payload");
    };

    assert_eq!(id_token, fake_id_token("apple-user", Some(TEST_EMAIL)));
    // The prompt only ever sees the digest; the backend gets the raw value.
    assert_ne!(raw_nonce, request.nonce_digest);
    assert_eq!(request.nonce_digest.len(), 64);
    assert!(request.nonce_digest.bytes().all(|b| b.is_ascii_hexdigit()));
    assert_eq!(raw_nonce.len(), 32);
}

#[tokio::test]
async fn apple_flow_closing_silently_is_no_response() {
    let backend = Arc::new(MockIdentityBackend::new());
    let orchestrator = SignInOrchestrator::new(Arc::clone(&backend) as Arc<dyn IdentityBackend>);
    let apple = MockAppleSignIn::ignoring();

    let result = orchestrator.sign_in_with_apple(&apple).await;
    assert!(matches!(result, Err(AuthError::NoResponse)));
    assert_eq!(backend.backend_calls(), 0);
}

#[tokio::test]
async fn orphaned_apple_completion_is_dropped_without_panic() {
    let backend = Arc::new(MockIdentityBackend::new());
    let orchestrator = Arc::new(SignInOrchestrator::new(Arc::clone(&backend) as Arc<dyn IdentityBackend>));
    let apple = Arc::new(MockAppleSignIn::stashing());

    let task = {
        let orchestrator = Arc::clone(&orchestrator);
        let apple = Arc::clone(&apple);
        tokio::spawn(async move { orchestrator.sign_in_with_apple(apple.as_ref()).await })
    };

    // Wait until the prompt has been presented, then abandon the attempt.
    for _ in 0..100 {
        if apple.last_request().is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    task.abort();
    assert!(task.await.unwrap_err().is_cancelled());

    // The late completion has no receiver; it must vanish silently.
    let handle = apple.take_handle().expect("handle was stashed");
    handle.succeed(AppleAuthorizationBuilder::new().with_identity_token("late").build());
    assert_eq!(backend.backend_calls(), 0);
}

#[tokio::test]
async fn google_sign_in_exchanges_both_tokens() {
    let backend = Arc::new(MockIdentityBackend::new());
    let orchestrator = SignInOrchestrator::new(Arc::clone(&backend) as Arc<dyn IdentityBackend>);
    let google = MockGoogleSignIn::succeeding(GoogleTokens {
        id_token: Some(fake_id_token("google-user", Some(TEST_EMAIL))),
        access_token: Some("access-token".to_string()),
    });

    let user = orchestrator.sign_in_with_google(&google).await.unwrap();
    assert!(user.id.ends_with("@google.com"));

    let ExchangePayload::Google { access_token, .. } =
        backend.last_payload().expect("backend saw the exchange")
    else {
        panic!("expected a google exchange payload");
    };
    assert_eq!(access_token, "access-token");
}

#[tokio::test]
async fn google_flow_without_access_token_never_reaches_the_backend() {
    let backend = Arc::new(MockIdentityBackend::new());
    let orchestrator = SignInOrchestrator::new(Arc::clone(&backend) as Arc<dyn IdentityBackend>);
    let google = MockGoogleSignIn::succeeding(GoogleTokens {
        id_token: Some("id".to_string()),
        access_token: None,
    });

    let result = orchestrator.sign_in_with_google(&google).await;
    assert!(matches!(
        result,
        Err(AuthError::MissingToken(TokenKind::GoogleAccess))
    ));
    assert_eq!(backend.backend_calls(), 0);
}

#[tokio::test]
async fn sign_out_after_sign_in_clears_session_state() {
    let backend = Arc::new(MockIdentityBackend::new());
    let orchestrator = SignInOrchestrator::new(Arc::clone(&backend) as Arc<dyn IdentityBackend>);

    orchestrator.sign_in_anonymously().await.unwrap();
    wait_for_token(&orchestrator.session_tokens()).await;

    orchestrator.sign_out().await.unwrap();
    assert!(orchestrator.session_tokens().current().is_none());
    assert!(orchestrator.current_user().await.is_err());

    // Signing out again is a no-op, not an error.
    orchestrator.sign_out().await.unwrap();
}
