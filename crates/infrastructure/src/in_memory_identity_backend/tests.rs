use std::sync::Mutex;

use chrono::{DateTime, Utc};
use gatehouse_domain::RegistrationForm;

use super::*;

struct ReversingHasher;

impl PasswordHasher for ReversingHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(password.chars().rev().collect())
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(password.chars().rev().eq(hash.chars()))
    }
}

struct TestClock {
    now: Mutex<DateTime<Utc>>,
}

impl TestClock {
    fn advance(&self, delta: TimeDelta) {
        if let Ok(mut now) = self.now.lock() {
            *now += delta;
        }
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.lock().map(|now| *now).unwrap_or_else(|_| Utc::now())
    }
}

fn backend() -> (InMemoryIdentityBackend, Arc<TestClock>) {
    let clock = Arc::new(TestClock {
        now: Mutex::new(Utc::now()),
    });
    let backend = InMemoryIdentityBackend::new(Arc::new(ReversingHasher), clock.clone());
    (backend, clock)
}

fn backend_error(result: AppResult<impl std::fmt::Debug>) -> BackendError {
    match result {
        Err(AppError::Backend(error)) => error,
        other => panic!("expected backend error, got {other:?}"),
    }
}

#[tokio::test]
async fn duplicate_email_is_rejected_case_insensitively() -> AppResult<()> {
    let (backend, _) = backend();
    backend.create_account("Ada@Example.com", "Secret_pass1").await?;

    assert_eq!(
        backend_error(backend.create_account("ada@example.com", "Other_pass1").await),
        BackendError::EmailInUse
    );
    Ok(())
}

#[tokio::test]
async fn short_password_is_weak() {
    let (backend, _) = backend();

    assert_eq!(
        backend_error(backend.create_account("ada@example.com", "abc12").await),
        BackendError::WeakPassword
    );
}

#[tokio::test]
async fn sign_in_opens_a_resolvable_session() -> AppResult<()> {
    let (backend, _) = backend();
    let account_id = backend.create_account("ada@example.com", "Secret_pass1").await?;

    let session = backend.sign_in("ADA@example.com", "Secret_pass1").await?;

    assert_eq!(session.account_id(), account_id);
    assert_eq!(backend.session(session.token()).await?, Some(session));
    Ok(())
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() -> AppResult<()> {
    let (backend, _) = backend();
    backend.create_account("ada@example.com", "Secret_pass1").await?;

    assert_eq!(
        backend_error(backend.sign_in("ada@example.com", "Wrong_pass1").await),
        BackendError::InvalidCredentials
    );
    assert_eq!(
        backend_error(backend.sign_in("nobody@example.com", "Secret_pass1").await),
        BackendError::InvalidCredentials
    );
    Ok(())
}

#[tokio::test]
async fn sign_out_drops_the_session() -> AppResult<()> {
    let (backend, _) = backend();
    backend.create_account("ada@example.com", "Secret_pass1").await?;
    let session = backend.sign_in("ada@example.com", "Secret_pass1").await?;

    backend.sign_out(&session).await?;
    backend.sign_out(&session).await?;

    assert_eq!(backend.session(session.token()).await?, None);
    assert_eq!(backend.session_count().await, 0);
    Ok(())
}

#[tokio::test]
async fn password_reset_never_reveals_unknown_addresses() -> AppResult<()> {
    let (backend, _) = backend();
    backend.create_account("ada@example.com", "Secret_pass1").await?;

    backend.send_password_reset_email("ada@example.com").await?;
    backend.send_password_reset_email("nobody@example.com").await
}

#[tokio::test]
async fn updated_password_replaces_the_old_one() -> AppResult<()> {
    let (backend, _) = backend();
    backend.create_account("ada@example.com", "Secret_pass1").await?;
    let session = backend.sign_in("ada@example.com", "Secret_pass1").await?;

    backend.update_password(&session, "Fresh_pass2").await?;

    assert!(backend.sign_in("ada@example.com", "Fresh_pass2").await.is_ok());
    assert_eq!(
        backend_error(backend.sign_in("ada@example.com", "Secret_pass1").await),
        BackendError::InvalidCredentials
    );
    Ok(())
}

#[tokio::test]
async fn stale_session_requires_recent_login() -> AppResult<()> {
    let (backend, clock) = backend();
    backend.create_account("ada@example.com", "Secret_pass1").await?;
    let session = backend.sign_in("ada@example.com", "Secret_pass1").await?;

    clock.advance(TimeDelta::minutes(5) + TimeDelta::seconds(1));

    assert_eq!(
        backend_error(backend.update_password(&session, "Fresh_pass2").await),
        BackendError::RequiresRecentLogin
    );
    Ok(())
}

#[tokio::test]
async fn recent_login_window_is_configurable() -> AppResult<()> {
    let (backend, clock) = backend();
    let backend = backend.with_recent_login_window(TimeDelta::minutes(30));
    backend.create_account("ada@example.com", "Secret_pass1").await?;
    let session = backend.sign_in("ada@example.com", "Secret_pass1").await?;

    clock.advance(TimeDelta::minutes(10));

    backend.update_password(&session, "Fresh_pass2").await
}

#[tokio::test]
async fn update_after_sign_out_is_unauthorized() -> AppResult<()> {
    let (backend, _) = backend();
    backend.create_account("ada@example.com", "Secret_pass1").await?;
    let session = backend.sign_in("ada@example.com", "Secret_pass1").await?;
    backend.sign_out(&session).await?;

    assert!(matches!(
        backend.update_password(&session, "Fresh_pass2").await,
        Err(AppError::Unauthorized(_))
    ));
    Ok(())
}

#[tokio::test]
async fn profiles_are_stored_and_searchable() -> AppResult<()> {
    let (backend, _) = backend();
    let account_id = backend.create_account("ada@example.com", "Secret_pass1").await?;
    let form = RegistrationForm::new(
        "Ada",
        "Lovelace",
        "Ada_L",
        "ada@example.com",
        "Secret_pass1",
        "Secret_pass1",
    );
    let profile = UserProfile::from_registration(&form, Utc::now())?;

    backend.write_profile(account_id, &profile).await?;

    assert_eq!(backend.read_profile(account_id).await?, Some(profile));
    assert!(
        backend
            .find_profile_by_field(ProfileField::Username, "ada_l")
            .await?
    );
    assert!(
        !backend
            .find_profile_by_field(ProfileField::Username, "grace")
            .await?
    );
    assert_eq!(backend.read_profile(AccountId::new()).await?, None);
    Ok(())
}

#[tokio::test]
async fn sessions_expire_after_their_lifetime() -> AppResult<()> {
    let (backend, clock) = backend();
    let backend = backend.with_session_lifetime(TimeDelta::hours(1));
    backend.create_account("ada@example.com", "Secret_pass1").await?;
    let session = backend.sign_in("ada@example.com", "Secret_pass1").await?;

    clock.advance(TimeDelta::minutes(59));
    assert!(backend.session(session.token()).await?.is_some());

    clock.advance(TimeDelta::minutes(1));
    assert_eq!(backend.session(session.token()).await?, None);
    assert!(matches!(
        backend.update_password(&session, "Fresh_pass2").await,
        Err(AppError::Unauthorized(_))
    ));
    Ok(())
}

#[tokio::test]
async fn abandoned_sessions_are_pruned_on_sign_in() -> AppResult<()> {
    let (backend, clock) = backend();
    let backend = backend.with_session_lifetime(TimeDelta::hours(1));
    backend.create_account("ada@example.com", "Secret_pass1").await?;
    for _ in 0..3 {
        backend.sign_in("ada@example.com", "Secret_pass1").await?;
    }
    assert_eq!(backend.session_count().await, 3);

    clock.advance(TimeDelta::hours(2));
    backend.sign_in("ada@example.com", "Secret_pass1").await?;

    assert_eq!(backend.session_count().await, 1);
    Ok(())
}
