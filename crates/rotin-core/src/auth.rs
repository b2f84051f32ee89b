//! Sign-in session over an external identity provider.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::storage::LocalCache;

/// Popup failures after which the redirect flow is tried instead.
pub const REDIRECT_FALLBACK_CODES: [&str; 4] = [
    "auth/popup-blocked",
    "auth/popup-closed-by-user",
    "auth/cancelled-popup-request",
    "auth/unauthorized-domain",
];

/// The signed-in user as the provider reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// An identity provider offering popup and redirect sign-in.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn current(&self) -> Option<Identity>;

    async fn sign_in_popup(&self) -> Result<Identity, AuthError>;

    /// Starts a redirect; its result is not observable by the caller.
    async fn sign_in_redirect(&self) -> Result<(), AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// Provider for a device that never signs in. Signing out always works.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalOnlyProvider;

#[async_trait]
impl AuthProvider for LocalOnlyProvider {
    async fn current(&self) -> Option<Identity> {
        None
    }

    async fn sign_in_popup(&self) -> Result<Identity, AuthError> {
        Err(AuthError::new("auth/operation-not-supported-in-this-environment"))
    }

    async fn sign_in_redirect(&self) -> Result<(), AuthError> {
        Err(AuthError::new("auth/operation-not-supported-in-this-environment"))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        Ok(())
    }
}

/// Outcome of [`AuthSession::sign_in`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignIn {
    Completed(Identity),
    /// The popup failed and a redirect was started instead.
    Redirected,
}

pub struct AuthSession {
    provider: Arc<dyn AuthProvider>,
    cache: Option<Arc<LocalCache>>,
    user: Mutex<Option<Identity>>,
}

impl AuthSession {
    pub fn new(provider: Arc<dyn AuthProvider>, cache: Option<Arc<LocalCache>>) -> Self {
        Self {
            provider,
            cache,
            user: Mutex::new(None),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<Identity>> {
        match self.user.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Pick up a sign-in that survived a restart (or a redirect).
    pub async fn restore(&self) -> Option<Identity> {
        let current = self.provider.current().await;
        *self.slot() = current.clone();
        current
    }

    pub fn user(&self) -> Option<Identity> {
        self.slot().clone()
    }

    /// Sign in with the popup flow, falling back to a redirect when the popup
    /// cannot be shown.
    ///
    /// # Errors
    /// Popup errors outside [`REDIRECT_FALLBACK_CODES`], and redirect errors.
    pub async fn sign_in(&self) -> Result<SignIn, AuthError> {
        let err = match self.provider.sign_in_popup().await {
            Ok(identity) => {
                tracing::info!(email = ?identity.email, "signed in");
                *self.slot() = Some(identity.clone());
                return Ok(SignIn::Completed(identity));
            }
            Err(err) => err,
        };

        tracing::warn!(error = %err, "popup sign-in failed");
        if !REDIRECT_FALLBACK_CODES.contains(&err.code.as_str()) {
            return Err(err);
        }

        match self.provider.sign_in_redirect().await {
            Ok(()) => Ok(SignIn::Redirected),
            Err(redirect_err) => {
                tracing::warn!(error = %redirect_err, "redirect sign-in failed");
                Err(redirect_err)
            }
        }
    }

    /// Sign out and drop everything cached locally. Returns whether the
    /// provider accepted the sign-out; on refusal the session and cache are
    /// left as they were.
    pub async fn sign_out(&self) -> bool {
        if let Err(e) = self.provider.sign_out().await {
            tracing::warn!(error = %e, "sign-out failed");
            return false;
        }
        *self.slot() = None;
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.clear() {
                tracing::warn!(error = %e, "failed to clear local cache");
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::storage::keys;

    struct FakeProvider {
        popup: Result<Identity, AuthError>,
        redirect: Result<(), AuthError>,
        sign_out: Result<(), AuthError>,
        redirects: AtomicU32,
    }

    impl FakeProvider {
        fn popup_fails(code: &str) -> Self {
            Self {
                popup: Err(AuthError::new(code)),
                redirect: Ok(()),
                sign_out: Ok(()),
                redirects: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl AuthProvider for FakeProvider {
        async fn current(&self) -> Option<Identity> {
            self.popup.clone().ok()
        }

        async fn sign_in_popup(&self) -> Result<Identity, AuthError> {
            self.popup.clone()
        }

        async fn sign_in_redirect(&self) -> Result<(), AuthError> {
            self.redirects.fetch_add(1, Ordering::SeqCst);
            self.redirect.clone()
        }

        async fn sign_out(&self) -> Result<(), AuthError> {
            self.sign_out.clone()
        }
    }

    fn identity() -> Identity {
        Identity {
            display_name: Some("Ana".into()),
            email: Some("ana@example.com".into()),
            photo_url: None,
        }
    }

    #[tokio::test]
    async fn popup_success_sets_user() {
        let provider = Arc::new(FakeProvider {
            popup: Ok(identity()),
            ..FakeProvider::popup_fails("unused")
        });
        let session = AuthSession::new(provider.clone(), None);
        assert_eq!(session.sign_in().await.unwrap(), SignIn::Completed(identity()));
        assert_eq!(session.user(), Some(identity()));
        assert_eq!(provider.redirects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn blocked_popup_falls_back_to_redirect() {
        for code in REDIRECT_FALLBACK_CODES {
            let provider = Arc::new(FakeProvider::popup_fails(code));
            let session = AuthSession::new(provider.clone(), None);
            assert_eq!(session.sign_in().await.unwrap(), SignIn::Redirected);
            assert_eq!(provider.redirects.load(Ordering::SeqCst), 1);
            assert!(session.user().is_none());
        }
    }

    #[tokio::test]
    async fn other_popup_errors_surface() {
        let provider = Arc::new(FakeProvider::popup_fails("auth/network-request-failed"));
        let session = AuthSession::new(provider.clone(), None);
        let err = session.sign_in().await.unwrap_err();
        assert_eq!(err.code, "auth/network-request-failed");
        assert_eq!(provider.redirects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_redirect_surfaces_its_error() {
        let provider = Arc::new(FakeProvider {
            redirect: Err(AuthError::new("auth/internal-error")),
            ..FakeProvider::popup_fails("auth/popup-blocked")
        });
        let session = AuthSession::new(provider, None);
        assert_eq!(session.sign_in().await.unwrap_err().code, "auth/internal-error");
    }

    #[tokio::test]
    async fn sign_out_clears_cache() {
        let cache = Arc::new(LocalCache::open_memory().unwrap());
        cache.set(keys::TASKS, "[]").unwrap();
        let provider = Arc::new(FakeProvider {
            popup: Ok(identity()),
            ..FakeProvider::popup_fails("unused")
        });
        let session = AuthSession::new(provider, Some(cache.clone()));
        session.restore().await;
        assert!(session.sign_out().await);
        assert!(session.user().is_none());
        assert!(cache.get(keys::TASKS).unwrap().is_none());
    }

    #[tokio::test]
    async fn refused_sign_out_is_not_fatal() {
        let cache = Arc::new(LocalCache::open_memory().unwrap());
        cache.set(keys::TASKS, "[]").unwrap();
        let provider = Arc::new(FakeProvider {
            popup: Ok(identity()),
            sign_out: Err(AuthError::new("auth/network-request-failed")),
            ..FakeProvider::popup_fails("unused")
        });
        let session = AuthSession::new(provider, Some(cache.clone()));
        session.restore().await;
        assert!(!session.sign_out().await);
        assert_eq!(session.user(), Some(identity()));
        assert!(cache.get(keys::TASKS).unwrap().is_some());
    }

    #[tokio::test]
    async fn local_only_provider_signs_out() {
        let session = AuthSession::new(Arc::new(LocalOnlyProvider), None);
        assert!(session.restore().await.is_none());
        assert!(session.sign_in().await.is_err());
        assert!(session.sign_out().await);
    }
}
