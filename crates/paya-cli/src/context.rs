//! Shared state for every command: configuration, the durable store and the
//! session manager built on top of it.

use paya_client::{ApiError, GuardError, MerchantClient, PartnerClient, Session, SessionManager};
use paya_core::{AppConfig, KeyValueStore};
use paya_onboarding::OnboardingError;

const LOGIN_HINT: &str = "run `paya-cli auth login` to sign in";

pub(crate) struct AppContext {
    pub(crate) config: AppConfig,
    pub(crate) sessions: SessionManager,
}

impl AppContext {
    pub(crate) fn new(config: AppConfig) -> anyhow::Result<Self> {
        let store = KeyValueStore::open(&config.state_dir);
        let client = MerchantClient::from_config(&config)?;
        Ok(Self {
            sessions: SessionManager::new(client, store),
            config,
        })
    }

    pub(crate) fn store(&self) -> &KeyValueStore {
        self.sessions.store()
    }

    /// Resumes the stored session, failing with a login hint when there is
    /// none or the server no longer accepts it.
    pub(crate) async fn require_session(&self) -> anyhow::Result<Session> {
        match self.sessions.resume().await? {
            Some(session) => Ok(session),
            None => anyhow::bail!("not signed in; {LOGIN_HINT}"),
        }
    }

    /// Partner API client, when the partner API is configured.
    pub(crate) fn partner_client(&self) -> anyhow::Result<Option<PartnerClient>> {
        self.config
            .partner
            .as_ref()
            .map(|partner| {
                PartnerClient::from_config(
                    partner,
                    self.config.request_timeout_secs,
                    &self.config.user_agent,
                )
            })
            .transpose()
            .map_err(anyhow::Error::from)
    }

    /// Applies the global 401 rule to an API result.
    pub(crate) fn guard<T>(&self, result: Result<T, ApiError>) -> anyhow::Result<T> {
        match self.sessions.guard(result) {
            Ok(value) => Ok(value),
            Err(GuardError::Redirect(event)) => {
                anyhow::bail!("session expired; redirected to {}. {LOGIN_HINT}", event.location())
            }
            Err(GuardError::Api(e)) => Err(e.into()),
        }
    }

    /// Same as [`AppContext::guard`] for wizard results.
    pub(crate) fn guard_onboarding<T>(
        &self,
        result: Result<T, OnboardingError>,
    ) -> anyhow::Result<T> {
        match result {
            Err(OnboardingError::Api(e)) if e.is_unauthorized() => self.guard(Err(e)),
            other => other.map_err(anyhow::Error::from),
        }
    }
}

/// Format an optional value for display, returning `"\u{2014}"` when `None`.
pub(crate) fn or_dash<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "\u{2014}".to_string(), |v| v.to_string())
}

/// Truncate `text` to `max` characters for table cells.
pub(crate) fn clip(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}
