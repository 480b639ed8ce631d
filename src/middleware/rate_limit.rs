use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request},
    http::{header::RETRY_AFTER, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::auth::AuthUser;
use crate::config::{self, ApiConfig};
use crate::error::ApiError;

/// Endpoint class with its own request budget
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RateScope {
    /// login/register/refresh - strictest, brute-force surface
    Auth,
    /// LLM-backed translation creation - pays upstream tokens
    Translate,
    /// Everything else under /api
    General,
}

impl RateScope {
    fn limit(&self, api: &ApiConfig) -> u32 {
        match self {
            RateScope::Auth => api.auth_rate_limit_requests,
            RateScope::Translate => api.translate_rate_limit_requests,
            RateScope::General => api.rate_limit_requests,
        }
    }
}

struct Window {
    count: u32,
    started: Instant,
}

/// Fixed-window request counters, process-wide.
/// Counters live in memory only; restarts clear them.
pub struct RateLimiter {
    windows: Mutex<HashMap<(RateScope, String), Window>>,
}

/// Opportunistic pruning kicks in once the map grows past this
const MAX_TRACKED_KEYS: usize = 10_000;

impl RateLimiter {
    pub fn instance() -> &'static RateLimiter {
        use std::sync::OnceLock;
        static INSTANCE: OnceLock<RateLimiter> = OnceLock::new();
        INSTANCE.get_or_init(|| RateLimiter {
            windows: Mutex::new(HashMap::new()),
        })
    }

    /// Count one request against the caller's window.
    /// Returns Err(retry_after_secs) when the budget is exhausted.
    pub fn check(&self, scope: RateScope, key: &str) -> Result<(), u64> {
        let api = &config::config().api;
        if !api.enable_rate_limiting {
            return Ok(());
        }

        let window = Duration::from_secs(api.rate_limit_window_secs.max(1));
        self.check_at(scope, key, Instant::now(), scope.limit(api), window)
    }

    fn check_at(
        &self,
        scope: RateScope,
        key: &str,
        now: Instant,
        limit: u32,
        window: Duration,
    ) -> Result<(), u64> {
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());

        if windows.len() > MAX_TRACKED_KEYS {
            windows.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = windows
            .entry((scope, key.to_string()))
            .or_insert(Window { count: 0, started: now });

        if now.duration_since(entry.started) >= window {
            entry.count = 0;
            entry.started = now;
        }

        entry.count += 1;

        if entry.count > limit {
            let remaining = window.saturating_sub(now.duration_since(entry.started));
            Err(remaining.as_secs().max(1))
        } else {
            Ok(())
        }
    }
}

/// Authenticated requests are keyed per user, anonymous ones per client IP
fn client_key(request: &Request) -> String {
    if let Some(user) = request.extensions().get::<AuthUser>() {
        return format!("user:{}", user.user_id);
    }

    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return format!("ip:{}", addr.ip());
    }

    "anonymous".to_string()
}

async fn enforce(scope: RateScope, request: Request, next: Next) -> Result<Response, Response> {
    let key = client_key(&request);

    match RateLimiter::instance().check(scope, &key) {
        Ok(()) => Ok(next.run(request).await),
        Err(retry_after_secs) => {
            tracing::warn!("Rate limit exceeded: {:?} by {}", scope, key);

            let mut response =
                ApiError::too_many_requests("Too many requests, slow down").into_response();
            if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                response.headers_mut().insert(RETRY_AFTER, value);
            }
            Err(response)
        }
    }
}

pub async fn auth_rate_limit(request: Request, next: Next) -> Result<Response, Response> {
    enforce(RateScope::Auth, request, next).await
}

pub async fn translate_rate_limit(request: Request, next: Next) -> Result<Response, Response> {
    enforce(RateScope::Translate, request, next).await
}

pub async fn general_rate_limit(request: Request, next: Next) -> Result<Response, Response> {
    enforce(RateScope::General, request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter() -> RateLimiter {
        RateLimiter {
            windows: Mutex::new(HashMap::new()),
        }
    }

    const WINDOW: Duration = Duration::from_secs(60);

    #[test]
    fn allows_up_to_the_limit() {
        let limiter = limiter();
        let now = Instant::now();

        for _ in 0..5 {
            assert!(limiter.check_at(RateScope::Auth, "ip:1.2.3.4", now, 5, WINDOW).is_ok());
        }
        assert!(limiter.check_at(RateScope::Auth, "ip:1.2.3.4", now, 5, WINDOW).is_err());
    }

    #[test]
    fn counter_resets_after_the_window() {
        let limiter = limiter();
        let now = Instant::now();

        for _ in 0..3 {
            let _ = limiter.check_at(RateScope::Auth, "ip:1.2.3.4", now, 2, WINDOW);
        }
        assert!(limiter.check_at(RateScope::Auth, "ip:1.2.3.4", now, 2, WINDOW).is_err());

        let later = now + WINDOW;
        assert!(limiter.check_at(RateScope::Auth, "ip:1.2.3.4", later, 2, WINDOW).is_ok());
    }

    #[test]
    fn keys_are_independent() {
        let limiter = limiter();
        let now = Instant::now();

        assert!(limiter.check_at(RateScope::Auth, "ip:1.1.1.1", now, 1, WINDOW).is_ok());
        assert!(limiter.check_at(RateScope::Auth, "ip:1.1.1.1", now, 1, WINDOW).is_err());
        assert!(limiter.check_at(RateScope::Auth, "ip:2.2.2.2", now, 1, WINDOW).is_ok());
    }

    #[test]
    fn scopes_are_independent() {
        let limiter = limiter();
        let now = Instant::now();

        assert!(limiter.check_at(RateScope::Auth, "user:a", now, 1, WINDOW).is_ok());
        assert!(limiter.check_at(RateScope::Auth, "user:a", now, 1, WINDOW).is_err());
        assert!(limiter.check_at(RateScope::General, "user:a", now, 1, WINDOW).is_ok());
    }

    #[test]
    fn retry_after_is_within_the_window() {
        let limiter = limiter();
        let now = Instant::now();

        let _ = limiter.check_at(RateScope::Translate, "user:a", now, 1, WINDOW);
        let retry_after = limiter
            .check_at(RateScope::Translate, "user:a", now, 1, WINDOW)
            .unwrap_err();
        assert!(retry_after >= 1 && retry_after <= WINDOW.as_secs());
    }
}
