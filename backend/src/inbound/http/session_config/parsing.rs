//! Readers for the session cookie toggles.
//!
//! Debug builds fall back to the secure value with a warning; release builds
//! turn every missing or unreadable toggle into a [`SessionConfigError`].

use actix_web::cookie::SameSite;
use mockable::Env;
use tracing::warn;

use super::{ALLOW_EPHEMERAL_ENV, BuildMode, COOKIE_SECURE_ENV, SAMESITE_ENV, SessionConfigError};

const FLAG_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Boolean switches controlling the session cookie.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Toggle {
    /// `SESSION_COOKIE_SECURE`, on unless disabled.
    CookieSecure,
    /// `SESSION_ALLOW_EPHEMERAL`, only ever honoured in debug builds.
    AllowEphemeral,
}

impl Toggle {
    const fn name(self) -> &'static str {
        match self {
            Self::CookieSecure => COOKIE_SECURE_ENV,
            Self::AllowEphemeral => ALLOW_EPHEMERAL_ENV,
        }
    }

    const fn fallback(self) -> bool {
        matches!(self, Self::CookieSecure)
    }

    fn accept(self, flag: bool, mode: BuildMode) -> Result<bool, SessionConfigError> {
        match self {
            Self::AllowEphemeral if flag && !mode.is_debug() => {
                Err(SessionConfigError::EphemeralNotAllowed)
            }
            _ => Ok(flag),
        }
    }
}

/// Read `toggle` from `env`.
pub(super) fn read_toggle<E: Env>(
    env: &E,
    mode: BuildMode,
    toggle: Toggle,
) -> Result<bool, SessionConfigError> {
    let name = toggle.name();
    let fallback_value = toggle.fallback();
    let Some(raw) = env.string(name) else {
        return fall_back(
            mode,
            fallback_value,
            SessionConfigError::MissingEnv { name },
            || warn!(toggle = name, fallback = fallback_value, "session toggle not set"),
        );
    };
    match parse_flag(&raw) {
        Some(flag) => toggle.accept(flag, mode),
        None => fall_back(
            mode,
            fallback_value,
            SessionConfigError::InvalidEnv {
                name,
                value: raw.clone(),
                expected: FLAG_EXPECTED,
            },
            || warn!(toggle = name, value = %raw, fallback = fallback_value, "unreadable session toggle"),
        ),
    }
}

/// Read the `SameSite` policy; `None` additionally needs a secure cookie.
pub(super) fn read_same_site<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let Some(raw) = env.string(SAMESITE_ENV) else {
        return fall_back(
            mode,
            SameSite::Strict,
            SessionConfigError::MissingEnv { name: SAMESITE_ENV },
            || warn!("SESSION_SAMESITE not set; using Strict"),
        );
    };
    match parse_same_site(&raw) {
        Some(SameSite::None) if !cookie_secure => fall_back(
            mode,
            SameSite::None,
            SessionConfigError::InsecureSameSiteNone,
            || warn!("SESSION_SAMESITE=None without a secure cookie; browsers may drop it"),
        ),
        Some(policy) => Ok(policy),
        None => fall_back(
            mode,
            SameSite::Strict,
            SessionConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value: raw.clone(),
                expected: SAMESITE_EXPECTED,
            },
            || warn!(value = %raw, "unreadable SESSION_SAMESITE; using Strict"),
        ),
    }
}

/// `Ok(value)` after `warn` in debug builds, `Err(error)` in release builds.
fn fall_back<T>(
    mode: BuildMode,
    value: T,
    error: SessionConfigError,
    log: impl FnOnce(),
) -> Result<T, SessionConfigError> {
    if mode.is_debug() {
        log();
        Ok(value)
    } else {
        Err(error)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn parse_same_site(raw: &str) -> Option<SameSite> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "strict" => Some(SameSite::Strict),
        "lax" => Some(SameSite::Lax),
        "none" => Some(SameSite::None),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", Some(true))]
    #[case(" Yes ", Some(true))]
    #[case("n", Some(false))]
    #[case("FALSE", Some(false))]
    #[case("maybe", None)]
    #[case("", None)]
    fn flags_accept_common_spellings(#[case] raw: &str, #[case] expected: Option<bool>) {
        assert_eq!(parse_flag(raw), expected);
    }

    #[rstest]
    #[case(Toggle::CookieSecure, true)]
    #[case(Toggle::AllowEphemeral, false)]
    fn toggles_fall_back_to_the_secure_value(#[case] toggle: Toggle, #[case] expected: bool) {
        assert_eq!(toggle.fallback(), expected);
    }

    #[rstest]
    fn ephemeral_keys_are_refused_only_in_release() {
        assert!(Toggle::AllowEphemeral.accept(true, BuildMode::Debug).is_ok());
        assert!(matches!(
            Toggle::AllowEphemeral.accept(true, BuildMode::Release),
            Err(SessionConfigError::EphemeralNotAllowed)
        ));
        assert!(Toggle::CookieSecure.accept(false, BuildMode::Release).is_ok());
    }
}
