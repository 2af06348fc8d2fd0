//! Session cookie configuration.
//!
//! Reads the `SESSION_*` variables through [`mockable::Env`] so parsing is
//! testable without touching the process environment. Debug builds fall back
//! to defaults with a warning; release builds require every toggle.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
const DEFAULT_TTL_HOURS: i64 = 2;
const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const TTL_HOURS_ENV: &str = "SESSION_TTL_HOURS";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Strictness applied while reading session toggles.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Missing or invalid toggles fall back to defaults with a warning.
    Debug,
    /// Missing or invalid toggles are startup errors.
    Release,
}

impl BuildMode {
    /// Mode matching `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated session cookie settings.
pub struct SessionSettings {
    /// Signing and encryption key for the private cookie.
    pub key: Key,
    /// Whether the cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
    /// `SameSite` policy.
    pub same_site: SameSite,
    /// Lifetime of a persistent session, in hours.
    pub ttl_hours: i64,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A required variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv {
        /// Variable name.
        name: &'static str,
    },
    /// A variable holds an unparseable value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
        /// Accepted shape.
        expected: &'static str,
    },
    /// The key file could not be read.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        /// Key file location.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The key file is shorter than release builds accept.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        /// Key file location.
        path: PathBuf,
        /// Bytes read.
        length: usize,
        /// Minimum accepted length.
        min_len: usize,
    },
    /// `SameSite=None` without `Secure` in a release build.
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Ephemeral keys requested in a release build.
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// One `SESSION_*` toggle with its debug fallback.
struct Toggle<T> {
    name: &'static str,
    expected: &'static str,
    fallback: T,
}

impl<T> Toggle<T> {
    fn read<E: Env>(
        self,
        env: &E,
        mode: BuildMode,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<T, SessionConfigError> {
        let Some(raw) = env.string(self.name) else {
            if mode.is_debug() {
                warn!(name = self.name, "session toggle not set; using default");
                return Ok(self.fallback);
            }
            return Err(SessionConfigError::MissingEnv { name: self.name });
        };
        match parse(raw.trim()) {
            Some(value) => Ok(value),
            None if mode.is_debug() => {
                warn!(name = self.name, value = %raw, "invalid session toggle; using default");
                Ok(self.fallback)
            }
            None => Err(SessionConfigError::InvalidEnv {
                name: self.name,
                value: raw,
                expected: self.expected,
            }),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn parse_same_site(value: &str) -> Option<SameSite> {
    match value.to_ascii_lowercase().as_str() {
        "lax" => Some(SameSite::Lax),
        "strict" => Some(SameSite::Strict),
        "none" => Some(SameSite::None),
        _ => None,
    }
}

fn parse_ttl(value: &str) -> Option<i64> {
    value.parse::<i64>().ok().filter(|hours| *hours > 0)
}

/// Build session settings from the environment.
///
/// `SESSION_TTL_HOURS` is optional in both modes and defaults to two hours.
///
/// # Examples
///
/// ```rust
/// use ireal_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|_| None);
/// let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");
/// assert!(settings.cookie_secure);
/// assert_eq!(settings.ttl_hours, 2);
/// ```
///
/// # Errors
/// Returns [`SessionConfigError`] when a release build is missing a toggle,
/// a toggle is invalid in release, or the key file is unusable.
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = Toggle {
        name: COOKIE_SECURE_ENV,
        expected: BOOL_EXPECTED,
        fallback: true,
    }
    .read(env, mode, parse_bool)?;

    let same_site = Toggle {
        name: SAMESITE_ENV,
        expected: SAMESITE_EXPECTED,
        fallback: SameSite::Lax,
    }
    .read(env, mode, parse_same_site)?;
    if same_site == SameSite::None && !cookie_secure {
        if mode.is_debug() {
            warn!("SESSION_SAMESITE=None without a secure cookie; browsers may reject it");
        } else {
            return Err(SessionConfigError::InsecureSameSiteNone);
        }
    }

    let allow_ephemeral = Toggle {
        name: ALLOW_EPHEMERAL_ENV,
        expected: BOOL_EXPECTED,
        fallback: false,
    }
    .read(env, mode, parse_bool)?;
    if allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }

    let ttl_hours = match env.string(TTL_HOURS_ENV) {
        None => DEFAULT_TTL_HOURS,
        Some(raw) => parse_ttl(raw.trim()).unwrap_or_else(|| {
            warn!(value = %raw, "invalid SESSION_TTL_HOURS; using default");
            DEFAULT_TTL_HOURS
        }),
    };

    let key = session_key(env, mode, allow_ephemeral)?;
    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
        ttl_hours,
    })
}

fn session_key<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned()),
    );
    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(source) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %source,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead { path, source }),
    }
}

#[cfg(test)]
mod tests {
    //! Release strictness and debug fallbacks.

    use super::*;
    use mockable::MockEnv;
    use rstest::rstest;
    use std::collections::HashMap;
    use uuid::Uuid;

    struct TempKeyFile(PathBuf);

    impl TempKeyFile {
        fn new(len: usize) -> Self {
            let path = std::env::temp_dir().join(format!("ireal-session-key-{}", Uuid::new_v4()));
            std::fs::write(&path, vec![b'k'; len]).expect("write key file");
            Self(path)
        }

        fn path(&self) -> String {
            self.0.to_string_lossy().into_owned()
        }
    }

    impl Drop for TempKeyFile {
        fn drop(&mut self) {
            std::fs::remove_file(&self.0).ok();
        }
    }

    fn env_with(vars: &[(&str, &str)]) -> MockEnv {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |key| vars.get(key).cloned());
        env
    }

    fn release_vars(key: &TempKeyFile) -> Vec<(&'static str, String)> {
        vec![
            (KEY_FILE_ENV, key.path()),
            (COOKIE_SECURE_ENV, "1".to_owned()),
            (SAMESITE_ENV, "Strict".to_owned()),
            (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
        ]
    }

    fn env_from(vars: &[(&'static str, String)]) -> MockEnv {
        let borrowed: Vec<(&str, &str)> = vars.iter().map(|(k, v)| (*k, v.as_str())).collect();
        env_with(&borrowed)
    }

    #[rstest]
    fn release_accepts_complete_configuration() {
        let key = TempKeyFile::new(SESSION_KEY_MIN_LEN);
        let settings = session_settings_from_env(&env_from(&release_vars(&key)), BuildMode::Release)
            .expect("valid release config");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Strict);
        assert_eq!(settings.ttl_hours, DEFAULT_TTL_HOURS);
    }

    #[rstest]
    #[case(COOKIE_SECURE_ENV)]
    #[case(SAMESITE_ENV)]
    #[case(ALLOW_EPHEMERAL_ENV)]
    fn release_rejects_missing_toggles(#[case] missing: &'static str) {
        let key = TempKeyFile::new(SESSION_KEY_MIN_LEN);
        let vars: Vec<_> = release_vars(&key)
            .into_iter()
            .filter(|(name, _)| *name != missing)
            .collect();
        let err = session_settings_from_env(&env_from(&vars), BuildMode::Release)
            .err()
            .expect("missing toggle must fail");
        assert!(matches!(err, SessionConfigError::MissingEnv { name } if name == missing));
    }

    #[rstest]
    #[case(COOKIE_SECURE_ENV, "maybe")]
    #[case(SAMESITE_ENV, "sideways")]
    fn release_rejects_invalid_toggles(#[case] name: &'static str, #[case] value: &str) {
        let key = TempKeyFile::new(SESSION_KEY_MIN_LEN);
        let mut vars = release_vars(&key);
        for entry in &mut vars {
            if entry.0 == name {
                entry.1 = value.to_owned();
            }
        }
        let err = session_settings_from_env(&env_from(&vars), BuildMode::Release)
            .err()
            .expect("invalid toggle must fail");
        assert!(matches!(err, SessionConfigError::InvalidEnv { name: n, .. } if n == name));
    }

    #[rstest]
    fn release_rejects_short_key() {
        let key = TempKeyFile::new(SESSION_KEY_MIN_LEN - 1);
        let err = session_settings_from_env(&env_from(&release_vars(&key)), BuildMode::Release)
            .err()
            .expect("short key must fail");
        assert!(matches!(err, SessionConfigError::KeyTooShort { .. }));
    }

    #[rstest]
    fn release_rejects_samesite_none_without_secure() {
        let key = TempKeyFile::new(SESSION_KEY_MIN_LEN);
        let mut vars = release_vars(&key);
        vars[1].1 = "0".to_owned();
        vars[2].1 = "None".to_owned();
        let err = session_settings_from_env(&env_from(&vars), BuildMode::Release)
            .err()
            .expect("insecure None must fail");
        assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
    }

    #[rstest]
    fn release_rejects_ephemeral_keys() {
        let key = TempKeyFile::new(SESSION_KEY_MIN_LEN);
        let mut vars = release_vars(&key);
        vars[3].1 = "1".to_owned();
        let err = session_settings_from_env(&env_from(&vars), BuildMode::Release)
            .err()
            .expect("ephemeral must fail");
        assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
    }

    #[rstest]
    fn debug_tolerates_invalid_values_and_missing_key() {
        let env = env_with(&[
            (KEY_FILE_ENV, "/nonexistent/ireal-session-key"),
            (COOKIE_SECURE_ENV, "perhaps"),
            (SAMESITE_ENV, "weird"),
        ]);
        let settings =
            session_settings_from_env(&env, BuildMode::Debug).expect("debug falls back");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Lax);
    }

    #[rstest]
    #[case("12", 12)]
    #[case("0", DEFAULT_TTL_HOURS)]
    #[case("soon", DEFAULT_TTL_HOURS)]
    fn ttl_is_optional_in_every_mode(#[case] raw: &str, #[case] expected: i64) {
        let key = TempKeyFile::new(SESSION_KEY_MIN_LEN);
        let mut vars = release_vars(&key);
        vars.push((TTL_HOURS_ENV, raw.to_owned()));
        let settings = session_settings_from_env(&env_from(&vars), BuildMode::Release)
            .expect("ttl never fails startup");
        assert_eq!(settings.ttl_hours, expected);
    }
}
