use laiska_auth::Salting;
use laiska_core::*;
use std::time::Duration;

/// Everything the service needs from its environment, read once at start-up.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_url: String,
    pub jwt_secret: String,
    pub pepper: String,
    pub admin_secret: String,
    pub salting: Salting,
    pub bind: String,
    pub store_timeout: Duration,
    pub log_level: log::LevelFilter,
}

impl Config {
    /// Reads the process environment. Call [`dotenv`] first to pick up `.env`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            var(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| anyhow::anyhow!("{} must be set", key))
        };
        let pepper = required("SALT")?;
        if pepper.len() < MIN_PEPPER_LEN {
            anyhow::bail!("SALT must be at least {} bytes", MIN_PEPPER_LEN);
        }
        Ok(Self {
            db_url: Self::database(&var)?,
            jwt_secret: required("JWT_SECRET")?,
            admin_secret: required("ADMIN_SECRET")?,
            pepper,
            salting: match var("PASSWORD_SALTING") {
                None => Salting::default(),
                Some(mode) => mode.parse().map_err(anyhow::Error::msg)?,
            },
            bind: var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8090".to_string()),
            store_timeout: match var("STORE_TIMEOUT_MS") {
                None => STORE_TIMEOUT,
                Some(ms) => Duration::from_millis(ms.parse()?),
            },
            log_level: match var("LOG_LEVEL") {
                None => log::LevelFilter::Info,
                Some(level) => level
                    .parse()
                    .map_err(|e| anyhow::anyhow!("invalid LOG_LEVEL: {}", e))?,
            },
        })
    }

    /// `DB_URL` verbatim, or a key=value DSN built from the discrete `DB_*` variables.
    fn database<F>(var: &F) -> anyhow::Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("DB_URL").filter(|v| !v.is_empty()) {
            return Ok(url);
        }
        let part = |key: &str| {
            var(key)
                .map(|v| quote(&v))
                .ok_or_else(|| anyhow::anyhow!("DB_URL or {} must be set", key))
        };
        Ok(format!(
            "user={} password={} host={} port={} dbname={} sslmode=disable",
            part("DB_USER")?,
            part("DB_PASSWORD")?,
            part("DB_HOST")?,
            part("DB_PORT")?,
            part("DB_NAME")?,
        ))
    }
}

/// Single-quotes a DSN value, escaping backslashes and quotes.
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Loads `.env` from the working directory into the process environment.
/// Returns the file's path, or `None` when there is no such file.
pub fn dotenv() -> anyhow::Result<Option<std::path::PathBuf>> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let env = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    const MINIMAL: &[(&str, &str)] = &[
        ("DB_URL", "postgres://localhost/laiska"),
        ("JWT_SECRET", "jwt"),
        ("SALT", "pepper-pepper"),
        ("ADMIN_SECRET", "admin"),
    ];

    #[test]
    fn defaults() {
        let config = load(MINIMAL).unwrap();
        assert_eq!(config.bind, "0.0.0.0:8090");
        assert_eq!(config.store_timeout, STORE_TIMEOUT);
        assert_eq!(config.salting, Salting::Pepper);
        assert_eq!(config.log_level, log::LevelFilter::Info);
    }

    #[test]
    fn missing_secrets_abort() {
        for key in ["JWT_SECRET", "SALT", "ADMIN_SECRET"] {
            let pairs = MINIMAL
                .iter()
                .copied()
                .filter(|(k, _)| *k != key)
                .collect::<Vec<_>>();
            let err = load(&pairs).unwrap_err();
            assert!(err.to_string().contains(key));
        }
    }

    #[test]
    fn short_pepper_is_rejected() {
        let mut pairs = MINIMAL.to_vec();
        pairs.retain(|(k, _)| *k != "SALT");
        pairs.push(("SALT", "short"));
        assert!(load(&pairs).is_err());
    }

    fn without_url() -> Vec<(&'static str, &'static str)> {
        let mut pairs = MINIMAL.to_vec();
        pairs.retain(|(k, _)| *k != "DB_URL");
        pairs.extend([
            ("DB_USER", "laiska"),
            ("DB_HOST", "db"),
            ("DB_PORT", "5432"),
            ("DB_NAME", "sensors"),
        ]);
        pairs
    }

    #[test]
    fn composes_database_dsn() {
        let mut pairs = without_url();
        pairs.push(("DB_PASSWORD", "pw"));
        let config = load(&pairs).unwrap();
        assert_eq!(
            config.db_url,
            "user='laiska' password='pw' host='db' port='5432' dbname='sensors' sslmode=disable"
        );
        pairs.retain(|(k, _)| *k != "DB_HOST");
        assert!(load(&pairs).is_err());
    }

    #[test]
    fn special_characters_survive_the_dsn() {
        let mut pairs = without_url();
        pairs.push(("DB_PASSWORD", r"p@ss/w#rd:it's\?"));
        let config = load(&pairs).unwrap();
        let parsed = config.db_url.parse::<tokio_postgres::Config>().unwrap();
        assert_eq!(parsed.get_user(), Some("laiska"));
        assert_eq!(parsed.get_password(), Some(r"p@ss/w#rd:it's\?".as_bytes()));
        assert_eq!(parsed.get_dbname(), Some("sensors"));
        assert_eq!(parsed.get_ports(), &[5432]);
        assert!(matches!(
            parsed.get_hosts(),
            [tokio_postgres::config::Host::Tcp(host)] if host == "db"
        ));
    }

    #[test]
    fn missing_env_file_is_not_an_error() {
        assert!(dotenv().is_ok());
    }

    #[test]
    fn overrides() {
        let mut pairs = MINIMAL.to_vec();
        pairs.extend([
            ("PASSWORD_SALTING", "random"),
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("STORE_TIMEOUT_MS", "250"),
            ("LOG_LEVEL", "debug"),
        ]);
        let config = load(&pairs).unwrap();
        assert_eq!(config.salting, Salting::Random);
        assert_eq!(config.bind, "127.0.0.1:9000");
        assert_eq!(config.store_timeout, Duration::from_millis(250));
        assert_eq!(config.log_level, log::LevelFilter::Debug);
    }

    #[test]
    fn unknown_salting_mode_is_rejected() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("PASSWORD_SALTING", "sometimes"));
        assert!(load(&pairs).is_err());
    }
}
