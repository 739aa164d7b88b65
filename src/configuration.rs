use config::ConfigError;

#[derive(Debug, Clone)]
pub struct Settings {
    pub s3: S3Settings,
    pub monitor: MonitorSettings,
}

#[derive(Debug, Clone)]
pub struct S3Settings {
    /// Endpoint template; a literal `{S3_REGION}` token is substituted with the
    /// region of the client being built.
    pub url: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
}

#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub bucket_prefix: String,
    pub bucket_names: String,
    pub search_folders: bool,
    pub warn_age_hours: i64,
    pub crit_age_hours: i64,
}

impl S3Settings {
    pub fn endpoint_for(&self, region: &str) -> String {
        self.url.replace("{S3_REGION}", region)
    }

    fn from_env() -> Result<Self, ConfigError> {
        Ok(S3Settings {
            url: required("S3_URL")?,
            access_key_id: required("AWS_ACCESS_KEY_ID")?,
            secret_access_key: required("AWS_SECRET_ACCESS_KEY")?,
            region: optional("AWS_REGION", "us-east-1"),
        })
    }
}

impl MonitorSettings {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(MonitorSettings {
            bucket_prefix: optional("BUCKET_PREFIX", ""),
            bucket_names: optional("BUCKET_NAMES", ""),
            // Only the literal string "true" enables folder mode; "True" and
            // "1" are false.
            search_folders: optional("SEARCH_FOLDERS", "false") == "true",
            warn_age_hours: int("WARN_AGE_HOURS", 36)?,
            crit_age_hours: int("CRIT_AGE_HOURS", 72)?,
        })
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::NotFound(name.to_string()))
}

fn optional(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn int(name: &str, default: i64) -> Result<i64, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|err| ConfigError::Message(format!("{} must be an integer: {}", name, err))),
        Err(_) => Ok(default),
    }
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    // Load environment variables from a .env file if one is present
    dotenvy::dotenv().ok();

    Ok(Settings {
        s3: S3Settings::from_env()?,
        monitor: MonitorSettings::from_env()?,
    })
}
