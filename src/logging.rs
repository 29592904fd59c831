use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub service_name: String,
    pub environment: String,
    pub log_level: String,
    pub loki_url: Option<String>,
}

impl LoggingConfig {
    /// `service_name` is used unless `SERVICE_NAME` overrides it.
    pub fn from_env(service_name: &str) -> Result<Self, String> {
        Self::from_lookup(service_name, |name| std::env::var(name).ok())
    }

    pub fn from_lookup(
        service_name: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, String> {
        let loki_enabled = lookup("LOKI_ENABLED")
            .map(|v| v.parse::<bool>().unwrap_or(false))
            .unwrap_or(false);
        let loki_url = lookup("LOKI_URL");
        if loki_enabled && loki_url.is_none() {
            return Err("LOKI_ENABLED is true but LOKI_URL is not set".to_string());
        }

        Ok(Self {
            service_name: lookup("SERVICE_NAME").unwrap_or_else(|| service_name.to_string()),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            log_level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            loki_url: if loki_enabled { loki_url } else { None },
        })
    }
}

pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "loki")]
    {
        if let Some(loki_url) = config.loki_url.clone() {
            return init_with_loki(config, &loki_url);
        }
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_level))
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    tracing::info!("📊 Console logging initialized for {}", config.service_name);
    Ok(())
}

#[cfg(feature = "loki")]
fn init_with_loki(
    config: LoggingConfig,
    loki_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let url = url::Url::parse(loki_url)?;

    let (loki_layer, task) = tracing_loki::builder()
        .label("service", &config.service_name)?
        .label("environment", &config.environment)?
        .build_url(url)?;

    // Ships buffered events to Loki in the background
    tokio::spawn(task);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_level))
        .with(tracing_subscriber::fmt::layer())
        .with(loki_layer)
        .try_init()?;

    tracing::info!("✅ Loki logging initialized for {} at {}", config.service_name, loki_url);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoggingConfig::from_lookup("financial-data-api", |_| None).unwrap();

        assert_eq!(config.service_name, "financial-data-api");
        assert_eq!(config.environment, "development");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.loki_url, None);
    }

    #[test]
    fn test_loki_requires_url() {
        let err = LoggingConfig::from_lookup("financial-data-api", |name| {
            (name == "LOKI_ENABLED").then(|| "true".to_string())
        })
        .unwrap_err();
        assert!(err.contains("LOKI_URL"));
    }

    #[test]
    fn test_loki_url_ignored_when_disabled() {
        let config = LoggingConfig::from_lookup("ingest", |name| {
            (name == "LOKI_URL").then(|| "http://loki:3100".to_string())
        })
        .unwrap();
        assert_eq!(config.loki_url, None);
    }
}
