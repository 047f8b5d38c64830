//! Weather collaborator.
//!
//! # Responsibility
//! - Define the provider seam and a deterministic mock behind it.
//! - Run lookups off the tick loop and expose their state without blocking.
//!
//! # Invariants
//! - A failed or cancelled lookup ends in `Unavailable`; it never surfaces
//!   as an error to the card.
//! - The mock returns the same report for the same city on every call.

use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherError {
    UnknownCity(String),
    Unavailable(String),
}

impl Display for WeatherError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCity(city) => write!(f, "weather data not found for `{city}`"),
            Self::Unavailable(reason) => write!(f, "failed to fetch weather data: {reason}"),
        }
    }
}

impl Error for WeatherError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherReport {
    pub temperature_c: i32,
    pub description: String,
    pub icon: String,
    /// Local `HH:MM`.
    pub sunrise: String,
    pub sunset: String,
}

pub trait WeatherProvider {
    fn fetch(&self, city: &str) -> Result<WeatherReport, WeatherError>;
}

const MOCK_DESCRIPTIONS: [&str; 4] = ["Clear", "Cloudy", "Rainy", "Sunny"];

/// Offline provider deriving a stable report from the city name.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockWeatherProvider {
    latency: Duration,
}

impl MockWeatherProvider {
    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }
}

impl WeatherProvider for MockWeatherProvider {
    fn fetch(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::UnknownCity(city.to_string()));
        }
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }

        let seed = city
            .bytes()
            .fold(0_u32, |acc, byte| acc.wrapping_mul(31).wrapping_add(u32::from(byte)));
        // 5..=34 °C
        let temperature_c = 5 + (seed % 30) as i32;
        let description = MOCK_DESCRIPTIONS[(seed / 30) as usize % MOCK_DESCRIPTIONS.len()];

        Ok(WeatherReport {
            temperature_c,
            description: description.to_string(),
            icon: "01d".to_string(),
            sunrise: "06:30".to_string(),
            sunset: "18:45".to_string(),
        })
    }
}

/// Lookup state shown on a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherState {
    Disabled,
    Loading,
    Ready(WeatherReport),
    Unavailable(String),
}

/// One in-flight (or finished) lookup.
#[derive(Debug)]
pub struct WeatherSlot {
    state: WeatherState,
    pending: Option<oneshot::Receiver<Result<WeatherReport, WeatherError>>>,
}

impl WeatherSlot {
    /// Starts a background lookup, or stays `Disabled`.
    pub fn request(
        provider: Arc<dyn WeatherProvider + Send + Sync>,
        city: &str,
        enabled: bool,
    ) -> Self {
        if !enabled || city.trim().is_empty() {
            return Self {
                state: WeatherState::Disabled,
                pending: None,
            };
        }

        let (tx, rx) = oneshot::channel();
        let city = city.to_string();
        let spawned = thread::Builder::new()
            .name("weather-lookup".to_string())
            .spawn(move || {
                let result = provider.fetch(&city);
                // Receiver may already be gone; nothing to report then.
                let _ = tx.send(result);
            });

        match spawned {
            Ok(_) => Self {
                state: WeatherState::Loading,
                pending: Some(rx),
            },
            Err(err) => {
                warn!("event=weather_fetch module=weather status=error error_code=spawn_failed error={err}");
                Self {
                    state: WeatherState::Unavailable(err.to_string()),
                    pending: None,
                }
            }
        }
    }

    /// Non-blocking progress check.
    pub fn poll(&mut self) -> &WeatherState {
        if let Some(rx) = self.pending.as_mut() {
            match rx.try_recv() {
                Ok(result) => {
                    self.pending = None;
                    self.finish(result);
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Closed) => {
                    self.pending = None;
                    self.state = WeatherState::Unavailable("lookup cancelled".to_string());
                }
            }
        }
        &self.state
    }

    /// Blocks until the lookup settles. Not for use on the tick loop.
    pub fn wait(&mut self) -> &WeatherState {
        if let Some(rx) = self.pending.take() {
            match rx.blocking_recv() {
                Ok(result) => self.finish(result),
                Err(_) => {
                    self.state = WeatherState::Unavailable("lookup cancelled".to_string());
                }
            }
        }
        &self.state
    }

    pub fn state(&self) -> &WeatherState {
        &self.state
    }

    fn finish(&mut self, result: Result<WeatherReport, WeatherError>) {
        self.state = match result {
            Ok(report) => {
                debug!("event=weather_fetch module=weather status=ok");
                WeatherState::Ready(report)
            }
            Err(err) => {
                warn!("event=weather_fetch module=weather status=error error={err}");
                WeatherState::Unavailable(err.to_string())
            }
        };
    }
}

/// Icon family for a weather description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherIcon {
    Sun,
    CloudSun,
    CloudRain,
    CloudFog,
    Snowflake,
}

impl WeatherIcon {
    /// Keyword match on the description; unknown text maps to `CloudSun`.
    pub fn classify(description: &str) -> Self {
        let d = description.to_lowercase();
        if d.contains("clear") {
            Self::Sun
        } else if d.contains("cloudy") {
            Self::CloudSun
        } else if d.contains("rain") {
            Self::CloudRain
        } else if d.contains("mist") || d.contains("fog") {
            Self::CloudFog
        } else if d.contains("snow") {
            Self::Snowflake
        } else {
            Self::CloudSun
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Sun => "#facc15",
            Self::CloudSun => "#60a5fa",
            Self::CloudRain => "#3b82f6",
            Self::CloudFog => "#9ca3af",
            Self::Snowflake => "#bae6fd",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sun => "sun",
            Self::CloudSun => "cloud-sun",
            Self::CloudRain => "cloud-rain",
            Self::CloudFog => "cloud-fog",
            Self::Snowflake => "snowflake",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingProvider;

    impl WeatherProvider for FailingProvider {
        fn fetch(&self, _city: &str) -> Result<WeatherReport, WeatherError> {
            Err(WeatherError::Unavailable("offline".to_string()))
        }
    }

    #[test]
    fn mock_is_deterministic_and_in_range() {
        let provider = MockWeatherProvider::default();
        let first = provider.fetch("Tokyo").unwrap();
        assert_eq!(first, provider.fetch("Tokyo").unwrap());
        assert!((5..=34).contains(&first.temperature_c));
        assert!(MOCK_DESCRIPTIONS.contains(&first.description.as_str()));
        assert!(provider.fetch("  ").is_err());
    }

    #[test]
    fn disabled_slot_never_loads() {
        let provider: Arc<dyn WeatherProvider + Send + Sync> = Arc::new(MockWeatherProvider::default());
        let mut slot = WeatherSlot::request(provider, "Tokyo", false);
        assert_eq!(slot.poll(), &WeatherState::Disabled);
    }

    #[test]
    fn slot_settles_to_ready_or_unavailable() {
        let provider: Arc<dyn WeatherProvider + Send + Sync> =
            Arc::new(MockWeatherProvider::with_latency(Duration::from_millis(20)));
        let mut slot = WeatherSlot::request(provider, "Paris", true);
        assert!(matches!(slot.state(), WeatherState::Loading));
        assert!(matches!(slot.wait(), WeatherState::Ready(_)));

        let failing: Arc<dyn WeatherProvider + Send + Sync> = Arc::new(FailingProvider);
        let mut slot = WeatherSlot::request(failing, "Paris", true);
        assert!(matches!(slot.wait(), WeatherState::Unavailable(_)));
    }

    #[test]
    fn icon_classification_follows_keywords() {
        assert_eq!(WeatherIcon::classify("Clear sky"), WeatherIcon::Sun);
        assert_eq!(WeatherIcon::classify("Partly Cloudy"), WeatherIcon::CloudSun);
        assert_eq!(WeatherIcon::classify("Rainy"), WeatherIcon::CloudRain);
        assert_eq!(WeatherIcon::classify("morning fog"), WeatherIcon::CloudFog);
        assert_eq!(WeatherIcon::classify("Snow showers"), WeatherIcon::Snowflake);
        assert_eq!(WeatherIcon::classify("Sunny"), WeatherIcon::CloudSun);
    }
}
