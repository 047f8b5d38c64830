//! Location card view model.

use crate::model::location::{Location, LocationId};
use crate::model::settings::Settings;
use crate::service::weather::WeatherState;
use crate::time::derive::{derive_view, DerivedTimeView, SkyGradient};
use crate::time::zone::ZoneId;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct LocationCardView {
    pub id: LocationId,
    pub display_name: String,
    pub original_name: String,
    pub zone: ZoneId,
    pub is_favorite: bool,
    /// Move-up is disabled on the first card.
    pub is_first: bool,
    /// Move-down is disabled on the last card.
    pub is_last: bool,
    pub time: DerivedTimeView,
    pub gradient: SkyGradient,
    pub progress_color: &'static str,
    /// `None` when weather display is off in settings.
    pub weather: Option<WeatherState>,
}

/// Builds the card at `index` of a list of `count` locations.
pub fn build_card(
    location: &Location,
    index: usize,
    count: usize,
    instant: DateTime<Utc>,
    settings: &Settings,
) -> LocationCardView {
    let time = derive_view(instant, location.time_zone, settings.use_24_hour);
    LocationCardView {
        id: location.id,
        display_name: location.display_name().to_string(),
        original_name: location.name.clone(),
        zone: location.time_zone,
        is_favorite: location.is_favorite,
        is_first: index == 0,
        is_last: index + 1 == count,
        gradient: time.sky.gradient(settings.theme),
        progress_color: time.sky.progress_color(settings.theme),
        time,
        weather: settings.show_weather.then_some(WeatherState::Loading),
    }
}

/// Cards for every location, all derived from the same instant.
pub fn build_cards(
    locations: &[Location],
    instant: DateTime<Utc>,
    settings: &Settings,
) -> Vec<LocationCardView> {
    locations
        .iter()
        .enumerate()
        .map(|(index, location)| build_card(location, index, locations.len(), instant, settings))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::build_cards;
    use crate::model::settings::{Settings, Theme};
    use crate::service::registry::LocationRegistry;
    use crate::time::derive::SkyToken;
    use chrono::{TimeZone, Utc};

    #[test]
    fn cards_share_one_instant_and_mark_edges() {
        let mut registry = LocationRegistry::with_defaults();
        registry.rename(2, "Office");
        let instant = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let settings = Settings {
            theme: Theme::Dark,
            show_weather: false,
            ..Settings::default()
        };

        let cards = build_cards(registry.locations(), instant, &settings);
        assert_eq!(cards.len(), 4);
        assert!(cards[0].is_first && !cards[0].is_last);
        assert!(cards[3].is_last && !cards[3].is_first);

        let tokyo = &cards[2];
        assert_eq!(tokyo.display_name, "Office");
        assert_eq!(tokyo.original_name, "Tokyo");
        assert_eq!(tokyo.time.time_string, "21:00");
        assert_eq!(tokyo.time.sky, SkyToken::Night);
        assert_eq!(tokyo.progress_color, "#ca7df9");
        assert_eq!(tokyo.gradient.from, "#0a0a0a");
        assert!(tokyo.weather.is_none());
    }
}
