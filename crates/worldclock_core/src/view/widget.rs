//! Embeddable widget page.
//!
//! # Responsibility
//! - Parse and produce the widget query string.
//! - Render the widget grid (or its empty state) for one instant.
//!
//! # Invariants
//! - Unknown zone ids never reach the time layer: they are dropped with a
//!   warning, and a page with no valid zones renders the empty state.

use crate::model::settings::Theme;
use crate::time::derive::{
    date_string, day_progress_percent, sky_token, time_string, SkyGradient,
};
use crate::time::zone::ZoneId;
use chrono::{DateTime, Utc};
use log::warn;
use url::form_urlencoded;

pub const EMPTY_TITLE: &str = "No Time Zones Selected";
pub const EMPTY_MESSAGE: &str =
    "Please specify time zones in the URL parameters to display the widget.";
pub const PAGE_TITLE: &str = "World Time Widget";

/// Widget configuration carried in the embed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetParams {
    pub theme: Theme,
    pub use_24_hour: bool,
    /// Raw zone ids in display order.
    pub zones: Vec<String>,
    pub weather: bool,
}

impl Default for WidgetParams {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            use_24_hour: false,
            zones: Vec::new(),
            weather: false,
        }
    }
}

impl WidgetParams {
    /// Parses `theme`, `format`, `zones` and `weather`; unknown keys and
    /// unrecognized values fall back to defaults.
    pub fn from_query(query: &str) -> Self {
        let query = query.trim_start_matches('?');
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "theme" => params.theme = Theme::parse(&value).unwrap_or_default(),
                "format" => params.use_24_hour = value == "24",
                "zones" => {
                    params.zones = value
                        .split(',')
                        .map(str::trim)
                        .filter(|zone| !zone.is_empty())
                        .map(str::to_string)
                        .collect();
                }
                "weather" => params.weather = value == "true",
                _ => {}
            }
        }
        params
    }

    /// Serializes as `theme=..&weather=..&format=..&zones=..`.
    pub fn to_query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("theme", self.theme.as_str())
            .append_pair("weather", if self.weather { "true" } else { "false" })
            .append_pair("format", if self.use_24_hour { "24" } else { "12" })
            .append_pair("zones", &self.zones.join(","))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetCard {
    pub zone: ZoneId,
    /// Last path segment of the zone id, underscores as spaces.
    pub label: String,
    pub time_string: String,
    pub date_string: String,
    /// Rounded to a whole percent.
    pub progress_percent: u8,
    pub gradient: SkyGradient,
    pub progress_color: &'static str,
    pub show_weather: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetView {
    Empty {
        title: &'static str,
        message: &'static str,
        theme: Theme,
    },
    Grid {
        title: &'static str,
        header: String,
        theme: Theme,
        cards: Vec<WidgetCard>,
    },
}

/// `Europe/London` → `London`, `America/St_Johns` → `St Johns`.
pub fn zone_label(zone: &str) -> String {
    let last = zone.rsplit('/').next().unwrap_or(zone);
    last.replace('_', " ")
}

pub fn render(params: &WidgetParams, instant: DateTime<Utc>) -> WidgetView {
    let cards: Vec<WidgetCard> = params
        .zones
        .iter()
        .filter_map(|raw| match ZoneId::parse(raw) {
            Ok(zone) => Some(zone),
            Err(err) => {
                warn!("event=widget_render module=widget status=skip error={err}");
                None
            }
        })
        .map(|zone| {
            let sky = sky_token(instant, zone);
            WidgetCard {
                zone,
                label: zone_label(zone.name()),
                time_string: time_string(instant, zone, params.use_24_hour),
                date_string: date_string(instant, zone),
                progress_percent: day_progress_percent(instant, zone).round() as u8,
                gradient: sky.gradient(params.theme),
                progress_color: sky.progress_color(params.theme),
                show_weather: params.weather,
            }
        })
        .collect();

    if cards.is_empty() {
        return WidgetView::Empty {
            title: EMPTY_TITLE,
            message: EMPTY_MESSAGE,
            theme: params.theme,
        };
    }

    let header = format!(
        "Displaying {} time zone{} • {}-hour format",
        cards.len(),
        if cards.len() == 1 { "" } else { "s" },
        if params.use_24_hour { "24" } else { "12" }
    );
    WidgetView::Grid {
        title: PAGE_TITLE,
        header,
        theme: params.theme,
        cards,
    }
}

#[cfg(test)]
mod tests {
    use super::{render, zone_label, WidgetParams, WidgetView};
    use crate::model::settings::Theme;
    use chrono::{TimeZone, Utc};

    #[test]
    fn parses_query_with_defaults() {
        let params = WidgetParams::from_query("?theme=dark&zones=Asia%2FTokyo,,Europe/London&format=24");
        assert_eq!(params.theme, Theme::Dark);
        assert!(params.use_24_hour);
        assert!(!params.weather);
        assert_eq!(params.zones, vec!["Asia/Tokyo", "Europe/London"]);

        let defaults = WidgetParams::from_query("");
        assert_eq!(defaults, WidgetParams::default());
    }

    #[test]
    fn query_round_trips() {
        let params = WidgetParams {
            theme: Theme::Dark,
            use_24_hour: true,
            zones: vec!["America/New_York".to_string(), "Asia/Kolkata".to_string()],
            weather: true,
        };
        assert_eq!(WidgetParams::from_query(&params.to_query()), params);
        assert!(params.to_query().starts_with("theme=dark&weather=true&format=24&zones="));
    }

    #[test]
    fn labels_use_last_segment() {
        assert_eq!(zone_label("America/Argentina/Buenos_Aires"), "Buenos Aires");
        assert_eq!(zone_label("UTC"), "UTC");
    }

    #[test]
    fn invalid_zones_are_skipped() {
        let instant = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let params = WidgetParams::from_query("zones=Mars/Olympus,Asia/Tokyo");
        match render(&params, instant) {
            WidgetView::Grid { header, cards, .. } => {
                assert_eq!(cards.len(), 1);
                assert_eq!(cards[0].label, "Tokyo");
                assert_eq!(cards[0].time_string, "9:00 PM");
                assert_eq!(cards[0].progress_percent, 88);
                assert_eq!(header, "Displaying 1 time zone • 12-hour format");
            }
            other => panic!("expected grid, got {other:?}"),
        }

        let params = WidgetParams::from_query("zones=Mars/Olympus");
        assert!(matches!(render(&params, instant), WidgetView::Empty { .. }));
    }
}
