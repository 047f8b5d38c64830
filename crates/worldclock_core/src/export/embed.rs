//! Widget embed snippets.

use super::ExportResult;
use crate::model::location::Location;
use crate::view::widget::WidgetParams;
use url::Url;

/// Locations pre-selected for a new widget.
pub const DEFAULT_WIDGET_ZONES: usize = 4;
const WIDGET_PATH: &str = "/widget";

/// Widget params for the first few registry entries.
pub fn default_params(locations: &[Location], params: WidgetParams) -> WidgetParams {
    WidgetParams {
        zones: locations
            .iter()
            .take(DEFAULT_WIDGET_ZONES)
            .map(|location| location.time_zone.name().to_string())
            .collect(),
        ..params
    }
}

/// `{origin}/widget?{query}`.
pub fn widget_url(origin: &str, params: &WidgetParams) -> ExportResult<Url> {
    let mut url = Url::parse(origin)?;
    url.set_path(WIDGET_PATH);
    url.set_query(Some(&params.to_query()));
    Ok(url)
}

pub fn iframe_snippet(url: &Url) -> String {
    format!(
        "<iframe \n  src=\"{url}\" \n  width=\"400\" \n  height=\"300\" \n  frameborder=\"0\" \n  style=\"border-radius: 8px; box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1);\">\n</iframe>"
    )
}

pub fn script_snippet(url: &Url) -> String {
    format!(
        "<!-- World Time Widget -->
<div id=\"world-time-widget\"></div>
<script>
  (function() {{
    var iframe = document.createElement('iframe');
    iframe.src = '{url}';
    iframe.width = '400';
    iframe.height = '300';
    iframe.frameBorder = '0';
    iframe.style.borderRadius = '8px';
    iframe.style.boxShadow = '0 4px 6px rgba(0, 0, 0, 0.1)';
    document.getElementById('world-time-widget').appendChild(iframe);
  }})();
</script>"
    )
}

#[cfg(test)]
mod tests {
    use super::{default_params, iframe_snippet, script_snippet, widget_url};
    use crate::model::settings::Theme;
    use crate::service::registry::LocationRegistry;
    use crate::view::widget::WidgetParams;

    #[test]
    fn url_points_at_widget_page_with_first_four_zones() {
        let mut registry = LocationRegistry::with_defaults();
        registry.add("Paris");
        let params = default_params(
            registry.locations(),
            WidgetParams {
                theme: Theme::Dark,
                use_24_hour: true,
                ..WidgetParams::default()
            },
        );
        assert_eq!(params.zones.len(), 4);

        let url = widget_url("https://clock.example.com/app?x=1", &params).unwrap();
        assert_eq!(url.path(), "/widget");
        let parsed = WidgetParams::from_query(url.query().unwrap_or_default());
        assert_eq!(parsed, params);
        assert!(!parsed.zones.contains(&"Europe/Paris".to_string()));
    }

    #[test]
    fn snippets_embed_the_url() {
        let url = widget_url("https://clock.example.com", &WidgetParams::default()).unwrap();
        let iframe = iframe_snippet(&url);
        assert!(iframe.contains(&format!("src=\"{url}\"")));
        assert!(iframe.contains("width=\"400\""));
        assert!(script_snippet(&url).contains(&format!("iframe.src = '{url}';")));
        assert!(widget_url("not a url", &WidgetParams::default()).is_err());
    }
}
