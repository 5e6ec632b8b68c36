//! Parsing for `/query/apps` and `/query/active-app`.

use serde::Deserialize;

use super::ecp::{EcpError, EcpResult};
use super::types::Channel;

#[derive(Debug, Default, Deserialize)]
struct AppsDocument {
    #[serde(default, rename = "app")]
    apps: Vec<AppElement>,
}

#[derive(Debug, Default, Deserialize)]
struct ActiveAppDocument {
    #[serde(default)]
    app: Option<AppElement>,
}

/// `<app id=".." type=".." version="..">Name</app>`
#[derive(Debug, Default, Deserialize)]
struct AppElement {
    #[serde(rename = "@id", default)]
    id: Option<String>,
    #[serde(rename = "@type", default)]
    kind: Option<String>,
    #[serde(rename = "@version", default)]
    version: Option<String>,
    #[serde(rename = "$text", default)]
    name: Option<String>,
}

impl AppElement {
    /// Converts to a [`Channel`], or `None` when the id is missing or empty.
    fn into_channel(self, base_url: &str, is_active: bool) -> Option<Channel> {
        let id = self.id.map(|id| id.trim().to_string()).filter(|id| !id.is_empty())?;
        Some(Channel {
            icon_url: icon_url(base_url, &id),
            name: self.name.map(|n| n.trim().to_string()).unwrap_or_default(),
            kind: self.kind.unwrap_or_default(),
            version: self.version.unwrap_or_default(),
            id,
            is_active,
        })
    }
}

/// URL of a channel's icon on the device.
#[must_use]
pub fn icon_url(base_url: &str, channel_id: &str) -> String {
    format!("{}/query/icon/{}", base_url, channel_id)
}

/// Parses the installed-channel list, skipping entries without an id.
pub fn parse_apps(xml: &str, base_url: &str) -> EcpResult<Vec<Channel>> {
    if !xml.contains("<apps") {
        return Err(EcpError::Malformed("missing <apps> root element".to_string()));
    }
    let doc: AppsDocument =
        quick_xml::de::from_str(xml).map_err(|e| EcpError::Malformed(e.to_string()))?;

    Ok(doc
        .apps
        .into_iter()
        .filter_map(|app| app.into_channel(base_url, false))
        .collect())
}

/// Parses the active-app document.
///
/// Returns `None` when no app element is present or it carries no id (the
/// home screen is reported as `<app>Roku</app>`).
pub fn parse_active_app(xml: &str, base_url: &str) -> EcpResult<Option<Channel>> {
    if !xml.contains("<active-app") {
        return Err(EcpError::Malformed(
            "missing <active-app> root element".to_string(),
        ));
    }
    let doc: ActiveAppDocument =
        quick_xml::de::from_str(xml).map_err(|e| EcpError::Malformed(e.to_string()))?;

    Ok(doc.app.and_then(|app| app.into_channel(base_url, true)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://192.168.1.5:8060";

    const APPS: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<apps>
    <app id="31012" type="menu" version="2.0.53">FandangoNOW Movies &amp; TV</app>
    <app id="12" type="appl" version="5.1.98">Netflix</app>
    <app id="" type="appl" version="1.0">Ghost</app>
    <app type="appl" version="1.0">No Id</app>
    <app id="tvinput.hdmi1" type="tvin" version="1.0.0">HDMI 1</app>
</apps>"#;

    #[test]
    fn parses_apps_and_skips_missing_ids() {
        let channels = parse_apps(APPS, BASE).unwrap();
        let ids: Vec<_> = channels.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["31012", "12", "tvinput.hdmi1"]);

        let netflix = &channels[1];
        assert_eq!(netflix.name, "Netflix");
        assert_eq!(netflix.kind, "appl");
        assert_eq!(netflix.version, "5.1.98");
        assert_eq!(netflix.icon_url, "http://192.168.1.5:8060/query/icon/12");
        assert!(!netflix.is_active);

        assert_eq!(channels[0].name, "FandangoNOW Movies & TV");
    }

    #[test]
    fn empty_app_list_is_ok() {
        assert!(parse_apps("<apps></apps>", BASE).unwrap().is_empty());
        assert!(parse_apps("<apps/>", BASE).unwrap().is_empty());
    }

    #[test]
    fn rejects_unexpected_documents() {
        assert!(matches!(
            parse_apps("<html></html>", BASE),
            Err(EcpError::Malformed(_))
        ));
        assert!(matches!(
            parse_active_app("<apps></apps>", BASE),
            Err(EcpError::Malformed(_))
        ));
    }

    #[test]
    fn parses_active_app() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" ?>
<active-app>
    <app id="12" type="appl" version="5.1.98">Netflix</app>
</active-app>"#;
        let channel = parse_active_app(xml, BASE).unwrap().unwrap();
        assert_eq!(channel.id, "12");
        assert_eq!(channel.name, "Netflix");
        assert!(channel.is_active);
    }

    #[test]
    fn home_screen_has_no_active_channel() {
        let xml = "<active-app><app>Roku</app></active-app>";
        assert!(parse_active_app(xml, BASE).unwrap().is_none());
        assert!(parse_active_app("<active-app/>", BASE).unwrap().is_none());
    }
}
