//! Spreadsheet formula text produced for computed cells.

use crate::constants::formulas::{FAVICON_SERVICE, FAVICON_SIZE};
use crate::domain::TitleLanguage;
use crate::links::SiteCode;

/// Escapes `value` for use inside a double-quoted formula string literal.
#[must_use]
pub fn escape(value: &str) -> String {
    value.replace('"', "\"\"")
}

#[must_use]
pub fn quoted(value: &str) -> String {
    format!("\"{}\"", escape(value))
}

/// A clickable thumbnail of the poster image.
#[must_use]
pub fn poster(url: &str) -> String {
    let url = quoted(url);
    format!("=HYPERLINK({url}, IMAGE({url}))")
}

/// A hyperlink to `url` displayed as the favicon of `host`.
#[must_use]
pub fn favicon_link(url: &str, host: &str) -> String {
    let icon = format!(
        "{FAVICON_SERVICE}?domain={}&sz={FAVICON_SIZE}",
        urlencoding::encode(host)
    );
    format!("=HYPERLINK({}, IMAGE({}))", quoted(url), quoted(&icon))
}

/// Formula that fetches a payload from `url` when the sheet recalculates.
#[must_use]
pub fn fetch(url: &str) -> String {
    format!("=IMPORTDATA({})", quoted(url))
}

/// The three title variants the title cell can display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleVariants {
    pub native: String,
    pub english: String,
    pub romaji: String,
}

impl TitleVariants {
    fn get(&self, language: TitleLanguage) -> &str {
        match language {
            TitleLanguage::Native => &self.native,
            TitleLanguage::English => &self.english,
            TitleLanguage::Romaji => &self.romaji,
        }
    }
}

/// Title cell formula.
///
/// The displayed variant is picked at recalculation time from the value of
/// `language_cell`, falling back to the romanized title when the chosen one
/// is empty. The link target is picked from `link_site_cell` among
/// [`SiteCode::TITLE_LINK_TARGETS`]; `links` holds one URL per target in
/// that order.
#[must_use]
pub fn title(
    titles: &TitleVariants,
    links: &[String],
    language_cell: &str,
    link_site_cell: &str,
) -> String {
    let languages = array_literal(TitleLanguage::ALL.iter().map(|l| l.as_str()));
    let variants = join_quoted(TitleLanguage::ALL.iter().map(|l| titles.get(*l)));
    let sites = array_literal(SiteCode::TITLE_LINK_TARGETS.iter().map(|s| s.code()));
    let urls = join_quoted(links.iter().map(String::as_str));
    let romaji = quoted(&titles.romaji);

    format!(
        "=LET(t, CHOOSE(MATCH({language_cell}, {languages}, 0), {variants}), \
         HYPERLINK(CHOOSE(MATCH({link_site_cell}, {sites}, 0), {urls}), IF(t=\"\", {romaji}, t)))"
    )
}

fn join_quoted<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values.map(quoted).collect::<Vec<_>>().join(", ")
}

fn array_literal<'a>(values: impl Iterator<Item = &'a str>) -> String {
    format!("{{{}}}", values.map(quoted).collect::<Vec<_>>().join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_quotes() {
        assert_eq!(escape(r#"Say "Hi""#), r#"Say ""Hi"""#);
        assert_eq!(quoted("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn poster_formula() {
        assert_eq!(
            poster("https://cdn/x.jpg"),
            r#"=HYPERLINK("https://cdn/x.jpg", IMAGE("https://cdn/x.jpg"))"#
        );
    }

    #[test]
    fn favicon_formula_encodes_host() {
        let formula = favicon_link("https://www.netflix.com/title/1", "www.netflix.com");
        assert!(formula.starts_with(r#"=HYPERLINK("https://www.netflix.com/title/1", IMAGE("#));
        assert!(formula.contains("domain=www.netflix.com&sz=64"));
    }

    #[test]
    fn title_formula_lists_variants_and_links() {
        let titles = TitleVariants {
            native: "デスノート".to_string(),
            english: "Death \"Note\"".to_string(),
            romaji: "Death Note".to_string(),
        };
        let links: Vec<String> = (1..=5).map(|i| format!("https://l/{i}")).collect();
        let formula = title(&titles, &links, "Settings!$B$1", "Settings!$B$2");

        assert!(formula.starts_with("=LET(t, CHOOSE(MATCH(Settings!$B$1, {\"Native\", \"English\", \"Romaji\"}, 0)"));
        assert!(formula.contains("\"デスノート\", \"Death \"\"Note\"\"\", \"Death Note\""));
        assert!(formula.contains("{\"MAL\", \"AL\", \"KT\", \"SHK\", \"SMK\"}"));
        assert!(formula.contains("\"https://l/1\", \"https://l/2\", \"https://l/3\", \"https://l/4\", \"https://l/5\""));
        assert!(formula.ends_with("IF(t=\"\", \"Death Note\", t)))"));
    }
}
