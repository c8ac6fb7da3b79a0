use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Site families whose entry URLs carry a `MyAnimeList` ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UrlFamily {
    /// `myanimelist.net/anime/{id}/{slug}`: the ID is its own path segment.
    MyAnimeList,
    /// `shikimori.one/animes/z{id}-{slug}`: the ID leads the segment.
    Shikimori,
}

impl UrlFamily {
    fn from_host(host: &str) -> Option<Self> {
        let host = host.strip_prefix("www.").unwrap_or(host);
        match host {
            "myanimelist.net" => Some(Self::MyAnimeList),
            "shikimori.one" | "shikimori.me" | "shikimori.org" => Some(Self::Shikimori),
            _ => None,
        }
    }

    const fn kind_segments(self) -> &'static [&'static str] {
        match self {
            Self::MyAnimeList => &["anime", "manga"],
            Self::Shikimori => &["animes", "mangas", "ranobe"],
        }
    }
}

/// Extracts the numeric ID from a recognized entry URL.
///
/// Returns `None` when `input` is not a URL of a supported site, in which
/// case the caller keeps the input verbatim.
///
/// # Examples
///
/// ```rust
/// use anisheet::parser::url_id::extract_external_id;
///
/// assert_eq!(
///     extract_external_id("https://myanimelist.net/anime/5114/Fullmetal_Alchemist__Brotherhood").as_deref(),
///     Some("5114")
/// );
/// assert_eq!(extract_external_id("5114"), None);
/// ```
#[must_use]
pub fn extract_external_id(input: &str) -> Option<String> {
    let url = parse_loose(input.trim())?;
    let family = UrlFamily::from_host(url.host_str()?)?;
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());

    segments.find(|segment| family.kind_segments().contains(segment))?;
    let id_segment = segments.next()?;

    match family {
        UrlFamily::MyAnimeList => id_segment
            .chars()
            .all(|c| c.is_ascii_digit())
            .then(|| id_segment.to_string()),
        UrlFamily::Shikimori => leading_digits(id_segment),
    }
}

fn parse_loose(input: &str) -> Option<Url> {
    if input.is_empty() || input.chars().any(char::is_whitespace) {
        return None;
    }
    Url::parse(input).ok().or_else(|| {
        input
            .contains('/')
            .then(|| Url::parse(&format!("https://{input}")).ok())
            .flatten()
    })
}

fn leading_digits(segment: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z]*(?P<id>\d+)(?:-|$)").expect("Invalid regex pattern defined in code")
    });
    re.captures(segment)
        .and_then(|caps| caps.name("id"))
        .map(|m| m.as_str().to_string())
}
