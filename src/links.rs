//! Canonical URLs for the cataloguing sites a row can link to.
//!
//! Every site is identified by a short-code (`MAL`, `AL`, `KT`, ...) and has a
//! single URL template. [`build_link`] is the string-keyed entry point used by
//! callers holding raw codes; [`SiteCode::link`] is the typed one.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// A cataloguing site with a known URL template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SiteCode {
    AniDb,
    Anilist,
    Annict,
    AnimePlanet,
    AniSearch,
    Kitsu,
    Kaize,
    LiveChart,
    MyAnimeList,
    NotifyMoe,
    OtakOtaku,
    Shikimori,
    Simkl,
    TheMovieDb,
    Trakt,
}

impl SiteCode {
    pub const ALL: &[Self] = &[
        Self::AniDb,
        Self::Anilist,
        Self::Annict,
        Self::AnimePlanet,
        Self::AniSearch,
        Self::Kitsu,
        Self::Kaize,
        Self::LiveChart,
        Self::MyAnimeList,
        Self::NotifyMoe,
        Self::OtakOtaku,
        Self::Shikimori,
        Self::Simkl,
        Self::TheMovieDb,
        Self::Trakt,
    ];

    /// Sites whose column is driven by the row's own ID rather than by the
    /// cross-reference payload.
    pub const PRIMARY_DRIVEN: &[Self] = &[Self::MyAnimeList, Self::Shikimori, Self::Simkl];

    /// Sites the title hyperlink can point at, in the order the link-site
    /// setting enumerates them.
    pub const TITLE_LINK_TARGETS: &[Self] = &[
        Self::MyAnimeList,
        Self::Anilist,
        Self::Kitsu,
        Self::Shikimori,
        Self::Simkl,
    ];

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::AniDb => "ADB",
            Self::Anilist => "AL",
            Self::Annict => "AN",
            Self::AnimePlanet => "AP",
            Self::AniSearch => "AS",
            Self::Kitsu => "KT",
            Self::Kaize => "KZ",
            Self::LiveChart => "LC",
            Self::MyAnimeList => "MAL",
            Self::NotifyMoe => "NTF",
            Self::OtakOtaku => "OO",
            Self::Shikimori => "SHK",
            Self::Simkl => "SMK",
            Self::TheMovieDb => "TMD",
            Self::Trakt => "TRK",
        }
    }

    /// Key under which the cross-reference payload stores this site's id.
    #[must_use]
    pub const fn long_key(self) -> &'static str {
        match self {
            Self::AniDb => "anidb",
            Self::Anilist => "anilist",
            Self::Annict => "annict",
            Self::AnimePlanet => "animeplanet",
            Self::AniSearch => "anisearch",
            Self::Kitsu => "kitsu",
            Self::Kaize => "kaize",
            Self::LiveChart => "livechart",
            Self::MyAnimeList => "myanimelist",
            Self::NotifyMoe => "notify",
            Self::OtakOtaku => "otakotaku",
            Self::Shikimori => "shikimori",
            Self::Simkl => "simkl",
            Self::TheMovieDb => "themoviedb",
            Self::Trakt => "trakt",
        }
    }

    #[must_use]
    pub fn is_primary_driven(self) -> bool {
        Self::PRIMARY_DRIVEN.contains(&self)
    }

    /// Builds the canonical URL for `id` on this site.
    ///
    /// Only Simkl uses `title`; its URLs carry a slug after the id.
    #[must_use]
    pub fn link(self, id: &str, title: Option<&str>) -> String {
        match self {
            Self::AniDb => format!("https://anidb.net/anime/{id}"),
            Self::Anilist => format!("https://anilist.co/anime/{id}"),
            Self::Annict => format!("https://annict.com/works/{id}"),
            Self::AnimePlanet => format!("https://www.anime-planet.com/anime/{id}"),
            Self::AniSearch => format!("https://www.anisearch.com/anime/{id}"),
            Self::Kitsu => format!("https://kitsu.app/anime/{id}"),
            Self::Kaize => format!("https://kaize.io/anime/{id}"),
            Self::LiveChart => format!("https://www.livechart.me/anime/{id}"),
            Self::MyAnimeList => format!("https://myanimelist.net/anime/{id}"),
            Self::NotifyMoe => format!("https://notify.moe/anime/{id}"),
            Self::OtakOtaku => format!("https://otakotaku.com/anime/view/{id}"),
            Self::Shikimori => format!("https://shikimori.one/animes/{id}"),
            Self::Simkl => {
                let slug = title.map(slugify).unwrap_or_default();
                if slug.is_empty() {
                    format!("https://simkl.com/anime/{id}")
                } else {
                    format!("https://simkl.com/anime/{id}/{slug}")
                }
            }
            Self::TheMovieDb => format!("https://www.themoviedb.org/tv/{id}"),
            Self::Trakt => format!("https://trakt.tv/{id}"),
        }
    }
}

impl fmt::Display for SiteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SiteCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("TMDB") {
            return Ok(Self::TheMovieDb);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|site| site.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown site code '{trimmed}'"))
    }
}

impl Serialize for SiteCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for SiteCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Builds the canonical URL for a raw site short-code.
///
/// Returns `None` for codes outside the fixed table instead of failing.
///
/// # Examples
///
/// ```rust
/// use anisheet::links::build_link;
///
/// assert_eq!(
///     build_link("5114", "MAL", None).as_deref(),
///     Some("https://myanimelist.net/anime/5114")
/// );
/// assert_eq!(build_link("5114", "XYZ", None), None);
/// ```
#[must_use]
pub fn build_link(id: &str, site_code: &str, title: Option<&str>) -> Option<String> {
    site_code
        .parse::<SiteCode>()
        .ok()
        .map(|site| site.link(id, title))
}

fn get_regex(re: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    re.get_or_init(|| Regex::new(pattern).expect("Invalid regex pattern defined in code"))
}

/// Turns a title into a URL slug.
///
/// Lowercases, maps whitespace to `-`, keeps only ASCII letters, digits, `_`
/// and `-`, collapses repeated hyphens and trims them from both ends.
/// Applying it twice gives the same result as applying it once.
#[must_use]
pub fn slugify(title: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    static NON_WORD: OnceLock<Regex> = OnceLock::new();
    static HYPHENS: OnceLock<Regex> = OnceLock::new();

    let lowered = title.to_lowercase();
    let dashed = get_regex(&WHITESPACE, r"\s+").replace_all(&lowered, "-");
    let stripped = get_regex(&NON_WORD, r"[^A-Za-z0-9_-]+").replace_all(&dashed, "");
    let collapsed = get_regex(&HYPHENS, r"-{2,}").replace_all(&stripped, "-");

    collapsed.trim_matches('-').to_string()
}
