pub mod formulas {

    /// Placeholder shown in the title cell until metadata arrives.
    pub const LOADING_TITLE: &str = "=\"Loading…\"";

    pub const FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons";

    pub const FAVICON_SIZE: u32 = 64;
}

pub mod notes {

    pub const REWATCH_PREFIX: &str = "Rewatch started";

    pub const REWATCH_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
}

pub mod sheet {

    /// Upper bound on the number of data rows a sheet file may grow to.
    pub const MAX_ROWS: usize = 100_000;
}

pub mod metadata {

    pub const JIKAN_ANIME_URL: &str = "https://api.jikan.moe/v4/anime/{id}";

    pub const ANIMEAPI_MAPPING_URL: &str = "https://animeapi.my.id/myanimelist/{id}";

    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;
}
