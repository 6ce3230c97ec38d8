use std::path::PathBuf;

use anyhow::Result;
use ::config::{Config, Environment};
use serde::Deserialize;

use crate::parser::date::DateStyle;
use crate::parser::rating::RatingFallback;

pub const DEFAULT_FEED_URL: &str = "https://letterboxd.com/jorge_h18/rss/";
pub const DEFAULT_OUTPUT: &str = "letterboxd-diary.md";
pub const DEFAULT_TITLE: &str = "Watched Movies";
const ENV_PREFIX: &str = "DIARY";

/// Run settings: built-in defaults, then `DIARY_*` environment variables,
/// then command-line flags.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub feed_url: String,
    pub output: PathBuf,
    pub title: String,
    pub date_style: DateStyle,
    pub rating_fallback: RatingFallback,
}

/// Values given on the command line. `None` falls through to env/defaults.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub feed_url: Option<String>,
    pub output: Option<PathBuf>,
    pub title: Option<String>,
    pub date_style: Option<DateStyle>,
    pub rating_fallback: Option<RatingFallback>,
}

impl Settings {
    pub fn load(overrides: &Overrides) -> Result<Self> {
        Self::load_from(Environment::with_prefix(ENV_PREFIX), overrides)
    }

    fn load_from(env: Environment, o: &Overrides) -> Result<Self> {
        let settings = Config::builder()
            .set_default("feed_url", DEFAULT_FEED_URL)?
            .set_default("output", DEFAULT_OUTPUT)?
            .set_default("title", DEFAULT_TITLE)?
            .set_default("date_style", DateStyle::default().name())?
            .set_default("rating_fallback", RatingFallback::default().name())?
            .add_source(env)
            .set_override_option("feed_url", o.feed_url.clone())?
            .set_override_option(
                "output",
                o.output.as_ref().map(|p| p.to_string_lossy().into_owned()),
            )?
            .set_override_option("title", o.title.clone())?
            .set_override_option("date_style", o.date_style.map(DateStyle::name))?
            .set_override_option("rating_fallback", o.rating_fallback.map(RatingFallback::name))?
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
