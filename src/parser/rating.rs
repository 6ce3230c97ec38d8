use serde::Deserialize;

const STARS: &[(&str, &str)] = &[
    ("0.5", "½"),
    ("1.0", "★"),
    ("1.5", "★½"),
    ("2.0", "★★"),
    ("2.5", "★★½"),
    ("3.0", "★★★"),
    ("3.5", "★★★½"),
    ("4.0", "★★★★"),
    ("4.5", "★★★★½"),
    ("5.0", "★★★★★"),
];

/// Cell text used when a rating is missing or not on the half-star scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RatingFallback {
    #[default]
    Blank,
    #[serde(rename = "none")]
    #[value(name = "none")]
    NoneText,
}

impl RatingFallback {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blank => " ",
            Self::NoneText => "None",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::NoneText => "none",
        }
    }
}

/// Normalize a raw rating to its one-decimal lookup key ("4" -> "4.0").
/// Values off the half-star grid have no key.
fn rating_key(raw: &str) -> Option<String> {
    let value: f64 = raw.trim().parse().ok()?;
    let on_grid = value.is_finite() && (value * 2.0).fract() == 0.0;
    on_grid.then(|| format!("{:.1}", value))
}

/// Map a numeric rating (0.5 steps, 0.5 to 5.0) to star glyphs.
pub fn stars(raw: &str, fallback: RatingFallback) -> &'static str {
    rating_key(raw)
        .and_then(|key| STARS.iter().find(|(k, _)| *k == key).map(|(_, s)| *s))
        .unwrap_or(fallback.as_str())
}
