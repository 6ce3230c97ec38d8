pub mod date;
pub mod rating;
pub mod summary;

use tracing::warn;

use crate::feed::FeedEntry;
use crate::record::{MovieRecord, Rewatch};
use date::DateStyle;
use rating::RatingFallback;

/// Rating text assumed when an entry has no member rating.
const MISSING_RATING: &str = "0";

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    pub date_style: DateStyle,
    pub rating_fallback: RatingFallback,
}

/// One record per entry, in entry order. Missing fields degrade to empty
/// values; nothing here fails the run.
pub fn build_records(entries: &[FeedEntry], opts: &BuildOptions) -> Vec<MovieRecord> {
    entries.iter().map(|e| build_record(e, opts)).collect()
}

pub fn build_record(entry: &FeedEntry, opts: &BuildOptions) -> MovieRecord {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();

    let (poster, review) = summary::extract_poster_and_review(entry.summary.as_deref().unwrap_or(""));

    let raw_rating = entry.member_rating.as_deref().unwrap_or(MISSING_RATING);
    let rating = rating::stars(raw_rating, opts.rating_fallback).to_string();

    let raw_date = entry.watched_date.as_deref().unwrap_or("");
    let watched_date = if raw_date.is_empty() {
        String::new()
    } else {
        date::format_watched_date(raw_date, opts.date_style).unwrap_or_else(|e| {
            warn!(title = ?entry.film_title, "{}; keeping it verbatim", e);
            raw_date.to_string()
        })
    };

    MovieRecord {
        poster,
        title: text(&entry.film_title),
        year: text(&entry.film_year),
        rating,
        watched_date,
        rewatch: Rewatch::from_feed(entry.rewatch.as_deref().unwrap_or("")),
        review,
        review_link: text(&entry.link),
        movie_id: entry.movie_id.clone(),
    }
}
