use std::time::Duration;

use quick_xml::events::Event;
use reqwest::Client;
use tracing::{debug, info};

use crate::error::DiaryError;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// One `<item>` of the diary RSS feed. Every field is optional because the
/// feed mixes film diary entries with lists and other activity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub film_title: Option<String>,
    pub film_year: Option<String>,
    pub member_rating: Option<String>,
    pub watched_date: Option<String>,
    pub rewatch: Option<String>,
    pub movie_id: Option<String>,
}

impl FeedEntry {
    /// Only film entries carry a TMDB movie id.
    pub fn is_diary_entry(&self) -> bool {
        self.movie_id.is_some()
    }

    fn set(&mut self, field: ItemField, value: String) {
        let slot = match field {
            ItemField::Title => &mut self.title,
            ItemField::Link => &mut self.link,
            ItemField::Summary => &mut self.summary,
            ItemField::FilmTitle => &mut self.film_title,
            ItemField::FilmYear => &mut self.film_year,
            ItemField::MemberRating => &mut self.member_rating,
            ItemField::WatchedDate => &mut self.watched_date,
            ItemField::Rewatch => &mut self.rewatch,
            ItemField::MovieId => &mut self.movie_id,
        };
        *slot = Some(value);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ItemField {
    Title,
    Link,
    Summary,
    FilmTitle,
    FilmYear,
    MemberRating,
    WatchedDate,
    Rewatch,
    MovieId,
}

impl ItemField {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"title" => Some(Self::Title),
            b"link" => Some(Self::Link),
            b"description" => Some(Self::Summary),
            b"letterboxd:filmTitle" => Some(Self::FilmTitle),
            b"letterboxd:filmYear" => Some(Self::FilmYear),
            b"letterboxd:memberRating" => Some(Self::MemberRating),
            b"letterboxd:watchedDate" => Some(Self::WatchedDate),
            b"letterboxd:rewatch" => Some(Self::Rewatch),
            b"tmdb:movieId" => Some(Self::MovieId),
            _ => None,
        }
    }
}

/// Fetch the feed and return only the film diary entries, in feed order.
pub async fn fetch_diary(url: &str) -> Result<Vec<FeedEntry>, DiaryError> {
    let client = http_client(FETCH_TIMEOUT).map_err(|e| DiaryError::fetch(url, e))?;
    fetch_diary_with(&client, url).await
}

async fn fetch_diary_with(client: &Client, url: &str) -> Result<Vec<FeedEntry>, DiaryError> {
    let xml = fetch_feed_xml(client, url).await?;
    let entries = parse_feed(url, &xml)?;
    info!("Total items in feed: {}", entries.len());

    let diary = diary_entries(entries);
    info!("Diary entries after filtering: {}", diary.len());
    Ok(diary)
}

fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

pub async fn fetch_feed_xml(client: &Client, url: &str) -> Result<String, DiaryError> {
    info!("Fetching diary feed: {}", url);
    client
        .get(url)
        .send()
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(|e| DiaryError::fetch(url, e))?
        .text()
        .await
        .map_err(|e| DiaryError::fetch(url, e))
}

pub fn diary_entries(entries: Vec<FeedEntry>) -> Vec<FeedEntry> {
    entries.into_iter().filter(FeedEntry::is_diary_entry).collect()
}

/// Parse an RSS document and return one `FeedEntry` per `<item>`. Broken XML
/// and XML without an `<rss>`/`<channel>` element are both fetch failures.
pub fn parse_feed(url: &str, xml: &str) -> Result<Vec<FeedEntry>, DiaryError> {
    read_items(xml)
        .map_err(|e| DiaryError::fetch(url, e))?
        .ok_or_else(|| DiaryError::fetch(url, "not an RSS document"))
}

/// `None` when the document never opens an `<rss>` or `<channel>` element.
fn read_items(xml: &str) -> Result<Option<Vec<FeedEntry>>, quick_xml::Error> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut entries = Vec::new();
    let mut current: Option<FeedEntry> = None;
    let mut field: Option<ItemField> = None;
    let mut text = String::new();
    let mut buf = Vec::new();
    let mut is_rss = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"rss" | b"channel" => is_rss = true,
                b"item" => current = Some(FeedEntry::default()),
                tag if current.is_some() => {
                    field = ItemField::from_tag(tag);
                    text.clear();
                }
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if let (Some(entry), Some(f)) = (current.as_mut(), ItemField::from_tag(e.name().as_ref())) {
                    entry.set(f, String::new());
                }
            }
            Ok(Event::Text(e)) if field.is_some() => {
                text.push_str(&e.unescape()?);
            }
            Ok(Event::CData(e)) if field.is_some() => {
                text.push_str(&String::from_utf8_lossy(&e));
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"item" => {
                    if let Some(entry) = current.take() {
                        debug!(title = ?entry.title, "parsed feed item");
                        entries.push(entry);
                    }
                    field = None;
                }
                tag => {
                    if let (Some(entry), Some(f)) = (current.as_mut(), field) {
                        if ItemField::from_tag(tag) == Some(f) {
                            entry.set(f, text.trim().to_string());
                            field = None;
                        }
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e),
            _ => {}
        }
        buf.clear();
    }
    Ok(is_rss.then_some(entries))
}
