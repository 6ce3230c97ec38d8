/// One film diary entry, normalized for rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieRecord {
    pub poster: Option<String>,
    pub title: String,
    pub year: String,
    pub rating: String,
    pub watched_date: String,
    pub rewatch: Rewatch,
    pub review: String,
    pub review_link: String,
    pub movie_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Rewatch {
    Yes,
    #[default]
    No,
}

impl Rewatch {
    /// The feed spells the flag "Yes"/"No"; anything else counts as a first watch.
    pub fn from_feed(value: &str) -> Self {
        if value.trim() == "Yes" {
            Self::Yes
        } else {
            Self::No
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

/// Record fields in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Poster,
    Title,
    Year,
    Rating,
    WatchedDate,
    Rewatch,
    Review,
    ReviewLink,
}

pub const FIELDS: &[Field] = &[
    Field::Poster,
    Field::Title,
    Field::Year,
    Field::Rating,
    Field::WatchedDate,
    Field::Rewatch,
    Field::Review,
    Field::ReviewLink,
];

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Self::Poster => "poster",
            Self::Title => "title",
            Self::Year => "year",
            Self::Rating => "rating",
            Self::WatchedDate => "watched_date",
            Self::Rewatch => "rewatch",
            Self::Review => "review",
            Self::ReviewLink => "review_link",
        }
    }

    /// Header label: every alphabetic run capitalized, e.g. `Watched_Date`.
    pub fn label(self) -> String {
        let mut out = String::new();
        let mut start = true;
        for c in self.name().chars() {
            if c.is_alphabetic() {
                if start {
                    out.extend(c.to_uppercase());
                } else {
                    out.extend(c.to_lowercase());
                }
                start = false;
            } else {
                out.push(c);
                start = true;
            }
        }
        out
    }
}

impl MovieRecord {
    /// Plain text value of a field. `Poster` yields the bare URL, or "" when absent.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Poster => self.poster.as_deref().unwrap_or(""),
            Field::Title => &self.title,
            Field::Year => &self.year,
            Field::Rating => &self.rating,
            Field::WatchedDate => &self.watched_date,
            Field::Rewatch => self.rewatch.as_str(),
            Field::Review => &self.review,
            Field::ReviewLink => &self.review_link,
        }
    }
}
