use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::DiaryError;
use crate::record::{Field, MovieRecord, Rewatch, FIELDS};

pub const NO_DATA: &str = "No movie data available.";
pub const REWATCH_SUFFIX: &str = " 🔁";
const POSTER_WIDTH: &str = "100px";
const POSTER_HEIGHT: &str = "150px";

/// Render the diary as a Markdown document: heading, then a table with one
/// row per record, or a short notice when there are no records.
pub fn render_markdown(title: &str, records: &[MovieRecord]) -> String {
    let mut out = format!("# {}\n\n", title);

    if records.is_empty() {
        out.push_str(NO_DATA);
        out.push('\n');
        return out;
    }

    let columns: Vec<Field> = FIELDS.iter().copied().filter(|f| *f != Field::Rewatch).collect();

    let labels: Vec<String> = columns.iter().map(|f| f.label()).collect();
    push_row(&mut out, &labels);
    push_row(&mut out, &vec!["---".to_string(); columns.len()]);

    for record in records {
        let cells: Vec<String> = columns.iter().map(|f| render_cell(record, *f)).collect();
        push_row(&mut out, &cells);
    }
    out
}

fn push_row(out: &mut String, cells: &[String]) {
    out.push_str("| ");
    out.push_str(&cells.join(" | "));
    out.push_str(" |\n");
}

pub fn render_cell(record: &MovieRecord, field: Field) -> String {
    match field {
        Field::Poster => format!(
            r#"<img src="{}" width="{}" height="{}">"#,
            escape_cell(record.value(Field::Poster)),
            POSTER_WIDTH,
            POSTER_HEIGHT
        ),
        Field::WatchedDate if record.rewatch == Rewatch::Yes => {
            format!("{}{}", escape_cell(&record.watched_date), REWATCH_SUFFIX)
        }
        other => escape_cell(record.value(other)),
    }
}

/// Keep a value inside its table cell: pipes escaped, line breaks folded.
fn escape_cell(value: &str) -> String {
    let folded = if value.contains('\n') {
        value
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        value.to_string()
    };
    folded.replace('|', "\\|")
}

/// Render and write the document. The file is written next to the target and
/// renamed into place, so a failed write never leaves a partial file at `path`.
pub fn write_markdown(path: &Path, title: &str, records: &[MovieRecord]) -> Result<(), DiaryError> {
    let doc = render_markdown(title, records);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| DiaryError::write(parent, e))?;
    }

    let tmp = tmp_path(path);
    let result = write_file(&tmp, &doc).and_then(|_| fs::rename(&tmp, path));
    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(DiaryError::write(path, e));
    }

    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::summary::extract_poster_and_review;

    fn record(title: &str, rewatch: Rewatch) -> MovieRecord {
        MovieRecord {
            poster: Some("http://x/img.jpg".into()),
            title: title.into(),
            year: "2024".into(),
            rating: "★★★½".into(),
            watched_date: "2024-01-01".into(),
            rewatch,
            review: "Great film!".into(),
            review_link: "https://letterboxd.com/u/film/x/".into(),
            movie_id: None,
        }
    }

    #[test]
    fn header_and_separator() {
        let md = render_markdown("Watched Movies", &[record("A", Rewatch::No)]);
        let lines: Vec<&str> = md.lines().collect();
        assert_eq!(lines[0], "# Watched Movies");
        assert_eq!(lines[1], "");
        assert_eq!(
            lines[2],
            "| Poster | Title | Year | Rating | Watched_Date | Review | Review_Link |"
        );
        assert_eq!(lines[3], "| --- | --- | --- | --- | --- | --- | --- |");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn no_rewatch_column() {
        let md = render_markdown("t", &[record("A", Rewatch::Yes)]);
        assert!(!md.contains("Rewatch"));
        let row = md.lines().nth(4).unwrap();
        assert!(!row.contains("| Yes |"));
    }

    #[test]
    fn full_row() {
        let md = render_markdown("t", &[record("A", Rewatch::No)]);
        assert_eq!(
            md.lines().nth(4).unwrap(),
            r#"| <img src="http://x/img.jpg" width="100px" height="150px"> | A | 2024 | ★★★½ | 2024-01-01 | Great film! | https://letterboxd.com/u/film/x/ |"#
        );
    }

    #[test]
    fn rewatch_marks_date() {
        let yes = render_cell(&record("A", Rewatch::Yes), Field::WatchedDate);
        let no = render_cell(&record("A", Rewatch::No), Field::WatchedDate);
        assert_eq!(yes, "2024-01-01 🔁");
        assert!(yes.ends_with(REWATCH_SUFFIX));
        assert!(!no.ends_with(REWATCH_SUFFIX));
    }

    #[test]
    fn missing_poster_renders_empty_src() {
        let mut r = record("A", Rewatch::No);
        r.poster = None;
        assert_eq!(
            render_cell(&r, Field::Poster),
            r#"<img src="" width="100px" height="150px">"#
        );
    }

    #[test]
    fn rows_keep_record_order() {
        let records = [record("First", Rewatch::No), record("Second", Rewatch::No)];
        let md = render_markdown("t", &records);
        let rows: Vec<&str> = md.lines().skip(4).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains("| First |"));
        assert!(rows[1].contains("| Second |"));
    }

    #[test]
    fn cell_text_stays_on_one_row() {
        let mut r = record("A", Rewatch::No);
        r.review = "line one\n\nline | two".into();
        assert_eq!(render_cell(&r, Field::Review), "line one line \\| two");
    }

    #[test]
    fn poster_url_pipe_escaped() {
        let mut r = record("A", Rewatch::No);
        r.poster = Some("http://x/a|b.jpg".into());
        let cell = render_cell(&r, Field::Poster);
        assert_eq!(cell, r#"<img src="http://x/a\|b.jpg" width="100px" height="150px">"#);

        let md = render_markdown("t", &[r]);
        let row = md.lines().nth(4).unwrap();
        assert_eq!(row.matches(" | ").count(), 6, "row split: {}", row);
    }

    #[test]
    fn blank_rating_kept() {
        let mut r = record("A", Rewatch::No);
        r.rating = " ".into();
        assert_eq!(render_cell(&r, Field::Rating), " ");
    }

    #[test]
    fn empty_records() {
        let md = render_markdown("Watched Movies", &[]);
        assert_eq!(md, "# Watched Movies\n\nNo movie data available.\n");
        assert!(!md.contains('|'));
    }

    #[test]
    fn end_to_end_cells() {
        let (poster, review) =
            extract_poster_and_review(r#"<p><img src="http://x/img.jpg"></p><p>Great film!</p>"#);
        let r = MovieRecord {
            poster,
            review,
            rating: crate::parser::rating::stars("3.5", Default::default()).to_string(),
            watched_date: "2024-01-01".into(),
            rewatch: Rewatch::Yes,
            ..Default::default()
        };
        assert_eq!(r.poster.as_deref(), Some("http://x/img.jpg"));
        assert_eq!(render_cell(&r, Field::Review), "Great film!");
        assert_eq!(render_cell(&r, Field::Rating), "★★★½");
        assert_eq!(render_cell(&r, Field::WatchedDate), "2024-01-01 🔁");
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/diary.md");
        write_markdown(&path, "Watched Movies", &[record("A", Rewatch::No)]).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Watched Movies\n\n| Poster |"));
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn failed_write_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        // Renaming a file over a directory fails.
        let path = dir.path().join("taken");
        std::fs::create_dir(&path).unwrap();
        let err = write_markdown(&path, "t", &[]).unwrap_err();
        assert!(matches!(err, DiaryError::Write { .. }));
        assert!(!tmp_path(&path).exists());
        assert!(path.is_dir());
    }

    #[test]
    fn parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let err = write_markdown(&blocker.join("diary.md"), "t", &[]).unwrap_err();
        assert!(matches!(err, DiaryError::Write { .. }));
    }
}
