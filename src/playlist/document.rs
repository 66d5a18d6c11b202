//! Persisted playlist document (DJPlaylist.xml)
//!
//! ```xml
//! <PLAYLIST>
//!   <TRACK title="Intro" url="file:///music/Intro.wav" length="185.2"/>
//! </PLAYLIST>
//! ```
//!
//! `url` is required and must be a local `file://` URI. `title` falls back to
//! the url's file name, `length` to 0.

use crate::error::PlaylistError;
use crate::model::{sanitize_duration, TrackRecord, TrackSource};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

const ROOT_TAG: &[u8] = b"PLAYLIST";
const TRACK_TAG: &[u8] = b"TRACK";

/// Attributes of one `<TRACK>` element as found in the file
#[derive(Debug, Default)]
struct TrackEntry {
    title: Option<String>,
    url: Option<String>,
    length: Option<String>,
}

impl TrackEntry {
    fn from_element(element: &BytesStart) -> Option<Self> {
        let mut entry = Self::default();

        for attr in element.attributes() {
            let attr = attr.ok()?;
            let value = attr.unescape_value().ok()?.into_owned();
            match attr.key.as_ref() {
                b"title" => entry.title = Some(value),
                b"url" => entry.url = Some(value),
                b"length" => entry.length = Some(value),
                _ => {}
            }
        }

        Some(entry)
    }

    /// Convert to a record, or explain why the entry is skipped
    fn into_record(self) -> Result<TrackRecord, &'static str> {
        let url = self.url.ok_or("missing url")?;
        let source = TrackSource::from_uri(url).normalized();
        if !source.is_local() {
            return Err("url is not a local file");
        }

        let duration_secs = match self.length {
            Some(length) => length.trim().parse::<f64>().map(sanitize_duration).unwrap_or(0.0),
            None => 0.0,
        };

        Ok(match self.title {
            Some(title) => TrackRecord::with_title(title, source, duration_secs),
            None => TrackRecord::new(source, duration_secs),
        })
    }
}

/// Read a playlist document from disk
pub fn read_playlist(path: &Path) -> Result<Vec<TrackRecord>, PlaylistError> {
    let file = File::open(path).map_err(|source| PlaylistError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_playlist(BufReader::new(file))
}

/// Parse a playlist document, skipping malformed and duplicate entries
pub fn parse_playlist<R: BufRead>(input: R) -> Result<Vec<TrackRecord>, PlaylistError> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().trim_text(true);

    let mut state = ParseState::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                state.element(&e)?;
                state.depth += 1;
            }

            Ok(Event::Empty(e)) => state.element(&e)?,

            Ok(Event::End(_)) => state.depth = state.depth.saturating_sub(1),

            Ok(Event::Eof) => break,

            Err(e) => {
                log::warn!(
                    "Playlist XML error at position {}: {:?}",
                    reader.buffer_position(),
                    e
                );
                return Err(e.into());
            }

            _ => {}
        }

        buf.clear();
    }

    Ok(state.records)
}

/// Position within the document and the entries accepted so far
#[derive(Default)]
struct ParseState {
    records: Vec<TrackRecord>,
    seen: HashSet<String>,
    depth: usize,
    root_seen: bool,
}

impl ParseState {
    /// Handle an opening (or self-closing) element
    fn element(&mut self, element: &BytesStart) -> Result<(), PlaylistError> {
        let name = element.name();

        if !self.root_seen {
            if name.as_ref() != ROOT_TAG {
                return Err(PlaylistError::UnexpectedRoot(
                    String::from_utf8_lossy(name.as_ref()).into_owned(),
                ));
            }
            self.root_seen = true;
            return Ok(());
        }

        // Only direct children of the root are entries
        if self.depth != 1 || name.as_ref() != TRACK_TAG {
            return Ok(());
        }

        let record = TrackEntry::from_element(element)
            .ok_or("unreadable attribute")
            .and_then(TrackEntry::into_record);

        match record {
            Ok(record) if self.seen.insert(record.source.as_str().to_string()) => {
                self.records.push(record);
            }
            Ok(record) => log::debug!("Skipping duplicate playlist entry: {}", record.source),
            Err(reason) => log::warn!("Skipping playlist entry: {}", reason),
        }

        Ok(())
    }
}

/// Write a playlist document, replacing any existing file
///
/// The document is rendered into a sibling temp file which is then renamed
/// over `path`, so a failed write leaves the previous playlist intact.
pub fn write_playlist(path: &Path, records: &[TrackRecord]) -> Result<(), PlaylistError> {
    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            std::fs::create_dir_all(parent).map_err(|source| PlaylistError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
            parent
        }
        None => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(parent).map_err(|source| PlaylistError::Io {
        path: parent.to_path_buf(),
        source,
    })?;

    {
        let mut out = BufWriter::new(staged.as_file_mut());
        render_playlist(&mut out, records)?;
        out.flush()?;
    }

    staged.persist(path).map_err(|err| PlaylistError::Io {
        path: path.to_path_buf(),
        source: err.error,
    })?;
    Ok(())
}

/// Serialize records into `out` in order
pub fn render_playlist<W: Write>(out: W, records: &[TrackRecord]) -> Result<(), PlaylistError> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("PLAYLIST")))?;

    for record in records {
        let length = record.duration_secs.to_string();
        let mut track = BytesStart::new("TRACK");
        track.push_attribute(("title", record.title.as_str()));
        track.push_attribute(("url", record.source.as_str()));
        track.push_attribute(("length", length.as_str()));
        writer.write_event(Event::Empty(track))?;
    }

    writer.write_event(Event::End(BytesEnd::new("PLAYLIST")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(doc: &str) -> Result<Vec<TrackRecord>, PlaylistError> {
        parse_playlist(doc.as_bytes())
    }

    #[test]
    fn test_parse_skips_non_local_entries() {
        let records = parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <PLAYLIST>
              <TRACK title="Stream" url="https://radio.example/live.mp3" length="0"/>
              <TRACK title="Intro" url="file:///music/Intro.wav" length="185.25"/>
            </PLAYLIST>"#,
        )
        .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Intro");
        assert_eq!(records[0].source.as_str(), "file:///music/Intro.wav");
        assert!((records[0].duration_secs - 185.25).abs() < 1e-9);
    }

    #[test]
    fn test_parse_defaults_and_malformed_fields() {
        let records = parse(
            r#"<PLAYLIST>
              <TRACK title="No url"/>
              <TRACK url="file:///music/Untitled%20Beat.mp3"/>
              <TRACK title="Bad length" url="file:///music/b.wav" length="soon"/>
              <TRACK title="Negative" url="file:///music/c.wav" length="-3"/>
            </PLAYLIST>"#,
        )
        .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].title, "Untitled Beat");
        assert_eq!(records[0].duration_secs, 0.0);
        assert_eq!(records[1].duration_secs, 0.0);
        assert_eq!(records[2].duration_secs, 0.0);
    }

    #[test]
    fn test_parse_normalizes_unencoded_urls() {
        let records = parse(
            r#"<PLAYLIST>
              <TRACK title="My Song" url="file:///music/My Song.wav"/>
              <TRACK title="My Song" url="file:///music/My%20Song.wav"/>
            </PLAYLIST>"#,
        )
        .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source.as_str(), "file:///music/My%20Song.wav");
        assert_eq!(
            records[0].source,
            TrackSource::from_path(Path::new("/music/My Song.wav"))
        );
    }

    #[test]
    fn test_parse_drops_duplicate_urls() {
        let records = parse(
            r#"<PLAYLIST>
              <TRACK title="a" url="file:///music/a.wav"/>
              <TRACK title="a again" url="file:///music/a.wav"/>
            </PLAYLIST>"#,
        )
        .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "a");
    }

    #[test]
    fn test_parse_ignores_nested_tracks() {
        let records = parse(
            r#"<PLAYLIST>
              <FOLDER><TRACK title="nested" url="file:///music/n.wav"/></FOLDER>
              <TRACK title="top" url="file:///music/t.wav"></TRACK>
            </PLAYLIST>"#,
        )
        .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "top");
    }

    #[test]
    fn test_parse_rejects_other_roots() {
        let result = parse(r#"<rhythmdb><entry/></rhythmdb>"#);
        assert!(matches!(result, Err(PlaylistError::UnexpectedRoot(ref name)) if name == "rhythmdb"));
    }

    #[test]
    fn test_parse_rejects_broken_markup() {
        assert!(parse(r#"<PLAYLIST><TRACK url="file:///a.wav"></PLAYLIST>"#).is_err());
    }

    #[test]
    fn test_render_escapes_markup() {
        let records = vec![TrackRecord::with_title(
            "Drum & Bass <Live> \"edit\"".to_string(),
            TrackSource::from_uri("file:///music/dnb.wav"),
            90.5,
        )];

        let mut out = Vec::new();
        render_playlist(&mut out, &records).unwrap();

        let text = String::from_utf8(out.clone()).unwrap();
        assert!(text.starts_with("<?xml"));
        assert!(text.contains("&amp;"));

        let parsed = parse_playlist(out.as_slice()).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_write_replaces_existing_document_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("DJPlaylist.xml");
        std::fs::write(&path, "<PLAYLIST/>").unwrap();

        let records = vec![TrackRecord::with_title(
            "Opener".to_string(),
            TrackSource::from_uri("file:///music/opener.wav"),
            212.0,
        )];
        write_playlist(&path, &records).unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("DJPlaylist.xml")]);
        assert_eq!(read_playlist(&path).unwrap(), records);
    }
}
