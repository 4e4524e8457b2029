//! ID3 tag construction and writing.

use std::path::Path;

use id3::frame::{Picture, PictureType};
use id3::{ErrorKind, Tag, TagLike, Version};

use crate::error::Result;
use crate::extract::ExtractedInfo;
use crate::media::genre::classify;

/// MIME type declared for embedded cover art.
const COVER_MIME: &str = "image/jpeg";

/// Tag values derived from extracted metadata, written once to an MP3.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub year: Option<String>,
    pub genre: String,
    pub track: u32,
    pub cover: Option<Vec<u8>>,
}

impl TagSet {
    /// Build tags from extraction metadata and optional cover bytes.
    pub fn from_info(info: &ExtractedInfo, cover: Option<&[u8]>) -> Self {
        let title = non_empty(&info.title);
        let artist = non_empty(&info.uploader)
            .or_else(|| non_empty(&info.artist))
            .or_else(|| non_empty(&info.creator));
        let album = non_empty(&info.album)
            .or_else(|| non_empty(&info.playlist_title))
            .or_else(|| artist.clone());
        let year = info
            .upload_date
            .as_deref()
            .filter(|d| d.chars().count() >= 4)
            .map(|d| d.chars().take(4).collect());
        let genre = classify(
            info.title.as_deref().unwrap_or_default(),
            info.description.as_deref().unwrap_or_default(),
        );

        Self {
            title,
            artist,
            album,
            year,
            genre: genre.to_string(),
            track: 1,
            cover: cover.map(<[u8]>::to_vec),
        }
    }

    /// Write the tags into `path`, keeping any frames already present.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let mut tag = match Tag::read_from_path(path) {
            Ok(tag) => tag,
            Err(e) if is_untagged(&e) => Tag::new(),
            Err(e) => return Err(e.into()),
        };

        self.apply(&mut tag);
        tag.write_to_path(path, Version::Id3v24)?;
        Ok(())
    }

    fn apply(&self, tag: &mut Tag) {
        if let Some(title) = &self.title {
            tag.set_title(title.as_str());
        }
        if let Some(artist) = &self.artist {
            tag.set_artist(artist.as_str());
            tag.set_album_artist(artist.as_str());
        }
        if let Some(album) = &self.album {
            tag.set_album(album.as_str());
        }
        if let Some(year) = &self.year {
            tag.set_text("TDRC", year.as_str());
        }
        tag.set_genre(self.genre.as_str());
        tag.set_track(self.track);

        if let Some(cover) = &self.cover {
            tag.remove_picture_by_type(PictureType::CoverFront);
            tag.add_frame(Picture {
                mime_type: COVER_MIME.to_string(),
                picture_type: PictureType::CoverFront,
                description: "Cover".to_string(),
                data: cover.clone(),
            });
        }
    }
}

/// Files without a tag (including ones too short to hold a header).
fn is_untagged(err: &id3::Error) -> bool {
    match &err.kind {
        ErrorKind::NoTag => true,
        ErrorKind::Io(io) => io.kind() == std::io::ErrorKind::UnexpectedEof,
        _ => false,
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}
