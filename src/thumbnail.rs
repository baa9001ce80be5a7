//! Thumbnail locations, loading and preview cache.
//!
//! Thumbnails are only ever requested for hits that have been on screen, and
//! each id is requested at most once. Loads run on spawned tasks and report
//! back to the event loop over a channel.

use std::collections::HashMap;
use std::path::PathBuf;

use image::imageops::{self, FilterType};
use image::RgbImage;
use tokio::sync::mpsc;

use crate::error::{ThumbnailError, ThumbnailResult};

/// Size directory the thumbnail generator writes to
pub const THUMBNAIL_SIZE: &str = "320x240";

/// Decoded thumbnails are kept at most this large; cell previews never need more.
const MAX_SOURCE_WIDTH: u32 = 96;
const MAX_SOURCE_HEIGHT: u32 = 72;

/// Where thumbnails are served from.
#[derive(Debug, Clone, PartialEq)]
pub enum ThumbnailSource {
    /// Server root; thumbnails live under `/images/<size>/<id>`
    Http(String),
    /// Local thumbnail directory containing `<size>/<id>`
    Dir(PathBuf),
}

/// Location of the thumbnail for hit `id`. Over HTTP each `/`-separated
/// part of the id is percent-encoded as its own path segment.
pub fn thumbnail_location(source: &ThumbnailSource, id: &str) -> String {
    match source {
        ThumbnailSource::Http(base) => http_location(base, id),
        ThumbnailSource::Dir(dir) => dir
            .join(THUMBNAIL_SIZE)
            .join(id)
            .to_string_lossy()
            .into_owned(),
    }
}

fn http_location(base: &str, id: &str) -> String {
    if let Ok(mut url) = reqwest::Url::parse(base) {
        let pushed = match url.path_segments_mut() {
            Ok(mut segments) => {
                segments
                    .pop_if_empty()
                    .push("images")
                    .push(THUMBNAIL_SIZE)
                    .extend(id.split('/'));
                true
            }
            Err(()) => false,
        };
        if pushed {
            return url.to_string();
        }
    }

    // Not a URL reqwest could fetch anyway; the request error reports it
    format!(
        "{}/images/{}/{}",
        base.trim_end_matches('/'),
        THUMBNAIL_SIZE,
        id
    )
}

/// Result of one load, sent back to the event loop.
#[derive(Debug)]
pub struct ThumbnailLoaded {
    pub id: String,
    pub result: ThumbnailResult<RgbImage>,
}

#[derive(Debug)]
pub struct Thumbnail {
    source: RgbImage,
    /// Last preview and the pixel box it was fitted to
    preview: Option<((u32, u32), RgbImage)>,
}

impl Thumbnail {
    pub fn new(source: RgbImage) -> Self {
        Self {
            source,
            preview: None,
        }
    }

    /// The thumbnail scaled to fit `width`×`height` pixels, aspect preserved.
    pub fn preview(&mut self, width: u32, height: u32) -> &RgbImage {
        let target = (width.max(1), height.max(1));
        let stale = self.preview.as_ref().is_none_or(|(size, _)| *size != target);
        if stale {
            let (w, h) = fit(self.source.dimensions(), target);
            let scaled = imageops::resize(&self.source, w, h, FilterType::Triangle);
            self.preview = Some((target, scaled));
        }

        match &self.preview {
            Some((_, image)) => image,
            None => &self.source,
        }
    }
}

fn fit((src_w, src_h): (u32, u32), (max_w, max_h): (u32, u32)) -> (u32, u32) {
    if src_w == 0 || src_h == 0 {
        return (1, 1);
    }
    let scale = (max_w as f64 / src_w as f64).min(max_h as f64 / src_h as f64);
    let w = ((src_w as f64 * scale).round() as u32).clamp(1, max_w);
    let h = ((src_h as f64 * scale).round() as u32).clamp(1, max_h);
    (w, h)
}

#[derive(Debug)]
pub enum ThumbnailState {
    Requested,
    Ready(Thumbnail),
    Failed(String),
}

/// Per-id thumbnail state. Entries for ids that are still in the results
/// survive new searches since ids are stable.
#[derive(Debug)]
pub struct ThumbnailStore {
    source: ThumbnailSource,
    states: HashMap<String, ThumbnailState>,
}

impl ThumbnailStore {
    pub fn new(source: ThumbnailSource) -> Self {
        Self {
            source,
            states: HashMap::new(),
        }
    }

    pub fn source(&self) -> &ThumbnailSource {
        &self.source
    }

    /// Mark `id` as requested. Returns `true` only the first time, when the
    /// caller should start a load.
    pub fn request(&mut self, id: &str) -> bool {
        if self.states.contains_key(id) {
            return false;
        }
        self.states.insert(id.to_string(), ThumbnailState::Requested);
        true
    }

    pub fn complete(&mut self, loaded: ThumbnailLoaded) {
        let state = match loaded.result {
            Ok(image) => ThumbnailState::Ready(Thumbnail::new(image)),
            Err(e) => {
                crate::log::log(&format!("Thumbnail {} failed: {}", loaded.id, e));
                ThumbnailState::Failed(e.to_string())
            }
        };
        self.states.insert(loaded.id, state);
    }

    /// Drop finished entries whose id fails `keep`. In-flight requests stay,
    /// so their load isn't started a second time.
    pub fn retain_ids<F>(&mut self, keep: F)
    where
        F: Fn(&str) -> bool,
    {
        self.states
            .retain(|id, state| matches!(state, ThumbnailState::Requested) || keep(id.as_str()));
    }

    pub fn state(&self, id: &str) -> Option<&ThumbnailState> {
        self.states.get(id)
    }

    pub fn state_mut(&mut self, id: &str) -> Option<&mut ThumbnailState> {
        self.states.get_mut(id)
    }

    pub fn loaded_count(&self) -> usize {
        self.states
            .values()
            .filter(|s| matches!(s, ThumbnailState::Ready(_)))
            .count()
    }

    pub fn in_flight_count(&self) -> usize {
        self.states
            .values()
            .filter(|s| matches!(s, ThumbnailState::Requested))
            .count()
    }
}

/// Start loading the thumbnail for `id` on a background task.
pub fn spawn_load(
    http: reqwest::Client,
    source: ThumbnailSource,
    id: String,
    tx: mpsc::Sender<ThumbnailLoaded>,
) {
    tokio::spawn(async move {
        let result = load(&http, &source, &id).await;
        let _ = tx.send(ThumbnailLoaded { id, result }).await;
    });
}

pub async fn load(
    http: &reqwest::Client,
    source: &ThumbnailSource,
    id: &str,
) -> ThumbnailResult<RgbImage> {
    let location = thumbnail_location(source, id);
    let bytes = match source {
        ThumbnailSource::Http(_) => {
            let response = http.get(&location).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ThumbnailError::Status(status.as_u16()));
            }
            response.bytes().await?.to_vec()
        }
        ThumbnailSource::Dir(_) => tokio::fs::read(&location).await?,
    };
    decode(&bytes)
}

/// Decode image bytes and shrink them to the size kept in memory.
pub fn decode(bytes: &[u8]) -> ThumbnailResult<RgbImage> {
    let image = image::load_from_memory(bytes)?;
    Ok(image.thumbnail(MAX_SOURCE_WIDTH, MAX_SOURCE_HEIGHT).to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbImage::from_pixel(width, height, Rgb([200, 40, 40]));
        let mut bytes = vec![];
        DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_locations() {
        let http = ThumbnailSource::Http("http://localhost:7080/".to_string());
        assert_eq!(
            thumbnail_location(&http, "2019/IMG_0001.jpg"),
            "http://localhost:7080/images/320x240/2019/IMG_0001.jpg"
        );
        // Reserved characters stay inside their segment
        assert_eq!(
            thumbnail_location(&http, "a#b?.jpg"),
            "http://localhost:7080/images/320x240/a%23b%3F.jpg"
        );
        let nested = ThumbnailSource::Http("http://photos.lan/gallery".to_string());
        assert_eq!(
            thumbnail_location(&nested, "my photo.jpg"),
            "http://photos.lan/gallery/images/320x240/my%20photo.jpg"
        );

        let dir = ThumbnailSource::Dir(PathBuf::from("/srv/thumbnails"));
        assert_eq!(
            thumbnail_location(&dir, "IMG_0002.jpg"),
            "/srv/thumbnails/320x240/IMG_0002.jpg"
        );
    }

    #[test]
    fn test_decode_shrinks() {
        let image = decode(&png_bytes(320, 240)).unwrap();
        assert_eq!(image.dimensions(), (96, 72));

        assert!(matches!(
            decode(b"not an image"),
            Err(ThumbnailError::Decode(_))
        ));
    }

    #[test]
    fn test_request_once() {
        let mut store = ThumbnailStore::new(ThumbnailSource::Http("http://x".to_string()));
        assert!(store.request("a"));
        assert!(!store.request("a"));
        assert_eq!(store.in_flight_count(), 1);

        store.complete(ThumbnailLoaded {
            id: "a".to_string(),
            result: Ok(RgbImage::new(4, 3)),
        });
        assert_eq!(store.loaded_count(), 1);
        assert!(!store.request("a"));

        store.complete(ThumbnailLoaded {
            id: "b".to_string(),
            result: Err(ThumbnailError::Status(404)),
        });
        assert!(matches!(store.state("b"), Some(ThumbnailState::Failed(_))));
    }

    #[test]
    fn test_retain_drops_finished_entries_only() {
        let mut store = ThumbnailStore::new(ThumbnailSource::Http("http://x".to_string()));
        for id in ["kept", "gone", "broken", "pending"] {
            store.request(id);
        }
        for id in ["kept", "gone"] {
            store.complete(ThumbnailLoaded {
                id: id.to_string(),
                result: Ok(RgbImage::new(4, 3)),
            });
        }
        store.complete(ThumbnailLoaded {
            id: "broken".to_string(),
            result: Err(ThumbnailError::Status(500)),
        });

        store.retain_ids(|id| id == "kept");

        assert!(matches!(store.state("kept"), Some(ThumbnailState::Ready(_))));
        assert!(store.state("gone").is_none());
        assert!(store.state("broken").is_none());
        assert!(matches!(store.state("pending"), Some(ThumbnailState::Requested)));
        assert_eq!(store.loaded_count(), 1);
        assert_eq!(store.in_flight_count(), 1);
        // Dropped ids can be requested again later
        assert!(store.request("gone"));
    }

    #[test]
    fn test_preview_fits_and_caches() {
        let mut thumbnail = Thumbnail::new(RgbImage::new(96, 72));
        assert_eq!(thumbnail.preview(20, 20).dimensions(), (20, 15));
        assert_eq!(thumbnail.preview(40, 15).dimensions(), (20, 15));
        assert_eq!(thumbnail.preview(8, 30).dimensions(), (8, 6));
    }
}
