use std::future::Future;

use eyre::{Result, bail};
use log::{debug, info};
use regex::Regex;
use serde::Deserialize;

use crate::error::Error;
use crate::{Segment, Transcript, VideoId};

pub const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Source of caption transcripts
pub trait TranscriptProvider {
    fn fetch(&self, video_id: &VideoId) -> impl Future<Output = Result<Transcript, Error>>;
}

#[derive(Debug, Deserialize)]
struct InnerTubePlayerResponse {
    #[serde(rename = "playabilityStatus")]
    playability_status: Option<PlayabilityStatus>,
    captions: Option<CaptionsData>,
    #[serde(rename = "videoDetails")]
    video_details: Option<VideoDetails>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: String,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoDetails {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    player_captions_tracklist_renderer: Option<CaptionTracklistRenderer>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklistRenderer {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
}

/// Fetches transcripts from YouTube's built-in captions via the InnerTube API
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    client: reqwest::Client,
    lang: String,
    base_url: String,
}

/// Outcome of the player call, before the caption track is downloaded
enum TrackLookup {
    Found { track: CaptionTrack, title: String },
    VideoUnavailable(Option<String>),
    CaptionsDisabled,
    NoTracks,
}

impl YouTubeClient {
    pub fn new(client: reqwest::Client, lang: impl Into<String>) -> Self {
        Self {
            client,
            lang: lang.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn lookup_track(&self, video_id: &VideoId) -> Result<TrackLookup> {
        // Step 1: Fetch the watch page to get the InnerTube API key
        let watch_url = format!("{}/watch?v={video_id}", self.base_url);
        debug!("Fetching watch page: {watch_url}");

        let page_html = self
            .client
            .get(&watch_url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let api_key = extract_api_key(&page_html)?;
        debug!("Extracted InnerTube API key: {api_key}");

        // Step 2: Call InnerTube player endpoint
        let player_url = format!("{}/youtubei/v1/player?key={api_key}&prettyPrint=false", self.base_url);

        let body = serde_json::json!({
            "context": {
                "client": {
                    "hl": self.lang,
                    "gl": "US",
                    "clientName": "WEB",
                    "clientVersion": "2.20241126.01.00"
                }
            },
            "videoId": video_id.as_str()
        });

        let resp: InnerTubePlayerResponse = self
            .client
            .post(&player_url)
            .header("User-Agent", USER_AGENT)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(select_track(resp, &self.lang))
    }

    async fn download_track(&self, track: &CaptionTrack) -> Result<Vec<Segment>> {
        let caption_xml = self
            .client
            .get(&track.base_url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_caption_xml(&caption_xml)
    }
}

impl TranscriptProvider for YouTubeClient {
    async fn fetch(&self, video_id: &VideoId) -> Result<Transcript, Error> {
        let lookup = self.lookup_track(video_id).await.map_err(|e| Error::Fetch(e.to_string()))?;

        let (track, title) = match lookup {
            TrackLookup::Found { track, title } => (track, title),
            TrackLookup::VideoUnavailable(reason) => {
                return Err(Error::VideoUnavailable {
                    video_id: video_id.to_string(),
                    reason,
                });
            }
            TrackLookup::CaptionsDisabled | TrackLookup::NoTracks => {
                return Err(Error::TranscriptUnavailable {
                    video_id: video_id.to_string(),
                });
            }
        };

        debug!("Using caption track: lang={}", track.language_code);
        let segments = self.download_track(&track).await.map_err(|e| Error::Fetch(e.to_string()))?;

        if segments.is_empty() {
            return Err(Error::TranscriptUnavailable {
                video_id: video_id.to_string(),
            });
        }

        info!("Fetched {} caption segments for {video_id}", segments.len());
        Ok(Transcript {
            video_id: video_id.to_string(),
            title,
            language: track.language_code,
            segments,
        })
    }
}

fn select_track(resp: InnerTubePlayerResponse, lang: &str) -> TrackLookup {
    if let Some(status) = resp.playability_status
        && status.status != "OK"
    {
        debug!("Video not playable: status={} reason={:?}", status.status, status.reason);
        return TrackLookup::VideoUnavailable(status.reason);
    }

    let title = resp
        .video_details
        .and_then(|vd| vd.title)
        .unwrap_or_default();

    let Some(captions) = resp.captions else {
        return TrackLookup::CaptionsDisabled;
    };

    let mut tracks = captions
        .player_captions_tracklist_renderer
        .and_then(|r| r.caption_tracks)
        .unwrap_or_default();

    if tracks.is_empty() {
        return TrackLookup::NoTracks;
    }

    // Find the requested language track, or fall back to the first available
    let index = tracks.iter().position(|t| t.language_code == lang).unwrap_or(0);
    TrackLookup::Found {
        track: tracks.swap_remove(index),
        title,
    }
}

fn extract_api_key(html: &str) -> Result<String> {
    let re = Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#)?;
    if let Some(caps) = re.captures(html) {
        return Ok(caps[1].to_string());
    }

    // Fallback: try the newer pattern
    let re2 = Regex::new(r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#)?;
    if let Some(caps) = re2.captures(html) {
        return Ok(caps[1].to_string());
    }

    bail!("could not extract InnerTube API key from watch page");
}

fn parse_caption_xml(xml: &str) -> Result<Vec<Segment>> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut current_start: Option<f64> = None;
    let mut current_dur: Option<f64> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => {
                let mut start = None;
                let mut dur = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"start" => {
                            start = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                        }
                        b"dur" => {
                            dur = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                        }
                        _ => {}
                    }
                }
                current_start = start;
                // Some tracks omit dur on the final cue
                current_dur = dur.or(Some(0.0));
            }
            Ok(Event::Text(ref e)) => {
                if let (Some(start), Some(dur)) = (current_start.take(), current_dur.take()) {
                    let raw_text = e.unescape().unwrap_or_default().to_string();
                    let text = html_escape::decode_html_entities(&raw_text).trim().to_string();
                    if !text.is_empty() {
                        segments.push(Segment {
                            text,
                            start,
                            duration: dur,
                        });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => bail!("error parsing caption XML: {e}"),
            _ => {}
        }
    }

    Ok(segments)
}
