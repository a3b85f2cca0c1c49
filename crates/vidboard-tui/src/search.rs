//! Client-side search over already-fetched videos.

use std::time::{Duration, Instant};
use vidboard_proto::catalog::VideoResult;

/// Holds the most recent raw input until it has been stable for `delay`.
///
/// Every `push` restarts the countdown; `poll` hands out the value once the
/// deadline passes, then forgets it.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn push(&mut self, value: impl Into<String>, now: Instant) {
        self.pending = Some((value.into(), now + self.delay));
    }

    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Case-insensitive substring match against title or description.
///
/// A blank (empty or whitespace-only) term matches everything.  A non-blank
/// term is used as typed, surrounding spaces included.
pub fn video_matches(video: &VideoResult, term: &str) -> bool {
    if term.trim().is_empty() {
        return true;
    }
    let term = term.to_lowercase();
    video.snippet.title.to_lowercase().contains(&term)
        || video
            .snippet
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&term))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidboard_proto::catalog::{Snippet, Thumbnails, VideoId};

    fn video(title: &str, description: Option<&str>) -> VideoResult {
        VideoResult {
            id: VideoId {
                video_id: title.to_lowercase(),
                channel_id: None,
            },
            snippet: Snippet {
                title: title.to_string(),
                description: description.map(str::to_string),
                live_broadcast_content: "none".to_string(),
                thumbnails: Thumbnails::default(),
            },
        }
    }

    fn filter_videos<'a>(videos: &'a [VideoResult], term: &str) -> Vec<&'a VideoResult> {
        videos.iter().filter(|v| video_matches(v, term)).collect()
    }

    #[test]
    fn test_matches_title_or_description() {
        let videos = vec![
            video("Cats", None),
            video("Dogs", Some("Feral cat colony")),
            video("Birds", Some("Parrots")),
        ];
        let found: Vec<&str> = filter_videos(&videos, "cat")
            .iter()
            .map(|v| v.snippet.title.as_str())
            .collect();
        assert_eq!(found, vec!["Cats", "Dogs"]);
    }

    #[test]
    fn test_blank_term_matches_everything() {
        let videos = vec![video("Cats", None), video("Dogs", None)];
        assert_eq!(filter_videos(&videos, "").len(), 2);
        assert_eq!(filter_videos(&videos, "   ").len(), 2);
    }

    #[test]
    fn test_term_is_not_trimmed() {
        let v = video("Cats", Some("cute"));
        assert!(video_matches(&v, "CATS"));
        assert!(!video_matches(&v, "cats "));
    }

    #[test]
    fn test_debounce_restarts_on_each_push() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(500));
        d.push("c", t0);
        d.push("ca", t0 + Duration::from_millis(300));
        assert_eq!(d.poll(t0 + Duration::from_millis(600)), None);
        d.push("cat", t0 + Duration::from_millis(700));
        assert_eq!(d.poll(t0 + Duration::from_millis(1100)), None);
        assert_eq!(
            d.poll(t0 + Duration::from_millis(1200)),
            Some("cat".to_string())
        );
        assert!(!d.is_pending());
        assert_eq!(d.poll(t0 + Duration::from_millis(5000)), None);
    }

    #[test]
    fn test_cancel_drops_pending_value() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(500));
        d.push("dog", t0);
        d.cancel();
        assert_eq!(d.poll(t0 + Duration::from_secs(1)), None);
    }
}
