//! Pull (artist, album) pairs out of the model's bullet-list reply.
//!
//! The system prompt asks for `- Artist - Album [Genre] (Release Date)`.
//! The model does not always comply, so every line is parsed on its own
//! and anything that does not fit is dropped without affecting its
//! neighbours.

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::Serialize;
use tracing::debug;

static GENRE_ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\[.*?\]").expect("genre annotation pattern is valid"));
static DATE_ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(.*?\)").expect("date annotation pattern is valid"));

const BULLET: &str = "- ";
const ARTIST_SEPARATOR: &str = " - ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendationPair {
    pub artist: String,
    pub album: String,
}

impl RecommendationPair {
    pub fn new(artist: impl Into<String>, album: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            album: album.into(),
        }
    }
}

/// Parse one reply line, `None` if it is not a recommendation bullet.
pub fn parse_recommendation_line(line: &str) -> Option<RecommendationPair> {
    let body = line.trim().strip_prefix(BULLET)?;
    let Some((artist, rest)) = body.split_once(ARTIST_SEPARATOR) else {
        debug!(line = %body, "Could not parse recommendation line");
        return None;
    };

    let album = GENRE_ANNOTATION.replace(rest.trim(), "");
    let album = DATE_ANNOTATION.replace(&album, "");
    Some(RecommendationPair::new(artist.trim(), album.trim()))
}

/// Every recommendation in `text`, in line order.
pub fn parse_recommendations(text: &str) -> Vec<RecommendationPair> {
    text.lines().filter_map(parse_recommendation_line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_line() {
        let pairs =
            parse_recommendations("- Opeth - Blackwater Park [Progressive Metal] (August 27, 2001)");
        assert_eq!(pairs, vec![RecommendationPair::new("Opeth", "Blackwater Park")]);
    }

    #[test]
    fn garbage_line_does_not_affect_neighbours() {
        let text = "\
Here are some picks:
- garbage line
- Metallica - Master of Puppets [Thrash Metal] (March 3, 1986)
* Slayer - Reign in Blood [Thrash Metal] (October 7, 1986)
  - Iron Maiden - The Number of the Beast [Heavy Metal] (March 22, 1982)
Enjoy!";
        let pairs = parse_recommendations(text);
        assert_eq!(
            pairs,
            vec![
                RecommendationPair::new("Metallica", "Master of Puppets"),
                RecommendationPair::new("Iron Maiden", "The Number of the Beast"),
            ]
        );
    }

    #[test]
    fn missing_annotations_are_fine() {
        let pairs = parse_recommendations("- Ulcerate - Cutting the Throat of God");
        assert_eq!(pairs, vec![RecommendationPair::new("Ulcerate", "Cutting the Throat of God")]);

        let pairs = parse_recommendations("- Ulcerate - Cutting the Throat of God (June 14, 2024)");
        assert_eq!(pairs[0].album, "Cutting the Throat of God");
    }

    #[test]
    fn only_first_annotation_of_each_kind_is_removed() {
        let pairs = parse_recommendations(
            "- Bathory - Hammerheart [Viking Metal] [Black Metal] (April 16, 1990)",
        );
        assert_eq!(pairs[0].album, "Hammerheart [Black Metal]");
    }

    #[test]
    fn album_containing_dash_keeps_it() {
        let pairs = parse_recommendations("- Emperor - Anthems - Live [Black Metal] (2000)");
        assert_eq!(pairs[0].artist, "Emperor");
        assert_eq!(pairs[0].album, "Anthems - Live");
    }

    #[test]
    fn empty_text_has_no_pairs() {
        assert!(parse_recommendations("").is_empty());
        assert!(parse_recommendations("No recent releases found for the specified genres.").is_empty());
    }
}
