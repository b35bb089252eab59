//! Messages the page posts to the worker.

use serde::{Deserialize, Serialize};

/// A command posted by the page.
///
/// The wire shape is `{"action": "...", ...}` with the remaining fields
/// depending on the action. No acknowledgment is ever sent back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum PageMessage {
    /// Trim the media store down to the renditions the page still shows.
    #[serde(rename = "cleanGiphyCache")]
    CleanGiphyCache {
        /// Rendition URLs currently on the page.
        #[serde(rename = "giphysArray")]
        giphys: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clean_message() {
        let raw = r#"{"action":"cleanGiphyCache","giphysArray":["https://media.giphy.com/media/a/giphy.gif","https://media.giphy.com/media/b/giphy.gif"]}"#;

        let message: PageMessage = serde_json::from_str(raw).unwrap();
        let PageMessage::CleanGiphyCache { giphys } = message;
        assert_eq!(giphys.len(), 2);
        assert_eq!(giphys[0], "https://media.giphy.com/media/a/giphy.gif");
    }

    #[test]
    fn test_serialize_wire_shape() {
        let message = PageMessage::CleanGiphyCache { giphys: vec!["https://m.test/a.gif".to_string()] };
        let json = serde_json::to_string(&message).unwrap();

        assert!(json.contains(r#""action":"cleanGiphyCache""#));
        assert!(json.contains(r#""giphysArray":["https://m.test/a.gif"]"#));
    }

    #[test]
    fn test_unknown_action_rejected() {
        let raw = r#"{"action":"selfDestruct","giphysArray":[]}"#;
        assert!(serde_json::from_str::<PageMessage>(raw).is_err());
    }

    #[test]
    fn test_empty_valid_set_parses() {
        let raw = r#"{"action":"cleanGiphyCache","giphysArray":[]}"#;
        let message: PageMessage = serde_json::from_str(raw).unwrap();
        let PageMessage::CleanGiphyCache { giphys } = message;
        assert!(giphys.is_empty());
    }
}
