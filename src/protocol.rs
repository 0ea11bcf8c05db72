//! Messages exchanged between the UI and the triage core.
//!
//! The wire shape is the one a browser extension would post between its
//! page and background script: an object tagged by `message`.

use serde::{Deserialize, Serialize};

use crate::bookmarks::tree::FlatBookmark;

/// Requests from the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "message", rename_all = "kebab-case")]
pub enum Inbound {
    /// Re-read the host tree and start a fresh pass.
    Collect,
    /// Remove the bookmark from the host and from this pass.
    Delete { id: String },
    /// Keep the bookmark in the host; drop it from this pass.
    Keep { id: String },
    /// Show another bookmark without changing anything.
    Skip,
}

/// Replies to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "message", rename_all = "kebab-case")]
pub enum Outbound {
    RandomBookmark { bookmark: FlatBookmark },
}

/// What a key press asks the main loop to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Dispatch a message to the triage core.
    Send(Inbound),
    /// Open a URL through the host; does not advance the triage.
    Open(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inbound_wire_shapes() {
        assert_eq!(
            serde_json::to_value(Inbound::Collect).unwrap(),
            json!({ "message": "collect" })
        );
        assert_eq!(
            serde_json::to_value(Inbound::Delete { id: "a1".into() }).unwrap(),
            json!({ "message": "delete", "id": "a1" })
        );
        assert_eq!(
            serde_json::to_value(Inbound::Keep { id: "a1".into() }).unwrap(),
            json!({ "message": "keep", "id": "a1" })
        );
        assert_eq!(
            serde_json::to_value(Inbound::Skip).unwrap(),
            json!({ "message": "skip" })
        );
    }

    #[test]
    fn inbound_parses_from_page_messages() {
        let msg: Inbound = serde_json::from_str(r#"{"message":"delete","id":"xyz"}"#).unwrap();
        assert_eq!(msg, Inbound::Delete { id: "xyz".into() });
        assert!(serde_json::from_str::<Inbound>(r#"{"message":"explode"}"#).is_err());
    }

    #[test]
    fn outbound_wire_shape() {
        let out = Outbound::RandomBookmark {
            bookmark: FlatBookmark {
                id: "a".into(),
                title: "Site1".into(),
                url: "https://one.example".into(),
                path: vec!["Work".into()],
            },
        };
        assert_eq!(
            serde_json::to_value(out).unwrap(),
            json!({
                "message": "random-bookmark",
                "bookmark": {
                    "id": "a",
                    "title": "Site1",
                    "url": "https://one.example",
                    "path": ["Work"]
                }
            })
        );
    }
}
