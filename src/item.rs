use crate::Id;
use serde_derive::{Deserialize, Serialize};

/// A stored object on the sync server.
///
/// Items are addressed by path-like names such as `root:/notes.txt:`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Item {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub created_time: i64,
    #[serde(default)]
    pub updated_time: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_item_response() {
        let src = r#"{
            "id": "2f4cea51abc24dd5a0afb66c3de19d1c",
            "name": "root:/test.txt:",
            "created_time": 1638060662000,
            "updated_time": 1638060662001
        }"#;

        let got: Item = serde_json::from_str(src).unwrap();

        assert_eq!(got.id, Id::from("2f4cea51abc24dd5a0afb66c3de19d1c"));
        assert_eq!(got.name, "root:/test.txt:");
        assert_eq!(got.created_time, 1638060662000);
    }
}
