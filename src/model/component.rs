use serde::{Deserialize, Serialize};

use super::BoundingBox;

/// A typed rectangular region discovered in a label map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Human-readable type, e.g. `"button"` or a synthesized `"class_7"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub bbox: BoundingBox,
    /// The class index the region was extracted from.
    pub class_id: u32,
}

impl Component {
    pub fn new(kind: impl Into<String>, bbox: BoundingBox, class_id: u32) -> Self {
        Self {
            kind: kind.into(),
            bbox,
            class_id,
        }
    }
}
