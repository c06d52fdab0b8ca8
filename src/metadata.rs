use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardMetadata {
    pub board_name: String,
    pub board_description: String,
}

impl Default for BoardMetadata {
    fn default() -> Self {
        Self {
            board_name: "Personal Board".to_string(),
            board_description: "No description".to_string(),
        }
    }
}
