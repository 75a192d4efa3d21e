use serde::{Deserialize, Serialize};
use std::fmt;

/// Content category assigned by the tagger
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Tactical,
    Positional,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tactical => "Tactical",
            Category::Positional => "Positional",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One commented main-line move, as written to the filtered pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedMoveRecord {
    pub id: String,
    pub game_idx: usize,
    /// Position before the move
    pub fen: String,
    #[serde(rename = "move")]
    pub san: String,
    pub move_uci: String,
    pub explanation: String,
    pub tags: Vec<Category>,
    pub event: String,
    pub annotator: String,
    pub link: String,
}

impl AnnotatedMoveRecord {
    pub fn make_id(game_idx: usize, fullmove_number: u32, white_to_move: bool) -> String {
        format!(
            "game{}_move{}_{}",
            game_idx,
            fullmove_number,
            if white_to_move { 'w' } else { 'b' }
        )
    }
}

/// Provenance headers of a source game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameProvenance {
    pub event: String,
    pub annotator: String,
    pub link: String,
}

impl Default for GameProvenance {
    fn default() -> Self {
        Self {
            event: "?".to_string(),
            annotator: "?".to_string(),
            link: "?".to_string(),
        }
    }
}
