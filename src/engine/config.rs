use crate::logic::board::PieceType;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const VAL_PAWN: i32 = 100;
pub const VAL_KNIGHT: i32 = 320;
pub const VAL_BISHOP: i32 = 330;
pub const VAL_ROOK: i32 = 500;
pub const VAL_QUEEN: i32 = 900;
// Large enough to dominate any positional term; a safety net, not a real
// capture target.
pub const VAL_KING: i32 = 20_000;

/// Must exceed the maximum possible material swing so that a forced mate
/// dominates any positional score.
pub const MATE_SCORE: i32 = 100_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub val_pawn: i32,
    pub val_knight: i32,
    pub val_bishop: i32,
    pub val_rook: i32,
    pub val_queen: i32,
    pub val_king: i32,
    pub mate_score: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            val_pawn: VAL_PAWN,
            val_knight: VAL_KNIGHT,
            val_bishop: VAL_BISHOP,
            val_rook: VAL_ROOK,
            val_queen: VAL_QUEEN,
            val_king: VAL_KING,
            mate_score: MATE_SCORE,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub const fn piece_value(&self, kind: PieceType) -> i32 {
        match kind {
            PieceType::Pawn => self.val_pawn,
            PieceType::Knight => self.val_knight,
            PieceType::Bishop => self.val_bishop,
            PieceType::Rook => self.val_rook,
            PieceType::Queen => self.val_queen,
            PieceType::King => self.val_king,
        }
    }

    /// Loads a config where each present field is a scale factor applied to
    /// the default value.
    pub fn load_from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        let json_config: EngineConfigJson = serde_json::from_str(json_str)?;
        let default = Self::default();

        Ok(Self {
            val_pawn: apply_scale(default.val_pawn, json_config.val_pawn),
            val_knight: apply_scale(default.val_knight, json_config.val_knight),
            val_bishop: apply_scale(default.val_bishop, json_config.val_bishop),
            val_rook: apply_scale(default.val_rook, json_config.val_rook),
            val_queen: apply_scale(default.val_queen, json_config.val_queen),
            val_king: apply_scale(default.val_king, json_config.val_king),
            mate_score: apply_scale(default.mate_score, json_config.mate_score),
        })
    }
}

#[derive(Deserialize)]
struct EngineConfigJson {
    val_pawn: Option<f32>,
    val_knight: Option<f32>,
    val_bishop: Option<f32>,
    val_rook: Option<f32>,
    val_queen: Option<f32>,
    val_king: Option<f32>,
    mate_score: Option<f32>,
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn apply_scale(default_val: i32, scale: Option<f32>) -> i32 {
    scale.map_or(default_val, |s| (default_val as f32 * s) as i32)
}

/// A named opponent strength: a fixed search depth plus an independent
/// probability of playing a uniformly random legal move instead of
/// searching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Apprentice,
    Casual,
    Amateur,
    Intermediate,
    Advanced,
    Professional,
    Legend,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    pub search_depth: u8,
    pub random_move_probability: f64,
}

impl Difficulty {
    pub const ALL: [Self; 8] = [
        Self::Beginner,
        Self::Apprentice,
        Self::Casual,
        Self::Amateur,
        Self::Intermediate,
        Self::Advanced,
        Self::Professional,
        Self::Legend,
    ];

    #[must_use]
    pub const fn profile(self) -> DifficultyProfile {
        let (search_depth, random_move_probability) = match self {
            Self::Beginner => (1, 0.40),
            Self::Apprentice => (1, 0.10),
            Self::Casual => (2, 0.20),
            Self::Amateur => (2, 0.00),
            Self::Intermediate => (3, 0.10),
            Self::Advanced => (3, 0.00),
            Self::Professional => (4, 0.00),
            Self::Legend => (5, 0.00),
        };
        DifficultyProfile {
            search_depth,
            random_move_probability,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Apprentice => "apprentice",
            Self::Casual => "casual",
            Self::Amateur => "amateur",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Professional => "professional",
            Self::Legend => "legend",
        }
    }
}

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| UnknownDifficulty(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty tier `{0}`")]
pub struct UnknownDifficulty(pub String);
