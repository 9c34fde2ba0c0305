use std::collections::BTreeMap;

use crate::foundation::core::Point;
use crate::foundation::error::{TacticError, TacticResult};

/// Ball position in percent-of-court space (`[0, 100]` on both axes).
pub type Position = Point;

#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
/// Court layout variant. Each mode has its own extents and default roster.
pub enum Mode {
    /// Whole court, 2:1 aspect.
    #[default]
    Full,
    /// Attacking half, square.
    Half,
}

impl Mode {
    /// Stable lowercase name used on the wire and in the CLI.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Half => "half",
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = TacticError;

    fn from_str(s: &str) -> TacticResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "half" => Ok(Self::Half),
            other => Err(TacticError::validation(format!(
                "unknown court mode '{other}' (expected 'full' or 'half')"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
/// Team membership of a player.
pub enum Team {
    /// Home side.
    Home,
    /// Away side.
    Away,
}

impl Team {
    /// Infer the team of a payload that predates the explicit `team` field.
    ///
    /// Older payloads only encode the team inside the id (`gk-home`, `away-3`).
    pub fn from_legacy_id(id: &str) -> Self {
        if id.contains("home") {
            Self::Home
        } else {
            Self::Away
        }
    }
}

#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
/// On-court role. Goalkeepers render with a distinct color.
pub enum Role {
    /// Goalkeeper.
    Gk,
    /// Outfield player.
    #[default]
    Field,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(from = "PlayerRepr")]
/// A player token on the court.
pub struct Player {
    /// Stable identity, unique within a frame.
    pub id: String,
    /// Label painted on the token (`"GK"`, `"1"`, ...).
    pub number: String,
    /// Horizontal position in percent of court width.
    pub x: f64,
    /// Vertical position in percent of court height.
    pub y: f64,
    /// Goalkeeper or field player.
    pub role: Role,
    /// Explicit team membership.
    pub team: Team,
}

impl Player {
    /// Position as a point in percent space.
    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Copy of this player moved to `p`.
    pub fn at(&self, p: Point) -> Self {
        Self {
            x: p.x,
            y: p.y,
            ..self.clone()
        }
    }
}

#[derive(serde::Deserialize)]
struct PlayerRepr {
    id: String,
    number: String,
    x: f64,
    y: f64,
    #[serde(default)]
    role: Role,
    #[serde(default)]
    team: Option<Team>,
}

impl From<PlayerRepr> for Player {
    fn from(r: PlayerRepr) -> Self {
        let team = r.team.unwrap_or_else(|| Team::from_legacy_id(&r.id));
        Self {
            id: r.id,
            number: r.number,
            x: r.x,
            y: r.y,
            role: r.role,
            team,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
/// Preset size of an annotation's text.
pub enum SizeTag {
    /// Small text.
    Small,
    /// Default text size.
    #[default]
    Medium,
    /// Large text.
    Large,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// A free-floating text note. Coordinates are stage pixels, independent of court scale.
pub struct Annotation {
    /// Identity of the note.
    pub id: String,
    /// Note text.
    pub text: String,
    /// Left edge in stage pixels.
    pub x: f64,
    /// Top edge in stage pixels.
    pub y: f64,
    /// Box width in stage pixels.
    pub width: f64,
    /// Box height in stage pixels.
    pub height: f64,
    /// Font size in pixels.
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    /// Size preset chosen in the editor.
    #[serde(default, rename = "size")]
    pub size_tag: SizeTag,
}

fn default_font_size() -> f64 {
    24.0
}

impl Annotation {
    /// The note created by "add annotation": `MEMO`, centered on the full-court stage.
    pub fn memo(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: "MEMO".to_owned(),
            x: 400.0,
            y: 200.0,
            width: 100.0,
            height: 60.0,
            font_size: default_font_size(),
            size_tag: SizeTag::Medium,
        }
    }

    /// Placement, box size and font size must all be finite.
    pub fn validate(&self) -> TacticResult<()> {
        let geometry = [self.x, self.y, self.width, self.height, self.font_size];
        if geometry.iter().any(|v| !v.is_finite()) {
            return Err(TacticError::validation(format!(
                "annotation '{}' has non-finite geometry",
                self.id
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
/// One captured snapshot of player/ball positions plus an optional annotation.
///
/// Frames own all of their data; cloning produces an independent snapshot.
pub struct Frame {
    /// Player tokens. Order is not significant.
    pub players: Vec<Player>,
    /// Ball position in percent space.
    pub ball: Position,
    /// At most one note per frame.
    #[serde(default)]
    pub annotation: Option<Annotation>,
}

/// The live, displayed board state. It has the same shape as a [`Frame`].
pub type DisplayState = Frame;

impl Frame {
    /// Look up a player by id.
    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Players keyed by id.
    pub fn players_by_id(&self) -> BTreeMap<&str, &Player> {
        self.players.iter().map(|p| (p.id.as_str(), p)).collect()
    }

    /// Validate coordinate ranges and id uniqueness.
    pub fn validate(&self) -> TacticResult<()> {
        let mut seen = std::collections::BTreeSet::new();
        for p in &self.players {
            if !seen.insert(p.id.as_str()) {
                return Err(TacticError::validation(format!(
                    "duplicate player id '{}' in frame",
                    p.id
                )));
            }
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(TacticError::validation(format!(
                    "player '{}' has non-finite coordinates",
                    p.id
                )));
            }
        }
        if !self.ball.x.is_finite() || !self.ball.y.is_finite() {
            return Err(TacticError::validation("ball has non-finite coordinates"));
        }
        if let Some(a) = &self.annotation {
            a.validate()?;
        }
        Ok(())
    }
}

impl PartialEq for Frame {
    // Player order is irrelevant; the id set and per-id values must match.
    fn eq(&self, other: &Self) -> bool {
        self.ball == other.ball
            && self.annotation == other.annotation
            && self.players.len() == other.players.len()
            && self.players_by_id() == other.players_by_id()
    }
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize, PartialEq)]
/// The unit of persistence and sharing: a court mode plus its frame sequence.
pub struct TacticState {
    /// Court layout.
    #[serde(default)]
    pub mode: Mode,
    /// Ordered keyframes.
    #[serde(default)]
    pub frames: Vec<Frame>,
}

impl TacticState {
    /// Empty sequence for `mode`.
    pub fn empty(mode: Mode) -> Self {
        Self {
            mode,
            frames: Vec::new(),
        }
    }

    /// Validate every frame.
    pub fn validate(&self) -> TacticResult<()> {
        for (i, f) in self.frames.iter().enumerate() {
            f.validate()
                .map_err(|e| TacticError::validation(format!("frame {i}: {e}")))?;
        }
        Ok(())
    }

    /// Read a JSON tactic file.
    pub fn from_path(path: &std::path::Path) -> TacticResult<Self> {
        use anyhow::Context as _;
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read tactic '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Parse a JSON tactic document.
    pub fn from_json_str(s: &str) -> TacticResult<Self> {
        let state: Self = serde_json::from_str(s)
            .map_err(|e| TacticError::serde(format!("tactic json: {e}")))?;
        state.validate()?;
        Ok(state)
    }

    /// Write this tactic as pretty JSON, creating parent directories.
    pub fn write_path(&self, path: &std::path::Path) -> TacticResult<()> {
        use anyhow::Context as _;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create directory '{}'", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| TacticError::serde(format!("tactic json: {e}")))?;
        std::fs::write(path, json).with_context(|| format!("write tactic '{}'", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/tactic.rs"]
mod tests;
