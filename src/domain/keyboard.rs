//! Keyboard bindings for the snap presets
//!
//! The overlay offers eight one-key snaps around the grid: the four halves
//! and the four quarters of the monitor. Each preset is expressed as a drag
//! on the grid surface so it goes through exactly the same snap path as a
//! mouse drag.

use std::str::FromStr;

use crate::domain::core::{Rect, Size};

/// Errors that can occur while interpreting keys
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyboardError {
    /// Key is not bound to anything
    #[error("Key '{0}' is not bound")]
    UnboundKey(String),

    /// Name doesn't match any preset
    #[error("Unknown snap preset '{0}' (expected nw, n, ne, w, e, sw, s or se)")]
    UnknownPreset(String),
}

/// One of the eight fixed snap regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapPreset {
    NorthWest,
    North,
    NorthEast,
    West,
    East,
    SouthWest,
    South,
    SouthEast,
}

impl SnapPreset {
    /// All presets in button order, left to right and top to bottom
    pub const ALL: [SnapPreset; 8] = [
        SnapPreset::NorthWest,
        SnapPreset::North,
        SnapPreset::NorthEast,
        SnapPreset::West,
        SnapPreset::East,
        SnapPreset::SouthWest,
        SnapPreset::South,
        SnapPreset::SouthEast,
    ];

    /// Returns the drag this preset stands for on a surface of `surface` size
    ///
    /// # Example
    /// ```rust
    /// use gridwm::domain::{core::{Rect, Size}, keyboard::SnapPreset};
    ///
    /// let drag = SnapPreset::East.drag_rect(Size::new(200, 200));
    /// assert_eq!(drag, Rect::new(100, 0, 100, 200));
    /// ```
    pub fn drag_rect(&self, surface: Size) -> Rect {
        let (w, h) = (surface.w, surface.h);
        let (hw, hh) = (w / 2, h / 2);

        match self {
            SnapPreset::NorthWest => Rect::new(0, 0, hw, hh),
            SnapPreset::North => Rect::new(0, 0, w, hh),
            SnapPreset::NorthEast => Rect::new(hw, 0, hw, hh),
            SnapPreset::West => Rect::new(0, 0, hw, h),
            SnapPreset::East => Rect::new(hw, 0, hw, h),
            SnapPreset::SouthWest => Rect::new(0, hh, hw, hh),
            SnapPreset::South => Rect::new(0, hh, w, hh),
            SnapPreset::SouthEast => Rect::new(hw, hh, hw, hh),
        }
    }

    /// Arrow glyph shown on the preset's button
    pub fn glyph(&self) -> char {
        match self {
            SnapPreset::NorthWest => '↖',
            SnapPreset::North => '↑',
            SnapPreset::NorthEast => '↗',
            SnapPreset::West => '←',
            SnapPreset::East => '→',
            SnapPreset::SouthWest => '↙',
            SnapPreset::South => '↓',
            SnapPreset::SouthEast => '↘',
        }
    }

    /// Letter key bound to the preset
    pub fn letter(&self) -> char {
        match self {
            SnapPreset::NorthWest => 'Q',
            SnapPreset::North => 'W',
            SnapPreset::NorthEast => 'E',
            SnapPreset::West => 'A',
            SnapPreset::East => 'D',
            SnapPreset::SouthWest => 'Z',
            SnapPreset::South => 'S',
            SnapPreset::SouthEast => 'C',
        }
    }
}

impl FromStr for SnapPreset {
    type Err = KeyboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nw" | "northwest" | "top-left" => Ok(SnapPreset::NorthWest),
            "n" | "north" | "top" => Ok(SnapPreset::North),
            "ne" | "northeast" | "top-right" => Ok(SnapPreset::NorthEast),
            "w" | "west" | "left" => Ok(SnapPreset::West),
            "e" | "east" | "right" => Ok(SnapPreset::East),
            "sw" | "southwest" | "bottom-left" => Ok(SnapPreset::SouthWest),
            "s" | "south" | "bottom" => Ok(SnapPreset::South),
            "se" | "southeast" | "bottom-right" => Ok(SnapPreset::SouthEast),
            _ => Err(KeyboardError::UnknownPreset(s.to_string())),
        }
    }
}

/// A key press understood by the grid session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Escape,
}

impl FromStr for Key {
    type Err = KeyboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        match name.to_ascii_lowercase().as_str() {
            "up" => return Ok(Key::Up),
            "down" => return Ok(Key::Down),
            "left" => return Ok(Key::Left),
            "right" => return Ok(Key::Right),
            "esc" | "escape" => return Ok(Key::Escape),
            _ => {}
        }

        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Key::Char(c)),
            _ => Err(KeyboardError::UnboundKey(name.to_string())),
        }
    }
}

/// What a key press asks the session to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Snap(SnapPreset),
    Cancel,
}

/// Maps a key to its action
///
/// Letters are case-insensitive. The arrow keys double the W/A/S/D halves.
pub fn action_for_key(key: Key) -> Result<KeyAction, KeyboardError> {
    let preset = match key {
        Key::Escape => return Ok(KeyAction::Cancel),
        Key::Up => SnapPreset::North,
        Key::Down => SnapPreset::South,
        Key::Left => SnapPreset::West,
        Key::Right => SnapPreset::East,
        Key::Char(c) => SnapPreset::ALL
            .into_iter()
            .find(|preset| preset.letter() == c.to_ascii_uppercase())
            .ok_or_else(|| KeyboardError::UnboundKey(c.to_string()))?,
    };

    Ok(KeyAction::Snap(preset))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SURFACE: Size = Size::new(200, 200);

    #[test]
    fn preset_drag_rects() {
        assert_eq!(SnapPreset::NorthWest.drag_rect(SURFACE), Rect::new(0, 0, 100, 100));
        assert_eq!(SnapPreset::North.drag_rect(SURFACE), Rect::new(0, 0, 200, 100));
        assert_eq!(SnapPreset::NorthEast.drag_rect(SURFACE), Rect::new(100, 0, 100, 100));
        assert_eq!(SnapPreset::West.drag_rect(SURFACE), Rect::new(0, 0, 100, 200));
        assert_eq!(SnapPreset::East.drag_rect(SURFACE), Rect::new(100, 0, 100, 200));
        assert_eq!(SnapPreset::SouthWest.drag_rect(SURFACE), Rect::new(0, 100, 100, 100));
        assert_eq!(SnapPreset::South.drag_rect(SURFACE), Rect::new(0, 100, 200, 100));
        assert_eq!(SnapPreset::SouthEast.drag_rect(SURFACE), Rect::new(100, 100, 100, 100));
    }

    #[test]
    fn odd_surface_uses_integer_halves() {
        assert_eq!(
            SnapPreset::SouthEast.drag_rect(Size::new(201, 199)),
            Rect::new(100, 99, 100, 99)
        );
    }

    #[test]
    fn letter_bindings_case_insensitive() {
        for preset in SnapPreset::ALL {
            let upper = Key::Char(preset.letter());
            let lower = Key::Char(preset.letter().to_ascii_lowercase());
            assert_eq!(action_for_key(upper), Ok(KeyAction::Snap(preset)));
            assert_eq!(action_for_key(lower), Ok(KeyAction::Snap(preset)));
        }
    }

    #[test]
    fn arrows_alias_halves() {
        assert_eq!(action_for_key(Key::Up), action_for_key(Key::Char('w')));
        assert_eq!(action_for_key(Key::Left), action_for_key(Key::Char('a')));
        assert_eq!(action_for_key(Key::Down), action_for_key(Key::Char('s')));
        assert_eq!(action_for_key(Key::Right), action_for_key(Key::Char('d')));
    }

    #[test]
    fn escape_cancels_and_unknown_keys_fail() {
        assert_eq!(action_for_key(Key::Escape), Ok(KeyAction::Cancel));
        assert_eq!(
            action_for_key(Key::Char('x')),
            Err(KeyboardError::UnboundKey("x".into()))
        );
    }

    #[test]
    fn parse_keys() {
        assert_eq!("q".parse::<Key>(), Ok(Key::Char('q')));
        assert_eq!("Escape".parse::<Key>(), Ok(Key::Escape));
        assert_eq!(" up ".parse::<Key>(), Ok(Key::Up));
        assert!("pageup".parse::<Key>().is_err());
    }

    #[test]
    fn parse_presets() {
        assert_eq!("nw".parse::<SnapPreset>(), Ok(SnapPreset::NorthWest));
        assert_eq!("Right".parse::<SnapPreset>(), Ok(SnapPreset::East));
        assert_eq!("bottom".parse::<SnapPreset>(), Ok(SnapPreset::South));
        assert!(matches!(
            "middle".parse::<SnapPreset>(),
            Err(KeyboardError::UnknownPreset(_))
        ));
    }
}
