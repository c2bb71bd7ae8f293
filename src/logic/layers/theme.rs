//! Theme & fixed visual constants

use serde::{Deserialize, Serialize};

/// RGBA color, serialized as a 4-element array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Dark land
    pub land: Color,
    /// Subtle borders
    pub border: Color,
    /// Cyan, attacker end of an arc
    pub source: Color,
    /// Hot pink, victim end of an arc
    pub target: Color,
    /// Semi-transparent target pink
    pub impact_fill: Color,
    pub impact_stroke: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            land: Color::rgb(20, 20, 20),
            border: Color::rgb(60, 60, 60),
            source: Color::rgb(0, 255, 255),
            target: Color::rgb(255, 0, 128),
            impact_fill: Color::rgba(255, 0, 128, 150),
            impact_stroke: Color::rgb(255, 255, 255),
        }
    }
}

/// Arc geometry; constant, not data-driven
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcStyle {
    pub width: f64,
    pub height: f64,
}

impl Default for ArcStyle {
    fn default() -> Self {
        Self { width: 2.0, height: 0.5 }
    }
}
