//! Window geometry: size units, rectangles and edge resizing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Neither axis may be resized to this many pixels or fewer.
pub const MIN_WINDOW_SIZE: i32 = 300;

/// Visible desktop area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
        }
    }
}

impl Viewport {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// The rectangle covering the whole viewport.
    pub fn full(self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }
}

/// Window bounds in pixels. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// A `w` by `h` rectangle centered in `viewport`.
    pub fn centered(w: i32, h: i32, viewport: Viewport) -> Self {
        Self {
            x: (viewport.width - w) / 2,
            y: (viewport.height - h) / 2,
            w,
            h,
        }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }
}

/// A window size, absolute or relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    /// `"700px"` or a bare `"700"`.
    Px(f64),
    /// Percent of viewport width, `"80vw"`.
    Vw(f64),
    /// Percent of viewport height, `"80vh"`.
    Vh(f64),
}

impl Dimension {
    pub const DEFAULT_WIDTH: Self = Self::Vw(80.0);
    pub const DEFAULT_HEIGHT: Self = Self::Vh(80.0);

    /// Resolve to whole pixels.
    pub fn to_px(self, viewport: Viewport) -> i32 {
        let px = match self {
            Self::Px(px) => px,
            Self::Vw(pct) => f64::from(viewport.width) * pct / 100.0,
            Self::Vh(pct) => f64::from(viewport.height) * pct / 100.0,
        };
        px.round() as i32
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(v) => write!(f, "{v}px"),
            Self::Vw(v) => write!(f, "{v}vw"),
            Self::Vh(v) => write!(f, "{v}vh"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid window size '{0}'")]
pub struct DimensionError(pub String);

impl FromStr for Dimension {
    type Err = DimensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (number, make): (&str, fn(f64) -> Self) = if let Some(n) = s.strip_suffix("vw") {
            (n, Self::Vw)
        } else if let Some(n) = s.strip_suffix("vh") {
            (n, Self::Vh)
        } else if let Some(n) = s.strip_suffix("px") {
            (n, Self::Px)
        } else {
            (s, Self::Px)
        };
        match number.trim().parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => Ok(make(v)),
            _ => Err(DimensionError(s.to_string())),
        }
    }
}

/// The edge or corner being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeEdge {
    fn moves_north(self) -> bool {
        matches!(self, Self::North | Self::NorthEast | Self::NorthWest)
    }

    fn moves_south(self) -> bool {
        matches!(self, Self::South | Self::SouthEast | Self::SouthWest)
    }

    fn moves_east(self) -> bool {
        matches!(self, Self::East | Self::NorthEast | Self::SouthEast)
    }

    fn moves_west(self) -> bool {
        matches!(self, Self::West | Self::NorthWest | Self::SouthWest)
    }
}

impl FromStr for ResizeEdge {
    type Err = DimensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "n" => Self::North,
            "s" => Self::South,
            "e" => Self::East,
            "w" => Self::West,
            "ne" => Self::NorthEast,
            "nw" => Self::NorthWest,
            "se" => Self::SouthEast,
            "sw" => Self::SouthWest,
            other => return Err(DimensionError(other.to_string())),
        })
    }
}

/// Apply a drag of `(dx, dy)` on `edge` to `start`.
///
/// Each axis is updated only if its new size stays above
/// [`MIN_WINDOW_SIZE`]; otherwise that axis keeps its starting position and
/// size.
pub fn resize_rect(start: Rect, edge: ResizeEdge, dx: i32, dy: i32) -> Rect {
    let mut rect = start;

    let (w, x) = if edge.moves_east() {
        (start.w + dx, start.x)
    } else if edge.moves_west() {
        (start.w - dx, start.x + dx)
    } else {
        (start.w, start.x)
    };
    if w > MIN_WINDOW_SIZE {
        rect.w = w;
        rect.x = x;
    }

    let (h, y) = if edge.moves_south() {
        (start.h + dy, start.y)
    } else if edge.moves_north() {
        (start.h - dy, start.y + dy)
    } else {
        (start.h, start.y)
    };
    if h > MIN_WINDOW_SIZE {
        rect.h = h;
        rect.y = y;
    }

    rect
}
