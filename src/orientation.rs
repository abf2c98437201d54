//! Print orientation: which physical side runs horizontally.

/// Portrait or landscape.
///
/// Print sizes are catalogued as unordered pairs of sides; orientation
/// decides which side becomes the width.
///
/// ```text
///     Portrait    Landscape
///     ┌───┐       ┌─────┐
///     │   │       │     │
///     │   │       └─────┘
///     └───┘
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Width is the shorter side.
    #[default]
    Portrait,
    /// Width is the longer side.
    Landscape,
}

impl Orientation {
    /// Orientation implied by a width/height pair. Squares count as portrait.
    pub fn of(width: f64, height: f64) -> Self {
        if width > height {
            Self::Landscape
        } else {
            Self::Portrait
        }
    }

    /// The other orientation.
    pub fn flipped(self) -> Self {
        match self {
            Self::Portrait => Self::Landscape,
            Self::Landscape => Self::Portrait,
        }
    }

    /// Order two sides as `(width, height)` for this orientation.
    pub fn arrange(self, a: f64, b: f64) -> (f64, f64) {
        let (short, long) = if a <= b { (a, b) } else { (b, a) };
        match self {
            Self::Portrait => (short, long),
            Self::Landscape => (long, short),
        }
    }

    /// Lowercase name, as shown in selectors.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }
}

impl core::fmt::Display for Orientation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
