//! Colors and appearance-dependent text colors.

/// RGBA color (linear space)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// The host's light/dark theme
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Appearance {
    #[default]
    Light,
    Dark,
}

/// A text color that may depend on the active [`Appearance`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextColor {
    /// Same color in every appearance
    Static(Color),
    /// Separate colors for light and dark appearance
    Adaptive { light: Color, dark: Color },
}

impl TextColor {
    /// Default label color: black on light, white on dark.
    pub const LABEL: TextColor = TextColor::Adaptive {
        light: Color::BLACK,
        dark: Color::WHITE,
    };

    /// Resolve to a concrete color for `appearance`
    pub fn resolve(&self, appearance: Appearance) -> Color {
        match (*self, appearance) {
            (TextColor::Static(color), _) => color,
            (TextColor::Adaptive { light, .. }, Appearance::Light) => light,
            (TextColor::Adaptive { dark, .. }, Appearance::Dark) => dark,
        }
    }
}

impl Default for TextColor {
    fn default() -> Self {
        Self::LABEL
    }
}

impl From<Color> for TextColor {
    fn from(color: Color) -> Self {
        TextColor::Static(color)
    }
}
