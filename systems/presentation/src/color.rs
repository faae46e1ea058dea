/// RGBA color attached to effects and floating text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Muzzle flash tint.
    pub const ORANGE: Self = Self::from_rgb_u8(255, 128, 0);
    /// Floating damage number tint.
    pub const RED: Self = Self::from_rgb_u8(255, 0, 0);
    /// Smoke tint of destruction explosions.
    pub const DARK_GRAY: Self = Self::from_rgb_u8(64, 64, 64);
    /// Smoke tint of impact explosions.
    pub const DARKER_GRAY: Self = Self::from_rgb_u8(32, 32, 32);
    /// Spark tint of impacts.
    pub const EMBER: Self = Self::from_rgb_u8(206, 74, 37);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color with the provided alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}
