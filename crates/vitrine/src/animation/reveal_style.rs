//! Reveal presentation styles.
//!
//! A [`RevealKind`] describes where an element starts visually (hidden
//! state) and interpolates it toward its natural presentation (identity
//! transform, full opacity) as reveal progress advances.

use vitrine_core::{Style, Transform};

use super::easing::Easing;

/// How far a fade-up element starts below its resting position, in pixels.
const FADE_UP_RISE: f32 = 30.0;
/// How far slide elements start off to the side, in pixels.
const SLIDE_DISTANCE: f32 = 50.0;
/// Starting scale for zoom-in reveals.
const ZOOM_START_SCALE: f32 = 0.8;
/// Starting rotation for rotate-in reveals, in degrees.
const ROTATE_START_DEG: f32 = -10.0;
/// Starting scale for rotate-in reveals.
const ROTATE_START_SCALE: f32 = 0.9;

/// The visual style of a reveal transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealKind {
    /// Fade in while rising from below.
    #[default]
    FadeUp,
    /// Fade in while sliding from the left.
    SlideLeft,
    /// Fade in while sliding from the right.
    SlideRight,
    /// Fade in while scaling up.
    ZoomIn,
    /// Fade in while straightening from a slight tilt.
    RotateIn,
}

impl RevealKind {
    /// Parse a marker attribute value.
    ///
    /// Unknown or empty values fall back to [`RevealKind::FadeUp`] (the
    /// degradation rule: bad configuration never fails).
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "slide-left" => Self::SlideLeft,
            "slide-right" => Self::SlideRight,
            "zoom-in" => Self::ZoomIn,
            "rotate-in" => Self::RotateIn,
            "fade-up" | "" => Self::FadeUp,
            other => {
                tracing::debug!(target: "vitrine::reveal", value = other, "unknown reveal kind, using fade-up");
                Self::FadeUp
            }
        }
    }

    /// The style an element takes the instant its reveal begins.
    pub fn hidden_style(self) -> Style {
        Style {
            opacity: 0.0,
            transform: self.hidden_transform(),
        }
    }

    fn hidden_transform(self) -> Transform {
        match self {
            Self::FadeUp => Transform {
                translate_y: FADE_UP_RISE,
                ..Transform::IDENTITY
            },
            Self::SlideLeft => Transform {
                translate_x: -SLIDE_DISTANCE,
                ..Transform::IDENTITY
            },
            Self::SlideRight => Transform {
                translate_x: SLIDE_DISTANCE,
                ..Transform::IDENTITY
            },
            Self::ZoomIn => Transform {
                scale: ZOOM_START_SCALE,
                ..Transform::IDENTITY
            },
            Self::RotateIn => Transform {
                rotation: ROTATE_START_DEG,
                scale: ROTATE_START_SCALE,
                ..Transform::IDENTITY
            },
        }
    }

    /// The style at a given eased progress between hidden and revealed.
    ///
    /// Progress 0.0 yields [`hidden_style`](Self::hidden_style); progress 1.0
    /// yields full opacity and the identity transform.
    pub fn style_at(self, easing: Easing, progress: f32) -> Style {
        let hidden = self.hidden_transform();
        let t = progress.clamp(0.0, 1.0);
        Style {
            opacity: easing.lerp(0.0, 1.0, t),
            transform: Transform {
                translate_x: easing.lerp(hidden.translate_x, 0.0, t),
                translate_y: easing.lerp(hidden.translate_y, 0.0, t),
                scale: easing.lerp(hidden.scale, 1.0, t),
                rotation: easing.lerp(hidden.rotation, 0.0, t),
            },
        }
    }
}
