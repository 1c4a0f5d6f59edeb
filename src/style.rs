//! Closed sets of string-named host settings (line caps, fill rules,
//! composite operations, ...).
//!
//! The host context accepts these as bare strings and silently ignores
//! anything it does not recognize. Parsing them into enums up front turns a
//! silent no-op into a descriptive [`DisplayError::UnknownVariant`].

#[cfg(test)]
#[path = "style_test.rs"]
mod style_test;

use std::fmt;
use std::str::FromStr;

use crate::error::DisplayError;

/// Declare an enum whose variants map one-to-one onto host string names.
macro_rules! host_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The host's name for this value.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )+
                }
            }
        }

        impl FromStr for $name {
            type Err = DisplayError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok(Self::$variant), )+
                    _ => Err(DisplayError::UnknownVariant {
                        kind: $kind,
                        value: s.to_owned(),
                        expected: Self::ALL.iter().map(|v| format!("\"{}\"", v.as_str())).collect::<Vec<_>>().join(", "),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

host_enum! {
    /// Shape drawn at the ends of stroked lines.
    LineCap("line ending") {
        Butt => "butt",
        Round => "round",
        Square => "square",
    }
}

host_enum! {
    /// Shape drawn where two stroked segments meet.
    LineJoin("line join") {
        Bevel => "bevel",
        Round => "round",
        Miter => "miter",
    }
}

host_enum! {
    /// Winding rule for fills and clipping regions.
    FillRule("fill rule") {
        NonZero => "nonzero",
        EvenOdd => "evenodd",
    }
}

host_enum! {
    /// Base direction for rendered text.
    TextDirection("text direction") {
        Ltr => "ltr",
        Rtl => "rtl",
        Inherit => "inherit",
    }
}

host_enum! {
    /// Tiling mode for image patterns.
    Repetition("repetition") {
        Repeat => "repeat",
        RepeatX => "repeat-x",
        RepeatY => "repeat-y",
        NoRepeat => "no-repeat",
    }
}

host_enum! {
    /// Which paint slot a color, gradient or pattern is assigned to.
    StyleTarget("style") {
        Fill => "fill",
        Stroke => "stroke",
    }
}

host_enum! {
    /// Shape of a gradient.
    GradientKind("gradient style") {
        Linear => "linear",
        Radial => "radial",
    }
}

host_enum! {
    /// Compositing or blending mode used when drawing new shapes.
    CompositeOperation("composite operation") {
        SourceOver => "source-over",
        SourceIn => "source-in",
        SourceOut => "source-out",
        SourceAtop => "source-atop",
        DestinationOver => "destination-over",
        DestinationIn => "destination-in",
        DestinationOut => "destination-out",
        DestinationAtop => "destination-atop",
        Lighter => "lighter",
        Copy => "copy",
        Xor => "xor",
        Multiply => "multiply",
        Screen => "screen",
        Overlay => "overlay",
        Darken => "darken",
        Lighten => "lighten",
        ColorDodge => "color-dodge",
        ColorBurn => "color-burn",
        HardLight => "hard-light",
        SoftLight => "soft-light",
        Difference => "difference",
        Exclusion => "exclusion",
        Hue => "hue",
        Saturation => "saturation",
        Color => "color",
        Luminosity => "luminosity",
    }
}
