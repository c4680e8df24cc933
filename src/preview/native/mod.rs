//! Capabilities implemented natively, used to render pages ahead of time.
//!
//! | Capability  | Backend                      |
//! |-------------|------------------------------|
//! | math        | latex2mathml (MathML output) |
//! | diagrams    | `mmdc` from mermaid-cli      |
//! | highlighter | syntect, inline styles       |

mod diagram;
mod highlight;
mod math;

pub use diagram::Mmdc;
pub use highlight::Syntect;
pub use math::MathMl;

use std::sync::Arc;

use super::capability::Capabilities;
use crate::config::Features;
use crate::log;

/// Native capabilities for the requested features.
///
/// A backend that is not available is left out with a warning; its
/// elements stay as source.
pub fn detect(features: Features) -> Capabilities {
    let mut capabilities = Capabilities::none();

    if features.math {
        capabilities.math = Some(Arc::new(MathMl));
    }

    if features.diagrams {
        match Mmdc::detect() {
            Ok(mmdc) => capabilities.diagrams = Some(Arc::new(mmdc)),
            Err(e) => log!("warning"; "{}, diagrams are left as source", e),
        }
    }

    if features.highlight {
        match Syntect::new() {
            Ok(syntect) => capabilities.highlighter = Some(Arc::new(syntect)),
            Err(e) => log!("warning"; "{}, code is left unhighlighted", e),
        }
    }

    capabilities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_respects_features() {
        let capabilities = detect(Features::default());
        assert!(capabilities.math.is_none());
        assert!(capabilities.diagrams.is_none());
        assert!(capabilities.highlighter.is_none());

        let capabilities = detect(Features {
            math: true,
            highlight: true,
            diagrams: false,
        });
        assert!(capabilities.math.is_some());
        assert!(capabilities.highlighter.is_some());
        assert!(capabilities.diagrams.is_none());
    }
}
