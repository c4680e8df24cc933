//! Math typesetting to MathML.

use latex2mathml::{DisplayStyle, latex_to_mathml};

use crate::preview::capability::{CapabilityError, MathRenderer};

#[derive(Debug, Default, Clone, Copy)]
pub struct MathMl;

impl MathRenderer for MathMl {
    fn render(&self, tex: &str, display: bool) -> Result<String, CapabilityError> {
        let style = if display {
            DisplayStyle::Block
        } else {
            DisplayStyle::Inline
        };
        latex_to_mathml(tex, style).map_err(|e| CapabilityError::Render(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_and_block() {
        let inline = MathMl.render("x^2", false).unwrap();
        assert!(inline.starts_with("<math"));
        assert!(inline.contains("<msup>"));
        assert!(!inline.contains("display=\"block\""));

        let block = MathMl.render(r"\frac{a}{b}", true).unwrap();
        assert!(block.contains("display=\"block\""));
        assert!(block.contains("<mfrac>"));
    }
}
