//! Parsing of inline `style=""` attributes.
//!
//! Only the few properties that decide a markup role or visibility are kept:
//! `font-style`, `font-weight`, `vertical-align` and `display`. Everything
//! else is skipped.

use cssparser::{
    AtRuleParser, DeclarationParser, ParseError, Parser, ParserInput, QualifiedRuleParser,
    RuleBodyItemParser, RuleBodyParser, Token,
};

/// Vertical position of a run relative to the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlign {
    Baseline,
    Super,
    Sub,
}

/// Role-relevant properties declared in an inline style.
///
/// `None` means the property was not declared and the inherited value stays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub italic: Option<bool>,
    pub bold: Option<bool>,
    pub vertical_align: Option<VerticalAlign>,
    pub hidden: bool,
}

impl InlineStyle {
    /// Parse the value of a `style` attribute. Unknown or malformed
    /// declarations are ignored.
    pub fn parse(style_attr: &str) -> Self {
        let mut input = ParserInput::new(style_attr);
        let mut parser = Parser::new(&mut input);
        let mut style = InlineStyle::default();

        let mut decl_parser = InlineDeclarationParser { style: &mut style };
        for result in RuleBodyParser::new(&mut parser, &mut decl_parser) {
            let _ = result;
        }

        style
    }

    /// Check whether no role-relevant property was declared.
    pub fn is_empty(&self) -> bool {
        *self == InlineStyle::default()
    }
}

struct InlineDeclarationParser<'a> {
    style: &'a mut InlineStyle,
}

impl<'i> AtRuleParser<'i> for InlineDeclarationParser<'_> {
    type Prelude = ();
    type AtRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        _name: cssparser::CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }

    fn parse_block<'t>(
        &mut self,
        _prelude: Self::Prelude,
        _start: &cssparser::ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }
}

impl<'i> QualifiedRuleParser<'i> for InlineDeclarationParser<'_> {
    type Prelude = ();
    type QualifiedRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }

    fn parse_block<'t>(
        &mut self,
        _prelude: Self::Prelude,
        _start: &cssparser::ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }
}

impl<'i> DeclarationParser<'i> for InlineDeclarationParser<'_> {
    type Declaration = ();
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: cssparser::CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _start: &cssparser::ParserState,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        match name.to_ascii_lowercase().as_str() {
            "font-style" => {
                if let Some(italic) = parse_font_style(input) {
                    self.style.italic = Some(italic);
                }
            }
            "font-weight" => {
                if let Some(bold) = parse_font_weight(input) {
                    self.style.bold = Some(bold);
                }
            }
            "vertical-align" => {
                if let Some(align) = parse_vertical_align(input) {
                    self.style.vertical_align = Some(align);
                }
            }
            "display" => {
                if let Ok(token) = input.try_parse(|i| i.expect_ident_cloned()) {
                    self.style.hidden = token.eq_ignore_ascii_case("none");
                }
            }
            _ => {}
        }

        while input.next().is_ok() {}
        Ok(())
    }
}

impl<'i> RuleBodyItemParser<'i, (), ()> for InlineDeclarationParser<'_> {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        false
    }
}

fn parse_font_style(input: &mut Parser<'_, '_>) -> Option<bool> {
    let token = input.try_parse(|i| i.expect_ident_cloned()).ok()?;
    match token.to_ascii_lowercase().as_str() {
        "italic" | "oblique" => Some(true),
        "normal" => Some(false),
        _ => None,
    }
}

fn parse_font_weight(input: &mut Parser<'_, '_>) -> Option<bool> {
    if let Ok(token) = input.try_parse(|i| i.expect_ident_cloned()) {
        return match token.to_ascii_lowercase().as_str() {
            "bold" | "bolder" => Some(true),
            "normal" | "lighter" => Some(false),
            _ => None,
        };
    }

    if let Ok(Token::Number {
        int_value: Some(v), ..
    }) = input.next()
    {
        return Some(*v >= 600);
    }

    None
}

fn parse_vertical_align(input: &mut Parser<'_, '_>) -> Option<VerticalAlign> {
    if let Ok(token) = input.try_parse(|i| i.expect_ident_cloned()) {
        return match token.to_ascii_lowercase().as_str() {
            "super" | "top" | "text-top" => Some(VerticalAlign::Super),
            "sub" | "bottom" | "text-bottom" => Some(VerticalAlign::Sub),
            "baseline" | "middle" => Some(VerticalAlign::Baseline),
            _ => None,
        };
    }

    // Word processors write raised text as a percentage: `vertical-align: 33%`
    match input.next() {
        Ok(Token::Percentage { unit_value, .. }) => Some(percent_to_align(*unit_value)),
        Ok(Token::Dimension { value, .. }) => Some(percent_to_align(*value)),
        _ => None,
    }
}

fn percent_to_align(value: f32) -> VerticalAlign {
    if value > 0.0 {
        VerticalAlign::Super
    } else if value < 0.0 {
        VerticalAlign::Sub
    } else {
        VerticalAlign::Baseline
    }
}
