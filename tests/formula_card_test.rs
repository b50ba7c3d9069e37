//! Formula card lifecycle with a stand-in typesetter

use std::cell::RefCell;

use formula_plugin_wasm::element::stylesheet::SheetState;
use formula_plugin_wasm::element::{CardOutput, FormulaCard, RenderError, RenderOptions, SheetSource};
use formula_plugin_wasm::{DisplayMode, FormulaConfig};

/// Typesetter fake: remembers what it was asked; `\oops` is a parse error
struct Typesetter {
    seen: RefCell<Vec<(String, bool)>>,
}

impl Typesetter {
    fn new() -> Self {
        Self {
            seen: RefCell::new(Vec::new()),
        }
    }

    fn render(&self, source: &str, options: &RenderOptions) -> Result<String, RenderError> {
        self.seen
            .borrow_mut()
            .push((source.to_string(), options.display_mode));
        if source.contains("\\oops") {
            return Err(RenderError::new("Undefined control sequence: \\oops"));
        }
        Ok(format!("<span class=\"katex\">{}</span>", source))
    }
}

#[test]
fn test_first_render_waits_for_stylesheet() {
    let typesetter = Typesetter::new();
    let renderer = |s: &str, o: &RenderOptions| typesetter.render(s, o);
    let mut card = FormulaCard::new(&FormulaConfig::default());

    card.set_value("$$x^2$$", &renderer);
    card.connected(&renderer);
    assert!(typesetter.seen.borrow().is_empty());
    assert_eq!(card.output(), &CardOutput::Empty);

    card.stylesheet_loaded(card.stylesheet_attempt(), &renderer);
    assert_eq!(card.stylesheet().state(), SheetState::Ready(SheetSource::Primary));
    assert_eq!(typesetter.seen.borrow().as_slice(), &[("x^2".to_string(), false)]);
    assert_eq!(card.output(), &CardOutput::Rendered("<span class=\"katex\">x^2</span>".to_string()));
}

#[test]
fn test_fallback_then_unstyled_render() {
    let typesetter = Typesetter::new();
    let renderer = |s: &str, o: &RenderOptions| typesetter.render(s, o);
    let config = FormulaConfig::default();
    let mut card = FormulaCard::new(&config);
    card.set_value("a+b", &renderer);
    card.connected(&renderer);

    let first = card.stylesheet_attempt();
    assert_eq!(card.stylesheet_failed(first, &renderer), Some(config.fallback_stylesheet_url.clone()));
    assert!(card.shadow_html().contains(&config.fallback_stylesheet_url));

    // late event from the abandoned primary attempt
    card.stylesheet_loaded(first, &renderer);
    assert!(typesetter.seen.borrow().is_empty());

    assert_eq!(card.stylesheet_failed(card.stylesheet_attempt(), &renderer), None);
    assert_eq!(card.stylesheet().state(), SheetState::Unavailable);
    assert_eq!(typesetter.seen.borrow().len(), 1);
}

#[test]
fn test_timeout_releases_pending_render() {
    let typesetter = Typesetter::new();
    let renderer = |s: &str, o: &RenderOptions| typesetter.render(s, o);
    let mut card = FormulaCard::new(&FormulaConfig::default());
    card.set_value("y", &renderer);
    card.connected(&renderer);

    card.stylesheet_timed_out(card.stylesheet_attempt(), &renderer);
    assert_eq!(typesetter.seen.borrow().len(), 1);
}

#[test]
fn test_block_environment_renders_in_display_mode() {
    let typesetter = Typesetter::new();
    let renderer = |s: &str, o: &RenderOptions| typesetter.render(s, o);
    let mut card = FormulaCard::new(&FormulaConfig::default());
    card.connected(&renderer);
    card.stylesheet_loaded(card.stylesheet_attempt(), &renderer);

    card.set_value("\\begin{align}a &amp;= b\\end{align}", &renderer);
    assert_eq!(
        typesetter.seen.borrow().last(),
        Some(&("\\begin{align*}a &= b\\end{align*}".to_string(), true))
    );
    assert_eq!(card.last_render().map(|(_, mode)| *mode), Some(DisplayMode::Block));
}

#[test]
fn test_render_error_stays_inside_card() {
    let typesetter = Typesetter::new();
    let renderer = |s: &str, o: &RenderOptions| typesetter.render(s, o);
    let mut card = FormulaCard::new(&FormulaConfig::default());
    card.connected(&renderer);
    card.stylesheet_loaded(card.stylesheet_attempt(), &renderer);

    card.set_value("\\oops", &renderer);
    assert_eq!(
        card.output(),
        &CardOutput::Error("Undefined control sequence: \\oops".to_string())
    );
    assert_eq!(
        card.inner_html(),
        r#"<span style="color: #cc0000;">Formula error: Undefined control sequence: \oops</span>"#
    );

    // a good value recovers
    card.set_value("x", &renderer);
    assert!(matches!(card.output(), CardOutput::Rendered(_)));
}

#[test]
fn test_same_value_is_not_re_rendered() {
    let typesetter = Typesetter::new();
    let renderer = |s: &str, o: &RenderOptions| typesetter.render(s, o);
    let mut card = FormulaCard::new(&FormulaConfig::default());
    card.connected(&renderer);
    card.stylesheet_loaded(card.stylesheet_attempt(), &renderer);

    card.set_value("z", &renderer);
    card.set_value("z", &renderer);
    card.attribute_changed("data-value", Some("z"), Some("z"), &renderer);
    assert_eq!(typesetter.seen.borrow().len(), 1);

    card.set_value("   ", &renderer);
    assert_eq!(card.output(), &CardOutput::Empty);
    assert_eq!(typesetter.seen.borrow().len(), 1);
}
