//! Token matrix to markup formatting.
//!
//! # Output shape
//!
//! Block layout, one root per theme:
//!
//! ```text
//! <pre class="shiki {theme}" style="background-color: {bg}" data-*>
//!   <div class="code-container">
//!     <code>
//!       <div class="line [highlight-line]"><span style="color: ...">...</span>\n</div>
//!       ...
//! ```
//!
//! Inline layout drops the `pre`/`code` chrome:
//!
//! ```text
//! <div class="shiki {theme}"><div class="line">...\n</div></div>
//! ```
//!
//! Blocks without a recognized language keep the block shape but put the raw
//! text directly inside `code` (see [`null_format`]).

use crate::meta::{DirectiveConfig, TreeMutator};
use crate::node::Element;
use crate::tokens::{FontStyle, Fragment, Line, ThemeInfo, ThemedTokens};

/// Class added to highlighted lines.
pub const HIGHLIGHT_LINE_CLASS: &str = "highlight-line";

/// Per-fragment grammar scope attribute, stripped unless `preserve-scopes`.
pub const SCOPE_ATTRIBUTE: &str = "data-scope";

/// Format token matrices into one root per theme.
///
/// Post-process factories are invoked once for the whole call; their mutators
/// then run on every root, in declared order, before scope stripping.
#[must_use]
pub fn format_tokens(blocks: &[ThemedTokens], config: &DirectiveConfig) -> Vec<Element> {
    let mut mutators: Vec<TreeMutator> = config
        .postprocess
        .iter()
        .map(|step| step.mutator())
        .collect();

    blocks
        .iter()
        .map(|block| {
            let mut root = match config.inline {
                Some(index) => format_inline(block, index),
                None => format_block(block, config),
            };

            for mutator in &mut mutators {
                mutator(&mut root);
            }

            if !config.preserve_scopes {
                strip_scopes(&mut root);
            }

            root
        })
        .collect()
}

/// Render blocks with no recognized language.
///
/// Same outer shape as block layout; the text is emitted verbatim, unsegmented.
/// Line selection, inline layout and post-processing do not apply.
#[must_use]
pub fn null_format(text: &str, themes: &[ThemeInfo], config: &DirectiveConfig) -> Vec<Element> {
    themes
        .iter()
        .map(|theme| {
            let code = Element::new("code")
                .with_attribute("style", format!("color: {}", theme.foreground))
                .with_child(text);
            block_root(theme, config).with_child(code_container(code))
        })
        .collect()
}

/// Remove [`SCOPE_ATTRIBUTE`] from `root` and all descendants.
pub fn strip_scopes(root: &mut Element) {
    root.remove_attribute_recursive(SCOPE_ATTRIBUTE);
}

fn format_inline(block: &ThemedTokens, index: usize) -> Element {
    // Index past the end renders an empty line.
    Element::new("div")
        .with_classes(["shiki", block.theme.name.as_str()])
        .with_child(format_line(block.lines.get(index), &block.theme, false))
}

fn format_block(block: &ThemedTokens, config: &DirectiveConfig) -> Element {
    let lines = block
        .lines
        .iter()
        .enumerate()
        .filter(|&(index, _)| config.is_visible(index))
        .map(|(index, line)| {
            format_line(Some(line), &block.theme, config.is_highlighted(index))
        });

    let code = Element::new("code").with_children(lines);
    block_root(&block.theme, config).with_child(code_container(code))
}

fn block_root(theme: &ThemeInfo, config: &DirectiveConfig) -> Element {
    let mut pre = Element::new("pre")
        .with_classes(["shiki", theme.name.as_str()])
        .with_attribute("style", format!("background-color: {}", theme.background));
    for (name, value) in &config.custom_attributes {
        pre.set_attribute(name.clone(), value.clone());
    }
    pre
}

fn code_container(code: Element) -> Element {
    Element::new("div")
        .with_classes(["code-container"])
        .with_child(code)
}

fn format_line(line: Option<&Line>, theme: &ThemeInfo, highlighted: bool) -> Element {
    let mut classes = vec!["line"];
    if highlighted {
        classes.push(HIGHLIGHT_LINE_CLASS);
    }

    // The trailing newline keeps empty lines selectable and copy-pasteable.
    Element::new("div")
        .with_classes(classes)
        .with_children(
            line.into_iter()
                .flatten()
                .map(|fragment| format_fragment(fragment, theme)),
        )
        .with_child("\n")
}

fn format_fragment(fragment: &Fragment, theme: &ThemeInfo) -> Element {
    let color = fragment.color.as_deref().unwrap_or(&theme.foreground);
    let mut declarations = vec![format!("color: {color}")];
    if fragment.font_style.contains(FontStyle::ITALIC) {
        declarations.push("font-style: italic".to_owned());
    }
    if fragment.font_style.contains(FontStyle::BOLD) {
        declarations.push("font-weight: bold".to_owned());
    }
    if fragment.font_style.contains(FontStyle::UNDERLINE) {
        declarations.push("text-decoration: underline".to_owned());
    }

    let mut span = Element::new("span").with_attribute("style", declarations.join("; "));
    if let Some(scope) = fragment.scope_attribute() {
        span.set_attribute(SCOPE_ATTRIBUTE, scope);
    }
    span.with_child(fragment.content.as_str())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::node::{AttributeValue, Node};
    use crate::tokens::SubToken;

    fn theme(name: &str) -> ThemeInfo {
        ThemeInfo {
            name: name.to_owned(),
            foreground: "#000000".to_owned(),
            background: "#ffffff".to_owned(),
        }
    }

    fn scoped(content: &str, scope: &str) -> Fragment {
        Fragment {
            content: content.to_owned(),
            explanation: vec![SubToken {
                content: content.to_owned(),
                scopes: vec!["source.test".to_owned(), scope.to_owned()],
            }],
            ..Default::default()
        }
    }

    /// Three lines: `zero`, `one`, `two`, each a single scoped fragment.
    fn three_lines(theme_name: &str) -> ThemedTokens {
        ThemedTokens {
            theme: theme(theme_name),
            lines: ["zero", "one", "two"]
                .iter()
                .map(|text| vec![scoped(text, "variable")])
                .collect(),
        }
    }

    fn code_lines(root: &Element) -> Vec<&Element> {
        root.find("code").unwrap().child_elements().collect()
    }

    fn line_text(line: &Element) -> String {
        line.text_content()
    }

    #[test]
    fn test_block_structure() {
        let roots = format_tokens(&[three_lines("light")], &DirectiveConfig::default());
        assert_eq!(roots.len(), 1);

        let pre = &roots[0];
        assert_eq!(pre.tag, "pre");
        assert!(pre.has_class("shiki"));
        assert!(pre.has_class("light"));
        assert_eq!(
            pre.attribute("style"),
            Some(&AttributeValue::from("background-color: #ffffff"))
        );

        let container = pre.child_elements().next().unwrap();
        assert!(container.has_class("code-container"));
        let lines = code_lines(pre);
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines.iter().map(|l| line_text(l)).collect::<Vec<_>>(),
            vec!["zero\n", "one\n", "two\n"]
        );
    }

    #[test]
    fn test_one_root_per_theme_in_order() {
        let roots = format_tokens(
            &[three_lines("light"), three_lines("dark")],
            &DirectiveConfig::default(),
        );
        assert_eq!(roots.len(), 2);
        assert!(roots[0].has_class("light"));
        assert!(roots[1].has_class("dark"));
    }

    #[test]
    fn test_hide_drops_lines_preserving_order() {
        let config = DirectiveConfig::parse("hide=0");
        let roots = format_tokens(&[three_lines("light")], &config);
        let lines = code_lines(&roots[0]);
        assert_eq!(
            lines.iter().map(|l| line_text(l)).collect::<Vec<_>>(),
            vec!["one\n", "two\n"]
        );
    }

    #[test]
    fn test_show_and_hide() {
        let config = DirectiveConfig::parse("show=1,2 hide=2");
        let roots = format_tokens(&[three_lines("light")], &config);
        let lines = code_lines(&roots[0]);
        assert_eq!(lines.len(), 1);
        assert_eq!(line_text(lines[0]), "one\n");
    }

    #[test]
    fn test_highlight_class() {
        let config = DirectiveConfig::parse("highlight=1");
        let roots = format_tokens(&[three_lines("light")], &config);
        let lines = code_lines(&roots[0]);
        assert!(!lines[0].has_class(HIGHLIGHT_LINE_CLASS));
        assert!(lines[1].has_class(HIGHLIGHT_LINE_CLASS));
        assert!(lines[1].has_class("line"));
        assert!(!lines[2].has_class(HIGHLIGHT_LINE_CLASS));
    }

    #[test]
    fn test_inline_selects_line_ignoring_show_hide() {
        let config = DirectiveConfig::parse("hide=1 show=0").with_inline(1);
        let roots = format_tokens(&[three_lines("dark")], &config);

        let root = &roots[0];
        assert_eq!(root.tag, "div");
        assert!(root.has_class("shiki"));
        assert!(root.has_class("dark"));
        assert!(root.attribute("style").is_none());
        assert!(root.find("pre").is_none());
        assert!(root.find("code").is_none());

        let lines: Vec<&Element> = root.child_elements().collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(line_text(lines[0]), "one\n");
    }

    #[test]
    fn test_inline_out_of_range_renders_empty_line() {
        let config = DirectiveConfig::default().with_inline(40);
        let roots = format_tokens(&[three_lines("dark")], &config);
        let line = roots[0].child_elements().next().unwrap();
        assert!(line.has_class("line"));
        assert_eq!(line.children, vec![Node::text("\n")]);
    }

    #[test]
    fn test_inline_ignores_custom_attributes() {
        let config = DirectiveConfig::parse("data-file=x").with_inline(0);
        let roots = format_tokens(&[three_lines("dark")], &config);
        assert!(roots[0].attribute("data-file").is_none());
    }

    #[test]
    fn test_custom_attributes_on_block_root() {
        let config = DirectiveConfig::parse(r#"data-file="main.rs" data-copy"#);
        let roots = format_tokens(&[three_lines("light")], &config);
        assert_eq!(
            roots[0].attribute("data-file"),
            Some(&AttributeValue::from("main.rs"))
        );
        assert_eq!(
            roots[0].attribute("data-copy"),
            Some(&AttributeValue::Flag(true))
        );
    }

    #[test]
    fn test_fragment_styles() {
        let block = ThemedTokens {
            theme: theme("light"),
            lines: vec![vec![
                Fragment::plain("a"),
                Fragment {
                    content: "b".to_owned(),
                    color: Some("#ff0000".to_owned()),
                    font_style: FontStyle::ITALIC | FontStyle::BOLD | FontStyle::UNDERLINE,
                    explanation: Vec::new(),
                },
                Fragment {
                    content: "c".to_owned(),
                    font_style: FontStyle::BOLD,
                    ..Default::default()
                },
            ]],
        };
        let roots = format_tokens(&[block], &DirectiveConfig::default());
        let line = code_lines(&roots[0])[0];
        let styles: Vec<&str> = line
            .child_elements()
            .map(|span| span.attribute("style").and_then(AttributeValue::as_str).unwrap())
            .collect();
        assert_eq!(
            styles,
            vec![
                "color: #000000",
                "color: #ff0000; font-style: italic; font-weight: bold; text-decoration: underline",
                "color: #000000; font-weight: bold",
            ]
        );
    }

    #[test]
    fn test_empty_line_keeps_newline() {
        let block = ThemedTokens {
            theme: theme("light"),
            lines: vec![Vec::new()],
        };
        let roots = format_tokens(&[block], &DirectiveConfig::default());
        let line = code_lines(&roots[0])[0];
        assert_eq!(line.children, vec![Node::text("\n")]);
    }

    #[test]
    fn test_scopes_stripped_by_default() {
        let roots = format_tokens(&[three_lines("light")], &DirectiveConfig::default());
        let span = roots[0].find("span").unwrap();
        assert!(span.attribute(SCOPE_ATTRIBUTE).is_none());
    }

    #[test]
    fn test_scopes_preserved() {
        let config = DirectiveConfig::parse("preserve-scopes");
        let roots = format_tokens(&[three_lines("light")], &config);
        let span = roots[0].find("span").unwrap();
        assert_eq!(
            span.attribute(SCOPE_ATTRIBUTE),
            Some(&AttributeValue::from("variable"))
        );
    }

    #[test]
    fn test_preserve_then_strip_matches_default() {
        let mut preserved = format_tokens(
            &[three_lines("light"), three_lines("dark")],
            &DirectiveConfig::parse("preserve-scopes highlight=1"),
        );
        for root in &mut preserved {
            strip_scopes(root);
        }
        let stripped = format_tokens(
            &[three_lines("light"), three_lines("dark")],
            &DirectiveConfig::parse("highlight=1"),
        );
        assert_eq!(preserved, stripped);
    }

    #[test]
    fn test_postprocess_sees_scopes_before_stripping() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let config = DirectiveConfig::default().with_postprocess(move || -> TreeMutator {
            let sink = Arc::clone(&sink);
            Box::new(move |root: &mut Element| {
                let span = root.find("span").unwrap();
                let scope = span
                    .attribute(SCOPE_ATTRIBUTE)
                    .and_then(AttributeValue::as_str)
                    .map(str::to_owned);
                sink.lock().unwrap().push(scope);
            })
        });

        let roots = format_tokens(&[three_lines("light")], &config);
        assert_eq!(*seen.lock().unwrap(), vec![Some("variable".to_owned())]);
        assert!(roots[0].find("span").unwrap().attribute(SCOPE_ATTRIBUTE).is_none());
    }

    #[test]
    fn test_postprocess_steps_run_in_order() {
        let append = |marker: &'static str| {
            move || -> TreeMutator {
                Box::new(move |root: &mut Element| {
                    let previous = root
                        .attribute("data-steps")
                        .and_then(AttributeValue::as_str)
                        .unwrap_or("")
                        .to_owned();
                    root.set_attribute("data-steps", format!("{previous}{marker}"));
                })
            }
        };
        let config = DirectiveConfig::default()
            .with_postprocess(append("a"))
            .with_postprocess(append("b"));

        let roots = format_tokens(&[three_lines("light"), three_lines("dark")], &config);
        for root in &roots {
            assert_eq!(root.attribute("data-steps"), Some(&AttributeValue::from("ab")));
        }
    }

    #[test]
    fn test_postprocess_factory_invoked_once_per_call() {
        let calls = Arc::new(Mutex::new(0_usize));
        let counter = Arc::clone(&calls);
        let config = DirectiveConfig::default().with_postprocess(move || -> TreeMutator {
            *counter.lock().unwrap() += 1;
            Box::new(|_root: &mut Element| {})
        });

        let _ = format_tokens(&[three_lines("light"), three_lines("dark")], &config);
        assert_eq!(*calls.lock().unwrap(), 1);
        let _ = format_tokens(&[three_lines("light")], &config);
        assert_eq!(*calls.lock().unwrap(), 2);
    }

    #[test]
    fn test_postprocess_runs_in_inline_layout() {
        let config = DirectiveConfig::default()
            .with_inline(0)
            .with_postprocess(|| -> TreeMutator {
                Box::new(|root: &mut Element| root.set_attribute("data-done", true))
            });
        let roots = format_tokens(&[three_lines("light")], &config);
        assert_eq!(roots[0].attribute("data-done"), Some(&AttributeValue::Flag(true)));
    }

    #[test]
    fn test_null_format() {
        let config = DirectiveConfig::parse("hide=0 highlight=1 data-file=a.txt").with_inline(2);
        let text = "line one\n<two> & three";
        let roots = null_format(text, &[theme("light"), theme("dark")], &config);

        assert_eq!(roots.len(), 2);
        for (root, name) in roots.iter().zip(["light", "dark"]) {
            assert_eq!(root.tag, "pre");
            assert!(root.has_class(name));
            assert_eq!(root.attribute("data-file"), Some(&AttributeValue::from("a.txt")));
            let code = root.find("code").unwrap();
            assert_eq!(code.attribute("style"), Some(&AttributeValue::from("color: #000000")));
            assert_eq!(code.children, vec![Node::text(text)]);
        }
    }

    #[test]
    fn test_null_format_skips_postprocess() {
        let config = DirectiveConfig::default().with_postprocess(|| -> TreeMutator {
            Box::new(|root: &mut Element| root.set_attribute("data-touched", true))
        });
        let roots = null_format("x", &[theme("light")], &config);
        assert!(roots[0].attribute("data-touched").is_none());
    }
}
