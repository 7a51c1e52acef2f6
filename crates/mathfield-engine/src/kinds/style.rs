use super::Item;
use crate::latex::{Entry, Registry, Template};

/// A font or decoration wrapped around a block, e.g. `\mathbf{x}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    pub ctrl_seq: String,
    /// Class of the rendered wrapper.
    pub class: String,
}

impl Style {
    pub fn new(ctrl_seq: &str, class: &str) -> Self {
        Self {
            ctrl_seq: ctrl_seq.to_string(),
            class: class.to_string(),
        }
    }
}

const STYLES: &[(&str, &str)] = &[
    ("mathbf", "mf-bold"),
    ("mathit", "mf-italic"),
    ("mathrm", "mf-roman"),
    ("mathsf", "mf-sans-serif"),
    ("underline", "mf-underline"),
    ("overline", "mf-overline"),
];

pub(crate) fn register(registry: &mut Registry) {
    for (name, class) in STYLES {
        let style = Style::new(&format!("\\{name}"), class);
        let template = Template::Insert(Item::style(style.clone(), Vec::new()));
        let entry = Entry::parsed(move |g| {
            let style = style.clone();
            g.block().map(move |body| vec![Item::style(style.clone(), body)])
        })
        .with_template(template);
        registry.register_command(name, entry);
    }
}

pub(crate) fn latex(style: &Style, body: &str) -> String {
    format!("{}{{{body}}}", style.ctrl_seq)
}
