use super::Item;
use crate::latex::{Entry, Grammar, Registry, Template};

pub(crate) const LATEX: &str = "\\frac";

/// `\dfrac` and `\tfrac` read as plain fractions; only size differs.
const NAMES: &[&str] = &["frac", "dfrac", "tfrac"];

fn parser(g: &Grammar) -> mathfield_parser::Parser<Vec<Item>> {
    let denominator = g.block();
    g.block().then(move |numerator| {
        denominator
            .clone()
            .map(move |d| vec![Item::fraction(numerator.clone(), d)])
    })
}

pub(crate) fn register(registry: &mut Registry) {
    let template = Template::Insert(Item::fraction(Vec::new(), Vec::new()));
    for name in NAMES {
        registry.register_command(name, Entry::parsed(parser).with_template(template.clone()));
    }
    registry.register_char('/', Entry::typed(template));
}

pub(crate) fn latex(numerator: &str, denominator: &str) -> String {
    format!("{LATEX}{{{numerator}}}{{{denominator}}}")
}

pub(crate) fn text(numerator: &str, denominator: &str) -> String {
    format!("({numerator})/({denominator})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spelling() {
        assert_eq!(latex("1", "x"), "\\frac{1}{x}");
        assert_eq!(text("1", "x"), "(1)/(x)");
    }
}
