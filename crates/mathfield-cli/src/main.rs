use anyhow::{Result, bail};
use log::{info, warn};
use mathfield_config::Config;
use mathfield_engine::{MathField, Recorder};
use std::{env, path::PathBuf, process};

const USAGE: &str = "Usage: mathfield [--config PATH] [--html] [--type TEXT | --keys CHORDS | --write LATEX]... [LATEX]";

/// One editing step, applied in command-line order.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Type(String),
    /// Space-separated chords, e.g. `"Left Shift-Left"`.
    Keys(String),
    Write(String),
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    latex: Option<String>,
    steps: Vec<Step>,
    html: bool,
    config: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut parsed = Args::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| match iter.next() {
            Some(v) => Ok(v.clone()),
            None => bail!("{flag} needs a value"),
        };
        match arg.as_str() {
            "--type" => parsed.steps.push(Step::Type(value("--type")?)),
            "--keys" => parsed.steps.push(Step::Keys(value("--keys")?)),
            "--write" => parsed.steps.push(Step::Write(value("--write")?)),
            "--config" => parsed.config = Some(PathBuf::from(value("--config")?)),
            "--html" => parsed.html = true,
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            latex if parsed.latex.is_none() => parsed.latex = Some(latex.to_string()),
            extra => bail!("unexpected argument {extra:?}"),
        }
    }
    Ok(parsed)
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    let options = config.map(|c| c.options).unwrap_or_default();

    let mut field = MathField::with_surface(options, Recorder::default());
    if let Some(latex) = &args.latex {
        field.render_latex_math(latex);
    }
    for step in &args.steps {
        match step {
            Step::Type(text) => field.typed_text(text),
            Step::Keys(chords) => {
                for chord in chords.split_whitespace() {
                    if !field.keystroke(chord) {
                        warn!("{chord} did nothing");
                    }
                }
            }
            Step::Write(latex) => field.write_latex(latex)?,
        }
    }
    for edge in field.surface().edges() {
        info!("cursor reached the edge: {edge:?}");
    }

    println!("latex: {}", field.latex());
    println!("text:  {}", field.text());
    if let Some(selected) = field.selection_latex() {
        println!("selected: {selected}");
    }
    if args.html {
        println!("{}", field.html());
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&args) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };
    run(&args)
}
