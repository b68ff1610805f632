use std::env;
use std::io::{self, BufRead};
use std::process::ExitCode;

use log::debug;
use xregex::{Engine, EngineOption, MatchScope, Pattern, SplitLimit, XRegexError};

const VERSION: &str = concat!("xre ", env!("CARGO_PKG_VERSION"));

fn print_usage() {
    eprintln!("usage: xre [options] pattern [text...]");
    eprintln!("Available options are:");
    eprintln!("  -f flags  compile with 'flags' (e.g. -f gix)");
    eprintln!("  -r tmpl   replace matches with template 'tmpl'");
    eprintln!("  -s        split text on the pattern");
    eprintln!("  -a        report every match, not just the first");
    eprintln!("  -j        print results as JSON");
    eprintln!("  -v        show version information");
    eprintln!("  --        stop handling options");
    eprintln!("Each text argument is one subject; without any, stdin is read line by line.");
}

fn print_version() {
    println!("{}", VERSION);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Mode {
    #[default]
    Match,
    Replace,
    Split,
}

#[derive(Default)]
struct Options {
    flags: String,
    template: Option<String>,
    mode: Mode,
    all: bool,
    json: bool,
    show_version: bool,
    pattern: Option<String>,
    texts: Vec<String>,
}

fn parse_args() -> Result<Options, String> {
    let args: Vec<String> = env::args().collect();
    let mut opts = Options::default();
    let mut i = 1;
    let mut stop_options = false;

    while i < args.len() {
        let arg = &args[i];

        if !stop_options && arg.starts_with('-') && arg.len() > 1 {
            match arg.as_str() {
                "-f" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("'-f' needs argument".to_string());
                    }
                    opts.flags = args[i].clone();
                }
                "-r" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("'-r' needs argument".to_string());
                    }
                    opts.template = Some(args[i].clone());
                    opts.mode = Mode::Replace;
                }
                "-s" => {
                    opts.mode = Mode::Split;
                }
                "-a" => {
                    opts.all = true;
                }
                "-j" => {
                    opts.json = true;
                }
                "-v" => {
                    opts.show_version = true;
                }
                "--" => {
                    stop_options = true;
                }
                _ => {
                    return Err(format!("unrecognized option '{}'", arg));
                }
            }
        } else if opts.pattern.is_none() {
            opts.pattern = Some(arg.clone());
        } else {
            opts.texts.push(arg.clone());
        }
        i += 1;
    }

    Ok(opts)
}

/// Result of running one subject, ready to print.
enum Outcome {
    Matches(Vec<xregex::MatchResult>),
    Text(String),
    Pieces(Vec<Option<String>>),
}

impl Outcome {
    fn is_hit(&self) -> bool {
        match self {
            Outcome::Matches(found) => !found.is_empty(),
            Outcome::Text(_) | Outcome::Pieces(_) => true,
        }
    }
}

fn run_subject(
    engine: &Engine,
    pattern: &Pattern,
    opts: &Options,
    subject: &str,
) -> Result<Outcome, XRegexError> {
    let scope = if opts.all {
        Some(MatchScope::All)
    } else {
        None
    };
    match opts.mode {
        Mode::Match => {
            let mut found = Vec::new();
            if opts.all || pattern.is_global() {
                engine.for_each(subject, pattern, |m, _, _, _| found.push(m.clone()))?;
            } else if let Some(m) = engine.search(subject, pattern)? {
                found.push(m);
            }
            Ok(Outcome::Matches(found))
        }
        Mode::Replace => {
            let template = opts.template.as_deref().unwrap_or("");
            Ok(Outcome::Text(engine.replace(subject, pattern, template, scope)?))
        }
        Mode::Split => Ok(Outcome::Pieces(engine.split(
            subject,
            pattern,
            SplitLimit::Unlimited,
        )?)),
    }
}

fn print_plain(outcome: &Outcome) {
    match outcome {
        Outcome::Matches(found) => {
            for m in found {
                println!("{}", m.as_str());
            }
        }
        Outcome::Text(text) => println!("{}", text),
        Outcome::Pieces(pieces) => {
            for piece in pieces {
                println!("{}", piece.as_deref().unwrap_or(""));
            }
        }
    }
}

#[cfg(feature = "serde")]
fn print_json(outcome: &Outcome) -> Result<(), String> {
    use serde_json::Value;
    use xregex::serde::{match_to_json, to_json_string};

    let value = match outcome {
        Outcome::Matches(found) => Value::Array(
            found
                .iter()
                .map(match_to_json)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Outcome::Text(text) => Value::String(text.clone()),
        Outcome::Pieces(pieces) => Value::Array(
            pieces
                .iter()
                .map(|p| p.clone().map_or(Value::Null, Value::String))
                .collect(),
        ),
    };
    println!("{}", to_json_string(&value, false)?);
    Ok(())
}

#[cfg(not(feature = "serde"))]
fn print_json(_outcome: &Outcome) -> Result<(), String> {
    Err("JSON output needs the 'serde' feature".to_string())
}

fn main() -> ExitCode {
    env_logger::init();

    let opts = match parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("xre: {}", e);
            print_usage();
            return ExitCode::from(2);
        }
    };

    if opts.show_version {
        print_version();
        if opts.pattern.is_none() {
            return ExitCode::SUCCESS;
        }
    }

    let Some(source) = opts.pattern.as_deref() else {
        print_usage();
        return ExitCode::from(2);
    };

    let engine = match Engine::new(EngineOption::default()) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("xre: {}", e);
            return ExitCode::from(2);
        }
    };
    let pattern = match engine.compile(source, &opts.flags) {
        Ok(pattern) => pattern,
        Err(e) => {
            eprintln!("xre: {}", e);
            return ExitCode::from(2);
        }
    };
    debug!("pattern {:?} compiled to {:?}", source, pattern);

    let subjects: Box<dyn Iterator<Item = io::Result<String>>> = if opts.texts.is_empty() {
        Box::new(io::stdin().lock().lines())
    } else {
        Box::new(opts.texts.clone().into_iter().map(Ok))
    };

    let mut any_hit = false;
    for subject in subjects {
        let subject = match subject {
            Ok(subject) => subject,
            Err(e) => {
                eprintln!("xre: error reading stdin: {}", e);
                return ExitCode::from(2);
            }
        };
        let outcome = match run_subject(&engine, &pattern, &opts, &subject) {
            Ok(outcome) => outcome,
            Err(e) => {
                eprintln!("xre: {}", e);
                return ExitCode::from(2);
            }
        };
        any_hit |= outcome.is_hit();
        if opts.json {
            if let Err(e) = print_json(&outcome) {
                eprintln!("xre: {}", e);
                return ExitCode::from(2);
            }
        } else {
            print_plain(&outcome);
        }
    }

    if any_hit { ExitCode::SUCCESS } else { ExitCode::from(1) }
}
