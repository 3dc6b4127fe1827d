use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt};

use regexpy::app::App;
use regexpy::config::{Loader, user_config_path};
use regexpy::keybind::parse_moves;
use regexpy::render::{cell_styles, write_styled};
use regexpy::terminal::CrosstermTerminal;
use regexpy::{OptionFlags, PatternStructure, Session, Validity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Regular expression to test
    #[arg(value_name = "PATTERN", required_unless_present = "pattern_file")]
    pattern: Option<String>,

    /// Sample text file (stdin when omitted)
    #[arg(value_name = "SAMPLE")]
    sample: Option<PathBuf>,

    /// Read the pattern from a file; the first positional is then the sample
    #[arg(short = 'p', long, value_name = "FILE")]
    pattern_file: Option<PathBuf>,

    /// \d, \w and \s match ASCII only
    #[arg(long)]
    ascii: bool,

    /// Case-insensitive matching
    #[arg(short = 'i', long)]
    ignore_case: bool,

    /// ^ and $ match at line boundaries
    #[arg(short = 'm', long)]
    multiline: bool,

    /// . also matches newlines
    #[arg(short = 's', long)]
    dot_all: bool,

    /// Free-spacing pattern syntax with # comments
    #[arg(short = 'x', long)]
    verbose: bool,

    /// Configuration file layered over the defaults
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// List the pattern's groups
    #[arg(long)]
    groups: bool,

    /// Replay navigation moves: n/p next/previous match, g/G next/previous group, a anchor
    #[arg(long, value_name = "SEQ")]
    moves: Option<String>,

    /// Report the match and group under a character offset
    #[arg(long, value_name = "OFFSET")]
    locate: Option<usize>,

    /// Print the line number of each match
    #[arg(long)]
    markers: bool,

    /// Highlight the sample text
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Browse the matches in a full-screen viewer
    #[arg(long)]
    interactive: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let args = Args::parse();

    let mut loader = Loader::new();
    if let Some(path) = user_config_path() {
        loader = loader.with_optional_file(path);
    }
    if let Some(path) = args.config.as_ref() {
        loader = loader.with_file(path);
    }
    let configuration = loader.build().context("Failed to load configuration")?;

    let defaults = configuration.flags;
    let flags = OptionFlags {
        ascii: args.ascii || defaults.ascii,
        ignore_case: args.ignore_case || defaults.ignore_case,
        multiline: args.multiline || defaults.multiline,
        dot_all: args.dot_all || defaults.dot_all,
        verbose: args.verbose || defaults.verbose,
    };

    let (pattern, sample_path) = match args.pattern_file.as_ref() {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let sample = args.pattern.clone().map(PathBuf::from).or(args.sample.clone());
            (text.trim_end_matches(['\n', '\r']).to_string(), sample)
        }
        None => (args.pattern.clone().unwrap_or_default(), args.sample.clone()),
    };

    let moves = match args.moves.as_deref().map(parse_moves).transpose() {
        Ok(moves) => moves.unwrap_or_default(),
        Err(letter) => anyhow::bail!("Unknown move {letter:?}; expected one of n p g G a"),
    };

    let mut session = Session::new(configuration);
    match session.compile(&pattern, flags) {
        Ok(Validity::Empty) => {
            println!("Empty pattern");
            return Ok(ExitCode::SUCCESS);
        }
        Ok(_) => {}
        Err(err) => {
            eprintln!("{err}");
            return Ok(ExitCode::from(2));
        }
    }

    if args.groups
        && let Some(structure) = session.structure()
    {
        print_groups(structure);
    }

    let sample = match sample_path.as_ref() {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            text
        }
    };

    let report = session.search(&sample).context("Search failed")?;

    if args.interactive {
        let mut app = App::new(session);
        let mut terminal = CrosstermTerminal::new();
        app.run(&mut terminal)?;
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{} match{}",
        report.match_count,
        if report.match_count == 1 { "" } else { "es" }
    );
    print_matches(&session);

    for direction in moves {
        match session.navigate(direction) {
            Some(event) => {
                let span = event
                    .annotation
                    .group
                    .as_ref()
                    .and_then(|g| g.pattern_span.clone())
                    .map(|span| format!(" (pattern {}..{})", span.start, span.end))
                    .unwrap_or_default();
                println!("{direction:?}: {} at {}{span}", event.annotation, event.offset);
            }
            None => println!("{direction:?}: no move"),
        }
    }

    if let Some(offset) = args.locate {
        match session.hover(offset) {
            Some(annotation) => println!("At {offset}: {annotation}"),
            None => println!("At {offset}: no match"),
        }
    }

    if args.markers {
        let lines: Vec<String> = session.match_lines().iter().map(usize::to_string).collect();
        println!("Lines: {}", lines.join(" "));
    }

    let colour = match args.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => io::stdout().is_terminal(),
    };
    if colour && report.match_count > 0 {
        let text = session.sample().to_string();
        let styles = cell_styles(
            session.sample().len_chars(),
            &session.highlights(),
            session.configuration().palette.match_background,
            None,
        );
        let mut out = io::stdout().lock();
        write_styled(&mut out, &text, &styles, "\n")?;
        if !text.ends_with('\n') {
            writeln!(out)?;
        }
        out.flush()?;
    }

    Ok(ExitCode::SUCCESS)
}

fn print_groups(structure: &PatternStructure) {
    let mut ordinal = 0;
    for group in structure.groups() {
        let span = group.source_span();
        let kind = if group.capturing {
            ordinal += 1;
            match &group.name {
                Some(name) => format!("group {ordinal} <{name}>"),
                None => format!("group {ordinal}"),
            }
        } else {
            "non-capturing".to_string()
        };
        println!(
            "{:indent$}{}..{} {kind}",
            "",
            span.start,
            span.end,
            indent = group.level * 2
        );
    }
}

fn print_matches(session: &Session) {
    let sample = session.sample();
    let Some(structure) = session.structure() else {
        return;
    };
    for (i, m) in session.matches().iter().enumerate() {
        println!("[{}] {}..{} {:?}", i + 1, m.start, m.end, sample.slice(m.start..m.end).to_string());
        for (g, group) in m.groups.iter().enumerate() {
            if !group.participated {
                println!("    {}: -", structure.label(g));
                continue;
            }
            println!(
                "    {}: {}..{} {:?}",
                structure.label(g),
                group.start,
                group.end,
                sample.slice(group.start..group.end).to_string()
            );
        }
    }
}
