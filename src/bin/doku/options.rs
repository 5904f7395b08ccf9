use std::path::PathBuf;

use anyhow::Result;
use clap::ArgMatches;
use doku::solve::Solver;

#[derive(Clone)]
pub(crate) struct Options {
    source: Source,
    kind: Kind,
    solver: String,
}

impl Options {
    pub fn from_args() -> Result<Self> {
        Self::from_arg_matches(&clap_app().get_matches())
    }

    fn from_arg_matches(matches: &ArgMatches<'_>) -> Result<Self> {
        let source = if let Some(path) = matches.value_of("input") {
            Source::File(path.into())
        } else if let Some(s) = matches.value_of("puzzle") {
            Source::Literal(s.into())
        } else {
            Source::Sample(matches.value_of("sample").unwrap().into())
        };
        let kind = match matches.value_of("kind") {
            Some("latin") => Kind::Latin,
            _ => Kind::Sudoku,
        };
        let options = Self {
            source,
            kind,
            solver: matches.value_of("solver").unwrap().into(),
        };
        Ok(options)
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn solver(&self) -> &str {
        &self.solver
    }
}

#[derive(Clone)]
pub(crate) enum Source {
    File(PathBuf),
    Literal(String),
    Sample(String),
}

#[derive(Copy, Clone)]
pub(crate) enum Kind {
    Latin,
    Sudoku,
}

fn clap_app() -> clap::App<'static, 'static> {
    use clap::{App, AppSettings, Arg, ArgGroup};

    App::new("doku")
        .help_message("Solve Latin square and Sudoku puzzles")
        .setting(AppSettings::ArgRequiredElseHelp)
        .group(
            ArgGroup::with_name("source")
                .args(&["input", "puzzle", "sample"])
                .required(true),
        )
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .takes_value(true)
                .value_name("PATH")
                .help("read a puzzle string from a file")
                .display_order(1),
        )
        .arg(
            Arg::with_name("puzzle")
                .short("p")
                .long("puzzle")
                .takes_value(true)
                .value_name("STRING")
                .help("a puzzle string, one character per cell, '.' for empty")
                .display_order(1),
        )
        .arg(
            Arg::with_name("sample")
                .long("sample")
                .takes_value(true)
                .value_name("LABEL")
                .help("solve a built-in sample puzzle")
                .display_order(1),
        )
        .arg(
            Arg::with_name("kind")
                .short("k")
                .long("kind")
                .takes_value(true)
                .possible_values(&["latin", "sudoku"])
                .default_value("sudoku")
                .help("the puzzle variant"),
        )
        .arg(
            Arg::with_name("solver")
                .short("s")
                .long("solver")
                .takes_value(true)
                .possible_values(&Solver::NAMES)
                .default_value("propagation")
                .help("the solving strategy"),
        )
}
