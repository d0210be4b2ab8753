use std::io::Read;

use finite_automata::prelude::*;

use owo_colors::OwoColorize;
use tracing::{debug, error, trace};
use tracing_subscriber::{filter, prelude::*};

use clap::{Arg, ArgAction, ArgMatches, Command};

fn input_arg() -> Arg {
    Arg::new("input")
        .help("file containing the automaton, standard input is read if omitted")
        .required(false)
}

fn cli() -> clap::Command {
    Command::new("fa")
        .about("Finite automata interaction")
        .subcommand_required(true)
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbosity")
                .global(true)
                .num_args(0..=1)
                .require_equals(true)
                .value_parser(["info", "debug", "trace"])
                .default_missing_value("info"),
        )
        .subcommand(
            Command::new("show")
                .about("prints the transition table of an automaton")
                .arg(input_arg()),
        )
        .subcommand(
            Command::new("accepts")
                .about("decides membership for each given tape")
                .arg(
                    Arg::new("tapes")
                        .required(true)
                        .num_args(1..)
                        .action(ArgAction::Append),
                )
                .arg(Arg::new("file").short('f').long("file")),
        )
        .subcommand(
            Command::new("determinize")
                .about("applies the subset construction to an automaton")
                .arg(input_arg())
                .arg(
                    Arg::new("minimize")
                        .short('m')
                        .long("minimize")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("rename")
                        .short('r')
                        .long("rename")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("dot")
                .about("prints an automaton in the DOT format")
                .arg(input_arg())
                .arg(Arg::new("name").short('n').long("name").default_value("A")),
        )
        .subcommand(
            Command::new("grammar")
                .about("reads a right-linear grammar and prints the equivalent automaton")
                .arg(input_arg()),
        )
        .subcommand(
            Command::new("moore")
                .about("runs a Moore machine, outputs are given as state=symbol")
                .arg(Arg::new("file").short('f').long("file"))
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .required(true)
                        .action(ArgAction::Append),
                )
                .arg(Arg::new("tape").required(true)),
        )
}

fn setup_logging(matches: &ArgMatches) {
    let Ok(Some(verbosity)) = matches.try_get_one::<String>("verbosity") else {
        return;
    };

    let level = match verbosity.as_str() {
        "trace" => filter::LevelFilter::TRACE,
        "debug" => filter::LevelFilter::DEBUG,
        _ => filter::LevelFilter::INFO,
    };

    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(level))
        .init();

    trace!("setup {level} logging");
}

fn read_input(matches: &ArgMatches, id: &str) -> Result<String> {
    match matches.get_one::<String>(id) {
        Some(path) => {
            debug!("reading input from {path}");
            Ok(std::fs::read_to_string(path)?)
        }
        None => {
            debug!("reading input from stdin");
            let mut text = String::new();
            std::io::stdin().lock().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn builder_from(matches: &ArgMatches, id: &str) -> Result<AutomatonBuilder> {
    read_input(matches, id)?.parse()
}

fn verdict(accepted: bool) -> String {
    if accepted {
        "accepted".green().to_string()
    } else {
        "rejected".red().to_string()
    }
}

fn parse_output(assignment: &str) -> Result<(String, char)> {
    let malformed = || Error::MalformedSpecification {
        line: 1,
        content: assignment.to_string(),
        reason: "expected an assignment of the form state=symbol".to_string(),
    };
    let (state, output) = assignment.split_once('=').ok_or_else(malformed)?;
    let mut chars = output.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) if !state.is_empty() => Ok((state.to_string(), symbol)),
        _ => Err(malformed()),
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("show", sub)) => {
            let automaton = builder_from(sub, "input")?.build()?;
            println!("{automaton}");
        }
        Some(("accepts", sub)) => {
            let automaton = builder_from(sub, "file")?.build()?;
            for tape in sub.get_many::<String>("tapes").into_iter().flatten() {
                println!("{tape:?}: {}", verdict(automaton.accepts(tape)));
            }
        }
        Some(("determinize", sub)) => {
            let mut dfa = builder_from(sub, "input")?.build()?.into_dfa();
            if sub.get_flag("minimize") {
                dfa = dfa.minimal_of();
            }
            if sub.get_flag("rename") {
                dfa = dfa.renamed_of();
            }
            debug!("resulting automaton has {} states", dfa.size());
            println!("{dfa}");
        }
        Some(("dot", sub)) => {
            let automaton = builder_from(sub, "input")?.build()?.into_nfa();
            let name = sub.get_one::<String>("name").map_or("A", String::as_str);
            println!("{}", automaton.dot_representation(name));
        }
        Some(("grammar", sub)) => {
            let text = read_input(sub, "input")?;
            let mut pool = SymbolPool::new();
            let grammar = GrammarBuilder::from_text(&text, &mut pool)?;
            debug!("{pool}");
            println!("{}", grammar.display(&pool));
            println!("{}", automaton_of(&grammar, &pool)?);
        }
        Some(("moore", sub)) => {
            let lambda = sub
                .get_many::<String>("output")
                .into_iter()
                .flatten()
                .map(|assignment| parse_output(assignment))
                .collect::<Result<Vec<_>>>()?;
            let moore = builder_from(sub, "file")?.build_moore(lambda)?;
            println!("{moore}");
            let tape = sub.get_one::<String>("tape").map_or("", String::as_str);
            match moore.transduce(tape) {
                Ok(output) => println!("{output:?} {}", verdict(moore.accepts(tape))),
                Err(partial) => println!("{partial:?} {}", "stuck".yellow()),
            }
        }
        _ => unreachable!("clap requires a subcommand"),
    }
    Ok(())
}

pub fn main() {
    let matches = cli().get_matches();

    setup_logging(&matches);

    if let Err(e) = run(&matches) {
        error!("{e}");
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}
