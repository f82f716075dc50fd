use std::fs;
use std::io::{self, Read};
use std::process;
use std::time::Instant;

use clap::{Arg, ArgAction, Command};
use log::{debug, error, info};

use problemist::position::notation::Language;
use problemist::{parse_tasks, Solution, Task};

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() {
    let matches = Command::new("problemist")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Solves chess problems written in the Popeye input language, or as EPD lines")
        .arg(
            Arg::new("input")
                .env("PROBLEMIST_INPUT")
                .value_name("FILE")
                .help("Problem file to solve. Reads standard input if omitted")
                .num_args(1),
        )
        .arg(
            Arg::new("language")
                .long("language")
                .env("PROBLEMIST_LANGUAGE")
                .help("Language of the solution output. Defaults to the language of the input")
                .num_args(1)
                .value_parser(["en", "fr", "de"]),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .env("PROBLEMIST_FORMAT")
                .help("Output format")
                .num_args(1)
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            Arg::new("logfile")
                .short('l')
                .long("logfile")
                .env("LOGFILE")
                .value_name("problemist.log")
                .help("Name of debug logfile")
                .num_args(1),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log search progress to stderr. Repeat for debug output")
                .action(ArgAction::Count),
        )
        .get_matches();

    let level = match matches.get_count("verbose") {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    if let Err(err) = setup_logger(matches.get_one::<String>("logfile"), level) {
        eprintln!("Couldn't open log file: {}", err);
        process::exit(1);
    }

    let input = match read_input(matches.get_one::<String>("input")) {
        Ok(input) => input,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };

    let mut tasks = match parse_tasks(&input) {
        Ok(tasks) => tasks,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };
    debug!("Solving {} problem(s)", tasks.len());

    let language: Option<Language> = matches
        .get_one::<String>("language")
        .and_then(|language| language.parse().ok());
    let json = matches.get_one::<String>("format").map(String::as_str) == Some("json");
    if json && cfg!(not(feature = "json")) {
        eprintln!("JSON output requires the json feature");
        process::exit(1);
    }

    for task in tasks.iter_mut() {
        if let Some(language) = language {
            task.display = task.display.clone().add_language(language);
        }
        solve_task(task, json);
    }
}

fn read_input(path: Option<&String>) -> Result<String, String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .map_err(|err| format!("Read failure (invalid file: \"{}\"): {}", path, err)),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .map_err(|err| format!("Read failure (standard input): {}", err))?;
            Ok(input)
        }
    }
}

fn solve_task(task: &mut Task, json: bool) {
    println!("{}", "-".repeat(72));
    if task.display.internal_board() {
        println!("{}", task.problem.diagram());
    }
    info!("Solving {}", task.problem.describe());

    let start_time = Instant::now();
    let solution = task.solve();
    let elapsed = start_time.elapsed();

    if json {
        print_json(&solution);
    } else {
        println!("{}", solution);
    }
    eprintln!("solved in {:.3}s", elapsed.as_secs_f64());
}

#[cfg(feature = "json")]
fn print_json(solution: &Solution) {
    match serde_json::to_string_pretty(solution) {
        Ok(output) => println!("{}", output),
        Err(err) => error!("Couldn't serialize solution: {}", err),
    }
}

#[cfg(not(feature = "json"))]
fn print_json(_solution: &Solution) {
    error!("JSON output requires the json feature");
}

fn setup_logger(log_file: Option<&String>, level: log::LevelFilter) -> Result<(), fern::InitError> {
    let log_dispatcher = fern::Dispatch::new().format(|out, message, record| {
        out.finish(format_args!(
            "{}[{}][{}] {}",
            chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
            record.target(),
            record.level(),
            message
        ))
    });

    match log_file {
        Some(log_file) => log_dispatcher
            .chain(
                fern::Dispatch::new()
                    .level(log::LevelFilter::Debug)
                    .chain(fern::log_file(log_file)?),
            )
            .chain(fern::Dispatch::new().level(level).chain(io::stderr()))
            .apply()?,
        None => log_dispatcher.level(level).chain(io::stderr()).apply()?,
    }
    Ok(())
}
