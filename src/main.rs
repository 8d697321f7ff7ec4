#[macro_use]
extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;

use std::path::PathBuf;
use std::process;

use cdcl_sat::sat::{self, Config, SatResult};
use cdcl_sat::RunOptions;

/// Command-line surface of spec §6: `-i/--input_file`, `-d/--decider`,
/// `-r/--restarter`, `-b/--bve`, `-t/--test`. Built with `clap`'s 2.x
/// declarative `App`/`Arg` API, the same major version and style the
/// teacher's `main.rs` uses, `possible_values` rejecting an unknown
/// decider/restarter at parse time in addition to the engine's own
/// construction-time check (SPEC_FULL.md §7, "belt and suspenders").
fn main() {
    let bool_values = ["True", "False"];
    let decider_values = ["VSIDS", "LRB", "CHB"];
    let restarter_values = ["GEOMETRIC", "LUBY", "NO_RESTART"];

    let matches = clap::App::new("cdcl-sat")
        .version(&crate_version!()[..])
        .about("CDCL SAT solver over DIMACS CNF")
        .arg(
            clap::Arg::with_name("input_file")
                .short("i")
                .long("input_file")
                .takes_value(true)
                .required(true)
                .help("Path to the input DIMACS CNF file"),
        )
        .arg(
            clap::Arg::with_name("decider")
                .short("d")
                .long("decider")
                .takes_value(true)
                .possible_values(&decider_values)
                .default_value("VSIDS")
                .help("Branching heuristic"),
        )
        .arg(
            clap::Arg::with_name("restarter")
                .short("r")
                .long("restarter")
                .takes_value(true)
                .possible_values(&restarter_values)
                .default_value("LUBY")
                .help("Restart schedule"),
        )
        .arg(
            clap::Arg::with_name("bve")
                .short("b")
                .long("bve")
                .takes_value(true)
                .possible_values(&bool_values)
                .default_value("False")
                .help("Run bounded variable elimination before search"),
        )
        .arg(
            clap::Arg::with_name("test")
                .short("t")
                .long("test")
                .takes_value(true)
                .possible_values(&bool_values)
                .default_value("True")
                .help("Verify a SAT result against the original clauses"),
        )
        .get_matches();

    env_logger::Builder::from_default_env().filter_level(log::LevelFilter::Info).init();

    let decider = sat::parse_decider(matches.value_of("decider").unwrap()).unwrap_or_else(|e| {
        eprintln!("{}", e);
        process::exit(2);
    });
    let restarter = sat::parse_restarter(matches.value_of("restarter").unwrap()).unwrap_or_else(|e| {
        eprintln!("{}", e);
        process::exit(2);
    });
    let bve = matches.value_of("bve").unwrap() == "True";
    let run_verifier = matches.value_of("test").unwrap() == "True";

    let config = Config { decider, restarter, bve, restart_base: sat::DEFAULT_RESTART_BASE };
    let options = RunOptions {
        input_path: PathBuf::from(matches.value_of("input_file").unwrap()),
        results_dir: Some(PathBuf::from("Results")),
        run_verifier,
    };

    match cdcl_sat::run(options, config) {
        Ok(solved) => match solved.result {
            SatResult::Sat(_) => println!("SATISFIABLE"),
            SatResult::Unsat => println!("UNSATISFIABLE"),
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
