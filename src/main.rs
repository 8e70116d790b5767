
extern crate clap;
#[macro_use] extern crate log;
extern crate chrono;
extern crate fern;
extern crate term_grid;

pub mod assembler;

use clap::{App, Arg, ArgMatches};
use term_grid::{Cell, Direction, Filling, Grid, GridOptions};

use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    let args = process_arguments();
    initialize_logging(args.occurrences_of("verbose"));

    let ipath = Path::new(args.value_of("INPUT").unwrap());

    let source = match fs::read_to_string(ipath) {
        Err(err) => {
            error!("fatal: unable to read input file `{}`: {}", ipath.display(), err);
            std::process::exit(1);
        }
        Ok(source) => source,
    };

    // Assemble completely in memory. The output file is not touched until
    // every instruction has encoded, so a failed run can never leave a
    // stale or truncated ROM image behind.
    let asm = match assembler::assemble(&source) {
        Err(err) => {
            error!("{}", err);
            std::process::exit(1);
        }
        Ok(asm) => asm,
    };

    debug!(
        "assembled {} instruction(s) and {} label(s)",
        asm.words.len(),
        asm.symbols.len()
    );

    if args.is_present("print-debug") {
        let mut grid = Grid::new(GridOptions {
            filling: Filling::Spaces(1),
            direction: Direction::LeftToRight,
        });

        for (instruction, word) in asm.instructions.iter().zip(&asm.words) {
            grid.add(Cell::from(format!("0x{:02X}:", word.addr)));
            grid.add(Cell::from(instruction.raw.clone()));
            grid.add(Cell::from("=>".to_string()));
            grid.add(Cell::from(format!("0x{:04X}", word.word)));
        }

        println!("{}", grid.fit_into_columns(4));
    }

    let opath = match args.value_of("output") {
        Some(filename) => PathBuf::from(filename),
        None => ipath.with_extension("mif"),
    };

    let program_name = match ipath.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => ipath.display().to_string(),
    };

    let image = assembler::mif::render(&program_name, &asm.words);

    if let Err(err) = fs::write(&opath, image) {
        error!("fatal: unable to write output file `{}`: {}", opath.display(), err);
        std::process::exit(1);
    }
}

fn process_arguments() -> ArgMatches<'static> {
    App::new(option_env!("CARGO_PKG_NAME").unwrap())
        .version(option_env!("CARGO_PKG_VERSION").unwrap())
        .about(option_env!("CARGO_PKG_DESCRIPTION").unwrap())
        .arg(Arg::with_name("INPUT")
            .help("Sets the input assembly file")
            .required(true)
            .multiple(false)
            .index(1))
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .takes_value(false)
            .help("Sets the level of verbosity"))
        .arg(Arg::with_name("output")
            .short("o")
            .takes_value(true)
            .help("write the memory image to an outfile (default: INPUT with a .mif extension)"))
        .arg(Arg::with_name("print-debug")
            .short("d")
            .alias("show")
            .alias("s")
            .takes_value(false)
            .help("prints an address/instruction/word listing to STDOUT"))
        .get_matches()
}

fn initialize_logging(verbosity: u64) {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(match verbosity {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Warn,
            2 => log::LevelFilter::Info,
            3 | _ => log::LevelFilter::Debug,
        })
        .chain(std::io::stdout())
        .apply().ok();
}
