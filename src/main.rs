mod problem;
mod verify;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use console::style;
use log::LevelFilter;
use serde::Serialize;
use tehai::algo::agari;
use tehai::hand::{count, parse_tiles, tiles_to_string};
use tehai::query::all_families;
use tehai::{Family, HandQuery, ShantenResult, Tile};

#[derive(Debug, Parser)]
#[command(name = "nanikiru", version, about = "Shanten calculator and checker for nanikiru problem sets")]
struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze a hand of 13 (shanten) or 14 (completion) tiles
    Analyze {
        /// Tiles as Unicode glyphs (🀇🀈🀉...) or compact notation (123m 456p 11z)
        #[arg(required = true)]
        hand: Vec<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
        /// Drop unrecognized glyphs instead of failing
        #[arg(long)]
        lossy: bool,
    },
    /// Check the shanten claimed by each problem's solution
    Verify {
        /// Problem numbers to check, all of them if omitted
        numbers: Vec<u32>,
        /// Directory holding the numbered problem directories
        #[arg(long, value_name = "DIR", env = "NANIKIRU_PROBLEMS_DIR", default_value = "problems")]
        problems_dir: PathBuf,
        /// Only problems whose theme contains this
        #[arg(short, long)]
        theme: Option<String>,
        /// Only problems of this difficulty (1-10)
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=10))]
        difficulty: Option<u8>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Serialize)]
#[serde(tag = "query", rename_all = "snake_case")]
enum Analysis {
    Shanten {
        hand: String,
        result: ShantenResult,
        families: [(Family, i8); 3],
        waits: Vec<Tile>,
        acceptance: u8,
    },
    Complete {
        hand: String,
        complete: bool,
        /// Also covers the seven pairs and thirteen orphans shapes.
        family: Option<Family>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.cmd {
        Command::Analyze { hand, json, lossy } => {
            let analysis = analyze(&hand.join(" "), lossy)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print_analysis(&analysis);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Verify {
            numbers,
            problems_dir,
            theme,
            difficulty,
            json,
        } => {
            let dirs = if numbers.is_empty() {
                problem::discover(&problems_dir)?
            } else {
                numbers
                    .iter()
                    .map(|&n| (n, problem::problem_dir(&problems_dir, n)))
                    .collect()
            };
            log::info!("verifying {} problems under {}", dirs.len(), problems_dir.display());

            let show_progress = !json && console::user_attended_stderr();
            let filter = verify::Filter { theme, difficulty };
            let report = verify::run(&dirs, &filter, show_progress)
                .with_context(|| format!("nothing to verify under {}", problems_dir.display()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                report.print_table();
            }

            Ok(if report.is_clean() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).parse_default_env().init();
}

/// Glyphs unless the input is plain ASCII, in which case it is compact
/// notation.
fn read_hand(input: &str, lossy: bool) -> Result<Vec<Tile>> {
    if input.is_ascii() {
        parse_tiles(input)
    } else if lossy {
        Ok(tehai::decode_lossy(input))
    } else {
        tehai::decode(input)
    }
}

fn analyze(input: &str, lossy: bool) -> Result<Analysis> {
    let tiles = read_hand(input, lossy)?;
    let tehai = count(&tiles);
    let hand = tiles_to_string(&tehai);

    match tiles.len() {
        13 => {
            let query = HandQuery::shanten_from_counts(tehai)?;
            let result = query.resolve();
            let families = all_families(&tehai)?;
            let waits = query.waits().to_vec();
            let acceptance = query.acceptance(&[]);
            Ok(Analysis::Shanten {
                hand,
                result,
                families,
                waits,
                acceptance,
            })
        }
        14 => {
            let query = HandQuery::complete_from_counts(tehai)?;
            let complete = query.resolve().shanten == -1;
            let family = agari::agari_family(&tehai)?;
            Ok(Analysis::Complete { hand, complete, family })
        }
        n => bail!("expected 13 or 14 tiles, got {n}"),
    }
}

fn print_analysis(analysis: &Analysis) {
    match analysis {
        Analysis::Shanten {
            hand,
            result,
            families,
            waits,
            acceptance,
        } => {
            println!("{hand}");
            println!(
                "{} ({:?})",
                style(verify::Describe(result.shanten)).bold(),
                result.family
            );
            for (family, value) in families {
                println!("  {:<16} {value}", format!("{family:?}"));
            }
            if !waits.is_empty() {
                let waits = waits.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ");
                println!("waits {} ({acceptance} left)", style(waits).cyan());
            }
        }
        Analysis::Complete { hand, complete, family } => {
            println!("{hand}");
            let verdict = if *complete {
                style("complete".to_owned()).green().bold()
            } else {
                style("not complete".to_owned()).red()
            };
            match family {
                Some(family) if !*complete => println!("{verdict} (but a {family:?} hand)"),
                Some(family) => println!("{verdict} ({family:?})"),
                None => println!("{verdict}"),
            }
        }
    }
}
