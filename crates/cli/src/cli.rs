use chrono::NaiveDate;
use std::path::PathBuf;

/// Arguments of the `fetch` subcommand.
#[derive(Debug)]
pub struct FetchArgs {
    pub out_dir: PathBuf,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub ticker: Option<String>,
    pub fred_series: Option<String>,
    pub monthly: bool,
}

/// Arguments of the `animate` subcommand.
#[derive(Debug)]
pub struct AnimateArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub frame_delay: Option<u32>,
    pub frame_step: Option<usize>,
}

#[derive(Debug)]
pub enum Command {
    Fetch(FetchArgs),
    Animate(AnimateArgs),
}

/// Parses command-line arguments using `clap`.
///
/// Every flag is optional; omitted flags keep the in-code defaults.
pub fn parse() -> Command {
    let matches = clap::Command::new("gold-replay")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Fetch historical gold prices and replay them as an animated chart")
        .subcommand_required(true)
        .subcommand(
            clap::Command::new("fetch")
                .about("Fetch FRED, Yahoo Finance and MacroTrends series and save them as CSV")
                .arg(
                    clap::Arg::new("out-dir")
                        .short('o')
                        .long("out-dir")
                        .help("Directory the CSV files are written to")
                        .default_value(".")
                        .num_args(1),
                )
                .arg(
                    clap::Arg::new("start")
                        .long("start")
                        .help("First day to request (YYYY-MM-DD); defaults per source")
                        .num_args(1)
                        .value_parser(clap::builder::ValueParser::new(parse_date)),
                )
                .arg(
                    clap::Arg::new("end")
                        .long("end")
                        .help("Last day to request (YYYY-MM-DD); defaults to today")
                        .num_args(1)
                        .value_parser(clap::builder::ValueParser::new(parse_date)),
                )
                .arg(
                    clap::Arg::new("ticker")
                        .long("ticker")
                        .help("Yahoo Finance ticker (default GC=F)")
                        .num_args(1),
                )
                .arg(
                    clap::Arg::new("fred-series")
                        .long("fred-series")
                        .help("FRED series id (default GOLDPMGBD228NLBM)")
                        .num_args(1),
                )
                .arg(
                    clap::Arg::new("monthly")
                        .long("monthly")
                        .help("Use the monthly MacroTrends table instead of the annual one")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            clap::Command::new("animate")
                .about("Replay a saved series as an animated GIF")
                .arg(
                    clap::Arg::new("input")
                        .short('i')
                        .long("input")
                        .help("CSV file with Date and price columns")
                        .default_value("gold_yahoo_gc_f.csv")
                        .num_args(1),
                )
                .arg(
                    clap::Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("GIF file to write")
                        .default_value("gold_animation.gif")
                        .num_args(1),
                )
                .arg(
                    clap::Arg::new("width")
                        .long("width")
                        .num_args(1)
                        .value_parser(clap::value_parser!(u32).range(100..)),
                )
                .arg(
                    clap::Arg::new("height")
                        .long("height")
                        .num_args(1)
                        .value_parser(clap::value_parser!(u32).range(100..)),
                )
                .arg(
                    clap::Arg::new("frame-delay")
                        .long("frame-delay")
                        .help("Milliseconds between frames")
                        .num_args(1)
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    clap::Arg::new("frame-step")
                        .long("frame-step")
                        .help("Encode every n-th frame (the last frame is always encoded)")
                        .num_args(1)
                        .value_parser(clap::builder::ValueParser::new(parse_usize_positive)),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("fetch", m)) => Command::Fetch(FetchArgs {
            out_dir: m.get_one::<String>("out-dir").map(PathBuf::from).unwrap_or_default(),
            start: m.get_one::<NaiveDate>("start").copied(),
            end: m.get_one::<NaiveDate>("end").copied(),
            ticker: m.get_one::<String>("ticker").cloned(),
            fred_series: m.get_one::<String>("fred-series").cloned(),
            monthly: m.get_flag("monthly"),
        }),
        Some(("animate", m)) => Command::Animate(AnimateArgs {
            input: m.get_one::<String>("input").map(PathBuf::from).unwrap_or_default(),
            output: m.get_one::<String>("output").map(PathBuf::from).unwrap_or_default(),
            width: m.get_one::<u32>("width").copied(),
            height: m.get_one::<u32>("height").copied(),
            frame_delay: m.get_one::<u32>("frame-delay").copied(),
            frame_step: m.get_one::<usize>("frame-step").copied(),
        }),
        _ => unreachable!("clap enforces a subcommand"),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("Not a YYYY-MM-DD date: {e}"))
}

fn parse_usize_positive(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("Must be a positive integer".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("Not a valid number: {}", e)),
    }
}
