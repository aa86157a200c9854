use clap::{value_parser, Arg, Command, ValueHint};
use ionseries_cli::input::Input;
use ionseries_cli::runner::Runner;
use rayon::ThreadPoolBuilder;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::default()
        .filter_level(log::LevelFilter::Error)
        .parse_env(
            env_logger::Env::default()
                .filter_or("IONSERIES_LOG", "error,ionseries_core=info,ionseries_cli=info"),
        )
        .init();

    let matches = Command::new("ionseries")
        .version(clap::crate_version!())
        .about("Classify fragment-ion series coverage of identified peptides")
        .arg(
            Arg::new("mzid_paths")
                .num_args(0..)
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help(
                    "Paths to identification documents (JSON) to process. Overrides \
                     documents listed in the configuration file.",
                )
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("parameters")
                .short('p')
                .long("parameters")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help("Path to configuration parameters (JSON file)")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("output_directory")
                .short('o')
                .long("output_directory")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help(
                    "Path where classification results will be written. \
                     Overrides the directory specified in the configuration file.",
                )
                .value_hint(ValueHint::DirPath),
        )
        .arg(
            Arg::new("intensity")
                .short('i')
                .long("intensity")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help("Intensity threshold. Examples: 95.0, 95%, 0.95 (default = 5%)")
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .value_parser(value_parser!(u16).range(1..))
                .help("Number of worker threads for classification (default = # of CPUs)")
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("fallback-to-all")
                .long("fallback-to-all")
                .action(clap::ArgAction::SetTrue)
                .help(
                    "Report the union of all covered positions for PSMs without a \
                     complete ion series, instead of an empty index set",
                ),
        )
        .get_matches();

    let input = Input::from_arguments(matches)?;
    let search = input.build()?;

    ThreadPoolBuilder::new()
        .num_threads(search.threads)
        .build_global()
        .expect("configure rayon pool");

    Runner::new(search)?.run()
}
