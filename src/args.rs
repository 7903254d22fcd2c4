use clap::Parser;

/// This is a program that pairs participants with volunteers, based on the
/// days, times and languages declared in form exports.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file containing the matching configuration in JSON format.
    /// The input files it names are relative to its directory.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference file containing the summary of a matching in JSON format. If provided,
    /// vmatch will check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the matches will be written to the given
    /// location. Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (csv or json, default csv) The format of the output.
    #[clap(long, value_parser)]
    pub format: Option<String>,

    /// (file path or empty) The file with the participants. Setting this option overrides
    /// the participants file that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub participants: Option<String>,

    /// (file path or empty) The file with the volunteers. Setting this option overrides
    /// the volunteers file that may be specified with the --config option.
    #[clap(long, value_parser)]
    pub volunteers: Option<String>,

    /// (csv or xlsx, default csv) The type of the input files given with --participants and --volunteers.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using Excel files, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (exclusive or reusable, default exclusive) Whether a volunteer may be given to more
    /// than one participant.
    #[clap(long, value_parser)]
    pub mode: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
