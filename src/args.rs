use clap::Parser;

pub const DEFAULT_INPUT: &str = "YouGov_2024_general_election_MRP_2.xlsx";
pub const DEFAULT_WORKSHEET: &str = "data-5sWjS (1)";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8050";

/// Interactive dashboard of the projected vote shares in each UK constituency.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The Excel workbook (.xlsx) containing the projection.
    #[clap(short, long, value_parser, default_value = DEFAULT_INPUT)]
    pub input: String,

    /// The name of the worksheet holding the projection.
    #[clap(long, value_parser, default_value = DEFAULT_WORKSHEET)]
    pub excel_worksheet_name: String,

    /// (address:port) Where the dashboard is served.
    #[clap(short, long, value_parser, default_value = DEFAULT_LISTEN)]
    pub listen: String,

    /// (party name, repeated, or not specified) If specified, the order in which parties win
    /// ties. It must name each of Con, Lab, LibDem, Green and Reform exactly once.
    /// By default, the leftmost column of the sheet wins.
    #[clap(long, value_parser)]
    pub tie_break_order: Option<Vec<String>>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
