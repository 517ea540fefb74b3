use log::{debug, info};

use constituency_shares::*;
use snafu::{prelude::*, Snafu};

use std::net::SocketAddr;
use std::sync::Arc;

use crate::args::Args;

pub mod io_xlsx;
pub mod server;

#[derive(Debug, Snafu)]
pub enum DashError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Worksheet {worksheet:?} not found in {path}"))]
    MissingWorksheet { worksheet: String, path: String },
    #[snafu(display("Worksheet {worksheet:?} has no header row"))]
    EmptyExcel { worksheet: String },
    #[snafu(display("Cannot find column {column:?} in the header of the worksheet"))]
    ExcelCannotFindColumnInHeader { column: String },
    #[snafu(display("Unexpected cell in line {lineno}, column {column:?}: {content}"))]
    ExcelWrongCellType {
        lineno: u64,
        column: String,
        content: String,
    },
    #[snafu(display("Invalid tie-break order"))]
    InvalidTieBreak { source: ShareErrors },
    #[snafu(display("Invalid listen address {addr:?}"))]
    InvalidListenAddress {
        source: std::net::AddrParseError,
        addr: String,
    },
    #[snafu(display("Cannot listen on {addr}"))]
    Binding {
        source: std::io::Error,
        addr: SocketAddr,
    },
    #[snafu(display("Error while serving the dashboard"))]
    Serving { source: std::io::Error },
}

pub type DashResult<T> = Result<T, DashError>;

/// Turns the command line options into the rules of the chart.
pub fn validate_rules(args: &Args) -> DashResult<ChartRules> {
    let tiebreak_mode = match &args.tie_break_order {
        None => TieBreakMode::UseColumnOrder,
        Some(names) => {
            let mut parties: Vec<Party> = Vec::new();
            for name in names.iter() {
                let p = Party::from_name(name)
                    .ok_or_else(|| ShareErrors::UnknownParty(name.clone()))
                    .context(InvalidTieBreakSnafu {})?;
                parties.push(p);
            }
            TieBreakMode::priority(&parties).context(InvalidTieBreakSnafu {})?
        }
    };
    let rules = ChartRules {
        tiebreak_mode,
        ..ChartRules::DEFAULT_RULES
    };
    debug!("validate_rules: {:?}", rules);
    Ok(rules)
}

/// Loads the projection, then serves the dashboard until the process is stopped.
pub fn run_dashboard(args: &Args) -> DashResult<()> {
    let rules = validate_rules(args)?;
    let addr = args
        .listen
        .parse::<SocketAddr>()
        .context(InvalidListenAddressSnafu {
            addr: args.listen.clone(),
        })?;

    info!(
        "Attempting to read projection file {:?}, worksheet {:?}",
        args.input, args.excel_worksheet_name
    );
    let table = io_xlsx::read_projection(&args.input, &args.excel_worksheet_name)?;
    info!(
        "Loaded {} constituencies in {} regions",
        table.len(),
        table.regions().len()
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context(ServingSnafu {})?;
    runtime.block_on(server::serve(Arc::new(table), rules, addr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(extra: &[&str]) -> Args {
        let mut v = vec!["ukmrp"];
        v.extend_from_slice(extra);
        Args::parse_from(v)
    }

    #[test]
    fn default_rules_use_column_order() {
        let rules = validate_rules(&args(&[])).unwrap();
        assert_eq!(rules, ChartRules::DEFAULT_RULES);
    }

    #[test]
    fn tie_break_order_from_arguments() {
        let rules = validate_rules(&args(&[
            "--tie-break-order",
            "Lab",
            "--tie-break-order",
            "Con",
            "--tie-break-order",
            "LibDem",
            "--tie-break-order",
            "Green",
            "--tie-break-order",
            "Reform",
        ]))
        .unwrap();
        assert_eq!(rules.tiebreak_mode.rank(Party::Lab), 0);
        assert_eq!(rules.tiebreak_mode.rank(Party::Con), 1);
    }

    #[test]
    fn bad_tie_break_order() {
        let res = validate_rules(&args(&["--tie-break-order", "SNP"]));
        assert!(matches!(res, Err(DashError::InvalidTieBreak { .. })));
        let res = validate_rules(&args(&["--tie-break-order", "Lab"]));
        assert!(matches!(res, Err(DashError::InvalidTieBreak { .. })));
    }

    #[test]
    fn bad_listen_address() {
        let res = run_dashboard(&args(&["--listen", "not an address"]));
        assert!(matches!(res, Err(DashError::InvalidListenAddress { .. })));
    }
}
