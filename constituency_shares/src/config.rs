// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The parties covered by the projection, in the column order of the sheet.
///
/// The column order matters: it is the default order used to break ties
/// between equal shares.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum Party {
    Con,
    Lab,
    LibDem,
    Green,
    Reform,
}

impl Party {
    /// All the parties, in column order.
    pub const ALL: [Party; 5] = [
        Party::Con,
        Party::Lab,
        Party::LibDem,
        Party::Green,
        Party::Reform,
    ];

    /// The name of the share column in the sheet. It is also the legend entry
    /// of the chart.
    pub fn share_column(&self) -> &'static str {
        match self {
            Party::Con => "ConShare",
            Party::Lab => "LabShare",
            Party::LibDem => "LibDemShare",
            Party::Green => "GreenShare",
            Party::Reform => "ReformShare",
        }
    }

    /// The short label, as used in the winner annotations.
    pub fn label(&self) -> &'static str {
        match self {
            Party::Con => "Con",
            Party::Lab => "Lab",
            Party::LibDem => "LibDem",
            Party::Green => "Green",
            Party::Reform => "Reform",
        }
    }

    /// Fixed bar colour of the party.
    pub fn color(&self) -> &'static str {
        match self {
            Party::Con => "#8ecae6",
            Party::Lab => "#ffb703",
            Party::LibDem => "#fb8500",
            Party::Green => "#219ebc",
            Party::Reform => "#adb5bd",
        }
    }

    /// Column position, starting at 0.
    pub fn index(&self) -> usize {
        match self {
            Party::Con => 0,
            Party::Lab => 1,
            Party::LibDem => 2,
            Party::Green => 3,
            Party::Reform => 4,
        }
    }

    /// Accepts either the short label (`Lab`) or the column name (`LabShare`),
    /// ignoring case.
    pub fn from_name(name: &str) -> Option<Party> {
        let n = name.trim().to_ascii_lowercase();
        Party::ALL.iter().cloned().find(|p| {
            p.label().to_ascii_lowercase() == n || p.share_column().to_ascii_lowercase() == n
        })
    }
}

impl Display for Party {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The five projected shares of a constituency, indexed by `Party::index`.
///
/// A share may be missing when the cell was left blank in the sheet.
#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub struct Shares(pub [Option<f64>; 5]);

impl Shares {
    pub fn get(&self, party: Party) -> Option<f64> {
        self.0[party.index()]
    }

    pub fn set(&mut self, party: Party, value: Option<f64>) {
        self.0[party.index()] = value;
    }
}

/// One line of the projection: one constituency.
#[derive(PartialEq, Debug, Clone)]
pub struct ConstituencyRow {
    pub region: String,
    /// Display name of the constituency.
    pub area: String,
    /// Identifier of the constituency (the `const` column).
    pub id: String,
    pub shares: Shares,
}

/// An entry of the constituency dropdown.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Serialize, Deserialize)]
pub struct ConstituencyOption {
    pub label: String,
    pub value: String,
}

// ******** Output data structures *********

/// Whether a party is the winner of the constituency. Serialized as
/// `Yes` / `No`.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum WinningFlag {
    Yes,
    No,
}

impl WinningFlag {
    pub fn is_yes(&self) -> bool {
        matches!(self, WinningFlag::Yes)
    }
}

/// A row of the long form: one (constituency, party) observation.
#[derive(PartialEq, Debug, Clone)]
pub struct LongFormRecord {
    pub id: String,
    pub area: String,
    pub party: Party,
    pub share: Option<f64>,
    pub winning: WinningFlag,
}

/// The computed winner of one constituency.
#[derive(PartialEq, Debug, Clone)]
pub struct ConstituencyWinner {
    pub id: String,
    pub area: String,
    pub party: Party,
    pub share: f64,
}

/// Errors raised by the library.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ShareErrors {
    /// The priority list of a tie-break must name every party exactly once.
    InvalidTieBreakOrder(Vec<Party>),
    UnknownParty(String),
}

impl Error for ShareErrors {}

impl Display for ShareErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShareErrors::InvalidTieBreakOrder(order) => write!(
                f,
                "tie-break order must list each of the 5 parties exactly once, got {:?}",
                order
            ),
            ShareErrors::UnknownParty(name) => write!(f, "unknown party {:?}", name),
        }
    }
}

// ********* Configuration **********

/// How to pick a winner among equal maximum shares.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum TieBreakMode {
    /// The leftmost column among the equal maxima.
    UseColumnOrder,
    /// The party listed first among the equal maxima.
    Priority([Party; 5]),
}

impl TieBreakMode {
    /// Builds a priority tie-break. Every party must appear exactly once.
    pub fn priority(order: &[Party]) -> Result<TieBreakMode, ShareErrors> {
        let mut res = Party::ALL;
        if order.len() != res.len() {
            return Err(ShareErrors::InvalidTieBreakOrder(order.to_vec()));
        }
        for (idx, p) in order.iter().enumerate() {
            if order[..idx].contains(p) {
                return Err(ShareErrors::InvalidTieBreakOrder(order.to_vec()));
            }
            res[idx] = *p;
        }
        Ok(TieBreakMode::Priority(res))
    }

    /// The rank of the party under this policy: lower ranks win ties.
    pub fn rank(&self, party: Party) -> usize {
        match self {
            TieBreakMode::UseColumnOrder => party.index(),
            TieBreakMode::Priority(order) => order
                .iter()
                .position(|p| *p == party)
                .unwrap_or(order.len()),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ChartRules {
    pub tiebreak_mode: TieBreakMode,
    /// Number of constituencies selected by default when the options change.
    pub default_selection_size: usize,
}

impl ChartRules {
    pub const DEFAULT_RULES: ChartRules = ChartRules {
        tiebreak_mode: TieBreakMode::UseColumnOrder,
        default_selection_size: 5,
    };
}

impl Default for ChartRules {
    fn default() -> Self {
        ChartRules::DEFAULT_RULES
    }
}
