/*!

Projected vote shares per constituency.

This crate holds the logic behind the constituency dashboard:
- which constituencies are offered for a set of regions,
- which of them are selected by default,
- who wins each constituency, under an explicit tie-break policy,
- the long form of the shares and the grouped bar figure built from it.

Everything here is synchronous and works on an immutable [ProjectionTable].
The way the pieces depend on each other is described in [dashboard].

See the [manual] for the input format.
*/

pub mod builder;
mod config;
pub mod dashboard;
pub mod figure;
pub mod manual;

use log::{debug, info};

use std::collections::HashSet;

pub use crate::config::*;

/// The projection, as loaded from the sheet.
///
/// The table is read-only once built and is meant to be shared.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct ProjectionTable {
    rows: Vec<ConstituencyRow>,
}

impl ProjectionTable {
    pub fn from_rows(rows: Vec<ConstituencyRow>) -> ProjectionTable {
        info!("ProjectionTable: {} constituencies", rows.len());
        ProjectionTable { rows }
    }

    pub fn rows(&self) -> &[ConstituencyRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The distinct regions, in order of first appearance.
    pub fn regions(&self) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut res: Vec<String> = Vec::new();
        for r in self.rows.iter() {
            if seen.insert(r.region.as_str()) {
                res.push(r.region.clone());
            }
        }
        res
    }
}

/// The constituencies offered for the given regions.
///
/// Every row whose region is selected produces an option, in table order.
/// Nothing is deduplicated or sorted.
pub fn constituency_options(
    table: &ProjectionTable,
    selected_regions: &[String],
) -> Vec<ConstituencyOption> {
    let regions: HashSet<&str> = selected_regions.iter().map(|s| s.as_str()).collect();
    let res: Vec<ConstituencyOption> = table
        .rows()
        .iter()
        .filter(|r| regions.contains(r.region.as_str()))
        .map(|r| ConstituencyOption {
            label: r.area.clone(),
            value: r.id.clone(),
        })
        .collect();
    debug!(
        "constituency_options: {} regions -> {} options",
        selected_regions.len(),
        res.len()
    );
    res
}

/// The constituencies selected when the options change: the first `count`
/// options, or all of them if there are fewer.
pub fn default_selection(options: &[ConstituencyOption], count: usize) -> Vec<String> {
    options.iter().take(count).map(|o| o.value.clone()).collect()
}

/// The rows of the selected constituencies, in table order.
///
/// Identifiers that are not in the table are ignored.
pub fn select_rows<'a>(
    table: &'a ProjectionTable,
    selected_ids: &[String],
) -> Vec<&'a ConstituencyRow> {
    let ids: HashSet<&str> = selected_ids.iter().map(|s| s.as_str()).collect();
    table
        .rows()
        .iter()
        .filter(|r| ids.contains(r.id.as_str()))
        .collect()
}

/// The party with the largest share.
///
/// Missing shares never win. Equal maxima are resolved by the tie-break mode.
/// Returns None when all the shares are missing.
pub fn compute_winner(shares: &Shares, tiebreak_mode: TieBreakMode) -> Option<Party> {
    let mut best: Option<(Party, f64)> = None;
    for party in Party::ALL {
        let v = match shares.get(party) {
            Some(v) if !v.is_nan() => v,
            _ => continue,
        };
        best = match best {
            None => Some((party, v)),
            Some((_, bv)) if v > bv => Some((party, v)),
            Some((bp, bv)) if v == bv && tiebreak_mode.rank(party) < tiebreak_mode.rank(bp) => {
                Some((party, v))
            }
            x => x,
        };
    }
    best.map(|(p, _)| p)
}

/// The winner of each row, in row order. Rows without any share have no winner.
pub fn constituency_winners(
    rows: &[&ConstituencyRow],
    tiebreak_mode: TieBreakMode,
) -> Vec<Option<ConstituencyWinner>> {
    rows.iter()
        .map(|r| {
            let party = compute_winner(&r.shares, tiebreak_mode)?;
            let share = r.shares.get(party)?;
            Some(ConstituencyWinner {
                id: r.id.clone(),
                area: r.area.clone(),
                party,
                share,
            })
        })
        .collect()
}

/// Reshapes the rows into one record per (constituency, party), flagging the
/// winner of each constituency.
///
/// The records are grouped by party: all the records of the first party in
/// row order, then the second party, and so on.
pub fn long_form(rows: &[&ConstituencyRow], tiebreak_mode: TieBreakMode) -> Vec<LongFormRecord> {
    let winners: Vec<Option<Party>> = rows
        .iter()
        .map(|r| compute_winner(&r.shares, tiebreak_mode))
        .collect();
    let mut res: Vec<LongFormRecord> = Vec::with_capacity(rows.len() * Party::ALL.len());
    for party in Party::ALL {
        for (r, winner) in rows.iter().zip(winners.iter()) {
            let winning = if *winner == Some(party) {
                WinningFlag::Yes
            } else {
                WinningFlag::No
            };
            res.push(LongFormRecord {
                id: r.id.clone(),
                area: r.area.clone(),
                party,
                share: r.shares.get(party),
                winning,
            });
        }
    }
    debug!("long_form: {} rows -> {} records", rows.len(), res.len());
    res
}
