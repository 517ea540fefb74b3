pub use crate::config::*;
use crate::ProjectionTable;

/// A builder for assembling a projection table, one constituency at a time.
///
/// ```
/// pub use constituency_shares::builder::Builder;
/// # use constituency_shares::ShareErrors;
///
/// let mut builder = Builder::new();
/// builder.add_row_simple("London", "Hackney South", "E14001275", &[8.0, 55.5, 4.0, 22.0, 7.5]);
/// builder.add_row_simple("Wales", "Cardiff East", "W07000099", &[12.1, 41.0, 9.2, 15.0, 17.3]);
///
/// let table = builder.build();
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.regions(), vec!["London".to_string(), "Wales".to_string()]);
///
/// # Ok::<(), ShareErrors>(())
/// ```
#[derive(Debug, Default)]
pub struct Builder {
    _rows: Vec<ConstituencyRow>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder { _rows: Vec::new() }
    }

    /// Adds a constituency where every share is known.
    ///
    /// shares: the five shares in column order (Con, Lab, LibDem, Green, Reform).
    /// Extra values are ignored, absent values are treated as missing.
    pub fn add_row_simple(&mut self, region: &str, area: &str, id: &str, shares: &[f64]) {
        let mut s = Shares::default();
        for (party, v) in Party::ALL.iter().zip(shares.iter()) {
            s.set(*party, Some(*v));
        }
        self.add_row(ConstituencyRow {
            region: region.to_string(),
            area: area.to_string(),
            id: id.to_string(),
            shares: s,
        });
    }

    pub fn add_row(&mut self, row: ConstituencyRow) {
        self._rows.push(row);
    }

    /// Freezes the rows. The table is never modified afterwards.
    pub fn build(self) -> ProjectionTable {
        ProjectionTable::from_rows(self._rows)
    }
}
