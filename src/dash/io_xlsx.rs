// Primitives for reading the projection out of an Excel workbook.

use calamine::{open_workbook, DataType, Reader, Xlsx};
use std::collections::HashMap;

use log::{debug, info};
use snafu::prelude::*;

use constituency_shares::builder::Builder;
use constituency_shares::{ConstituencyRow, Party, ProjectionTable, Shares};

use crate::dash::*;

pub const REGION_COLUMN: &str = "region";
pub const AREA_COLUMN: &str = "area";
pub const ID_COLUMN: &str = "const";

/// 2^53: floats below this are exact integers.
const MAX_EXACT_INTEGER: f64 = 9007199254740992.0;

/// Where each of the required columns sits in the worksheet.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ColumnIndexes {
    pub region: usize,
    pub area: usize,
    pub id: usize,
    /// Indexed by `Party::index`.
    pub shares: [usize; 5],
}

pub fn read_projection(path: &str, worksheet: &str) -> DashResult<ProjectionTable> {
    let wrange = get_range(path, worksheet)?;
    debug!(
        "read_projection: path: {:?} worksheet: {:?} size: {:?}",
        path,
        worksheet,
        wrange.get_size()
    );
    parse_rows(worksheet, wrange.rows())
}

fn get_range(path: &str, worksheet: &str) -> DashResult<calamine::Range<DataType>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = workbook
        .worksheet_range(worksheet)
        .context(MissingWorksheetSnafu { worksheet, path })?
        .context(OpeningExcelSnafu { path })?;
    Ok(wrange)
}

/// Reads the rows of the worksheet. The first row is the header.
pub fn parse_rows<'a, I>(worksheet: &str, mut rows: I) -> DashResult<ProjectionTable>
where
    I: Iterator<Item = &'a [DataType]>,
{
    let header = rows.next().context(EmptyExcelSnafu { worksheet })?;
    debug!("parse_rows: header: {:?}", header);
    let cols = get_col_indexes(header)?;
    debug!("parse_rows: col_indexes: {:?}", cols);

    let mut builder = Builder::new();
    for (idx, row) in rows.enumerate() {
        // The header is on line 1.
        let lineno = (idx + 2) as u64;
        if is_blank(row) {
            debug!("parse_rows: lineno: {:?} skipping blank row", lineno);
            continue;
        }
        let mut shares = Shares::default();
        for party in Party::ALL {
            let v = read_share(row, cols.shares[party.index()], party.share_column(), lineno)?;
            shares.set(party, v);
        }
        let r = ConstituencyRow {
            region: read_text(row, cols.region, REGION_COLUMN, lineno)?,
            area: read_text(row, cols.area, AREA_COLUMN, lineno)?,
            id: read_text(row, cols.id, ID_COLUMN, lineno)?,
            shares,
        };
        debug!("parse_rows: lineno: {:?} row: {:?}", lineno, r);
        builder.add_row(r);
    }
    let table = builder.build();
    info!("parse_rows: {} constituencies read", table.len());
    Ok(table)
}

/// Given the header of the worksheet (names of each of the columns), finds the
/// position of every required column.
pub fn get_col_indexes(header: &[DataType]) -> DashResult<ColumnIndexes> {
    let mut col_names: HashMap<String, usize> = HashMap::new();
    for (idx, x) in header.iter().enumerate() {
        if let DataType::String(s) = x {
            // On duplicate names, the leftmost column wins.
            col_names.entry(s.trim().to_string()).or_insert(idx);
        }
    }

    let find = |cname: &str| -> DashResult<usize> {
        col_names
            .get(cname)
            .cloned()
            .context(ExcelCannotFindColumnInHeaderSnafu { column: cname })
    };

    let mut shares = [0usize; 5];
    for party in Party::ALL {
        shares[party.index()] = find(party.share_column())?;
    }
    Ok(ColumnIndexes {
        region: find(REGION_COLUMN)?,
        area: find(AREA_COLUMN)?,
        id: find(ID_COLUMN)?,
        shares,
    })
}

fn is_blank(row: &[DataType]) -> bool {
    row.iter().all(|c| match c {
        DataType::Empty => true,
        DataType::String(s) => s.trim().is_empty(),
        _ => false,
    })
}

fn read_text(row: &[DataType], idx: usize, column: &str, lineno: u64) -> DashResult<String> {
    match row.get(idx) {
        Some(DataType::String(s)) => Ok(s.clone()),
        // Identifiers sometimes come out of the sheet as numbers.
        Some(DataType::Int(i)) => Ok(i.to_string()),
        Some(DataType::Float(f)) if f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER => {
            Ok(format!("{}", *f as i64))
        }
        Some(DataType::Float(f)) => Ok(f.to_string()),
        Some(DataType::Empty) | None => Ok("".to_string()),
        Some(x) => ExcelWrongCellTypeSnafu {
            lineno,
            column,
            content: format!("{:?}", x),
        }
        .fail(),
    }
}

fn read_share(
    row: &[DataType],
    idx: usize,
    column: &str,
    lineno: u64,
) -> DashResult<Option<f64>> {
    match row.get(idx) {
        Some(DataType::Float(f)) => Ok(Some(*f)),
        Some(DataType::Int(i)) => Ok(Some(*i as f64)),
        Some(DataType::Empty) | None => Ok(None),
        Some(DataType::String(s)) if s.trim().is_empty() => Ok(None),
        Some(DataType::String(s)) => match s.trim().parse::<f64>() {
            Ok(f) => Ok(Some(f)),
            Err(_) => ExcelWrongCellTypeSnafu {
                lineno,
                column,
                content: s.clone(),
            }
            .fail(),
        },
        Some(x) => ExcelWrongCellTypeSnafu {
            lineno,
            column,
            content: format!("{:?}", x),
        }
        .fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(x: &str) -> DataType {
        DataType::String(x.to_string())
    }

    fn header() -> Vec<DataType> {
        vec![
            s("const"),
            s("area"),
            s("region"),
            s("ConShare"),
            s("LabShare"),
            s("LibDemShare"),
            s("GreenShare"),
            s("ReformShare"),
            s("notes"),
        ]
    }

    fn line(id: &str, area: &str, region: &str, shares: [DataType; 5]) -> Vec<DataType> {
        let mut v = vec![s(id), s(area), s(region)];
        v.extend(shares);
        v.push(DataType::Empty);
        v
    }

    fn floats(x: [f64; 5]) -> [DataType; 5] {
        x.map(DataType::Float)
    }

    fn parse(lines: &[Vec<DataType>]) -> DashResult<ProjectionTable> {
        parse_rows("data", lines.iter().map(|l| l.as_slice()))
    }

    #[test]
    fn reads_rows_in_order() {
        let lines = vec![
            header(),
            line(
                "E1",
                "Hackney South",
                "London",
                [
                    DataType::Float(8.0),
                    DataType::Float(55.5),
                    DataType::Int(4),
                    DataType::Float(22.0),
                    DataType::Float(7.5),
                ],
            ),
            line(
                "W1",
                "Cardiff East",
                "Wales",
                [
                    DataType::Float(12.1),
                    s("41.0"),
                    DataType::Empty,
                    DataType::Float(15.0),
                    DataType::Float(17.3),
                ],
            ),
        ];
        let t = parse(&lines).unwrap();
        assert_eq!(t.len(), 2);
        let r0 = &t.rows()[0];
        assert_eq!(r0.id, "E1");
        assert_eq!(r0.region, "London");
        assert_eq!(r0.shares.get(Party::LibDem), Some(4.0));
        let r1 = &t.rows()[1];
        assert_eq!(r1.area, "Cardiff East");
        assert_eq!(r1.shares.get(Party::Lab), Some(41.0));
        assert_eq!(r1.shares.get(Party::LibDem), None);
    }

    #[test]
    fn numeric_identifiers() {
        let mut l = line("", "Somewhere", "North", floats([1.0, 2.0, 3.0, 4.0, 5.0]));
        l[0] = DataType::Float(14000530.0);
        let t = parse(&[header(), l]).unwrap();
        assert_eq!(t.rows()[0].id, "14000530");
    }

    #[test]
    fn large_numeric_identifiers() {
        let mut l = line("", "Somewhere", "North", floats([1.0, 2.0, 3.0, 4.0, 5.0]));
        l[0] = DataType::Float(1e20);
        let mut l2 = line("", "Elsewhere", "North", floats([1.0, 2.0, 3.0, 4.0, 5.0]));
        l2[0] = DataType::Float(-9007199254740991.0);
        let t = parse(&[header(), l, l2]).unwrap();
        assert_eq!(t.rows()[0].id, "100000000000000000000");
        assert_eq!(t.rows()[1].id, "-9007199254740991");
    }

    #[test]
    fn duplicate_header_keeps_the_first_column() {
        let mut h = header();
        h.push(s("ConShare"));
        h.push(s(" area "));
        let mut l = line("N1", "Somewhere", "North", floats([1.0, 2.0, 3.0, 4.0, 5.0]));
        l.push(DataType::Float(99.0));
        l.push(s("Nowhere"));
        let t = parse(&[h, l]).unwrap();
        let r = &t.rows()[0];
        assert_eq!(r.shares.get(Party::Con), Some(1.0));
        assert_eq!(r.area, "Somewhere");
    }

    #[test]
    fn blank_rows_are_skipped() {
        let blank = vec![DataType::Empty; 9];
        let l = line("N1", "Somewhere", "North", floats([1.0, 2.0, 3.0, 4.0, 5.0]));
        let t = parse(&[header(), blank, l]).unwrap();
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn missing_column() {
        let mut h = header();
        h[6] = s("SNPShare");
        let res = parse(&[h]);
        match res {
            Err(DashError::ExcelCannotFindColumnInHeader { column }) => {
                assert_eq!(column, "GreenShare")
            }
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn empty_worksheet() {
        let res = parse(&[]);
        assert!(matches!(res, Err(DashError::EmptyExcel { .. })));
    }

    #[test]
    fn wrong_share_cell() {
        let mut l = line("N1", "Somewhere", "North", floats([1.0, 2.0, 3.0, 4.0, 5.0]));
        l[4] = s("lots");
        let res = parse(&[header(), l]);
        match res {
            Err(DashError::ExcelWrongCellType { lineno, column, .. }) => {
                assert_eq!(lineno, 2);
                assert_eq!(column, "LabShare");
            }
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn wrong_text_cell() {
        let mut l = line("N1", "Somewhere", "North", floats([1.0, 2.0, 3.0, 4.0, 5.0]));
        l[2] = DataType::Bool(true);
        let res = parse(&[header(), l]);
        assert!(matches!(res, Err(DashError::ExcelWrongCellType { .. })));
    }

    #[test]
    fn missing_file() {
        let res = read_projection("/nonexistent/projection.xlsx", "data");
        assert!(matches!(res, Err(DashError::OpeningExcel { .. })));
    }
}
