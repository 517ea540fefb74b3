/*!

This is the long-form manual for `constituency_shares` and the `ukmrp` dashboard.

## Input format

The projection is read from one worksheet of an Excel (.xlsx) workbook. By default
the dashboard opens `YouGov_2024_general_election_MRP_2.xlsx` and the worksheet
`data-5sWjS (1)`; both can be changed with `--input` and `--excel-worksheet-name`.

The first row of the worksheet is the header. The following columns are required,
in any position:

| column        | content                                  |
|---------------|------------------------------------------|
| `region`      | name of the region                       |
| `area`        | display name of the constituency         |
| `const`       | identifier of the constituency           |
| `ConShare`    | projected share of the Conservatives (%) |
| `LabShare`    | projected share of Labour (%)            |
| `LibDemShare` | projected share of the Liberal Democrats |
| `GreenShare`  | projected share of the Greens            |
| `ReformShare` | projected share of Reform UK             |

Other columns are ignored. A blank share is treated as missing: it is drawn as
an empty bar and can never win.

## Winners and ties

The winner of a constituency is the party with the largest share. When several
parties share the maximum, the leftmost column wins (Con, then Lab, LibDem,
Green, Reform). A different order can be given with `--tie-break-order`,
repeated once per party:

```bash
ukmrp --tie-break-order Lab --tie-break-order Con --tie-break-order LibDem \
  --tie-break-order Green --tie-break-order Reform
```

## The page

The dashboard serves a single page on `--listen` (default `127.0.0.1:8050`).
Selecting regions refreshes the list of constituencies and selects the first five
of them. Selecting constituencies refreshes the chart only.

The page talks to two endpoints:
* `GET /api/state` the initial state, with every region selected,
* `POST /api/update` with `{"regions": [...]}` for a change of regions, or
  `{"regions": [...], "constituencies": [...]}` for a change of constituencies.

Both return the regions, the selections, the constituency options and the figure.
*/
