//! The grouped bar chart, as a JSON document for the plotting library of the page.
//!
//! The structures mirror the figure format of plotly.js: a list of bar traces,
//! a layout and annotations. Only the fields the chart needs are modelled.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    constituency_winners, long_form, ConstituencyRow, LongFormRecord, Party, TieBreakMode,
    WinningFlag,
};

pub const CHART_TITLE: &str = "Vote Shares by Constituency";
pub const X_AXIS_TITLE: &str = "Constituency";
pub const Y_AXIS_TITLE: &str = "Vote Share (%)";
pub const LEGEND_TITLE: &str = "Party";

const TEXT_COLOR: &str = "#023047";
const BACKGROUND_COLOR: &str = "#f9f9f9";
const FONT_FAMILY: &str = "Arial";

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Font {
    pub family: String,
    pub size: u32,
    pub color: String,
}

impl Font {
    fn arial(size: u32) -> Font {
        Font {
            family: FONT_FAMILY.to_string(),
            size,
            color: TEXT_COLOR.to_string(),
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Marker {
    pub color: String,
}

/// One bar per constituency, for one party.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct BarTrace {
    #[serde(rename = "type")]
    pub trace_type: String,
    pub name: String,
    #[serde(rename = "legendgroup")]
    pub legend_group: String,
    pub marker: Marker,
    /// Display names of the constituencies.
    pub x: Vec<String>,
    /// Shares. Missing shares are `null`.
    pub y: Vec<Option<f64>>,
    /// The winning flag of each bar, carried along but not displayed.
    #[serde(rename = "customdata")]
    pub custom_data: Vec<WinningFlag>,
    #[serde(rename = "hovertemplate")]
    pub hover_template: String,
    #[serde(rename = "offsetgroup")]
    pub offset_group: String,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(rename = "xanchor", skip_serializing_if = "Option::is_none")]
    pub x_anchor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

impl Title {
    fn plain(text: &str) -> Title {
        Title {
            text: text.to_string(),
            x: None,
            x_anchor: None,
            font: None,
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Axis {
    pub title: Title,
    #[serde(rename = "tickangle", skip_serializing_if = "Option::is_none")]
    pub tick_angle: Option<i32>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Legend {
    pub title: Title,
    pub font: Font,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

/// A text label pointing at the winning bar of a constituency.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    pub x: String,
    pub y: f64,
    pub text: String,
    #[serde(rename = "showarrow")]
    pub show_arrow: bool,
    #[serde(rename = "arrowhead")]
    pub arrow_head: u32,
    pub ax: i32,
    pub ay: i32,
    #[serde(rename = "bgcolor")]
    pub bg_color: String,
    pub opacity: f64,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    pub title: Title,
    pub font: Font,
    #[serde(rename = "barmode")]
    pub bar_mode: String,
    #[serde(rename = "plot_bgcolor")]
    pub plot_bg_color: String,
    #[serde(rename = "paper_bgcolor")]
    pub paper_bg_color: String,
    #[serde(rename = "hovermode")]
    pub hover_mode: String,
    #[serde(rename = "xaxis")]
    pub x_axis: Axis,
    #[serde(rename = "yaxis")]
    pub y_axis: Axis,
    pub margin: Margin,
    pub legend: Legend,
    pub annotations: Vec<Annotation>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Figure {
    pub data: Vec<BarTrace>,
    pub layout: Layout,
}

impl Figure {
    /// Total number of bars across the traces.
    pub fn bar_count(&self) -> usize {
        self.data.iter().map(|t| t.y.len()).sum()
    }

    pub fn annotation_count(&self) -> usize {
        self.layout.annotations.len()
    }
}

fn base_layout() -> Layout {
    Layout {
        title: Title {
            text: CHART_TITLE.to_string(),
            x: Some(0.5),
            x_anchor: Some("center".to_string()),
            font: Some(Font::arial(20)),
        },
        font: Font::arial(14),
        bar_mode: "group".to_string(),
        plot_bg_color: BACKGROUND_COLOR.to_string(),
        paper_bg_color: BACKGROUND_COLOR.to_string(),
        hover_mode: "closest".to_string(),
        x_axis: Axis {
            title: Title::plain(X_AXIS_TITLE),
            tick_angle: Some(-45),
        },
        y_axis: Axis {
            title: Title::plain(Y_AXIS_TITLE),
            tick_angle: None,
        },
        margin: Margin {
            l: 40,
            r: 40,
            t: 40,
            b: 40,
        },
        legend: Legend {
            title: Title::plain(LEGEND_TITLE),
            font: Font::arial(12),
        },
        annotations: Vec::new(),
    }
}

fn bar_trace(party: Party, records: &[&LongFormRecord]) -> BarTrace {
    BarTrace {
        trace_type: "bar".to_string(),
        name: party.share_column().to_string(),
        legend_group: party.share_column().to_string(),
        marker: Marker {
            color: party.color().to_string(),
        },
        x: records.iter().map(|r| r.area.clone()).collect(),
        y: records.iter().map(|r| r.share).collect(),
        custom_data: records.iter().map(|r| r.winning).collect(),
        hover_template: format!(
            "Party={}<br>{}=%{{x}}<br>{}=%{{y:.2f}}<extra></extra>",
            party.share_column(),
            X_AXIS_TITLE,
            Y_AXIS_TITLE
        ),
        offset_group: party.share_column().to_string(),
    }
}

/// The text of the annotation of a winning party.
pub fn winner_text(party: Party) -> String {
    format!("{} Wins", party.label())
}

/// Builds the grouped bar chart of the given rows.
///
/// There is one trace per party (five in total), each holding one bar per row,
/// and one annotation per row that has a winner.
pub fn build_figure(rows: &[&ConstituencyRow], tiebreak_mode: TieBreakMode) -> Figure {
    let records = long_form(rows, tiebreak_mode);
    let data: Vec<BarTrace> = Party::ALL
        .iter()
        .map(|party| {
            let party_records: Vec<&LongFormRecord> =
                records.iter().filter(|r| r.party == *party).collect();
            bar_trace(*party, &party_records)
        })
        .collect();

    let mut layout = base_layout();
    for w in constituency_winners(rows, tiebreak_mode).into_iter().flatten() {
        layout.annotations.push(Annotation {
            x: w.area.clone(),
            y: w.share,
            text: winner_text(w.party),
            show_arrow: true,
            arrow_head: 2,
            ax: -30,
            ay: -30,
            bg_color: "#fff".to_string(),
            opacity: 0.7,
        });
    }
    debug!(
        "build_figure: {} rows, {} annotations",
        rows.len(),
        layout.annotations.len()
    );
    Figure { data, layout }
}
