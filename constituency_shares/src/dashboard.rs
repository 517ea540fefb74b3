//! The state of the dashboard and how each piece derives from the others.
//!
//! The pieces form a chain:
//!
//! ```text
//! RegionSelection -> ConstituencyOptions -> ConstituencySelection -> Chart
//! ```
//!
//! Changing one node recomputes every node after it, in that order. The
//! table itself is shared and never modified.

use std::sync::Arc;

use log::debug;

use crate::figure::{build_figure, Figure};
use crate::{
    constituency_options, default_selection, select_rows, ChartRules, ConstituencyOption,
    ProjectionTable,
};

/// A node of the derived state.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum StateNode {
    RegionSelection,
    ConstituencyOptions,
    ConstituencySelection,
    Chart,
}

impl StateNode {
    /// All the nodes, each one after the nodes it depends on.
    pub const ORDER: [StateNode; 4] = [
        StateNode::RegionSelection,
        StateNode::ConstituencyOptions,
        StateNode::ConstituencySelection,
        StateNode::Chart,
    ];

    /// The nodes that must be recomputed when this one changes, in order.
    pub fn downstream(&self) -> Vec<StateNode> {
        StateNode::ORDER
            .iter()
            .cloned()
            .filter(|n| n > self)
            .collect()
    }
}

/// The current state of the dashboard.
#[derive(Debug, Clone)]
pub struct Dashboard {
    table: Arc<ProjectionTable>,
    rules: ChartRules,
    selected_regions: Vec<String>,
    options: Vec<ConstituencyOption>,
    selected_constituencies: Vec<String>,
    figure: Figure,
}

impl Dashboard {
    /// The initial state: every region selected, and the default
    /// constituencies for them.
    pub fn new(table: Arc<ProjectionTable>, rules: &ChartRules) -> Dashboard {
        let regions = table.regions();
        Dashboard::with_regions(table, rules, &regions)
    }

    /// The state once `regions` are selected: their options, the default
    /// constituencies and the chart of those.
    pub fn with_regions(
        table: Arc<ProjectionTable>,
        rules: &ChartRules,
        regions: &[String],
    ) -> Dashboard {
        let mut d = Dashboard::unbuilt(table, rules, regions);
        d.recompute_from(StateNode::RegionSelection);
        d
    }

    /// The state once `regions` and then the constituencies `ids` are
    /// selected. The default selection is skipped and the chart is built
    /// only once, for `ids`.
    pub fn with_selection(
        table: Arc<ProjectionTable>,
        rules: &ChartRules,
        regions: &[String],
        ids: &[String],
    ) -> Dashboard {
        let mut d = Dashboard::unbuilt(table, rules, regions);
        d.recompute(StateNode::ConstituencyOptions);
        d.selected_constituencies = ids.to_vec();
        d.recompute(StateNode::Chart);
        d
    }

    fn unbuilt(table: Arc<ProjectionTable>, rules: &ChartRules, regions: &[String]) -> Dashboard {
        debug!(
            "Dashboard: {} regions selected out of {} rows",
            regions.len(),
            table.len()
        );
        Dashboard {
            table,
            rules: rules.clone(),
            selected_regions: regions.to_vec(),
            options: Vec::new(),
            selected_constituencies: Vec::new(),
            figure: build_figure(&[], rules.tiebreak_mode),
        }
    }

    /// All the regions that can be selected.
    pub fn regions(&self) -> Vec<String> {
        self.table.regions()
    }

    pub fn selected_regions(&self) -> &[String] {
        &self.selected_regions
    }

    pub fn options(&self) -> &[ConstituencyOption] {
        &self.options
    }

    pub fn selected_constituencies(&self) -> &[String] {
        &self.selected_constituencies
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    /// Changes the selected regions. The options, the default selection and
    /// the chart follow.
    ///
    /// Returns the nodes that were recomputed.
    pub fn select_regions(&mut self, regions: &[String]) -> Vec<StateNode> {
        self.selected_regions = regions.to_vec();
        self.recompute_from(StateNode::RegionSelection)
    }

    /// Changes the selected constituencies. Only the chart follows.
    ///
    /// Returns the nodes that were recomputed.
    pub fn select_constituencies(&mut self, ids: &[String]) -> Vec<StateNode> {
        self.selected_constituencies = ids.to_vec();
        self.recompute_from(StateNode::ConstituencySelection)
    }

    fn recompute_from(&mut self, changed: StateNode) -> Vec<StateNode> {
        let nodes = changed.downstream();
        for node in nodes.iter() {
            debug!("recompute_from: {:?} -> {:?}", changed, node);
            self.recompute(*node);
        }
        nodes
    }

    fn recompute(&mut self, node: StateNode) {
        match node {
            // Only ever set from the outside.
            StateNode::RegionSelection => {}
            StateNode::ConstituencyOptions => {
                self.options = constituency_options(&self.table, &self.selected_regions);
            }
            StateNode::ConstituencySelection => {
                self.selected_constituencies =
                    default_selection(&self.options, self.rules.default_selection_size);
            }
            StateNode::Chart => {
                let rows = select_rows(&self.table, &self.selected_constituencies);
                self.figure = build_figure(&rows, self.rules.tiebreak_mode);
            }
        }
    }
}
