//! Breadth-first infection over a directed graph.
//!
//! Infection starts at the root nodes (no incoming edges) and travels along
//! outgoing edges. Every seed in the infected set is expanded in order, including
//! the nodes that got infected while the run was in progress. Each successor group
//! of a seed is a step and gets handed to a [`StepSink`].

use std::collections::{HashSet, VecDeque};

use petgraph::{graph::NodeIndex, Direction};
use tracing::{debug, info, warn};

use crate::{
    error::{InfectionError, Result},
    generator::InfectionGraph,
};

/// Groups withheld per seed by the limited variant unless configured otherwise
pub const DEFAULT_IMMUNE_GROUPS: usize = 4;

/// Ordered, append-only set of infected nodes
#[derive(Clone, Debug, Default)]
pub struct InfectedSet {
    order: Vec<NodeIndex>,
    members: HashSet<NodeIndex>,
}

impl InfectedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Infected set seeded with every root node of `graph`
    pub fn from_roots(graph: &InfectionGraph) -> Self {
        root_nodes(graph).into_iter().collect()
    }

    /// Marks `node` as infected. Returns `false` if it already was.
    pub fn infect(&mut self, node: NodeIndex) -> bool {
        if self.members.insert(node) {
            self.order.push(node);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, node: NodeIndex) -> bool {
        self.members.contains(&node)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Node infected at position `i`
    pub fn get(&self, i: usize) -> Option<NodeIndex> {
        self.order.get(i).copied()
    }

    /// Nodes in infection order
    pub fn as_slice(&self) -> &[NodeIndex] {
        &self.order
    }

}

impl FromIterator<NodeIndex> for InfectedSet {
    fn from_iter<I: IntoIterator<Item = NodeIndex>>(iter: I) -> Self {
        let mut set = Self::new();
        for node in iter {
            set.infect(node);
        }
        set
    }
}

/// Returns every node without predecessors, in index order
pub fn root_nodes(graph: &InfectionGraph) -> Vec<NodeIndex> {
    graph
        .node_indices()
        .filter(|&n| {
            graph
                .neighbors_directed(n, Direction::Incoming)
                .next()
                .is_none()
        })
        .collect()
}

/// How the nodes discovered by a breadth-first search get partitioned
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Grouping {
    /// One group per visited node holding the nodes it discovered
    #[default]
    ByParent,
    /// One group per distance from the seed
    ByDistance,
}

/// Breadth-first search from `seed`, returning the discovered nodes in groups.
///
/// The seed itself is not part of any group. Neighbours are expanded in index
/// order, so the result only depends on the graph. A seed without outgoing
/// edges yields no groups.
pub fn successor_groups(
    graph: &InfectionGraph,
    seed: NodeIndex,
    grouping: Grouping,
) -> Result<Vec<Vec<NodeIndex>>> {
    if graph.node_weight(seed).is_none() {
        return Err(InfectionError::NodeOutOfBounds(seed.index()));
    }

    let mut groups: Vec<Vec<NodeIndex>> = vec![];
    let mut discovered = HashSet::from([seed]);
    let mut queue = VecDeque::from([(seed, 0usize)]);

    while let Some((parent, depth)) = queue.pop_front() {
        let mut children: Vec<NodeIndex> = graph
            .neighbors_directed(parent, Direction::Outgoing)
            .filter(|child| !discovered.contains(child))
            .collect();
        children.sort_unstable();
        children.dedup();

        if children.is_empty() {
            continue;
        }

        for &child in children.iter() {
            discovered.insert(child);
            queue.push_back((child, depth + 1));
        }

        match grouping {
            Grouping::ByParent => groups.push(children),
            Grouping::ByDistance => match groups.get_mut(depth) {
                Some(layer) => layer.extend(children),
                None => groups.push(children),
            },
        }
    }

    Ok(groups)
}

/// Infection variant of a run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InfectionKind {
    /// Every discovered node gets infected
    All,
    /// The first `immune_groups` groups of every seed resist the infection
    Limited { immune_groups: usize },
}

impl InfectionKind {
    /// Limited variant with the default number of immune groups
    pub fn limited() -> Self {
        Self::Limited {
            immune_groups: DEFAULT_IMMUNE_GROUPS,
        }
    }

    /// Prefix of the snapshot file names
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::All => "All_Infected",
            Self::Limited { .. } => "Limited_Infected",
        }
    }
}

/// Receives the state of the run after every step
pub trait StepSink {
    fn step(
        &mut self,
        graph: &InfectionGraph,
        infected: &InfectedSet,
        kind: InfectionKind,
        step: usize,
    ) -> Result<()>;
}

impl<F> StepSink for F
where
    F: FnMut(&InfectionGraph, &InfectedSet, InfectionKind, usize) -> Result<()>,
{
    fn step(
        &mut self,
        graph: &InfectionGraph,
        infected: &InfectedSet,
        kind: InfectionKind,
        step: usize,
    ) -> Result<()> {
        self(graph, infected, kind, step)
    }
}

/// Summary of a finished run
#[derive(Debug)]
pub struct InfectionReport {
    pub kind: InfectionKind,
    /// Number of steps handed to the sink
    pub steps: usize,
    pub infected: usize,
    pub total: usize,
    /// Seeds whose grouping could not be used
    pub rejected: Vec<InfectionError>,
}

impl InfectionReport {
    fn new(kind: InfectionKind, total: usize) -> Self {
        Self {
            kind,
            steps: 0,
            infected: 0,
            total,
            rejected: vec![],
        }
    }

    pub fn fully_infected(&self) -> bool {
        self.infected == self.total
    }
}

/// Configured infection run
#[derive(Clone, Debug)]
pub struct Propagation {
    kind: InfectionKind,
    grouping: Grouping,
    skip_unchanged: bool,
}

impl Propagation {
    pub fn new(kind: InfectionKind) -> Self {
        Self {
            kind,
            grouping: Grouping::default(),
            skip_unchanged: false,
        }
    }

    /// How each seed's discovered nodes are partitioned into steps
    pub fn grouping(mut self, grouping: Grouping) -> Self {
        self.grouping = grouping;
        self
    }

    /// Only count groups that infect at least one new node as a step.
    /// Off by default: every group of a seed is a step.
    pub fn skip_unchanged_steps(mut self, skip_unchanged: bool) -> Self {
        self.skip_unchanged = skip_unchanged;
        self
    }

    /// Spreads the infection from the nodes already in `infected`.
    ///
    /// Stops once every node is infected or no seed is left. Seed-local errors
    /// are logged and collected in the report; sink errors abort the run.
    pub fn run<S>(
        &self,
        graph: &InfectionGraph,
        infected: &mut InfectedSet,
        sink: &mut S,
    ) -> Result<InfectionReport>
    where
        S: StepSink + ?Sized,
    {
        let total = graph.node_count();
        let mut report = InfectionReport::new(self.kind, total);

        if infected.is_empty() {
            warn!(kind = ?self.kind, "no seed nodes, nothing to infect");
        }

        let mut cursor = 0;
        while infected.len() < total {
            let Some(seed) = infected.get(cursor) else {
                break;
            };
            cursor += 1;

            let groups = match self.infectable_groups(graph, seed) {
                Ok(groups) => groups,
                Err(err) if err.is_seed_local() => {
                    warn!(seed = seed.index(), %err, "skipping seed");
                    report.rejected.push(err);
                    continue;
                }
                Err(err) => return Err(err),
            };

            if groups.is_empty() {
                debug!(seed = seed.index(), "seed has nothing to infect");
                continue;
            }

            info!("Processing graph, please wait...");
            for group in groups {
                let mut newly_infected = 0;
                for node in group {
                    if infected.infect(node) {
                        newly_infected += 1;
                    }
                }
                if newly_infected == 0 && self.skip_unchanged {
                    continue;
                }

                sink.step(graph, infected, self.kind, report.steps)?;
                report.steps += 1;

                info!("Nodes infected: {}", infected.len());
                info!("Nodes left: {}", total - infected.len());
            }
        }

        report.infected = infected.len();
        debug!(
            kind = ?self.kind,
            steps = report.steps,
            infected = report.infected,
            total,
            rejected = report.rejected.len(),
            "infection finished"
        );
        Ok(report)
    }

    fn infectable_groups(
        &self,
        graph: &InfectionGraph,
        seed: NodeIndex,
    ) -> Result<Vec<Vec<NodeIndex>>> {
        let mut groups = successor_groups(graph, seed, self.grouping)?;

        match self.kind {
            InfectionKind::All => Ok(groups),
            InfectionKind::Limited { immune_groups } => {
                if groups.is_empty() {
                    return Ok(groups);
                }
                if groups.len() < immune_groups {
                    return Err(InfectionError::insufficient_groups(
                        seed.index(),
                        groups.len(),
                        immune_groups,
                    ));
                }
                groups.drain(..immune_groups);
                Ok(groups)
            }
        }
    }
}

/// Infects everything reachable from the root nodes
pub fn infect_all<S>(graph: &InfectionGraph, sink: &mut S) -> Result<InfectionReport>
where
    S: StepSink + ?Sized,
{
    let mut infected = InfectedSet::from_roots(graph);
    Propagation::new(InfectionKind::All).run(graph, &mut infected, sink)
}

/// Infects from the root nodes while the first `immune_groups` groups of every seed resist
pub fn limited_infection<S>(
    graph: &InfectionGraph,
    immune_groups: usize,
    sink: &mut S,
) -> Result<InfectionReport>
where
    S: StepSink + ?Sized,
{
    let mut infected = InfectedSet::from_roots(graph);
    Propagation::new(InfectionKind::Limited { immune_groups }).run(graph, &mut infected, sink)
}
