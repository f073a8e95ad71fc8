//! Directed acyclic graph of simulated variables.
//!
//! Every node carries an outcome [`Distribution`]. A node's linear predictor
//! is the coefficient-weighted sum of its parents' simulated columns, so a
//! DAG describes a system of generalized linear models that can be sampled
//! top-down.
//!
//! # Example
//!
//! ```
//! use kvaser::dag::{Coefficients, Dag};
//! use kvaser::distributions::{Bernoulli, Normal, Poisson};
//! use kvaser::random::create_rng;
//!
//! let mut m = Dag::new();
//! m.regression("y", &["x", "z"]).unwrap();
//! m.regression("z", &["x"]).unwrap();
//! m.distribution("y", Normal::new(2.0).unwrap());
//! m.distribution("z", Poisson::new());
//! m.distribution("x", Bernoulli::new());
//!
//! let coefs = Coefficients::new().with("y", "x", 0.5);
//! let frame = m.simulate(100, &coefs, &mut create_rng(1)).unwrap();
//! assert_eq!(frame.columns(), &["y", "x", "z"]);
//! assert_eq!(frame.nrows(), 100);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use ndarray::{Array1, Array2, ArrayView1};
use rand::Rng;
use tracing::{debug, trace};

use crate::distributions::Distribution;
use crate::error::{Error, Result};
use crate::random::create_rng;

/// Separator between child and parent in a coefficient key (`"y~x"`).
pub const COEFFICIENT_SEPARATOR: char = '~';

/// Coefficient applied to an edge without an explicit entry.
pub const DEFAULT_COEFFICIENT: f64 = 1.0;

// ============================================================================
// Coefficients
// ============================================================================

/// Edge weights keyed by `(child, parent)`.
///
/// Missing entries default to [`DEFAULT_COEFFICIENT`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Coefficients {
    weights: BTreeMap<(String, String), f64>,
}

impl Coefficients {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, child: &str, parent: &str, value: f64) -> Self {
        self.set(child, parent, value);
        self
    }

    pub fn set(&mut self, child: &str, parent: &str, value: f64) {
        self.weights
            .insert((child.to_owned(), parent.to_owned()), value);
    }

    /// Sets a coefficient from a `"child~parent"` key.
    ///
    /// # Errors
    /// Returns [`Error::UnknownCoefficient`] if the key has no separator or
    /// an empty side.
    pub fn set_key(&mut self, key: &str, value: f64) -> Result<()> {
        let (child, parent) = split_key(key)?;
        self.set(child, parent, value);
        Ok(())
    }

    pub fn get(&self, child: &str, parent: &str) -> f64 {
        self.weights
            .get(&(child.to_owned(), parent.to_owned()))
            .copied()
            .unwrap_or(DEFAULT_COEFFICIENT)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.weights
            .keys()
            .map(|(c, p)| (c.as_str(), p.as_str()))
    }
}

impl<'a> TryFrom<&[(&'a str, f64)]> for Coefficients {
    type Error = Error;

    /// Parses `("child~parent", value)` pairs.
    fn try_from(pairs: &[(&'a str, f64)]) -> Result<Self> {
        let mut coefs = Coefficients::new();
        for &(key, value) in pairs {
            coefs.set_key(key, value)?;
        }
        Ok(coefs)
    }
}

fn split_key(key: &str) -> Result<(&str, &str)> {
    match key.split_once(COEFFICIENT_SEPARATOR) {
        Some((child, parent)) if !child.is_empty() && !parent.is_empty() => {
            Ok((child, parent))
        }
        _ => Err(Error::UnknownCoefficient(key.to_owned())),
    }
}

// ============================================================================
// Simulated frame
// ============================================================================

/// Result of a simulation: one named column per node.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedFrame {
    columns: Vec<String>,
    values: Array2<f64>,
}

impl SimulatedFrame {
    /// Column names in node insertion order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// `n × nodes` matrix of draws.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn into_values(self) -> Array2<f64> {
        self.values
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        let j = self.columns.iter().position(|c| c == name)?;
        Some(self.values.column(j))
    }
}

// ============================================================================
// Dag
// ============================================================================

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parents: Vec<usize>,
    distribution: Distribution,
}

/// Graph of variables, each simulated from its parents.
#[derive(Debug, Clone, Default)]
pub struct Dag {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
}

impl Dag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `y` as depending on each of `xs`.
    ///
    /// Nodes that do not exist yet are created with the default
    /// distribution. An existing distribution of `y` is kept.
    ///
    /// # Errors
    /// Returns [`Error::Cycle`] if any edge `x -> y` would close a cycle.
    /// In that case the graph is left unchanged.
    pub fn regression(&mut self, y: &str, xs: &[&str]) -> Result<()> {
        for &x in xs {
            if x == y || self.is_ancestor(y, x) {
                return Err(Error::Cycle {
                    from: x.to_owned(),
                    to: y.to_owned(),
                });
            }
        }

        let yi = self.ensure_node(y);
        for &x in xs {
            let xi = self.ensure_node(x);
            if !self.nodes[yi].parents.contains(&xi) {
                self.nodes[yi].parents.push(xi);
            }
        }
        Ok(())
    }

    /// Sets the outcome distribution of `y`, adding the node if needed.
    pub fn distribution(&mut self, y: &str, distribution: impl Into<Distribution>) {
        let yi = self.ensure_node(y);
        self.nodes[yi].distribution = distribution.into();
    }

    /// Node names in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Direct parents of `y` in the order they were declared.
    pub fn parents(&self, y: &str) -> Result<Vec<&str>> {
        let yi = self.lookup(y)?;
        Ok(self.nodes[yi]
            .parents
            .iter()
            .map(|&p| self.nodes[p].name.as_str())
            .collect())
    }

    pub fn get_distribution(&self, y: &str) -> Result<&Distribution> {
        let yi = self.lookup(y)?;
        Ok(&self.nodes[yi].distribution)
    }

    /// Nodes ordered so that every parent precedes its children.
    ///
    /// Among nodes whose parents are all placed, the earliest inserted one
    /// goes first.
    pub fn topological_order(&self) -> Vec<&str> {
        self.order().into_iter().map(|i| self.nodes[i].name.as_str()).collect()
    }

    /// Draws `n` joint samples of every node.
    ///
    /// Nodes are visited in [`topological_order`](Self::topological_order).
    /// For node `v` with parents `x₁…x_k`,
    /// `lp = Σ coef(v~xⱼ)·column(xⱼ)` (zero for a root), and the column of
    /// `v` is drawn from its distribution given `lp`.
    ///
    /// # Errors
    /// Returns [`Error::UnknownCoefficient`] if `coefficients` names a pair
    /// that is not an edge of the graph.
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        n: usize,
        coefficients: &Coefficients,
        rng: &mut R,
    ) -> Result<SimulatedFrame> {
        self.check_coefficients(coefficients)?;

        let order = self.order();
        let names: Vec<&str> = order.iter().map(|&i| self.nodes[i].name.as_str()).collect();
        trace!(order = ?names, "topological order");

        let mut values = Array2::<f64>::zeros((n, self.nodes.len()));
        for v in order {
            let node = &self.nodes[v];
            let mut lp = Array1::<f64>::zeros(n);
            for &p in &node.parents {
                let coef = coefficients.get(&node.name, &self.nodes[p].name);
                lp.scaled_add(coef, &values.column(p));
            }
            let column = node.distribution.simulate(&lp, rng);
            values.column_mut(v).assign(&column);
            debug!(
                node = %node.name,
                parents = node.parents.len(),
                distribution = node.distribution.name(),
                "simulated node"
            );
        }

        Ok(SimulatedFrame {
            columns: self.nodes.iter().map(|n| n.name.clone()).collect(),
            values,
        })
    }

    /// [`simulate`](Self::simulate) with a fresh generator seeded by `seed`.
    pub fn simulate_seeded(
        &self,
        n: usize,
        coefficients: &Coefficients,
        seed: u64,
    ) -> Result<SimulatedFrame> {
        self.simulate(n, coefficients, &mut create_rng(seed))
    }

    fn ensure_node(&mut self, name: &str) -> usize {
        if let Some(&i) = self.index.get(name) {
            return i;
        }
        let i = self.nodes.len();
        self.nodes.push(Node {
            name: name.to_owned(),
            parents: Vec::new(),
            distribution: Distribution::default(),
        });
        self.index.insert(name.to_owned(), i);
        i
    }

    fn lookup(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownVariable(name.to_owned()))
    }

    /// True if `ancestor` is reachable from `node` by following parent links.
    fn is_ancestor(&self, ancestor: &str, node: &str) -> bool {
        let (Some(&target), Some(&start)) = (self.index.get(ancestor), self.index.get(node))
        else {
            return false;
        };
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![start];
        while let Some(i) = stack.pop() {
            if i == target {
                return true;
            }
            if std::mem::replace(&mut seen[i], true) {
                continue;
            }
            stack.extend(self.nodes[i].parents.iter().copied());
        }
        false
    }

    fn order(&self) -> Vec<usize> {
        let mut placed = vec![false; self.nodes.len()];
        let mut order = Vec::with_capacity(self.nodes.len());
        while order.len() < self.nodes.len() {
            let next = self
                .nodes
                .iter()
                .enumerate()
                .position(|(i, node)| !placed[i] && node.parents.iter().all(|&p| placed[p]));
            // `regression` rejects cycles, so some node is always ready.
            let Some(i) = next else { break };
            placed[i] = true;
            order.push(i);
        }
        order
    }

    fn check_coefficients(&self, coefficients: &Coefficients) -> Result<()> {
        for (child, parent) in coefficients.iter() {
            let is_edge = match (self.index.get(child), self.index.get(parent)) {
                (Some(&c), Some(&p)) => self.nodes[c].parents.contains(&p),
                _ => false,
            };
            if !is_edge {
                return Err(Error::UnknownCoefficient(format!(
                    "{child}{COEFFICIENT_SEPARATOR}{parent}"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Dag {
    /// One `v ~ p1 + p2` line per node (`v ~ 1` for roots), a blank line,
    /// then one `v: <distribution>` line per node.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            if node.parents.is_empty() {
                writeln!(f, "{} ~ 1", node.name)?;
            } else {
                let parents: Vec<&str> = node
                    .parents
                    .iter()
                    .map(|&p| self.nodes[p].name.as_str())
                    .collect();
                writeln!(f, "{} ~ {}", node.name, parents.join(" + "))?;
            }
        }
        writeln!(f)?;
        for node in &self.nodes {
            writeln!(f, "{}: {}", node.name, node.distribution)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
