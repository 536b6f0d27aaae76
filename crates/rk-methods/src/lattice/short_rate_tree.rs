//! Arena storage, curve calibration, and backward induction.

use rk_core::errors::{Error, Result};
use rk_core::{DiscountFactor, Rate, Real, Size, SolverSettings, Time};
use rk_math::brent;
use tracing::{debug, trace};

/// Largest accepted deviation of a node's probabilities from summing to one.
const PROBABILITY_SUM_TOLERANCE: Real = 1.0e-12;

/// Lognormal drift bracket: at the lower end every node rate is below
/// `e^-40`, at the upper end every one-step discount is below `e^-50`.
const LOWEST_LOG_RATE: Real = -40.0;
const STEP_EXPONENT_CAP: Real = 50.0;

/// Number of branches leaving each node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branching {
    /// Two children: down, up.
    Binomial,
    /// Three children: down, middle, up.
    Trinomial,
}

impl Branching {
    /// Number of children per node.
    pub fn arity(self) -> Size {
        match self {
            Branching::Binomial => 2,
            Branching::Trinomial => 3,
        }
    }
}

/// How a node's state and its layer's drift combine into a short rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateMapping {
    /// `r = α + x` (Gaussian models; rates may be negative).
    Additive,
    /// `r = exp(α + x)` (lognormal models; rates stay positive).
    Exponential,
}

impl RateMapping {
    /// Short rate for drift `alpha` and state `x`.
    pub fn short_rate(self, alpha: Real, x: Real) -> Rate {
        match self {
            RateMapping::Additive => alpha + x,
            RateMapping::Exponential => (alpha + x).exp(),
        }
    }
}

// ─── Node / Layer ─────────────────────────────────────────────────────────────

/// One state of a lattice layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    state: Real,
    rate: Rate,
    first_child: Size,
    probabilities: [Real; 3],
    arrow_debreu: Real,
}

impl Node {
    pub(crate) fn new(state: Real, first_child: Size, probabilities: [Real; 3]) -> Self {
        Self {
            state,
            rate: 0.0,
            first_child,
            probabilities,
            arrow_debreu: 0.0,
        }
    }

    /// Node on the last layer; it has no outgoing branches.
    pub(crate) fn terminal(state: Real) -> Self {
        Self::new(state, 0, [0.0; 3])
    }

    /// Model state variable `x`.
    pub fn state(&self) -> Real {
        self.state
    }

    /// Short rate over the step leaving this node. Zero until the lattice
    /// is calibrated, and on the terminal layer.
    pub fn rate(&self) -> Rate {
        self.rate
    }

    /// Index, in the next layer, of the lowest child.
    pub fn first_child(&self) -> Size {
        self.first_child
    }

    /// Branch probabilities, lowest child first. Binomial nodes leave the
    /// third entry at zero.
    pub fn probabilities(&self) -> [Real; 3] {
        self.probabilities
    }

    /// Arrow-Debreu price: today's value of one unit paid if this node is
    /// reached.
    pub fn arrow_debreu(&self) -> Real {
        self.arrow_debreu
    }
}

/// All nodes sharing one time.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    time: Time,
    dt: Time,
    drift: Option<Real>,
    nodes: Vec<Node>,
}

impl Layer {
    pub(crate) fn new(time: Time, dt: Time, nodes: Vec<Node>) -> Self {
        Self {
            time,
            dt,
            drift: None,
            nodes,
        }
    }

    /// Layer time.
    pub fn time(&self) -> Time {
        self.time
    }

    /// Length of the step to the next layer; zero on the terminal layer.
    pub fn dt(&self) -> Time {
        self.dt
    }

    /// Fitted drift `α`, once calibrated. The terminal layer has none.
    pub fn drift(&self) -> Option<Real> {
        self.drift
    }

    /// Nodes, lowest state first.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of nodes.
    pub fn size(&self) -> Size {
        self.nodes.len()
    }
}

// ─── Lattice ──────────────────────────────────────────────────────────────────

/// A recombining short-rate lattice.
#[derive(Debug, Clone)]
pub struct Lattice {
    branching: Branching,
    mapping: RateMapping,
    layers: Vec<Layer>,
    calibrated: bool,
}

impl Lattice {
    /// Assemble a lattice from layers, checking every transition.
    ///
    /// Each non-terminal node must have probabilities in `[0, 1]` summing
    /// to one and children inside the next layer; otherwise the method is
    /// outside its domain and a numerical error is returned.
    pub(crate) fn from_layers(
        branching: Branching,
        mapping: RateMapping,
        mut layers: Vec<Layer>,
    ) -> Result<Self> {
        rk_core::ensure!(layers.len() >= 2, "a lattice needs at least one step");
        let arity = branching.arity();
        for i in 0..layers.len() - 1 {
            let next_size = layers[i + 1].size();
            for (j, node) in layers[i].nodes.iter().enumerate() {
                let probs = &node.probabilities[..arity];
                if let Some(p) = probs.iter().find(|p| !(0.0..=1.0).contains(*p)) {
                    return Err(Error::Numerical(format!(
                        "transition probability {p} outside [0, 1] at layer {i}, node {j}"
                    )));
                }
                let total: Real = probs.iter().sum();
                rk_core::ensure_post!(
                    (total - 1.0).abs() <= PROBABILITY_SUM_TOLERANCE,
                    "probabilities at layer {i}, node {j} sum to {total}"
                );
                rk_core::ensure_post!(
                    node.first_child + arity <= next_size,
                    "node {j} of layer {i} branches outside the next layer"
                );
            }
        }
        layers[0].nodes[0].arrow_debreu = 1.0;
        Ok(Self {
            branching,
            mapping,
            layers,
            calibrated: false,
        })
    }

    /// Binomial or trinomial.
    pub fn branching(&self) -> Branching {
        self.branching
    }

    /// State-to-rate mapping.
    pub fn mapping(&self) -> RateMapping {
        self.mapping
    }

    /// Number of layers (steps + 1).
    pub fn layer_count(&self) -> Size {
        self.layers.len()
    }

    /// Layer `i`.
    pub fn layer(&self, i: Size) -> &Layer {
        &self.layers[i]
    }

    /// All layers, root first.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> Size {
        self.layers.iter().map(Layer::size).sum()
    }

    /// Whether [`calibrate`](Self::calibrate) has run.
    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    /// Discount factor to layer `i` implied by the lattice: the sum of its
    /// Arrow-Debreu prices.
    pub fn implied_discount(&self, i: Size) -> DiscountFactor {
        self.layers[i].nodes.iter().map(Node::arrow_debreu).sum()
    }

    // ── Calibration ──────────────────────────────────────────────────────

    /// Fit one drift per layer so that the lattice reprices `discount`.
    ///
    /// `discount(t)` is the discount factor from the lattice root to time
    /// `t`. Arrow-Debreu prices are carried forward layer by layer; the
    /// drift of layer `i` solves
    /// `Σ_j Q(i, j) · exp(−r(α_i, x_j) · dt) = P(t_{i+1})`,
    /// in closed form for [`RateMapping::Additive`] and with Brent's method
    /// otherwise.
    pub fn calibrate<F>(&mut self, discount: F, settings: &SolverSettings) -> Result<()>
    where
        F: Fn(Time) -> DiscountFactor,
    {
        let arity = self.branching.arity();
        for i in 0..self.layers.len() - 1 {
            let t_next = self.layers[i + 1].time;
            let target = discount(t_next);
            rk_core::ensure_post!(
                target > 0.0 && target.is_finite(),
                "discount factor {target} at t = {t_next} is not positive"
            );
            let alpha = self.solve_drift(i, target, settings)?;

            let mapping = self.mapping;
            let layer = &mut self.layers[i];
            layer.drift = Some(alpha);
            for node in &mut layer.nodes {
                node.rate = mapping.short_rate(alpha, node.state);
            }

            let layer = &self.layers[i];
            let mut next = vec![0.0; self.layers[i + 1].size()];
            for node in &layer.nodes {
                let carried = node.arrow_debreu * (-node.rate * layer.dt).exp();
                for (b, p) in node.probabilities[..arity].iter().enumerate() {
                    next[node.first_child + b] += carried * p;
                }
            }
            for (node, q) in self.layers[i + 1].nodes.iter_mut().zip(next) {
                node.arrow_debreu = q;
            }
            trace!(layer = i, alpha, target, "lattice layer calibrated");
        }
        self.calibrated = true;
        debug!(
            layers = self.layers.len(),
            nodes = self.node_count(),
            branching = ?self.branching,
            "lattice calibrated"
        );
        Ok(())
    }

    fn solve_drift(&self, i: Size, target: DiscountFactor, settings: &SolverSettings) -> Result<Real> {
        let layer = &self.layers[i];
        let dt = layer.dt;
        match self.mapping {
            RateMapping::Additive => {
                let reach: Real = layer
                    .nodes
                    .iter()
                    .map(|n| n.arrow_debreu * (-n.state * dt).exp())
                    .sum();
                rk_core::ensure_post!(
                    reach > 0.0 && reach.is_finite(),
                    "Arrow-Debreu prices of layer {i} are degenerate"
                );
                Ok((reach / target).ln() / dt)
            }
            RateMapping::Exponential => {
                // With every rate near zero the layer is worth Σ Q(i, j);
                // only a positive forward rate leaves room below that.
                let zero_rate_value: Real = layer.nodes.iter().map(Node::arrow_debreu).sum();
                rk_core::ensure_post!(
                    zero_rate_value > target,
                    "the curve implies a non-positive forward rate between t = {} and t = {}; \
                     lognormal short rates cannot fit it",
                    layer.time,
                    layer.time + dt
                );
                let (lo_x, hi_x) = layer.nodes.iter().fold(
                    (Real::INFINITY, Real::NEG_INFINITY),
                    |(lo, hi), n| (lo.min(n.state), hi.max(n.state)),
                );
                let lower = LOWEST_LOG_RATE - hi_x;
                let upper = (STEP_EXPONENT_CAP / dt).ln() - lo_x;
                brent(
                    |alpha| {
                        let value: Real = layer
                            .nodes
                            .iter()
                            .map(|n| n.arrow_debreu * (-(alpha + n.state).exp() * dt).exp())
                            .sum();
                        Ok(value - target)
                    },
                    lower,
                    upper,
                    settings.accuracy,
                    settings.max_iterations,
                )
                .map_err(|e| {
                    Error::Numerical(format!(
                        "drift of lattice layer {i} (t = {}) did not converge: {e}",
                        layer.time
                    ))
                })
            }
        }
    }

    // ── Backward induction ───────────────────────────────────────────────

    /// Discount `values`, given on layer `from`, back to layer `to`.
    pub fn roll_back(&self, values: &[Real], from: Size, to: Size) -> Result<Vec<Real>> {
        rk_core::ensure!(
            to <= from && from < self.layers.len(),
            "cannot roll back from layer {from} to layer {to} on a {}-layer lattice",
            self.layers.len()
        );
        rk_core::ensure!(
            values.len() == self.layers[from].size(),
            "layer {from} has {} nodes but {} values were given",
            self.layers[from].size(),
            values.len()
        );
        rk_core::ensure!(
            self.calibrated || from == to,
            "the lattice must be calibrated before rolling back"
        );
        let arity = self.branching.arity();
        let mut current = values.to_vec();
        for layer in self.layers[to..from].iter().rev() {
            current = layer
                .nodes
                .iter()
                .map(|n| {
                    let expected: Real = n.probabilities[..arity]
                        .iter()
                        .enumerate()
                        .map(|(b, p)| p * current[n.first_child + b])
                        .sum();
                    expected * (-n.rate * layer.dt).exp()
                })
                .collect();
        }
        Ok(current)
    }
}
