//! Distral: distill and transfer across agents.
//!
//! * [`ActionSelector`] samples actions from the soft policy of one agent.
//! * [`optimize_model`] performs one soft Q-learning step on an agent's
//!   [`ValueEstimator`], bootstrapping with the soft value under the
//!   [`SharedPolicy`].
//! * [`optimize_policy`] distills the observed actions of all agents into
//!   the [`SharedPolicy`] with a single gradient step.
//! * [`Distral`] bundles the value estimators of all agents, the shared
//!   policy and the whole-memory accumulator.
mod base;
mod config;
mod explorer;
mod network;
mod policy;
mod policy_distiller;
mod selector;
mod soft;
mod value;
mod value_optimizer;
pub use base::Distral;
pub use config::DistralConfig;
pub use explorer::EpsilonSchedule;
pub use network::{Network, NetworkConfig};
pub use policy::SharedPolicy;
pub use policy_distiller::optimize_policy;
pub use selector::{floor_probs, has_invalid_probs, ActionSelector, PROB_FLOOR};
pub use soft::{soft_policy, soft_value};
pub use value::ValueEstimator;
pub use value_optimizer::{optimize_model, soft_bootstrap_target};
