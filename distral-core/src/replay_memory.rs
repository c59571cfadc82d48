//! Seeded replay memory.
//!
//! [`ReplayMemory`] stores transitions of an arbitrary observation type in a
//! ring buffer and implements [`ReplayMemoryBase`](crate::ReplayMemoryBase):
//!
//! - `sample(n)` draws uniformly without replacement over the whole buffer.
//! - `policy_sample(n)` draws uniformly without replacement over the most
//!   recent transitions, see [`ReplayMemoryConfig::policy_window`].
//!
//! # Examples
//!
//! ```rust
//! use distral_core::{
//!     replay_memory::{ReplayMemory, ReplayMemoryConfig},
//!     ExperienceBufferBase, ReplayMemoryBase, Transition,
//! };
//!
//! let config = ReplayMemoryConfig::default().capacity(100).seed(42);
//! let mut memory = ReplayMemory::<Vec<f32>>::build(&config);
//! for t in 0..10 {
//!     memory
//!         .push(Transition::new(vec![t as f32], 0, None, 1.0, t, 0))
//!         .unwrap();
//! }
//! assert_eq!(memory.sample(4).unwrap().len(), 4);
//! ```
mod base;
mod config;
pub use base::ReplayMemory;
pub use config::ReplayMemoryConfig;
