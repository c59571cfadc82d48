//! Replay memory interface.
//!
//! Each agent owns one replay memory. The value optimizer draws uniform
//! batches with [`ReplayMemoryBase::sample`], while policy distillation
//! draws with [`ReplayMemoryBase::policy_sample`], whose selection rule is
//! left to the implementation.
use anyhow::Result;

/// Interface for buffers that store experiences from environments.
///
/// # Examples
///
/// ```ignore
/// struct SimpleBuffer<T> {
///     items: Vec<T>,
/// }
///
/// impl<T> ExperienceBufferBase for SimpleBuffer<T> {
///     type Item = T;
///
///     fn push(&mut self, tr: T) -> Result<()> {
///         self.items.push(tr);
///         Ok(())
///     }
///
///     fn len(&self) -> usize {
///         self.items.len()
///     }
/// }
/// ```
pub trait ExperienceBufferBase {
    /// The type of items stored in the buffer.
    type Item;

    /// Pushes a new experience into the buffer.
    fn push(&mut self, tr: Self::Item) -> Result<()>;

    /// Returns the current number of experiences in the buffer.
    fn len(&self) -> usize;

    /// Returns `true` if the buffer is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Interface for replay memories that hand out transitions for training.
///
/// Items are usually [`Transition`](crate::Transition)s; the agents in this workspace require
/// `ReplayMemoryBase<Item = Transition<O>>`.
pub trait ReplayMemoryBase: ExperienceBufferBase {
    /// Draws `n` transitions uniformly without replacement.
    ///
    /// Fails with [`DistralError::InsufficientSamples`] if `n` exceeds
    /// the number of stored transitions.
    ///
    /// [`DistralError::InsufficientSamples`]: crate::error::DistralError::InsufficientSamples
    fn sample(&mut self, n: usize) -> Result<Vec<Self::Item>>;

    /// Draws `n` transitions for policy distillation.
    ///
    /// `n` may be any value up to the number of stored transitions,
    /// including zero. The selection rule is implementation defined but
    /// must be reproducible under a fixed seed.
    fn policy_sample(&mut self, n: usize) -> Result<Vec<Self::Item>>;
}
