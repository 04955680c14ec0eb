use std::{any::Any, fmt, rc::Rc};

use crate::{error::VdomError, vnode::VNode};

/// Argument captured by a lazy node. Only kept for identity; never serialized.
pub type ThunkArg = Rc<dyn Any>;

type Computation = Box<dyn FnOnce(&[ThunkArg]) -> Result<VNode, VdomError>>;

enum ThunkState {
    Pending(Computation),
    Resolved(Box<VNode>),
    Poisoned,
}

/// A deferred subtree.
///
/// The computation is `FnOnce`: it runs the first time the thunk is forced and
/// the result is cached in place of it. A computation that fails leaves the
/// thunk poisoned rather than pending, so it is never run a second time.
pub struct Thunk {
    args: Vec<ThunkArg>,
    state: ThunkState,
}

impl Thunk {
    pub fn new<F>(args: Vec<ThunkArg>, compute: F) -> Self
    where
        F: FnOnce(&[ThunkArg]) -> VNode + 'static,
    {
        Self::fallible(args, move |args| Ok(compute(args)))
    }

    pub fn fallible<F>(args: Vec<ThunkArg>, compute: F) -> Self
    where
        F: FnOnce(&[ThunkArg]) -> Result<VNode, VdomError> + 'static,
    {
        Self {
            args,
            state: ThunkState::Pending(Box::new(compute)),
        }
    }

    /// A thunk whose cache is already populated.
    pub fn resolved(node: VNode) -> Self {
        Self {
            args: Vec::new(),
            state: ThunkState::Resolved(Box::new(node)),
        }
    }

    pub fn args(&self) -> &[ThunkArg] {
        &self.args
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.state, ThunkState::Resolved(_))
    }

    pub fn is_poisoned(&self) -> bool {
        matches!(self.state, ThunkState::Poisoned)
    }

    pub fn resolved_node(&self) -> Option<&VNode> {
        match &self.state {
            ThunkState::Resolved(node) => Some(node),
            _ => None,
        }
    }

    pub fn resolved_node_mut(&mut self) -> Option<&mut VNode> {
        match &mut self.state {
            ThunkState::Resolved(node) => Some(node),
            _ => None,
        }
    }

    /// Runs the computation if it has not run yet.
    ///
    /// Returns `Ok(true)` when the computation was invoked by this call and
    /// `Ok(false)` when the cached node was already present.
    pub fn force(&mut self) -> Result<bool, VdomError> {
        match std::mem::replace(&mut self.state, ThunkState::Poisoned) {
            ThunkState::Pending(compute) => {
                let node = compute(&self.args)?;
                self.state = ThunkState::Resolved(Box::new(node));
                Ok(true)
            }
            ThunkState::Resolved(node) => {
                self.state = ThunkState::Resolved(node);
                Ok(false)
            }
            ThunkState::Poisoned => Err(VdomError::PoisonedThunk),
        }
    }
}

impl fmt::Debug for Thunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Thunk");
        s.field("args", &self.args.len());
        match &self.state {
            ThunkState::Pending(_) => s.field("state", &"pending"),
            ThunkState::Resolved(node) => s.field("node", node),
            ThunkState::Poisoned => s.field("state", &"poisoned"),
        };
        s.finish()
    }
}
