use std::{cell::Cell, rc::Rc};

use crate::vnode::VNode;

mod workflow;

/// Counts how many times the thunks built from it have been forced.
#[derive(Clone, Default)]
pub struct CallCounter(Rc<Cell<usize>>);

impl CallCounter {
    pub fn get(&self) -> usize {
        self.0.get()
    }

    /// A thunk that records its invocation and then builds `view`.
    pub fn lazy(&self, view: impl FnOnce() -> VNode + 'static) -> VNode {
        let calls = self.0.clone();
        VNode::lazy(move || {
            calls.set(calls.get() + 1);
            view()
        })
    }
}
