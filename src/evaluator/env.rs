use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use itertools::Itertools;

use super::evaluator::Value;

type Scope = HashMap<String, Value>;

/// Env is a cloneable handle to a frame of bindings, chained to an optional parent frame.
/// Cloning the handle aliases the same frame; closures and child frames keep the frames they reference alive.
#[derive(Debug, Clone)]
pub struct Env {
    frame: Rc<RefCell<Frame>>,
}

#[derive(Debug)]
struct Frame {
    bindings: Scope,
    parent: Option<Env>,
}

impl Env {
    pub fn new() -> Self {
        Env::from_frame(Frame {
            bindings: HashMap::new(),
            parent: None,
        })
    }

    pub fn with_parent(parent: &Env) -> Self {
        Env::from_frame(Frame {
            bindings: HashMap::new(),
            parent: Some(parent.clone()),
        })
    }

    fn from_frame(frame: Frame) -> Self {
        Self {
            frame: Rc::new(RefCell::new(frame)),
        }
    }

    /// define inserts or overwrites a binding in this frame; enclosing frames are never touched.
    pub fn define(&self, key: &str, value: Value) {
        self.frame.borrow_mut().bindings.insert(key.into(), value);
    }

    pub fn add_bindings(&self, bindings: Vec<(String, Value)>) {
        let mut frame = self.frame.borrow_mut();
        bindings.into_iter().for_each(|(k, v)| {
            frame.bindings.insert(k, v);
        })
    }

    /// lookup resolves `key` in this frame first, then up the parent chain.
    pub fn lookup(&self, key: &str) -> Option<Value> {
        let frame = self.frame.borrow();
        frame
            .bindings
            .get(key)
            .cloned()
            .or_else(|| frame.parent.as_ref().and_then(|parent| parent.lookup(key)))
    }
}

impl fmt::Display for Env {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let frame = self.frame.borrow();
        write!(f, "Env (some-parent? {:?}) {{", frame.parent.is_some())?;
        write!(
            f,
            "{}",
            frame
                .bindings
                .iter()
                .map(|(k, v)| format!("{:?} {}", k, v))
                .format(" ")
        )?;
        write!(f, "}}")
    }
}
