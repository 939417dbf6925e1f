//! Deferred values resolved by the external engine
//!
//! An [`Output<T>`] is a one-shot promise: pending until the engine reports
//! the underlying value (e.g. the generated bucket name), then permanently
//! resolved or failed. Continuations registered via [`Output::apply`] run
//! exactly once, and a continuation error propagates as the derived output's
//! failure rather than being swallowed.

use std::fmt;
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Failure carried by a failed output
///
/// Continuation errors are flattened to their display form so the failure
/// can be cloned into every downstream output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct OutputError(pub String);

type Callback<T> = Box<dyn FnOnce(&Result<T, OutputError>) + Send>;

enum CellState<T> {
    Pending(Vec<Callback<T>>),
    Settled(Result<T, OutputError>),
}

struct Cell<T> {
    state: Mutex<CellState<T>>,
}

/// Settle the cell exactly once; later settle attempts are no-ops
fn settle<T: Clone>(cell: &Arc<Cell<T>>, result: Result<T, OutputError>) {
    let callbacks = {
        let mut state = cell.state.lock().unwrap();
        match &mut *state {
            CellState::Pending(callbacks) => {
                let callbacks = std::mem::take(callbacks);
                *state = CellState::Settled(result.clone());
                callbacks
            }
            CellState::Settled(_) => return,
        }
    };

    // Run continuations outside the lock so they may inspect the output
    for callback in callbacks {
        callback(&result);
    }
}

/// A deferred value, resolved asynchronously by the external engine
pub struct Output<T> {
    cell: Arc<Cell<T>>,
}

impl<T> Clone for Output<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T: Clone + Send + 'static> Output<T> {
    /// Create an already-resolved output
    pub fn known(value: T) -> Self {
        Self {
            cell: Arc::new(Cell {
                state: Mutex::new(CellState::Settled(Ok(value))),
            }),
        }
    }

    /// Create a pending output together with its one-shot resolver
    pub fn pending() -> (Self, Resolver<T>) {
        let cell = Arc::new(Cell {
            state: Mutex::new(CellState::Pending(Vec::new())),
        });
        (
            Self {
                cell: Arc::clone(&cell),
            },
            Resolver { cell },
        )
    }

    /// Register a continuation that runs once the output settles
    ///
    /// Runs immediately if the output has already settled.
    pub fn when_settled<F>(&self, f: F)
    where
        F: FnOnce(&Result<T, OutputError>) + Send + 'static,
    {
        let ready = {
            let mut state = self.cell.state.lock().unwrap();
            match &mut *state {
                CellState::Pending(callbacks) => {
                    callbacks.push(Box::new(f));
                    return;
                }
                CellState::Settled(result) => result.clone(),
            }
        };
        f(&ready);
    }

    /// Derive a new output by transforming the resolved value
    ///
    /// The transform runs exactly once, when this output resolves. A
    /// transform error, or an upstream failure, fails the derived output.
    pub fn apply<U, E, F>(&self, f: F) -> Output<U>
    where
        U: Clone + Send + 'static,
        E: fmt::Display,
        F: FnOnce(T) -> Result<U, E> + Send + 'static,
    {
        let (derived, resolver) = Output::pending();
        self.when_settled(move |settled| match settled {
            Ok(value) => match f(value.clone()) {
                Ok(mapped) => resolver.resolve(mapped),
                Err(err) => resolver.fail(err.to_string()),
            },
            Err(err) => resolver.fail_error(err.clone()),
        });
        derived
    }

    /// The resolved value, if resolved
    pub fn get(&self) -> Option<T> {
        match &*self.cell.state.lock().unwrap() {
            CellState::Settled(Ok(value)) => Some(value.clone()),
            _ => None,
        }
    }

    /// The failure, if the output failed
    pub fn error(&self) -> Option<OutputError> {
        match &*self.cell.state.lock().unwrap() {
            CellState::Settled(Err(err)) => Some(err.clone()),
            _ => None,
        }
    }

    /// Whether the output has resolved or failed
    pub fn is_settled(&self) -> bool {
        matches!(&*self.cell.state.lock().unwrap(), CellState::Settled(_))
    }
}

impl<T: fmt::Debug> fmt::Debug for Output<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.cell.state.lock().unwrap() {
            CellState::Pending(_) => f.write_str("Output(<pending>)"),
            CellState::Settled(Ok(value)) => write!(f, "Output({value:?})"),
            CellState::Settled(Err(err)) => write!(f, "Output(<failed: {err}>)"),
        }
    }
}

/// One-shot resolver for a pending [`Output`]
pub struct Resolver<T> {
    cell: Arc<Cell<T>>,
}

impl<T: Clone + Send + 'static> Resolver<T> {
    /// Resolve the output with a value
    pub fn resolve(self, value: T) {
        settle(&self.cell, Ok(value));
    }

    /// Fail the output
    pub fn fail(self, message: impl Into<String>) {
        settle(&self.cell, Err(OutputError(message.into())));
    }

    fn fail_error(self, err: OutputError) {
        settle(&self.cell, Err(err));
    }
}

/// A component input: either a literal value or a deferred one
#[derive(Debug, Clone)]
pub enum Input<T> {
    Value(T),
    Deferred(Output<T>),
}

impl<T: Clone + Send + 'static> Input<T> {
    /// View the input as an output, lifting literals to resolved outputs
    pub fn to_output(&self) -> Output<T> {
        match self {
            Input::Value(value) => Output::known(value.clone()),
            Input::Deferred(output) => output.clone(),
        }
    }
}

impl From<&str> for Input<String> {
    fn from(value: &str) -> Self {
        Input::Value(value.to_string())
    }
}

impl From<String> for Input<String> {
    fn from(value: String) -> Self {
        Input::Value(value)
    }
}

impl<T> From<Output<T>> for Input<T> {
    fn from(output: Output<T>) -> Self {
        Input::Deferred(output)
    }
}
