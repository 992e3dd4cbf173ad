//! The session list engine: page accumulation, client-side refinement and
//! windowed rendering math. Everything here is pure and host-testable; the
//! sessions view model wires it to signals and the network.

pub mod accumulator;
pub mod refine;
pub mod window;

pub use accumulator::{AppendOutcome, PageAccumulator, PageRequest};
pub use window::{plan_window, near_end, Viewport, WindowPlan, DEFAULT_OVERSCAN, LOAD_MORE_THRESHOLD};
