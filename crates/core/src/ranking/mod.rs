//! Ranking engine - pure computations over in-memory title snapshots.
//!
//! Every operation here is a deterministic function of its inputs: the
//! current time is always a parameter, inputs are never mutated, and no
//! state is kept between calls. Callers fetch a snapshot from the catalog
//! store, run one of these functions, and render the result.

mod aggregate;
mod format;
mod search;
mod top_rated;
mod trending;

pub use aggregate::*;
pub use format::*;
pub use search::*;
pub use top_rated::*;
pub use trending::*;
