mod filter;
mod model;
mod payload;

pub use filter::{DisplayMode, WorkingGraph, WorkingNode};
pub use model::{CausalGraph, CausalNode, GraphEdge, RegroupEvent, UNGROUPED};
pub use payload::{GraphPayload, PayloadEdge, PayloadNode, load_payload};
