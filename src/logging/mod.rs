mod sink;
mod subscriber;
mod types;

pub use sink::{EventSink, NoopSink, TracingSink};
pub use subscriber::{env_filter, init};
pub use types::*;
