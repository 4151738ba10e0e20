mod acquisition;
mod metrics;
mod provider;

pub use acquisition::*;
pub use metrics::*;
pub use provider::*;
