pub mod classifier;
pub mod correlator;
pub mod limits;
pub mod quantity;
pub mod record;
pub mod reporter;

pub use classifier::{classify, Classification, ComponentType};
pub use correlator::{correlate, Correlator, CycleStats};
pub use limits::{resolve_limits, ConfiguredLimits};
pub use record::{InstanceRecord, ResourceStat};
pub use reporter::Reporter;
