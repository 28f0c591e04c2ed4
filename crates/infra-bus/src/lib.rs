// Hireflow Infrastructure - Event Transport Adapters
// Implements: EventTransport (in-process partitioned bus, NATS)

mod in_process;
mod nats;
mod partition;

pub use in_process::InProcessBus;
pub use nats::{NatsBus, NatsConfig, KEY_HEADER};
pub use partition::{partition_for, PartitionedDispatcher, DEFAULT_PARTITIONS};
