// Event Gateway - boundary between orchestrator and the event transport

mod inbound;
mod outbound;

pub use inbound::EventGateway;
pub use outbound::OutboundEvents;
