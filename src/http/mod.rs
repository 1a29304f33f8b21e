//! Request dispatch, worker pool, and HTTP transport.
mod descriptor;
mod dispatcher;
mod pool;
mod record;
mod transport;


pub use descriptor::{RequestDescriptor, RequestTemplate};
pub use dispatcher::{DispatchReport, spawn_dispatcher};
pub use pool::{PoolReport, WorkerPool};
pub use record::{FailureCause, Outcome, ResultRecord};
pub use transport::{ReqwestTransport, Transport};
