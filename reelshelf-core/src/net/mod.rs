//! Remote request execution: retry policy, executor, and the concrete
//! transport/delay adapters.

mod executor;
mod retry;
mod sleeper;
mod transport;

pub use executor::RequestExecutor;
pub use retry::RetryConfig;
pub use sleeper::TokioSleeper;
pub use transport::ReqwestTransport;
