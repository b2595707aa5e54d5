//! Outbound HTTP to the backing API

mod invoker;
mod response;

pub use invoker::{HttpApiInvoker, InvokerError};
pub use response::{classify_body, classify_response};
