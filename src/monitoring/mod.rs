/*!
 * Monitoring
 * Structured tracing setup for queue diagnostics
 */

mod tracer;

pub use tracer::{init_tracing, ENV_TRACE_JSON};
