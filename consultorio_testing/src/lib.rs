//! Stand-ins for the external services the backend talks to, used by integration
//! tests and for local development.

pub mod resend;
