mod acl;
mod session;

pub use acl::{AclMiddlewareFactory, AclMiddlewareService};
pub use session::{credential_from_request, SessionMiddlewareFactory, SessionMiddlewareService};
