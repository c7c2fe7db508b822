//! HTTP routing for REST resources
//!
//! [`RestRouter`] maps method and path to a named route and view action.

pub mod router;

pub use router::{ActionScope, ExtraAction, RestRouter, Route, RouteMatch};
