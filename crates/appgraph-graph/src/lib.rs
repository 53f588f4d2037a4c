//! Application graph resolution.
//!
//! [`compute`] turns the flat application and environment resource listings into an
//! [`ApplicationGraph`] holding exactly the resources that belong to the application,
//! with inbound and outbound connections resolved. [`display`] renders that graph as a
//! stable, human-readable report.

pub mod compute;
pub mod display;
pub mod extract;
pub mod hyperlink;
pub mod membership;
pub mod node;

pub use compute::compute;
pub use display::{display, display_with, DisplayOptions, GraphReport};
pub use extract::{connections_from_api_data, output_resources_from_api_data};
pub use membership::{Membership, MembershipState};
pub use node::*;
