//! Static site generation for folio.
//!
//! A build runs three phases in a fixed order:
//! - `assets`: passthrough files (stylesheets, pre-rendered images) are copied verbatim
//! - `pages`: every manifest page is rendered into the shared shell template
//!   with previous/next navigation
//! - `diagrams`: graph descriptions are turned into SVG by an external layout engine
//!
//! The first fatal error aborts the remaining phases. Files written by earlier
//! phases are left in place.

mod assets;
mod builder;
mod diagrams;
mod error;
mod pages;
mod template;

pub use builder::{BuildReport, BuildRequest, StaticSiteBuilder};
pub use diagrams::{CommandRunner, LayoutEngine, LayoutRunner};
pub use error::{BuildError, DiagramError};
pub use template::DEFAULT_SHELL;
