//! Typed per-configuration tool settings.
//!
//! Every field is either a [`TriState`], a choice enum with a `NotSet`
//! member, a string, or a list. All of them are empty by default and are
//! serialized through [`Settings`], which drops defaulted values.

#[macro_use]
mod choice;
mod tristate;

pub mod compiler;
pub mod configuration;
pub mod events;
pub mod librarian;
pub mod linker;
pub mod midl;
pub mod resource;
pub mod settings;

pub use choice::{Choice, Dialect};
pub use compiler::CompilerTool;
pub use configuration::{CharacterSet, Configuration, ConfigurationType};
pub use events::{CustomBuildTool, DeploymentFile, DeploymentTool, EventKind, EventTool};
pub use librarian::LibrarianTool;
pub use linker::LinkerTool;
pub use midl::MidlTool;
pub use resource::ResourceTool;
pub use settings::Settings;
pub use tristate::TriState;
