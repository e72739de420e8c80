//! # vcgen - Visual Studio project generator
//!
//! vcgen turns a platform-independent build description (`vcgen.toml`) into
//! Visual Studio project files (`.vcproj` for VS2002-VS2008, `.vcxproj` plus
//! `.vcxproj.filters` from VS2010 on) and solutions (`.sln`) spanning a tree
//! of sub-projects.
//!
//! ## Quick Start
//!
//! ```bash
//! # One project
//! vcgen project path/to/core
//!
//! # A solution and every project in it
//! vcgen solution --recursive
//! ```
//!
//! ## Pipeline
//!
//! 1. [`config`] loads the description.
//! 2. [`builder`] produces one single-configuration project per
//!    (build type, platform), parsing raw flags through [`flags`] into the
//!    typed [`model`] and classifying files with [`filters`].
//! 3. [`project`] merges them under one stable identity ([`guid`], [`lock`]).
//! 4. [`resolver`] walks sub-projects and derives dependency edges.
//! 5. [`emit`] serializes projects and solutions.

/// Single-configuration project builder.
pub mod builder;

/// Build description file parsing (`vcgen.toml`).
pub mod config;

/// Side-channel diagnostics sink.
pub mod diagnostics;

/// Dependency-discovery subprocess for custom tools.
pub mod discovery;

/// Project and solution writers.
pub mod emit;

/// File classification into display filters.
pub mod filters;

/// Raw flag parsing into typed tool settings.
pub mod flags;

/// Load, build, emit.
pub mod generator;

/// Stable project identifiers.
pub mod guid;

/// Pinned GUIDs (`vcgen.lock`).
pub mod lock;

/// Typed per-configuration tool settings.
pub mod model;

/// Path spelling helpers.
pub mod paths;

/// Multi-configuration project assembly.
pub mod project;

/// Sub-project resolution and dependency edges.
pub mod resolver;

/// Visual Studio toolset generations.
pub mod toolset;

/// Display trees for filters.
pub mod tree;

/// Terminal tables.
pub mod ui;
