//! Crab Core - Hexagonal Architecture Implementation
//!
//! This crate provides the configuration model, domain and application
//! layers for the Crab Python project scaffolding tool, following hexagonal
//! (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            crab-cli (CLI)               │
//! │   argument parsing, output, exit codes  │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │     (InitService, TemplateService)      │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │ (Store, Renderer, Filesystem, Runner)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     crab-adapters (Infrastructure)      │
//! │ (TeraRenderer, LocalFilesystem, uv/git) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crab_core::{
//!     application::{InitRequest, InitService, InitSteps},
//!     config::CrabConfig,
//!     domain::{ProjectName, RenderContext},
//! };
//!
//! let config = CrabConfig::load("pyproject.toml".as_ref()).unwrap();
//! let name = ProjectName::parse("demo").unwrap();
//!
//! // Adapters come from `crab-adapters`.
//! let service = InitService::new(renderer, runner, filesystem);
//! service.run(&InitRequest {
//!     project_dir: name.as_str().into(),
//!     context: RenderContext::for_project(name.as_str()),
//!     steps: InitSteps::default(),
//!     config: &config,
//! }).unwrap();
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        InitReport, InitRequest, InitService, InitSteps, TemplateInfo, TemplateService,
        ports::{CommandRunner, Filesystem, RenderReport, TemplateRenderer, TemplateStore},
    };
    pub use crate::config::{ConfigError, CrabConfig};
    pub use crate::domain::{Invocation, ProjectName, RenderContext, RelativePath, TemplateSet};
    pub use crate::error::{CrabError, CrabResult, ErrorCategory};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
