//! Application layer with a small dependency injection container.
//!
//! The container owns the policy repository and a default seed, and builds
//! environments and agents from plain config values.
//!
//! # Usage
//!
//! ## Production
//!
//! ```
//! use pegsolitaire::app::{AgentConfig, App, BoardConfig};
//!
//! let app = App::new();
//! let env = app.create_environment(&BoardConfig::new(5))?;
//! let agent = app.create_agent(AgentConfig::default().with_seed(42))?;
//! # Ok::<(), pegsolitaire::Error>(())
//! ```
//!
//! ## Testing
//!
//! ```
//! use pegsolitaire::adapters::InMemoryRepository;
//! use pegsolitaire::app::App;
//!
//! let app = App::for_testing()
//!     .with_repository(InMemoryRepository::new())
//!     .with_default_seed(42)
//!     .build();
//! ```

pub mod config;
pub mod container;

pub use config::{AgentConfig, BoardConfig};
pub use container::{App, AppBuilder};
