//! # Example
//! ```no_run
//! use contagion::{generator::GraphGenerator, infection::infect_all, renderer::Renderer};
//!
//! let graph = GraphGenerator::new().generate()?;
//! let mut renderer = Renderer::builder().output_dir("frames").build(&graph)?;
//! let report = infect_all(&graph, &mut renderer)?;
//! println!("{} of {} nodes infected", report.infected, report.total);
//! # Ok::<(), contagion::error::InfectionError>(())
//! ```

pub mod coloring;
pub mod error;
pub mod generator;
pub mod infection;
pub mod layout;
pub mod properties;
pub mod quadtree;
pub mod renderer;
