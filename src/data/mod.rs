//! Data layer: tables, parsing, the result tree and sub-tree selection.
//!
//! Architecture:
//! ```text
//!  postProcessing/sample/<time>/<set>.xy      reference Cp.dat
//!        │                                        │
//!        ▼                                        ▼
//!   ┌──────────┐                           ┌──────────────┐
//!   │  loader   │  parse file → Table       │    loader     │ → ReferenceTable
//!   └──────────┘                           └──────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │   tree    │  ResultTree: path segments → Table
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  select   │  prefix + DataChoice → one time-step branch
//!   └──────────┘
//! ```

pub mod loader;
pub mod model;
pub mod select;
pub mod tree;
