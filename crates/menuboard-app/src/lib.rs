// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod catalog;
pub mod error;
pub mod ids;
pub mod layout;
pub mod model;
pub mod selection;
pub mod state;

pub use catalog::*;
pub use error::*;
pub use ids::*;
pub use layout::*;
pub use model::*;
pub use selection::*;
pub use state::*;
