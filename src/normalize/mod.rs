//! The statistics normalization pipeline: counter flattening, row assembly and
//! reconciliation against a sink's fixed column list.

pub mod assemble;
pub mod error;
pub mod flatten;
pub mod player;
pub mod reconcile;
pub mod record;
pub mod value;

pub use assemble::*;
pub use error::*;
pub use flatten::*;
pub use player::*;
pub use reconcile::*;
pub use record::*;
pub use value::*;
