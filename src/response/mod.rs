//! Response Module
//!
//! Checks decoded response envelopes and prints their payloads.
//!
//! ## Envelope
//! ```text
//! {"msg": "<KIND>", "result": "ok" | true, "data": { ... }}
//! ```

mod render;
mod tables;
mod validator;

pub use render::ResponseRenderer;
pub use tables::{
    Association, FieldRole, KindLabels, LabelAssociations, LookupTable, EQUALIZERS, FUNCTIONS,
};
pub use validator::ResponseValidator;
