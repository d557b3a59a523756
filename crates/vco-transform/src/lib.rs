//! Runtime-overridable Vue component imports
//!
//! [`ComponentOverrideTransformer`] rewrites the component imports of a
//! module so that each imported component is looked up through a resolver
//! from the runtime package before use. Edits are made with
//! [`vco_edit::EditBuffer`], so every transformed module comes with a
//! high-resolution source map back to its original text.
//!
//! ```rust
//! use vco_transform::{ComponentOverrideTransformer, TransformOptions};
//!
//! let transformer = ComponentOverrideTransformer::new(TransformOptions {
//!     uid: Some("demo".into()),
//!     ..Default::default()
//! })?;
//!
//! let output = transformer
//!     .transform("import Card from './Card.vue';\n", "/src/main.ts")?
//!     .expect("ts modules are transformed");
//! assert!(output.code.contains("import Card__Tmp0 from './Card.vue';"));
//! assert!(output.code.contains("__VUE_COMPONENT_OVERRIDE_RESOLVE_demo__('Card', Card__Tmp0)"));
//! # Ok::<(), vco_transform::TransformError>(())
//! ```

mod error;
mod mask;
mod module_id;
mod options;
mod transformer;

pub use error::TransformError;
pub use mask::mask_comments;
pub use module_id::ModuleId;
pub use options::{DEFAULT_RUNTIME_MODULE, TransformOptions};
pub use transformer::{ComponentOverrideTransformer, TransformOutput};
