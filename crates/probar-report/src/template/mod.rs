//! Localized Templates
//!
//! ```text
//! TemplateStore                         TemplateCompiler
//! [classCoverage::sv_SE::0] ─┐          "Line: ${foo_1}" + {foo_1: bar_1}
//! [classCoverage::sv_SE::1] ─┼─ select ──► render each ──► concatenate
//! [classCoverage::en_GB::0]  │ (same id, same language, by sequence)
//! ```

mod compiler;
mod store;

pub use compiler::TemplateCompiler;
pub use store::{SelectedTemplate, TemplateStore};
