//! Report record normalization.
//!
//! Records arrive as schema-less JSON trees whose shape differs between the
//! single-report and list-report upstream endpoints. Everything here is total:
//! missing, null or wrongly-typed fields turn into display sentinels, never errors.
//! - `resolver` - dotted-path lookup with the evidence/actions compatibility shims
//! - `format` - value-to-text conversion shared by all renderers
//! - `schema` - the canonical ordered field lists
//! - `entries` - action and evidence extraction

pub mod entries;
pub mod format;
pub mod resolver;
pub mod schema;

pub use entries::{
    action_summary, display_field, evidence_entries, text_field, ActionEntry, ActionStatus,
    NO_ACTIONS, NO_EVIDENCE,
};
pub use format::{cell_value, format_value, scalar_text, CellValue, NOT_AVAILABLE};
pub use resolver::{lookup, resolve};
pub use schema::{FieldSpec, REPORT_FIELDS, STYLED_SUMMARY_FIELDS};
