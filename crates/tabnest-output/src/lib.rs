//! Nested XML output for linked datasets.
//!
//! [`NestedXmlWriter`] walks a [`tabnest_model::DatasetCollection`] from its
//! starting dataset and follows join links to produce one denormalized
//! document.

pub mod error;
pub mod naming;
pub mod nested_xml;

pub use error::{Result, SerializeError};
pub use naming::{TagNaming, split_tag};
pub use nested_xml::NestedXmlWriter;
