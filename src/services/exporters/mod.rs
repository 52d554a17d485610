//! C11: Multi-format snapshot exporters.

pub mod csv_export;
pub mod dot;
pub mod gexf;
pub mod graphml;
pub mod json_export;

pub use csv_export::export_csv;
pub use dot::export_dot;
pub use gexf::export_gexf;
pub use graphml::export_graphml;
pub use json_export::export_json;
