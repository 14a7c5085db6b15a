//! YANG to TOSCA Simple YAML translator.
//!
//! The pipeline: parse YANG text into a statement tree ([`yang`]), resolve
//! cross-references and build the module registry ([`yang::resolve`]), then
//! walk the tree once and emit a TOSCA data-type document ([`emit`]). Type
//! mapping comes from a YAML config ([`config`]); everything TOSCA cannot
//! express degrades to commented, review-marked output instead of failing.

pub mod check;
pub mod cli;
pub mod config;
pub mod constraints;
pub mod context;
pub mod emit;
pub mod sink;
pub mod text;
pub mod yang;
