/// Multi-file photo intake for native forms
///
/// - `intake`: validation, encoding and the per-field state machine
/// - `accept`: HTML-style accept strings to picker filters
/// - `config`: the form's upload fields

pub mod accept;
pub mod config;
pub mod intake;
