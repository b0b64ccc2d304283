mod adts;
mod config;
mod errors;

pub use adts::{build_adts_header, parse_adts_frame, write_adts_frame, AdtsFrame};
pub use config::{AudioSpecificConfig, SAMPLE_RATE_TABLE};
pub use errors::AacConfigError;

#[cfg(test)]
mod tests;
