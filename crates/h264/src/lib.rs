mod config;
mod errors;

pub use config::{join_nalus, nalus_from_annex_b, split_nalus, AvcDecoderConfigurationRecord};
pub use errors::AvcConfigError;
