//! Reader for binary NAIF SPK kernels (JPL DE planetary ephemerides).

mod chebyshev_record;
pub mod daf_header;
pub mod naif_data;
pub mod naif_type;
pub mod naif_version;
mod spk_segment;
mod summary_record;
