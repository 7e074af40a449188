use ligbase::engine::binding_site::DEFAULT_CONTACT_CUTOFF;
use ligbase::engine::config::DEFAULT_CHECKPOINT_INTERVAL;
use std::path::PathBuf;

pub struct DefaultsConfig {
    pub work_dir: PathBuf,
    pub database: PathBuf,
    pub contact_cutoff: f64,
    pub checkpoint_interval: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            database: PathBuf::from("ligbase.sqlite"),
            contact_cutoff: DEFAULT_CONTACT_CUTOFF,
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
        }
    }
}
