mod index;
mod persistence;
mod profile;

pub use index::Catalog;
pub use persistence::{dedup_by_id, load_catalog, save_plan, write_plan_csv};
pub use profile::{Profile, load_profile, save_profile};
