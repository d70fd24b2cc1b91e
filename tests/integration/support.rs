use dataroom::tree::{Listing, ListingRecord};
use parking_lot::Mutex;
use std::path::Path;
use tempfile::TempDir;

static ENV_LOCK: Mutex<()> = parking_lot::const_mutex(());

/// Run `f` with XDG and DATAROOM variables pointed into `temp_dir`.
pub fn with_xdg_env<F: FnOnce()>(temp_dir: &TempDir, f: F) {
    let _guard = ENV_LOCK.lock();
    let saved: Vec<(&str, Option<String>)> = ["XDG_DATA_HOME", "XDG_CONFIG_HOME", "HOME"]
        .iter()
        .map(|k| (*k, std::env::var(k).ok()))
        .collect();
    std::env::set_var("XDG_DATA_HOME", temp_dir.path().join("data"));
    std::env::set_var("XDG_CONFIG_HOME", temp_dir.path().join("config"));
    std::env::set_var("HOME", temp_dir.path());

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));

    for (key, value) in saved {
        match value {
            Some(v) => std::env::set_var(key, v),
            None => std::env::remove_var(key),
        }
    }
    if let Err(panic) = result {
        std::panic::resume_unwind(panic);
    }
}

/// Home > Reports > {q1.pdf, q2.pdf}, Home > notes.txt, Legal (empty).
pub fn sample_listing() -> Listing {
    Listing {
        folders: vec![
            ListingRecord::new("Root", "Home"),
            ListingRecord::new("Root/Home", "Reports"),
            ListingRecord::new("Root", "Legal"),
        ],
        files: vec![
            ListingRecord::new("Root/Home/Reports", "q1.pdf"),
            ListingRecord::new("Root/Home/Reports", "q2.pdf"),
            ListingRecord::new("Root/Home", "notes.txt"),
        ],
    }
}

pub fn write_listing(dir: &Path, name: &str, listing: &Listing) {
    std::fs::write(dir.join(name), serde_json::to_string_pretty(listing).unwrap()).unwrap();
}
