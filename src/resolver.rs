/*!
 * Configuration-scope resolution
 *
 * Decides, per invocation, which storage location is authoritative and
 * whether local storage must be seeded from the global record before a
 * persisted edit, then assembles the effective configuration record.
 */

use crate::bail;
use crate::config::{ConfigRecord, PatternEdit};
use crate::error::Result;
use crate::store::ConfigStore;

/// Which storage location is authoritative for the current invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Global,
    Local,
}

/// Outcome of scope resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub scope: Scope,
    /// Local storage must be created from the global record before any write
    pub seed_local: bool,
}

/// The scope decision function.
///
/// `use_global` wins over everything, for reads and writes alike. A
/// permanent edit without it always targets local storage, seeding it
/// from the global record first when it does not exist yet. An
/// ephemeral invocation reads whichever storage is present, falling
/// back from local to global.
pub fn resolve(use_global: bool, permanent: bool, local_exists: bool) -> Resolution {
    if use_global {
        return Resolution {
            scope: Scope::Global,
            seed_local: false,
        };
    }
    if permanent {
        return Resolution {
            scope: Scope::Local,
            seed_local: !local_exists,
        };
    }
    Resolution {
        scope: if local_exists {
            Scope::Local
        } else {
            Scope::Global
        },
        seed_local: false,
    }
}

/// Assemble the effective configuration record for one invocation:
/// seed if required, read the authoritative record, apply at most one
/// CLI-supplied edit, and persist the result when the edit is permanent.
///
/// Any failure here aborts the run before the output file is touched.
pub fn load_effective(
    store: &ConfigStore,
    use_global: bool,
    permanent: bool,
    edit: Option<&PatternEdit>,
) -> Result<ConfigRecord> {
    let resolution = resolve(use_global, permanent, store.local_exists());
    log::debug!(
        "Resolved configuration scope: {:?} (seed_local: {})",
        resolution.scope,
        resolution.seed_local
    );

    if resolution.seed_local {
        if !store.global_exists() {
            bail!(Config, "cannot seed local config: no global config found");
        }
        store.seed_local_from_global()?;
    }

    let mut record = match resolution.scope {
        Scope::Global => store.read_global()?,
        Scope::Local => store.read_local()?.0,
    };

    if let Some(edit) = edit {
        log::debug!("Applying pattern edit: {:?}", edit);
        record.apply(edit);
    }
    record.normalize();

    if permanent {
        match resolution.scope {
            Scope::Global => store.write_global(&record)?,
            Scope::Local => store.write_local(&record)?,
        }
    }

    Ok(record)
}
