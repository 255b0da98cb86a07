//! Backend selection module.
//!
//! This module defines how the element-wise kernels are scheduled and
//! provides functions to set and get the current backend.
//!
//! # Supported Backends
//!
//! - `Cpu` - Splits the index range across the rayon thread pool (default).
//! - `Sequential` - Single-threaded loop, useful as a reference or inside
//!   hosts that already parallelize across operator invocations.
//!
//! Both backends produce bit-identical results: every index reads only its
//! own input slots and writes only its own output slot.
//!
//! The backend is stored globally using an `AtomicU8`, enabling fast
//! switching at runtime. Hosts that read their backend from a configuration
//! string can go through [`Backend::from_str`](core::str::FromStr).

use core::convert::TryFrom;
use core::fmt;
use core::str::FromStr;
use core::sync::atomic::{AtomicU8, Ordering};

use crate::error::Error;

/// Enumeration of supported execution backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Backend {
    /// Rayon-parallel CPU backend (default).
    #[default]
    Cpu = 0,
    /// Plain single-threaded loop.
    Sequential,
}

impl Backend {
    /// Short lowercase name, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Sequential => "sequential",
        }
    }
}

impl TryFrom<u8> for Backend {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Cpu),
            1 => Ok(Self::Sequential),
            _ => Err(()),
        }
    }
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" | "parallel" | "rayon" => Ok(Self::Cpu),
            "sequential" | "serial" => Ok(Self::Sequential),
            other => Err(Error::UnknownBackend {
                name: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Internal global state for the active backend.
///
/// The backend is expected to change rarely, never in the middle of a kernel.
static GLOBAL_DEFAULT_BACKEND: AtomicU8 = AtomicU8::new(Backend::Cpu as u8);

/// Sets the active backend used by the dispatch layer.
///
/// # Example
///
/// ```
/// use bernoulli_jsd::backend::{get_backend, set_backend, Backend};
/// set_backend(Backend::Sequential);
/// assert_eq!(get_backend(), Backend::Sequential);
/// set_backend(Backend::Cpu);
/// ```
pub fn set_backend(b: Backend) {
    log::debug!("switching JSD backend to {b}");
    GLOBAL_DEFAULT_BACKEND.store(b as u8, Ordering::Release);
}

/// Returns the currently active backend.
///
/// If the stored value is invalid, defaults to [`Backend::Cpu`].
pub fn get_backend() -> Backend {
    Backend::try_from(GLOBAL_DEFAULT_BACKEND.load(Ordering::Acquire)).unwrap_or_default()
}
