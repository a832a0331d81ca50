pub mod hypersearch;
pub mod local_search;

use memmap2::MmapMut;
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// The single piece of cross-worker state: the best normalized objective
/// (0.0..=1.0) observed so far, held as an atomic double in an 8-byte
/// memory-mapped file shared between the parent and its worker processes.
/// The contract is a monotone read-modify-write of one scalar, nothing more.
pub struct SharedBest {
    map: MmapMut,
}

impl SharedBest {
    /// Creates the backing file (zeroed, so the cell starts at 0.0) and maps
    /// it. The parent does this once per hyper-search run.
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        file.set_len(8)?;
        SharedBest::from_file(&file)
    }

    /// Maps an existing cell file; workers do this on startup.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::options().read(true).write(true).open(path)?;
        SharedBest::from_file(&file)
    }

    fn from_file(file: &File) -> io::Result<Self> {
        // the mapping outlives `file`; all parties map the same 8-byte file
        let map = unsafe { MmapMut::map_mut(file)? };
        Ok(SharedBest { map })
    }

    fn cell(&self) -> &AtomicU64 {
        // mappings are page-aligned; the scalar lives in the first 8 bytes
        unsafe { &*(self.map.as_ptr() as *const AtomicU64) }
    }

    pub fn read(&self) -> f64 {
        f64::from_bits(self.cell().load(Ordering::Acquire))
    }

    /// Monotone write; returns true if `value` improved the cell.
    pub fn offer(&self, value: f64) -> bool {
        let mut current = self.cell().load(Ordering::Acquire);
        loop {
            if value <= f64::from_bits(current) {
                return false;
            }
            match self.cell().compare_exchange(
                current,
                value.to_bits(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(observed) => current = observed,
            }
        }
    }

    /// True once some worker has reported a 100% solution.
    pub fn is_perfect(&self) -> bool {
        self.read() >= 1.0
    }
}

/// Cancellation sources polled at strategy and local-search node boundaries.
#[derive(Clone, Copy)]
pub struct SearchCtrl<'a> {
    pub deadline: Instant,
    pub global_best: Option<&'a SharedBest>,
}

impl SearchCtrl<'_> {
    pub fn should_stop(&self) -> bool {
        Instant::now() >= self.deadline
            || self.global_best.is_some_and(SharedBest::is_perfect)
    }
}
