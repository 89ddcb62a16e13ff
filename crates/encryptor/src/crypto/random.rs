//! Cryptographically secure byte source for CEKs, IVs, and the OAEP seed.

use rand_core::{CryptoRng, OsRng, RngCore};
use thiserror::Error;

/// Errors produced by a [`RandomSource`].
#[derive(Debug, Error)]
pub enum RandomError {
    /// The underlying entropy source failed.
    #[error("random source unavailable")]
    Unavailable(#[from] rand_core::Error),
}

/// Source of random bytes injected into the encryptor.
///
/// Implementations must be safe to share between threads and must return
/// independent, unpredictable bytes on every call. Tests substitute a
/// deterministic source to pin envelope fixtures.
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource {
    /// Fill `dest` entirely with random bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RandomError`] if the source cannot produce bytes.
    fn fill(&self, dest: &mut [u8]) -> Result<(), RandomError>;
}

/// The operating-system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, dest: &mut [u8]) -> Result<(), RandomError> {
        OsRng.try_fill_bytes(dest)?;
        Ok(())
    }
}

impl<T: RandomSource + ?Sized> RandomSource for &T {
    fn fill(&self, dest: &mut [u8]) -> Result<(), RandomError> {
        (**self).fill(dest)
    }
}

/// Adapts a [`RandomSource`] to [`RngCore`] for APIs that draw their own
/// randomness (the OAEP seed).
///
/// `RngCore::fill_bytes` cannot fail, so a source failure is recorded here and
/// must be checked with [`SourceRng::finish`] before any output produced with
/// this generator is used.
pub(crate) struct SourceRng<'a, R: RandomSource + ?Sized> {
    source: &'a R,
    failure: Option<RandomError>,
}

impl<'a, R: RandomSource + ?Sized> SourceRng<'a, R> {
    pub(crate) fn new(source: &'a R) -> Self {
        Self {
            source,
            failure: None,
        }
    }

    /// Surface the first failure seen while generating bytes, if any.
    pub(crate) fn finish(self) -> Result<(), RandomError> {
        match self.failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl<R: RandomSource + ?Sized> RngCore for SourceRng<'_, R> {
    fn next_u32(&mut self) -> u32 {
        rand_core::impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        rand_core::impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if let Err(e) = self.source.fill(dest) {
            dest.iter_mut().for_each(|b| *b = 0);
            self.failure.get_or_insert(e);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.source.fill(dest).map_err(rand_core::Error::new)
    }
}

impl<R: RandomSource + ?Sized> CryptoRng for SourceRng<'_, R> {}
