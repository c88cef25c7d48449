
use crate::{Blake2s, Blake2sDigest, Blake2sError};

#[derive(Debug, Clone)]
enum ContextState {
    /// Input is accepted
    Accepting(Blake2s),
    /// Digest was produced, no further input is accepted
    Finalized(Blake2sDigest),
}

/// Hashing context with an explicit `Accepting -> Finalized` state machine.
///
/// Unlike [`Blake2s`], finalization doesn't consume the context, instead any attempt to use it
/// afterward results in [`Blake2sError::InvalidState`], while the produced digest stays available
/// through [`Self::digest()`].
#[derive(Debug, Clone)]
pub struct Blake2sContext {
    state: ContextState,
}

impl Blake2sContext {
    /// Create new context, see [`Blake2s::new_keyed()`] for parameter requirements
    pub fn new(out_len: usize, key: &[u8]) -> Result<Self, Blake2sError> {
        Ok(Self {
            state: ContextState::Accepting(Blake2s::new_keyed(out_len, key)?),
        })
    }

    /// Absorb more input
    pub fn update(&mut self, input: &[u8]) -> Result<(), Blake2sError> {
        match &mut self.state {
            ContextState::Accepting(hasher) => {
                hasher.update(input);
                Ok(())
            }
            ContextState::Finalized(_) => Err(Blake2sError::InvalidState),
        }
    }

    /// Produce the digest, moving context into finalized state
    pub fn finalize(&mut self) -> Result<Blake2sDigest, Blake2sError> {
        let digest = match &self.state {
            ContextState::Accepting(hasher) => hasher.clone().finalize(),
            ContextState::Finalized(_) => {
                return Err(Blake2sError::InvalidState);
            }
        };
        self.state = ContextState::Finalized(digest);

        Ok(digest)
    }

    /// Whether [`Self::finalize()`] was already called successfully
    #[inline]
    pub fn is_finalized(&self) -> bool {
        matches!(self.state, ContextState::Finalized(_))
    }

    /// Digest produced by [`Self::finalize()`], if any
    #[inline]
    pub fn digest(&self) -> Option<&Blake2sDigest> {
        match &self.state {
            ContextState::Accepting(_) => None,
            ContextState::Finalized(digest) => Some(digest),
        }
    }
}
