//! Lazy per-faction memory access.
//!
//! A behavior checks its memory variant out of the `Ai` component at the
//! start of an entity's turn and checks it back in at the end. A checkout
//! that finds nothing (or another faction's variant) is the entry transition.

use nebula_core::components::Ai;
use nebula_core::memory::*;

pub trait MemoryVariant: Sized {
    fn extract(memory: FactionMemory) -> Option<Self>;
    fn wrap(self) -> FactionMemory;
    fn get_mut(memory: &mut FactionMemory) -> Option<&mut Self>;
}

macro_rules! memory_variant {
    ($ty:ty, $variant:ident) => {
        impl MemoryVariant for $ty {
            fn extract(memory: FactionMemory) -> Option<Self> {
                match memory {
                    FactionMemory::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn wrap(self) -> FactionMemory {
                FactionMemory::$variant(self)
            }

            fn get_mut(memory: &mut FactionMemory) -> Option<&mut Self> {
                match memory {
                    FactionMemory::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

memory_variant!(SwarmMemory, Swarm);
memory_variant!(SentinelMemory, Sentinel);
memory_variant!(PhantomMemory, Phantom);
memory_variant!(TitanMemory, Titan);

/// Take the memory out of `ai`. `None` means the entity is new to this
/// behavior.
pub fn checkout<M: MemoryVariant>(ai: &mut Ai) -> Option<M> {
    ai.memory.take().and_then(M::extract)
}

pub fn checkin<M: MemoryVariant>(ai: &mut Ai, memory: M) {
    ai.memory = Some(memory.wrap());
}

/// Borrow another entity's memory in place, if it has been initialized.
pub fn peek_mut<M: MemoryVariant>(ai: &mut Ai) -> Option<&mut M> {
    ai.memory.as_mut().and_then(M::get_mut)
}
