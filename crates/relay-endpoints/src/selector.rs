//! Endpoint selection strategies.

use crate::pool::{Endpoint, EndpointPool};
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Strategy deciding which endpoint receives the next call.
///
/// The variant set is closed over this enum; adding a strategy (weighted
/// random, least-loaded) means adding a variant here, not subclassing a
/// mutable base.
#[derive(Debug)]
pub enum EndpointSelector {
    /// Cycle through the pool in order, starting at the first endpoint.
    RoundRobin {
        pool: EndpointPool,
        cursor: AtomicUsize,
    },
    /// Uniform independent draw per call; no memory of prior draws.
    Random { pool: EndpointPool },
}

impl EndpointSelector {
    /// Round-robin selector over `pool`.
    pub fn round_robin(pool: EndpointPool) -> Self {
        Self::RoundRobin {
            pool,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Random selector over `pool`.
    pub fn random(pool: EndpointPool) -> Self {
        Self::Random { pool }
    }

    /// Pick the next endpoint.
    ///
    /// Round-robin returns the first endpoint on the very first call and
    /// then cycles. The cursor advances exactly once per call, so
    /// concurrent callers never observe a skipped or repeated step.
    pub fn next(&self) -> &Endpoint {
        match self {
            Self::RoundRobin { pool, cursor } => {
                let index = cursor.fetch_add(1, Ordering::Relaxed) % pool.len();
                &pool[index]
            }
            Self::Random { pool } => {
                let index = rand::thread_rng().gen_range(0..pool.len());
                &pool[index]
            }
        }
    }

    /// The pool this selector draws from.
    pub fn pool(&self) -> &EndpointPool {
        match self {
            Self::RoundRobin { pool, .. } | Self::Random { pool } => pool,
        }
    }
}
