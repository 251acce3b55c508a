//! Memoization Signature Module
//!
//! Derives a deterministic cache key from a wrapper's identity and the
//! hashes of a call's arguments.
//!
//! The signature is hash-based by design: two distinct values with
//! colliding hashes are treated as the same call. This is a deliberate
//! performance trade-off, not guaranteed correctness for adversarial
//! inputs.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{CacheError, Result};

// == Hash Helper ==
/// Hashes a single value with the standard hasher.
fn hash_one<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

// == Call Arguments ==
/// The hashed arguments of one memoized call.
///
/// Positional arguments are recorded in call order; named arguments as
/// `(name, hash)` pairs in call order. Only hashes are retained, so any
/// `Hash` value can participate.
///
/// # Example
/// ```
/// use cachekit::memo::Args;
///
/// let args = Args::new().arg(&42).arg("query").named("depth", &3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Per-argument hashes, in call order
    positional: Vec<u64>,
    /// Named-argument hashes, in call order
    named: Vec<(String, u64)>,
}

impl Args {
    /// Creates an empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    pub fn arg<T: Hash + ?Sized>(mut self, value: &T) -> Self {
        self.positional.push(hash_one(value));
        self
    }

    /// Appends a named argument.
    pub fn named<T: Hash + ?Sized>(mut self, name: &str, value: &T) -> Self {
        self.named.push((name.to_string(), hash_one(value)));
        self
    }

    /// Returns the number of positional arguments recorded.
    pub fn positional_len(&self) -> usize {
        self.positional.len()
    }
}

// == Key Policy ==
/// Controls which arguments contribute to the signature.
///
/// With no inclusion lists configured, every argument contributes. An
/// inclusion list restricts the signature to the selected positions or
/// names, in the declared order; calls differing only in excluded
/// arguments share a cache slot.
#[derive(Debug, Clone, Default)]
pub struct KeyPolicy {
    /// Positional indices to include, None = all, in call order
    include_positions: Option<Vec<usize>>,
    /// Named arguments to include, None = all, in call order
    include_names: Option<Vec<String>>,
    /// Skip configured names absent from a call instead of failing
    allow_missing: bool,
}

impl KeyPolicy {
    /// Creates a policy that includes every argument.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the signature to the given positional indices, in the
    /// declared order.
    pub fn include_positions(mut self, positions: &[usize]) -> Self {
        self.include_positions = Some(positions.to_vec());
        self
    }

    /// Restricts the signature to the given named arguments, in the
    /// declared order.
    pub fn include_names(mut self, names: &[&str]) -> Self {
        self.include_names = Some(names.iter().map(|n| n.to_string()).collect());
        self
    }

    /// When true, a configured name absent from a call is silently
    /// skipped for that call.
    ///
    /// Sharp edge: calls with and without that name then derive the same
    /// signature and collide in the cache.
    pub fn allow_missing(mut self, allow: bool) -> Self {
        self.allow_missing = allow;
        self
    }
}

// == Signature ==
/// The derived cache key for a memoized call.
///
/// An ordered sequence of hashes: the wrapper's identity hash first, then
/// the selected argument hashes. Usable directly as a memory-cache key and,
/// via its canonical string form, as a remote-cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(Vec<u64>);

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, hash) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "-")?;
            }
            write!(f, "{:016x}", hash)?;
        }
        Ok(())
    }
}

// == Signature Derivation ==
/// Derives the signature for one call.
///
/// Pure and deterministic for equal argument hashes. Fails before any
/// computation runs when the policy names a positional index the call did
/// not supply, or a named argument absent from the call while
/// `allow_missing` is off.
///
/// # Arguments
/// * `name` - Identity of the wrapped callable
/// * `args` - The call's hashed arguments
/// * `policy` - Which arguments contribute
pub fn build_signature(name: &str, args: &Args, policy: &KeyPolicy) -> Result<Signature> {
    let mut sig = vec![hash_one(name)];

    match &policy.include_positions {
        Some(positions) => {
            for &index in positions {
                let hash = args.positional.get(index).ok_or_else(|| {
                    CacheError::MissingArgument(format!("positional argument #{}", index))
                })?;
                sig.push(*hash);
            }
        }
        None => sig.extend(&args.positional),
    }

    match &policy.include_names {
        Some(names) => {
            for name in names {
                match args.named.iter().find(|(n, _)| n == name) {
                    Some((_, hash)) => sig.push(*hash),
                    None if policy.allow_missing => continue,
                    None => {
                        return Err(CacheError::MissingArgument(format!(
                            "named argument `{}`",
                            name
                        )))
                    }
                }
            }
        }
        None => {
            // Without an inclusion list the name participates in the hash,
            // so `f(a=1)` and `f(b=1)` derive distinct signatures
            for (name, hash) in &args.named {
                let mut hasher = DefaultHasher::new();
                name.hash(&mut hasher);
                hash.hash(&mut hasher);
                sig.push(hasher.finish());
            }
        }
    }

    Ok(Signature(sig))
}
