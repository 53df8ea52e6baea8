//! World capability consumed by extractors and processors

use primitive_types::H160;

/// Caller identity
pub type Address = H160;

/// Read access to the scenario world.
///
/// The concrete state container lives outside the engine. Extractors only need
/// to turn a name such as `Geoff` or an account index into an address.
pub trait World: Send + Sync {
    /// Resolve an alias to an address
    fn resolve_alias(&self, alias: &str) -> Option<Address>;
}
