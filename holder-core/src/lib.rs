//! `prople-holder-core` contains the domain side of the holder admin protocol.
//!
//! It knows nothing about the admin message family itself. It only provides
//! the exchange records, the contracts of the external collaborators (record
//! store, connection store, protocol engines, holder credential store and the
//! outbound transport), the typed event bus and the pagination rules used by
//! `prople-holder-admin`.
pub mod holder;
