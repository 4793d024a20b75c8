#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! Wire types and HTTP clients for the raffle-ticket PIX checkout.
//!
//! The `objects` module holds the request/response shapes of the two
//! external services (the payment gateway and the attribution endpoint);
//! `money` holds the integer-subunit conversion applied at those wire
//! boundaries. The HTTP clients live behind the `client` cargo feature so
//! downstream crates that only need the shared types do not pull in
//! `reqwest`.

pub mod money;
pub mod objects;

#[cfg(feature = "client")]
pub mod client;
